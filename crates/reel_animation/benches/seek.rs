use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reel_animation::{seek, DiceStack, FrameClock};

fn seek_dice_stack(c: &mut Criterion) {
    let timeline = DiceStack::default().timeline(19).expect("dice stack");
    let clock = FrameClock::new(60.0, 360).expect("clock");

    c.bench_function("seek_dice_stack_frame", |b| {
        let mut frame = 0;
        b.iter(|| {
            frame = (frame + 1) % clock.duration_in_frames();
            seek::evaluate(&timeline, black_box(clock.time_of(frame))).expect("seek")
        });
    });
}

fn build_dice_stack(c: &mut Criterion) {
    let stack = DiceStack::default();

    c.bench_function("build_dice_stack", |b| {
        b.iter(|| stack.timeline(black_box(19)).expect("build"));
    });
}

criterion_group!(benches, seek_dice_stack, build_dice_stack);
criterion_main!(benches);
