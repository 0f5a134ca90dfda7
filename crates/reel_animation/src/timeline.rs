//! Timeline orchestration for multiple animations
//!
//! A timeline is an immutable tree: each child is a tween or a nested timeline
//! placed at an offset. Durations are fixed when the tree is built, and reading
//! the tree at a time never changes it.

use reel_core::PropertySnapshot;

use crate::error::{ConfigurationError, Result};
use crate::stagger::Stagger;
use crate::timing::{Playback, Repeat};
use crate::tween::{Tween, TweenBuilder, TweenDefaults};

/// A node of the animation tree
#[derive(Clone, Debug)]
pub enum Node {
    Tween(Tween),
    Timeline(Timeline),
}

impl Node {
    /// Duration of one cycle of this node
    pub fn cycle_duration(&self) -> f64 {
        match self {
            Node::Tween(tween) => tween.duration(),
            Node::Timeline(timeline) => timeline.duration(),
        }
    }

    /// Duration including repeats
    pub fn total_duration(&self) -> f64 {
        match self {
            Node::Tween(tween) => tween.total_duration(),
            Node::Timeline(timeline) => timeline.total_duration(),
        }
    }

    fn contribute(&self, time: f64, out: &mut PropertySnapshot) -> Result<()> {
        match self {
            Node::Tween(tween) => tween.contribute(time, out),
            Node::Timeline(timeline) => timeline.contribute(time, out),
        }
    }
}

impl From<Tween> for Node {
    fn from(tween: Tween) -> Self {
        Node::Tween(tween)
    }
}

impl From<Timeline> for Node {
    fn from(timeline: Timeline) -> Self {
        Node::Timeline(timeline)
    }
}

/// A node placed inside a timeline
#[derive(Clone, Debug)]
pub struct Child {
    pub node: Node,
    /// Start time relative to the parent's local time
    pub offset: f64,
    /// Time the child is already into its own playback when it starts
    pub phase: f64,
}

/// A timeline that orchestrates multiple animations
#[derive(Clone, Debug)]
pub struct Timeline {
    children: Vec<Child>,
    duration: f64,
    playback: Playback,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    /// Duration of one cycle: the latest end among the children
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Duration including repeats
    pub fn total_duration(&self) -> f64 {
        self.playback.total_duration(self.duration)
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Resolve every animated property at `time`
    ///
    /// Times before zero read as zero. Children are merged in declaration order, so
    /// a later child writing the same key wins.
    pub fn evaluate(&self, time: f64) -> Result<PropertySnapshot> {
        ConfigurationError::check_finite("seek time", time)?;
        let mut snapshot = PropertySnapshot::new();
        self.write_at(time, &mut snapshot)?;
        Ok(snapshot)
    }

    fn contribute(&self, time: f64, out: &mut PropertySnapshot) -> Result<()> {
        if time < 0.0 {
            // Not started; children stay before their own starts too
            for child in &self.children {
                child.node.contribute(time - child.offset, out)?;
            }
            return Ok(());
        }
        self.write_at(time, out)
    }

    fn write_at(&self, time: f64, out: &mut PropertySnapshot) -> Result<()> {
        let local = self.playback.resolve(time, self.duration).local;

        for child in &self.children {
            let child_time = local - child.offset;
            if child_time < 0.0 {
                // Not started; only backwards-filling tweens write anything
                child.node.contribute(child_time, out)?;
            } else {
                child.node.contribute(child_time + child.phase, out)?;
            }
        }
        Ok(())
    }
}

/// Where a child is placed in its parent
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Absolute time from the timeline's start
    At(f64),
    /// At the current end of the timeline
    End,
    /// `dt` after the current end; negative values overlap
    Relative(f64),
    /// Same start as the previously added child
    WithPrevious,
}

impl From<f64> for Position {
    fn from(time: f64) -> Self {
        Position::At(time)
    }
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Time(f64),
    Progress(f64),
}

enum PendingNode {
    Built(Node),
    Tween(TweenBuilder),
    StaggeredTween(TweenBuilder, Stagger),
    Staggered(Vec<Node>, Stagger),
}

struct Pending {
    node: PendingNode,
    position: Position,
    phase: Phase,
}

/// Builder for [`Timeline`]
///
/// # Example
///
/// ```rust
/// use reel_animation::{Easing, Position, Repeat, Timeline, Tween};
/// use reel_core::{ElementId, Property};
///
/// let timeline = Timeline::builder()
///     .repeat(Repeat::Infinite)
///     .tween(
///         Tween::builder().target("a").from_to(Property::X, 0.0, 1.0).duration(1.0),
///         Position::At(0.0),
///     )
///     .tween(
///         Tween::builder().target("b").from_to(Property::X, 0.0, 1.0).duration(1.0),
///         Position::End,
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(timeline.duration(), 2.0);
/// assert_eq!(timeline.evaluate(2.5).unwrap(), timeline.evaluate(0.5).unwrap());
/// ```
pub struct TimelineBuilder {
    pending: Vec<Pending>,
    playback: Playback,
    defaults: TweenDefaults,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            playback: Playback::ONCE,
            defaults: TweenDefaults::default(),
        }
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.playback.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.playback.yoyo = yoyo;
        self
    }

    /// Duration and easing for tweens added through this builder that set neither
    pub fn defaults(mut self, defaults: TweenDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add a built tween or timeline
    pub fn add(self, node: impl Into<Node>, position: impl Into<Position>) -> Self {
        self.push(PendingNode::Built(node.into()), position.into(), Phase::Time(0.0))
    }

    /// Add a node that starts `progress` (`0..=1`) of the way into its first cycle
    pub fn add_at_progress(
        self,
        node: impl Into<Node>,
        position: impl Into<Position>,
        progress: f64,
    ) -> Self {
        self.push(
            PendingNode::Built(node.into()),
            position.into(),
            Phase::Progress(progress),
        )
    }

    /// Add a tween, applying this timeline's defaults
    pub fn tween(self, tween: TweenBuilder, position: impl Into<Position>) -> Self {
        self.push(PendingNode::Tween(tween), position.into(), Phase::Time(0.0))
    }

    /// Add a zero-duration tween that holds its values from `position` on
    pub fn set(self, tween: TweenBuilder, position: impl Into<Position>) -> Self {
        self.tween(tween.duration(0.0), position)
    }

    /// Add one tween per target of `tween`, start times spread by `stagger`
    pub fn staggered_tween(
        self,
        tween: TweenBuilder,
        stagger: Stagger,
        position: impl Into<Position>,
    ) -> Self {
        self.push(
            PendingNode::StaggeredTween(tween, stagger),
            position.into(),
            Phase::Time(0.0),
        )
    }

    /// Add sibling nodes, start times spread by `stagger`
    pub fn add_staggered<I>(self, nodes: I, stagger: Stagger, position: impl Into<Position>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let nodes = nodes.into_iter().map(Into::into).collect();
        self.push(
            PendingNode::Staggered(nodes, stagger),
            position.into(),
            Phase::Time(0.0),
        )
    }

    fn push(mut self, node: PendingNode, position: Position, phase: Phase) -> Self {
        self.pending.push(Pending {
            node,
            position,
            phase,
        });
        self
    }

    pub fn build(self) -> Result<Timeline> {
        let mut children = Vec::new();
        let mut end = 0.0_f64;
        let mut previous_start = 0.0_f64;

        for pending in self.pending {
            let start = match pending.position {
                Position::At(time) => time,
                Position::End => end,
                Position::Relative(dt) => end + dt,
                Position::WithPrevious => previous_start,
            };
            let start = ConfigurationError::check_finite("position", start)?;
            if start < 0.0 {
                return Err(ConfigurationError::NegativeOffset(start));
            }
            previous_start = start;

            let placed: Vec<(Node, f64)> = match pending.node {
                PendingNode::Built(node) => vec![(node, start)],
                PendingNode::Tween(builder) => {
                    vec![(Node::Tween(builder.build_with(&self.defaults)?), start)]
                }
                PendingNode::StaggeredTween(builder, stagger) => {
                    stagger.validate()?;
                    let tweens = builder.split_per_target(&self.defaults)?;
                    let count = tweens.len();
                    tweens
                        .into_iter()
                        .enumerate()
                        .map(|(i, tween)| (Node::Tween(tween), start + stagger.offset(i, count)))
                        .collect()
                }
                PendingNode::Staggered(nodes, stagger) => {
                    stagger.validate()?;
                    let count = nodes.len();
                    nodes
                        .into_iter()
                        .enumerate()
                        .map(|(i, node)| (node, start + stagger.offset(i, count)))
                        .collect()
                }
            };

            for (node, offset) in placed {
                let phase = match pending.phase {
                    Phase::Time(time) => time,
                    Phase::Progress(progress) => {
                        ConfigurationError::check_finite("progress", progress)?
                            * node.cycle_duration()
                    }
                };
                let phase = ConfigurationError::check_finite("phase", phase)?;
                if phase < 0.0 {
                    return Err(ConfigurationError::NegativeOffset(phase));
                }

                // A phased child is already `phase` into its run when it starts
                let remaining = (node.total_duration() - phase).max(0.0);
                end = end.max(offset + remaining);
                children.push(Child {
                    node,
                    offset,
                    phase,
                });
            }
        }

        tracing::debug!(
            "Built timeline: {} children, cycle duration {}",
            children.len(),
            end
        );

        Ok(Timeline {
            children,
            duration: end,
            playback: self.playback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::timing::FillMode;
    use reel_core::{ElementId, Property};

    fn slide(target: &str, duration: f64) -> TweenBuilder {
        Tween::builder()
            .target(target)
            .from_to(Property::X, 0.0, 100.0)
            .duration(duration)
            .easing(Easing::Linear)
    }

    fn x(snapshot: &PropertySnapshot, target: &str) -> Option<f32> {
        snapshot.get_f32(&ElementId::new(target), &Property::X)
    }

    #[test]
    fn test_duration_is_structural() {
        let timeline = Timeline::builder()
            .tween(slide("a", 1.0), 0.0)
            .tween(slide("b", 2.0), 0.5)
            .build()
            .unwrap();
        assert_eq!(timeline.duration(), 2.5);
        assert_eq!(timeline.total_duration(), 2.5);

        let repeated = Timeline::builder()
            .repeat(Repeat::Count(2))
            .tween(slide("a", 1.0), 0.0)
            .build()
            .unwrap();
        assert_eq!(repeated.total_duration(), 3.0);
    }

    #[test]
    fn test_positions() {
        let timeline = Timeline::builder()
            .tween(slide("a", 1.0), Position::End)
            .tween(slide("b", 1.0), Position::End)
            .tween(slide("c", 1.0), Position::WithPrevious)
            .tween(slide("d", 1.0), Position::Relative(-0.5))
            .build()
            .unwrap();

        let offsets: Vec<f64> = timeline.children().iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0.0, 1.0, 1.0, 1.5]);
        assert_eq!(timeline.duration(), 2.5);
    }

    #[test]
    fn test_negative_position_is_rejected() {
        let err = Timeline::builder()
            .tween(slide("a", 1.0), Position::Relative(-1.0))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::NegativeOffset(-1.0));
    }

    #[test]
    fn test_later_children_win() {
        let timeline = Timeline::builder()
            .tween(slide("a", 1.0), 0.0)
            .tween(
                Tween::builder()
                    .target("a")
                    .from_to(Property::X, 500.0, 500.0)
                    .duration(1.0),
                0.0,
            )
            .build()
            .unwrap();
        assert_eq!(x(&timeline.evaluate(0.5).unwrap(), "a"), Some(500.0));
    }

    #[test]
    fn test_unstarted_children_contribute_nothing() {
        let timeline = Timeline::builder()
            .tween(slide("a", 1.0), 0.0)
            .tween(slide("b", 1.0), 1.0)
            .build()
            .unwrap();

        let snapshot = timeline.evaluate(0.5).unwrap();
        assert_eq!(x(&snapshot, "a"), Some(50.0));
        assert_eq!(x(&snapshot, "b"), None);

        // Finished children hold their end values
        let snapshot = timeline.evaluate(1.5).unwrap();
        assert_eq!(x(&snapshot, "a"), Some(100.0));
        assert_eq!(x(&snapshot, "b"), Some(50.0));
    }

    #[test]
    fn test_backwards_fill_renders_before_start() {
        let timeline = Timeline::builder()
            .tween(slide("a", 1.0), 0.0)
            .tween(
                Tween::builder()
                    .target("b")
                    .from_to(Property::Opacity, 0.0, 1.0)
                    .duration(0.01)
                    .fill(FillMode::Both),
                0.75,
            )
            .build()
            .unwrap();

        let snapshot = timeline.evaluate(0.5).unwrap();
        assert_eq!(
            snapshot.get_f32(&ElementId::new("b"), &Property::Opacity),
            Some(0.0)
        );
    }

    #[test]
    fn test_backwards_fill_reaches_through_nesting() {
        let fade = || {
            Tween::builder()
                .target("b")
                .from_to(Property::Opacity, 0.0, 1.0)
                .duration(0.5)
                .fill(FillMode::Both)
        };
        let opacity = |timeline: &Timeline, t: f64| {
            timeline
                .evaluate(t)
                .unwrap()
                .get_f32(&ElementId::new("b"), &Property::Opacity)
        };

        let direct = Timeline::builder()
            .tween(slide("a", 2.0), 0.0)
            .tween(fade(), 1.0)
            .build()
            .unwrap();
        let inner = Timeline::builder().tween(fade(), 0.25).build().unwrap();
        let nested = Timeline::builder()
            .tween(slide("a", 2.0), 0.0)
            .add(Timeline::builder().add(inner, 0.0).build().unwrap(), 0.75)
            .build()
            .unwrap();

        assert_eq!(opacity(&direct, 0.5), Some(0.0));
        assert_eq!(opacity(&nested, 0.5), Some(0.0));
        assert_eq!(opacity(&nested, 0.0), opacity(&direct, 0.0));

        // Forwards-only tweens stay silent before their start at any depth
        let quiet = Timeline::builder()
            .add(
                Timeline::builder().tween(slide("c", 1.0), 0.0).build().unwrap(),
                1.0,
            )
            .build()
            .unwrap();
        assert_eq!(x(&quiet.evaluate(0.5).unwrap(), "c"), None);
    }

    #[test]
    fn test_phase_shortens_finite_children() {
        let timeline = Timeline::builder()
            .add_at_progress(slide("a", 2.0).build().unwrap(), 0.0, 0.5)
            .build()
            .unwrap();
        assert_eq!(timeline.duration(), 1.0);

        let looping = Timeline::builder()
            .repeat(Repeat::Infinite)
            .add_at_progress(slide("a", 2.0).build().unwrap(), 0.5, 0.5)
            .build()
            .unwrap();
        assert_eq!(looping.duration(), 1.5);
        // Every loop restarts the tween at its phase
        assert_eq!(x(&looping.evaluate(2.0).unwrap(), "a"), Some(50.0));

        // Progress past the end leaves nothing to play
        let spent = Timeline::builder()
            .add_at_progress(slide("a", 2.0).build().unwrap(), 0.25, 2.0)
            .build()
            .unwrap();
        assert_eq!(spent.duration(), 0.25);
    }

    #[test]
    fn test_defaults_apply_to_tweens() {
        let timeline = Timeline::builder()
            .defaults(TweenDefaults {
                duration: 1.0,
                easing: Easing::EaseInOutQuart,
            })
            .tween(Tween::builder().target("a").from_to(Property::X, 0.0, 1.0), 0.0)
            .tween(
                Tween::builder()
                    .target("b")
                    .from_to(Property::X, 0.0, 1.0)
                    .duration(2.0)
                    .easing(Easing::Linear),
                0.0,
            )
            .build()
            .unwrap();

        let Node::Tween(first) = &timeline.children()[0].node else {
            panic!("expected tween");
        };
        assert_eq!(first.duration(), 1.0);
        assert_eq!(first.easing(), Easing::EaseInOutQuart);
        assert_eq!(timeline.duration(), 2.0);
    }

    #[test]
    fn test_staggered_tween_splits_per_target() {
        let timeline = Timeline::builder()
            .staggered_tween(
                Tween::builder()
                    .targets(["d0", "d1", "d2"])
                    .from_to(Property::Opacity, 0.0, 1.0)
                    .duration(0.01),
                Stagger::each(-0.05),
                0.0,
            )
            .build()
            .unwrap();

        let offsets: Vec<f64> = timeline.children().iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0.1, 0.05, 0.0]);

        let Node::Tween(last) = &timeline.children()[2].node else {
            panic!("expected tween");
        };
        assert_eq!(last.targets()[0].index, 2);
        assert_eq!(last.targets()[0].count, 3);
    }

    #[test]
    fn test_phase_shifts_child_playback() {
        let looping = Timeline::builder()
            .repeat(Repeat::Infinite)
            .tween(slide("a", 2.0), 0.0)
            .build()
            .unwrap();

        let parent = Timeline::builder()
            .add_at_progress(looping, 0.0, 0.25)
            .build()
            .unwrap();

        assert_eq!(parent.children()[0].phase, 0.5);
        assert_eq!(x(&parent.evaluate(0.0).unwrap(), "a"), Some(25.0));
        assert_eq!(x(&parent.evaluate(1.0).unwrap(), "a"), Some(75.0));
    }

    #[test]
    fn test_zero_duration_timeline() {
        let timeline = Timeline::builder()
            .repeat(Repeat::Infinite)
            .yoyo(true)
            .set(Tween::builder().target("face").set(Property::Z, 200.0), 0.0)
            .build()
            .unwrap();

        assert_eq!(timeline.duration(), 0.0);
        for t in [0.0, 1.0, 1e6] {
            let snapshot = timeline.evaluate(t).unwrap();
            assert_eq!(snapshot.get_f32(&ElementId::new("face"), &Property::Z), Some(200.0));
        }
    }

    #[test]
    fn test_non_finite_seek_is_rejected() {
        let timeline = Timeline::builder().tween(slide("a", 1.0), 0.0).build().unwrap();
        assert!(matches!(
            timeline.evaluate(f64::NAN),
            Err(ConfigurationError::NonFinite { .. })
        ));
    }
}
