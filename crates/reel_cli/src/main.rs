//! Reel CLI
//!
//! Renders the dice-stack composition headlessly, one JSON object per frame.

mod config;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::config::{ReelConfig, CONFIG_FILE};
use crate::render::RenderOptions;

/// Deterministic timeline renderer
#[derive(Parser, Debug)]
#[command(name = "reel")]
#[command(about = "Render deterministic timelines to per-frame property snapshots")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render frames as JSON lines
    Render {
        /// Config file or directory containing reel.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// First frame to render
        #[arg(long, default_value = "0")]
        from: u32,

        /// Frame to stop before (defaults to the configured length)
        #[arg(long)]
        to: Option<u32>,

        /// Number of frames rendered before elements are mounted
        #[arg(long, default_value = "0")]
        mount_after: u32,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default reel.toml
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing reel.toml
        #[arg(long)]
        force: bool,
    },

    /// Print the composition's structure and durations
    Inspect {
        /// Config file or directory containing reel.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            config,
            from,
            to,
            mount_after,
            output,
        } => {
            let config = ReelConfig::load_or_default(config.as_deref())?;
            let to = to.unwrap_or(config.render.duration_in_frames);
            if to < from {
                anyhow::bail!("--to ({}) must not be before --from ({})", to, from);
            }

            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    fs::File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };

            tracing::info!("Rendering frames {}..{}", from, to);
            render::render(
                &config,
                &RenderOptions {
                    frames: from..to,
                    mount_after,
                },
                &mut out,
            )?;
        }

        Command::Init { path, force } => {
            let config_path = path.join(CONFIG_FILE);
            if config_path.exists() && !force {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite it.",
                    config_path.display()
                );
            }

            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            fs::write(&config_path, ReelConfig::default().to_toml()?)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            tracing::info!("Created {}", config_path.display());
        }

        Command::Inspect { config } => {
            let config = ReelConfig::load_or_default(config.as_deref())?;
            render::inspect(&config, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}
