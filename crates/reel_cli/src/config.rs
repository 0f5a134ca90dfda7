//! Reel configuration file handling

use anyhow::{Context, Result};
use reel_animation::{DiceStackConfig, FrameClock};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in a project directory
pub const CONFIG_FILE: &str = "reel.toml";

/// Top-level Reel configuration (reel.toml)
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ReelConfig {
    #[serde(default)]
    pub composition: DiceStackConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Host settings: frame rate, length and output size
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default = "default_duration_in_frames")]
    pub duration_in_frames: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_fps() -> f64 {
    60.0
}

fn default_duration_in_frames() -> u32 {
    360
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            duration_in_frames: default_duration_in_frames(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl RenderConfig {
    pub fn clock(&self) -> Result<FrameClock> {
        FrameClock::new(self.fps, self.duration_in_frames).context("Invalid [render] settings")
    }
}

impl ReelConfig {
    /// Resolve the config path for `path`, which may be the file or its directory
    pub fn path_in(path: &Path) -> PathBuf {
        if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        }
    }

    /// Load configuration from a directory (looks for reel.toml)
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = Self::path_in(path);

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `reel init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ReelConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config
            .composition
            .validate()
            .with_context(|| format!("Invalid [composition] in {}", config_path.display()))?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_dir(path),
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.exists() {
                    Self::load_from_dir(local)
                } else {
                    tracing::info!("No {} found, using defaults", CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_animation::Repeat;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reel-config-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults_match_original_clip() {
        let config = ReelConfig::default();
        assert_eq!(config.render.fps, 60.0);
        assert_eq!(config.render.duration_in_frames, 360);
        assert_eq!(config.render.width, 1920);
        assert_eq!(config.composition.element_count, 19);
        assert_eq!(config.render.clock().unwrap().duration_seconds(), 6.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ReelConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[composition]"));
        assert!(text.contains("repeat = -1"));

        let parsed: ReelConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file() {
        let config: ReelConfig = toml::from_str(
            r#"
            [composition]
            element_count = 5
            repeat = 3

            [render]
            fps = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(config.composition.element_count, 5);
        assert_eq!(config.composition.repeat, Repeat::Count(3));
        assert_eq!(config.render.fps, 30.0);
        assert_eq!(config.render.duration_in_frames, 360);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = scratch_dir("load");
        fs::write(
            dir.join(CONFIG_FILE),
            "[composition]\neasing = \"expo.in\"\n",
        )
        .unwrap();

        let config = ReelConfig::load_from_dir(&dir).unwrap();
        assert_eq!(config.composition.easing, "expo.in");

        fs::write(
            dir.join(CONFIG_FILE),
            "[composition]\neasing = \"bounce.in\"\n",
        )
        .unwrap();
        let err = ReelConfig::load_from_dir(&dir).unwrap_err();
        assert!(format!("{err:#}").contains("bounce.in"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_points_to_init() {
        let dir = scratch_dir("missing");
        let err = ReelConfig::load_from_dir(&dir).unwrap_err();
        assert!(err.to_string().contains("reel init"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_frame_rate() {
        let render = RenderConfig {
            fps: 0.0,
            ..Default::default()
        };
        assert!(render.clock().is_err());
    }
}
