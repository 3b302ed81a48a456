use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use partyhop_core::flow::find_gift;
use partyhop_core::viewport::Viewport;
use partyhop_platformer::config::{self as platformer_config, PlatformerConfig};

use crate::error::ConfigError;

/// Environment variable naming the runner config file.
pub const CONFIG_ENV_VAR: &str = "PARTYHOP_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "partyhop.toml";

const MIN_FRAME_RATE_HZ: f32 = 1.0;
const MAX_FRAME_RATE_HZ: f32 = 1000.0;
const DEFAULT_FRAME_RATE_HZ: f32 = 60.0;

/// Top-level runner configuration, loaded from `partyhop.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub window: WindowConfig,
    pub frame_loop: LoopConfig,
    pub demo: DemoConfig,
    pub platformer: PlatformerConfig,
}

/// Host window size. The game viewport is derived from it with [`Viewport::fit`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl WindowConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::fit(self.width, self.height)
    }
}

/// Frame scheduler settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    pub frame_rate_hz: f32,
    /// Exit the loop right after the completion signal fires.
    pub stop_on_complete: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
            stop_on_complete: true,
        }
    }
}

impl LoopConfig {
    /// Tick period. Out-of-range rates are clamped; non-finite ones use the default.
    pub fn frame_interval(&self) -> Duration {
        let hz = if self.frame_rate_hz.is_finite() {
            self.frame_rate_hz.clamp(MIN_FRAME_RATE_HZ, MAX_FRAME_RATE_HZ)
        } else {
            DEFAULT_FRAME_RATE_HZ
        };
        Duration::from_secs_f32(1.0 / hz)
    }
}

/// Headless demo run settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Let the autopilot play. When false the game is skipped straight away.
    pub autopilot: bool,
    /// Give up on the autopilot and take the skip path after this long.
    pub timeout_secs: u64,
    /// Gift to pick on the final screen. Defaults to the first catalog entry.
    pub gift: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            autopilot: true,
            timeout_secs: 60,
            gift: None,
        }
    }
}

impl RunnerConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from `$PARTYHOP_CONFIG` (or `partyhop.toml`), falling back
    /// to defaults when the file is missing or unparseable. A standalone
    /// platformer file named by `$PARTYHOP_PLATFORMER_CONFIG` then replaces
    /// the `[platformer]` section.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = match Self::from_file(Path::new(&path)) {
            Ok(cfg) => {
                tracing::info!(path = %path, "Loaded configuration");
                cfg
            },
            Err(ConfigError::Read { .. }) => {
                tracing::info!(path = %path, "No config file found, using defaults");
                RunnerConfig::default()
            },
            Err(e) => {
                tracing::warn!("{e}, using defaults");
                RunnerConfig::default()
            },
        };
        if let Ok(override_path) = std::env::var(platformer_config::CONFIG_ENV_VAR) {
            cfg.apply_platformer_override(Path::new(&override_path));
        }
        cfg
    }

    /// Replace the `[platformer]` section with a standalone platformer config file.
    pub fn apply_platformer_override(&mut self, path: &Path) {
        self.platformer = PlatformerConfig::load_from(path);
        tracing::info!(path = %path.display(), "Platformer config overridden");
    }

    /// Validate configuration, logging a warning for each issue found.
    /// Returns the warnings so callers can surface them.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let hz = self.frame_loop.frame_rate_hz;
        if !hz.is_finite() || !(MIN_FRAME_RATE_HZ..=MAX_FRAME_RATE_HZ).contains(&hz) {
            warnings.push(format!(
                "frame_loop.frame_rate_hz = {hz} is outside {MIN_FRAME_RATE_HZ}..={MAX_FRAME_RATE_HZ}, it will be clamped"
            ));
        }
        if self.window.height <= partyhop_core::viewport::CONTROLS_RESERVE {
            warnings.push(format!(
                "window.height = {} leaves no room for the game above the controls",
                self.window.height
            ));
        }
        if self.window.width < self.platformer.physics.actor_width {
            warnings.push(format!(
                "window.width = {} is narrower than the actor",
                self.window.width
            ));
        }
        if self.demo.autopilot && self.demo.timeout_secs == 0 {
            warnings.push("demo.timeout_secs = 0 skips the game immediately".to_string());
        }
        if let Some(id) = &self.demo.gift
            && find_gift(id).is_none()
        {
            warnings.push(format!("demo.gift = {id:?} is not in the gift catalog"));
        }
        // The game resets these to defaults itself; report them here as well
        warnings.extend(
            self.platformer
                .clone()
                .sanitize()
                .into_iter()
                .map(|issue| format!("platformer.{issue}")),
        );

        for w in &warnings {
            tracing::warn!("{w}");
        }
        warnings
    }
}
