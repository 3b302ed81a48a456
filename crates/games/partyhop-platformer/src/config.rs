use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::physics::{
    ACTOR_HEIGHT, ACTOR_WIDTH, FRICTION, GRAVITY, JUMP_IMPULSE, LANDING_TOLERANCE, MAX_STEP_DT,
    MOVE_SPEED,
};

/// Environment variable naming a standalone platformer config file that
/// overrides the `[platformer]` section of the runner config.
pub const CONFIG_ENV_VAR: &str = "PARTYHOP_PLATFORMER_CONFIG";

/// Actor physics parameters. Velocities are in pixels per nominal frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Per-frame horizontal velocity multiplier when no direction is held.
    pub friction: f32,
    /// Vertical velocity applied on jump (negative is up).
    pub jump_impulse: f32,
    pub move_speed: f32,
    pub actor_width: f32,
    pub actor_height: f32,
    /// How far below a platform top the actor's previous bottom edge may be
    /// and still count as a landing.
    pub landing_tolerance: f32,
    /// Largest dt a single step will integrate.
    pub max_step_dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            jump_impulse: JUMP_IMPULSE,
            move_speed: MOVE_SPEED,
            actor_width: ACTOR_WIDTH,
            actor_height: ACTOR_HEIGHT,
            landing_tolerance: LANDING_TOLERANCE,
            max_step_dt: MAX_STEP_DT,
        }
    }
}

/// Gift size and float animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftConfig {
    pub radius: f32,
    pub float_amplitude: f32,
    /// Phase advance per step, in radians.
    pub float_speed: f32,
    /// Upward drift per step once collected.
    pub collected_drift: f32,
}

impl Default for GiftConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            float_amplitude: 10.0,
            float_speed: 0.05,
            collected_drift: 5.0,
        }
    }
}

/// Decorative confetti.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    pub ambient_count: usize,
    pub celebration_count: usize,
    pub seed: u64,
    /// Set false to skip the cosmetic tick entirely.
    pub enabled: bool,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            ambient_count: 20,
            celebration_count: 100,
            seed: 42,
            enabled: true,
        }
    }
}

/// Top-level platformer configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub physics: PhysicsConfig,
    pub gift: GiftConfig,
    pub confetti: ConfettiConfig,
    /// Pause between collecting the gift and the completion signal.
    pub celebration_delay_ms: f32,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            gift: GiftConfig::default(),
            confetti: ConfettiConfig::default(),
            celebration_delay_ms: 1000.0,
        }
    }
}

impl PlatformerConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_or_default(&content, &path.display().to_string()),
            Err(e) => {
                tracing::warn!("Cannot read {}: {e}, using defaults", path.display());
                PlatformerConfig::default()
            },
        }
    }

    pub(crate) fn from_toml_or_default(content: &str, origin: &str) -> Self {
        match toml::from_str::<PlatformerConfig>(content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to parse {origin}: {e}, using defaults");
                PlatformerConfig::default()
            },
        }
    }

    /// Replace every out-of-range or non-finite value with its default.
    /// Returns one message per replaced field.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut issues = Vec::new();
        let d = PlatformerConfig::default();
        let p = &mut self.physics;

        reset_unless(&mut issues, "physics.gravity", &mut p.gravity, d.physics.gravity, |v| v >= 0.0);
        reset_unless(&mut issues, "physics.friction", &mut p.friction, d.physics.friction, |v| {
            (0.0..1.0).contains(&v)
        });
        reset_unless(
            &mut issues,
            "physics.jump_impulse",
            &mut p.jump_impulse,
            d.physics.jump_impulse,
            |v| v <= 0.0,
        );
        reset_unless(&mut issues, "physics.move_speed", &mut p.move_speed, d.physics.move_speed, |v| {
            v >= 0.0
        });
        reset_unless(&mut issues, "physics.actor_width", &mut p.actor_width, d.physics.actor_width, |v| {
            v > 0.0
        });
        reset_unless(
            &mut issues,
            "physics.actor_height",
            &mut p.actor_height,
            d.physics.actor_height,
            |v| v > 0.0,
        );
        reset_unless(
            &mut issues,
            "physics.landing_tolerance",
            &mut p.landing_tolerance,
            d.physics.landing_tolerance,
            |v| v >= 0.0,
        );
        reset_unless(&mut issues, "physics.max_step_dt", &mut p.max_step_dt, d.physics.max_step_dt, |v| {
            v > 0.0 && v <= MAX_STEP_DT_LIMIT
        });

        let g = &mut self.gift;
        reset_unless(&mut issues, "gift.radius", &mut g.radius, d.gift.radius, |v| v > 0.0);
        reset_unless(
            &mut issues,
            "gift.float_amplitude",
            &mut g.float_amplitude,
            d.gift.float_amplitude,
            |v| v >= 0.0,
        );
        reset_unless(&mut issues, "gift.float_speed", &mut g.float_speed, d.gift.float_speed, |_| true);
        reset_unless(
            &mut issues,
            "gift.collected_drift",
            &mut g.collected_drift,
            d.gift.collected_drift,
            |_| true,
        );

        reset_unless(
            &mut issues,
            "celebration_delay_ms",
            &mut self.celebration_delay_ms,
            d.celebration_delay_ms,
            |v| v >= 0.0,
        );

        issues
    }
}

/// Upper bound for `physics.max_step_dt`, in nominal frames.
const MAX_STEP_DT_LIMIT: f32 = 60.0;

fn reset_unless(
    issues: &mut Vec<String>,
    name: &str,
    value: &mut f32,
    default: f32,
    valid: impl Fn(f32) -> bool,
) {
    if !(value.is_finite() && valid(*value)) {
        issues.push(format!("{name} = {value} is out of range, using {default}"));
        *value = default;
    }
}
