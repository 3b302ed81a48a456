pub mod autopilot;
pub mod confetti;
pub mod config;
pub mod gift;
pub mod level;
pub mod physics;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use partyhop_core::game_trait::{GameEvent, GameMetadata, GamePhase, MiniGame};
use partyhop_core::input::InputState;
use partyhop_core::minigame_boilerplate;
use partyhop_core::time::frames_from_millis;
use partyhop_core::viewport::Viewport;

use confetti::{ConfettiParticle, clamp_confetti, spawn_confetti, update_confetti};
use config::PlatformerConfig;
use gift::Collectible;
use level::{Level, Platform};
use physics::{Actor, sanitize_dt, step_actor};

/// Serializable simulation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformerState {
    pub phase: GamePhase,
    pub level: Level,
    pub actor: Actor,
    pub gift: Collectible,
    pub confetti: Vec<ConfettiParticle>,
    /// Nominal frames left before the completion signal. Set on collection.
    pub celebration_remaining: Option<f32>,
    pub completion_emitted: bool,
    /// Steps executed since start.
    pub frame: u64,
}

/// Read-only view handed to renderers once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub phase: GamePhase,
    pub frame: u64,
    pub viewport: Viewport,
    pub actor: Actor,
    pub platforms: Vec<Platform>,
    pub gift: Collectible,
    pub confetti: Vec<ConfettiParticle>,
}

/// The gift-hunt platformer.
pub struct PlatformerSimulation {
    config: PlatformerConfig,
    state: PlatformerState,
    rng: StdRng,
}

impl PlatformerSimulation {
    pub fn new() -> Self {
        Self::with_config(PlatformerConfig::default(), Viewport::default())
    }

    /// Out-of-range config values are replaced by their defaults, with a warning.
    pub fn with_config(mut config: PlatformerConfig, viewport: Viewport) -> Self {
        for issue in config.sanitize() {
            tracing::warn!("{issue}");
        }
        let mut rng = StdRng::seed_from_u64(config.confetti.seed);
        let level = Level::derive(viewport);
        let (spawn_x, spawn_y) = level.spawn_point(config.physics.actor_width);
        let actor = Actor::new(spawn_x, spawn_y, &config.physics);
        let gift = Collectible::new(level.gift_anchor_x, level.gift_anchor_y, config.gift.radius);
        let confetti = spawn_confetti(&mut rng, config.confetti.ambient_count, viewport);

        Self {
            state: PlatformerState {
                phase: GamePhase::NotStarted,
                level,
                actor,
                gift,
                confetti,
                celebration_remaining: None,
                completion_emitted: false,
                frame: 0,
            },
            config,
            rng,
        }
    }

    pub fn state(&self) -> &PlatformerState {
        &self.state
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.state.level
    }

    /// Deterministic part of a step: actor physics, win check, and the
    /// celebration countdown.
    pub fn step_physics(&mut self, dt: f32, input: &InputState) -> Vec<GameEvent> {
        if self.state.phase == GamePhase::NotStarted {
            return Vec::new();
        }
        let dt = sanitize_dt(dt, self.config.physics.max_step_dt);
        let mut events = Vec::new();
        self.state.frame += 1;

        step_actor(
            &mut self.state.actor,
            input,
            &self.state.level.platforms,
            self.state.level.viewport.width,
            &self.config.physics,
            dt,
        );

        // Countdown runs before the win check so the collecting step does not count
        if let Some(remaining) = self.state.celebration_remaining.as_mut()
            && !self.state.completion_emitted
        {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.state.completion_emitted = true;
                tracing::info!(frame = self.state.frame, "Celebration finished");
                events.push(GameEvent::Completed);
            }
        }

        if !self.state.gift.collected
            && self.state.actor.bounds().overlaps(&self.state.gift.bounds())
            && self.state.gift.collect()
        {
            self.state.phase = GamePhase::Completed;
            self.state.celebration_remaining = Some(frames_from_millis(self.config.celebration_delay_ms));
            self.state.confetti = spawn_confetti(
                &mut self.rng,
                self.config.confetti.celebration_count,
                self.state.level.viewport,
            );
            tracing::info!(
                frame = self.state.frame,
                x = self.state.actor.x,
                y = self.state.actor.y,
                "Gift collected"
            );
            events.push(GameEvent::GiftCollected);
        }

        events
    }

    /// Purely decorative part of a step: gift float/drift and confetti.
    pub fn tick_cosmetics(&mut self, dt: f32) {
        if self.state.phase == GamePhase::NotStarted {
            return;
        }
        let dt = sanitize_dt(dt, self.config.physics.max_step_dt);
        self.state.gift.animate(&self.config.gift);
        if self.config.confetti.enabled {
            update_confetti(&mut self.state.confetti, self.state.level.viewport, dt);
        }
    }

    /// One full step followed by a snapshot.
    pub fn advance(&mut self, dt: f32, input: &InputState) -> (StateSnapshot, Vec<GameEvent>) {
        let events = self.update(dt, input);
        (self.snapshot(), events)
    }

    /// Move the actor directly, bypassing physics.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn place_actor(&mut self, x: f32, y: f32) {
        self.state.actor.respawn(x, y);
    }
}

impl Default for PlatformerSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniGame for PlatformerSimulation {
    type Snapshot = StateSnapshot;

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Gift Hunt".to_string(),
            description: "Jump your way to the gift at the top!".to_string(),
            controls: vec![
                "Arrow keys or WASD to move".to_string(),
                "Space or Up Arrow to jump".to_string(),
                "On touch screens, use the on-screen buttons".to_string(),
            ],
        }
    }

    fn start(&mut self) {
        if self.state.phase == GamePhase::NotStarted {
            self.state.phase = GamePhase::Running;
            tracing::info!("Platformer started");
        }
    }

    fn update(&mut self, dt: f32, input: &InputState) -> Vec<GameEvent> {
        let events = self.step_physics(dt, input);
        self.tick_cosmetics(dt);
        events
    }

    fn resize(&mut self, viewport: Viewport) {
        let level = Level::derive(viewport);
        let (spawn_x, spawn_y) = level.spawn_point(self.state.actor.width);
        self.state.actor.respawn(spawn_x, spawn_y);
        self.state
            .gift
            .reanchor(level.gift_anchor_x, level.gift_anchor_y);
        clamp_confetti(&mut self.state.confetti, viewport);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "Level re-derived for new viewport"
        );
        self.state.level = level;
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            phase: self.state.phase,
            frame: self.state.frame,
            viewport: self.state.level.viewport,
            actor: self.state.actor.clone(),
            platforms: self.state.level.platforms.clone(),
            gift: self.state.gift.clone(),
            confetti: self.state.confetti.clone(),
        }
    }

    minigame_boilerplate!(state_type: PlatformerState);
}
