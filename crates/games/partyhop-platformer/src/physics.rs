use serde::{Deserialize, Serialize};

use partyhop_core::input::InputState;

use crate::config::PhysicsConfig;
use crate::level::Platform;

/// Downward acceleration per nominal frame.
pub const GRAVITY: f32 = 0.5;
/// Horizontal velocity multiplier per frame with no direction held.
pub const FRICTION: f32 = 0.8;
/// Vertical velocity set on jump (y grows downward).
pub const JUMP_IMPULSE: f32 = -15.0;
/// Horizontal speed while a direction is held.
pub const MOVE_SPEED: f32 = 5.0;
/// Actor width for AABB collision.
pub const ACTOR_WIDTH: f32 = 30.0;
/// Actor height for AABB collision.
pub const ACTOR_HEIGHT: f32 = 30.0;
/// Slack below a platform top that still counts as approaching from above.
pub const LANDING_TOLERANCE: f32 = 10.0;
/// Largest dt integrated in one step.
pub const MAX_STEP_DT: f32 = 10.0;

/// Axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Strict overlap: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }
}

/// The player-controlled rectangle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// Mid-jump. Set by a jump, cleared on landing.
    pub airborne: bool,
    /// Resting on a platform after the most recent step.
    pub grounded: bool,
}

impl Actor {
    pub fn new(x: f32, y: f32, config: &PhysicsConfig) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width: config.actor_width,
            height: config.actor_height,
            airborne: false,
            grounded: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Put the actor back at a spawn point with no motion.
    pub fn respawn(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.airborne = false;
        self.grounded = false;
    }
}

/// How an overlap with a platform was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Landing,
    Ceiling,
    PushLeft,
    PushRight,
}

/// Pick the resolution rule for an overlap, first match wins.
///
/// `prev` is the actor's box before this step's integration.
pub fn classify_contact(prev: &Rect, platform: &Rect, vy: f32, tolerance: f32) -> Option<Contact> {
    if prev.bottom() <= platform.top + tolerance && vy > 0.0 {
        Some(Contact::Landing)
    } else if prev.top >= platform.bottom() && vy < 0.0 {
        Some(Contact::Ceiling)
    } else if prev.right() >= platform.left && prev.left < platform.left {
        Some(Contact::PushLeft)
    } else if prev.left <= platform.right() && prev.right() > platform.right() {
        Some(Contact::PushRight)
    } else {
        None
    }
}

/// Non-finite or negative dt becomes zero; large dt is capped.
///
/// The cap bounds how many sub-steps a single call may run. It does not by
/// itself keep the actor inside the world. See [`step_actor`].
pub fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max_dt)
}

/// Longest slice of time integrated in one go. At one nominal frame the
/// actor cannot travel past the ground's thickness within a sub-step.
pub const MAX_SUBSTEP_DT: f32 = 1.0;

fn clamp_to_world(x: f32, actor_width: f32, world_width: f32) -> f32 {
    let max_x = (world_width - actor_width).max(0.0);
    x.clamp(0.0, max_x)
}

/// Advance the actor by `dt` nominal frames.
///
/// Long steps are split into sub-steps of at most [`MAX_SUBSTEP_DT`], so a
/// frame hitch cannot carry the actor through a platform.
pub fn step_actor(
    actor: &mut Actor,
    input: &InputState,
    platforms: &[Platform],
    world_width: f32,
    config: &PhysicsConfig,
    dt: f32,
) {
    let dt = sanitize_dt(dt, config.max_step_dt);
    // Equal slices, so no sliver of leftover time gets its own sub-step
    let substeps = (dt / MAX_SUBSTEP_DT).ceil().max(1.0) as u32;
    let slice = dt / substeps as f32;
    for _ in 0..substeps {
        integrate(actor, input, platforms, world_width, config, slice);
    }
}

/// One sub-step. Platforms are visited in level order; each overlapping
/// platform is resolved independently against the already-adjusted position.
fn integrate(
    actor: &mut Actor,
    input: &InputState,
    platforms: &[Platform],
    world_width: f32,
    config: &PhysicsConfig,
    dt: f32,
) {
    let prev = actor.bounds();

    // Horizontal: right overrides left when both are held
    if input.left {
        actor.vx = -config.move_speed;
    }
    if input.right {
        actor.vx = config.move_speed;
    }
    if !input.left && !input.right {
        actor.vx *= config.friction.powf(dt);
    }

    actor.vy += config.gravity * dt;

    let mut x = actor.x + actor.vx * dt;
    let mut y = actor.y + actor.vy * dt;
    x = clamp_to_world(x, actor.width, world_width);

    let mut grounded = false;
    for platform in platforms {
        let tile = platform.bounds();
        let tentative = Rect::new(x, y, actor.width, actor.height);
        if !tentative.overlaps(&tile) {
            continue;
        }

        match classify_contact(&prev, &tile, actor.vy, config.landing_tolerance) {
            Some(Contact::Landing) => {
                y = tile.top - actor.height;
                actor.vy = 0.0;
                grounded = true;
            },
            Some(Contact::Ceiling) => {
                y = tile.bottom();
                actor.vy = 0.0;
            },
            Some(Contact::PushLeft) => {
                x = tile.left - actor.width;
            },
            Some(Contact::PushRight) => {
                x = tile.right();
            },
            None => {},
        }
    }

    actor.x = clamp_to_world(x, actor.width, world_width);
    actor.y = y;
    actor.grounded = grounded;
    if grounded {
        actor.airborne = false;
    }

    // A landing above has already cleared `airborne`, so grounded is the whole guard
    if input.jump && actor.grounded {
        actor.vy = config.jump_impulse;
        actor.airborne = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use partyhop_core::viewport::Viewport;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn level() -> Level {
        Level::derive(Viewport::new(W, H))
    }

    /// Actor resting on the ground at the given x.
    fn resting_actor(level: &Level, x: f32) -> Actor {
        let cfg = PhysicsConfig::default();
        let mut actor = Actor::new(x, level.ground().top() - cfg.actor_height, &cfg);
        actor.grounded = true;
        actor
    }

    fn step(actor: &mut Actor, input: InputState, level: &Level) {
        step_actor(
            actor,
            &input,
            &level.platforms,
            level.viewport.width,
            &PhysicsConfig::default(),
            1.0,
        );
    }

    #[test]
    fn gravity_pulls_down() {
        let level = level();
        let mut actor = Actor::new(50.0, 100.0, &PhysicsConfig::default());
        step(&mut actor, InputState::default(), &level);
        assert_eq!(actor.vy, GRAVITY);
        assert!(actor.y > 100.0);
    }

    #[test]
    fn falls_onto_ground_from_spawn() {
        let level = level();
        let mut actor = Actor::new(level.spawn_x, level.spawn_y, &PhysicsConfig::default());
        for _ in 0..60 {
            step(&mut actor, InputState::default(), &level);
        }
        assert!(actor.grounded);
        assert_eq!(actor.vy, 0.0);
        assert_eq!(actor.y, level.ground().top() - ACTOR_HEIGHT);
    }

    #[test]
    fn resting_is_steady_state() {
        let level = level();
        let mut actor = resting_actor(&level, 300.0);
        let start = actor.clone();
        for _ in 0..50 {
            step(&mut actor, InputState::default(), &level);
            assert_eq!(actor.x, start.x);
            assert_eq!(actor.y, start.y);
            assert_eq!(actor.vy, 0.0);
            assert!(actor.grounded);
        }
    }

    #[test]
    fn jump_from_rest_applies_impulse_same_step() {
        let level = level();
        let mut actor = resting_actor(&level, 300.0);
        step(
            &mut actor,
            InputState {
                jump: true,
                ..Default::default()
            },
            &level,
        );
        assert_eq!(actor.vy, JUMP_IMPULSE);
        assert!(actor.airborne);
    }

    #[test]
    fn no_jump_while_in_the_air() {
        let level = level();
        let mut actor = Actor::new(300.0, 200.0, &PhysicsConfig::default());
        step(
            &mut actor,
            InputState {
                jump: true,
                ..Default::default()
            },
            &level,
        );
        assert!(actor.vy > 0.0, "Mid-air jump must be ignored");
        assert!(!actor.airborne);
    }

    #[test]
    fn holding_jump_does_not_double_jump() {
        let level = level();
        let mut actor = resting_actor(&level, 300.0);
        let jump = InputState {
            jump: true,
            ..Default::default()
        };
        step(&mut actor, jump, &level);
        for _ in 0..5 {
            step(&mut actor, jump, &level);
            assert!(actor.vy > JUMP_IMPULSE, "Impulse must not be re-applied mid-air");
        }
    }

    #[test]
    fn right_overrides_left_when_both_held() {
        let level = level();
        let mut actor = Actor::new(300.0, 200.0, &PhysicsConfig::default());
        step(
            &mut actor,
            InputState {
                left: true,
                right: true,
                jump: false,
            },
            &level,
        );
        assert_eq!(actor.vx, MOVE_SPEED);
    }

    #[test]
    fn friction_decays_without_sign_flip() {
        let level = level();
        let mut actor = resting_actor(&level, 300.0);
        actor.vx = MOVE_SPEED;
        let mut last = actor.vx;
        for _ in 0..30 {
            step(&mut actor, InputState::default(), &level);
            assert!(actor.vx >= 0.0);
            assert!(actor.vx < last);
            last = actor.vx;
        }
    }

    #[test]
    fn x_clamped_at_left_wall() {
        let level = level();
        let mut actor = resting_actor(&level, 2.0);
        for _ in 0..5 {
            step(
                &mut actor,
                InputState {
                    left: true,
                    ..Default::default()
                },
                &level,
            );
        }
        assert_eq!(actor.x, 0.0);
    }

    #[test]
    fn x_clamped_at_right_wall() {
        let level = level();
        let mut actor = resting_actor(&level, W - ACTOR_WIDTH - 2.0);
        for _ in 0..5 {
            step(
                &mut actor,
                InputState {
                    right: true,
                    ..Default::default()
                },
                &level,
            );
        }
        assert_eq!(actor.x, W - ACTOR_WIDTH);
    }

    #[test]
    fn head_bump_stops_upward_velocity() {
        let level = level();
        // Just below the left-lower platform (bottom edge at 460)
        let lower = level.platforms[1].bounds();
        let mut actor = Actor::new(
            lower.left + 20.0,
            lower.bottom() + 2.0,
            &PhysicsConfig::default(),
        );
        actor.vy = -10.0;
        step(&mut actor, InputState::default(), &level);
        assert_eq!(actor.y, lower.bottom());
        assert_eq!(actor.vy, 0.0);
    }

    #[test]
    fn side_push_from_left() {
        let level = level();
        let lower = level.platforms[1].bounds();
        // Beside the platform, vertically inside it, moving right
        let mut actor = Actor::new(
            lower.left - ACTOR_WIDTH,
            lower.top - 5.0,
            &PhysicsConfig::default(),
        );
        actor.vy = -1.0;
        step(
            &mut actor,
            InputState {
                right: true,
                ..Default::default()
            },
            &level,
        );
        assert_eq!(actor.x, lower.left - ACTOR_WIDTH);
    }

    #[test]
    fn side_push_from_right() {
        let level = level();
        let lower = level.platforms[1].bounds();
        let mut actor = Actor::new(lower.right(), lower.top - 5.0, &PhysicsConfig::default());
        actor.vy = -1.0;
        step(
            &mut actor,
            InputState {
                left: true,
                ..Default::default()
            },
            &level,
        );
        assert_eq!(actor.x, lower.right());
    }

    #[test]
    fn landing_tolerance_catches_shallow_entry() {
        let level = level();
        let lower = level.platforms[1].bounds();
        // Previous bottom edge 5px below the top: still inside the tolerance
        let mut actor = Actor::new(
            lower.left + 20.0,
            lower.top + 5.0 - ACTOR_HEIGHT,
            &PhysicsConfig::default(),
        );
        actor.vy = 2.0;
        step(&mut actor, InputState::default(), &level);
        assert!(actor.grounded);
        assert_eq!(actor.y, lower.top - ACTOR_HEIGHT);
    }

    #[test]
    fn classify_priority_order() {
        let platform = Rect::new(100.0, 100.0, 100.0, 20.0);
        let above = Rect::new(120.0, 60.0, 30.0, 30.0);
        assert_eq!(classify_contact(&above, &platform, 1.0, 10.0), Some(Contact::Landing));
        assert_eq!(classify_contact(&above, &platform, -1.0, 10.0), None);

        let below = Rect::new(120.0, 125.0, 30.0, 30.0);
        assert_eq!(classify_contact(&below, &platform, -1.0, 10.0), Some(Contact::Ceiling));

        let left = Rect::new(75.0, 95.0, 30.0, 30.0);
        assert_eq!(classify_contact(&left, &platform, -1.0, 10.0), Some(Contact::PushLeft));

        let right = Rect::new(195.0, 95.0, 30.0, 30.0);
        assert_eq!(classify_contact(&right, &platform, -1.0, 10.0), Some(Contact::PushRight));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 10.0, 10.0)));
    }

    #[test]
    fn sanitize_rejects_bad_dt() {
        assert_eq!(sanitize_dt(f32::NAN, MAX_STEP_DT), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY, MAX_STEP_DT), 0.0);
        assert_eq!(sanitize_dt(-1.0, MAX_STEP_DT), 0.0);
        assert_eq!(sanitize_dt(1e9, MAX_STEP_DT), MAX_STEP_DT);
        assert_eq!(sanitize_dt(1.5, MAX_STEP_DT), 1.5);
    }

    #[test]
    fn nan_dt_leaves_state_finite() {
        let level = level();
        let mut actor = Actor::new(300.0, 200.0, &PhysicsConfig::default());
        step_actor(
            &mut actor,
            &InputState::default(),
            &level.platforms,
            W,
            &PhysicsConfig::default(),
            f32::NAN,
        );
        assert!(actor.x.is_finite() && actor.y.is_finite());
        assert!(actor.vx.is_finite() && actor.vy.is_finite());
    }

    #[test]
    fn world_narrower_than_actor_pins_to_zero() {
        let level = Level::derive(Viewport::new(10.0, 600.0));
        let mut actor = Actor::new(5.0, 100.0, &PhysicsConfig::default());
        step(
            &mut actor,
            InputState {
                right: true,
                ..Default::default()
            },
            &level,
        );
        assert_eq!(actor.x, 0.0);
    }

    #[test]
    fn frame_hitch_after_jump_still_lands_on_ground() {
        let level = level();
        let cfg = PhysicsConfig::default();
        let ground_top = level.ground().top();
        for dt in [5.0, 10.0] {
            // Clear of every raised platform
            let mut actor = resting_actor(&level, 720.0);
            step(
                &mut actor,
                InputState {
                    jump: true,
                    ..Default::default()
                },
                &level,
            );
            assert!(actor.airborne);
            for _ in 0..20 {
                step_actor(&mut actor, &InputState::default(), &level.platforms, W, &cfg, dt);
            }
            assert!(actor.grounded, "dt={dt}: actor fell through the ground");
            assert_eq!(actor.y, ground_top - ACTOR_HEIGHT, "dt={dt}");
            assert_eq!(actor.vy, 0.0);
        }
    }

    #[test]
    fn long_step_matches_unit_steps() {
        let level = level();
        let cfg = PhysicsConfig::default();
        let mut one = Actor::new(700.0, 100.0, &cfg);
        let mut many = one.clone();
        step_actor(&mut one, &InputState::default(), &level.platforms, W, &cfg, 4.0);
        for _ in 0..4 {
            step_actor(&mut many, &InputState::default(), &level.platforms, W, &cfg, 1.0);
        }
        assert_eq!(one, many);
    }

    // ================================================================
    // Property-based tests (proptest)
    // ================================================================

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn input_strategy() -> impl Strategy<Value = InputState> {
            (any::<bool>(), any::<bool>(), any::<bool>())
                .prop_map(|(left, right, jump)| InputState { left, right, jump })
        }

        proptest! {
            #[test]
            fn state_stays_finite_and_in_bounds(
                width in 40.0f32..1200.0,
                height in 120.0f32..900.0,
                frames in proptest::collection::vec((0.0f32..20.0, input_strategy()), 1..200)
            ) {
                let level = Level::derive(Viewport::new(width, height));
                let cfg = PhysicsConfig::default();
                let spawn_x = level.spawn_x.min(width - cfg.actor_width).max(0.0);
                let mut actor = Actor::new(spawn_x, level.spawn_y, &cfg);

                for (dt, input) in &frames {
                    step_actor(&mut actor, input, &level.platforms, width, &cfg, *dt);
                    prop_assert!(actor.x.is_finite() && actor.y.is_finite());
                    prop_assert!(actor.vx.is_finite() && actor.vy.is_finite());
                    prop_assert!(actor.x >= 0.0);
                    prop_assert!(
                        actor.x <= width - cfg.actor_width,
                        "x={} exceeds {}", actor.x, width - cfg.actor_width
                    );
                }
            }

            #[test]
            fn any_dt_is_safe(dt in any::<f32>(), input in input_strategy()) {
                let level = level();
                let cfg = PhysicsConfig::default();
                let mut actor = Actor::new(300.0, 200.0, &cfg);
                step_actor(&mut actor, &input, &level.platforms, W, &cfg, dt);
                prop_assert!(actor.x.is_finite() && actor.y.is_finite());
                prop_assert!(actor.vx.is_finite() && actor.vy.is_finite());
            }

            #[test]
            fn resting_stays_put(x in 0.0f32..(W - ACTOR_WIDTH), dt in 0.1f32..5.0) {
                let level = level();
                let mut actor = resting_actor(&level, x);
                let y0 = actor.y;
                let cfg = PhysicsConfig::default();
                for _ in 0..10 {
                    step_actor(&mut actor, &InputState::default(), &level.platforms, W, &cfg, dt);
                }
                prop_assert_eq!(actor.x, x);
                prop_assert_eq!(actor.y, y0);
                prop_assert_eq!(actor.vy, 0.0);
            }
        }
    }
}
