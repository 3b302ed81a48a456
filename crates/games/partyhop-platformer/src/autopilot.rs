use partyhop_core::input::InputState;

use crate::StateSnapshot;
use crate::level::{GIFT_ROUTE, Platform};
use crate::physics::Actor;

/// Closest horizontal gap to a target platform edge from which a jump is
/// taken. Any closer and the actor would bump the platform's underside.
const TAKEOFF_MIN_GAP: f32 = 40.0;
/// Farthest gap from which the actor jumps instead of walking closer.
const TAKEOFF_MAX_GAP: f32 = 70.0;
/// Horizontal slack when lining up under the gift or over a landing spot.
const ALIGN_SLACK: f32 = 3.0;

/// Scripted controller that climbs the gift route.
///
/// Tracks which route platform it is heading for; the target is
/// re-derived every time the actor is standing on something, so a missed
/// jump just restarts the climb from wherever it landed.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Index into `GIFT_ROUTE`; `GIFT_ROUTE.len()` means "go for the gift".
    stage: usize,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route stage the autopilot is currently working on.
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Decide the held controls for the next step.
    pub fn next_input(&mut self, snapshot: &StateSnapshot) -> InputState {
        if snapshot.gift.collected {
            return InputState::default();
        }
        let actor = &snapshot.actor;

        if actor.grounded {
            self.stage = match standing_on(actor, &snapshot.platforms) {
                Some(index) => GIFT_ROUTE
                    .iter()
                    .position(|&i| i == index)
                    .map_or(0, |pos| pos + 1),
                None => 0,
            };
        }

        let centre = actor.x + actor.width / 2.0;

        if self.stage >= GIFT_ROUTE.len() {
            let dx = snapshot.gift.x - centre;
            let aligned = dx.abs() <= ALIGN_SLACK;
            return InputState {
                left: dx < -ALIGN_SLACK,
                right: dx > ALIGN_SLACK,
                jump: aligned && actor.grounded,
            };
        }

        let Some(target) = snapshot.platforms.get(GIFT_ROUTE[self.stage]) else {
            return InputState::default();
        };

        if !actor.grounded {
            return steer_towards(centre, target.x);
        }

        let bounds = target.bounds();
        let width = snapshot.viewport.width;
        let left_ok = bounds.left - TAKEOFF_MIN_GAP - actor.width >= 0.0;
        let right_ok = bounds.right() + TAKEOFF_MIN_GAP + actor.width <= width;
        let from_left = match (left_ok, right_ok) {
            (true, false) => true,
            (false, true) => false,
            _ => centre < target.x,
        };

        let (gap, toward, away) = if from_left {
            (
                bounds.left - (actor.x + actor.width),
                InputState {
                    right: true,
                    ..Default::default()
                },
                InputState {
                    left: true,
                    ..Default::default()
                },
            )
        } else {
            (
                actor.x - bounds.right(),
                InputState {
                    left: true,
                    ..Default::default()
                },
                InputState {
                    right: true,
                    ..Default::default()
                },
            )
        };

        let pinned = actor.x <= 0.0 || actor.x + actor.width >= width;
        if gap < TAKEOFF_MIN_GAP && !pinned {
            away
        } else if gap <= TAKEOFF_MAX_GAP {
            InputState {
                jump: true,
                ..toward
            }
        } else {
            toward
        }
    }
}

/// Index of the platform the actor's feet are resting on.
fn standing_on(actor: &Actor, platforms: &[Platform]) -> Option<usize> {
    let feet = actor.y + actor.height;
    platforms.iter().position(|p| {
        let b = p.bounds();
        (feet - b.top).abs() < 0.5 && actor.x < b.right() && actor.x + actor.width > b.left
    })
}

fn steer_towards(centre: f32, target_x: f32) -> InputState {
    let dx = target_x - centre;
    InputState {
        left: dx < -ALIGN_SLACK,
        right: dx > ALIGN_SLACK,
        jump: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlatformerSimulation;
    use partyhop_core::game_trait::{GameEvent, MiniGame};

    #[test]
    fn idle_once_gift_is_collected() {
        let mut sim = PlatformerSimulation::new();
        sim.start();
        let gift = sim.state().gift.clone();
        sim.place_actor(gift.x - 15.0, gift.y - 15.0);
        sim.update(1.0, &InputState::default());

        let mut pilot = Autopilot::new();
        assert!(pilot.next_input(&sim.snapshot()).is_idle());
    }

    #[test]
    fn stage_follows_standing_platform() {
        let mut sim = PlatformerSimulation::new();
        sim.start();
        for _ in 0..60 {
            sim.update(1.0, &InputState::default());
        }
        let mut pilot = Autopilot::new();
        pilot.next_input(&sim.snapshot());
        assert_eq!(pilot.stage(), 0);

        // Drop onto the top-right platform, clear of the gift
        let top_right = sim.level().platforms[GIFT_ROUTE[GIFT_ROUTE.len() - 1]].bounds();
        sim.place_actor(top_right.left + 1.0, top_right.top - 40.0);
        for _ in 0..30 {
            sim.update(1.0, &InputState::default());
        }
        pilot.next_input(&sim.snapshot());
        assert_eq!(pilot.stage(), GIFT_ROUTE.len());
    }

    #[test]
    fn backs_away_when_under_target() {
        let mut sim = PlatformerSimulation::new();
        sim.start();
        let lower = sim.level().platforms[GIFT_ROUTE[0]];
        sim.place_actor(lower.x - 15.0, sim.level().ground().top() - 30.0);
        sim.update(1.0, &InputState::default());

        let input = Autopilot::new().next_input(&sim.snapshot());
        assert!(!input.jump);
        assert!(input.left || input.right);
    }

    #[test]
    fn climbs_to_the_gift_at_reference_size() {
        let mut sim = PlatformerSimulation::new();
        sim.start();
        let mut pilot = Autopilot::new();

        let mut collected = false;
        for _ in 0..3000 {
            let input = pilot.next_input(&sim.snapshot());
            if sim.update(1.0, &input).contains(&GameEvent::GiftCollected) {
                collected = true;
                break;
            }
        }
        assert!(collected, "autopilot stalled at stage {}", pilot.stage());
    }
}
