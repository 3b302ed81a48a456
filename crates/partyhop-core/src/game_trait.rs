use serde::{Deserialize, Serialize};

use crate::input::InputState;
use crate::viewport::Viewport;

/// Core trait that every partyhop mini-game implements.
///
/// The runner owns scheduling, input tracking, and view teardown;
/// the game only handles its own simulation state.
pub trait MiniGame: Send {
    /// Immutable view of the game handed to renderers once per frame.
    type Snapshot: Clone + Send + 'static;

    /// Game metadata for the intro screen.
    fn metadata(&self) -> GameMetadata;

    /// Explicit start trigger (the intro overlay's "Start" action).
    fn start(&mut self);

    /// Advance the game by `dt` nominal frames. Returns a list of game events.
    fn update(&mut self, dt: f32, input: &InputState) -> Vec<GameEvent>;

    /// Re-derive everything that depends on the viewport.
    fn resize(&mut self, viewport: Viewport);

    /// Owned copy of the current state for rendering.
    fn snapshot(&self) -> Self::Snapshot;

    /// Serialize the full game state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the game state with a previously serialized one.
    fn apply_state(&mut self, state: &[u8]);

    /// Current lifecycle phase.
    fn phase(&self) -> GamePhase;

    /// Whether the completion signal has been emitted.
    fn is_complete(&self) -> bool;
}

/// Game metadata for the intro screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub controls: Vec<String>,
}

/// Lifecycle of a mini-game instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    Running,
    Completed,
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The goal was reached; the celebration is playing.
    GiftCollected,
    /// The celebration delay elapsed. Emitted at most once per level instance.
    Completed,
}

/// Generates the serialization and lifecycle boilerplate shared by mini-games:
/// `serialize_state`, `apply_state`, `phase`, `is_complete`.
///
/// Requires the implementing struct to have a `state: $StateType` field, and
/// `$StateType` to have `phase: GamePhase` and `completion_emitted: bool` fields.
#[macro_export]
macro_rules! minigame_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::warn!(error = %e, "Ignoring undecodable game state"),
            }
        }

        fn phase(&self) -> $crate::game_trait::GamePhase {
            self.state.phase
        }

        fn is_complete(&self) -> bool {
            self.state.completion_emitted
        }
    };
}
