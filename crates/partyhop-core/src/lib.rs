pub mod flow;
pub mod game_trait;
pub mod input;
pub mod time;
pub mod viewport;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{GameEvent, GamePhase, MiniGame};
    use crate::input::InputState;
    use crate::viewport::Viewport;

    /// Run N updates with the same input, returning all accumulated events.
    pub fn run_frames<G: MiniGame + ?Sized>(
        game: &mut G,
        n: usize,
        dt: f32,
        input: &InputState,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt, input));
        }
        all_events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed<G: MiniGame + ?Sized>(game: &G, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // MiniGame Contract Tests
    // ================================================================
    // Generic checks every MiniGame implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules with a fresh instance.

    /// update() before start() must not change anything.
    pub fn contract_update_before_start_is_noop<G: MiniGame + ?Sized>(game: &mut G) {
        assert_eq!(game.phase(), GamePhase::NotStarted);
        let before = game.serialize_state();
        let events = run_frames(game, 10, 1.0, &InputState::default());
        assert!(events.is_empty(), "No events before start");
        assert_eq!(
            before,
            game.serialize_state(),
            "State must not change before start"
        );
    }

    /// start() followed by update(dt>0) must advance the state.
    pub fn contract_start_enables_updates<G: MiniGame + ?Sized>(game: &mut G) {
        game.start();
        assert_eq!(game.phase(), GamePhase::Running);
        let before = game.serialize_state();
        game.update(1.0, &InputState::default());
        assert_game_state_changed(game, &before);
    }

    /// start() is idempotent once running.
    pub fn contract_start_twice_is_noop<G: MiniGame + ?Sized>(game: &mut G) {
        game.start();
        let before = game.serialize_state();
        game.start();
        assert_eq!(before, game.serialize_state(), "Second start must be a no-op");
    }

    /// serialize_state → apply_state must be stable after one roundtrip.
    pub fn contract_state_roundtrip_preserves<G: MiniGame + ?Sized>(game: &mut G) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(state_a, state_b, "State must survive serialize→apply");
    }

    /// Garbage passed to apply_state must leave the game untouched.
    pub fn contract_apply_garbage_ignored<G: MiniGame + ?Sized>(game: &mut G) {
        let before = game.serialize_state();
        game.apply_state(&[0xFF, 0xFE, 0x00, 0x01, 0xAB, 0xCD]);
        assert_eq!(before, game.serialize_state());
    }

    /// resize() must change the state of a started game.
    pub fn contract_resize_rederives_state<G: MiniGame + ?Sized>(game: &mut G) {
        game.start();
        game.update(1.0, &InputState::default());
        let before = game.serialize_state();
        game.resize(Viewport::new(400.0, 300.0));
        assert_game_state_changed(game, &before);
    }

    /// A game already positioned to win must emit `Completed` exactly once
    /// within `max_frames`, and report completion afterwards.
    pub fn contract_completion_fires_once<G: MiniGame + ?Sized>(game: &mut G, max_frames: usize) {
        let events = run_frames(game, max_frames, 1.0, &InputState::default());
        let completions = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Completed))
            .count();
        assert_eq!(completions, 1, "Completed must fire exactly once");
        assert!(game.is_complete());
        assert_eq!(game.phase(), GamePhase::Completed);

        let more = run_frames(game, max_frames, 1.0, &InputState::default());
        assert!(
            !more.contains(&GameEvent::Completed),
            "Completed must not fire again"
        );
    }
}
