use std::time::{Duration, Instant};

/// Target frame duration that physics constants are tuned against, in milliseconds.
pub const TARGET_FRAME_MS: f32 = 16.0;

/// Convert a wall-clock duration into nominal frames.
pub fn frames_from_duration(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32() * 1000.0 / TARGET_FRAME_MS
}

/// Convert a millisecond delay into nominal frames.
pub fn frames_from_millis(ms: f32) -> f32 {
    ms / TARGET_FRAME_MS
}

/// Turns successive frame timestamps into a normalized `dt`.
///
/// The first frame after construction (or [`FrameClock::reset`]) reports
/// exactly one nominal frame.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(last) => frames_from_duration(now.saturating_duration_since(last)),
            None => 1.0,
        };
        self.last = Some(now);
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_one_frame() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Instant::now()), 1.0);
    }

    #[test]
    fn elapsed_time_is_normalized() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        let dt = clock.tick(t0 + Duration::from_millis(32));
        assert!((dt - 2.0).abs() < 1e-4, "32ms should be two frames, got {dt}");
    }

    #[test]
    fn backwards_time_reports_zero() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now() + Duration::from_millis(50);
        clock.tick(t0);
        let dt = clock.tick(t0 - Duration::from_millis(10));
        assert_eq!(dt, 0.0);
    }

    #[test]
    fn reset_restarts_at_one_frame() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        clock.reset();
        assert_eq!(clock.tick(t0 + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn celebration_delay_in_frames() {
        assert!((frames_from_millis(1000.0) - 62.5).abs() < 1e-4);
    }
}
