use serde::{Deserialize, Serialize};

/// Widest canvas the game area is allowed to take.
pub const MAX_WIDTH: f32 = 800.0;
/// Tallest canvas the game area is allowed to take.
pub const MAX_HEIGHT: f32 = 600.0;
/// Vertical space reserved for the on-screen controls below the canvas.
pub const CONTROLS_RESERVE: f32 = 120.0;

/// Size of the game area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Build a viewport. Non-finite or sub-pixel dimensions become 1.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// Fit the game area into a host window of the given size.
    pub fn fit(window_width: f32, window_height: f32) -> Self {
        Self::new(
            window_width.min(MAX_WIDTH),
            (window_height - CONTROLS_RESERVE).min(MAX_HEIGHT),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(MAX_WIDTH, MAX_HEIGHT)
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() && v >= 1.0 { v } else { 1.0 }
}
