use serde::{Deserialize, Serialize};

use partyhop_core::viewport::Viewport;

use crate::physics::Rect;

/// Platform thickness in pixels.
pub const PLATFORM_THICKNESS: f32 = 20.0;
/// Share of the viewport width a standard platform spans.
const PLATFORM_WIDTH_FRAC: f32 = 0.2;
/// Actor spawn x, in pixels from the left edge.
const SPAWN_X: f32 = 50.0;
/// Actor spawn height above the bottom edge.
const SPAWN_RISE: f32 = 100.0;
/// Gift anchor as fractions of the viewport.
const GIFT_ANCHOR_FRAC: (f32, f32) = (0.8, 0.15);

/// A fixed axis-aligned platform, positioned by its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }
}

/// One row of the layout table. Positions scale with the viewport; the
/// centre y is `height * y_frac + y_offset`.
struct PlatformSlot {
    x_frac: f32,
    y_frac: f32,
    y_offset: f32,
    /// Width as a share of the viewport width.
    width_frac: f32,
    height: f32,
}

const GROUND: usize = 0;

const LAYOUT: [PlatformSlot; 6] = [
    // Ground
    PlatformSlot {
        x_frac: 0.5,
        y_frac: 1.0,
        y_offset: -PLATFORM_THICKNESS,
        width_frac: 1.0,
        height: PLATFORM_THICKNESS * 2.0,
    },
    // Left lower
    PlatformSlot {
        x_frac: 0.25,
        y_frac: 0.75,
        y_offset: 0.0,
        width_frac: PLATFORM_WIDTH_FRAC,
        height: PLATFORM_THICKNESS,
    },
    // Middle left
    PlatformSlot {
        x_frac: 0.45,
        y_frac: 0.55,
        y_offset: 0.0,
        width_frac: PLATFORM_WIDTH_FRAC,
        height: PLATFORM_THICKNESS,
    },
    // Middle right
    PlatformSlot {
        x_frac: 0.65,
        y_frac: 0.4,
        y_offset: 0.0,
        width_frac: PLATFORM_WIDTH_FRAC,
        height: PLATFORM_THICKNESS,
    },
    // Top right, under the gift
    PlatformSlot {
        x_frac: 0.8,
        y_frac: 0.25,
        y_offset: 0.0,
        width_frac: PLATFORM_WIDTH_FRAC * 0.8,
        height: PLATFORM_THICKNESS,
    },
    // Bonus ledge
    PlatformSlot {
        x_frac: 0.15,
        y_frac: 0.4,
        y_offset: 0.0,
        width_frac: PLATFORM_WIDTH_FRAC * 0.6,
        height: PLATFORM_THICKNESS,
    },
];

/// Platform indices that lead from the ground to the gift, in climbing order.
pub const GIFT_ROUTE: [usize; 4] = [1, 2, 3, 4];

/// The immutable platform set and anchors for one viewport size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub viewport: Viewport,
    pub platforms: Vec<Platform>,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub gift_anchor_x: f32,
    pub gift_anchor_y: f32,
}

impl Level {
    /// Derive the level deterministically from the viewport.
    pub fn derive(viewport: Viewport) -> Self {
        let Viewport { width, height } = viewport;
        let platforms = LAYOUT
            .iter()
            .map(|slot| Platform {
                x: width * slot.x_frac,
                y: height * slot.y_frac + slot.y_offset,
                width: width * slot.width_frac,
                height: slot.height,
            })
            .collect();

        Self {
            viewport,
            platforms,
            spawn_x: SPAWN_X,
            spawn_y: height - SPAWN_RISE,
            gift_anchor_x: width * GIFT_ANCHOR_FRAC.0,
            gift_anchor_y: height * GIFT_ANCHOR_FRAC.1,
        }
    }

    pub fn ground(&self) -> &Platform {
        &self.platforms[GROUND]
    }

    /// Spawn position for an actor of the given width, pulled inside the
    /// viewport when it is too narrow for the nominal spawn x.
    pub fn spawn_point(&self, actor_width: f32) -> (f32, f32) {
        let max_x = (self.viewport.width - actor_width).max(0.0);
        (self.spawn_x.clamp(0.0, max_x), self.spawn_y)
    }
}
