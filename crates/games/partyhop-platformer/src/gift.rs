use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::config::GiftConfig;
use crate::physics::Rect;

/// The gift the actor is hunting for. Positioned by its centre.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collectible {
    pub x: f32,
    pub y: f32,
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub radius: f32,
    /// One-way: once true it stays true for the level instance.
    pub collected: bool,
    /// Float animation phase in `[0, TAU)`.
    pub phase: f32,
}

impl Collectible {
    pub fn new(anchor_x: f32, anchor_y: f32, radius: f32) -> Self {
        Self {
            x: anchor_x,
            y: anchor_y,
            anchor_x,
            anchor_y,
            radius,
            collected: false,
            phase: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x - self.radius,
            self.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    /// Returns true only on the transition; later calls are no-ops.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    /// Move the anchor after a resize. An uncollected gift snaps back to it.
    pub fn reanchor(&mut self, anchor_x: f32, anchor_y: f32) {
        self.anchor_x = anchor_x;
        self.anchor_y = anchor_y;
        self.x = anchor_x;
        if !self.collected {
            self.y = anchor_y;
            self.phase = 0.0;
        }
    }

    /// Bob around the anchor while waiting, drift upward once collected.
    pub fn animate(&mut self, config: &GiftConfig) {
        if self.collected {
            self.y -= config.collected_drift;
        } else {
            self.y = self.anchor_y + self.phase.sin() * config.float_amplitude;
            self.phase = (self.phase + config.float_speed) % TAU;
        }
    }
}
