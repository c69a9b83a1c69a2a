//! Axis-aligned bounding box collision
//!
//! Screen coordinates: x grows rightward, y grows downward, so `top < bottom`.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle used for overlap tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Rectangle centred on (`cx`, `cy`) with the given half extents
    pub fn centered(cx: f32, cy: f32, half_width: f32, half_height: f32) -> Self {
        Self {
            left: cx - half_width,
            right: cx + half_width,
            top: cy - half_height,
            bottom: cy + half_height,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.right > other.left
            && self.left < other.right
            && self.bottom > other.top
            && self.top < other.bottom
    }
}

/// Whether an obstacle's hitbox overlaps the player's hitbox
#[inline]
pub fn hits(player: &Bounds, obstacle: &Bounds) -> bool {
    player.overlaps(obstacle)
}
