//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, per-frame constants
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Bounds, hits};
pub use state::{Cloud, GameEvent, GamePhase, GameState, Obstacle, Player, Rgb, Viewport};
pub use tick::{TickInput, reset, resize, spawn_interval, tick};
