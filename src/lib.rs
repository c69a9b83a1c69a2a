//! Easter Runner - A pixel-art endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `renderer`: Scene building and WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (input, storage)
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{SettingToggle, Settings};
pub use tuning::Tuning;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Viewport used before the first resize event (and by the headless runner)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 960.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 540.0;
}

/// Uniform sample between `a` and `b`.
///
/// Unlike `random_range`, the bounds may arrive in either order (or be equal),
/// which happens for cloud respawn offsets on narrow viewports.
#[inline]
pub fn rand_between(rng: &mut impl Rng, a: f32, b: f32) -> f32 {
    a + (b - a) * rng.random::<f32>()
}
