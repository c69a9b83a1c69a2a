//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be retuned from JSON
//! without touching the simulation. All values are per simulation frame.

use serde::{Deserialize, Serialize};

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Downward acceleration added to the player's velocity each frame
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_impulse: f32,
    /// Player sprite size (square)
    pub player_size: f32,
    /// Player's fixed horizontal position as a fraction of viewport width
    pub player_x_fraction: f32,
    /// How close to the ground the player must be to jump again
    pub jump_tolerance: f32,
    /// Half-width of the player hitbox is `player_size / player_hitbox_divisor`
    pub player_hitbox_divisor: f32,

    // === World ===
    /// Ground level as a fraction of viewport height
    pub ground_fraction: f32,
    /// Scroll speed at the start of every run
    pub base_speed: f32,
    /// Scroll speed added every frame
    pub speed_increment: f32,
    /// Optional cap on scroll speed (`None` keeps growth unbounded)
    pub max_speed: Option<f32>,

    // === Obstacles ===
    /// Scroll speed mapped onto `spawn_interval_slow`
    pub spawn_speed_low: f32,
    /// Scroll speed mapped onto `spawn_interval_fast`
    pub spawn_speed_high: f32,
    /// Frames between spawn attempts at `spawn_speed_low` (also the upper clamp)
    pub spawn_interval_slow: f32,
    /// Frames between spawn attempts at `spawn_speed_high` (also the lower clamp)
    pub spawn_interval_fast: f32,
    /// Probability that an eligible frame actually spawns an obstacle
    pub spawn_chance: f64,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    /// Half-width of the obstacle hitbox is `size / obstacle_hitbox_divisor`
    pub obstacle_hitbox_divisor: f32,

    // === Score ===
    /// Score added every playing frame
    pub score_per_frame: f64,
    /// Score added for every obstacle that leaves the screen
    pub score_per_clear: f64,

    // === Clouds ===
    pub cloud_count: usize,
    pub cloud_min_size: f32,
    pub cloud_max_size: f32,
    pub cloud_min_speed: f32,
    pub cloud_max_speed: f32,
    /// Vertical band clouds live in, as fractions of viewport height
    pub cloud_band_top: f32,
    pub cloud_band_bottom: f32,
    /// Scroll speed at which clouds drift at their own base speed
    pub cloud_reference_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_impulse: -10.0,
            player_size: 50.0,
            player_x_fraction: 0.25,
            jump_tolerance: 1.0,
            player_hitbox_divisor: 4.0,

            ground_fraction: 0.85,
            base_speed: 5.0,
            speed_increment: 0.005,
            max_speed: None,

            spawn_speed_low: 5.0,
            spawn_speed_high: 20.0,
            spawn_interval_slow: 90.0,
            spawn_interval_fast: 40.0,
            spawn_chance: 0.7,
            obstacle_min_size: 30.0,
            obstacle_max_size: 45.0,
            obstacle_hitbox_divisor: 2.5,

            score_per_frame: 0.05,
            score_per_clear: 1.0,

            cloud_count: 5,
            cloud_min_size: 60.0,
            cloud_max_size: 120.0,
            cloud_min_speed: 0.5,
            cloud_max_speed: 1.5,
            cloud_band_top: 0.1,
            cloud_band_bottom: 0.4,
            cloud_reference_speed: 5.0,
        }
    }
}

impl Tuning {
    /// Storage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "easter_runner_tuning";

    /// Parse tuning from JSON; omitted fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply the optional speed cap
    pub fn cap_speed(&self, speed: f32) -> f32 {
        match self.max_speed {
            Some(max) => speed.min(max),
            None => speed,
        }
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::platform::storage::read(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides from LocalStorage");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring invalid tuning overrides: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.8, "max_speed": 18.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.max_speed, Some(18.0));
        assert_eq!(tuning.base_speed, 5.0);
        assert_eq!(tuning.cloud_count, 5);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ gravity: }").is_err());
    }

    #[test]
    fn test_cap_speed() {
        let mut tuning = Tuning::default();
        assert_eq!(tuning.cap_speed(1000.0), 1000.0);
        tuning.max_speed = Some(12.0);
        assert_eq!(tuning.cap_speed(1000.0), 12.0);
        assert_eq!(tuning.cap_speed(7.0), 7.0);
    }
}
