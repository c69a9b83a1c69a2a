//! Game settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show the controls hint while playing
    pub show_instructions: bool,
    /// Show the best score on the start and game-over screens
    pub show_best: bool,

    // === Accessibility ===
    /// Reduced motion (softer game-over flash, no parallax clouds)
    pub reduced_motion: bool,
    /// High contrast mode
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,
            show_instructions: true,
            show_best: true,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

/// A preference the player can flip from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    Fps,
    Instructions,
    Best,
    ReducedMotion,
    HighContrast,
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "easter_runner_settings";

    /// Opacity of the red game-over overlay (0-1)
    pub fn game_over_overlay_alpha(&self) -> f32 {
        if self.reduced_motion { 0.35 } else { 200.0 / 255.0 }
    }

    /// Whether the drifting background clouds are drawn
    pub fn show_clouds(&self) -> bool {
        !self.reduced_motion
    }

    /// Flip one preference, returning its new value
    pub fn toggle(&mut self, which: SettingToggle) -> bool {
        let flag = match which {
            SettingToggle::Fps => &mut self.show_fps,
            SettingToggle::Instructions => &mut self.show_instructions,
            SettingToggle::Best => &mut self.show_best,
            SettingToggle::ReducedMotion => &mut self.reduced_motion,
            SettingToggle::HighContrast => &mut self.high_contrast,
        };
        *flag = !*flag;
        *flag
    }

    /// Load settings from storage, falling back to defaults
    pub fn load() -> Self {
        match storage::load_json(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to storage
    pub fn save(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
