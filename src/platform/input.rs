//! Input mapping
//!
//! Keyboard, pointer and touch all raise the same Activate event. What it
//! means (jump or restart) is decided by the simulation's current phase,
//! see [`crate::sim::TickInput::activate`]. A few extra keys flip player
//! preferences or wipe the leaderboard.

use crate::settings::SettingToggle;

/// Keys that count as Activate (`KeyboardEvent.key` values)
pub const ACTIVATE_KEYS: [&str; 3] = [" ", "Spacebar", "Enter"];

/// Browser event types routed to the Activate handler
pub const ACTIVATE_POINTER_EVENTS: [&str; 2] = ["mousedown", "touchstart"];

/// Key that clears the stored high scores
pub const CLEAR_HIGH_SCORES_KEY: &str = "Delete";

/// What a key press asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Activate,
    Toggle(SettingToggle),
    ClearHighScores,
}

/// Whether a `KeyboardEvent.key` value should raise Activate
pub fn is_activate_key(key: &str) -> bool {
    ACTIVATE_KEYS.contains(&key)
}

/// Map a `KeyboardEvent.key` value to a command.
///
/// Auto-repeat is ignored so a held key can't turn into a stream of jumps
/// or flicker a setting.
pub fn key_command(key: &str, repeat: bool) -> Option<KeyCommand> {
    if repeat {
        return None;
    }
    if is_activate_key(key) {
        return Some(KeyCommand::Activate);
    }
    if key == CLEAR_HIGH_SCORES_KEY {
        return Some(KeyCommand::ClearHighScores);
    }
    let toggle = match key {
        "f" | "F" => SettingToggle::Fps,
        "h" | "H" => SettingToggle::Instructions,
        "b" | "B" => SettingToggle::Best,
        "m" | "M" => SettingToggle::ReducedMotion,
        "c" | "C" => SettingToggle::HighContrast,
        _ => return None,
    };
    Some(KeyCommand::Toggle(toggle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_keys() {
        assert!(is_activate_key(" "));
        assert!(is_activate_key("Enter"));
        assert!(!is_activate_key("a"));
        assert!(!is_activate_key("Escape"));
        assert_eq!(key_command(" ", false), Some(KeyCommand::Activate));
    }

    #[test]
    fn test_repeat_is_ignored() {
        assert_eq!(key_command(" ", true), None);
        assert_eq!(key_command("m", true), None);
        assert_eq!(key_command(CLEAR_HIGH_SCORES_KEY, true), None);
    }

    #[test]
    fn test_setting_keys() {
        assert_eq!(
            key_command("f", false),
            Some(KeyCommand::Toggle(SettingToggle::Fps))
        );
        assert_eq!(
            key_command("H", false),
            Some(KeyCommand::Toggle(SettingToggle::Instructions))
        );
        assert_eq!(
            key_command("b", false),
            Some(KeyCommand::Toggle(SettingToggle::Best))
        );
        assert_eq!(
            key_command("M", false),
            Some(KeyCommand::Toggle(SettingToggle::ReducedMotion))
        );
        assert_eq!(
            key_command("c", false),
            Some(KeyCommand::Toggle(SettingToggle::HighContrast))
        );
        assert_eq!(
            key_command("Delete", false),
            Some(KeyCommand::ClearHighScores)
        );
        assert_eq!(key_command("i", false), None);
        assert_eq!(key_command("Escape", false), None);
    }
}
