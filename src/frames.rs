//! Frame sets for the spinner animation.

use std::time::Duration;

/// Default time each frame stays on screen.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(150);

/// Shortest interval the render loop will sleep for.
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Braille pairs used when no frame set is given.
pub const DEFAULT: &[&str] = &[
    "⠈⠁", "⠈⠑", "⠈⠱", "⠈⡱", "⢀⡱", "⢄⡱", "⢄⡱", "⢆⡱", "⢎⡱", "⢎⡰", "⢎⡠", "⢎⡀", "⢎⠁", "⠎⠁", "⠊⠁",
];

pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const LINE: &[&str] = &["-", "\\", "|", "/"];

pub const ARROWS: &[&str] = &["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"];

pub const BOUNCE: &[&str] = &[".", "..", "...", "....", ".....", "......"];

/// Named presets, in the order `termspin presets` lists them.
pub const PRESETS: &[(&str, &[&str])] = &[
    ("braille", DEFAULT),
    ("dots", DOTS),
    ("line", LINE),
    ("arrows", ARROWS),
    ("bounce", BOUNCE),
];

/// Looks up a preset by name, ignoring case.
pub fn preset(name: &str) -> Option<&'static [&'static str]> {
    let name = name.trim().to_lowercase();
    PRESETS
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .map(|(_, frames)| *frames)
}

/// Owned copy of the default frame set.
pub fn default_frames() -> Vec<String> {
    to_owned(DEFAULT)
}

pub fn to_owned(frames: &[&str]) -> Vec<String> {
    frames.iter().map(|f| f.to_string()).collect()
}

/// Zero would make the render loop spin without sleeping.
pub fn clamp_interval(interval: Duration) -> Duration {
    interval.max(MIN_FRAME_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_has_frames() {
        for (name, frames) in PRESETS {
            assert!(!frames.is_empty(), "preset {name} is empty");
        }
    }

    #[test]
    fn preset_lookup_is_case_insensitive() {
        assert_eq!(preset("LINE"), Some(LINE));
        assert_eq!(preset(" dots "), Some(DOTS));
        assert_eq!(preset("nope"), None);
    }

    #[test]
    fn braille_is_the_default() {
        assert_eq!(preset("braille"), Some(DEFAULT));
        assert_eq!(default_frames().len(), DEFAULT.len());
    }

    #[test]
    fn zero_interval_is_clamped() {
        assert_eq!(clamp_interval(Duration::ZERO), MIN_FRAME_INTERVAL);
        assert_eq!(
            clamp_interval(Duration::from_millis(40)),
            Duration::from_millis(40)
        );
    }
}
