//! Tunables for a round and the player's saved preferences.

use serde::{Deserialize, Serialize};

/// Fixed timings and dimensions of a round. `Default` is the only shipped
/// configuration; tests build the controller from it directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: u32,
    pub cols: u32,
    pub round_secs: u32,
    /// Period of the decay ticker; also the amount subtracted per tick.
    pub decay_tick_ms: u32,
    /// Removal animation length after a successful click.
    pub click_settle_ms: u32,
    /// Pause between the clock hitting zero and the round-end notification.
    pub end_delay_ms: u32,
    /// Wait after a fullscreen transition before measuring the viewport.
    pub layout_settle_ms: u32,
    pub layout_margin_px: u32,
    pub reserved_px_fullscreen: u32,
    pub reserved_px_windowed: u32,
    pub min_cell_px: u32,
    pub max_cell_px: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 12,
            round_secs: 60,
            decay_tick_ms: 100,
            click_settle_ms: 200,
            end_delay_ms: 100,
            layout_settle_ms: 100,
            layout_margin_px: 40,
            reserved_px_fullscreen: 150,
            reserved_px_windowed: 250,
            min_cell_px: 15,
            max_cell_px: 50,
        }
    }
}

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// Preferences remembered between page loads (localStorage key `rg_settings`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub level: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self { level: MIN_LEVEL }
    }
}

impl Settings {
    pub const STORAGE_KEY: &'static str = "rg_settings";

    /// Parses a stored blob, falling back to defaults on anything malformed.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Settings>(raw) {
            Ok(s) => Self {
                level: s.level.clamp(MIN_LEVEL, MAX_LEVEL),
            },
            Err(_) => Self::default(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_six_by_twelve() {
        let cfg = GameConfig::default();
        assert_eq!((cfg.rows, cfg.cols), (6, 12));
        assert_eq!(cfg.round_secs, 60);
    }

    #[test]
    fn settings_survive_json_and_clamp_level() {
        let s = Settings { level: 4 };
        assert_eq!(Settings::from_json(&s.to_json()), s);
        assert_eq!(Settings::from_json(r#"{"level":9}"#).level, MAX_LEVEL);
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }
}
