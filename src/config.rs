//! Engine configuration.
//!
//! A flat, string-keyed store of JSON values. Reads are typed and never fail
//! hard: a missing key or a value of the wrong shape resolves to `None`, and
//! callers fall back to the constants in [`defaults`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::Result;

/// Configuration keys and their documented defaults.
pub mod defaults {
    pub const BLOCK_CHANGES_PER_SECOND_KEY: &str = "blockChangesPerSecond";
    /// Total voxel writes per second shared by every player.
    pub const BLOCK_CHANGES_PER_SECOND: i64 = 80_000;

    pub const TURNS_PER_SECOND_KEY: &str = "turnsPerSecond";
    /// Scheduler turns per second; the per-turn budget is the rate divided by this.
    pub const TURNS_PER_SECOND: i64 = 10;

    pub const UNDO_HISTORY_SIZE_KEY: &str = "undoHistorySize";
    pub const UNDO_HISTORY_SIZE: usize = 20;

    pub const DEFAULT_BRUSH_KEY: &str = "defaultBrush";
    pub const DEFAULT_BRUSH: &str = "snipe material";

    pub const DEFAULT_BRUSH_SIZE_KEY: &str = "defaultBrushSize";
    pub const DEFAULT_BRUSH_SIZE: f64 = 5.0;

    pub const MAX_BRUSH_SIZE_KEY: &str = "maxBrushSize";
    /// Upper limit for brush size, radii and height. Larger values are refused.
    pub const MAX_BRUSH_SIZE: f64 = 64.0;

    pub const DEFAULT_BRUSH_MATERIAL_KEY: &str = "defaultBrushMaterial";
    pub const DEFAULT_BRUSH_MATERIAL: &str = "air";

    pub const MATERIAL_NOT_FOUND_MESSAGE_KEY: &str = "materialNotFoundMessage";
    pub const MATERIAL_NOT_FOUND_MESSAGE: &str = "Could not find that material.";

    pub const MATERIAL_SET_MESSAGE_KEY: &str = "materialSetMessage";
    /// `{}` is replaced with the material name.
    pub const MATERIAL_SET_MESSAGE: &str = "Set material to {}";
}

/// Typed key/value configuration.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    values: BTreeMap<String, Value>,
}

impl Configuration {
    /// Create an empty configuration; every read falls back to defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let values: BTreeMap<String, Value> = serde_json::from_str(json)?;
        Ok(Self { values })
    }

    /// Load from a JSON file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Save to a JSON file, creating parent directories as needed
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.values)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Set a value. Anything serde can serialize is accepted.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        self.values.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Typed read. `None` when absent or not convertible to `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("Config value '{}' has an unexpected type: {}", key, e);
                None
            }
        }
    }

    /// Typed read with a fallback.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    // --- Well-known tunables ---

    /// Total voxel writes per second.
    pub fn block_changes_per_second(&self) -> i64 {
        self.get_or(
            defaults::BLOCK_CHANGES_PER_SECOND_KEY,
            defaults::BLOCK_CHANGES_PER_SECOND,
        )
    }

    /// Scheduler turns per second, never below 1.
    pub fn turns_per_second(&self) -> i64 {
        self.get_or(defaults::TURNS_PER_SECOND_KEY, defaults::TURNS_PER_SECOND)
            .max(1)
    }

    /// Voxel writes available to one scheduler turn.
    pub fn changes_per_turn(&self) -> i64 {
        self.block_changes_per_second() / self.turns_per_second()
    }

    pub fn undo_history_size(&self) -> usize {
        self.get_or(defaults::UNDO_HISTORY_SIZE_KEY, defaults::UNDO_HISTORY_SIZE)
    }

    /// Largest brush dimension a player may use. Non-finite or negative
    /// values fall back to the default.
    pub fn max_brush_size(&self) -> f64 {
        let max = self.get_or(defaults::MAX_BRUSH_SIZE_KEY, defaults::MAX_BRUSH_SIZE);
        if max.is_finite() && max >= 0.0 {
            max
        } else {
            log::warn!("Ignoring invalid {} = {}", defaults::MAX_BRUSH_SIZE_KEY, max);
            defaults::MAX_BRUSH_SIZE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Configuration::new();
        assert_eq!(config.block_changes_per_second(), 80_000);
        assert_eq!(config.turns_per_second(), 10);
        assert_eq!(config.changes_per_turn(), 8_000);
        assert_eq!(config.undo_history_size(), 20);
        assert_eq!(config.max_brush_size(), 64.0);
    }

    #[test]
    fn test_negative_max_brush_size_falls_back() {
        let mut config = Configuration::new();
        config.set(defaults::MAX_BRUSH_SIZE_KEY, -3.0).unwrap();
        assert_eq!(config.max_brush_size(), defaults::MAX_BRUSH_SIZE);
        config.set(defaults::MAX_BRUSH_SIZE_KEY, 12).unwrap();
        assert_eq!(config.max_brush_size(), 12.0);
    }

    #[test]
    fn test_wrong_type_falls_back() {
        let config = Configuration::from_json_str(r#"{"blockChangesPerSecond": "lots"}"#).unwrap();
        assert_eq!(config.get::<i64>("blockChangesPerSecond"), None);
        assert_eq!(config.block_changes_per_second(), defaults::BLOCK_CHANGES_PER_SECOND);
    }

    #[test]
    fn test_zero_turns_clamped() {
        let mut config = Configuration::new();
        config.set(defaults::TURNS_PER_SECOND_KEY, 0).unwrap();
        assert_eq!(config.turns_per_second(), 1);
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Configuration::new();
        config.set("defaultBrush", "ball material").unwrap();
        assert_eq!(config.get::<String>("defaultBrush").as_deref(), Some("ball material"));
        assert!(config.contains("defaultBrush"));
        assert!(!config.contains("missing"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("brushwork.json");

        let mut config = Configuration::new();
        config.set(defaults::BLOCK_CHANGES_PER_SECOND_KEY, 1200).unwrap();
        config.set(defaults::DEFAULT_BRUSH_SIZE_KEY, 3.5).unwrap();
        config.save_json(&path).unwrap();

        let loaded = Configuration::load_json(&path).unwrap();
        assert_eq!(loaded.block_changes_per_second(), 1200);
        assert_eq!(loaded.get::<f64>(defaults::DEFAULT_BRUSH_SIZE_KEY), Some(3.5));
    }

    #[test]
    fn test_load_invalid_json() {
        assert!(Configuration::from_json_str("[1, 2, 3]").is_err());
    }
}
