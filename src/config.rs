// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine - Configuration

//! Boost configuration loaded from TOML.
//!
//! ```toml
//! speed_multiplier = 4.0
//! hard_brake_multiplier = 0.8
//! boost_block = "redstone_block"
//! hard_brake_block = "soul_sand"
//! cheat_mode = false
//! ```
//!
//! Every key is optional. Values are checked by [`BoostConfig::validate`]
//! after parsing; a config that fails validation is never handed to the
//! controller.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::TileType;

/// Upper bound accepted for `speed_multiplier`.
pub const MAX_SPEED_MULTIPLIER: f64 = 50.0;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("speed_multiplier must be in (0, {max}], got {value}")]
    SpeedMultiplier { value: f64, max: f64 },

    #[error("hard_brake_multiplier must be finite and >= 0, got {0}")]
    HardBrakeMultiplier(f64),

    #[error("invalid tile name: {0:?}")]
    InvalidTile(String),

    #[error("boost and brake tiles must differ (both {0})")]
    SameTile(TileType),
}

// ---------------------------------------------------------------------------
// BoostConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    /// Boosted max speed is `default_speed * speed_multiplier`.
    pub speed_multiplier: f64,
    /// Velocity factor applied each tick over an inactive segment on a brake tile.
    pub hard_brake_multiplier: f64,
    pub boost_block: TileType,
    pub hard_brake_block: TileType,
    /// Treat every powered segment as if it had a boost tile beneath.
    pub cheat_mode: bool,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 4.0,
            hard_brake_multiplier: 0.8,
            boost_block: TileType::redstone_block(),
            hard_brake_block: TileType::soul_sand(),
            cheat_mode: false,
        }
    }
}

impl BoostConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: BoostConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = self.speed_multiplier;
        if !m.is_finite() || m <= 0.0 || m > MAX_SPEED_MULTIPLIER {
            return Err(ConfigError::SpeedMultiplier { value: m, max: MAX_SPEED_MULTIPLIER });
        }
        let b = self.hard_brake_multiplier;
        if !b.is_finite() || b < 0.0 {
            return Err(ConfigError::HardBrakeMultiplier(b));
        }
        if self.boost_block == self.hard_brake_block {
            return Err(ConfigError::SameTile(self.boost_block.clone()));
        }
        Ok(())
    }

    /// Builder-style tile override taking raw names, as read from a command.
    pub fn with_tiles(mut self, boost: &str, brake: &str) -> Result<Self, ConfigError> {
        self.boost_block = TileType::parse(boost)
            .ok_or_else(|| ConfigError::InvalidTile(boost.to_string()))?;
        self.hard_brake_block = TileType::parse(brake)
            .ok_or_else(|| ConfigError::InvalidTile(brake.to_string()))?;
        self.validate()?;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = BoostConfig::from_toml_str("").expect("test: empty config is valid");
        assert_eq!(config, BoostConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = BoostConfig::from_toml_str(
            "speed_multiplier = 2.0\nboost_block = \"minecraft:GOLD_BLOCK\"\ncheat_mode = true\n",
        )
        .expect("test: partial config is valid");
        assert_eq!(config.speed_multiplier, 2.0);
        assert_eq!(config.boost_block.as_str(), "gold_block");
        assert!(config.cheat_mode);
        assert_eq!(config.hard_brake_multiplier, 0.8);
        assert_eq!(config.hard_brake_block, TileType::soul_sand());
    }

    #[test]
    fn rejects_out_of_range_speed_multiplier() {
        for text in ["speed_multiplier = 0.0", "speed_multiplier = -1.0", "speed_multiplier = 51.0"] {
            let err = BoostConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::SpeedMultiplier { .. }), "{text}: {err}");
        }
        assert!(BoostConfig::from_toml_str("speed_multiplier = 50.0").is_ok());
    }

    #[test]
    fn rejects_negative_brake_multiplier() {
        let err = BoostConfig::from_toml_str("hard_brake_multiplier = -0.5").unwrap_err();
        assert!(matches!(err, ConfigError::HardBrakeMultiplier(v) if v == -0.5));
        let err = BoostConfig::from_toml_str("hard_brake_multiplier = inf").unwrap_err();
        assert!(matches!(err, ConfigError::HardBrakeMultiplier(_)));
        assert!(BoostConfig::from_toml_str("hard_brake_multiplier = 0.0").is_ok());
    }

    #[test]
    fn brake_multiplier_above_one_accelerates() {
        let config = BoostConfig::from_toml_str("hard_brake_multiplier = 1.2").unwrap();
        assert_eq!(config.hard_brake_multiplier, 1.2);
    }

    #[test]
    fn rejects_identical_tiles() {
        let err = BoostConfig::from_toml_str(
            "boost_block = \"soul_sand\"\nhard_brake_block = \"minecraft:soul_sand\"",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::SameTile(_)));
    }

    #[test]
    fn rejects_empty_tile_name() {
        let err = BoostConfig::from_toml_str("boost_block = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = BoostConfig::default().with_tiles("", "soul_sand").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTile(_)));
    }

    #[test]
    fn toml_output_parses_back() {
        let config = BoostConfig { speed_multiplier: 3.5, ..BoostConfig::default() };
        let text = config.to_toml_string().expect("test: serialize");
        assert_eq!(BoostConfig::from_toml_str(&text).expect("test: reparse"), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BoostConfig::load("/nonexistent/rail-boost.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
