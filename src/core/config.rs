//! Engine configuration.
//!
//! Battles configure the engine at startup by providing an `EngineConfig`:
//! - `seed`: Seed for the combat RNG
//! - `hit_chance`: Parameters of the default evasion/accuracy formula
//! - `large_sprite_width`: Threshold for large particle-effect variants
//! - `id_ranges`: Informational skill ID partitions
//!
//! Configs are plain serde data and can be read from RON:
//!
//! ```
//! use skill_engine::core::EngineConfig;
//!
//! let config = EngineConfig::from_ron("(seed: 7, hit_chance: (base: 70, min: 10, max: 90))").unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.hit_chance.base, 70);
//! // Omitted fields keep their defaults
//! assert_eq!(config.large_sprite_width, EngineConfig::default().large_sprite_width);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::skills::IdRanges;

/// Parameters of the linear hit-chance formula.
///
/// ```text
/// hit_chance = base + (accuracy - evasion), clamped to [min, max]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitChanceParams {
    /// Hit chance (percent) when accuracy equals evasion.
    pub base: i32,
    /// Lowest possible hit chance (percent).
    pub min: u32,
    /// Highest possible hit chance (percent).
    pub max: u32,
}

impl Default for HitChanceParams {
    fn default() -> Self {
        Self {
            base: 85,
            min: 5,
            max: 100,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the session RNG.
    pub seed: u64,

    /// Default evasion/accuracy formula parameters.
    pub hit_chance: HitChanceParams,

    /// Sprite width at or above which large particle variants are used.
    pub large_sprite_width: f32,

    /// Skill ID partitions (informational, never enforced).
    pub id_ranges: IdRanges,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            hit_chance: HitChanceParams::default(),
            large_sprite_width: 128.0,
            id_ranges: IdRanges::default(),
        }
    }
}

impl EngineConfig {
    /// Create a default configuration with the given RNG seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse a configuration from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ContentError> {
        Ok(ron::from_str(text)?)
    }

    /// Set the hit-chance parameters.
    #[must_use]
    pub fn with_hit_chance(mut self, hit_chance: HitChanceParams) -> Self {
        self.hit_chance = hit_chance;
        self
    }

    /// Set the large sprite threshold.
    #[must_use]
    pub fn with_large_sprite_width(mut self, width: f32) -> Self {
        self.large_sprite_width = width;
        self
    }

    /// Set the skill ID partitions.
    #[must_use]
    pub fn with_id_ranges(mut self, ranges: IdRanges) -> Self {
        self.id_ranges = ranges;
        self
    }
}
