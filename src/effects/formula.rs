//! Pluggable hit and damage formulas.
//!
//! Offensive effects ask a [`HitFormula`] for a hit chance per target and
//! roll against it, then pass the raw magnitude through a
//! [`DamageFormula`]. Both are strategy objects so a battle can swap the
//! arithmetic without touching effect data.

use std::fmt::Debug;
use std::sync::Arc;

use crate::core::{ActorId, EngineConfig, HitChanceParams};
use crate::error::ProviderError;
use crate::providers::{StatKind, StatProvider};

/// Chance (percent) that an attack lands.
pub trait HitFormula: Debug + Send + Sync {
    fn hit_chance(
        &self,
        attacker: ActorId,
        defender: ActorId,
        stats: &dyn StatProvider,
    ) -> Result<u32, ProviderError>;
}

/// Adjustment applied to raw damage before it is requested.
pub trait DamageFormula: Debug + Send + Sync {
    fn adjust(
        &self,
        raw: u32,
        attacker: ActorId,
        defender: ActorId,
        stats: &dyn StatProvider,
    ) -> Result<u32, ProviderError>;
}

/// Check a percentage roll in `[1, 100]` against a hit chance.
#[must_use]
pub fn rolls_hit(chance: u32, roll: u32) -> bool {
    roll <= chance
}

/// Linear accuracy-versus-evasion hit chance.
///
/// ```text
/// hit_chance = base + (agility(attacker) - evade(defender))
/// clamped to [min, max]
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearHitChance {
    params: HitChanceParams,
}

impl LinearHitChance {
    #[must_use]
    pub fn new(params: HitChanceParams) -> Self {
        Self { params }
    }

    /// Hit chance from raw accuracy and evasion values.
    #[must_use]
    pub fn chance(&self, accuracy: i32, evasion: i32) -> u32 {
        let min = i32::try_from(self.params.min).unwrap_or(i32::MAX);
        let max = i32::try_from(self.params.max).unwrap_or(i32::MAX).max(min);
        let chance = self.params.base.saturating_add(accuracy.saturating_sub(evasion));
        u32::try_from(chance.clamp(min, max)).unwrap_or(0)
    }
}

impl HitFormula for LinearHitChance {
    fn hit_chance(
        &self,
        attacker: ActorId,
        defender: ActorId,
        stats: &dyn StatProvider,
    ) -> Result<u32, ProviderError> {
        let accuracy = stats.statistic(attacker, StatKind::Agility)?;
        let evasion = stats.statistic(defender, StatKind::Evade)?;
        Ok(self.chance(accuracy, evasion))
    }
}

/// Every attack lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlwaysHit;

impl HitFormula for AlwaysHit {
    fn hit_chance(&self, _: ActorId, _: ActorId, _: &dyn StatProvider) -> Result<u32, ProviderError> {
        Ok(100)
    }
}

/// Damage is requested as computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawDamage;

impl DamageFormula for RawDamage {
    fn adjust(&self, raw: u32, _: ActorId, _: ActorId, _: &dyn StatProvider) -> Result<u32, ProviderError> {
        Ok(raw)
    }
}

/// Subtracts the defender's protection, never dropping below 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProtectionReduction;

impl DamageFormula for ProtectionReduction {
    fn adjust(
        &self,
        raw: u32,
        _attacker: ActorId,
        defender: ActorId,
        stats: &dyn StatProvider,
    ) -> Result<u32, ProviderError> {
        let protection = u32::try_from(stats.statistic(defender, StatKind::Protection)?).unwrap_or(0);
        Ok(raw.saturating_sub(protection).max(1))
    }
}

/// The formulas in effect for a battle.
#[derive(Clone, Debug)]
pub struct Formulas {
    pub hit: Arc<dyn HitFormula>,
    pub damage: Arc<dyn DamageFormula>,
}

impl Formulas {
    /// Linear hit chance from the config, raw damage.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            hit: Arc::new(LinearHitChance::new(config.hit_chance)),
            damage: Arc::new(RawDamage),
        }
    }

    /// Attacks always land and deal raw damage.
    #[must_use]
    pub fn deterministic() -> Self {
        Self {
            hit: Arc::new(AlwaysHit),
            damage: Arc::new(RawDamage),
        }
    }

    #[must_use]
    pub fn with_hit(mut self, hit: Arc<dyn HitFormula>) -> Self {
        self.hit = hit;
        self
    }

    #[must_use]
    pub fn with_damage(mut self, damage: Arc<dyn DamageFormula>) -> Self {
        self.damage = damage;
        self
    }
}

impl Default for Formulas {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
