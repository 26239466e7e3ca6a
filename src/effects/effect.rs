//! Effect strategies and data-driven effect definitions.
//!
//! A skill carries a [`BattleEffect`] strategy, and optionally a
//! [`FieldEffect`] for use outside battle. Most content uses
//! [`EffectSpec`], the serialisable built-in strategy; custom strategies
//! implement the traits directly.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::formula::Formulas;
use crate::core::{ActorId, CombatRng, EngineConfig};
use crate::error::{EffectError, ProviderError, ValidationError};
use crate::providers::{DamageOutcome, HealOutcome, Presenter, StatKind, StatProvider, StatusKind};

/// Everything a battle effect may touch while executing.
pub struct EffectContext<'a> {
    pub stats: &'a mut dyn StatProvider,
    pub presenter: &'a dyn Presenter,
    pub rng: &'a mut CombatRng,
    pub formulas: &'a Formulas,
    pub config: &'a EngineConfig,
}

/// Everything a field effect may touch. There is no presentation outside
/// battle.
pub struct FieldContext<'a> {
    pub stats: &'a mut dyn StatProvider,
    pub rng: &'a mut CombatRng,
}

/// Strategy invoked once when a skill executes in battle.
///
/// `targets` is already resolved and may be empty.
pub trait BattleEffect: Debug + Send + Sync {
    fn execute(
        &self,
        user: ActorId,
        targets: &[ActorId],
        ctx: &mut EffectContext<'_>,
    ) -> Result<EffectReport, EffectError>;
}

/// Strategy for immediate use outside battle.
pub trait FieldEffect: Debug + Send + Sync {
    fn execute_immediate(
        &self,
        target: ActorId,
        instigator: ActorId,
        ctx: &mut FieldContext<'_>,
    ) -> Result<EffectReport, EffectError>;
}

// ============================================================================
// Data-driven effects
// ============================================================================

/// Sound and particle references played after an effect lands.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationCue {
    pub sound: Option<String>,
    pub particle: Option<String>,
    /// Variant used on large sprites, falling back to `particle`.
    pub large_particle: Option<String>,
}

impl PresentationCue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    #[must_use]
    pub fn with_particle(mut self, particle: impl Into<String>) -> Self {
        self.particle = Some(particle.into());
        self
    }

    #[must_use]
    pub fn with_large_particle(mut self, particle: impl Into<String>) -> Self {
        self.large_particle = Some(particle.into());
        self
    }

    /// Particle reference for a sprite of the given width.
    #[must_use]
    pub fn particle_for(&self, sprite_width: f32, large_threshold: f32) -> Option<&str> {
        if sprite_width >= large_threshold {
            self.large_particle.as_deref().or(self.particle.as_deref())
        } else {
            self.particle.as_deref()
        }
    }

    /// Check whether the cue requests nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sound.is_none() && self.particle.is_none() && self.large_particle.is_none()
    }
}

/// Status duration derived from the user's statistic.
///
/// ```text
/// duration_ms = max(stat * per_point_ms, floor_ms)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationFormula {
    pub stat: StatKind,
    pub per_point_ms: u32,
    pub floor_ms: u32,
}

impl DurationFormula {
    /// Resolve the duration for a statistic value.
    #[must_use]
    pub fn resolve(&self, stat_value: i32) -> u32 {
        let scaled = i64::from(stat_value) * i64::from(self.per_point_ms);
        let scaled = u32::try_from(scaled.max(0)).unwrap_or(u32::MAX);
        scaled.max(self.floor_ms)
    }
}

/// Built-in effect strategy, authored as data.
///
/// Magnitudes are `stat * multiplier + uniform[0, random_bonus]`, using the
/// user's statistic.
///
/// ```
/// use skill_engine::effects::{EffectSpec, PresentationCue};
/// use skill_engine::providers::StatKind;
///
/// let heal = EffectSpec::heal(StatKind::Vigor, 3, 15)
///     .with_cue(PresentationCue::new().with_sound("heal.ogg"));
///
/// assert!(heal.is_field_usable());
/// assert_eq!(heal.kind_name(), "heal");
/// assert_eq!(heal.cue().sound.as_deref(), Some("heal.ogg"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectSpec {
    /// Offensive: evasion check per target, damage on hit, miss otherwise.
    Damage {
        stat: StatKind,
        multiplier: i32,
        #[serde(default)]
        random_bonus: u32,
        #[serde(default)]
        cue: PresentationCue,
    },

    /// Restorative: no evasion check.
    Heal {
        stat: StatKind,
        multiplier: i32,
        #[serde(default)]
        random_bonus: u32,
        #[serde(default)]
        cue: PresentationCue,
    },

    /// Timed status change on every target.
    Status {
        status: StatusKind,
        intensity: i32,
        duration: DurationFormula,
        #[serde(default)]
        cue: PresentationCue,
    },
}

impl EffectSpec {
    /// Create a damage effect with no presentation.
    #[must_use]
    pub fn damage(stat: StatKind, multiplier: i32, random_bonus: u32) -> Self {
        Self::Damage {
            stat,
            multiplier,
            random_bonus,
            cue: PresentationCue::default(),
        }
    }

    /// Create a heal effect with no presentation.
    #[must_use]
    pub fn heal(stat: StatKind, multiplier: i32, random_bonus: u32) -> Self {
        Self::Heal {
            stat,
            multiplier,
            random_bonus,
            cue: PresentationCue::default(),
        }
    }

    /// Create a status effect whose duration scales with `stat`.
    #[must_use]
    pub fn status(status: StatusKind, intensity: i32, stat: StatKind, per_point_ms: u32, floor_ms: u32) -> Self {
        Self::Status {
            status,
            intensity,
            duration: DurationFormula {
                stat,
                per_point_ms,
                floor_ms,
            },
            cue: PresentationCue::default(),
        }
    }

    /// Replace the presentation cue (builder pattern).
    #[must_use]
    pub fn with_cue(mut self, new_cue: PresentationCue) -> Self {
        match &mut self {
            Self::Damage { cue, .. } | Self::Heal { cue, .. } | Self::Status { cue, .. } => *cue = new_cue,
        }
        self
    }

    #[must_use]
    pub fn cue(&self) -> &PresentationCue {
        match self {
            Self::Damage { cue, .. } | Self::Heal { cue, .. } | Self::Status { cue, .. } => cue,
        }
    }

    /// Short variant name for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Damage { .. } => "damage",
            Self::Heal { .. } => "heal",
            Self::Status { .. } => "status",
        }
    }

    /// Damage needs an evasion check and a foe, so it only runs in battle.
    #[must_use]
    pub fn is_field_usable(&self) -> bool {
        !matches!(self, Self::Damage { .. })
    }

    /// Check effect parameters.
    pub fn check(&self) -> Result<(), ValidationError> {
        match self {
            Self::Damage { multiplier, .. } | Self::Heal { multiplier, .. } if *multiplier < 0 => {
                Err(ValidationError::InvalidEffect("multiplier must be non-negative"))
            }
            Self::Status { intensity: 0, .. } => {
                Err(ValidationError::InvalidEffect("status intensity must be non-zero"))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

/// What happened to one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetOutcome {
    Damaged {
        target: ActorId,
        outcome: DamageOutcome,
    },
    Missed {
        target: ActorId,
    },
    Healed {
        target: ActorId,
        outcome: HealOutcome,
    },
    StatusApplied {
        target: ActorId,
        status: StatusKind,
        intensity: i32,
        duration_ms: u32,
    },
    /// The stat provider rejected the request for this target.
    Failed {
        target: ActorId,
        error: ProviderError,
    },
}

impl TargetOutcome {
    #[must_use]
    pub fn target(&self) -> ActorId {
        match self {
            Self::Damaged { target, .. }
            | Self::Missed { target }
            | Self::Healed { target, .. }
            | Self::StatusApplied { target, .. }
            | Self::Failed { target, .. } => *target,
        }
    }

    /// Check whether the effect changed the target.
    #[must_use]
    pub fn landed(&self) -> bool {
        !matches!(self, Self::Missed { .. } | Self::Failed { .. })
    }
}

/// Per-target outcomes of one effect execution, in target order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl EffectReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: TargetOutcome) {
        self.outcomes.push(outcome);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of targets the effect missed.
    #[must_use]
    pub fn misses(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TargetOutcome::Missed { .. }))
            .count()
    }

    /// Number of targets the stat provider rejected.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TargetOutcome::Failed { .. }))
            .count()
    }

    /// Hit points removed across all targets.
    #[must_use]
    pub fn total_damage(&self) -> u32 {
        self.outcomes
            .iter()
            .map(|o| match o {
                TargetOutcome::Damaged { outcome, .. } => outcome.dealt,
                _ => 0,
            })
            .fold(0, u32::saturating_add)
    }

    /// Hit points restored across all targets.
    #[must_use]
    pub fn total_healing(&self) -> u32 {
        self.outcomes
            .iter()
            .map(|o| match o {
                TargetOutcome::Healed { outcome, .. } => outcome.restored,
                _ => 0,
            })
            .fold(0, u32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formula_floor() {
        let formula = DurationFormula {
            stat: StatKind::Vigor,
            per_point_ms: 3000,
            floor_ms: 10_000,
        };
        assert_eq!(formula.resolve(0), 10_000);
        assert_eq!(formula.resolve(3), 10_000);
        assert_eq!(formula.resolve(4), 12_000);
        assert_eq!(formula.resolve(-5), 10_000);
        assert_eq!(formula.resolve(i32::MAX), u32::MAX);
    }

    #[test]
    fn test_particle_variant() {
        let cue = PresentationCue::new().with_particle("spark").with_large_particle("spark_big");
        assert_eq!(cue.particle_for(64.0, 128.0), Some("spark"));
        assert_eq!(cue.particle_for(128.0, 128.0), Some("spark_big"));

        let cue = PresentationCue::new().with_particle("spark");
        assert_eq!(cue.particle_for(300.0, 128.0), Some("spark"));
        assert!(PresentationCue::new().is_empty());
    }

    #[test]
    fn test_spec_checks() {
        assert!(EffectSpec::damage(StatKind::Strength, 0, 0).check().is_ok());
        assert!(EffectSpec::damage(StatKind::Strength, -1, 0).check().is_err());
        assert!(EffectSpec::heal(StatKind::Vigor, -1, 0).check().is_err());
        assert!(EffectSpec::status(StatusKind::Stun, -1, StatKind::Agility, 100, 0).check().is_ok());
        assert!(EffectSpec::status(StatusKind::Stun, 0, StatKind::Agility, 100, 0).check().is_err());
    }

    #[test]
    fn test_field_usability() {
        assert!(!EffectSpec::damage(StatKind::Strength, 1, 0).is_field_usable());
        assert!(EffectSpec::heal(StatKind::Vigor, 1, 0).is_field_usable());
        assert!(EffectSpec::status(StatusKind::Vigor, 1, StatKind::Vigor, 1, 1).is_field_usable());
    }

    #[test]
    fn test_spec_ron_shape() {
        let spec: EffectSpec = ron::from_str(
            "Heal(stat: Vigor, multiplier: 3, random_bonus: 15, cue: (sound: Some(\"heal.ogg\")))",
        )
        .unwrap();
        assert_eq!(
            spec,
            EffectSpec::heal(StatKind::Vigor, 3, 15).with_cue(PresentationCue::new().with_sound("heal.ogg"))
        );
    }

    #[test]
    fn test_report_totals() {
        let mut report = EffectReport::new();
        report.push(TargetOutcome::Damaged {
            target: ActorId(1),
            outcome: DamageOutcome { dealt: 7, remaining: 3, defeated: false },
        });
        report.push(TargetOutcome::Missed { target: ActorId(2) });
        report.push(TargetOutcome::Healed {
            target: ActorId(3),
            outcome: HealOutcome { restored: 4, current: 9 },
        });

        assert_eq!(report.len(), 3);
        assert_eq!(report.misses(), 1);
        assert_eq!(report.total_damage(), 7);
        assert_eq!(report.total_healing(), 4);
        assert_eq!(report.outcomes[1].target(), ActorId(2));
    }
}
