//! Using skills outside battle.
//!
//! Field use has no timing: the skill's field effect applies immediately to
//! one target, and the instigator pays the cost. Skills without a field
//! effect cannot be used this way.

use crate::core::{ActorId, CombatRng};
use crate::effects::{EffectReport, FieldContext};
use crate::error::FieldUseError;
use crate::providers::{StatKind, StatProvider};
use crate::skills::{SkillId, SkillRegistry};

/// Apply a skill's field effect to `target` on behalf of `instigator`.
///
/// The cost is checked up front and only paid once the effect succeeds.
///
/// ```
/// use skill_engine::core::{ActorId, CombatRng};
/// use skill_engine::effects::{EffectSpec, TargetCategory};
/// use skill_engine::field::use_in_field;
/// use skill_engine::providers::{ActorSheet, InMemoryRoster, StatKind};
/// use skill_engine::skills::{SkillId, SkillRecord, SkillRegistry};
///
/// let mut registry = SkillRegistry::new();
/// registry
///     .register(
///         SkillRecord::new(1, "Mend", TargetCategory::SingleAlly)
///             .with_description("Heals between battles.")
///             .with_cost(3)
///             .with_battle_effect(EffectSpec::heal(StatKind::Vigor, 2, 0))
///             .with_field_effect(EffectSpec::heal(StatKind::Vigor, 2, 0)),
///     )
///     .unwrap();
///
/// let mut roster = InMemoryRoster::new();
/// roster.insert(ActorId::new(1), ActorSheet::new(30, 10).with_stat(StatKind::Vigor, 5));
/// roster.insert(ActorId::new(2), ActorSheet::new(30, 0).with_stat(StatKind::HitPoints, 10));
///
/// let mut rng = CombatRng::new(0);
/// let report = use_in_field(
///     &registry,
///     SkillId::new(1),
///     ActorId::new(2),
///     ActorId::new(1),
///     &mut roster,
///     &mut rng,
/// )
/// .unwrap();
///
/// assert_eq!(report.total_healing(), 10);
/// assert_eq!(roster.sheet(ActorId::new(1)).unwrap().skill_points, 7);
/// ```
pub fn use_in_field(
    registry: &SkillRegistry,
    skill: SkillId,
    target: ActorId,
    instigator: ActorId,
    stats: &mut dyn StatProvider,
    rng: &mut CombatRng,
) -> Result<EffectReport, FieldUseError> {
    let descriptor = registry.lookup(skill)?;
    let effect = descriptor.field_effect().ok_or(FieldUseError::NoFieldEffect(skill))?;

    let cost = descriptor.cost();
    let available = stats.statistic(instigator, StatKind::SkillPoints)?;
    if i64::from(available) < i64::from(cost) {
        return Err(FieldUseError::InsufficientResource {
            actor: instigator,
            needed: cost,
            available,
        });
    }

    let report = {
        let mut ctx = FieldContext {
            stats: &mut *stats,
            rng,
        };
        effect.execute_immediate(target, instigator, &mut ctx)?
    };

    if cost > 0 {
        stats.consume_skill_points(instigator, cost)?;
    }

    tracing::debug!("{} used {} on {} in the field", instigator, descriptor.name(), target);
    Ok(report)
}
