//! Record validation and normalization.
//!
//! Turns a raw [`SkillRecord`] into a [`SkillDescriptor`], rejecting any
//! record that violates a descriptor invariant:
//!
//! - `id` is positive and fits in 32 bits
//! - `name` is non-empty
//! - character-usable skills have a description
//! - `cost`, `warmup_ms`, `cooldown_ms` are non-negative
//! - a battle effect is present and its parameters are sane
//! - a data-driven field effect is not a damage effect

use std::sync::Arc;

use super::definition::{SkillDescriptor, SkillId};
use super::record::SkillRecord;
use crate::effects::{BattleEffect, FieldEffect};
use crate::error::ValidationError;

/// Validate a record and build its descriptor.
pub fn validate(record: SkillRecord) -> Result<SkillDescriptor, ValidationError> {
    let id = skill_id(record.id)?;

    if record.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let description = record.description.filter(|text| !text.trim().is_empty());
    if record.users.includes_characters() && description.is_none() {
        return Err(ValidationError::MissingDescription);
    }

    let cost = non_negative("cost", record.cost)?;
    let warmup_ms = non_negative("warmup_ms", record.warmup_ms)?;
    let cooldown_ms = non_negative("cooldown_ms", record.cooldown_ms)?;

    let battle_effect: Arc<dyn BattleEffect> = match (record.custom_battle_effect, record.battle_effect) {
        (Some(custom), _) => custom,
        (None, Some(spec)) => {
            spec.check()?;
            Arc::new(spec) as Arc<dyn BattleEffect>
        }
        (None, None) => return Err(ValidationError::MissingBattleEffect),
    };

    let field_effect: Option<Arc<dyn FieldEffect>> = match (record.custom_field_effect, record.field_effect) {
        (Some(custom), _) => Some(custom),
        (None, Some(spec)) => {
            spec.check()?;
            if !spec.is_field_usable() {
                return Err(ValidationError::UnsupportedFieldEffect(spec.kind_name()));
            }
            Some(Arc::new(spec) as Arc<dyn FieldEffect>)
        }
        (None, None) => None,
    };

    Ok(SkillDescriptor {
        id,
        name: record.name,
        description,
        icon: record.icon,
        cost,
        warmup_ms,
        cooldown_ms,
        target: record.target,
        users: record.users,
        battle_effect,
        field_effect,
        presentation: record.presentation,
    })
}

fn skill_id(raw: i64) -> Result<SkillId, ValidationError> {
    if raw <= 0 {
        return Err(ValidationError::NonPositiveId(raw));
    }
    u32::try_from(raw)
        .map(SkillId::new)
        .map_err(|_| ValidationError::IdOutOfRange(raw))
}

fn non_negative(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::TooLarge {
        field,
        value,
        max: u32::MAX,
    })
}
