//! Raw skill records as produced by content authoring.
//!
//! Records mirror the descriptor but keep signed integers and optional
//! effects, so that malformed content can be represented and rejected by
//! validation instead of failing to parse.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::{PresentationHints, SkillUsers};
use crate::effects::{BattleEffect, EffectSpec, FieldEffect, TargetCategory};

/// Unvalidated skill data.
///
/// Data fields deserialize from content files. Custom strategy objects can
/// only be attached in code; when present they take precedence over the
/// data-driven `EffectSpec` of the same slot.
///
/// ## Example
///
/// ```
/// use skill_engine::effects::{EffectSpec, TargetCategory};
/// use skill_engine::providers::StatKind;
/// use skill_engine::skills::SkillRecord;
///
/// let record = SkillRecord::new(1, "First Aid", TargetCategory::SingleAlly)
///     .with_description("Restores a little health.")
///     .with_cost(6)
///     .with_battle_effect(EffectSpec::heal(StatKind::Vigor, 3, 15));
///
/// assert_eq!(record.cost, 6);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillRecord {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    /// Skill-point cost.
    #[serde(default)]
    pub cost: i64,

    #[serde(default)]
    pub warmup_ms: i64,

    #[serde(default)]
    pub cooldown_ms: i64,

    pub target: TargetCategory,

    #[serde(default)]
    pub users: SkillUsers,

    #[serde(default)]
    pub battle_effect: Option<EffectSpec>,

    #[serde(default)]
    pub field_effect: Option<EffectSpec>,

    #[serde(default)]
    pub presentation: PresentationHints,

    #[serde(skip)]
    pub custom_battle_effect: Option<Arc<dyn BattleEffect>>,

    #[serde(skip)]
    pub custom_field_effect: Option<Arc<dyn FieldEffect>>,
}

impl SkillRecord {
    /// Create a record with zero cost and durations and no effects.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, target: TargetCategory) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            icon: None,
            cost: 0,
            warmup_ms: 0,
            cooldown_ms: 0,
            target,
            users: SkillUsers::default(),
            battle_effect: None,
            field_effect: None,
            presentation: PresentationHints::default(),
            custom_battle_effect: None,
            custom_field_effect: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_warmup_ms(mut self, warmup_ms: i64) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }

    #[must_use]
    pub fn with_cooldown_ms(mut self, cooldown_ms: i64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    #[must_use]
    pub fn with_users(mut self, users: SkillUsers) -> Self {
        self.users = users;
        self
    }

    #[must_use]
    pub fn with_battle_effect(mut self, effect: EffectSpec) -> Self {
        self.battle_effect = Some(effect);
        self
    }

    #[must_use]
    pub fn with_field_effect(mut self, effect: EffectSpec) -> Self {
        self.field_effect = Some(effect);
        self
    }

    /// Attach a custom battle strategy.
    #[must_use]
    pub fn with_custom_battle_effect(mut self, effect: Arc<dyn BattleEffect>) -> Self {
        self.custom_battle_effect = Some(effect);
        self
    }

    /// Attach a custom field strategy.
    #[must_use]
    pub fn with_custom_field_effect(mut self, effect: Arc<dyn FieldEffect>) -> Self {
        self.custom_field_effect = Some(effect);
        self
    }

    #[must_use]
    pub fn with_presentation(mut self, presentation: PresentationHints) -> Self {
        self.presentation = presentation;
        self
    }
}
