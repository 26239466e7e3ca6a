//! Skill descriptors - immutable skill data.
//!
//! `SkillDescriptor` holds everything the engine needs to run a skill:
//! cost, timing, target category, and the effect strategies. For example,
//! "First Aid" costs 6 skill points, warms up for one second and heals a
//! single ally - these are part of the descriptor.
//!
//! Per-use state (elapsed warmup, resolved targets) is stored separately in
//! the timing state machine. Descriptors are only built by validating a
//! [`SkillRecord`](super::SkillRecord), so every descriptor in a registry
//! satisfies the data invariants.

use std::ops::RangeInclusive;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::Side;
use crate::effects::{BattleEffect, FieldEffect, TargetCategory};

/// Unique identifier for a skill descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u32);

impl SkillId {
    /// Create a new skill ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Classify this ID against conventional ranges.
    ///
    /// Purely informational: the registry accepts any positive ID.
    #[must_use]
    pub fn origin(self, ranges: &IdRanges) -> SkillOrigin {
        ranges.classify(self)
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skill({})", self.0)
    }
}

/// Where a skill comes from, by ID convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillOrigin {
    /// Innate character ability.
    Innate,
    /// Granted by equipment.
    Equipment,
    /// Used by enemies.
    Enemy,
    /// Outside every configured range.
    Unclassified,
}

/// Conventional skill ID partitions.
///
/// ```
/// use skill_engine::skills::{IdRanges, SkillId, SkillOrigin};
///
/// let ranges = IdRanges::default();
/// assert_eq!(SkillId::new(10_001).origin(&ranges), SkillOrigin::Equipment);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdRanges {
    pub innate: RangeInclusive<u32>,
    pub equipment: RangeInclusive<u32>,
    pub enemy: RangeInclusive<u32>,
}

impl Default for IdRanges {
    fn default() -> Self {
        Self {
            innate: 1..=9_999,
            equipment: 10_000..=19_999,
            enemy: 20_000..=29_999,
        }
    }
}

impl IdRanges {
    /// Classify an ID. Earlier ranges win when ranges overlap.
    #[must_use]
    pub fn classify(&self, id: SkillId) -> SkillOrigin {
        let raw = id.raw();
        if self.innate.contains(&raw) {
            SkillOrigin::Innate
        } else if self.equipment.contains(&raw) {
            SkillOrigin::Equipment
        } else if self.enemy.contains(&raw) {
            SkillOrigin::Enemy
        } else {
            SkillOrigin::Unclassified
        }
    }
}

/// Which side may use a skill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillUsers {
    /// Player characters only.
    #[default]
    Characters,
    /// Enemies only.
    Enemies,
    /// Either side.
    Anyone,
}

impl SkillUsers {
    /// Check whether an actor on `side` may use the skill.
    #[must_use]
    pub fn allows(self, side: Side) -> bool {
        matches!(
            (self, side),
            (SkillUsers::Anyone, _)
                | (SkillUsers::Characters, Side::Characters)
                | (SkillUsers::Enemies, Side::Enemies)
        )
    }

    /// Character-usable skills need display text.
    #[must_use]
    pub fn includes_characters(self) -> bool {
        self.allows(Side::Characters)
    }
}

/// Animation names for the presentation layer. Opaque to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationHints {
    /// Pose held while warming up.
    pub warmup_action: Option<String>,
    /// Animation played at execution.
    pub action: Option<String>,
}

/// Validated, immutable skill descriptor.
///
/// Construct one through [`validate`](super::validate) or register a
/// [`SkillRecord`](super::SkillRecord) directly.
#[derive(Clone, Debug)]
pub struct SkillDescriptor {
    pub(crate) id: SkillId,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) icon: Option<String>,
    pub(crate) cost: u32,
    pub(crate) warmup_ms: u32,
    pub(crate) cooldown_ms: u32,
    pub(crate) target: TargetCategory,
    pub(crate) users: SkillUsers,
    pub(crate) battle_effect: Arc<dyn BattleEffect>,
    pub(crate) field_effect: Option<Arc<dyn FieldEffect>>,
    pub(crate) presentation: PresentationHints,
}

impl SkillDescriptor {
    #[must_use]
    pub fn id(&self) -> SkillId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Skill points consumed at execution.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    #[must_use]
    pub fn warmup_ms(&self) -> u32 {
        self.warmup_ms
    }

    #[must_use]
    pub fn cooldown_ms(&self) -> u32 {
        self.cooldown_ms
    }

    #[must_use]
    pub fn target(&self) -> TargetCategory {
        self.target
    }

    #[must_use]
    pub fn users(&self) -> SkillUsers {
        self.users
    }

    /// Strategy invoked once at the `Executing` transition.
    #[must_use]
    pub fn battle_effect(&self) -> &Arc<dyn BattleEffect> {
        &self.battle_effect
    }

    /// Strategy for immediate use outside battle.
    #[must_use]
    pub fn field_effect(&self) -> Option<&Arc<dyn FieldEffect>> {
        self.field_effect.as_ref()
    }

    #[must_use]
    pub fn presentation(&self) -> &PresentationHints {
        &self.presentation
    }
}

/// Effects are compared by identity; everything else by value.
impl PartialEq for SkillDescriptor {
    fn eq(&self, other: &Self) -> bool {
        let same_field_effect = match (&self.field_effect, &other.field_effect) {
            (Some(a), Some(b)) => same_strategy(a, b),
            (None, None) => true,
            _ => false,
        };

        self.id == other.id
            && self.name == other.name
            && self.description == other.description
            && self.icon == other.icon
            && self.cost == other.cost
            && self.warmup_ms == other.warmup_ms
            && self.cooldown_ms == other.cooldown_ms
            && self.target == other.target
            && self.users == other.users
            && self.presentation == other.presentation
            && same_strategy(&self.battle_effect, &other.battle_effect)
            && same_field_effect
    }
}

fn same_strategy<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
