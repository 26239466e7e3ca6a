//! Skill registry for descriptor lookup.
//!
//! The `SkillRegistry` stores every skill descriptor known to a battle.
//! It is populated once during content load, then shared read-only
//! (`Arc<SkillRegistry>`) by every session. Lookups need no locking.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{SkillDescriptor, SkillId};
use super::record::SkillRecord;
use super::validation::validate;
use crate::effects::TargetCategory;
use crate::error::{LookupError, RegisterError};

/// Registry of skill descriptors keyed by stable ID.
///
/// ## Example
///
/// ```
/// use skill_engine::effects::{EffectSpec, TargetCategory};
/// use skill_engine::providers::StatKind;
/// use skill_engine::skills::{SkillId, SkillRecord, SkillRegistry};
///
/// let mut registry = SkillRegistry::new();
///
/// let bash = SkillRecord::new(1, "Bash", TargetCategory::SingleFoe)
///     .with_description("Hits one foe.")
///     .with_battle_effect(EffectSpec::damage(StatKind::Strength, 2, 4));
///
/// let id = registry.register(bash).unwrap();
///
/// let found = registry.lookup(id).unwrap();
/// assert_eq!(found.name(), "Bash");
/// assert!(registry.lookup(SkillId::new(99)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SkillRegistry {
    skills: FxHashMap<SkillId, SkillDescriptor>,
}

impl SkillRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a raw record and register the resulting descriptor.
    ///
    /// The registry is unchanged when this fails.
    pub fn register(&mut self, record: SkillRecord) -> Result<SkillId, RegisterError> {
        let raw_id = record.id;
        let descriptor =
            validate(record).map_err(|source| RegisterError::Validation { id: raw_id, source })?;
        self.insert(descriptor)
    }

    /// Register an already validated descriptor.
    pub fn insert(&mut self, descriptor: SkillDescriptor) -> Result<SkillId, RegisterError> {
        let id = descriptor.id();
        if self.skills.contains_key(&id) {
            tracing::warn!("rejected duplicate {}", id);
            return Err(RegisterError::DuplicateId(id));
        }

        tracing::trace!("registered {} ({})", id, descriptor.name());
        self.skills.insert(id, descriptor);
        Ok(id)
    }

    /// Look up a skill.
    ///
    /// `NotFound` means the skill is unusable, not that anything broke.
    pub fn lookup(&self, id: SkillId) -> Result<&SkillDescriptor, LookupError> {
        self.skills.get(&id).ok_or(LookupError::NotFound(id))
    }

    /// Get a skill descriptor by ID.
    #[must_use]
    pub fn get(&self, id: SkillId) -> Option<&SkillDescriptor> {
        self.skills.get(&id)
    }

    /// Check if a skill ID is registered.
    #[must_use]
    pub fn contains(&self, id: SkillId) -> bool {
        self.skills.contains_key(&id)
    }

    /// Get the number of registered skills.
    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Iterate over all descriptors (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &SkillDescriptor> {
        self.skills.values()
    }

    /// All registered IDs in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<SkillId> {
        let mut ids: Vec<_> = self.skills.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Find skills by target category.
    pub fn by_target(&self, target: TargetCategory) -> impl Iterator<Item = &SkillDescriptor> {
        self.skills.values().filter(move |s| s.target() == target)
    }

    /// Find skills matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &SkillDescriptor>
    where
        F: Fn(&SkillDescriptor) -> bool,
    {
        self.skills.values().filter(move |s| predicate(s))
    }

    /// Drop every descriptor (content teardown).
    pub fn clear(&mut self) {
        tracing::debug!("clearing {} skills", self.skills.len());
        self.skills.clear();
    }

    /// Freeze the registry for shared read-only use during combat.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
