//! Error types.
//!
//! Load-time errors reject a single record and never abort a batch.
//! Use-time errors discard a skill-use instance without side effects.
//! Presentation errors are logged by the pipeline and never surface as
//! combat-state errors.

use thiserror::Error;

use crate::core::ActorId;
use crate::skills::SkillId;
use crate::timing::UsageHandle;

// ============================================================================
// Load-time Errors
// ============================================================================

/// A raw skill record violates a descriptor invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Skill IDs start at 1.
    #[error("skill id must be positive, got {0}")]
    NonPositiveId(i64),

    /// Skill ID does not fit the registry key.
    #[error("skill id {0} is out of range")]
    IdOutOfRange(i64),

    /// Display name is empty.
    #[error("skill name is empty")]
    EmptyName,

    /// Character-usable skills must carry a description.
    #[error("skill usable by characters has no description")]
    MissingDescription,

    /// Cost or duration is negative.
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    /// Cost or duration exceeds the engine's range.
    #[error("{field} must not exceed {max}, got {value}")]
    TooLarge { field: &'static str, value: i64, max: u32 },

    /// No battle effect strategy was provided.
    #[error("skill has no battle effect")]
    MissingBattleEffect,

    /// The field effect variant only makes sense in battle.
    #[error("{0} effects cannot be used outside battle")]
    UnsupportedFieldEffect(&'static str),

    /// Effect parameters are out of range.
    #[error("invalid effect: {0}")]
    InvalidEffect(&'static str),
}

/// Registering a skill failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The record failed validation.
    #[error("skill {id} failed validation: {source}")]
    Validation {
        id: i64,
        #[source]
        source: ValidationError,
    },

    /// Another descriptor already holds this ID.
    #[error("{0} is already registered")]
    DuplicateId(SkillId),
}

/// Content text could not be parsed.
#[derive(Debug, Error)]
pub enum ContentError {
    /// RON syntax or shape error.
    #[error("failed to parse content: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Lookup of an unknown skill ID.
///
/// Callers treat this as "skill unavailable", a normal outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{0} is not registered")]
    NotFound(SkillId),
}

// ============================================================================
// Use-time Errors
// ============================================================================

/// `begin_use` / `tick` rejected a request.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UseError {
    /// Unknown skill ID.
    #[error("{0} is not registered")]
    NotFound(SkillId),

    /// The actor cannot pay the skill-point cost.
    #[error("{actor} needs {needed} skill points but has {available}")]
    InsufficientResource {
        actor: ActorId,
        needed: u32,
        available: i32,
    },

    /// The actor is defeated or not part of the battle.
    #[error("{0} cannot act")]
    ActorUnavailable(ActorId),

    /// The actor already has a skill in flight.
    #[error("{0} already has a skill in flight")]
    ActorBusy(ActorId),

    /// The skill is not usable by the actor's side.
    #[error("{skill} cannot be used by {actor}")]
    NotUsable { skill: SkillId, actor: ActorId },

    /// A single-target skill was selected without a target.
    #[error("{0} needs a selected target")]
    MissingTarget(SkillId),

    /// The handle does not name an in-flight usage.
    #[error("{0} is not an active usage")]
    UnknownUsage(UsageHandle),
}

impl From<LookupError> for UseError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(id) => UseError::NotFound(id),
        }
    }
}

/// Target resolution failed at execution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TargetError {
    /// The selected target is defeated, gone, or on the wrong side.
    #[error("{0} is no longer a valid target")]
    Invalidated(ActorId),

    /// A single-target category was resolved without a selection.
    #[error("no target was selected")]
    MissingSelection,
}

/// Why a skill-use instance ended without completing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// Targets could not be resolved at execution time.
    #[error("target invalidated: {0}")]
    TargetInvalidated(TargetError),

    /// Interrupted during warmup.
    #[error("cancelled during warmup")]
    Cancelled,

    /// Skill points fell below the cost during warmup.
    #[error("insufficient skill points at execution")]
    InsufficientResource,
}

// ============================================================================
// Collaborator Errors
// ============================================================================

/// The stat provider rejected a request.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No actor with this ID is known.
    #[error("{0} is unknown")]
    UnknownActor(ActorId),

    /// Skill points could not cover the amount.
    #[error("{actor} has {available} skill points, {needed} needed")]
    InsufficientSkillPoints {
        actor: ActorId,
        needed: u32,
        available: i32,
    },

    /// Any other provider-specific failure.
    #[error("stat provider failure: {0}")]
    Other(String),
}

/// A presentation request failed.
///
/// Never propagated into combat state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PresentationError {
    #[error("missing asset {0}")]
    MissingAsset(String),

    #[error("presentation backend failure: {0}")]
    Backend(String),
}

/// A battle or field effect failed while running.
///
/// Isolated to the skill-use instance that raised it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The effect cannot run in this context.
    #[error("{0} effects cannot be used outside battle")]
    NotFieldUsable(&'static str),

    /// Failure raised by a custom strategy.
    #[error("effect failed: {0}")]
    Custom(String),
}

/// Using a skill outside battle failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldUseError {
    #[error("{0} is not registered")]
    NotFound(SkillId),

    #[error("{0} has no field effect")]
    NoFieldEffect(SkillId),

    #[error("{actor} needs {needed} skill points but has {available}")]
    InsufficientResource {
        actor: ActorId,
        needed: u32,
        available: i32,
    },

    /// The instigator has a battle usage in flight.
    #[error("{0} is busy with another skill")]
    ActorBusy(ActorId),

    #[error(transparent)]
    Effect(#[from] EffectError),
}

impl From<LookupError> for FieldUseError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(id) => FieldUseError::NotFound(id),
        }
    }
}

impl From<ProviderError> for FieldUseError {
    fn from(err: ProviderError) -> Self {
        FieldUseError::Effect(EffectError::Provider(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = RegisterError::Validation {
            id: 3,
            source: ValidationError::Negative { field: "cost", value: -2 },
        };
        assert_eq!(err.to_string(), "skill 3 failed validation: cost must be non-negative, got -2");

        let err = UseError::InsufficientResource {
            actor: ActorId(1),
            needed: 6,
            available: 2,
        };
        assert_eq!(err.to_string(), "Actor(1) needs 6 skill points but has 2");

        let reason = FailureReason::TargetInvalidated(TargetError::Invalidated(ActorId(9)));
        assert_eq!(reason.to_string(), "target invalidated: Actor(9) is no longer a valid target");
    }

    #[test]
    fn test_lookup_conversions() {
        let lookup = LookupError::NotFound(SkillId::new(4));
        assert_eq!(UseError::from(lookup), UseError::NotFound(SkillId::new(4)));
        assert_eq!(FieldUseError::from(lookup), FieldUseError::NotFound(SkillId::new(4)));
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let err = EffectError::from(ProviderError::UnknownActor(ActorId(2)));
        assert_eq!(err.to_string(), "Actor(2) is unknown");
    }
}
