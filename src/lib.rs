//! # skill-engine
//!
//! A data-driven ability execution engine for timed combat.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven**: Skills are validated records keyed by stable numeric
//!    IDs. The engine interprets them; it hardcodes no individual skill.
//!
//! 2. **Explicit Context**: A `CombatSession` owns everything a battle needs.
//!    There are no global registries or singletons.
//!
//! 3. **Narrow Collaborators**: Actor stats, audio and particles are reached
//!    through the `StatProvider` and `Presenter` traits. The engine never
//!    stores actor state.
//!
//! ## Architecture
//!
//! ```text
//! SkillRegistry --begin_use--> UsageScheduler --warmup elapsed--> resolve_targets
//!                                                                  |
//!                               StatProvider + Presenter <-- BattleEffect
//! ```
//!
//! - **Timing**: each usage walks `Selected -> WarmingUp -> Ready ->
//!   Executing -> CoolingDown -> Complete`, or ends in `Failed`.
//! - **Late targeting**: targets are resolved when the warmup ends, so a
//!   target defeated mid-warmup fails the usage cleanly.
//! - **Determinism**: all randomness comes from a seeded `CombatRng`.
//!
//! ## Modules
//!
//! - `core`: Actor IDs, parties, RNG, configuration
//! - `skills`: Descriptors, records, validation, registry, content loading
//! - `effects`: Targeting, effect strategies, formulas
//! - `timing`: Skill-use state machine
//! - `providers`: Stat provider and presenter interfaces
//! - `session`: Per-battle context object
//! - `field`: Immediate use outside battle

pub mod core;
pub mod effects;
pub mod error;
pub mod field;
pub mod providers;
pub mod session;
pub mod skills;
pub mod timing;

// Re-export commonly used types
pub use crate::core::{ActorId, CombatRng, CombatRngState, EngineConfig, Formation, HitChanceParams, Party, Side};

pub use crate::skills::{
    load_batch, load_ron, validate, LoadReport, SkillDescriptor, SkillId, SkillRecord, SkillRegistry, SkillUsers,
};

pub use crate::effects::{
    BattleEffect, EffectContext, EffectReport, EffectSpec, FieldContext, FieldEffect, Formulas, PresentationCue,
    TargetCategory, TargetOutcome, TargetSelection,
};

pub use crate::timing::{ExecutionReport, TickStatus, UsageHandle, UsagePhase};

pub use crate::providers::{Presenter, StatKind, StatProvider, StatusKind};

pub use crate::session::CombatSession;

pub use crate::field::use_in_field;

pub use crate::error::{
    ContentError, EffectError, FailureReason, FieldUseError, LookupError, PresentationError, ProviderError,
    RegisterError, TargetError, UseError, ValidationError,
};
