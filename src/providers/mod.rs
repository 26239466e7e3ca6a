//! External collaborators consumed by the engine.
//!
//! - `StatProvider`: actor statistics, health, statuses, skill points
//! - `Presenter`: sounds and particle effects
//!
//! Reference implementations (`InMemoryRoster`, `PresentationLog`) back the
//! test-suite and small embeddings.

pub mod presentation;
pub mod roster;
pub mod stats;

pub use presentation::{Cue, NullPresenter, PresentationLog, Presenter};
pub use roster::{ActiveStatus, ActorSheet, InMemoryRoster, StatRequest};
pub use stats::{DamageOutcome, Extent, HealOutcome, Position, SharedStats, StatKind, StatProvider, StatusKind};
