//! Core engine types: actors, parties, RNG, configuration.
//!
//! These are the building blocks shared by the registry, the targeting
//! resolver and the timing state machine.

pub mod entity;
pub mod party;
pub mod rng;
pub mod config;

pub use entity::ActorId;
pub use party::{Formation, Party, Side};
pub use rng::{CombatRng, CombatRngState};
pub use config::{EngineConfig, HitChanceParams};
