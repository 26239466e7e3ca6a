//! Actor identification.
//!
//! Every combatant (character or enemy) is addressed by a stable `ActorId`.
//! IDs are arena-style handles: they never point at actor data directly, so
//! an actor that leaves the battle between selection and execution is
//! detected by a failed lookup rather than a dangling reference.
//!
//! ```
//! use skill_engine::core::ActorId;
//!
//! let hero = ActorId::new(1);
//! assert_eq!(hero.raw(), 1);
//! assert_eq!(hero.to_string(), "Actor(1)");
//! ```

use serde::{Deserialize, Serialize};

/// Stable identifier for an actor taking part in combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    /// Create a new actor ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ActorId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}
