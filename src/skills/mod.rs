//! Skill system: descriptors, raw records, validation, registry, loading.
//!
//! ## Key Types
//!
//! - `SkillId`: Stable numeric identifier (ranges carry meaning by convention)
//! - `SkillRecord`: Raw, unvalidated content record
//! - `SkillDescriptor`: Validated, immutable skill data
//! - `SkillRegistry`: Descriptor lookup, read-only during combat
//!
//! ## Lifecycle
//!
//! Records are validated and registered once at content load. The registry
//! is then frozen with `into_shared()` and handed to combat sessions.

pub mod definition;
pub mod loader;
pub mod record;
pub mod registry;
pub mod validation;

pub use definition::{IdRanges, PresentationHints, SkillDescriptor, SkillId, SkillOrigin, SkillUsers};
pub use loader::{builtin_records, load_batch, load_ron, parse_records, LoadReport};
pub use record::SkillRecord;
pub use registry::SkillRegistry;
pub use validation::validate;
