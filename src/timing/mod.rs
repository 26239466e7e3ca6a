//! Skill timing: warmup, execution, cooldown.
//!
//! - `SkillUsage`: one in-flight use of a skill
//! - `UsageScheduler`: owns usages and advances them by elapsed time
//! - `TickStatus`: what a tick did to a usage
//!
//! Timed phases are the only suspension points. Progression is cooperative:
//! nothing moves unless the owner ticks.

mod scheduler;
mod usage;

pub use scheduler::{TickContext, TickStatus, UsageScheduler};
pub use usage::{ExecutionReport, SkillUsage, UsageHandle, UsagePhase};
