//! Skill-use instances.
//!
//! A `SkillUsage` tracks one in-flight use of a skill: who used it, what was
//! selected, which phase it is in and how long it has spent there. Usages
//! are owned by the scheduler and discarded once their result is reported.

use serde::{Deserialize, Serialize};

use crate::core::{ActorId, Side};
use crate::effects::{EffectReport, TargetSelection, TargetSet};
use crate::error::{EffectError, FailureReason};
use crate::skills::SkillId;

/// Handle naming an in-flight usage within one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UsageHandle(pub u32);

impl UsageHandle {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for UsageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Usage({})", self.0)
    }
}

/// Lifecycle of a skill use.
///
/// ```text
/// Selected -> WarmingUp -> Ready -> Executing -> CoolingDown -> Complete
///                  \           \
///                   +-----------+--> Failed(reason)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsagePhase {
    /// Requested, cost not yet checked.
    Selected,
    /// Waiting out the warmup. Cancellable.
    WarmingUp,
    /// Warmup elapsed; executes on the same tick.
    Ready,
    /// The battle effect is running.
    Executing,
    /// Waiting out the cooldown. The actor stays busy.
    CoolingDown,
    /// Finished; the actor is idle again.
    Complete,
    /// Ended without completing.
    Failed(FailureReason),
}

impl UsagePhase {
    /// Check whether the phase ends the usage.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed(_))
    }

    /// Check whether the usage can still be cancelled without cost.
    #[must_use]
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Selected | Self::WarmingUp | Self::Ready)
    }
}

impl std::fmt::Display for UsagePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selected => write!(f, "selected"),
            Self::WarmingUp => write!(f, "warming up"),
            Self::Ready => write!(f, "ready"),
            Self::Executing => write!(f, "executing"),
            Self::CoolingDown => write!(f, "cooling down"),
            Self::Complete => write!(f, "complete"),
            Self::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Record of one battle-effect execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionReport {
    pub skill: SkillId,
    pub user: ActorId,
    /// Targets resolved at execution time, in order.
    pub targets: TargetSet,
    /// Skill points consumed.
    pub cost_paid: u32,
    /// What the effect did, or why it failed part-way.
    pub effect: Result<EffectReport, EffectError>,
}

impl ExecutionReport {
    /// Outcomes of a successful execution.
    #[must_use]
    pub fn outcomes(&self) -> Option<&EffectReport> {
        self.effect.as_ref().ok()
    }
}

/// One in-flight use of a skill.
#[derive(Clone, Debug)]
pub struct SkillUsage {
    handle: UsageHandle,
    actor: ActorId,
    side: Side,
    skill: SkillId,
    selection: TargetSelection,
    phase: UsagePhase,
    /// Time spent in the current timed phase.
    phase_elapsed_ms: u32,
    report: Option<ExecutionReport>,
}

impl SkillUsage {
    pub(crate) fn new(
        handle: UsageHandle,
        actor: ActorId,
        side: Side,
        skill: SkillId,
        selection: TargetSelection,
    ) -> Self {
        Self {
            handle,
            actor,
            side,
            skill,
            selection,
            phase: UsagePhase::Selected,
            phase_elapsed_ms: 0,
            report: None,
        }
    }

    #[must_use]
    pub fn handle(&self) -> UsageHandle {
        self.handle
    }

    #[must_use]
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Side the actor fought for when the skill was selected.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn skill(&self) -> SkillId {
        self.skill
    }

    #[must_use]
    pub fn selection(&self) -> TargetSelection {
        self.selection
    }

    #[must_use]
    pub fn phase(&self) -> UsagePhase {
        self.phase
    }

    #[must_use]
    pub fn phase_elapsed_ms(&self) -> u32 {
        self.phase_elapsed_ms
    }

    /// The execution record, once the effect has run.
    #[must_use]
    pub fn report(&self) -> Option<&ExecutionReport> {
        self.report.as_ref()
    }

    pub(crate) fn enter(&mut self, phase: UsagePhase) {
        tracing::trace!("{} {} -> {}", self.handle, self.phase, phase);
        self.phase = phase;
        self.phase_elapsed_ms = 0;
    }

    /// Spend up to `budget` ms in the current timed phase.
    ///
    /// Returns the unspent remainder if the phase's `duration_ms` ran out,
    /// or `None` if the phase still has time left.
    pub(crate) fn spend(&mut self, duration_ms: u32, budget: u32) -> Option<u32> {
        let remaining = duration_ms.saturating_sub(self.phase_elapsed_ms);
        if budget >= remaining {
            Some(budget - remaining)
        } else {
            self.phase_elapsed_ms += budget;
            None
        }
    }

    pub(crate) fn record(&mut self, report: ExecutionReport) {
        self.report = Some(report);
    }

    pub(crate) fn take_report(&mut self) -> Option<ExecutionReport> {
        self.report.take()
    }
}
