//! Timing state machine for skill usages.
//!
//! The scheduler owns every in-flight [`SkillUsage`] and advances them by
//! elapsed time:
//!
//! 1. `begin_use` checks the request and the cost, then starts warmup
//! 2. `tick` spends elapsed time in the current phase; leftover time carries
//!    into the next timed phase, so zero durations pass through on the same
//!    tick
//! 3. when warmup runs out the usage resolves targets, pays its cost and
//!    invokes the battle effect exactly once
//! 4. the actor stays busy until the cooldown has fully elapsed
//!
//! Each actor has at most one usage in flight.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::usage::{ExecutionReport, SkillUsage, UsageHandle, UsagePhase};
use crate::core::{ActorId, CombatRng, EngineConfig, Formation};
use crate::effects::{collect_targets, EffectContext, Formulas, TargetContext, TargetSelection};
use crate::error::{FailureReason, UseError};
use crate::providers::{Presenter, StatKind, StatProvider};
use crate::skills::{SkillDescriptor, SkillId, SkillRegistry};

/// Result of advancing a usage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// Still in flight, in the given phase.
    Pending(UsagePhase),
    /// Cooldown finished. Carries the execution record.
    Completed(ExecutionReport),
    /// Ended without completing. No cost was paid.
    Failed(FailureReason),
}

impl TickStatus {
    /// Check whether the usage is gone from the scheduler.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Pending(_))
    }
}

/// Collaborators needed to advance usages.
pub struct TickContext<'a> {
    pub registry: &'a SkillRegistry,
    pub formation: &'a Formation,
    pub stats: &'a mut dyn StatProvider,
    pub presenter: &'a dyn Presenter,
    pub rng: &'a mut CombatRng,
    pub formulas: &'a Formulas,
    pub config: &'a EngineConfig,
}

/// Owner of every in-flight usage of a session.
#[derive(Clone, Debug, Default)]
pub struct UsageScheduler {
    /// Ordered by handle, so `tick_all` advances in request order.
    usages: BTreeMap<UsageHandle, SkillUsage>,
    busy: FxHashMap<ActorId, UsageHandle>,
    next_id: u32,
}

impl UsageScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of usages in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.usages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }

    #[must_use]
    pub fn get(&self, handle: UsageHandle) -> Option<&SkillUsage> {
        self.usages.get(&handle)
    }

    /// Current phase of a usage, if still in flight.
    #[must_use]
    pub fn phase(&self, handle: UsageHandle) -> Option<UsagePhase> {
        self.usages.get(&handle).map(SkillUsage::phase)
    }

    /// Check whether an actor has a usage in flight.
    #[must_use]
    pub fn is_busy(&self, actor: ActorId) -> bool {
        self.busy.contains_key(&actor)
    }

    /// In-flight usage of an actor.
    #[must_use]
    pub fn usage_of(&self, actor: ActorId) -> Option<UsageHandle> {
        self.busy.get(&actor).copied()
    }

    /// Handles in flight, in request order.
    #[must_use]
    pub fn handles(&self) -> Vec<UsageHandle> {
        self.usages.keys().copied().collect()
    }

    /// Request a skill use and start its warmup.
    ///
    /// Nothing changes on failure.
    pub fn begin_use(
        &mut self,
        actor: ActorId,
        skill: SkillId,
        selection: TargetSelection,
        ctx: &TickContext<'_>,
    ) -> Result<UsageHandle, UseError> {
        let descriptor = ctx.registry.lookup(skill)?;

        let side = ctx
            .formation
            .side_of(actor)
            .filter(|_| ctx.stats.is_alive(actor))
            .ok_or(UseError::ActorUnavailable(actor))?;

        if !descriptor.users().allows(side) {
            return Err(UseError::NotUsable { skill, actor });
        }
        if self.is_busy(actor) {
            return Err(UseError::ActorBusy(actor));
        }
        if descriptor.target().is_single() && selection == TargetSelection::None {
            return Err(UseError::MissingTarget(skill));
        }

        let available = ctx
            .stats
            .statistic(actor, StatKind::SkillPoints)
            .map_err(|_| UseError::ActorUnavailable(actor))?;
        if !can_afford(available, descriptor.cost()) {
            return Err(UseError::InsufficientResource {
                actor,
                needed: descriptor.cost(),
                available,
            });
        }

        let handle = UsageHandle::new(self.next_id);
        self.next_id += 1;

        let mut usage = SkillUsage::new(handle, actor, side, skill, selection);
        usage.enter(UsagePhase::WarmingUp);
        tracing::debug!("{} began {} as {}", actor, descriptor.name(), handle);

        self.busy.insert(actor, handle);
        self.usages.insert(handle, usage);
        Ok(handle)
    }

    /// Advance one usage by `elapsed_ms`.
    ///
    /// Finished usages are removed and their handle becomes unknown.
    pub fn tick(
        &mut self,
        handle: UsageHandle,
        elapsed_ms: u32,
        ctx: &mut TickContext<'_>,
    ) -> Result<TickStatus, UseError> {
        let registry = ctx.registry;
        let usage = self.usages.get_mut(&handle).ok_or(UseError::UnknownUsage(handle))?;
        let descriptor = match registry.lookup(usage.skill()) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                self.discard(handle);
                return Err(err.into());
            }
        };

        let status = advance(usage, descriptor, elapsed_ms, ctx);
        match &status {
            TickStatus::Pending(_) => {}
            TickStatus::Completed(_) => {
                tracing::debug!("{} completed", handle);
                self.discard(handle);
            }
            TickStatus::Failed(reason) => {
                tracing::debug!("{} failed: {}", handle, reason);
                self.discard(handle);
            }
        }
        Ok(status)
    }

    /// Advance every usage by the shared clock, in request order.
    pub fn tick_all(&mut self, elapsed_ms: u32, ctx: &mut TickContext<'_>) -> Vec<(UsageHandle, TickStatus)> {
        let mut statuses = Vec::with_capacity(self.usages.len());
        for handle in self.handles() {
            match self.tick(handle, elapsed_ms, ctx) {
                Ok(status) => statuses.push((handle, status)),
                Err(err) => tracing::warn!("dropped {}: {}", handle, err),
            }
        }
        statuses
    }

    /// Cancel a usage that has not executed yet.
    ///
    /// Returns `Ok(false)` once the effect has run; the cooldown cannot be
    /// cut short.
    pub fn cancel(&mut self, handle: UsageHandle) -> Result<bool, UseError> {
        let usage = self.usages.get(&handle).ok_or(UseError::UnknownUsage(handle))?;
        if !usage.phase().is_cancellable() {
            return Ok(false);
        }

        tracing::debug!("{} cancelled", handle);
        self.discard(handle);
        Ok(true)
    }

    /// Cancel an actor's usage if it is still warming up.
    pub fn cancel_actor(&mut self, actor: ActorId) -> Option<UsageHandle> {
        let handle = self.usage_of(actor)?;
        match self.cancel(handle) {
            Ok(true) => Some(handle),
            _ => None,
        }
    }

    /// Drop every usage, returning the handles that were in flight.
    pub fn clear(&mut self) -> Vec<UsageHandle> {
        let handles = self.handles();
        self.usages.clear();
        self.busy.clear();
        handles
    }

    fn discard(&mut self, handle: UsageHandle) {
        if let Some(usage) = self.usages.remove(&handle) {
            self.busy.remove(&usage.actor());
        }
    }
}

fn can_afford(available: i32, cost: u32) -> bool {
    i64::from(available) >= i64::from(cost)
}

/// Spend `budget` ms across as many phases as it covers.
fn advance(
    usage: &mut SkillUsage,
    descriptor: &SkillDescriptor,
    mut budget: u32,
    ctx: &mut TickContext<'_>,
) -> TickStatus {
    loop {
        match usage.phase() {
            UsagePhase::Selected => usage.enter(UsagePhase::WarmingUp),

            UsagePhase::WarmingUp => {
                if !user_present(usage, ctx) {
                    return fail(usage, FailureReason::Cancelled);
                }
                match usage.spend(descriptor.warmup_ms(), budget) {
                    Some(rest) => {
                        budget = rest;
                        usage.enter(UsagePhase::Ready);
                    }
                    None => return TickStatus::Pending(UsagePhase::WarmingUp),
                }
            }

            UsagePhase::Ready => {
                if let Err(reason) = execute(usage, descriptor, ctx) {
                    return fail(usage, reason);
                }
            }

            // Only entered inside `execute`.
            UsagePhase::Executing => usage.enter(UsagePhase::CoolingDown),

            UsagePhase::CoolingDown => match usage.spend(descriptor.cooldown_ms(), budget) {
                Some(_) => {
                    usage.enter(UsagePhase::Complete);
                    return match usage.take_report() {
                        Some(report) => TickStatus::Completed(report),
                        None => TickStatus::Pending(UsagePhase::Complete),
                    };
                }
                None => return TickStatus::Pending(UsagePhase::CoolingDown),
            },

            phase @ UsagePhase::Complete => return TickStatus::Pending(phase),
            UsagePhase::Failed(reason) => return TickStatus::Failed(reason),
        }
    }
}

/// The user is alive and still on the side it began the usage from.
fn user_present(usage: &SkillUsage, ctx: &TickContext<'_>) -> bool {
    ctx.formation.side_of(usage.actor()) == Some(usage.side()) && ctx.stats.is_alive(usage.actor())
}

fn fail(usage: &mut SkillUsage, reason: FailureReason) -> TickStatus {
    usage.enter(UsagePhase::Failed(reason));
    TickStatus::Failed(reason)
}

/// Resolve targets, pay the cost and run the battle effect.
///
/// Leaves the usage in `Executing`; nothing is mutated on failure.
fn execute(
    usage: &mut SkillUsage,
    descriptor: &SkillDescriptor,
    ctx: &mut TickContext<'_>,
) -> Result<(), FailureReason> {
    let actor = usage.actor();
    if !user_present(usage, ctx) {
        return Err(FailureReason::Cancelled);
    }

    let targets = {
        let target_ctx = TargetContext::new(actor, usage.side(), ctx.formation, &*ctx.stats);
        collect_targets(descriptor.target(), usage.selection(), &target_ctx)
            .map_err(FailureReason::TargetInvalidated)?
    };

    let cost = descriptor.cost();
    if cost > 0 {
        if let Err(err) = ctx.stats.consume_skill_points(actor, cost) {
            tracing::debug!("{} cannot pay for {}: {}", actor, descriptor.name(), err);
            return Err(FailureReason::InsufficientResource);
        }
    }

    usage.enter(UsagePhase::Executing);
    let effect = {
        let mut effect_ctx = EffectContext {
            stats: &mut *ctx.stats,
            presenter: ctx.presenter,
            rng: &mut *ctx.rng,
            formulas: ctx.formulas,
            config: ctx.config,
        };
        descriptor.battle_effect().execute(actor, &targets, &mut effect_ctx)
    };

    match &effect {
        Ok(report) => tracing::debug!(
            "{} executed {} on {} targets ({} missed)",
            actor,
            descriptor.name(),
            targets.len(),
            report.misses()
        ),
        Err(err) => tracing::warn!("{} failed while executing {}: {}", actor, descriptor.name(), err),
    }

    usage.record(ExecutionReport {
        skill: descriptor.id(),
        user: actor,
        targets,
        cost_paid: cost,
        effect,
    });
    Ok(())
}
