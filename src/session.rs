//! Combat session context.
//!
//! A `CombatSession` bundles everything one battle needs: the shared skill
//! registry, the stat provider, the presenter, both parties, the RNG, the
//! formulas and the in-flight usages. It is the only entry point for using
//! skills in battle.
//!
//! ```
//! use skill_engine::core::{ActorId, EngineConfig, Formation};
//! use skill_engine::effects::{EffectSpec, TargetCategory};
//! use skill_engine::providers::{ActorSheet, InMemoryRoster, NullPresenter, StatKind};
//! use skill_engine::session::CombatSession;
//! use skill_engine::skills::{SkillId, SkillRecord, SkillRegistry};
//! use skill_engine::timing::TickStatus;
//!
//! let mut registry = SkillRegistry::new();
//! registry
//!     .register(
//!         SkillRecord::new(1, "First Aid", TargetCategory::SingleAlly)
//!             .with_description("Restores a little health.")
//!             .with_cost(6)
//!             .with_warmup_ms(1000)
//!             .with_battle_effect(EffectSpec::heal(StatKind::Vigor, 3, 15)),
//!     )
//!     .unwrap();
//!
//! let hero = ActorId::new(1);
//! let mut roster = InMemoryRoster::new();
//! roster.insert(hero, ActorSheet::new(100, 10).with_stat(StatKind::Vigor, 10));
//!
//! let mut session = CombatSession::new(
//!     registry.into_shared(),
//!     roster,
//!     NullPresenter,
//!     Formation::new([hero], [ActorId::new(9)]),
//!     EngineConfig::new(7),
//! );
//!
//! let handle = session.begin_use(hero, SkillId::new(1), hero).unwrap();
//! assert!(!session.tick(handle, 500).unwrap().is_finished());
//! assert!(matches!(session.tick(handle, 500).unwrap(), TickStatus::Completed(_)));
//! ```

use std::sync::Arc;

use crate::core::{ActorId, CombatRng, EngineConfig, Formation, Side};
use crate::effects::{EffectReport, Formulas, TargetSelection};
use crate::error::{FieldUseError, UseError};
use crate::field::use_in_field;
use crate::providers::{Presenter, StatProvider};
use crate::skills::{SkillId, SkillRegistry};
use crate::timing::{SkillUsage, TickContext, TickStatus, UsageHandle, UsagePhase, UsageScheduler};

/// Explicit context object for one battle.
#[derive(Debug)]
pub struct CombatSession<S, P> {
    registry: Arc<SkillRegistry>,
    stats: S,
    presenter: P,
    formation: Formation,
    rng: CombatRng,
    formulas: Formulas,
    config: EngineConfig,
    scheduler: UsageScheduler,
}

impl<S: StatProvider, P: Presenter> CombatSession<S, P> {
    /// Create a session. The RNG and default formulas come from `config`.
    pub fn new(
        registry: Arc<SkillRegistry>,
        stats: S,
        presenter: P,
        formation: Formation,
        config: EngineConfig,
    ) -> Self {
        tracing::debug!(
            "session started with {} skills, {} characters, {} enemies",
            registry.len(),
            formation.party(Side::Characters).members().count(),
            formation.party(Side::Enemies).members().count()
        );

        Self {
            registry,
            stats,
            presenter,
            formation,
            rng: CombatRng::new(config.seed),
            formulas: Formulas::from_config(&config),
            config,
            scheduler: UsageScheduler::new(),
        }
    }

    /// Replace the hit and damage formulas (builder pattern).
    #[must_use]
    pub fn with_formulas(mut self, formulas: Formulas) -> Self {
        self.formulas = formulas;
        self
    }

    /// Replace the RNG, e.g. with a restored checkpoint (builder pattern).
    #[must_use]
    pub fn with_rng(mut self, rng: CombatRng) -> Self {
        self.rng = rng;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn stats(&self) -> &S {
        &self.stats
    }

    /// Direct provider access, for changes made outside the engine.
    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    #[must_use]
    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    /// Parties can change mid-battle; targets are re-checked at execution.
    pub fn formation_mut(&mut self) -> &mut Formation {
        &mut self.formation
    }

    #[must_use]
    pub fn rng(&self) -> &CombatRng {
        &self.rng
    }

    #[must_use]
    pub fn formulas(&self) -> &Formulas {
        &self.formulas
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Skill use ===

    /// Request a skill use. See [`UsageScheduler::begin_use`].
    pub fn begin_use(
        &mut self,
        actor: ActorId,
        skill: SkillId,
        selection: impl Into<TargetSelection>,
    ) -> Result<UsageHandle, UseError> {
        let (scheduler, ctx) = self.split();
        scheduler.begin_use(actor, skill, selection.into(), &ctx)
    }

    /// Advance one usage by `elapsed_ms`.
    pub fn tick(&mut self, handle: UsageHandle, elapsed_ms: u32) -> Result<TickStatus, UseError> {
        let (scheduler, mut ctx) = self.split();
        scheduler.tick(handle, elapsed_ms, &mut ctx)
    }

    /// Advance every usage by `elapsed_ms`, in request order.
    pub fn tick_all(&mut self, elapsed_ms: u32) -> Vec<(UsageHandle, TickStatus)> {
        let (scheduler, mut ctx) = self.split();
        scheduler.tick_all(elapsed_ms, &mut ctx)
    }

    /// Cancel a usage still warming up. `Ok(false)` if it already executed.
    pub fn cancel(&mut self, handle: UsageHandle) -> Result<bool, UseError> {
        self.scheduler.cancel(handle)
    }

    /// Cancel an actor's warmup, e.g. when it is interrupted.
    pub fn cancel_actor(&mut self, actor: ActorId) -> Option<UsageHandle> {
        self.scheduler.cancel_actor(actor)
    }

    #[must_use]
    pub fn phase(&self, handle: UsageHandle) -> Option<UsagePhase> {
        self.scheduler.phase(handle)
    }

    #[must_use]
    pub fn usage(&self, handle: UsageHandle) -> Option<&SkillUsage> {
        self.scheduler.get(handle)
    }

    #[must_use]
    pub fn is_busy(&self, actor: ActorId) -> bool {
        self.scheduler.is_busy(actor)
    }

    /// Number of usages in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.scheduler.len()
    }

    /// Use a skill's field effect immediately, outside the timing machine.
    ///
    /// Refused while the instigator has a battle usage in flight.
    pub fn use_in_field(
        &mut self,
        skill: SkillId,
        target: ActorId,
        instigator: ActorId,
    ) -> Result<EffectReport, FieldUseError> {
        self.registry.lookup(skill)?;
        if self.is_busy(instigator) {
            return Err(FieldUseError::ActorBusy(instigator));
        }
        use_in_field(&self.registry, skill, target, instigator, &mut self.stats, &mut self.rng)
    }

    /// End the battle, dropping every usage in flight.
    ///
    /// Returns the dropped handles in request order. Usages still warming up
    /// never paid their cost; usages cooling down already did.
    pub fn shutdown(&mut self) -> Vec<UsageHandle> {
        let dropped = self.scheduler.clear();
        if !dropped.is_empty() {
            tracing::debug!("session shut down with {} usages in flight", dropped.len());
        }
        dropped
    }

    /// Shut down and hand back the provider and presenter.
    pub fn into_parts(mut self) -> (S, P) {
        self.shutdown();
        (self.stats, self.presenter)
    }

    fn split(&mut self) -> (&mut UsageScheduler, TickContext<'_>) {
        let ctx = TickContext {
            registry: self.registry.as_ref(),
            formation: &self.formation,
            stats: &mut self.stats,
            presenter: &self.presenter,
            rng: &mut self.rng,
            formulas: &self.formulas,
            config: &self.config,
        };
        (&mut self.scheduler, ctx)
    }
}
