//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use skill_engine::core::{ActorId, EngineConfig, Formation};
use skill_engine::effects::{
    BattleEffect, EffectContext, EffectReport, EffectSpec, Formulas, PresentationCue, TargetCategory,
};
use skill_engine::error::EffectError;
use skill_engine::providers::{ActorSheet, InMemoryRoster, PresentationLog, StatKind, StatusKind};
use skill_engine::session::CombatSession;
use skill_engine::skills::{SkillId, SkillRecord, SkillRegistry, SkillUsers};

pub const CLERIC: ActorId = ActorId(1);
pub const KNIGHT: ActorId = ActorId(2);
pub const ARCHER: ActorId = ActorId(3);
pub const GOBLIN: ActorId = ActorId(10);
pub const TROLL: ActorId = ActorId(11);

pub const HEAL: SkillId = SkillId(1);
pub const SLASH: SkillId = SkillId(2);
pub const RALLY: SkillId = SkillId(3);
pub const CLAW: SkillId = SkillId(20001);

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn heal_record() -> SkillRecord {
    SkillRecord::new(1, "Heal", TargetCategory::SingleAlly)
        .with_description("Restores health to one ally.")
        .with_cost(6)
        .with_warmup_ms(1000)
        .with_cooldown_ms(500)
        .with_battle_effect(
            EffectSpec::heal(StatKind::Vigor, 3, 15)
                .with_cue(PresentationCue::new().with_sound("heal.ogg").with_particle("sparkle")),
        )
        .with_field_effect(EffectSpec::heal(StatKind::Vigor, 3, 15))
}

pub fn slash_record() -> SkillRecord {
    SkillRecord::new(2, "Slash", TargetCategory::SingleFoe)
        .with_description("Cuts one foe.")
        .with_warmup_ms(300)
        .with_cooldown_ms(700)
        .with_battle_effect(
            EffectSpec::damage(StatKind::Strength, 2, 4).with_cue(
                PresentationCue::new()
                    .with_sound("slash.ogg")
                    .with_particle("cut")
                    .with_large_particle("cut_large"),
            ),
        )
}

pub fn rally_record() -> SkillRecord {
    SkillRecord::new(3, "Rally", TargetCategory::AllAllies)
        .with_description("Raises every ally's vigor.")
        .with_cost(4)
        .with_warmup_ms(500)
        .with_cooldown_ms(500)
        .with_battle_effect(EffectSpec::status(StatusKind::Vigor, 1, StatKind::Vigor, 3000, 10_000))
}

pub fn claw_record() -> SkillRecord {
    SkillRecord::new(20001, "Claw", TargetCategory::SingleFoe)
        .with_users(SkillUsers::Enemies)
        .with_warmup_ms(200)
        .with_battle_effect(EffectSpec::damage(StatKind::Strength, 1, 0))
}

pub fn registry() -> SkillRegistry {
    let mut registry = SkillRegistry::new();
    for record in [heal_record(), slash_record(), rally_record(), claw_record()] {
        registry.register(record).expect("fixture skill is valid");
    }
    registry
}

pub fn roster() -> InMemoryRoster {
    let mut roster = InMemoryRoster::new();
    roster.insert(CLERIC, ActorSheet::new(60, 30).with_stat(StatKind::Vigor, 10));
    roster.insert(
        KNIGHT,
        ActorSheet::new(200, 0)
            .with_stat(StatKind::HitPoints, 100)
            .with_stat(StatKind::Strength, 12)
            .with_position(40.0, 80.0),
    );
    roster.insert(ARCHER, ActorSheet::new(80, 10).with_stat(StatKind::Agility, 20));
    roster.insert(
        GOBLIN,
        ActorSheet::new(50, 0)
            .with_stat(StatKind::Strength, 6)
            .with_position(300.0, 90.0)
            .with_extent(48.0, 48.0),
    );
    roster.insert(
        TROLL,
        ActorSheet::new(400, 0)
            .with_stat(StatKind::Strength, 20)
            .with_position(360.0, 70.0)
            .with_extent(220.0, 260.0),
    );
    roster
}

pub fn formation() -> Formation {
    Formation::new([CLERIC, KNIGHT, ARCHER], [GOBLIN, TROLL])
}

pub type TestSession = CombatSession<InMemoryRoster, PresentationLog>;

/// Session with deterministic hits unless `formulas` says otherwise.
pub fn session_with(registry: SkillRegistry, seed: u64, formulas: Formulas) -> TestSession {
    CombatSession::new(
        registry.into_shared(),
        roster(),
        PresentationLog::new(),
        formation(),
        EngineConfig::new(seed),
    )
    .with_formulas(formulas)
}

pub fn session(seed: u64) -> TestSession {
    session_with(registry(), seed, Formulas::deterministic())
}

/// Battle effect that only counts its invocations.
#[derive(Debug, Default)]
pub struct CountingEffect {
    calls: AtomicUsize,
}

impl CountingEffect {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BattleEffect for CountingEffect {
    fn execute(
        &self,
        _user: ActorId,
        _targets: &[ActorId],
        _ctx: &mut EffectContext<'_>,
    ) -> Result<EffectReport, EffectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(EffectReport::new())
    }
}
