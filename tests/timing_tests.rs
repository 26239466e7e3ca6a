//! Integration tests for the skill-use state machine.
//!
//! Covers request validation, warmup and cooldown accounting, cancellation
//! and late target invalidation.

mod common;

use std::sync::Arc;

use common::{ARCHER, CLAW, CLERIC, GOBLIN, HEAL, KNIGHT, SLASH, TROLL};
use skill_engine::core::ActorId;
use skill_engine::effects::{Formulas, TargetCategory, TargetSelection};
use skill_engine::error::{FailureReason, TargetError, UseError};
use skill_engine::providers::StatRequest;
use skill_engine::skills::{SkillId, SkillRecord};
use skill_engine::timing::{TickStatus, UsagePhase};

const COUNTED: SkillId = SkillId(50);

fn counted_session(effect: Arc<common::CountingEffect>, warmup_ms: i64, cooldown_ms: i64) -> common::TestSession {
    let mut registry = common::registry();
    registry
        .register(
            SkillRecord::new(50, "Counted", TargetCategory::SingleFoe)
                .with_description("Counts its executions.")
                .with_cost(5)
                .with_warmup_ms(warmup_ms)
                .with_cooldown_ms(cooldown_ms)
                .with_custom_battle_effect(effect),
        )
        .unwrap();
    common::session_with(registry, 1, Formulas::deterministic())
}

fn skill_points(session: &common::TestSession, actor: ActorId) -> u32 {
    session.stats().sheet(actor).unwrap().skill_points
}

// ============================================================================
// Request Validation
// ============================================================================

/// Each rejected request leaves no usage behind.
#[test]
fn test_begin_use_rejections() {
    common::init_tracing();
    let mut session = common::session(1);

    assert_eq!(
        session.begin_use(CLERIC, SkillId::new(999), KNIGHT).unwrap_err(),
        UseError::NotFound(SkillId::new(999))
    );
    assert_eq!(
        session.begin_use(KNIGHT, HEAL, CLERIC).unwrap_err(),
        UseError::InsufficientResource { actor: KNIGHT, needed: 6, available: 0 }
    );
    assert_eq!(
        session.begin_use(CLERIC, CLAW, GOBLIN).unwrap_err(),
        UseError::NotUsable { skill: CLAW, actor: CLERIC }
    );
    assert_eq!(
        session.begin_use(KNIGHT, SLASH, TargetSelection::None).unwrap_err(),
        UseError::MissingTarget(SLASH)
    );

    session.stats_mut().defeat(ARCHER);
    assert_eq!(
        session.begin_use(ARCHER, SLASH, GOBLIN).unwrap_err(),
        UseError::ActorUnavailable(ARCHER)
    );
    assert_eq!(
        session.begin_use(ActorId::new(99), SLASH, GOBLIN).unwrap_err(),
        UseError::ActorUnavailable(ActorId::new(99))
    );

    assert_eq!(session.in_flight(), 0);
    assert!(session.stats().journal().is_empty());
}

/// An actor runs one usage at a time.
#[test]
fn test_actor_busy_until_finished() {
    let mut session = common::session(1);
    let handle = session.begin_use(KNIGHT, SLASH, GOBLIN).unwrap();

    assert_eq!(
        session.begin_use(KNIGHT, SLASH, TROLL).unwrap_err(),
        UseError::ActorBusy(KNIGHT)
    );

    // Still busy while cooling down
    session.tick(handle, 300).unwrap();
    assert!(session.is_busy(KNIGHT));

    session.tick(handle, 700).unwrap();
    assert!(!session.is_busy(KNIGHT));
    assert!(session.begin_use(KNIGHT, SLASH, TROLL).is_ok());
}

/// Enemies use enemy skills on characters.
#[test]
fn test_enemy_skill() {
    let mut session = common::session(1);
    let handle = session.begin_use(GOBLIN, CLAW, ARCHER).unwrap();

    let status = session.tick(handle, 200).unwrap();
    assert!(matches!(status, TickStatus::Completed(_)));
    assert_eq!(session.stats().sheet(ARCHER).unwrap().hit_points, 80 - 6);
}

// ============================================================================
// Warmup And Cooldown
// ============================================================================

/// Execution waits for the full warmup and completion for the full cooldown.
#[test]
fn test_phases_wait_full_duration() {
    let mut session = common::session(1);
    let handle = session.begin_use(CLERIC, HEAL, KNIGHT).unwrap();
    assert_eq!(session.phase(handle), Some(UsagePhase::WarmingUp));

    assert_eq!(session.tick(handle, 999).unwrap(), TickStatus::Pending(UsagePhase::WarmingUp));
    assert!(session.stats().journal().is_empty());

    assert_eq!(session.tick(handle, 1).unwrap(), TickStatus::Pending(UsagePhase::CoolingDown));
    assert_eq!(session.stats().journal().len(), 2);

    assert_eq!(session.tick(handle, 499).unwrap(), TickStatus::Pending(UsagePhase::CoolingDown));
    assert!(matches!(session.tick(handle, 1).unwrap(), TickStatus::Completed(_)));
    assert_eq!(session.phase(handle), None);
}

/// Time left over after the warmup counts toward the cooldown.
#[test]
fn test_leftover_time_carries_over() {
    let mut session = common::session(1);
    let handle = session.begin_use(CLERIC, HEAL, KNIGHT).unwrap();

    assert_eq!(session.tick(handle, 1300).unwrap(), TickStatus::Pending(UsagePhase::CoolingDown));
    assert_eq!(session.usage(handle).unwrap().phase_elapsed_ms(), 300);

    assert!(matches!(session.tick(handle, 200).unwrap(), TickStatus::Completed(_)));
}

/// One large tick runs the whole lifecycle but executes only once.
#[test]
fn test_large_tick_executes_once() {
    let effect = common::CountingEffect::shared();
    let mut session = counted_session(effect.clone(), 100, 100);
    let handle = session.begin_use(KNIGHT, COUNTED, GOBLIN);

    // The knight has no skill points for the cost
    assert!(matches!(handle, Err(UseError::InsufficientResource { .. })));

    let handle = session.begin_use(CLERIC, COUNTED, GOBLIN).unwrap();
    let status = session.tick(handle, 60_000).unwrap();

    let TickStatus::Completed(report) = status else {
        panic!("expected completion, got {:?}", status);
    };
    assert_eq!(report.cost_paid, 5);
    assert_eq!(effect.calls(), 1);
    assert_eq!(skill_points(&session, CLERIC), 25);
}

/// Zero warmup and cooldown complete on a zero-length tick.
#[test]
fn test_zero_durations() {
    let effect = common::CountingEffect::shared();
    let mut session = counted_session(effect.clone(), 0, 0);
    let handle = session.begin_use(CLERIC, COUNTED, TROLL).unwrap();

    assert!(matches!(session.tick(handle, 0).unwrap(), TickStatus::Completed(_)));
    assert_eq!(effect.calls(), 1);
}

/// `tick_all` drives several actors on one clock in request order.
#[test]
fn test_tick_all_shared_clock() {
    let mut session = common::session(1);
    let heal = session.begin_use(CLERIC, HEAL, KNIGHT).unwrap();
    let slash = session.begin_use(KNIGHT, SLASH, GOBLIN).unwrap();
    let claw = session.begin_use(GOBLIN, CLAW, ARCHER).unwrap();

    let statuses = session.tick_all(300);
    let order: Vec<_> = statuses.iter().map(|(handle, _)| *handle).collect();
    assert_eq!(order, vec![heal, slash, claw]);
    assert_eq!(statuses[0].1, TickStatus::Pending(UsagePhase::WarmingUp));
    assert_eq!(statuses[1].1, TickStatus::Pending(UsagePhase::CoolingDown));
    assert!(matches!(statuses[2].1, TickStatus::Completed(_)));

    assert_eq!(session.in_flight(), 2);
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cancelling during warmup never runs the effect nor charges the cost.
#[test]
fn test_cancel_during_warmup() {
    let effect = common::CountingEffect::shared();
    let mut session = counted_session(effect.clone(), 1000, 0);
    let handle = session.begin_use(CLERIC, COUNTED, GOBLIN).unwrap();

    session.tick(handle, 400).unwrap();
    assert_eq!(session.cancel(handle), Ok(true));
    assert!(session.tick_all(5000).is_empty());

    assert_eq!(effect.calls(), 0);
    assert_eq!(skill_points(&session, CLERIC), 30);
    assert!(session.stats().journal().is_empty());
    assert_eq!(session.cancel(handle), Err(UseError::UnknownUsage(handle)));
    assert!(!session.is_busy(CLERIC));
}

/// After execution the cooldown cannot be cut short.
#[test]
fn test_cancel_after_execution() {
    let mut session = common::session(1);
    let handle = session.begin_use(KNIGHT, SLASH, GOBLIN).unwrap();
    session.tick(handle, 300).unwrap();

    assert_eq!(session.cancel(handle), Ok(false));
    assert_eq!(session.cancel_actor(KNIGHT), None);
    assert!(matches!(session.tick(handle, 700).unwrap(), TickStatus::Completed(_)));
}

// ============================================================================
// Late Invalidation
// ============================================================================

/// A target defeated during warmup fails the usage with nothing charged.
#[test]
fn test_target_defeated_during_warmup() {
    let mut session = common::session(1);
    let handle = session.begin_use(CLERIC, HEAL, KNIGHT).unwrap();

    session.tick(handle, 500).unwrap();
    session.stats_mut().defeat(KNIGHT);

    assert_eq!(
        session.tick(handle, 500).unwrap(),
        TickStatus::Failed(FailureReason::TargetInvalidated(TargetError::Invalidated(KNIGHT)))
    );
    assert_eq!(skill_points(&session, CLERIC), 30);
    assert!(session.stats().journal().is_empty());
    assert!(!session.is_busy(CLERIC));
}

/// A user defeated during warmup never acts.
#[test]
fn test_user_defeated_during_warmup() {
    let mut session = common::session(1);
    let handle = session.begin_use(KNIGHT, SLASH, GOBLIN).unwrap();
    session.stats_mut().defeat(KNIGHT);

    assert_eq!(session.tick(handle, 300).unwrap(), TickStatus::Failed(FailureReason::Cancelled));
    assert_eq!(session.stats().sheet(GOBLIN).unwrap().hit_points, 50);
}

/// A user who leaves the battle during warmup never acts.
#[test]
fn test_user_removed_during_warmup() {
    let mut session = common::session(1);
    let handle = session.begin_use(KNIGHT, SLASH, GOBLIN).unwrap();
    session.formation_mut().remove(KNIGHT);

    assert_eq!(session.tick(handle, 300).unwrap(), TickStatus::Failed(FailureReason::Cancelled));
    assert!(session.stats().journal().is_empty());
    assert_eq!(session.stats().sheet(GOBLIN).unwrap().hit_points, 50);
    assert!(!session.is_busy(KNIGHT));
}

/// Skill points spent elsewhere during warmup fail the usage at execution.
#[test]
fn test_resource_drained_during_warmup() {
    let mut session = common::session(1);
    let handle = session.begin_use(CLERIC, HEAL, KNIGHT).unwrap();
    session.stats_mut().set_skill_points(CLERIC, 2);

    assert_eq!(
        session.tick(handle, 1000).unwrap(),
        TickStatus::Failed(FailureReason::InsufficientResource)
    );
    assert_eq!(session.stats().sheet(KNIGHT).unwrap().hit_points, 100);
}

/// A failed usage frees the actor for the next request.
#[test]
fn test_failure_does_not_block_actor() {
    let mut session = common::session(1);
    let handle = session.begin_use(CLERIC, HEAL, KNIGHT).unwrap();
    session.stats_mut().defeat(KNIGHT);
    assert!(session.tick(handle, 1000).unwrap().is_finished());

    let retry = session.begin_use(CLERIC, HEAL, ARCHER).unwrap();
    assert!(session.tick(retry, 1500).unwrap().is_finished());
    assert_eq!(
        session.stats().journal().first(),
        Some(&StatRequest::SkillPoints { actor: CLERIC, amount: 6 })
    );
}
