//! Integration tests for skill registration and lookup.
//!
//! Covers validation at registration, duplicate handling, bulk loading
//! and property tests over generated records.

mod common;

use proptest::prelude::*;

use skill_engine::effects::{EffectSpec, TargetCategory};
use skill_engine::error::{LookupError, RegisterError, ValidationError};
use skill_engine::providers::StatKind;
use skill_engine::skills::{load_batch, SkillId, SkillRecord, SkillRegistry, SkillUsers};

fn strike(id: i64) -> SkillRecord {
    SkillRecord::new(id, "Strike", TargetCategory::SingleFoe)
        .with_description("A plain hit.")
        .with_battle_effect(EffectSpec::damage(StatKind::Strength, 2, 5))
}

// ============================================================================
// Registration
// ============================================================================

/// A registered record can be looked up with every field preserved.
#[test]
fn test_register_then_lookup_preserves_fields() {
    let mut registry = SkillRegistry::new();
    let id = registry.register(common::heal_record()).unwrap();

    assert_eq!(id, common::HEAL);
    let skill = registry.lookup(id).unwrap();
    assert_eq!(skill.name(), "Heal");
    assert_eq!(skill.description(), Some("Restores health to one ally."));
    assert_eq!(skill.cost(), 6);
    assert_eq!(skill.warmup_ms(), 1000);
    assert_eq!(skill.cooldown_ms(), 500);
    assert_eq!(skill.target(), TargetCategory::SingleAlly);
    assert_eq!(skill.users(), SkillUsers::Characters);
    assert!(skill.field_effect().is_some());
}

/// Unknown IDs produce a lookup error, not a panic.
#[test]
fn test_lookup_unknown_id() {
    let registry = common::registry();
    assert_eq!(
        registry.lookup(SkillId::new(4242)).unwrap_err(),
        LookupError::NotFound(SkillId::new(4242))
    );
}

/// Each negative numeric field is rejected and the registry is unchanged.
#[test]
fn test_negative_fields_rejected() {
    let cases = [
        ("cost", strike(1).with_cost(-1)),
        ("warmup_ms", strike(1).with_warmup_ms(-250)),
        ("cooldown_ms", strike(1).with_cooldown_ms(-3)),
    ];

    for (field, record) in cases {
        let mut registry = SkillRegistry::new();
        let err = registry.register(record).unwrap_err();

        assert!(
            matches!(
                err,
                RegisterError::Validation {
                    id: 1,
                    source: ValidationError::Negative { field: f, .. },
                } if f == field
            ),
            "unexpected error for {}: {:?}",
            field,
            err
        );
        assert!(registry.is_empty());
    }
}

/// Character skills need a description; enemy skills do not.
#[test]
fn test_description_required_for_characters() {
    let mut registry = SkillRegistry::new();

    let bare = SkillRecord::new(5, "Bare", TargetCategory::SingleFoe)
        .with_battle_effect(EffectSpec::damage(StatKind::Strength, 1, 0));

    let err = registry.register(bare.clone()).unwrap_err();
    assert!(matches!(
        err,
        RegisterError::Validation { source: ValidationError::MissingDescription, .. }
    ));

    registry.register(bare.with_users(SkillUsers::Enemies)).unwrap();
    assert!(registry.contains(SkillId::new(5)));
}

/// A skill without any battle effect is rejected.
#[test]
fn test_missing_battle_effect() {
    let mut registry = SkillRegistry::new();
    let record = SkillRecord::new(8, "Empty", TargetCategory::Caster).with_description("Nothing.");

    assert!(matches!(
        registry.register(record).unwrap_err(),
        RegisterError::Validation { source: ValidationError::MissingBattleEffect, .. }
    ));
}

/// Damage cannot be a field effect.
#[test]
fn test_damage_field_effect_rejected() {
    let mut registry = SkillRegistry::new();
    let record = strike(9).with_field_effect(EffectSpec::damage(StatKind::Strength, 1, 0));

    assert!(matches!(
        registry.register(record).unwrap_err(),
        RegisterError::Validation { source: ValidationError::UnsupportedFieldEffect("damage"), .. }
    ));
}

/// The first registration of an ID wins.
#[test]
fn test_duplicate_keeps_first() {
    let mut registry = common::registry();
    let before = registry.len();

    let err = registry
        .register(
            SkillRecord::new(1, "Impostor", TargetCategory::AllFoes)
                .with_description("Not the real one.")
                .with_battle_effect(EffectSpec::damage(StatKind::Strength, 9, 0)),
        )
        .unwrap_err();

    assert_eq!(err, RegisterError::DuplicateId(common::HEAL));
    assert_eq!(registry.len(), before);
    assert_eq!(registry.lookup(common::HEAL).unwrap().name(), "Heal");
}

// ============================================================================
// Bulk Loading
// ============================================================================

/// One bad record does not block the rest of the batch.
#[test]
fn test_batch_isolates_failures() {
    let mut registry = SkillRegistry::new();
    let report = load_batch(
        &mut registry,
        vec![strike(1), strike(2).with_cost(-5), strike(3), strike(0)],
    );

    assert!(!report.is_clean());
    assert_eq!(report.registered, vec![SkillId::new(1), SkillId::new(3)]);
    let rejected: Vec<_> = report.failures.iter().map(|(id, _)| *id).collect();
    assert_eq!(rejected, vec![2, 0]);
    assert_eq!(registry.ids(), vec![SkillId::new(1), SkillId::new(3)]);
}

/// Shared registries are readable from several threads at once.
#[test]
fn test_shared_registry_across_threads() {
    let shared = common::registry().into_shared();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = shared.clone();
            std::thread::spawn(move || registry.lookup(common::SLASH).map(|s| s.cost()).ok())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(0));
    }
}

// ============================================================================
// Properties
// ============================================================================

fn any_target() -> impl Strategy<Value = TargetCategory> {
    prop_oneof![
        Just(TargetCategory::SingleAlly),
        Just(TargetCategory::SingleFoe),
        Just(TargetCategory::AllAllies),
        Just(TargetCategory::AllFoes),
        Just(TargetCategory::Caster),
        Just(TargetCategory::AnySingle),
    ]
}

proptest! {
    /// Any valid record registers and reads back unchanged.
    #[test]
    fn test_valid_record_round_trips(
        id in 1i64..=i64::from(u32::MAX),
        name in "[A-Za-z][A-Za-z ]{0,15}",
        cost in 0i64..10_000,
        warmup in 0i64..600_000,
        cooldown in 0i64..600_000,
        target in any_target(),
        multiplier in 0i32..10,
        bonus in 0u32..50,
    ) {
        let record = SkillRecord::new(id, name.clone(), target)
            .with_description("Generated.")
            .with_cost(cost)
            .with_warmup_ms(warmup)
            .with_cooldown_ms(cooldown)
            .with_battle_effect(EffectSpec::heal(StatKind::Vigor, multiplier, bonus));

        let mut registry = SkillRegistry::new();
        let registered = registry.register(record).unwrap();
        let skill = registry.lookup(registered).unwrap();

        prop_assert_eq!(i64::from(skill.id().raw()), id);
        prop_assert_eq!(skill.name(), name.as_str());
        prop_assert_eq!(i64::from(skill.cost()), cost);
        prop_assert_eq!(i64::from(skill.warmup_ms()), warmup);
        prop_assert_eq!(i64::from(skill.cooldown_ms()), cooldown);
        prop_assert_eq!(skill.target(), target);
    }

    /// Any negative cost or duration is rejected without touching the registry.
    #[test]
    fn test_negative_values_never_register(
        value in i64::MIN..0,
        field in 0usize..3,
    ) {
        let record = match field {
            0 => strike(7).with_cost(value),
            1 => strike(7).with_warmup_ms(value),
            _ => strike(7).with_cooldown_ms(value),
        };

        let mut registry = SkillRegistry::new();
        let rejected = matches!(
            registry.register(record),
            Err(RegisterError::Validation { source: ValidationError::Negative { .. }, .. })
        );
        prop_assert!(rejected);
        prop_assert!(registry.is_empty());
    }
}
