//! Targeting and effect resolution.
//!
//! - `TargetCategory` / `resolve_targets`: map a category to concrete actors
//! - `BattleEffect` / `FieldEffect`: strategy objects run by skills
//! - `EffectSpec`: data-driven damage, heal and status effects
//! - `Formulas`: pluggable hit-chance and damage arithmetic
//!
//! Effects never own actor state. Every mutation goes through the
//! `StatProvider` in the effect context.

mod effect;
mod formula;
mod pipeline;
mod targeting;

pub use effect::{
    BattleEffect, DurationFormula, EffectContext, EffectReport, EffectSpec, FieldContext, FieldEffect,
    PresentationCue, TargetOutcome,
};
pub use formula::{
    rolls_hit, AlwaysHit, DamageFormula, Formulas, HitFormula, LinearHitChance, ProtectionReduction, RawDamage,
};
pub use pipeline::{magnitude, present};
pub use targeting::{
    collect_targets, resolve_targets, TargetCategory, TargetContext, TargetSelection, TargetSet, Targets,
};
