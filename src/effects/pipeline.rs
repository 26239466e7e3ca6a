//! Effect resolution pipeline.
//!
//! Applies an [`EffectSpec`] to its resolved targets through the stat
//! provider, then plays presentation cues:
//!
//! 1. read the user's statistic
//! 2. per target: evasion check (damage only), magnitude or duration,
//!    mutation request
//! 3. presentation for every target the effect landed on
//!
//! Presentation failures are logged and ignored. A provider failure while
//! reading the user aborts the execution as an `EffectError`; a failure on
//! one target is recorded as [`TargetOutcome::Failed`] and the remaining
//! targets still resolve.

use super::effect::{
    BattleEffect, EffectContext, EffectReport, EffectSpec, FieldContext, FieldEffect, PresentationCue,
    TargetOutcome,
};
use super::formula::rolls_hit;
use crate::core::{ActorId, CombatRng};
use crate::error::{EffectError, PresentationError, ProviderError};
use crate::providers::{Presenter, StatProvider};

/// Base magnitude plus a uniform bonus in `[0, random_bonus]`.
///
/// Negative statistics contribute nothing.
pub fn magnitude(stat_value: i32, multiplier: i32, random_bonus: u32, rng: &mut CombatRng) -> u32 {
    let base = i64::from(stat_value) * i64::from(multiplier);
    let base = u32::try_from(base.max(0)).unwrap_or(u32::MAX);
    base.saturating_add(rng.roll_inclusive(0, random_bonus))
}

impl BattleEffect for EffectSpec {
    fn execute(
        &self,
        user: ActorId,
        targets: &[ActorId],
        ctx: &mut EffectContext<'_>,
    ) -> Result<EffectReport, EffectError> {
        let mut report = EffectReport::new();
        if targets.is_empty() {
            return Ok(report);
        }

        // The user's statistic is read before anything changes, so a failure
        // here aborts cleanly. Past this point a rejected request only fails
        // its own target.
        match self {
            EffectSpec::Damage { stat, multiplier, random_bonus, .. } => {
                let stat_value = ctx.stats.statistic(user, *stat)?;
                for &target in targets {
                    let outcome = strike(user, target, stat_value, *multiplier, *random_bonus, ctx);
                    report.push(settle(target, outcome));
                }
            }

            EffectSpec::Heal { stat, multiplier, random_bonus, .. } => {
                let stat_value = ctx.stats.statistic(user, *stat)?;
                for &target in targets {
                    let amount = magnitude(stat_value, *multiplier, *random_bonus, ctx.rng);
                    let outcome = ctx.stats.apply_healing(target, amount, true).map(|outcome| {
                        tracing::trace!("{} healed {} for {}", user, target, outcome.restored);
                        TargetOutcome::Healed { target, outcome }
                    });
                    report.push(settle(target, outcome));
                }
            }

            EffectSpec::Status { status, intensity, duration, .. } => {
                let duration_ms = duration.resolve(ctx.stats.statistic(user, duration.stat)?);
                for &target in targets {
                    let outcome = ctx
                        .stats
                        .register_status_change(target, *status, *intensity, duration_ms)
                        .map(|()| TargetOutcome::StatusApplied {
                            target,
                            status: *status,
                            intensity: *intensity,
                            duration_ms,
                        });
                    report.push(settle(target, outcome));
                }
            }
        }

        present(self.cue(), &report, &*ctx.stats, ctx.presenter, ctx.config.large_sprite_width);
        Ok(report)
    }
}

/// Evasion check, then damage for one target.
fn strike(
    user: ActorId,
    target: ActorId,
    stat_value: i32,
    multiplier: i32,
    random_bonus: u32,
    ctx: &mut EffectContext<'_>,
) -> Result<TargetOutcome, ProviderError> {
    let chance = ctx.formulas.hit.hit_chance(user, target, &*ctx.stats)?;
    let roll = ctx.rng.roll_percent();

    if !rolls_hit(chance, roll) {
        tracing::trace!("{} missed {} (rolled {} against {})", user, target, roll, chance);
        ctx.stats.register_miss(target)?;
        return Ok(TargetOutcome::Missed { target });
    }

    let raw = magnitude(stat_value, multiplier, random_bonus, ctx.rng);
    let amount = ctx.formulas.damage.adjust(raw, user, target, &*ctx.stats)?;
    let outcome = ctx.stats.apply_damage(target, amount)?;
    tracing::trace!("{} hit {} for {}", user, target, outcome.dealt);
    Ok(TargetOutcome::Damaged { target, outcome })
}

fn settle(target: ActorId, outcome: Result<TargetOutcome, ProviderError>) -> TargetOutcome {
    outcome.unwrap_or_else(|error| {
        tracing::warn!("request for {} rejected: {}", target, error);
        TargetOutcome::Failed { target, error }
    })
}

impl FieldEffect for EffectSpec {
    fn execute_immediate(
        &self,
        target: ActorId,
        instigator: ActorId,
        ctx: &mut FieldContext<'_>,
    ) -> Result<EffectReport, EffectError> {
        let mut report = EffectReport::new();

        match self {
            EffectSpec::Damage { .. } => return Err(EffectError::NotFieldUsable(self.kind_name())),

            EffectSpec::Heal { stat, multiplier, random_bonus, .. } => {
                let stat_value = ctx.stats.statistic(instigator, *stat)?;
                let amount = magnitude(stat_value, *multiplier, *random_bonus, ctx.rng);
                let outcome = ctx.stats.apply_healing(target, amount, false)?;
                report.push(TargetOutcome::Healed { target, outcome });
            }

            EffectSpec::Status { status, intensity, duration, .. } => {
                let duration_ms = duration.resolve(ctx.stats.statistic(instigator, duration.stat)?);
                ctx.stats.register_status_change(target, *status, *intensity, duration_ms)?;
                report.push(TargetOutcome::StatusApplied {
                    target,
                    status: *status,
                    intensity: *intensity,
                    duration_ms,
                });
            }
        }

        Ok(report)
    }
}

/// Play a cue for every target the effect landed on.
///
/// The sound plays once per execution; particles play at each target.
pub fn present(
    cue: &PresentationCue,
    report: &EffectReport,
    stats: &dyn StatProvider,
    presenter: &dyn Presenter,
    large_sprite_width: f32,
) {
    let mut landed = report.outcomes.iter().filter(|o| o.landed()).peekable();
    if cue.is_empty() || landed.peek().is_none() {
        return;
    }

    if let Some(sound) = &cue.sound {
        log_failure(sound, presenter.play_sound(sound));
    }

    for outcome in landed {
        let target = outcome.target();
        if let Err(err) = play_particle(cue, target, stats, presenter, large_sprite_width) {
            tracing::warn!("no particle for {}: {}", target, err);
        }
    }
}

fn play_particle(
    cue: &PresentationCue,
    target: ActorId,
    stats: &dyn StatProvider,
    presenter: &dyn Presenter,
    large_sprite_width: f32,
) -> Result<(), ProviderError> {
    let extent = stats.sprite_extent(target)?;
    let Some(reference) = cue.particle_for(extent.width, large_sprite_width) else {
        return Ok(());
    };
    let position = stats.position(target)?;
    log_failure(reference, presenter.trigger_particle_effect(reference, position.x, position.y));
    Ok(())
}

fn log_failure(reference: &str, result: Result<(), PresentationError>) {
    if let Err(err) = result {
        tracing::warn!("presentation cue {} failed: {}", reference, err);
    }
}
