//! Presentation capabilities: sounds and particle effects.
//!
//! Presentation is fire-and-forget. The pipeline logs a failed cue and moves
//! on; a missing asset never blocks a skill.

use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashSet;

use crate::error::PresentationError;

/// Audio and particle output consumed by effects.
pub trait Presenter {
    /// Play a sound by reference.
    fn play_sound(&self, reference: &str) -> Result<(), PresentationError>;

    /// Spawn a particle effect at a battlefield position.
    fn trigger_particle_effect(&self, reference: &str, x: f32, y: f32) -> Result<(), PresentationError>;
}

/// Presenter that accepts every cue and does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn play_sound(&self, _reference: &str) -> Result<(), PresentationError> {
        Ok(())
    }

    fn trigger_particle_effect(&self, _reference: &str, _x: f32, _y: f32) -> Result<(), PresentationError> {
        Ok(())
    }
}

/// A cue received by a [`PresentationLog`].
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    Sound(String),
    Particle { reference: String, x: f32, y: f32 },
}

/// Presenter that records every accepted cue.
///
/// Assets registered as missing are rejected with
/// [`PresentationError::MissingAsset`] and not recorded.
///
/// ```
/// use skill_engine::providers::{Cue, PresentationLog, Presenter};
///
/// let log = PresentationLog::new().with_missing_asset("boom.ogg");
///
/// log.play_sound("heal.ogg").unwrap();
/// assert!(log.play_sound("boom.ogg").is_err());
/// assert_eq!(log.cues(), vec![Cue::Sound("heal.ogg".to_string())]);
/// ```
#[derive(Debug, Default)]
pub struct PresentationLog {
    cues: Mutex<Vec<Cue>>,
    missing: FxHashSet<String>,
}

impl PresentationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat an asset reference as missing.
    #[must_use]
    pub fn with_missing_asset(mut self, reference: impl Into<String>) -> Self {
        self.missing.insert(reference.into());
        self
    }

    /// Snapshot of the recorded cues, in order.
    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of recorded cues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, reference: &str, cue: Cue) -> Result<(), PresentationError> {
        if self.missing.contains(reference) {
            return Err(PresentationError::MissingAsset(reference.to_string()));
        }
        self.cues.lock().unwrap_or_else(PoisonError::into_inner).push(cue);
        Ok(())
    }
}

impl Presenter for PresentationLog {
    fn play_sound(&self, reference: &str) -> Result<(), PresentationError> {
        self.record(reference, Cue::Sound(reference.to_string()))
    }

    fn trigger_particle_effect(&self, reference: &str, x: f32, y: f32) -> Result<(), PresentationError> {
        self.record(
            reference,
            Cue::Particle {
                reference: reference.to_string(),
                x,
                y,
            },
        )
    }
}
