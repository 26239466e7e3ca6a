//! Stat & status provider interface.
//!
//! The provider owns actor health, skill points, statistics and status
//! effects. The engine reads statistics and requests mutations through
//! [`StatProvider`]; it never stores actor state itself.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::core::ActorId;
use crate::error::ProviderError;

/// Numeric actor attributes readable by effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    /// Physical offense.
    Strength,
    /// Magical offense and healing power.
    Vigor,
    /// Physical defense.
    Fortitude,
    /// Magical defense.
    Protection,
    /// Speed and accuracy.
    Agility,
    /// Chance to avoid attacks.
    Evade,
    HitPoints,
    SkillPoints,
}

/// Status effects that can be registered on an actor.
///
/// Positive intensity raises the attribute, negative lowers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Strength,
    Vigor,
    Fortitude,
    Protection,
    Agility,
    Evade,
    Stun,
    Poison,
    Regeneration,
}

/// Battlefield coordinates of an actor's sprite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of an actor's sprite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Result of a damage request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Hit points actually removed.
    pub dealt: u32,
    /// Hit points left afterwards.
    pub remaining: u32,
    /// The actor was brought to zero hit points.
    pub defeated: bool,
}

/// Result of a healing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealOutcome {
    /// Hit points actually restored.
    pub restored: u32,
    /// Hit points afterwards.
    pub current: u32,
}

/// Capabilities the engine consumes from actor stat storage.
///
/// Implementations are the single point of truth for actor health and
/// status. A session holds its provider by `&mut`, which serializes every
/// mutation; wrap a provider in [`SharedStats`] to share it between
/// sessions.
pub trait StatProvider {
    /// Read an attribute.
    fn statistic(&self, actor: ActorId, kind: StatKind) -> Result<i32, ProviderError>;

    /// Remove hit points.
    fn apply_damage(&mut self, actor: ActorId, amount: u32) -> Result<DamageOutcome, ProviderError>;

    /// Restore hit points. `in_battle` is false for field use.
    fn apply_healing(
        &mut self,
        actor: ActorId,
        amount: u32,
        in_battle: bool,
    ) -> Result<HealOutcome, ProviderError>;

    /// Register a timed status change.
    fn register_status_change(
        &mut self,
        actor: ActorId,
        status: StatusKind,
        intensity: i32,
        duration_ms: u32,
    ) -> Result<(), ProviderError>;

    /// Notify that an attack on `actor` missed.
    fn register_miss(&mut self, actor: ActorId) -> Result<(), ProviderError>;

    /// Check whether an actor exists and can still fight.
    fn is_alive(&self, actor: ActorId) -> bool;

    /// Sprite position, for particle effects.
    fn position(&self, actor: ActorId) -> Result<Position, ProviderError>;

    /// Sprite size, used to pick presentation variants.
    fn sprite_extent(&self, actor: ActorId) -> Result<Extent, ProviderError>;

    /// Spend skill points, failing without change if too few remain.
    fn consume_skill_points(&mut self, actor: ActorId, amount: u32) -> Result<(), ProviderError>;
}

/// A provider shared between owners, serializing every request.
///
/// ```
/// use skill_engine::core::ActorId;
/// use skill_engine::providers::{ActorSheet, InMemoryRoster, SharedStats, StatProvider};
///
/// let mut roster = InMemoryRoster::new();
/// roster.insert(ActorId::new(1), ActorSheet::new(50, 10));
///
/// let mut a = SharedStats::new(roster);
/// let b = a.clone();
///
/// a.apply_damage(ActorId::new(1), 20).unwrap();
/// assert_eq!(b.with(|roster| roster.sheet(ActorId::new(1)).unwrap().hit_points), 30);
/// ```
#[derive(Debug, Default)]
pub struct SharedStats<P> {
    inner: Arc<Mutex<P>>,
}

impl<P> Clone for SharedStats<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> SharedStats<P> {
    /// Wrap a provider.
    pub fn new(provider: P) -> Self {
        Self {
            inner: Arc::new(Mutex::new(provider)),
        }
    }

    /// Run a closure with exclusive access to the provider.
    pub fn with<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    fn lock(&self) -> MutexGuard<'_, P> {
        // A panic mid-request leaves the data usable; keep serving it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: StatProvider> StatProvider for SharedStats<P> {
    fn statistic(&self, actor: ActorId, kind: StatKind) -> Result<i32, ProviderError> {
        self.lock().statistic(actor, kind)
    }

    fn apply_damage(&mut self, actor: ActorId, amount: u32) -> Result<DamageOutcome, ProviderError> {
        self.lock().apply_damage(actor, amount)
    }

    fn apply_healing(
        &mut self,
        actor: ActorId,
        amount: u32,
        in_battle: bool,
    ) -> Result<HealOutcome, ProviderError> {
        self.lock().apply_healing(actor, amount, in_battle)
    }

    fn register_status_change(
        &mut self,
        actor: ActorId,
        status: StatusKind,
        intensity: i32,
        duration_ms: u32,
    ) -> Result<(), ProviderError> {
        self.lock().register_status_change(actor, status, intensity, duration_ms)
    }

    fn register_miss(&mut self, actor: ActorId) -> Result<(), ProviderError> {
        self.lock().register_miss(actor)
    }

    fn is_alive(&self, actor: ActorId) -> bool {
        self.lock().is_alive(actor)
    }

    fn position(&self, actor: ActorId) -> Result<Position, ProviderError> {
        self.lock().position(actor)
    }

    fn sprite_extent(&self, actor: ActorId) -> Result<Extent, ProviderError> {
        self.lock().sprite_extent(actor)
    }

    fn consume_skill_points(&mut self, actor: ActorId, amount: u32) -> Result<(), ProviderError> {
        self.lock().consume_skill_points(actor, amount)
    }
}
