//! In-memory stat provider.
//!
//! `InMemoryRoster` keeps one `ActorSheet` per actor and implements
//! [`StatProvider`] over it. Every mutation request is appended to a journal
//! so a battle can be audited or replayed. Backed by `im::HashMap`, so a
//! roster snapshot is an O(1) clone.

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

use super::stats::{DamageOutcome, Extent, HealOutcome, Position, StatKind, StatProvider, StatusKind};
use crate::core::ActorId;
use crate::error::ProviderError;

/// A timed status registered on an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveStatus {
    pub kind: StatusKind,
    pub intensity: i32,
    pub duration_ms: u32,
}

/// Everything the roster knows about one actor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorSheet {
    pub hit_points: u32,
    pub max_hit_points: u32,
    pub skill_points: u32,
    pub strength: i32,
    pub vigor: i32,
    pub fortitude: i32,
    pub protection: i32,
    pub agility: i32,
    pub evade: i32,
    pub position: Position,
    pub extent: Extent,
    pub statuses: Vec<ActiveStatus>,
}

impl ActorSheet {
    /// Create a sheet at full health with zeroed attributes.
    #[must_use]
    pub fn new(max_hit_points: u32, skill_points: u32) -> Self {
        Self {
            hit_points: max_hit_points,
            max_hit_points,
            skill_points,
            strength: 0,
            vigor: 0,
            fortitude: 0,
            protection: 0,
            agility: 0,
            evade: 0,
            position: Position::default(),
            extent: Extent::new(64.0, 64.0),
            statuses: Vec::new(),
        }
    }

    /// Set an attribute (builder pattern).
    ///
    /// Hit and skill points are clamped at zero.
    #[must_use]
    pub fn with_stat(mut self, kind: StatKind, value: i32) -> Self {
        let clamped = u32::try_from(value).unwrap_or(0);
        match kind {
            StatKind::Strength => self.strength = value,
            StatKind::Vigor => self.vigor = value,
            StatKind::Fortitude => self.fortitude = value,
            StatKind::Protection => self.protection = value,
            StatKind::Agility => self.agility = value,
            StatKind::Evade => self.evade = value,
            StatKind::HitPoints => self.hit_points = clamped.min(self.max_hit_points),
            StatKind::SkillPoints => self.skill_points = clamped,
        }
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    #[must_use]
    pub fn with_extent(mut self, width: f32, height: f32) -> Self {
        self.extent = Extent::new(width, height);
        self
    }

    /// Read an attribute.
    #[must_use]
    pub fn stat(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Vigor => self.vigor,
            StatKind::Fortitude => self.fortitude,
            StatKind::Protection => self.protection,
            StatKind::Agility => self.agility,
            StatKind::Evade => self.evade,
            StatKind::HitPoints => saturating_i32(self.hit_points),
            StatKind::SkillPoints => saturating_i32(self.skill_points),
        }
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// One mutation request received by the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatRequest {
    Damage { actor: ActorId, amount: u32 },
    Healing { actor: ActorId, amount: u32, in_battle: bool },
    Status { actor: ActorId, status: StatusKind, intensity: i32, duration_ms: u32 },
    Miss { actor: ActorId },
    SkillPoints { actor: ActorId, amount: u32 },
}

/// Reference stat provider backed by actor sheets.
///
/// ## Example
///
/// ```
/// use skill_engine::core::ActorId;
/// use skill_engine::providers::{ActorSheet, InMemoryRoster, StatKind, StatProvider};
///
/// let mut roster = InMemoryRoster::new();
/// roster.insert(ActorId::new(1), ActorSheet::new(40, 12).with_stat(StatKind::Vigor, 10));
///
/// assert_eq!(roster.statistic(ActorId::new(1), StatKind::Vigor).unwrap(), 10);
///
/// roster.apply_damage(ActorId::new(1), 15).unwrap();
/// roster.apply_healing(ActorId::new(1), 100, true).unwrap();
/// assert_eq!(roster.sheet(ActorId::new(1)).unwrap().hit_points, 40);
/// assert_eq!(roster.journal().len(), 2);
/// ```
///
/// The journal grows by one entry per mutation request and is never trimmed
/// on its own. Long-running battles should call [`clear_journal`] between
/// rounds or build the roster with [`without_journal`].
///
/// [`clear_journal`]: InMemoryRoster::clear_journal
/// [`without_journal`]: InMemoryRoster::without_journal
#[derive(Clone, Debug, Default)]
pub struct InMemoryRoster {
    actors: ImHashMap<ActorId, ActorSheet>,
    journal: Vec<StatRequest>,
    untracked: bool,
}

impl InMemoryRoster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop journaling mutation requests.
    #[must_use]
    pub fn without_journal(mut self) -> Self {
        self.untracked = true;
        self.journal = Vec::new();
        self
    }

    /// Add or replace an actor.
    pub fn insert(&mut self, actor: ActorId, sheet: ActorSheet) {
        self.actors.insert(actor, sheet);
    }

    /// Remove an actor entirely.
    pub fn remove(&mut self, actor: ActorId) -> Option<ActorSheet> {
        self.actors.remove(&actor)
    }

    /// Drop an actor to zero hit points without journaling a request.
    pub fn defeat(&mut self, actor: ActorId) {
        if let Some(sheet) = self.actors.get_mut(&actor) {
            sheet.hit_points = 0;
        }
    }

    /// Set an actor's skill points without journaling a request.
    pub fn set_skill_points(&mut self, actor: ActorId, skill_points: u32) {
        if let Some(sheet) = self.actors.get_mut(&actor) {
            sheet.skill_points = skill_points;
        }
    }

    /// Get an actor's sheet.
    #[must_use]
    pub fn sheet(&self, actor: ActorId) -> Option<&ActorSheet> {
        self.actors.get(&actor)
    }

    /// Every mutation request received, in order.
    #[must_use]
    pub fn journal(&self) -> &[StatRequest] {
        &self.journal
    }

    /// Forget journaled requests.
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    fn note(&mut self, request: StatRequest) {
        if !self.untracked {
            self.journal.push(request);
        }
    }

    fn sheet_mut(&mut self, actor: ActorId) -> Result<&mut ActorSheet, ProviderError> {
        self.actors.get_mut(&actor).ok_or(ProviderError::UnknownActor(actor))
    }

    fn existing(&self, actor: ActorId) -> Result<&ActorSheet, ProviderError> {
        self.actors.get(&actor).ok_or(ProviderError::UnknownActor(actor))
    }
}

impl StatProvider for InMemoryRoster {
    fn statistic(&self, actor: ActorId, kind: StatKind) -> Result<i32, ProviderError> {
        Ok(self.existing(actor)?.stat(kind))
    }

    fn apply_damage(&mut self, actor: ActorId, amount: u32) -> Result<DamageOutcome, ProviderError> {
        let sheet = self.sheet_mut(actor)?;
        let dealt = amount.min(sheet.hit_points);
        sheet.hit_points -= dealt;
        let outcome = DamageOutcome {
            dealt,
            remaining: sheet.hit_points,
            defeated: sheet.hit_points == 0,
        };

        self.note(StatRequest::Damage { actor, amount });
        Ok(outcome)
    }

    fn apply_healing(
        &mut self,
        actor: ActorId,
        amount: u32,
        in_battle: bool,
    ) -> Result<HealOutcome, ProviderError> {
        let sheet = self.sheet_mut(actor)?;
        // Defeated actors are not revived by healing.
        let restored = if sheet.hit_points == 0 {
            0
        } else {
            amount.min(sheet.max_hit_points - sheet.hit_points)
        };
        sheet.hit_points += restored;
        let outcome = HealOutcome {
            restored,
            current: sheet.hit_points,
        };

        self.note(StatRequest::Healing { actor, amount, in_battle });
        Ok(outcome)
    }

    fn register_status_change(
        &mut self,
        actor: ActorId,
        status: StatusKind,
        intensity: i32,
        duration_ms: u32,
    ) -> Result<(), ProviderError> {
        let sheet = self.sheet_mut(actor)?;
        sheet.statuses.retain(|active| active.kind != status);
        sheet.statuses.push(ActiveStatus {
            kind: status,
            intensity,
            duration_ms,
        });

        self.note(StatRequest::Status {
            actor,
            status,
            intensity,
            duration_ms,
        });
        Ok(())
    }

    fn register_miss(&mut self, actor: ActorId) -> Result<(), ProviderError> {
        self.existing(actor)?;
        self.note(StatRequest::Miss { actor });
        Ok(())
    }

    fn is_alive(&self, actor: ActorId) -> bool {
        self.actors.get(&actor).is_some_and(|sheet| sheet.hit_points > 0)
    }

    fn position(&self, actor: ActorId) -> Result<Position, ProviderError> {
        Ok(self.existing(actor)?.position)
    }

    fn sprite_extent(&self, actor: ActorId) -> Result<Extent, ProviderError> {
        Ok(self.existing(actor)?.extent)
    }

    fn consume_skill_points(&mut self, actor: ActorId, amount: u32) -> Result<(), ProviderError> {
        let sheet = self.sheet_mut(actor)?;
        if sheet.skill_points < amount {
            return Err(ProviderError::InsufficientSkillPoints {
                actor,
                needed: amount,
                available: saturating_i32(sheet.skill_points),
            });
        }
        sheet.skill_points -= amount;

        self.note(StatRequest::SkillPoints { actor, amount });
        Ok(())
    }
}
