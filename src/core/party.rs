//! Parties and battle formations.
//!
//! ## Side
//!
//! Combat is fought between two sides: the player's characters and the
//! enemies. A side's allies are its own party; its foes are the other one.
//!
//! ## Party
//!
//! A roster of slots in stable order. Slots are `Option<ActorId>` so that an
//! actor leaving the battle keeps the remaining members at their indices.
//! Backed by `im::Vector` for O(1) snapshots.
//!
//! ## Formation
//!
//! Both parties of a battle, indexable by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use im::Vector;

use super::entity::ActorId;

/// One of the two opposing sides in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The player's characters.
    Characters,
    /// The opposing enemies.
    Enemies,
}

impl Side {
    /// The side opposing this one.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Characters => Side::Enemies,
            Side::Enemies => Side::Characters,
        }
    }

    /// Both sides, characters first.
    pub fn both() -> impl Iterator<Item = Side> {
        [Side::Characters, Side::Enemies].into_iter()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Characters => write!(f, "characters"),
            Side::Enemies => write!(f, "enemies"),
        }
    }
}

/// Ordered roster of one side's actors.
///
/// ## Example
///
/// ```
/// use skill_engine::core::{ActorId, Party, Side};
///
/// let mut party = Party::new(Side::Characters);
/// party.push(ActorId::new(1));
/// party.push(ActorId::new(2));
/// party.remove(ActorId::new(1));
///
/// // Slot 0 is now empty; slot 1 keeps its index.
/// assert_eq!(party.slot(0), None);
/// assert_eq!(party.slot(1), Some(ActorId::new(2)));
/// assert_eq!(party.members().collect::<Vec<_>>(), vec![ActorId::new(2)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    side: Side,
    slots: Vector<Option<ActorId>>,
}

impl Party {
    /// Create an empty party for a side.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            slots: Vector::new(),
        }
    }

    /// Create a party from actors in slot order.
    #[must_use]
    pub fn with_members(side: Side, members: impl IntoIterator<Item = ActorId>) -> Self {
        Self {
            side,
            slots: members.into_iter().map(Some).collect(),
        }
    }

    /// Which side this party fights for.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Append an actor in a new slot and return the slot index.
    pub fn push(&mut self, actor: ActorId) -> usize {
        self.slots.push_back(Some(actor));
        self.slots.len() - 1
    }

    /// Vacate the slot held by `actor`.
    ///
    /// Returns the vacated slot index, or `None` if the actor is not a member.
    pub fn remove(&mut self, actor: ActorId) -> Option<usize> {
        let index = self.slot_of(actor)?;
        self.slots.set(index, None);
        Some(index)
    }

    /// Actor in a slot, if the slot exists and is occupied.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<ActorId> {
        self.slots.get(index).copied().flatten()
    }

    /// Slot index held by `actor`.
    #[must_use]
    pub fn slot_of(&self, actor: ActorId) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(actor))
    }

    /// Check whether `actor` currently occupies a slot.
    #[must_use]
    pub fn contains(&self, actor: ActorId) -> bool {
        self.slot_of(actor).is_some()
    }

    /// Number of slots, including vacated ones.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over present members in slot order.
    pub fn members(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    /// Check whether the party has no present members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members().next().is_none()
    }
}

/// Both parties of a battle.
///
/// ```
/// use skill_engine::core::{ActorId, Formation, Side};
///
/// let formation = Formation::new(
///     [ActorId::new(1), ActorId::new(2)],
///     [ActorId::new(10)],
/// );
///
/// assert_eq!(formation.side_of(ActorId::new(10)), Some(Side::Enemies));
/// assert_eq!(formation.foes_of(Side::Enemies).members().count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    characters: Party,
    enemies: Party,
}

impl Formation {
    /// Create a formation from both rosters.
    #[must_use]
    pub fn new(
        characters: impl IntoIterator<Item = ActorId>,
        enemies: impl IntoIterator<Item = ActorId>,
    ) -> Self {
        Self {
            characters: Party::with_members(Side::Characters, characters),
            enemies: Party::with_members(Side::Enemies, enemies),
        }
    }

    /// Get a side's party.
    #[must_use]
    pub fn party(&self, side: Side) -> &Party {
        match side {
            Side::Characters => &self.characters,
            Side::Enemies => &self.enemies,
        }
    }

    /// Get a side's party mutably.
    pub fn party_mut(&mut self, side: Side) -> &mut Party {
        match side {
            Side::Characters => &mut self.characters,
            Side::Enemies => &mut self.enemies,
        }
    }

    /// The party an actor of `side` fights alongside.
    #[must_use]
    pub fn allies_of(&self, side: Side) -> &Party {
        self.party(side)
    }

    /// The party an actor of `side` fights against.
    #[must_use]
    pub fn foes_of(&self, side: Side) -> &Party {
        self.party(side.opponent())
    }

    /// Find which side an actor is on.
    #[must_use]
    pub fn side_of(&self, actor: ActorId) -> Option<Side> {
        Side::both().find(|side| self.party(*side).contains(actor))
    }

    /// Remove an actor from whichever side holds it.
    pub fn remove(&mut self, actor: ActorId) -> Option<Side> {
        let side = self.side_of(actor)?;
        self.party_mut(side).remove(actor);
        Some(side)
    }
}

impl Index<Side> for Formation {
    type Output = Party;

    fn index(&self, side: Side) -> &Self::Output {
        self.party(side)
    }
}

impl IndexMut<Side> for Formation {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.party_mut(side)
    }
}
