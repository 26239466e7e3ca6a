//! Targeting resolver.
//!
//! Maps an abstract [`TargetCategory`] plus the caller's selection to
//! concrete actors at execution time:
//! - single categories: the selection must still be alive and on an allowed
//!   side, otherwise resolution fails with `TargetError::Invalidated`
//! - `AllAllies` / `AllFoes`: every living member, in stable slot order
//! - `Caster`: the acting actor

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ActorId, Formation, Party, Side};
use crate::error::TargetError;
use crate::providers::StatProvider;

/// Resolved targets of one execution. Most skills hit at most four actors.
pub type TargetSet = SmallVec<[ActorId; 4]>;

/// Who a skill may affect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetCategory {
    /// One living member of the user's party (the user included).
    SingleAlly,
    /// One living member of the opposing party.
    SingleFoe,
    /// Every living member of the user's party.
    AllAllies,
    /// Every living member of the opposing party.
    AllFoes,
    /// The user.
    Caster,
    /// One living actor from either party.
    AnySingle,
}

impl TargetCategory {
    /// Check whether the category needs a caller selection.
    #[must_use]
    pub fn is_single(self) -> bool {
        matches!(self, Self::SingleAlly | Self::SingleFoe | Self::AnySingle)
    }

    /// Check whether the category aims at the user's own side.
    #[must_use]
    pub fn is_supportive(self) -> bool {
        matches!(self, Self::SingleAlly | Self::AllAllies | Self::Caster)
    }
}

/// Target chosen by the caller when the skill was selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSelection {
    #[default]
    None,
    Single(ActorId),
}

impl TargetSelection {
    /// The selected actor, if any.
    #[must_use]
    pub fn actor(self) -> Option<ActorId> {
        match self {
            Self::None => None,
            Self::Single(actor) => Some(actor),
        }
    }
}

impl From<ActorId> for TargetSelection {
    fn from(actor: ActorId) -> Self {
        Self::Single(actor)
    }
}

/// Battlefield view used to resolve targets.
#[derive(Clone, Copy)]
pub struct TargetContext<'a> {
    /// The acting actor.
    pub actor: ActorId,
    /// The acting actor's party.
    pub allies: &'a Party,
    /// The opposing party.
    pub foes: &'a Party,
    /// Liveness oracle.
    pub stats: &'a dyn StatProvider,
}

impl<'a> TargetContext<'a> {
    /// Build a context for an actor fighting on `side`.
    #[must_use]
    pub fn new(actor: ActorId, side: Side, formation: &'a Formation, stats: &'a dyn StatProvider) -> Self {
        Self {
            actor,
            allies: formation.allies_of(side),
            foes: formation.foes_of(side),
            stats,
        }
    }

    fn is_valid(&self, target: ActorId, parties: &[&Party]) -> bool {
        self.stats.is_alive(target) && parties.iter().any(|party| party.contains(target))
    }
}

/// Resolve a category to a lazy, order-preserving target sequence.
///
/// Fails only for single categories whose selection is missing or no longer
/// valid. Party-wide categories may legitimately resolve to nothing.
///
/// ```
/// use skill_engine::core::{ActorId, Formation, Side};
/// use skill_engine::effects::{resolve_targets, TargetCategory, TargetContext, TargetSelection};
/// use skill_engine::providers::{ActorSheet, InMemoryRoster};
///
/// let mut roster = InMemoryRoster::new();
/// for id in [1, 2, 10] {
///     roster.insert(ActorId::new(id), ActorSheet::new(30, 0));
/// }
/// roster.defeat(ActorId::new(2));
///
/// let formation = Formation::new([ActorId::new(1), ActorId::new(2)], [ActorId::new(10)]);
/// let ctx = TargetContext::new(ActorId::new(1), Side::Characters, &formation, &roster);
///
/// let allies: Vec<_> = resolve_targets(TargetCategory::AllAllies, TargetSelection::None, &ctx)
///     .unwrap()
///     .collect();
/// assert_eq!(allies, vec![ActorId::new(1)]);
/// ```
pub fn resolve_targets<'a>(
    category: TargetCategory,
    selection: TargetSelection,
    ctx: &TargetContext<'a>,
) -> Result<Targets<'a>, TargetError> {
    let single = |parties: &[&Party]| -> Result<Targets<'a>, TargetError> {
        let target = selection.actor().ok_or(TargetError::MissingSelection)?;
        if ctx.is_valid(target, parties) {
            Ok(Targets::one(target))
        } else {
            Err(TargetError::Invalidated(target))
        }
    };

    match category {
        TargetCategory::SingleAlly => single(&[ctx.allies]),
        TargetCategory::SingleFoe => single(&[ctx.foes]),
        TargetCategory::AnySingle => single(&[ctx.allies, ctx.foes]),
        TargetCategory::AllAllies => Ok(Targets::roster(ctx.allies, ctx.stats)),
        TargetCategory::AllFoes => Ok(Targets::roster(ctx.foes, ctx.stats)),
        TargetCategory::Caster => Ok(Targets::one(ctx.actor)),
    }
}

/// Resolve and materialise the targets of one execution.
pub fn collect_targets(
    category: TargetCategory,
    selection: TargetSelection,
    ctx: &TargetContext<'_>,
) -> Result<TargetSet, TargetError> {
    Ok(resolve_targets(category, selection, ctx)?.collect())
}

/// Lazy target sequence returned by [`resolve_targets`].
pub struct Targets<'a> {
    pending: Pending<'a>,
}

enum Pending<'a> {
    One(Option<ActorId>),
    Roster {
        party: &'a Party,
        next_slot: usize,
        stats: &'a dyn StatProvider,
    },
}

impl<'a> Targets<'a> {
    fn one(actor: ActorId) -> Self {
        Self {
            pending: Pending::One(Some(actor)),
        }
    }

    fn roster(party: &'a Party, stats: &'a dyn StatProvider) -> Self {
        Self {
            pending: Pending::Roster {
                party,
                next_slot: 0,
                stats,
            },
        }
    }
}

impl Iterator for Targets<'_> {
    type Item = ActorId;

    fn next(&mut self) -> Option<ActorId> {
        match &mut self.pending {
            Pending::One(actor) => actor.take(),
            Pending::Roster { party, next_slot, stats } => {
                while *next_slot < party.slot_count() {
                    let slot = party.slot(*next_slot);
                    *next_slot += 1;
                    // Vacated slots and defeated members are skipped
                    if let Some(actor) = slot.filter(|actor| stats.is_alive(*actor)) {
                        return Some(actor);
                    }
                }
                None
            }
        }
    }
}

impl std::fmt::Debug for Targets<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pending {
            Pending::One(actor) => f.debug_tuple("Targets::One").field(actor).finish(),
            Pending::Roster { party, next_slot, .. } => f
                .debug_struct("Targets::Roster")
                .field("side", &party.side())
                .field("next_slot", next_slot)
                .finish(),
        }
    }
}
