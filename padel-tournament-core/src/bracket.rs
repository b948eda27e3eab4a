//! The fixed eight-team knockout bracket.
//!
//! The bracket is a flat array of 7 slots addressed by `(round, position)`:
//! 4 quarterfinals, 2 semifinals and the final. Winner propagation is an
//! index computation, not a tree walk, and it happens eagerly on write, so
//! the bracket is always reconstructible from its slots alone.

use std::fmt::{self, Display, Formatter};

use crate::{Error, Result, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The total number of slots in the bracket.
pub const SLOT_COUNT: usize = 7;

/// A knockout round of the bracket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BracketRound {
    Quarter,
    Semi,
    Final,
}

impl BracketRound {
    /// The number of slots played in this round.
    #[inline]
    pub const fn slots(self) -> usize {
        match self {
            Self::Quarter => 4,
            Self::Semi => 2,
            Self::Final => 1,
        }
    }

    /// Index of the round's first slot in the flat bracket layout.
    #[inline]
    const fn offset(self) -> usize {
        match self {
            Self::Quarter => 0,
            Self::Semi => 4,
            Self::Final => 6,
        }
    }

    /// All rounds in play order.
    #[inline]
    pub const fn all() -> [Self; 3] {
        [Self::Quarter, Self::Semi, Self::Final]
    }
}

impl Display for BracketRound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quarter => f.write_str("quarter"),
            Self::Semi => f.write_str("semi"),
            Self::Final => f.write_str("final"),
        }
    }
}

/// The slot a winner of `(round, position)` advances into, together with
/// the side it occupies there. Returns `None` for the final.
pub fn next_slot(round: BracketRound, position: usize) -> Option<(BracketRound, usize, Side)> {
    match round {
        BracketRound::Quarter => Some((
            BracketRound::Semi,
            position / 2,
            if position % 2 == 0 {
                Side::Team1
            } else {
                Side::Team2
            },
        )),
        BracketRound::Semi => Some((
            BracketRound::Final,
            0,
            if position == 0 { Side::Team1 } else { Side::Team2 },
        )),
        BracketRound::Final => None,
    }
}

/// The lifecycle of a single slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// No teams assigned.
    Empty,
    /// One team assigned.
    Partial,
    /// Both teams assigned, no winner recorded.
    Ready,
    /// A winner has been recorded. It can still be overwritten.
    Decided,
}

/// One node of the elimination tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BracketSlot<T> {
    pub round: BracketRound,
    pub position: usize,
    pub team1: Option<T>,
    pub team2: Option<T>,
    pub winner: Option<T>,
}

impl<T> BracketSlot<T> {
    fn empty(round: BracketRound, position: usize) -> Self {
        Self {
            round,
            position,
            team1: None,
            team2: None,
            winner: None,
        }
    }

    pub fn state(&self) -> SlotState {
        match (&self.team1, &self.team2, &self.winner) {
            (_, _, Some(_)) => SlotState::Decided,
            (Some(_), Some(_), None) => SlotState::Ready,
            (None, None, None) => SlotState::Empty,
            _ => SlotState::Partial,
        }
    }
}

/// A fixed-shape single elimination bracket: four quarterfinals feeding two
/// semifinals feeding the final.
///
/// `semi[i]` receives the winners of `quarter[2i]` and `quarter[2i + 1]`
/// into its first and second side; the final receives the semifinal winners
/// the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bracket<T> {
    slots: Vec<BracketSlot<T>>,
}

impl<T> Bracket<T>
where
    T: Clone + PartialEq,
{
    /// Creates a new empty `Bracket`.
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(SLOT_COUNT);
        for round in BracketRound::all() {
            for position in 0..round.slots() {
                slots.push(BracketSlot::empty(round, position));
            }
        }

        log::debug!("Created empty bracket with {} slots", slots.len());

        Self { slots }
    }

    /// Resumes a bracket from existing slots.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `slots` does not hold exactly one slot
    /// per `(round, position)` in quarter, semi, final order.
    pub fn resume(slots: Vec<BracketSlot<T>>) -> Result<Self> {
        if slots.len() != SLOT_COUNT {
            return Err(Error::InvalidNumberOfSlots {
                expected: SLOT_COUNT,
                found: slots.len(),
            });
        }

        for (index, slot) in slots.iter().enumerate() {
            if slot.position >= slot.round.slots()
                || slot.round.offset() + slot.position != index
            {
                return Err(Error::MisplacedSlot { index });
            }
        }

        Ok(Self { slots })
    }

    /// Discards every assignment and winner, keeping the fixed structure.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the slot at `(round, position)`.
    pub fn get(&self, round: BracketRound, position: usize) -> Option<&BracketSlot<T>> {
        if position < round.slots() {
            self.slots.get(round.offset() + position)
        } else {
            None
        }
    }

    /// All slots in quarter, semi, final order.
    #[inline]
    pub fn slots(&self) -> &[BracketSlot<T>] {
        &self.slots
    }

    fn slot_mut(&mut self, round: BracketRound, position: usize) -> Result<&mut BracketSlot<T>> {
        if position >= round.slots() {
            return Err(Error::UnknownSlot { round, position });
        }

        Ok(&mut self.slots[round.offset() + position])
    }

    /// Puts `team` on one side of a slot.
    ///
    /// Bracket entry is a manual admin action; the team is not checked
    /// against any group.
    pub fn assign(
        &mut self,
        round: BracketRound,
        position: usize,
        side: Side,
        team: T,
    ) -> Result<()> {
        let slot = self.slot_mut(round, position)?;
        match side {
            Side::Team1 => slot.team1 = Some(team),
            Side::Team2 => slot.team2 = Some(team),
        }

        Ok(())
    }

    /// Replaces all three fields of a slot at once and, when `winner` is
    /// set, advances it into the next round.
    ///
    /// Propagation is one-shot and forward-only: overwriting a winner
    /// pushes the new value downstream, but nothing the previous value
    /// already reached further down the tree is retracted.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if the slot does not exist or a `Some`
    /// winner is neither of the slot's teams.
    pub fn update(
        &mut self,
        round: BracketRound,
        position: usize,
        team1: Option<T>,
        team2: Option<T>,
        winner: Option<T>,
    ) -> Result<()> {
        let slot = self.slot_mut(round, position)?;

        if let Some(winner) = &winner {
            if team1.as_ref() != Some(winner) && team2.as_ref() != Some(winner) {
                return Err(Error::InvalidWinner);
            }
        }

        slot.team1 = team1;
        slot.team2 = team2;
        slot.winner = winner.clone();

        if let Some(winner) = winner {
            self.propagate(round, position, winner);
        }

        Ok(())
    }

    /// Records the winner of a slot, keeping its team assignments.
    pub fn set_winner(&mut self, round: BracketRound, position: usize, winner: T) -> Result<()> {
        let slot = self.slot_mut(round, position)?;
        let team1 = slot.team1.clone();
        let team2 = slot.team2.clone();

        self.update(round, position, team1, team2, Some(winner))
    }

    fn propagate(&mut self, round: BracketRound, position: usize, winner: T) {
        let Some((next_round, next_position, side)) = next_slot(round, position) else {
            return;
        };

        log::debug!(
            "Advancing winner of {}-{} into {}-{}",
            round,
            position,
            next_round,
            next_position
        );

        let slot = &mut self.slots[next_round.offset() + next_position];
        match side {
            Side::Team1 => slot.team1 = Some(winner),
            Side::Team2 => slot.team2 = Some(winner),
        }
    }
}

impl<T> Default for Bracket<T>
where
    T: Clone + PartialEq,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
