//! Persisted representation of the knockout bracket.
//!
//! The store holds the bracket as 7 flat records, one per slot. Records
//! carry their `(round, position)` coordinates and are addressed by the
//! derived id `quarter-0` .. `final-0`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use padel_tournament_core::bracket::{Bracket, BracketSlot, SLOT_COUNT};
use padel_tournament_core::{BracketRound, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::TeamId;

/// Identifier of a bracket slot, derived from its coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BracketMatchId {
    pub round: BracketRound,
    pub position: usize,
}

impl Display for BracketMatchId {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.round, self.position)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid bracket slot id")]
pub struct ParseBracketMatchIdError;

impl FromStr for BracketMatchId {
    type Err = ParseBracketMatchIdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (round, position) = s.split_once('-').ok_or(ParseBracketMatchIdError)?;

        let round = match round {
            "quarter" => BracketRound::Quarter,
            "semi" => BracketRound::Semi,
            "final" => BracketRound::Final,
            _ => return Err(ParseBracketMatchIdError),
        };

        let position = position.parse().map_err(|_| ParseBracketMatchIdError)?;
        if position >= round.slots() {
            return Err(ParseBracketMatchIdError);
        }

        Ok(Self { round, position })
    }
}

/// One persisted slot of the knockout bracket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub round: BracketRound,
    pub position: usize,
    pub team1: Option<TeamId>,
    pub team2: Option<TeamId>,
    pub winner: Option<TeamId>,
}

impl BracketMatch {
    fn empty(round: BracketRound, position: usize) -> Self {
        Self {
            round,
            position,
            team1: None,
            team2: None,
            winner: None,
        }
    }

    /// The derived slot id.
    #[inline]
    pub fn id(&self) -> BracketMatchId {
        BracketMatchId {
            round: self.round,
            position: self.position,
        }
    }
}

/// The seven empty records of a fresh bracket.
pub fn initial_bracket() -> Vec<BracketMatch> {
    let mut slots = Vec::with_capacity(SLOT_COUNT);
    for round in BracketRound::all() {
        for position in 0..round.slots() {
            slots.push(BracketMatch::empty(round, position));
        }
    }

    slots
}

/// Rebuilds the engine bracket from persisted records.
///
/// Records may arrive in any order; they are sorted into the canonical
/// layout first. Errors if they do not form exactly one slot per
/// `(round, position)`.
pub fn to_bracket(records: &[BracketMatch]) -> Result<Bracket<TeamId>> {
    let mut slots: Vec<BracketSlot<TeamId>> = records
        .iter()
        .map(|record| BracketSlot {
            round: record.round,
            position: record.position,
            team1: record.team1,
            team2: record.team2,
            winner: record.winner,
        })
        .collect();
    slots.sort_by_key(|slot| (slot.round, slot.position));

    Bracket::resume(slots)
}

/// Flattens the engine bracket back into persistable records.
pub fn from_bracket(bracket: &Bracket<TeamId>) -> Vec<BracketMatch> {
    bracket
        .slots()
        .iter()
        .map(|slot| BracketMatch {
            round: slot.round,
            position: slot.position,
            team1: slot.team1,
            team2: slot.team2,
            winner: slot.winner,
        })
        .collect()
}
