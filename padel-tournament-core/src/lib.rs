//! # padel-tournament-core
//!
//! This crate contains the domain rules of the padel tournament system: set
//! and match scoring, group standings, round-robin calendar generation and
//! the fixed eight-team knockout bracket.
//!
//! Important types:
//! - [`SetScore`]: the games won by each side in a single set.
//! - [`Side`]: one of the two parties of a match or bracket slot.
//! - [`Standing`]: an aggregated table row for one team of a group.
//! - [`Pairing`]: a generated fixture between two teams.
//! - [`Bracket`]: the quarterfinal/semifinal/final elimination tree.
//!
//! All types are generic over the team identifier; the crate knows nothing
//! about rosters, groups or persistence.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to the data types.
//!
pub mod bracket;
pub mod schedule;
pub mod scoring;
pub mod standings;

pub use bracket::{Bracket, BracketRound, BracketSlot, SlotState};
pub use schedule::Pairing;
pub use standings::{PlayedMatch, Standing};

use thiserror::Error;

use std::result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("not enough teams: a schedule requires at least 2, found {found}")]
    InsufficientTeams { found: usize },
    #[error("invalid number of slots: expected {expected}, found {found}")]
    InvalidNumberOfSlots { expected: usize, found: usize },
    #[error("slot at index {index} does not match the fixed bracket layout")]
    MisplacedSlot { index: usize },
    #[error("no bracket slot at {round}-{position}")]
    UnknownSlot {
        round: BracketRound,
        position: usize,
    },
    #[error("winner is not one of the slot's teams")]
    InvalidWinner,
}

/// The games won by each side in a single set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetScore {
    pub team1: u8,
    pub team2: u8,
}

impl SetScore {
    #[inline]
    pub const fn new(team1: u8, team2: u8) -> Self {
        Self { team1, team2 }
    }

    /// Returns the side with the higher score. A tie counts for the second
    /// side; tied scores never pass validation in the first place.
    #[inline]
    pub fn winner(self) -> Side {
        if self.team1 > self.team2 {
            Side::Team1
        } else {
            Side::Team2
        }
    }
}

impl From<(u8, u8)> for SetScore {
    #[inline]
    fn from((team1, team2): (u8, u8)) -> Self {
        Self { team1, team2 }
    }
}

/// One of the two parties of a match or bracket slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Self::Team1 => Self::Team2,
            Self::Team2 => Self::Team1,
        }
    }
}
