//! # padel-tournament-api
//!
//! The entity model and store boundary of the padel tournament system.
//!
//! Important items:
//! - [`TournamentService`]: the state container every operation goes
//!   through — team/group/match CRUD with cascades, calendar generation,
//!   standings and the knockout bracket.
//! - [`Store`]: the asynchronous CRUD boundary towards the persistence
//!   backend, with [`MemoryStore`] as the in-process reference backend.
//! - [`TournamentData`]: the snapshot of the whole tournament, also usable
//!   as a JSON export/import format.
//! - [`auth::Session`]: the admin gate.
//!
//! The domain rules themselves live in `padel-tournament-core`; this crate
//! wires them to identified records and a backend.
//!
//! [`Store`]: store::Store
//! [`MemoryStore`]: store::MemoryStore
pub mod auth;
pub mod bracket;
pub mod groups;
pub mod id;
pub mod matches;
pub mod service;
pub mod store;
pub mod teams;

pub use service::{StandingRow, TournamentService};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bracket::{BracketMatch, BracketMatchId};
use groups::Group;
use id::{GroupId, MatchId, TeamId};
use matches::Match;
use store::StoreError;
use teams::Team;

use std::result;

/// Everything the presentation layer reads: the last state successfully
/// fetched from the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentData {
    pub teams: Vec<Team>,
    pub groups: Vec<Group>,
    pub matches: Vec<Match>,
    pub bracket: Vec<BracketMatch>,
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid score {team1}-{team2} for set {index}")]
    InvalidSetScore { index: usize, team1: u8, team2: u8 },
    #[error("a match requires two distinct teams")]
    SameTeam,
    #[error("completed flag does not match the recorded sets")]
    CompletedMismatch,
    #[error("team {0} not found")]
    TeamNotFound(TeamId),
    #[error("group {0} not found")]
    GroupNotFound(GroupId),
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
    #[error("bracket slot {0} not found")]
    SlotNotFound(BracketMatchId),
    #[error(transparent)]
    Core(#[from] padel_tournament_core::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use crate::bracket::initial_bracket;
    use crate::groups::Group;
    use crate::id::{GroupId, TeamId};
    use crate::teams::Team;
    use crate::TournamentData;

    #[test]
    fn test_tournament_data_json_roundtrip() {
        let data = TournamentData {
            teams: vec![Team {
                id: TeamId(1),
                name: "Smash".into(),
                players: Vec::new(),
            }],
            groups: vec![Group {
                id: GroupId(2),
                name: "Girone A".into(),
                teams: vec![TeamId(1)],
            }],
            matches: Vec::new(),
            bracket: initial_bracket(),
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: TournamentData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, data);
    }
}
