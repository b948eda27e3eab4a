use chrono::{NaiveDate, NaiveTime};
use padel_tournament_core::SetScore;
use serde::{Deserialize, Serialize};

use crate::id::{GroupId, MatchId, TeamId};

/// A group-phase match between two teams.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub group: GroupId,
    pub team1: TeamId,
    pub team2: TeamId,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    /// The matchday ("giornata") this fixture was generated into. `None`
    /// for hand-created matches.
    pub matchday: Option<u32>,
    pub sets: Vec<SetScore>,
    /// Derived from `sets` but stored with the record;
    /// [`TournamentService::update_match`] keeps the two consistent.
    ///
    /// [`TournamentService::update_match`]: crate::TournamentService::update_match
    pub completed: bool,
}
