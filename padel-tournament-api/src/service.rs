//! Orchestration of every tournament operation against a [`Store`].
//!
//! [`TournamentService`] is the single state container of the system: it
//! owns the store handle and the last snapshot successfully read from it.
//! Every mutation is a discrete unit of work that validates against the
//! snapshot, writes through the store and then resynchronizes the whole
//! snapshot. A failed call leaves the previous known-good snapshot in
//! place; there is no retry and no transaction around multi-record
//! mutations, so a failure in between leaves partial state that the next
//! successful refresh resolves.

use chrono::{NaiveDate, NaiveTime};
use padel_tournament_core::bracket::next_slot;
use padel_tournament_core::schedule::round_robin;
use padel_tournament_core::scoring::{is_match_complete, validate_set_score};
use padel_tournament_core::standings::{standings, PlayedMatch};
use padel_tournament_core::SetScore;
use serde::{Deserialize, Serialize};

use crate::bracket::{initial_bracket, to_bracket, BracketMatchId};
use crate::groups::Group;
use crate::id::{GroupId, MatchId, TeamId};
use crate::matches::Match;
use crate::store::Store;
use crate::teams::Team;
use crate::{Error, Result, TournamentData};

/// A standings row with the team name resolved for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team: TeamId,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub set_difference: i32,
    pub games_won: u32,
    pub games_lost: u32,
    pub game_difference: i32,
    pub points: u32,
}

/// The tournament state container.
///
/// Created once at application start and kept for the whole session; all
/// reads go through [`data`] and all writes through the operation methods.
///
/// [`data`]: Self::data
#[derive(Debug)]
pub struct TournamentService<S> {
    store: S,
    data: TournamentData,
}

impl<S> TournamentService<S>
where
    S: Store,
{
    /// Loads the initial snapshot, seeding the empty bracket when the
    /// backend holds none.
    pub async fn new(store: S) -> Result<Self> {
        let mut service = Self {
            store,
            data: TournamentData::default(),
        };
        service.refresh().await?;

        if service.data.bracket.is_empty() {
            service.store.replace_bracket(initial_bracket()).await?;
            service.refresh().await?;
        }

        Ok(service)
    }

    /// The last snapshot successfully read from the store.
    #[inline]
    pub fn data(&self) -> &TournamentData {
        &self.data
    }

    /// Teams not assigned to any group.
    pub fn available_teams(&self) -> Vec<&Team> {
        self.data
            .teams
            .iter()
            .filter(|team| {
                !self
                    .data
                    .groups
                    .iter()
                    .any(|group| group.teams.contains(&team.id))
            })
            .collect()
    }

    /// Re-reads all collections from the store into the snapshot. On
    /// failure the previous snapshot is kept.
    pub async fn refresh(&mut self) -> Result<()> {
        let (teams, groups, matches, bracket) = futures::try_join!(
            self.store.teams(),
            self.store.groups(),
            self.store.matches(),
            self.store.bracket(),
        )?;

        self.data = TournamentData {
            teams,
            groups,
            matches,
            bracket,
        };

        Ok(())
    }

    pub async fn create_team(&mut self, name: String, players: Vec<String>) -> Result<Team> {
        let team = self.store.create_team(name, players).await?;
        log::info!("created team {} ({})", team.name, team.id);

        self.refresh().await?;
        Ok(team)
    }

    pub async fn update_team(
        &mut self,
        id: TeamId,
        name: String,
        players: Vec<String>,
    ) -> Result<()> {
        if !self.data.teams.iter().any(|team| team.id == id) {
            return Err(Error::TeamNotFound(id));
        }

        self.store.update_team(id, name, players).await?;
        self.refresh().await
    }

    /// Deletes a team. The store cascades: group links and the team's
    /// matches go with it.
    pub async fn delete_team(&mut self, id: TeamId) -> Result<()> {
        if !self.data.teams.iter().any(|team| team.id == id) {
            return Err(Error::TeamNotFound(id));
        }

        self.store.delete_team(id).await?;
        log::info!("deleted team {}", id);
        self.refresh().await
    }

    pub async fn create_group(&mut self, name: String, teams: Vec<TeamId>) -> Result<Group> {
        for team in &teams {
            if !self.data.teams.iter().any(|t| t.id == *team) {
                return Err(Error::TeamNotFound(*team));
            }
        }

        let group = self.store.create_group(name, teams).await?;
        log::info!("created group {} ({})", group.name, group.id);

        self.refresh().await?;
        Ok(group)
    }

    pub async fn update_group(
        &mut self,
        id: GroupId,
        name: String,
        teams: Vec<TeamId>,
    ) -> Result<()> {
        if !self.data.groups.iter().any(|group| group.id == id) {
            return Err(Error::GroupNotFound(id));
        }
        for team in &teams {
            if !self.data.teams.iter().any(|t| t.id == *team) {
                return Err(Error::TeamNotFound(*team));
            }
        }

        self.store.update_group(id, name, teams).await?;
        self.refresh().await
    }

    /// Deletes a group and, through the store cascade, all of its matches.
    pub async fn delete_group(&mut self, id: GroupId) -> Result<()> {
        if !self.data.groups.iter().any(|group| group.id == id) {
            return Err(Error::GroupNotFound(id));
        }

        self.store.delete_group(id).await?;
        log::info!("deleted group {}", id);
        self.refresh().await
    }

    pub async fn create_match(
        &mut self,
        group: GroupId,
        team1: TeamId,
        team2: TeamId,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        matchday: Option<u32>,
    ) -> Result<Match> {
        if team1 == team2 {
            return Err(Error::SameTeam);
        }
        if !self.data.groups.iter().any(|g| g.id == group) {
            return Err(Error::GroupNotFound(group));
        }
        for team in [team1, team2] {
            if !self.data.teams.iter().any(|t| t.id == team) {
                return Err(Error::TeamNotFound(team));
            }
        }

        let m = self
            .store
            .create_match(group, team1, team2, date, time, matchday)
            .await?;

        self.refresh().await?;
        Ok(m)
    }

    /// Records the result of a match.
    ///
    /// Every set must be a legal score for its position and `completed`
    /// must agree with the recorded sets; nothing is persisted otherwise.
    pub async fn update_match(
        &mut self,
        id: MatchId,
        sets: Vec<SetScore>,
        completed: bool,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    ) -> Result<()> {
        if !self.data.matches.iter().any(|m| m.id == id) {
            return Err(Error::MatchNotFound(id));
        }

        for (index, set) in sets.iter().enumerate() {
            if !validate_set_score(set.team1, set.team2, index) {
                return Err(Error::InvalidSetScore {
                    index,
                    team1: set.team1,
                    team2: set.team2,
                });
            }
        }

        if completed != is_match_complete(&sets) {
            return Err(Error::CompletedMismatch);
        }

        self.store
            .update_match(id, sets, completed, date, time)
            .await?;
        self.refresh().await
    }

    pub async fn delete_match(&mut self, id: MatchId) -> Result<()> {
        if !self.data.matches.iter().any(|m| m.id == id) {
            return Err(Error::MatchNotFound(id));
        }

        self.store.delete_match(id).await?;
        self.refresh().await
    }

    /// The ranked table of one group.
    ///
    /// A team appears once it has a scheduled match in the group; a row
    /// whose team no longer exists keeps its statistics with an empty name.
    pub fn standings(&self, group: GroupId) -> Vec<StandingRow> {
        let matches: Vec<PlayedMatch<TeamId>> = self
            .data
            .matches
            .iter()
            .filter(|m| m.group == group)
            .map(|m| PlayedMatch {
                team1: m.team1,
                team2: m.team2,
                sets: m.sets.clone(),
                completed: m.completed,
            })
            .collect();

        standings(&matches)
            .into_iter()
            .map(|standing| {
                let team_name = self
                    .data
                    .teams
                    .iter()
                    .find(|team| team.id == standing.team)
                    .map(|team| team.name.clone())
                    .unwrap_or_default();

                StandingRow {
                    team: standing.team,
                    team_name,
                    played: standing.played,
                    wins: standing.wins,
                    losses: standing.losses,
                    sets_won: standing.sets_won,
                    sets_lost: standing.sets_lost,
                    set_difference: standing.set_difference,
                    games_won: standing.games_won,
                    games_lost: standing.games_lost,
                    game_difference: standing.game_difference,
                    points: standing.points,
                }
            })
            .collect()
    }

    /// Generates the round-robin calendar for a group, tagging each fixture
    /// with its matchday.
    ///
    /// Pairings that already exist in the group (in either orientation) are
    /// skipped, so regenerating after adding a team only fills the gaps.
    /// Returns the number of matches created.
    pub async fn generate_schedule(&mut self, group: GroupId) -> Result<usize> {
        let teams = self
            .data
            .groups
            .iter()
            .find(|g| g.id == group)
            .map(|g| g.teams.clone())
            .ok_or(Error::GroupNotFound(group))?;

        let matchdays = round_robin(&teams)?;

        let mut created = 0;
        for (round, pairings) in matchdays.iter().enumerate() {
            for pairing in pairings {
                let exists = self.data.matches.iter().any(|m| {
                    m.group == group
                        && ((m.team1 == pairing.team1 && m.team2 == pairing.team2)
                            || (m.team1 == pairing.team2 && m.team2 == pairing.team1))
                });
                if exists {
                    continue;
                }

                self.store
                    .create_match(
                        group,
                        pairing.team1,
                        pairing.team2,
                        None,
                        None,
                        Some(round as u32 + 1),
                    )
                    .await?;
                created += 1;
            }
        }

        log::info!(
            "generated {} matches over {} matchdays for group {}",
            created,
            matchdays.len(),
            group
        );

        self.refresh().await?;
        Ok(created)
    }

    /// Applies an admin edit to a bracket slot and advances its winner.
    ///
    /// The propagation target is computed from the current snapshot, not a
    /// fresh read; the edited slot and the advanced slot are persisted as
    /// two separate calls.
    pub async fn update_bracket_match(
        &mut self,
        id: BracketMatchId,
        team1: Option<TeamId>,
        team2: Option<TeamId>,
        winner: Option<TeamId>,
    ) -> Result<()> {
        let mut bracket = to_bracket(&self.data.bracket)?;

        bracket
            .update(id.round, id.position, team1, team2, winner)
            .map_err(|err| match err {
                padel_tournament_core::Error::UnknownSlot { .. } => Error::SlotNotFound(id),
                err => Error::Core(err),
            })?;

        self.store
            .update_bracket_slot(id, team1, team2, winner)
            .await?;

        if winner.is_some() {
            if let Some((round, position, _)) = next_slot(id.round, id.position) {
                if let Some(slot) = bracket.get(round, position) {
                    self.store
                        .update_bracket_slot(
                            BracketMatchId { round, position },
                            slot.team1,
                            slot.team2,
                            slot.winner,
                        )
                        .await?;
                }
            }
        }

        self.refresh().await
    }

    /// Records the winner of a bracket slot, keeping its team assignments.
    pub async fn set_bracket_winner(&mut self, id: BracketMatchId, winner: TeamId) -> Result<()> {
        let slot = self
            .data
            .bracket
            .iter()
            .find(|slot| slot.id() == id)
            .ok_or(Error::SlotNotFound(id))?;

        let (team1, team2) = (slot.team1, slot.team2);
        self.update_bracket_match(id, team1, team2, Some(winner))
            .await
    }

    /// Puts every bracket slot back into its empty initial state.
    pub async fn reset_bracket(&mut self) -> Result<()> {
        self.store.replace_bracket(initial_bracket()).await?;
        log::info!("bracket reset");
        self.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use padel_tournament_core::{BracketRound, SetScore};

    use super::TournamentService;
    use crate::bracket::BracketMatchId;
    use crate::id::{GroupId, TeamId};
    use crate::store::MemoryStore;
    use crate::Error;

    async fn service_with_group(
        names: &[&str],
    ) -> (TournamentService<MemoryStore>, GroupId, Vec<TeamId>) {
        let mut service = TournamentService::new(MemoryStore::new()).await.unwrap();

        let mut teams = Vec::new();
        for name in names {
            let team = service
                .create_team((*name).to_owned(), Vec::new())
                .await
                .unwrap();
            teams.push(team.id);
        }

        let group = service
            .create_group("Girone A".into(), teams.clone())
            .await
            .unwrap();

        (service, group.id, teams)
    }

    #[tokio::test]
    async fn test_service_seeds_bracket() {
        let service = TournamentService::new(MemoryStore::new()).await.unwrap();

        assert_eq!(service.data().bracket.len(), 7);
        assert!(service
            .data()
            .bracket
            .iter()
            .all(|slot| slot.team1.is_none() && slot.team2.is_none() && slot.winner.is_none()));
    }

    #[tokio::test]
    async fn test_service_available_teams() {
        let (mut service, _, teams) = service_with_group(&["a", "b"]).await;
        assert!(service.available_teams().is_empty());

        let free = service.create_team("c".into(), Vec::new()).await.unwrap();

        let available: Vec<TeamId> = service
            .available_teams()
            .iter()
            .map(|team| team.id)
            .collect();
        assert_eq!(available, vec![free.id]);
        assert!(!available.contains(&teams[0]));
    }

    #[tokio::test]
    async fn test_service_generate_schedule() {
        let (mut service, group, teams) = service_with_group(&["a", "b", "c", "d"]).await;

        let created = service.generate_schedule(group).await.unwrap();
        assert_eq!(created, 6);

        let matches = &service.data().matches;
        assert_eq!(matches.len(), 6);
        for m in matches {
            assert!(m.matchday.is_some());
            assert!(m.matchday.unwrap() >= 1 && m.matchday.unwrap() <= 3);
            assert!(!m.completed);
        }

        // Every team plays once per matchday.
        for matchday in 1..=3u32 {
            for team in &teams {
                let plays = matches
                    .iter()
                    .filter(|m| m.matchday == Some(matchday))
                    .filter(|m| m.team1 == *team || m.team2 == *team)
                    .count();
                assert_eq!(plays, 1);
            }
        }

        // Regenerating finds every pairing already present.
        assert_eq!(service.generate_schedule(group).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_service_generate_schedule_requires_teams() {
        let (mut service, group, _) = service_with_group(&["a"]).await;

        assert!(matches!(
            service.generate_schedule(group).await.unwrap_err(),
            Error::Core(padel_tournament_core::Error::InsufficientTeams { found: 1 })
        ));

        assert!(matches!(
            service.generate_schedule(GroupId(999)).await.unwrap_err(),
            Error::GroupNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_service_match_result_and_standings() {
        let (mut service, group, _) = service_with_group(&["a", "b"]).await;
        service.generate_schedule(group).await.unwrap();

        let id = service.data().matches[0].id;
        let (team1, team2) = {
            let m = &service.data().matches[0];
            (m.team1, m.team2)
        };

        service
            .update_match(
                id,
                vec![SetScore::new(6, 2), SetScore::new(6, 3)],
                true,
                None,
                None,
            )
            .await
            .unwrap();

        let table = service.standings(group);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].team, team1);
        assert_eq!(table[0].points, 3);
        assert_eq!(table[0].team_name, "a");
        assert_eq!(table[1].team, team2);
        assert_eq!(table[1].points, 0);
    }

    #[tokio::test]
    async fn test_service_update_match_rejects_bad_input() {
        let (mut service, group, _) = service_with_group(&["a", "b"]).await;
        service.generate_schedule(group).await.unwrap();

        let id = service.data().matches[0].id;

        // 6-5 is not a final set score.
        assert!(matches!(
            service
                .update_match(
                    id,
                    vec![SetScore::new(6, 5), SetScore::new(6, 3)],
                    true,
                    None,
                    None
                )
                .await
                .unwrap_err(),
            Error::InvalidSetScore { index: 0, .. }
        ));

        // One set cannot be a completed match.
        assert!(matches!(
            service
                .update_match(id, vec![SetScore::new(6, 2)], true, None, None)
                .await
                .unwrap_err(),
            Error::CompletedMismatch
        ));

        // Nothing was persisted.
        assert!(service.data().matches[0].sets.is_empty());
        assert!(!service.data().matches[0].completed);
    }

    #[tokio::test]
    async fn test_service_create_match_validation() {
        let (mut service, group, teams) = service_with_group(&["a", "b"]).await;

        assert!(matches!(
            service
                .create_match(group, teams[0], teams[0], None, None, None)
                .await
                .unwrap_err(),
            Error::SameTeam
        ));

        assert!(matches!(
            service
                .create_match(group, teams[0], TeamId(999), None, None, None)
                .await
                .unwrap_err(),
            Error::TeamNotFound(_)
        ));

        assert!(matches!(
            service
                .create_match(GroupId(999), teams[0], teams[1], None, None, None)
                .await
                .unwrap_err(),
            Error::GroupNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_service_bracket_flow() {
        let (mut service, _, teams) = service_with_group(&["a", "b", "c", "d"]).await;
        let (a, b, c, d) = (teams[0], teams[1], teams[2], teams[3]);

        let quarter0 = BracketMatchId {
            round: BracketRound::Quarter,
            position: 0,
        };
        let quarter1 = BracketMatchId {
            round: BracketRound::Quarter,
            position: 1,
        };
        let semi0 = BracketMatchId {
            round: BracketRound::Semi,
            position: 0,
        };

        service
            .update_bracket_match(quarter0, Some(a), Some(b), None)
            .await
            .unwrap();
        service.set_bracket_winner(quarter0, a).await.unwrap();

        let slot = |service: &TournamentService<MemoryStore>, id: BracketMatchId| {
            service
                .data()
                .bracket
                .iter()
                .find(|slot| slot.id() == id)
                .cloned()
                .unwrap()
        };

        assert_eq!(slot(&service, semi0).team1, Some(a));

        service
            .update_bracket_match(quarter1, Some(c), Some(d), Some(c))
            .await
            .unwrap();
        assert_eq!(slot(&service, semi0).team2, Some(c));

        service.set_bracket_winner(semi0, a).await.unwrap();
        let final0 = BracketMatchId {
            round: BracketRound::Final,
            position: 0,
        };
        assert_eq!(slot(&service, final0).team1, Some(a));

        // A winner from outside the slot is rejected before anything is
        // written.
        assert!(matches!(
            service
                .update_bracket_match(quarter0, Some(a), Some(b), Some(d))
                .await
                .unwrap_err(),
            Error::Core(padel_tournament_core::Error::InvalidWinner)
        ));

        service.reset_bracket().await.unwrap();
        assert!(service
            .data()
            .bracket
            .iter()
            .all(|slot| slot.team1.is_none() && slot.team2.is_none() && slot.winner.is_none()));
    }

    #[tokio::test]
    async fn test_service_delete_team_cascades_into_snapshot() {
        let (mut service, group, teams) = service_with_group(&["a", "b", "c"]).await;
        service.generate_schedule(group).await.unwrap();
        assert_eq!(service.data().matches.len(), 3);

        service.delete_team(teams[0]).await.unwrap();

        assert_eq!(service.data().teams.len(), 2);
        assert_eq!(service.data().groups[0].teams.len(), 2);
        assert_eq!(service.data().matches.len(), 1);

        assert!(matches!(
            service.delete_team(teams[0]).await.unwrap_err(),
            Error::TeamNotFound(_)
        ));
    }
}
