//! The persistence boundary of the tournament system.
//!
//! A [`Store`] is a plain asynchronous record store; every domain rule
//! lives in front of it. [`MemoryStore`] is the reference backend used by
//! the tests and by deployments that keep the whole tournament in process.

use chrono::{NaiveDate, NaiveTime};
use padel_tournament_core::SetScore;
use parking_lot::RwLock;
use snowflaked::sync::Generator;
use thiserror::Error;

use crate::bracket::{BracketMatch, BracketMatchId};
use crate::groups::Group;
use crate::id::{GroupId, MatchId, PlayerId, TeamId};
use crate::matches::Match;
use crate::teams::{Player, Team};

const INSTANCE: u16 = 0;

static TEAM_ID: Generator = Generator::new_unchecked(INSTANCE);
static PLAYER_ID: Generator = Generator::new_unchecked(INSTANCE);
static GROUP_ID: Generator = Generator::new_unchecked(INSTANCE);
static MATCH_ID: Generator = Generator::new_unchecked(INSTANCE);

/// An error reported by a store backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced record does not exist.
    #[error("record not found")]
    NotFound,
    /// The backend could not be reached or rejected the call.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous CRUD access to the tournament records.
///
/// Calls may suspend while the backend is reached, but the callers in this
/// crate never pipeline them: each mutation is awaited before a dependent
/// one is issued. A call that fails must leave no partial write behind.
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn teams(&self) -> Result<Vec<Team>, StoreError>;

    /// Creates a team with a fresh roster; the backend mints all ids.
    async fn create_team(&self, name: String, players: Vec<String>) -> Result<Team, StoreError>;

    /// Replaces a team's name and roster. Roster players are re-minted;
    /// nothing references a [`Player`] by id.
    ///
    /// [`Player`]: crate::teams::Player
    async fn update_team(
        &self,
        id: TeamId,
        name: String,
        players: Vec<String>,
    ) -> Result<(), StoreError>;

    /// Deletes a team, cascading: the id is pulled out of every group and
    /// every match the team was part of is deleted.
    async fn delete_team(&self, id: TeamId) -> Result<(), StoreError>;

    async fn groups(&self) -> Result<Vec<Group>, StoreError>;

    async fn create_group(&self, name: String, teams: Vec<TeamId>) -> Result<Group, StoreError>;

    async fn update_group(
        &self,
        id: GroupId,
        name: String,
        teams: Vec<TeamId>,
    ) -> Result<(), StoreError>;

    /// Deletes a group, cascading to all of its matches.
    async fn delete_group(&self, id: GroupId) -> Result<(), StoreError>;

    async fn matches(&self) -> Result<Vec<Match>, StoreError>;

    /// Creates a match with no sets recorded.
    async fn create_match(
        &self,
        group: GroupId,
        team1: TeamId,
        team2: TeamId,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        matchday: Option<u32>,
    ) -> Result<Match, StoreError>;

    /// Replaces the recorded sets and completion flag. `date` and `time`
    /// are only written when given; `None` leaves the stored value alone.
    async fn update_match(
        &self,
        id: MatchId,
        sets: Vec<SetScore>,
        completed: bool,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    ) -> Result<(), StoreError>;

    async fn delete_match(&self, id: MatchId) -> Result<(), StoreError>;

    async fn bracket(&self) -> Result<Vec<BracketMatch>, StoreError>;

    /// Replaces all three team fields of one bracket slot.
    async fn update_bracket_slot(
        &self,
        id: BracketMatchId,
        team1: Option<TeamId>,
        team2: Option<TeamId>,
        winner: Option<TeamId>,
    ) -> Result<(), StoreError>;

    /// Replaces the whole bracket.
    async fn replace_bracket(&self, slots: Vec<BracketMatch>) -> Result<(), StoreError>;
}

/// In-memory reference backend.
///
/// Records keep their insertion order. All locking is internal; the store
/// hands out clones, never references into the locked state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    teams: Vec<Team>,
    groups: Vec<Group>,
    matches: Vec<Match>,
    bracket: Vec<BracketMatch>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn roster(players: Vec<String>) -> Vec<Player> {
    players
        .into_iter()
        .map(|name| Player {
            id: PlayerId(PLAYER_ID.generate()),
            name,
        })
        .collect()
}

impl Store for MemoryStore {
    async fn teams(&self) -> Result<Vec<Team>, StoreError> {
        Ok(self.inner.read().teams.clone())
    }

    async fn create_team(&self, name: String, players: Vec<String>) -> Result<Team, StoreError> {
        let team = Team {
            id: TeamId(TEAM_ID.generate()),
            name,
            players: roster(players),
        };

        self.inner.write().teams.push(team.clone());
        Ok(team)
    }

    async fn update_team(
        &self,
        id: TeamId,
        name: String,
        players: Vec<String>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let team = inner
            .teams
            .iter_mut()
            .find(|team| team.id == id)
            .ok_or(StoreError::NotFound)?;

        team.name = name;
        team.players = roster(players);
        Ok(())
    }

    async fn delete_team(&self, id: TeamId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        let before = inner.teams.len();
        inner.teams.retain(|team| team.id != id);
        if inner.teams.len() == before {
            return Err(StoreError::NotFound);
        }

        for group in &mut inner.groups {
            group.teams.retain(|team| *team != id);
        }
        inner
            .matches
            .retain(|m| m.team1 != id && m.team2 != id);

        Ok(())
    }

    async fn groups(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.inner.read().groups.clone())
    }

    async fn create_group(&self, name: String, teams: Vec<TeamId>) -> Result<Group, StoreError> {
        let group = Group {
            id: GroupId(GROUP_ID.generate()),
            name,
            teams,
        };

        self.inner.write().groups.push(group.clone());
        Ok(group)
    }

    async fn update_group(
        &self,
        id: GroupId,
        name: String,
        teams: Vec<TeamId>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let group = inner
            .groups
            .iter_mut()
            .find(|group| group.id == id)
            .ok_or(StoreError::NotFound)?;

        group.name = name;
        group.teams = teams;
        Ok(())
    }

    async fn delete_group(&self, id: GroupId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        let before = inner.groups.len();
        inner.groups.retain(|group| group.id != id);
        if inner.groups.len() == before {
            return Err(StoreError::NotFound);
        }

        inner.matches.retain(|m| m.group != id);
        Ok(())
    }

    async fn matches(&self) -> Result<Vec<Match>, StoreError> {
        Ok(self.inner.read().matches.clone())
    }

    async fn create_match(
        &self,
        group: GroupId,
        team1: TeamId,
        team2: TeamId,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        matchday: Option<u32>,
    ) -> Result<Match, StoreError> {
        let m = Match {
            id: MatchId(MATCH_ID.generate()),
            group,
            team1,
            team2,
            date,
            time,
            matchday,
            sets: Vec::new(),
            completed: false,
        };

        self.inner.write().matches.push(m.clone());
        Ok(m)
    }

    async fn update_match(
        &self,
        id: MatchId,
        sets: Vec<SetScore>,
        completed: bool,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let m = inner
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound)?;

        m.sets = sets;
        m.completed = completed;
        if let Some(date) = date {
            m.date = Some(date);
        }
        if let Some(time) = time {
            m.time = Some(time);
        }

        Ok(())
    }

    async fn delete_match(&self, id: MatchId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        let before = inner.matches.len();
        inner.matches.retain(|m| m.id != id);
        if inner.matches.len() == before {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn bracket(&self) -> Result<Vec<BracketMatch>, StoreError> {
        Ok(self.inner.read().bracket.clone())
    }

    async fn update_bracket_slot(
        &self,
        id: BracketMatchId,
        team1: Option<TeamId>,
        team2: Option<TeamId>,
        winner: Option<TeamId>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let slot = inner
            .bracket
            .iter_mut()
            .find(|slot| slot.id() == id)
            .ok_or(StoreError::NotFound)?;

        slot.team1 = team1;
        slot.team2 = team2;
        slot.winner = winner;
        Ok(())
    }

    async fn replace_bracket(&self, slots: Vec<BracketMatch>) -> Result<(), StoreError> {
        self.inner.write().bracket = slots;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStore, Store, StoreError};
    use crate::bracket::initial_bracket;

    #[tokio::test]
    async fn test_memory_store_team_crud() {
        let store = MemoryStore::new();

        let team = store
            .create_team("Smash".into(), vec!["Ada".into(), "Bo".into()])
            .await
            .unwrap();
        assert_eq!(team.players.len(), 2);

        store
            .update_team(team.id, "Smash!".into(), vec!["Ada".into()])
            .await
            .unwrap();

        let teams = store.teams().await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Smash!");
        assert_eq!(teams[0].players.len(), 1);

        store.delete_team(team.id).await.unwrap();
        assert!(store.teams().await.unwrap().is_empty());

        assert_eq!(
            store.delete_team(team.id).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn test_memory_store_delete_team_cascades() {
        let store = MemoryStore::new();

        let a = store.create_team("a".into(), Vec::new()).await.unwrap();
        let b = store.create_team("b".into(), Vec::new()).await.unwrap();

        let group = store
            .create_group("Girone A".into(), vec![a.id, b.id])
            .await
            .unwrap();
        store
            .create_match(group.id, a.id, b.id, None, None, None)
            .await
            .unwrap();

        store.delete_team(a.id).await.unwrap();

        let groups = store.groups().await.unwrap();
        assert_eq!(groups[0].teams, vec![b.id]);
        assert!(store.matches().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_delete_group_cascades() {
        let store = MemoryStore::new();

        let a = store.create_team("a".into(), Vec::new()).await.unwrap();
        let b = store.create_team("b".into(), Vec::new()).await.unwrap();

        let group = store
            .create_group("Girone A".into(), vec![a.id, b.id])
            .await
            .unwrap();
        store
            .create_match(group.id, a.id, b.id, None, None, None)
            .await
            .unwrap();

        store.delete_group(group.id).await.unwrap();

        assert!(store.groups().await.unwrap().is_empty());
        assert!(store.matches().await.unwrap().is_empty());
        // Teams survive a group delete.
        assert_eq!(store.teams().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_memory_store_bracket() {
        let store = MemoryStore::new();
        store.replace_bracket(initial_bracket()).await.unwrap();

        let a = store.create_team("a".into(), Vec::new()).await.unwrap();

        let id = "quarter-2".parse().unwrap();
        store
            .update_bracket_slot(id, Some(a.id), None, None)
            .await
            .unwrap();

        let bracket = store.bracket().await.unwrap();
        let slot = bracket.iter().find(|slot| slot.id() == id).unwrap();
        assert_eq!(slot.team1, Some(a.id));

        // A store that was never seeded has no slots to update.
        let empty = MemoryStore::new();
        assert_eq!(
            empty
                .update_bracket_slot(id, None, None, None)
                .await
                .unwrap_err(),
            StoreError::NotFound
        );
    }
}
