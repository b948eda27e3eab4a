//! Group standings derived from played matches.
//!
//! The table is recomputed from scratch on every call; nothing is cached or
//! stored. Points follow the 3/2/1/0 scheme that rewards straight-set wins:
//! a 2-0 winner takes 3 points, a 2-1 winner takes 2 and leaves 1 to the
//! loser.

use std::collections::HashMap;
use std::hash::Hash;

use crate::SetScore;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A match of one group as fed into the standings calculation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayedMatch<T> {
    pub team1: T,
    pub team2: T,
    pub sets: Vec<SetScore>,
    pub completed: bool,
}

/// An aggregated table row for a single team.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Standing<T> {
    pub team: T,
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

impl<T> Standing<T> {
    fn new(team: T) -> Self {
        Self {
            team,
            played: 0,
            wins: 0,
            losses: 0,
            sets_won: 0,
            sets_lost: 0,
            set_difference: 0,
            games_won: 0,
            games_lost: 0,
            game_difference: 0,
            points: 0,
        }
    }

    fn record(
        &mut self,
        won: bool,
        sets_won: u32,
        sets_lost: u32,
        games_won: u32,
        games_lost: u32,
        points: u32,
    ) {
        self.played += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }

        self.sets_won += sets_won;
        self.sets_lost += sets_lost;
        self.set_difference = self.sets_won as i32 - self.sets_lost as i32;
        self.games_won += games_won;
        self.games_lost += games_lost;
        self.game_difference = self.games_won as i32 - self.games_lost as i32;
        self.points += points;
    }
}

/// Computes the ranked table for the given matches of one group.
///
/// Every team appearing in a match gets a row, in first-appearance order;
/// only completed matches contribute statistics. The table is sorted by
/// points, then set difference, then game difference, all descending; rows
/// tied on all three keys keep their insertion order.
pub fn standings<T>(matches: &[PlayedMatch<T>]) -> Vec<Standing<T>>
where
    T: Clone + Eq + Hash,
{
    let mut rows: Vec<Standing<T>> = Vec::new();
    let mut indices: HashMap<T, usize> = HashMap::new();

    for m in matches {
        for team in [&m.team1, &m.team2] {
            if !indices.contains_key(team) {
                indices.insert(team.clone(), rows.len());
                rows.push(Standing::new(team.clone()));
            }
        }
    }

    for m in matches.iter().filter(|m| m.completed) {
        let team1_sets = m.sets.iter().filter(|s| s.team1 > s.team2).count() as u32;
        let team2_sets = m.sets.iter().filter(|s| s.team2 > s.team1).count() as u32;
        let team1_won = team1_sets > team2_sets;

        let (team1_points, team2_points) = if team1_won {
            (
                if team1_sets == 2 && team2_sets == 0 { 3 } else { 2 },
                if team1_sets == 2 && team2_sets == 1 { 1 } else { 0 },
            )
        } else {
            (
                if team2_sets == 2 && team1_sets == 1 { 1 } else { 0 },
                if team2_sets == 2 && team1_sets == 0 { 3 } else { 2 },
            )
        };

        let mut team1_games = 0;
        let mut team2_games = 0;
        for (index, set) in m.sets.iter().enumerate() {
            // The super tiebreak weighs into the game count like a 7-6 set,
            // not with its literal score.
            if index == 2 {
                if set.team1 > set.team2 {
                    team1_games += 7;
                    team2_games += 6;
                } else {
                    team1_games += 6;
                    team2_games += 7;
                }
            } else {
                team1_games += u32::from(set.team1);
                team2_games += u32::from(set.team2);
            }
        }

        rows[indices[&m.team1]].record(
            team1_won,
            team1_sets,
            team2_sets,
            team1_games,
            team2_games,
            team1_points,
        );
        rows[indices[&m.team2]].record(
            !team1_won,
            team2_sets,
            team1_sets,
            team2_games,
            team1_games,
            team2_points,
        );
    }

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.set_difference.cmp(&a.set_difference))
            .then(b.game_difference.cmp(&a.game_difference))
    });

    rows
}
