//! Round-robin calendar generation using the circle method.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A generated fixture between two teams.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pairing<T> {
    pub team1: T,
    pub team2: T,
}

/// Generates the full round-robin fixture list for `teams`, partitioned
/// into matchdays ("giornate").
///
/// The number of matchdays is counted on the real team count: `n - 1` for
/// even `n`, `n` for odd `n` (one team idle per matchday). An odd list is
/// padded internally with a bye slot that never reaches the output.
///
/// # Errors
///
/// Returns [`Error::InsufficientTeams`] for fewer than 2 teams.
pub fn round_robin<T>(teams: &[T]) -> Result<Vec<Vec<Pairing<T>>>>
where
    T: Clone,
{
    if teams.len() < 2 {
        return Err(Error::InsufficientTeams { found: teams.len() });
    }

    let rounds = if teams.len() % 2 == 0 {
        teams.len() - 1
    } else {
        teams.len()
    };

    let mut circle: Vec<Option<usize>> = (0..teams.len()).map(Some).collect();
    if circle.len() % 2 != 0 {
        circle.push(None);
    }

    log::debug!("Scheduling {} matchdays for {} teams", rounds, teams.len());

    let mut matchdays = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let mut pairings = Vec::with_capacity(circle.len() / 2);

        for index in 0..circle.len() / 2 {
            let first = circle[index];
            let second = circle[circle.len() - 1 - index];

            // A bye pairing leaves that team idle for the matchday.
            if let (Some(team1), Some(team2)) = (first, second) {
                pairings.push(Pairing {
                    team1: teams[team1].clone(),
                    team2: teams[team2].clone(),
                });
            }
        }

        matchdays.push(pairings);

        // Rotate with the first slot pinned: the last entry moves to
        // position 1.
        if let Some(last) = circle.pop() {
            circle.insert(1, last);
        }
    }

    Ok(matchdays)
}
