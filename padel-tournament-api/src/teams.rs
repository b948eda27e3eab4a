use serde::{Deserialize, Serialize};

use crate::id::{PlayerId, TeamId};

/// A single player. Players are owned by their [`Team`] and are created
/// and deleted as part of team edits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// A registered team and its roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: Vec<Player>,
}
