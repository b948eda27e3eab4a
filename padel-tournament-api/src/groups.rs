use serde::{Deserialize, Serialize};

use crate::id::{GroupId, TeamId};

/// A group ("girone") of the round-robin phase.
///
/// `teams` holds weak references; the group does not own the teams and
/// their order carries no meaning. By convention a team sits in at most one
/// group at a time, but nothing in the record enforces it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub teams: Vec<TeamId>,
}
