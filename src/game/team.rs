use crate::core::types::{PlayerId, TeamId};
use serde::{Deserialize, Serialize};

pub const MAX_TEAM_NAME_LEN: usize = 101;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: Vec<PlayerId>,
    pub rank: u32,
    pub num_alive: u32,
    /// Members still in the undecided pool; recomputed on every pick
    #[serde(skip)]
    pub num_pool: u32,
}

impl Team {
    pub fn new(id: TeamId, name: &str, players: Vec<PlayerId>) -> Self {
        let name: String = name.chars().take(MAX_TEAM_NAME_LEN).collect();
        Self {
            id,
            name,
            num_alive: players.len() as u32,
            players,
            rank: 1,
            num_pool: 0,
        }
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.players.iter().any(|p| p == player)
    }

    pub fn is_alive(&self) -> bool {
        self.num_alive > 0
    }
}

/// Index of the team a player belongs to
pub fn team_index_of(teams: &[Team], player: &PlayerId) -> Option<usize> {
    teams.iter().position(|t| t.contains(player))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_truncated() {
        let long = "x".repeat(200);
        let team = Team::new(TeamId(0), &long, vec![PlayerId::new("a")]);
        assert_eq!(team.name.len(), MAX_TEAM_NAME_LEN);
        assert_eq!(team.num_alive, 1);
    }
}
