//! Roster construction: guild members and NPCs into players and teams

use crate::core::config::GameOptions;
use crate::core::types::{PlayerId, TeamId};
use crate::game::player::Player;
use crate::game::state::Game;
use crate::game::team::Team;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Work done between cooperative yields while scanning members
pub const ROSTER_YIELD_BUDGET: Duration = Duration::from_millis(5);

/// A guild member as reported by the chat platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub bot: bool,
}

/// Who may take part in a guild's games
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RosterFilter {
    pub included: BTreeSet<String>,
    pub excluded: BTreeSet<String>,
    /// Members on neither list are excluded instead of included
    pub exclude_by_default: bool,
    pub include_bots: bool,
}

impl RosterFilter {
    fn admits(&self, member: &Member) -> bool {
        if member.bot && !self.include_bots {
            return false;
        }
        let included = self.included.contains(&member.id);
        let excluded = self.excluded.contains(&member.id);
        if included && excluded {
            error!("Member {} is both included and excluded", member.id);
            return !self.exclude_by_default;
        }
        match (included, excluded) {
            (true, _) => true,
            (_, true) => false,
            _ => !self.exclude_by_default,
        }
    }
}

/// Build the roster from guild members followed by NPCs.
///
/// Membership lists can be large, so the scan yields to the runtime every
/// [`ROSTER_YIELD_BUDGET`]. When the filter admits nobody, every member is
/// included.
pub async fn build_roster(members: &[Member], npcs: &[Player], filter: &RosterFilter) -> Vec<Player> {
    let mut players = Vec::with_capacity(members.len() + npcs.len());
    let mut slice_start = Instant::now();
    for member in members {
        if filter.admits(member) {
            players.push(player_from(member));
        }
        if slice_start.elapsed() >= ROSTER_YIELD_BUDGET {
            tokio::task::yield_now().await;
            slice_start = Instant::now();
        }
    }
    if players.is_empty() {
        players.extend(members.iter().map(player_from));
    }
    players.extend(npcs.iter().cloned());
    debug!("Built roster of {} players from {} members", players.len(), members.len());
    players
}

fn player_from(member: &Member) -> Player {
    let mut player = Player::new(member.id.clone(), &member.username);
    player.avatar_url = member.avatar_url.clone();
    if let Some(nickname) = &member.nickname {
        player = player.with_nickname(nickname);
    }
    player
}

/// Place players into teams of `team_size`.
///
/// Existing teams keep their members that are still on the roster; empty
/// teams are dropped and ids renumbered. Players without a team fill the
/// first team with room, and new teams are added once every team is full.
/// Every team's counters are reset. A `team_size` of 0 disables teams.
pub fn form_teams(players: &[Player], team_size: u32, existing: Vec<Team>) -> Vec<Team> {
    if team_size == 0 {
        return Vec::new();
    }
    let size = team_size as usize;
    let on_roster: BTreeSet<&PlayerId> = players.iter().map(|p| &p.id).collect();

    let mut teams: Vec<Team> = if existing.is_empty() {
        players
            .chunks(size)
            .enumerate()
            .map(|(i, chunk)| {
                Team::new(
                    TeamId(i as u32),
                    &format!("Team {}", i + 1),
                    chunk.iter().map(|p| p.id.clone()).collect(),
                )
            })
            .collect()
    } else {
        let mut teams = existing;
        teams.sort_by_key(|t| t.id);
        for team in teams.iter_mut() {
            team.players.retain(|p| on_roster.contains(p));
        }
        teams.retain(|t| !t.players.is_empty());
        for (i, team) in teams.iter_mut().enumerate() {
            team.id = TeamId(i as u32);
        }

        let placed: BTreeSet<PlayerId> = teams.iter().flat_map(|t| t.players.iter().cloned()).collect();
        for player in players.iter().filter(|p| !placed.contains(&p.id)) {
            match teams.iter_mut().find(|t| t.players.len() < size) {
                Some(team) => team.players.push(player.id.clone()),
                None => {
                    let id = teams.len();
                    teams.push(Team::new(
                        TeamId(id as u32),
                        &format!("Team {}", id + 1),
                        vec![player.id.clone()],
                    ));
                }
            }
        }
        teams
    };

    for team in teams.iter_mut() {
        team.num_alive = team.players.len() as u32;
        team.rank = 1;
        team.num_pool = 0;
    }
    teams
}

/// Create a fresh game for a guild from its members and NPCs.
pub async fn create_game(
    name: &str,
    members: &[Member],
    npcs: &[Player],
    filter: &RosterFilter,
    options: &GameOptions,
) -> Game {
    let players = build_roster(members, npcs, filter).await;
    let teams = form_teams(&players, options.team_size, Vec::new());
    Game::new(name, players, teams)
}
