//! Outcome application: state transitions for one participant

use crate::core::config::GameOptions;
use crate::events::event::WeaponGrant;
use crate::events::outcome::Outcome;
use crate::game::player::PlayerState;
use crate::game::state::Game;
use crate::game::team::team_index_of;
use tracing::error;

/// Credit kills and adjust weapons; shared by every outcome.
fn effect_player(game: &mut Game, player: usize, kills: u32, weapon: Option<&WeaponGrant>) {
    let p = &mut game.included_users[player];
    if let Some(w) = weapon {
        p.adjust_weapon(&w.id, w.count as i64);
    }
    p.kills += kills;
}

fn kill_player(game: &mut Game, options: &GameOptions, player: usize) {
    let day_num = game.day.num;
    let was_alive = game.included_users[player].living;
    {
        let p = &mut game.included_users[player];
        p.living = false;
        p.bleeding = 0;
        p.state = PlayerState::Dead;
        p.weapons.clear();
    }
    if !was_alive {
        return;
    }

    game.included_users[player].rank = game.num_alive;
    game.included_users[player].day_of_death = Some(day_num);
    game.num_alive = game.num_alive.saturating_sub(1);

    if options.team_size > 0 {
        let id = game.included_users[player].id.clone();
        match team_index_of(&game.teams, &id) {
            None => error!("Failed to find team for player {}", id),
            Some(t) => {
                game.teams[t].num_alive = game.teams[t].num_alive.saturating_sub(1);
                if game.teams[t].num_alive == 0 {
                    let teams_left = game.teams_alive() as u32;
                    game.teams[t].rank = teams_left + 1;
                }
            }
        }
    }
}

fn revive_player(game: &mut Game, options: &GameOptions, player: usize) {
    if game.included_users[player].living {
        return;
    }
    let old_rank = game.included_users[player].rank;
    game.num_alive += 1;
    for (i, other) in game.included_users.iter_mut().enumerate() {
        if i != player && !other.living && other.rank < old_rank {
            other.rank += 1;
        }
    }

    if options.team_size > 0 {
        let id = game.included_users[player].id.clone();
        match team_index_of(&game.teams, &id) {
            None => error!("Failed to find team for player {}", id),
            Some(t) => {
                let team_rank = game.teams[t].rank;
                let was_eliminated = !game.teams[t].is_alive();
                game.teams[t].num_alive += 1;
                if was_eliminated {
                    for (i, other) in game.teams.iter_mut().enumerate() {
                        if i != t && !other.is_alive() && other.rank < team_rank {
                            other.rank += 1;
                        }
                    }
                }
                game.teams[t].rank = 1;
            }
        }
    }

    let p = &mut game.included_users[player];
    p.state = PlayerState::Zombie;
    p.living = true;
    p.bleeding = 0;
    p.rank = 1;
    p.day_of_death = None;
}

/// Apply an outcome to the player at roster index `player`.
///
/// Kill credit and weapon changes are applied first for every outcome.
/// Returns `false` for [`Outcome::Nothing`], which changes nothing else.
/// Applying `Dies` to a dead player, or `Revived` to a living one, leaves
/// the alive counters untouched.
pub fn apply_outcome(
    game: &mut Game,
    options: &GameOptions,
    player: usize,
    kill_credit: u32,
    weapon: Option<&WeaponGrant>,
    outcome: Outcome,
) -> bool {
    effect_player(game, player, kill_credit, weapon);
    match outcome {
        Outcome::Nothing => return false,
        Outcome::Dies => kill_player(game, options, player),
        Outcome::Wounded => {
            game.included_users[player].state = PlayerState::Wounded;
        }
        Outcome::Thrives => {
            let p = &mut game.included_users[player];
            p.state = PlayerState::Normal;
            p.bleeding = 0;
        }
        Outcome::Revived => revive_player(game, options, player),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PlayerId, TeamId};
    use crate::game::player::Player;
    use crate::game::team::Team;

    fn game(n: usize) -> Game {
        let players = (0..n).map(|i| Player::new(i.to_string(), &format!("P{i}"))).collect();
        let mut game = Game::new("Test", players, vec![]);
        game.day.num = 3;
        game
    }

    #[test]
    fn test_dies_is_idempotent() {
        let mut g = game(4);
        let options = GameOptions::default();
        assert!(apply_outcome(&mut g, &options, 0, 0, None, Outcome::Dies));
        assert_eq!(g.num_alive, 3);
        assert_eq!(g.included_users[0].rank, 4);
        assert_eq!(g.included_users[0].day_of_death, Some(3));

        apply_outcome(&mut g, &options, 0, 0, None, Outcome::Dies);
        assert_eq!(g.num_alive, 3);
        assert_eq!(g.included_users[0].rank, 4);
    }

    #[test]
    fn test_revive_shifts_better_ranked_dead() {
        let mut g = game(4);
        let options = GameOptions::default();
        apply_outcome(&mut g, &options, 0, 0, None, Outcome::Dies); // rank 4
        apply_outcome(&mut g, &options, 1, 0, None, Outcome::Dies); // rank 3
        apply_outcome(&mut g, &options, 2, 0, None, Outcome::Dies); // rank 2
        assert_eq!(g.num_alive, 1);

        assert!(apply_outcome(&mut g, &options, 0, 0, None, Outcome::Revived));
        assert_eq!(g.num_alive, 2);
        let p = &g.included_users[0];
        assert!(p.living);
        assert_eq!(p.state, PlayerState::Zombie);
        assert_eq!(p.rank, 1);
        assert_eq!(g.included_users[1].rank, 4);
        assert_eq!(g.included_users[2].rank, 3);
    }

    #[test]
    fn test_weapon_changes_and_kill_credit() {
        let mut g = game(2);
        let options = GameOptions::default();
        let grant = WeaponGrant {
            id: "sword".into(),
            count: 2,
        };
        assert!(!apply_outcome(&mut g, &options, 0, 1, Some(&grant), Outcome::Nothing));
        assert_eq!(g.included_users[0].weapon_count("sword"), 2);
        assert_eq!(g.included_users[0].kills, 1);

        let take = WeaponGrant {
            id: "sword".into(),
            count: -3,
        };
        apply_outcome(&mut g, &options, 0, 0, Some(&take), Outcome::Wounded);
        assert!(g.included_users[0].weapons.is_empty());
        assert_eq!(g.included_users[0].state, PlayerState::Wounded);

        apply_outcome(&mut g, &options, 0, 0, None, Outcome::Thrives);
        assert_eq!(g.included_users[0].state, PlayerState::Normal);
    }

    #[test]
    fn test_team_elimination_and_return() {
        let players = (0..4).map(|i| Player::new(i.to_string(), &format!("P{i}"))).collect();
        let teams = vec![
            Team::new(TeamId(0), "Red", vec![PlayerId::new("0"), PlayerId::new("1")]),
            Team::new(TeamId(1), "Blue", vec![PlayerId::new("2"), PlayerId::new("3")]),
        ];
        let mut g = Game::new("Test", players, teams);
        let options = GameOptions {
            team_size: 2,
            ..Default::default()
        };
        apply_outcome(&mut g, &options, 0, 0, None, Outcome::Dies);
        apply_outcome(&mut g, &options, 1, 0, None, Outcome::Dies);
        assert_eq!(g.teams[0].num_alive, 0);
        assert_eq!(g.teams[0].rank, 2);

        apply_outcome(&mut g, &options, 1, 0, None, Outcome::Revived);
        assert_eq!(g.teams[0].num_alive, 1);
        assert_eq!(g.teams[0].rank, 1);
    }
}
