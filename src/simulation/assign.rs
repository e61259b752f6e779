//! Participant assignment: fill an event's roles from the day's pools

use crate::core::config::GameOptions;
use crate::events::outcome::Outcome;
use crate::game::player::Player;
use crate::game::team::{team_index_of, Team};
use crate::simulation::picker::refresh_team_pools;
use rand::Rng;
use tracing::{error, warn};

/// Counts and outcomes of the roles being filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCounts {
    pub num_victim: u32,
    pub num_attacker: u32,
    pub victim_outcome: Outcome,
    pub attacker_outcome: Outcome,
}

impl RoleCounts {
    pub fn new(num_victim: u32, num_attacker: u32, victim_outcome: Outcome, attacker_outcome: Outcome) -> Self {
        Self {
            num_victim,
            num_attacker,
            victim_outcome,
            attacker_outcome,
        }
    }
}

fn take_random<R: Rng + ?Sized>(pool: &mut Vec<usize>, skip: Option<usize>, rng: &mut R) -> Option<usize> {
    let candidates: Vec<usize> = (0..pool.len()).filter(|&i| Some(pool[i]) != skip).collect();
    if candidates.is_empty() {
        return None;
    }
    let k = candidates[rng.gen_range(0..candidates.len())];
    Some(pool.remove(k))
}

/// Take the first pool entry that is (or is not) on `team`. Pools are
/// shuffled at the start of the day, so "first" is random.
fn take_matching(
    pool: &mut Vec<usize>,
    players: &[Player],
    teams: &[Team],
    team: usize,
    member: bool,
    skip: Option<usize>,
) -> Option<usize> {
    let position = pool.iter().position(|&p| {
        Some(p) != skip && (team_index_of(teams, &players[p].id) == Some(team)) == member
    });
    match position {
        Some(k) => Some(pool.remove(k)),
        None => {
            error!(
                "No {} of team {} left in pool of {}",
                if member { "member" } else { "opponent" },
                team,
                pool.len()
            );
            None
        }
    }
}

/// Choose the team that fills one side of the event, and whether that side
/// is the attackers.
fn choose_team<R: Rng + ?Sized>(
    counts: &RoleCounts,
    options: &GameOptions,
    players: &[Player],
    user_pool: &[usize],
    dead_pool: &[usize],
    teams: &[Team],
    wielder: Option<usize>,
    rng: &mut R,
) -> Option<(usize, bool)> {
    let nv = counts.num_victim;
    let na = counts.num_attacker;
    let victim_revived = counts.victim_outcome == Outcome::Revived;
    let attacker_revived = counts.attacker_outcome == Outcome::Revived;
    let pool = user_pool.len() as u32;
    let dead = dead_pool.len() as u32;

    if let Some(w) = wielder {
        let team = team_index_of(teams, &players[w].id)?;
        let own = teams[team].num_pool;
        let others = pool.saturating_sub(own);
        let live_victims = if victim_revived { 0 } else { nv };
        let live_attackers = if attacker_revived { 0 } else { na };
        let attacker_side_fits = live_attackers <= own && live_victims <= others;
        let victim_side_fits =
            options.use_enemy_weapon && live_victims <= own && live_attackers <= others;
        return match (attacker_side_fits, victim_side_fits) {
            (true, true) => Some((team, !rng.gen_bool(0.5))),
            (true, false) => Some((team, true)),
            (false, true) => Some((team, false)),
            (false, false) => None,
        };
    }

    for (i, team) in teams.iter().enumerate() {
        let team_dead = (team.players.len() as u32).saturating_sub(team.num_alive);
        let others_dead = dead.saturating_sub(team_dead);
        let others_pool = pool.saturating_sub(team.num_pool);

        let attack_fits = if attacker_revived {
            na <= team_dead
        } else {
            na <= team.num_pool
        };
        let other_victims_fit = nv <= if victim_revived { others_dead } else { others_pool };
        let can_attack = attack_fits && other_victims_fit;

        let victim_fits = if victim_revived {
            nv <= team_dead
        } else {
            nv <= team.num_pool
        };
        let other_attackers_fit = na <= if attacker_revived { others_dead } else { others_pool };
        let can_be_victim = victim_fits && other_attackers_fit;

        match (can_attack, can_be_victim) {
            (true, true) => return Some((i, rng.gen_bool(0.5))),
            (true, false) => return Some((i, true)),
            (false, true) => return Some((i, false)),
            (false, false) => {}
        }
    }
    None
}

/// Pick the players filling an event's roles.
///
/// Returns roster indices, victims first then attackers. Chosen players are
/// removed from `user_pool` (living, undecided) or `dead_pool` (for revived
/// roles). When teammates collaborate each side is drawn from one team and
/// its opponents; otherwise players are drawn uniformly and a weapon
/// wielder takes the final slot.
#[allow(clippy::too_many_arguments)]
pub fn pick_affected_players<R: Rng + ?Sized>(
    counts: &RoleCounts,
    options: &GameOptions,
    players: &[Player],
    user_pool: &mut Vec<usize>,
    dead_pool: &mut Vec<usize>,
    teams: &mut [Team],
    wielder: Option<usize>,
    rng: &mut R,
) -> Vec<usize> {
    let teams_alive = teams.iter().filter(|t| t.is_alive()).count();
    if options.collaborates(teams_alive) {
        refresh_team_pools(players, user_pool, teams);
        match choose_team(counts, options, players, user_pool, dead_pool, teams, wielder, rng) {
            Some((team, is_attacker)) => {
                return pick_collaborating(
                    counts, players, user_pool, dead_pool, teams, team, is_attacker, wielder,
                );
            }
            None => warn!("No team fits {:?}; assigning without teams", counts),
        }
    }

    let total = (counts.num_victim + counts.num_attacker) as usize;
    let random_slots = if wielder.is_some() { total.saturating_sub(1) } else { total };
    let mut affected = Vec::with_capacity(total);
    for i in 0..random_slots {
        let is_victim = i < counts.num_victim as usize;
        let revived = if is_victim {
            counts.victim_outcome == Outcome::Revived
        } else {
            counts.attacker_outcome == Outcome::Revived
        };
        let picked = if revived {
            take_random(dead_pool, None, rng)
        } else {
            take_random(user_pool, wielder, rng)
        };
        match picked {
            Some(p) => affected.push(p),
            None => error!("Pool exhausted while assigning slot {} of {}", i, total),
        }
    }
    if let Some(w) = wielder {
        if let Some(k) = user_pool.iter().position(|&p| p == w) {
            affected.push(user_pool.remove(k));
        } else {
            error!("Weapon wielder {} is not in the pool", players[w].id);
        }
    }
    affected
}

#[allow(clippy::too_many_arguments)]
fn pick_collaborating(
    counts: &RoleCounts,
    players: &[Player],
    user_pool: &mut Vec<usize>,
    dead_pool: &mut Vec<usize>,
    teams: &[Team],
    team: usize,
    is_attacker: bool,
    wielder: Option<usize>,
) -> Vec<usize> {
    let fill = |n: u32, revived: bool, on_team: bool, pin: Option<usize>, user_pool: &mut Vec<usize>, dead_pool: &mut Vec<usize>| {
        let mut side = Vec::with_capacity(n as usize);
        let slots = if pin.is_some() { n.saturating_sub(1) } else { n };
        for _ in 0..slots {
            let pool = if revived { &mut *dead_pool } else { &mut *user_pool };
            match take_matching(pool, players, teams, team, on_team, wielder) {
                Some(p) => side.push(p),
                None => error!("Pool exhausted while assigning team roles"),
            }
        }
        if let Some(w) = pin {
            if let Some(k) = user_pool.iter().position(|&p| p == w) {
                side.push(user_pool.remove(k));
            }
        }
        side
    };

    let victim_revived = counts.victim_outcome == Outcome::Revived;
    let attacker_revived = counts.attacker_outcome == Outcome::Revived;
    let victim_pin = wielder.filter(|_| !is_attacker && counts.num_victim > 0 && !victim_revived);
    let attacker_pin = wielder.filter(|_| is_attacker && counts.num_attacker > 0 && !attacker_revived);

    let mut affected = fill(
        counts.num_victim,
        victim_revived,
        !is_attacker,
        victim_pin,
        user_pool,
        dead_pool,
    );
    affected.extend(fill(
        counts.num_attacker,
        attacker_revived,
        is_attacker,
        attacker_pin,
        user_pool,
        dead_pool,
    ));
    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PlayerId, TeamId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster(n: usize) -> Vec<Player> {
        (0..n).map(|i| Player::new(i.to_string(), &format!("P{i}"))).collect()
    }

    #[test]
    fn test_uniform_assignment_removes_from_pool() {
        let players = roster(5);
        let mut pool: Vec<usize> = (0..5).collect();
        let mut dead = Vec::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let counts = RoleCounts::new(2, 1, Outcome::Dies, Outcome::Nothing);
        let affected = pick_affected_players(
            &counts,
            &GameOptions::default(),
            &players,
            &mut pool,
            &mut dead,
            &mut [],
            None,
            &mut rng,
        );
        assert_eq!(affected.len(), 3);
        assert_eq!(pool.len(), 2);
        for p in &affected {
            assert!(!pool.contains(p));
        }
    }

    #[test]
    fn test_wielder_takes_last_slot() {
        let players = roster(4);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..20 {
            let mut pool: Vec<usize> = vec![2, 0, 3, 1];
            let counts = RoleCounts::new(2, 1, Outcome::Wounded, Outcome::Nothing);
            let affected = pick_affected_players(
                &counts,
                &GameOptions::default(),
                &players,
                &mut pool,
                &mut Vec::new(),
                &mut [],
                Some(3),
                &mut rng,
            );
            assert_eq!(affected.len(), 3);
            assert_eq!(*affected.last().unwrap(), 3);
            assert_eq!(affected.iter().filter(|&&p| p == 3).count(), 1);
        }
    }

    #[test]
    fn test_revived_roles_come_from_dead_pool() {
        let mut players = roster(3);
        players[2].living = false;
        let mut pool = vec![0, 1];
        let mut dead = vec![2];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let counts = RoleCounts::new(1, 1, Outcome::Revived, Outcome::Nothing);
        let affected = pick_affected_players(
            &counts,
            &GameOptions::default(),
            &players,
            &mut pool,
            &mut dead,
            &mut [],
            None,
            &mut rng,
        );
        assert_eq!(affected[0], 2);
        assert!(dead.is_empty());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_collaborating_sides_are_single_teams() {
        let players = roster(4);
        let options = GameOptions {
            team_size: 2,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..50 {
            let mut teams = vec![
                Team::new(TeamId(0), "Red", vec![PlayerId::new("0"), PlayerId::new("1")]),
                Team::new(TeamId(1), "Blue", vec![PlayerId::new("2"), PlayerId::new("3")]),
            ];
            let mut pool = vec![0, 2, 1, 3];
            let counts = RoleCounts::new(2, 2, Outcome::Dies, Outcome::Nothing);
            let affected = pick_affected_players(
                &counts,
                &options,
                &players,
                &mut pool,
                &mut Vec::new(),
                &mut teams,
                None,
                &mut rng,
            );
            let team_of = |i: usize| team_index_of(&teams, &players[i].id).unwrap();
            assert_eq!(team_of(affected[0]), team_of(affected[1]));
            assert_eq!(team_of(affected[2]), team_of(affected[3]));
            assert_ne!(team_of(affected[0]), team_of(affected[2]));
        }
    }

    #[test]
    fn test_enemy_weapon_puts_wielder_team_on_victim_side() {
        let players = roster(4);
        let options = GameOptions {
            team_size: 3,
            use_enemy_weapon: true,
            ..Default::default()
        };
        for seed in 0..40 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut teams = vec![
                Team::new(
                    TeamId(0),
                    "Red",
                    vec![PlayerId::new("0"), PlayerId::new("1"), PlayerId::new("2")],
                ),
                Team::new(TeamId(1), "Blue", vec![PlayerId::new("3")]),
            ];
            let mut pool = vec![1, 3, 0, 2];
            let counts = RoleCounts::new(2, 1, Outcome::Dies, Outcome::Nothing);
            let affected = pick_affected_players(
                &counts,
                &options,
                &players,
                &mut pool,
                &mut Vec::new(),
                &mut teams,
                Some(0),
                &mut rng,
            );
            assert_eq!(affected.len(), 3, "seed {seed}: {affected:?}");
            assert_eq!(affected[1], 0);
            assert_eq!(affected[2], 3);
            assert_eq!(affected.iter().filter(|&&p| p == 0).count(), 1);
        }
    }

    #[test]
    fn test_wielder_without_enemy_weapon_attacks() {
        let players = roster(4);
        let options = GameOptions {
            team_size: 2,
            ..Default::default()
        };
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut teams = vec![
                Team::new(TeamId(0), "Red", vec![PlayerId::new("0"), PlayerId::new("1")]),
                Team::new(TeamId(1), "Blue", vec![PlayerId::new("2"), PlayerId::new("3")]),
            ];
            let mut pool = vec![0, 1, 2, 3];
            let counts = RoleCounts::new(1, 2, Outcome::Dies, Outcome::Nothing);
            let affected = pick_affected_players(
                &counts,
                &options,
                &players,
                &mut pool,
                &mut Vec::new(),
                &mut teams,
                Some(0),
                &mut rng,
            );
            assert_eq!(affected.len(), 3);
            assert_eq!(affected[2], 0);
            let team_of = |i: usize| team_index_of(&teams, &players[i].id).unwrap();
            assert_eq!(team_of(affected[1]), 0);
            assert_eq!(team_of(affected[0]), 1);
        }
    }

    #[test]
    fn test_opponent_shortage_never_crosses_teams() {
        let players = roster(3);
        let teams = vec![
            Team::new(TeamId(0), "Red", vec![PlayerId::new("0"), PlayerId::new("1")]),
            Team::new(TeamId(1), "Blue", vec![PlayerId::new("2")]),
        ];
        let mut pool = vec![0, 1];
        assert_eq!(take_matching(&mut pool, &players, &teams, 0, false, None), None);
        assert_eq!(pool, vec![0, 1]);
        assert_eq!(take_matching(&mut pool, &players, &teams, 0, true, Some(0)), Some(1));
    }
}
