//! Event picker: weighted draw of an event that fits the current pool

use crate::core::config::GameOptions;
use crate::events::event::Event;
use crate::events::outcome::{Outcome, OutcomeProbabilities};
use crate::game::player::Player;
use crate::game::team::{team_index_of, Team};
use crate::simulation::constants::{
    MAX_CATEGORY_REDRAWS, MAX_COUNT_RESOLVE_ATTEMPTS, MAX_PICK_ATTEMPTS,
};
use crate::simulation::weighted::{pick_custom_weighted, weighted_user_rand};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, error};

/// Why a candidate event cannot be used right now
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    #[error("NUM_CONSTRAINT")]
    NumConstraint,
    #[error("TEAM_CONSTRAINT-TEAM_WEAPON_NO_OPPONENT")]
    TeamWeaponNoOpponent,
    #[error("TEAM_CONSTRAINT-TEAM_WEAPON_NO_TEAM")]
    TeamWeaponNoTeam,
    #[error("TEAM_CONSTRAINT-TEAM_WEAPON_TOO_LARGE")]
    TeamWeaponTooLarge,
    #[error("TEAM_CONSTRAINT-TEAM_NO_OPPONENT")]
    TeamNoOpponent,
    #[error("TEAM_CONSTRAINT-TEAM_TOO_LARGE")]
    TeamTooLarge,
    #[error("VICTOR_CONSTRAINT")]
    VictorConstraint,
}

/// A player about to use one of their weapons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponUse {
    /// Index of the wielder in the roster
    pub wielder: usize,
    pub weapon_id: String,
}

/// Everything the picker needs to know about the current pool
#[derive(Debug, Clone, Copy)]
pub struct PickContext<'a> {
    pub players: &'a [Player],
    /// Roster indices of the players still waiting for an event today
    pub user_pool: &'a [usize],
    pub options: &'a GameOptions,
    pub num_alive: u32,
    pub num_total: u32,
    pub weapon: Option<&'a WeaponUse>,
}

impl PickContext<'_> {
    fn pool_len(&self) -> u32 {
        self.user_pool.len() as u32
    }

    fn num_dead(&self) -> u32 {
        self.num_total.saturating_sub(self.num_alive)
    }
}

/// Recount how many members of each team are living and still in the pool.
/// Returns the number of teams with anyone in the pool.
pub fn refresh_team_pools(players: &[Player], user_pool: &[usize], teams: &mut [Team]) -> usize {
    let mut teams_in_pool = 0;
    for team in teams.iter_mut() {
        team.num_pool = user_pool
            .iter()
            .filter(|&&i| players[i].living && team.contains(&players[i].id))
            .count() as u32;
        if team.num_pool > 0 {
            teams_in_pool += 1;
        }
    }
    teams_in_pool
}

fn validate_team_constraint(
    num_victim: u32,
    num_attacker: u32,
    ctx: &PickContext<'_>,
    teams: &mut [Team],
    any_deaths: bool,
) -> Result<(), ConstraintViolation> {
    let teams_alive = teams.iter().filter(|t| t.is_alive()).count();
    if !ctx.options.collaborates(teams_alive) {
        return Ok(());
    }

    let teams_in_pool = refresh_team_pools(ctx.players, ctx.user_pool, teams);
    let pool = ctx.pool_len();

    if let Some(weapon) = ctx.weapon {
        if teams_in_pool < 2 && any_deaths {
            return Err(ConstraintViolation::TeamWeaponNoOpponent);
        }
        let wielder = &ctx.players[weapon.wielder];
        let Some(team) = team_index_of(teams, &wielder.id) else {
            error!("{} is not on any team", wielder.id);
            return Err(ConstraintViolation::TeamWeaponNoTeam);
        };
        let own = teams[team].num_pool;
        let others = pool.saturating_sub(own);
        let as_attackers = num_attacker <= own && num_victim <= others;
        let as_victims = ctx.options.use_enemy_weapon && num_victim <= own && num_attacker <= others;
        if as_attackers || as_victims {
            Ok(())
        } else {
            Err(ConstraintViolation::TeamWeaponTooLarge)
        }
    } else {
        if teams_in_pool < 2 && any_deaths {
            return Err(ConstraintViolation::TeamNoOpponent);
        }
        let largest = teams.iter().map(|t| t.num_pool).max().unwrap_or(0);
        let others = pool.saturating_sub(largest);
        let fits = (num_attacker <= largest && num_victim <= others)
            || (num_victim <= largest && num_attacker <= others);
        if fits {
            Ok(())
        } else {
            Err(ConstraintViolation::TeamTooLarge)
        }
    }
}

/// Check count, team and victor constraints for concrete role counts.
///
/// Counts for revived roles must be passed as 0: they come from the dead.
pub fn validate_event_requirements(
    num_victim: u32,
    num_attacker: u32,
    ctx: &PickContext<'_>,
    teams: &mut [Team],
    victims_die: bool,
    attackers_die: bool,
) -> Result<(), ConstraintViolation> {
    let total = num_victim + num_attacker;
    if total > ctx.pool_len() || total > ctx.num_alive {
        return Err(ConstraintViolation::NumConstraint);
    }

    validate_team_constraint(
        num_victim,
        num_attacker,
        ctx,
        teams,
        victims_die || attackers_die,
    )?;

    if !ctx.options.allow_no_victors {
        let mut remaining = ctx.num_alive as i64;
        if victims_die {
            remaining -= num_victim as i64;
        }
        if attackers_die {
            remaining -= num_attacker as i64;
        }
        if remaining < 1 {
            return Err(ConstraintViolation::VictorConstraint);
        }
    }
    Ok(())
}

/// Draw an index from `pool` using outcome-category weights.
///
/// A category is drawn first and the pool filtered to it; empty categories
/// are re-drawn a bounded number of times before falling back to a uniform
/// draw over the whole pool. Within a category, custom events are weighted
/// by `custom_weight`.
pub fn probability_event<R: Rng + ?Sized>(
    pool: &[Event],
    probabilities: &OutcomeProbabilities,
    custom_weight: f64,
    rng: &mut R,
) -> Option<usize> {
    if pool.is_empty() {
        return None;
    }
    let total = probabilities.total();
    for _ in 0..=MAX_CATEGORY_REDRAWS {
        let category = probabilities.category_for(rng.gen::<f64>() * total);
        let matching: Vec<usize> = (0..pool.len())
            .filter(|&i| pool[i].matches_category(category))
            .collect();
        if matching.is_empty() {
            continue;
        }
        let flags: Vec<bool> = matching.iter().map(|&i| pool[i].custom).collect();
        return pick_custom_weighted(&flags, custom_weight, rng).map(|k| matching[k]);
    }
    Some(rng.gen_range(0..pool.len()))
}

fn consumable_ok(event: &Event, num_victim: u32, num_attacker: u32, ctx: &PickContext<'_>) -> bool {
    match (ctx.weapon, event.consumes) {
        (Some(weapon), Some(consumes)) => {
            let held = ctx.players[weapon.wielder].weapon_count(&weapon.weapon_id);
            consumes.resolve(num_victim, num_attacker) <= held
        }
        _ => true,
    }
}

/// Draw concrete counts for "at least" roles; `None` when no feasible draw
/// is found within the attempt cap.
fn resolve_counts<R: Rng + ?Sized>(event: &Event, ctx: &PickContext<'_>, rng: &mut R) -> Option<(u32, u32)> {
    let victim_revived = event.victim.is_revived();
    let attacker_revived = event.attacker.is_revived();
    let pool = ctx.pool_len();
    let dead = ctx.num_dead();

    for _ in 0..MAX_COUNT_RESOLVE_ATTEMPTS {
        let num_victim = if event.victim.is_at_least() {
            weighted_user_rand(rng) + event.victim.min_count() - 1
        } else {
            event.victim.min_count()
        };
        let num_attacker = if event.attacker.is_at_least() {
            weighted_user_rand(rng) + event.attacker.min_count() - 1
        } else {
            event.attacker.min_count()
        };
        let fits = match (victim_revived, attacker_revived) {
            (true, true) => num_victim + num_attacker <= dead,
            (true, false) => num_victim <= dead && num_attacker <= pool,
            (false, true) => num_attacker <= dead && num_victim <= pool,
            (false, false) => num_victim + num_attacker <= pool,
        };
        if fits && consumable_ok(event, num_victim, num_attacker, ctx) {
            return Some((num_victim, num_attacker));
        }
    }
    None
}

/// Pick an event from `event_pool` that can be played by the current pool.
///
/// Returns a fresh copy with concrete role counts, or `None` once the
/// attempt cap is exhausted.
pub fn pick_event<R: Rng + ?Sized>(
    ctx: &PickContext<'_>,
    teams: &mut [Team],
    event_pool: &[Event],
    probabilities: &OutcomeProbabilities,
    rng: &mut R,
) -> Option<Event> {
    let pool: Vec<Event> = event_pool
        .iter()
        .filter(|e| e.is_well_formed())
        .cloned()
        .collect();

    for _ in 0..MAX_PICK_ATTEMPTS {
        let index = probability_event(&pool, probabilities, ctx.options.custom_event_weight, rng)?;
        let event = &pool[index];

        if event.min_effected() > ctx.pool_len() || event.min_revived() > ctx.num_dead() {
            debug!(
                "Event too large for pool of {} ({} dead): {:?}",
                ctx.pool_len(),
                ctx.num_dead(),
                event.id
            );
            continue;
        }

        let (num_victim, num_attacker) = if event.has_at_least() {
            match resolve_counts(event, ctx, rng) {
                Some(counts) => counts,
                None => continue,
            }
        } else {
            let counts = (event.victim.min_count(), event.attacker.min_count());
            if !consumable_ok(event, counts.0, counts.1, ctx) {
                continue;
            }
            counts
        };

        let victim_revived = event.victim.is_revived();
        let attacker_revived = event.attacker.is_revived();
        if let Err(reason) = validate_event_requirements(
            if victim_revived { 0 } else { num_victim },
            if attacker_revived { 0 } else { num_attacker },
            ctx,
            teams,
            event.victim.outcome == Outcome::Dies,
            event.attacker.outcome == Outcome::Dies,
        ) {
            debug!("Event {:?} rejected: {}", event.id, reason);
            continue;
        }

        return Some(event.with_counts(num_victim, num_attacker));
    }

    error!(
        "Failed to find suitable event for {} players, from {} events with {} alive",
        ctx.pool_len(),
        pool.len(),
        ctx.num_alive
    );
    None
}
