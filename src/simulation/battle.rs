//! Battle sub-simulation: round-by-round fight that ends an event in deaths

use crate::core::config::GameOptions;
use crate::events::battle::BattleCatalog;
use crate::events::outcome::Outcome;
use crate::game::final_event::{FinalEvent, Icon};
use crate::game::player::Player;
use crate::simulation::constants::{
    BATTLE_BANNER, FIST_BOTH_ICON, FIST_LEFT_ICON, FIST_RIGHT_ICON, MAX_BATTLE_ROUNDS,
};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("Battle did not finish within {0} rounds")]
    LoopLimit(usize),

    #[error("Battle catalog has no {0}")]
    EmptyCatalog(&'static str),

    #[error("Battle needs at least one victim and one attacker (got {0} and {1})")]
    NotEnoughFighters(usize, usize),
}

/// Last round drawn, used to annotate repeats as "x2", "x3", ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Round {
    attack: usize,
    attacker: usize,
    victim: usize,
    flipped: bool,
}

fn health_line(fighters: &[&Player], damage: &[u32], max_health: u32, use_nicknames: bool, strike_dead: bool) -> String {
    let mut entries: Vec<(&str, String)> = fighters
        .iter()
        .zip(damage)
        .map(|(p, taken)| {
            let health = max_health.saturating_sub(*taken);
            let wrap = if strike_dead && health == 0 { "~~" } else { "" };
            (
                p.id.as_str(),
                format!("{wrap}`{}`: {}HP{wrap}", p.display_name(use_nicknames), health),
            )
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, s)| s).collect::<Vec<_>>().join(", ")
}

/// Run a battle between the first `num_victim` fighters (victims) and the
/// rest (attackers).
///
/// Damage accumulates from 0 up to `battleHealth`; a victim reaching it is
/// down. Attacks that would down an attacker are re-drawn. The battle ends
/// once every victim is down. The result is one composite event: victims
/// die, attackers survive with kill credit, and `attacks` holds the opening
/// line followed by every round.
pub fn finalize_battle<R: Rng + ?Sized>(
    fighters: &[&Player],
    num_victim: usize,
    options: &GameOptions,
    roster: &[Player],
    battles: &BattleCatalog,
    rng: &mut R,
) -> Result<FinalEvent, BattleError> {
    let num_attacker = fighters.len().saturating_sub(num_victim);
    if num_victim == 0 || num_attacker == 0 {
        return Err(BattleError::NotEnoughFighters(num_victim, num_attacker));
    }
    let outcome_line = battles.outcomes.choose(rng).ok_or(BattleError::EmptyCatalog("outcomes"))?;
    let start_line = battles.starts.choose(rng).ok_or(BattleError::EmptyCatalog("starts"))?;
    if battles.attacks.is_empty() {
        return Err(BattleError::EmptyCatalog("attacks"));
    }

    let mut battle = FinalEvent::finalize(
        outcome_line,
        fighters,
        num_victim,
        Outcome::Dies,
        Outcome::Nothing,
        options,
        roster,
        rng,
    );
    battle.attacker_killer = true;
    battle.battle = true;

    let max_health = options.battle_health;
    let mut damage = vec![0u32; fighters.len()];
    let mut victims_standing = num_victim;
    let mut duplicates = 0;
    let mut last: Option<Round> = None;

    let opening = format!(
        "{}\n{}\n{}",
        BATTLE_BANNER,
        start_line,
        health_line(fighters, &damage, max_health, options.use_nicknames, false)
    );
    battle.attacks.push(FinalEvent::finalize(
        &opening,
        fighters,
        num_victim,
        Outcome::Nothing,
        Outcome::Nothing,
        options,
        roster,
        rng,
    ));

    let mut rounds = 0;
    while victims_standing > 0 {
        rounds += 1;
        if rounds > MAX_BATTLE_ROUNDS {
            error!(
                "Battle between {} victims and {} attackers did not finish",
                num_victim, num_attacker
            );
            return Err(BattleError::LoopLimit(MAX_BATTLE_ROUNDS));
        }

        let attack_index = rng.gen_range(0..battles.attacks.len());
        let attack = &battles.attacks[attack_index];
        let flipped = rng.gen_bool(0.5);
        let attacker = num_victim + rng.gen_range(0..num_attacker);

        let (victim_damage, attacker_damage) = if flipped {
            (attack.attacker.damage, attack.victim.damage)
        } else {
            (attack.victim.damage, attack.attacker.damage)
        };
        if damage[attacker].saturating_add(attacker_damage) >= max_health {
            continue;
        }

        let nth_standing = rng.gen_range(0..victims_standing);
        let Some(victim) = (0..num_victim).filter(|&i| damage[i] < max_health).nth(nth_standing) else {
            continue;
        };

        damage[victim] = damage[victim].saturating_add(victim_damage);
        damage[attacker] = damage[attacker].saturating_add(attacker_damage);
        let victim_down = damage[victim] >= max_health;
        if victim_down {
            victims_standing -= 1;
        }

        let round = Round {
            attack: attack_index,
            attacker,
            victim,
            flipped,
        };
        duplicates = if last == Some(round) { duplicates + 1 } else { 0 };
        last = Some(round);

        let mut line = attack.message.clone();
        if duplicates > 0 {
            line.push_str(&format!(" x{}", duplicates + 1));
        }
        let text = format!(
            "{}\n{}\n{}",
            BATTLE_BANNER,
            line,
            health_line(fighters, &damage, max_health, options.use_nicknames, true)
        );

        let pair = if flipped {
            [fighters[attacker], fighters[victim]]
        } else {
            [fighters[victim], fighters[attacker]]
        };
        let death = if victim_down { Outcome::Dies } else { Outcome::Nothing };
        let mut event = FinalEvent::finalize(
            &text,
            &pair,
            1,
            if flipped { Outcome::Nothing } else { death },
            if flipped { death } else { Outcome::Nothing },
            options,
            roster,
            rng,
        );

        let marker = match (victim_damage > 0, attacker_damage > 0) {
            (true, true) => Some(FIST_BOTH_ICON),
            (false, true) => Some(if flipped { FIST_LEFT_ICON } else { FIST_RIGHT_ICON }),
            (true, false) => Some(if flipped { FIST_RIGHT_ICON } else { FIST_LEFT_ICON }),
            (false, false) => None,
        };
        if let Some(url) = marker {
            let at = event.icons.len().min(1);
            event.icons.insert(at, Icon::marker(url));
        }
        battle.attacks.push(event);
    }

    debug!(rounds, victims = num_victim, attackers = num_attacker, "Battle finished");
    Ok(battle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::battle::AttackTemplate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn catalog() -> BattleCatalog {
        BattleCatalog {
            starts: vec!["Fists fly.".into()],
            attacks: vec![
                AttackTemplate::new("{attacker} punches {victim}.", 1, 0),
                AttackTemplate::new("{attacker} headbutts {victim}.", 2, 1),
            ],
            outcomes: vec!["{attacker} [Aoverpowers|overpower] {victim}.".into()],
        }
    }

    #[test]
    fn test_battle_ends_with_all_victims_down() {
        let roster: Vec<Player> = (0..4).map(|i| Player::new(i.to_string(), &format!("P{i}"))).collect();
        let fighters: Vec<&Player> = roster.iter().collect();
        let options = GameOptions::default();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let battle = finalize_battle(&fighters, 2, &options, &roster, &catalog(), &mut rng).unwrap();
            assert!(battle.battle);
            assert!(battle.attacker_killer);
            assert_eq!(battle.victim_outcome, Outcome::Dies);
            assert!(battle.attacks.len() >= 2, "opening line plus at least one round");
            assert!(battle.attacks[0].message.starts_with(BATTLE_BANNER));

            let deaths = battle
                .attacks
                .iter()
                .filter(|a| a.victim_outcome == Outcome::Dies || a.attacker_outcome == Outcome::Dies)
                .count();
            assert_eq!(deaths, 2);
            let last = battle.attacks.last().unwrap();
            assert!(last.message.contains("~~`P0`: 0HP~~") && last.message.contains("~~`P1`: 0HP~~"));
        }
    }

    #[test]
    fn test_harmless_attacks_hit_loop_limit() {
        let roster: Vec<Player> = (0..2).map(|i| Player::new(i.to_string(), &format!("P{i}"))).collect();
        let fighters: Vec<&Player> = roster.iter().collect();
        let mut catalog = catalog();
        catalog.attacks = vec![AttackTemplate::new("{attacker} glares at {victim}.", 0, 0)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            finalize_battle(&fighters, 1, &GameOptions::default(), &roster, &catalog, &mut rng),
            Err(BattleError::LoopLimit(MAX_BATTLE_ROUNDS))
        );
    }

    #[test]
    fn test_huge_damage_saturates() {
        let roster: Vec<Player> = (0..2).map(|i| Player::new(i.to_string(), &format!("P{i}"))).collect();
        let fighters: Vec<&Player> = roster.iter().collect();
        let mut catalog = catalog();
        catalog.attacks = vec![
            AttackTemplate::new("{attacker} pokes {victim}.", 1, 0),
            AttackTemplate::new("{attacker} flattens {victim}.", u32::MAX, 0),
        ];
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let battle = finalize_battle(&fighters, 1, &GameOptions::default(), &roster, &catalog, &mut rng).unwrap();
            let last = battle.attacks.last().unwrap();
            assert!(last.message.contains("~~`P0`: 0HP~~"));
        }
    }

    #[test]
    fn test_requires_both_sides() {
        let roster = vec![Player::new("0", "P0")];
        let fighters: Vec<&Player> = roster.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            finalize_battle(&fighters, 1, &GameOptions::default(), &roster, &catalog(), &mut rng),
            Err(BattleError::NotEnoughFighters(1, 0))
        ));
    }
}
