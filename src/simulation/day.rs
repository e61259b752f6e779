//! Day orchestration: runs one full day of a guild's game
//!
//! A day moves Idle → Running → Complete. Each iteration draws one event for
//! the players still undecided today (from an arena, a held weapon, a battle
//! or the general pool), assigns players to its roles and applies outcomes.
//! Once everybody is decided the day closes with forced outcomes, bleeding,
//! and death-rate summary lines.

use crate::core::config::GameOptions;
use crate::events::arena::ArenaEvent;
use crate::events::catalog::{EventCatalog, EventCategory};
use crate::events::event::{Event, WeaponGrant};
use crate::events::messages::{MessageKind, MessageTemplates};
use crate::events::outcome::{Outcome, OutcomeProbabilities};
use crate::events::weapon::WeaponTable;
use crate::game::day::{Day, DayState};
use crate::game::final_event::FinalEvent;
use crate::game::forced::apply_forced_outcome;
use crate::game::grammar::{format_multi_names, select_plural, NameFormat};
use crate::game::player::{Player, PlayerState};
use crate::game::state::{CustomEvents, DisabledEvents, Game, GuildGame};
use crate::simulation::assign::{pick_affected_players, RoleCounts};
use crate::simulation::battle::{finalize_battle, BattleError};
use crate::simulation::constants::{
    LITTLE_DEATH_RATE, LOTS_OF_DEATH_RATE, MAX_COUNT_RESOLVE_ATTEMPTS, SLAUGHTER_THRESHOLD,
};
use crate::simulation::outcome::apply_outcome;
use crate::simulation::picker::{pick_event, validate_event_requirements, PickContext, WeaponUse};
use crate::simulation::weighted::{pick_custom_weighted, weighted_user_rand};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Why a day could not be simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("No Bloodbath Events")]
    NoBloodbathEvents,
    #[error("No Player Events")]
    NoPlayerEvents,
    #[error("Bad Configuration")]
    BadConfiguration,
    #[error("Battle Failed")]
    BattleFailed,
    #[error("Day In Progress")]
    DayInProgress,
}

/// User-facing report of a day that could not be simulated
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}: {reply}")]
pub struct SimulationFailure {
    pub reply: String,
    pub reply2: Option<String>,
    /// The game cannot continue and should be ended
    pub end_game: bool,
    pub reason: FailureReason,
}

impl SimulationFailure {
    fn new(reason: FailureReason, reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            reply2: None,
            end_game: false,
            reason,
        }
    }
}

/// Internal failures of a single attempt
#[derive(Debug, Error)]
enum DayError {
    #[error("no valid event for '{source_name}' suitable for {remaining} remaining players")]
    NoValidEvent { source_name: String, remaining: usize },
    #[error("all bloodbath events are disabled")]
    NoBloodbathEvents,
    #[error("all player events are disabled")]
    NoPlayerEvents,
    #[error("battle failed: {0}")]
    Battle(#[from] BattleError),
}

impl DayError {
    fn into_failure(self) -> SimulationFailure {
        match self {
            DayError::NoValidEvent {
                source_name,
                remaining,
            } => SimulationFailure {
                reply: "Oops! I wasn't able to find a valid event for the remaining players.\n\
                        This is usually because too many events are disabled."
                    .to_string(),
                reply2: Some(format!(
                    "Try again with `next`.\n(Failed to find valid event for '{}' suitable for {} remaining players)",
                    source_name, remaining
                )),
                end_game: false,
                reason: FailureReason::BadConfiguration,
            },
            DayError::NoBloodbathEvents => SimulationFailure {
                end_game: true,
                ..SimulationFailure::new(
                    FailureReason::NoBloodbathEvents,
                    "All bloodbath events have been disabled! Please enable events so that \
                     something can happen in the games!",
                )
            },
            DayError::NoPlayerEvents => SimulationFailure {
                end_game: true,
                ..SimulationFailure::new(
                    FailureReason::NoPlayerEvents,
                    "All player events have been disabled! Please enable events so that \
                     something can happen in the games!",
                )
            },
            DayError::Battle(e) => SimulationFailure::new(
                FailureReason::BattleFailed,
                format!("A battle could not be resolved: {}", e),
            ),
        }
    }
}

/// Simulate the next day of `guild`'s current game.
///
/// On success the game holds the finished day in `day` (state `Complete`)
/// and a fresh staging shell in `next_day`. When no valid event can be found
/// the whole attempt is rolled back and retried once. On failure the game
/// is left exactly as it was, with its day back in `Idle`.
pub fn simulate_day<R: Rng + ?Sized>(
    guild: &mut GuildGame,
    catalog: &EventCatalog,
    messages: &MessageTemplates,
    rng: &mut R,
) -> Result<(), SimulationFailure> {
    if guild.current_game.day.state == DayState::Running {
        return Err(SimulationFailure::new(
            FailureReason::DayInProgress,
            "A day is already being simulated.",
        ));
    }

    let snapshot = guild.current_game.clone();
    let mut retry = true;
    loop {
        match run_day(guild, catalog, messages, rng) {
            Ok(()) => return Ok(()),
            Err(e) => {
                error!(
                    guild = %guild.id,
                    day = guild.current_game.day.num,
                    retry,
                    "Day simulation failed: {}",
                    e
                );
                guild.current_game = snapshot.clone();
                guild.current_game.day.state = DayState::Idle;
                match e {
                    DayError::NoValidEvent { .. } if retry => retry = false,
                    other => return Err(other.into_failure()),
                }
            }
        }
    }
}

/// Events the day draws from, after merging custom events and removing
/// disabled ones.
enum EventSource {
    Bloodbath(Vec<Event>),
    Arena { arena: ArenaEvent, pool: Vec<Event> },
    Player(Vec<Event>),
}

impl EventSource {
    fn pool(&self) -> &[Event] {
        match self {
            EventSource::Bloodbath(pool) | EventSource::Player(pool) => pool,
            EventSource::Arena { pool, .. } => pool,
        }
    }

    fn is_arena(&self) -> bool {
        matches!(self, EventSource::Arena { .. })
    }

    fn name(&self) -> String {
        match self {
            EventSource::Arena { arena, .. } => arena.message.clone(),
            _ => "player events".to_string(),
        }
    }

    fn probabilities<'a>(&'a self, options: &'a GameOptions) -> &'a OutcomeProbabilities {
        match self {
            EventSource::Bloodbath(_) => &options.bloodbath_outcome_probs,
            EventSource::Arena { arena, .. } => {
                arena.outcome_probs.as_ref().unwrap_or(&options.arena_outcome_probs)
            }
            EventSource::Player(_) => &options.player_outcome_probs,
        }
    }
}

fn enabled_events(
    defaults: &[Event],
    custom: &[Event],
    disabled: &DisabledEvents,
    category: EventCategory,
) -> Vec<Event> {
    defaults
        .iter()
        .chain(custom)
        .filter(|e| !disabled.is_event_disabled(category, e))
        .cloned()
        .collect()
}

/// Draw an arena event that still has enabled outcomes.
fn choose_arena<R: Rng + ?Sized>(
    catalog: &EventCatalog,
    custom: &CustomEvents,
    disabled: &DisabledEvents,
    custom_weight: f64,
    rng: &mut R,
) -> Option<(ArenaEvent, Vec<Event>)> {
    let mut candidates: Vec<&ArenaEvent> = catalog
        .arena()
        .iter()
        .chain(&custom.arena)
        .filter(|a| !disabled.is_disabled(EventCategory::Arena, a.id.as_str()))
        .collect();
    while !candidates.is_empty() {
        let flags: Vec<bool> = candidates.iter().map(|a| a.custom).collect();
        let index = pick_custom_weighted(&flags, custom_weight, rng)?;
        let pool = candidates[index]
            .enabled_outcomes(|id| disabled.is_disabled(EventCategory::Arena, id));
        if pool.is_empty() {
            candidates.remove(index);
            continue;
        }
        return Some((candidates[index].clone(), pool));
    }
    None
}

fn choose_source<R: Rng + ?Sized>(
    guild: &GuildGame,
    catalog: &EventCatalog,
    day_num: i32,
    starting_alive: u32,
    rng: &mut R,
) -> Result<EventSource, DayError> {
    let custom = &guild.custom_events;
    let disabled = &guild.disabled_events;
    let options = &guild.options;

    if day_num == 0 {
        let pool = enabled_events(
            catalog.events(EventCategory::Bloodbath),
            &custom.bloodbath,
            disabled,
            EventCategory::Bloodbath,
        );
        if pool.is_empty() {
            return Err(DayError::NoBloodbathEvents);
        }
        return Ok(EventSource::Bloodbath(pool));
    }

    let do_arena = starting_alive > 2
        && options.arena_events
        && rng.gen::<f64>() < options.probability_of_arena_event;
    if do_arena {
        match choose_arena(catalog, custom, disabled, options.custom_event_weight, rng) {
            Some((arena, pool)) => return Ok(EventSource::Arena { arena, pool }),
            None => debug!("No arena event has enabled outcomes"),
        }
    }

    let pool = enabled_events(
        catalog.events(EventCategory::Player),
        &custom.player,
        disabled,
        EventCategory::Player,
    );
    if pool.is_empty() {
        return Err(DayError::NoPlayerEvents);
    }
    Ok(EventSource::Player(pool))
}

/// Name of a weapon's consumable for `count` units.
fn consumable_label(weapons: &WeaponTable, id: &str, count: u32) -> String {
    match weapons.get(id) {
        None => {
            error!("Failed to find weapon: {}", id);
            format!("(Unknown weapon {})", id)
        }
        Some(weapon) => match weapon.consumable.as_deref().or(weapon.name.as_deref()) {
            Some(text) => select_plural(text, 'C', count != 1),
            None if count != 1 => format!("{}s", id),
            None => id.to_string(),
        },
    }
}

/// One drawn event with its participants, before outcomes are applied.
struct Step {
    event: Event,
    affected: Vec<usize>,
    sub_message: String,
    battle: Option<FinalEvent>,
}

/// Try the weapon path: a random armed player may use one of their weapons.
fn try_weapon_event<R: Rng + ?Sized>(
    game: &mut Game,
    options: &GameOptions,
    weapons: &WeaponTable,
    probabilities: &OutcomeProbabilities,
    user_pool: &mut Vec<usize>,
    rng: &mut R,
) -> Option<Step> {
    let armed: Vec<usize> = user_pool
        .iter()
        .copied()
        .filter(|&p| game.included_users[p].has_weapons())
        .collect();
    let wielder = *armed.choose(rng)?;
    if rng.gen::<f64>() >= options.probability_of_use_weapon {
        return None;
    }
    let held: Vec<String> = game.included_users[wielder].weapons.keys().cloned().collect();
    let weapon_id = held.choose(rng)?.clone();
    let Some(weapon) = weapons.get(&weapon_id) else {
        debug!("No event pool for weapon {}", weapon_id);
        return None;
    };

    let weapon_use = WeaponUse {
        wielder,
        weapon_id: weapon_id.clone(),
    };
    let num_alive = game.num_alive;
    let num_total = game.num_total();
    let ctx = PickContext {
        players: &game.included_users,
        user_pool,
        options,
        num_alive,
        num_total,
        weapon: Some(&weapon_use),
    };
    let mut event = pick_event(&ctx, &mut game.teams, &weapon.outcomes, probabilities, rng)?;

    let num_victim = event.victim.min_count();
    let num_attacker = event.attacker.min_count();
    let counts = RoleCounts::new(num_victim, num_attacker, event.victim.outcome, event.attacker.outcome);
    let mut dead_pool = dead_indices(game);
    let affected = pick_affected_players(
        &counts,
        options,
        &game.included_users,
        user_pool,
        &mut dead_pool,
        &mut game.teams,
        Some(wielder),
        rng,
    );

    let names = NameFormat::from_nickname_option(options.use_nicknames);
    let consumed = event
        .consumes
        .map(|c| c.resolve(num_victim, num_attacker))
        .unwrap_or(0);
    let remaining = game.included_users[wielder].adjust_weapon(&weapon_id, -(consumed as i64));
    let wielder_player = &game.included_users[wielder];
    let wielder_name = format_multi_names(&[wielder_player], names);

    let mut sub_message = String::new();
    if remaining == 0 {
        sub_message = format!(
            "{} runs out of {}.",
            wielder_name,
            consumable_label(weapons, &weapon_id, 0)
        );
    } else if consumed != 0 {
        sub_message = format!(
            "{} lost {} {}.",
            wielder_name,
            consumed,
            consumable_label(weapons, &weapon_id, consumed)
        );
    }

    let wielder_is_attacker = affected.get(num_victim as usize) == Some(&wielder);
    let owner = if num_attacker > 1 || (num_attacker == 1 && !wielder_is_attacker) {
        format!("{}'s", wielder_name)
    } else {
        "their".to_string()
    };
    event.message = if event.message.is_empty() {
        let text = weapons
            .message
            .replace(
                "{weapon}",
                &format!("{} {}", owner, weapon.display_name(&weapon_id)),
            )
            .replace("{action}", event.action.as_deref().unwrap_or_default());
        select_plural(&text, 'C', consumed != 1)
    } else {
        event.message.replace("{owner}", &owner)
    };

    Some(Step {
        event,
        affected,
        sub_message,
        battle: None,
    })
}

fn dead_indices(game: &Game) -> Vec<usize> {
    (0..game.included_users.len())
        .filter(|&i| !game.included_users[i].living)
        .collect()
}

/// Try the battle path; `Ok(None)` when no battle happens this iteration.
fn try_battle<R: Rng + ?Sized>(
    game: &mut Game,
    options: &GameOptions,
    catalog: &EventCatalog,
    user_pool: &mut Vec<usize>,
    rng: &mut R,
) -> Result<Option<Step>, DayError> {
    if user_pool.len() < 2 || !catalog.battles().is_usable() {
        return Ok(None);
    }
    let forced = game.num_alive == 2;
    if !(rng.gen::<f64>() < options.probability_of_battle || forced) {
        return Ok(None);
    }

    let num_alive = game.num_alive;
    let num_total = game.num_total();
    let ctx = PickContext {
        players: &game.included_users,
        user_pool,
        options,
        num_alive,
        num_total,
        weapon: None,
    };
    if validate_event_requirements(1, 1, &ctx, &mut game.teams, true, false).is_err() {
        return Ok(None);
    }

    let mut counts = (1, 1);
    for _ in 0..MAX_COUNT_RESOLVE_ATTEMPTS {
        let num_attacker = weighted_user_rand(rng);
        let num_victim = weighted_user_rand(rng);
        if validate_event_requirements(num_victim, num_attacker, &ctx, &mut game.teams, true, false)
            .is_ok()
        {
            counts = (num_victim, num_attacker);
            break;
        }
    }
    let (num_victim, num_attacker) = counts;

    let roles = RoleCounts::new(num_victim, num_attacker, Outcome::Dies, Outcome::Nothing);
    let mut dead_pool = dead_indices(game);
    let affected = pick_affected_players(
        &roles,
        options,
        &game.included_users,
        user_pool,
        &mut dead_pool,
        &mut game.teams,
        None,
        rng,
    );

    let fighters: Vec<&Player> = affected.iter().map(|&i| &game.included_users[i]).collect();
    let num_victim_assigned = (num_victim as usize).min(fighters.len());
    let battle = finalize_battle(
        &fighters,
        num_victim_assigned,
        options,
        &game.included_users,
        catalog.battles(),
        rng,
    )?;
    debug!(
        "Battle between {} victims and {} attackers",
        num_victim_assigned,
        fighters.len() - num_victim_assigned
    );

    let event = Event::new(
        "",
        num_victim_assigned as i32,
        (fighters.len() - num_victim_assigned) as i32,
        Outcome::Dies,
        Outcome::Nothing,
    )
    .with_killers(false, true);
    Ok(Some(Step {
        event,
        affected,
        sub_message: String::new(),
        battle: Some(battle),
    }))
}

/// Apply every participant's outcome; returns the number of deaths.
fn apply_step(game: &mut Game, options: &GameOptions, weapons: &WeaponTable, step: &mut Step) -> u32 {
    let num_victim = (step.event.victim.min_count() as usize).min(step.affected.len());
    let num_attacker = step.affected.len() - num_victim;

    for role in [&mut step.event.victim, &mut step.event.attacker] {
        if let Some(grant) = &role.weapon {
            if !weapons.contains(&grant.id) {
                warn!("Dropping grant of unknown weapon {}", grant.id);
                role.weapon = None;
            }
        }
    }

    let mut num_killed = 0;
    for (slot, &player) in step.affected.iter().enumerate() {
        let is_victim = slot < num_victim;
        let (role, credit) = if is_victim {
            (&step.event.victim, num_attacker as u32)
        } else {
            (&step.event.attacker, num_victim as u32)
        };
        let kills = if role.killer { credit } else { 0 };
        if role.outcome == Outcome::Dies {
            num_killed += 1;
        }
        apply_outcome(game, options, player, kills, role.weapon.as_ref(), role.outcome);
    }

    let names = NameFormat::from_nickname_option(options.use_nicknames);
    let sides: [(&Option<WeaponGrant>, &[usize]); 2] = [
        (&step.event.attacker.weapon, &step.affected[num_victim..]),
        (&step.event.victim.weapon, &step.affected[..num_victim]),
    ];
    for (grant, players) in sides {
        let Some(grant) = grant else { continue };
        for &p in players {
            let player = &game.included_users[p];
            let list = if player.weapons.is_empty() {
                format!("0 {}", consumable_label(weapons, &grant.id, 0))
            } else {
                player
                    .weapons
                    .iter()
                    .map(|(id, &count)| format!("{} {}", count, consumable_label(weapons, id, count)))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let line = format!("{} now has {}.", format_multi_names(&[player], names), list);
            if !step.sub_message.is_empty() {
                step.sub_message.push('\n');
            }
            step.sub_message.push_str(&line);
        }
    }
    num_killed
}

fn run_day<R: Rng + ?Sized>(
    guild: &mut GuildGame,
    catalog: &EventCatalog,
    messages: &MessageTemplates,
    rng: &mut R,
) -> Result<(), DayError> {
    let day_num = guild.current_game.day.num + 1;
    let staged = std::mem::take(&mut guild.current_game.next_day.events);

    {
        let game = &mut guild.current_game;
        game.in_progress = true;
        game.day = Day {
            num: day_num,
            state: DayState::Running,
            events: staged,
        };
        for player in game.included_users.iter_mut() {
            if player.state == PlayerState::Zombie {
                player.state = PlayerState::Normal;
            }
        }
    }

    let game = &guild.current_game;
    let decided: BTreeSet<_> = game.day.events.iter().flat_map(|e| e.affected.iter()).collect();
    let mut user_pool: Vec<usize> = (0..game.included_users.len())
        .filter(|&i| {
            let p = &game.included_users[i];
            p.living && !decided.contains(&p.id)
        })
        .collect();
    user_pool.shuffle(rng);
    let starting_alive = game.num_alive;

    let source = choose_source(guild, catalog, day_num, starting_alive, rng)?;
    let weapons = catalog
        .weapons()
        .merged_with(&guild.custom_events.weapon)
        .without_disabled(|id| guild.disabled_events.is_disabled(EventCategory::Weapon, id));
    let options = guild.options.clone();
    let probabilities = source.probabilities(&options).clone();
    info!(
        guild = %guild.id,
        day = day_num,
        pool = user_pool.len(),
        source = %source.name(),
        "Simulating day"
    );

    let game = &mut guild.current_game;
    game.teams.shuffle(rng);

    if let EventSource::Arena { arena, .. } = &source {
        game.day
            .events
            .push(FinalEvent::simple(messages.get(MessageKind::EventStart, rng)));
        game.day
            .events
            .push(FinalEvent::simple(format!("**___{}___**", arena.message)));
    }

    while !user_pool.is_empty() {
        let mut step = if source.is_arena() {
            None
        } else {
            try_weapon_event(game, &options, &weapons, &probabilities, &mut user_pool, rng)
        };
        if step.is_none() {
            step = try_battle(game, &options, catalog, &mut user_pool, rng)?;
        }
        let mut step = match step {
            Some(step) => step,
            None => {
                let ctx = PickContext {
                    players: &game.included_users,
                    user_pool: &user_pool,
                    options: &options,
                    num_alive: game.num_alive,
                    num_total: game.num_total(),
                    weapon: None,
                };
                let Some(event) = pick_event(&ctx, &mut game.teams, source.pool(), &probabilities, rng)
                else {
                    error!(
                        "No event for {} from {} events. Arena event: {}, Day: {}",
                        user_pool.len(),
                        source.pool().len(),
                        if source.is_arena() { source.name() } else { "No".to_string() },
                        day_num
                    );
                    return Err(DayError::NoValidEvent {
                        source_name: source.name(),
                        remaining: user_pool.len(),
                    });
                };
                let counts = RoleCounts::new(
                    event.victim.min_count(),
                    event.attacker.min_count(),
                    event.victim.outcome,
                    event.attacker.outcome,
                );
                let mut dead_pool = dead_indices(game);
                let affected = pick_affected_players(
                    &counts,
                    &options,
                    &game.included_users,
                    &mut user_pool,
                    &mut dead_pool,
                    &mut game.teams,
                    None,
                    rng,
                );
                Step {
                    event,
                    affected,
                    sub_message: String::new(),
                    battle: None,
                }
            }
        };

        if step.affected.is_empty() {
            warn!("Event {:?} was assigned no players", step.event.id);
        }
        let num_killed = apply_step(game, &options, &weapons, &mut step);

        let mut final_event = match step.battle.take() {
            Some(battle) => battle,
            None => {
                let affected: Vec<&Player> =
                    step.affected.iter().map(|&i| &game.included_users[i]).collect();
                let mut event = FinalEvent::finalize(
                    &step.event.message,
                    &affected,
                    step.event.victim.min_count() as usize,
                    step.event.victim.outcome,
                    step.event.attacker.outcome,
                    &options,
                    &game.included_users,
                    rng,
                );
                event.victim_killer = step.event.victim.killer;
                event.attacker_killer = step.event.attacker.killer;
                event
            }
        };
        if !step.sub_message.is_empty() {
            final_event.push_sub_message(&step.sub_message);
        }
        game.day.events.push(final_event);

        if num_killed > SLAUGHTER_THRESHOLD {
            game.day
                .events
                .push(FinalEvent::simple(messages.get(MessageKind::Slaughter, rng)));
        }
    }

    if source.is_arena() {
        game.day
            .events
            .push(FinalEvent::simple(messages.get(MessageKind::EventEnd, rng)));
    }

    let forced = std::mem::take(&mut game.forced_outcomes);
    for outcome in forced {
        let events = apply_forced_outcome(game, &options, &outcome, messages, rng);
        game.day.events.extend(events);
        if outcome.persists {
            game.forced_outcomes.push(outcome);
        }
    }

    resolve_bleeding(game, &options, messages, rng);

    if starting_alive > 0 {
        let death_rate = 1.0 - game.num_alive as f64 / starting_alive as f64;
        if death_rate > LOTS_OF_DEATH_RATE {
            game.day
                .events
                .insert(0, FinalEvent::simple(messages.get(MessageKind::LotsOfDeath, rng)));
        } else if death_rate == 0.0 {
            game.day
                .events
                .push(FinalEvent::simple(messages.get(MessageKind::NoDeath, rng)));
        } else if death_rate < LITTLE_DEATH_RATE {
            game.day
                .events
                .insert(0, FinalEvent::simple(messages.get(MessageKind::LittleDeath, rng)));
        }
    }

    game.day.state = DayState::Complete;
    game.next_day = Day::new(day_num + 1);
    info!(
        day = day_num,
        events = game.day.events.len(),
        alive = game.num_alive,
        "Day complete"
    );
    Ok(())
}

/// Advance bleed counters, then let wounds that bled too long either heal
/// or kill.
fn resolve_bleeding<R: Rng + ?Sized>(
    game: &mut Game,
    options: &GameOptions,
    messages: &MessageTemplates,
    rng: &mut R,
) {
    for player in game.included_users.iter_mut().filter(|p| p.living) {
        if player.state == PlayerState::Wounded {
            player.bleeding += 1;
        } else {
            player.bleeding = 0;
        }
    }

    let mut bled_out = Vec::new();
    let mut recovered = Vec::new();
    for i in 0..game.included_users.len() {
        let p = &game.included_users[i];
        if !p.living || p.bleeding == 0 || p.bleeding < options.bleed_days {
            continue;
        }
        if rng.gen::<f64>() < options.probability_of_bleed_to_death
            && (options.allow_no_victors || game.num_alive > 1)
        {
            apply_outcome(game, options, i, 0, None, Outcome::Dies);
            bled_out.push(i);
        } else {
            let p = &mut game.included_users[i];
            p.bleeding = 0;
            p.state = PlayerState::Normal;
            recovered.push(i);
        }
    }

    for (indices, kind, outcome) in [
        (recovered, MessageKind::PatchWounds, Outcome::Thrives),
        (bled_out, MessageKind::BleedOut, Outcome::Dies),
    ] {
        if indices.is_empty() {
            continue;
        }
        let template = messages.get(kind, rng);
        let players: Vec<&Player> = indices.iter().map(|&i| &game.included_users[i]).collect();
        let event = FinalEvent::finalize(
            &template,
            &players,
            players.len(),
            outcome,
            Outcome::Nothing,
            options,
            &game.included_users,
            rng,
        );
        game.day.events.push(event);
    }
}
