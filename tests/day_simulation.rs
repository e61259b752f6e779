//! Day simulation integration tests

use hungry_games::core::config::{Collaboration, GameOptions};
use hungry_games::core::types::{GuildId, PlayerId};
use hungry_games::events::*;
use hungry_games::game::roster::form_teams;
use hungry_games::game::*;
use hungry_games::simulation::simulate_day;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

fn players(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(i.to_string(), &format!("P{i}"))).collect()
}

fn quiet_options() -> GameOptions {
    let mut options = GameOptions::default();
    options.arena_events = false;
    options.probability_of_battle = 0.0;
    options
}

fn flat_catalog(bloodbath: Vec<Event>, player: Vec<Event>, weapons: WeaponTable) -> EventCatalog {
    EventCatalog::new(bloodbath, player, vec![], weapons, BattleCatalog::default())
}

fn data_catalog() -> EventCatalog {
    EventCatalog::load_dir(&Path::new(env!("CARGO_MANIFEST_DIR")).join("data/events")).unwrap()
}

fn data_messages() -> MessageTemplates {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/messages.json");
    MessageTemplates::from_json(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_bloodbath_kills_one_player_per_event() {
    let mut options = quiet_options();
    options.allow_no_victors = true;
    let mut guild = GuildGame::new(GuildId::new("g"), options, Game::new("Test", players(4), vec![]));
    let catalog = flat_catalog(
        vec![Event::new("{victim} falls.", 1, 0, Outcome::Dies, Outcome::Nothing)],
        vec![],
        WeaponTable::default(),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    simulate_day(&mut guild, &catalog, &MessageTemplates::new(), &mut rng).unwrap();

    let game = &guild.current_game;
    assert_eq!(game.day.num, 0);
    assert_eq!(game.day.state, DayState::Complete);
    let deaths: Vec<&FinalEvent> = game.day.events.iter().filter(|e| !e.affected.is_empty()).collect();
    assert_eq!(deaths.len(), 4);
    assert!(deaths.iter().all(|e| e.affected.len() == 1 && e.victim_outcome == Outcome::Dies));
    assert_eq!(game.num_alive, 0);

    // Ranks count down as players die
    let mut ranks: Vec<u32> = game.included_users.iter().map(|p| p.rank).collect();
    ranks.sort();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
    assert!(game.included_users.iter().all(|p| p.day_of_death == Some(0)));
}

#[test]
fn test_last_player_gets_a_survivable_event() {
    let mut guild = GuildGame::new(GuildId::new("g"), quiet_options(), Game::new("Test", players(4), vec![]));
    let catalog = flat_catalog(
        vec![
            Event::new("{victim} falls.", 1, 0, Outcome::Dies, Outcome::Nothing),
            Event::new("{victim} hides.", 1, 0, Outcome::Nothing, Outcome::Nothing),
        ],
        vec![],
        WeaponTable::default(),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    simulate_day(&mut guild, &catalog, &MessageTemplates::new(), &mut rng).unwrap();
    assert!(guild.current_game.num_alive >= 1);
}

#[test]
fn test_weapon_consumption_removes_empty_weapon() {
    let mut roster = players(2);
    roster[0] = roster[0].clone().with_weapon("sword", 2);
    let mut options = quiet_options();
    options.probability_of_use_weapon = 1.0;
    let mut guild = GuildGame::new(GuildId::new("g"), options, Game::new("Test", roster, vec![]));

    let mut weapons = WeaponTable::default();
    weapons.weapons.insert(
        "sword".into(),
        WeaponEvent::new(
            "[Csword|swords]",
            vec![Event::new("{attacker} pokes {victim} with {owner} sword.", 1, 1, Outcome::Nothing, Outcome::Nothing)
                .with_id("poke")
                .with_consumes(Consumes::Fixed(1))],
        ),
    );
    let idle = Event::new("{victim} waits.", 1, 0, Outcome::Nothing, Outcome::Nothing);
    let catalog = flat_catalog(vec![idle.clone()], vec![idle], weapons);
    let messages = MessageTemplates::new();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    simulate_day(&mut guild, &catalog, &messages, &mut rng).unwrap();
    let day = &guild.current_game.day;
    assert_eq!(guild.current_game.included_users[0].weapon_count("sword"), 1);
    assert_eq!(day.events[0].message, "`P0` pokes `P1` with their sword.");
    assert_eq!(day.events[0].sub_message, "`P0` lost 1 sword.");

    simulate_day(&mut guild, &catalog, &messages, &mut rng).unwrap();
    let wielder = &guild.current_game.included_users[0];
    assert!(!wielder.weapons.contains_key("sword"));
    assert_eq!(guild.current_game.day.events[0].sub_message, "`P0` runs out of swords.");
}

#[test]
fn test_custom_weapon_outcome_used_by_wielder() {
    let mut roster = players(2);
    roster[0] = roster[0].clone().with_weapon("sword", 1);
    let mut options = quiet_options();
    options.probability_of_use_weapon = 1.0;
    let mut guild = GuildGame::new(GuildId::new("g"), options, Game::new("Test", roster, vec![]));
    let weapon = serde_json::json!({
        "name": "[Csword|swords]",
        "outcomes": [{
            "message": "{attacker} swings wildly at {victim}.",
            "victim": {"count": 1, "outcome": "nothing"},
            "attacker": {"count": 1, "outcome": "nothing"}
        }]
    });
    let id = guild
        .add_custom_event(EventCategory::Weapon, &weapon, &WeaponTable::default(), "123456789012345678", 1)
        .unwrap();
    assert_eq!(id.as_str(), "sword");

    let idle = Event::new("{victim} waits.", 1, 0, Outcome::Nothing, Outcome::Nothing);
    let catalog = flat_catalog(vec![idle.clone()], vec![idle], WeaponTable::default());
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    simulate_day(&mut guild, &catalog, &MessageTemplates::new(), &mut rng).unwrap();

    assert_eq!(guild.current_game.day.events[0].message, "`P0` swings wildly at `P1`.");
}

#[test]
fn test_teams_never_fight_themselves() {
    let roster = players(4);
    let teams = form_teams(&roster, 2, Vec::new());
    let mut options = quiet_options();
    options.team_size = 2;
    options.teammates_collaborate = Collaboration::Always;
    let guild = GuildGame::new(GuildId::new("g"), options, Game::new("Test", roster, teams));
    let catalog = flat_catalog(
        vec![
            Event::new("{attacker} kills {victim}.", 1, 1, Outcome::Dies, Outcome::Nothing).with_killers(false, true),
            Event::new("{victim} hides.", 1, 0, Outcome::Nothing, Outcome::Nothing),
        ],
        vec![],
        WeaponTable::default(),
    );

    for seed in 0..20 {
        let mut g = guild.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        simulate_day(&mut g, &catalog, &MessageTemplates::new(), &mut rng).unwrap();
        for event in g.current_game.day.events.iter().filter(|e| e.affected.len() == 2) {
            let team_of = |id: &PlayerId| g.current_game.teams.iter().position(|t| t.contains(id));
            assert_ne!(team_of(&event.affected[0]), team_of(&event.affected[1]));
        }
    }
}

#[test]
fn test_same_seed_replays_same_day() {
    let catalog = data_catalog();
    let messages = data_messages();
    let base = GuildGame::new(GuildId::new("g"), GameOptions::default(), Game::new("Test", players(12), vec![]));

    let mut first = base.clone();
    let mut second = base.clone();
    for day in 0..3 {
        let mut rng_a = ChaCha8Rng::seed_from_u64(100 + day);
        let mut rng_b = ChaCha8Rng::seed_from_u64(100 + day);
        simulate_day(&mut first, &catalog, &messages, &mut rng_a).unwrap();
        simulate_day(&mut second, &catalog, &messages, &mut rng_b).unwrap();
    }
    assert_eq!(first, second);
}

#[test]
fn test_day_never_left_running() {
    let catalog = data_catalog();
    let messages = data_messages();
    let mut guild = GuildGame::new(GuildId::new("g"), GameOptions::default(), Game::new("Test", players(16), vec![]));
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    for _ in 0..30 {
        if guild.current_game.is_over(&guild.options) {
            break;
        }
        let result = simulate_day(&mut guild, &catalog, &messages, &mut rng);
        assert_ne!(guild.current_game.day.state, DayState::Running);
        if result.is_err() {
            break;
        }
        let alive = guild.current_game.included_users.iter().filter(|p| p.living).count() as u32;
        assert_eq!(alive, guild.current_game.num_alive);
    }
}

#[test]
fn test_staged_forced_death_opens_next_day() {
    let catalog = data_catalog();
    let messages = data_messages();
    let mut guild = GuildGame::new(GuildId::new("g"), GameOptions::default(), Game::new("Test", players(6), vec![]));
    let mut rng = ChaCha8Rng::seed_from_u64(21);

    guild
        .force_player_state(ForcedOutcome::new(vec![PlayerId::new("2")], ForcedState::Dead), &messages, &mut rng)
        .unwrap();
    simulate_day(&mut guild, &catalog, &messages, &mut rng).unwrap();

    let day = &guild.current_game.day;
    let forced_id = PlayerId::new("2");
    let mentions = day.events.iter().filter(|e| e.involves(&forced_id)).count();
    assert_eq!(mentions, 1);
    assert!(!guild.current_game.player(&forced_id).unwrap().living);
}
