//! Async runner integration tests

use hungry_games::core::config::GameOptions;
use hungry_games::core::types::GuildId;
use hungry_games::events::{CatalogHandle, MessageTemplates};
use hungry_games::game::roster::{create_game, Member, RosterFilter};
use hungry_games::game::{DayState, GuildGame};
use hungry_games::simulation::{RunnerError, SimulationRunner};
use std::path::Path;
use std::sync::Arc;

fn members(n: usize) -> Vec<Member> {
    (0..n)
        .map(|i| Member {
            id: format!("{}", 1000 + i),
            username: format!("Tribute{}", i),
            nickname: Some(format!("T{}", i)),
            avatar_url: format!("https://example.invalid/{}.png", i),
            bot: false,
        })
        .collect()
}

async fn runner() -> SimulationRunner {
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let catalog = CatalogHandle::spawn_load(data.join("events"))
        .wait_for_ready()
        .await
        .unwrap();
    let messages = MessageTemplates::from_json(&std::fs::read_to_string(data.join("messages.json")).unwrap()).unwrap();
    SimulationRunner::new(catalog, Arc::new(messages))
}

#[tokio::test]
async fn test_full_game_reaches_a_winner() {
    let runner = runner().await;
    let options = GameOptions::default();
    let game = create_game("Test", &members(12), &[], &RosterFilter::default(), &options).await;
    let mut guild = GuildGame::new(GuildId::new("g1"), options, game);

    let mut days = 0;
    while !guild.current_game.is_over(&guild.options) && days < 200 {
        runner.run_day(&mut guild, days).await.unwrap();
        assert_eq!(guild.current_game.day.state, DayState::Complete);
        assert_eq!(guild.current_game.day.num, days as i32);
        days += 1;
    }
    assert!(guild.current_game.is_over(&guild.options));
    assert!(guild.current_game.num_alive <= 1);
}

#[tokio::test]
async fn test_team_game_ends_with_one_team() {
    let runner = runner().await;
    let mut options = GameOptions::default();
    options.team_size = 3;
    let game = create_game("Teams", &members(9), &[], &RosterFilter::default(), &options).await;
    assert_eq!(game.teams.len(), 3);
    let mut guild = GuildGame::new(GuildId::new("g2"), options, game);

    for seed in 0..200 {
        if guild.current_game.is_over(&guild.options) {
            break;
        }
        runner.run_day(&mut guild, seed).await.unwrap();
    }
    assert!(guild.current_game.teams_alive() <= 1);
}

#[tokio::test]
async fn test_running_day_is_rejected() {
    let runner = runner().await;
    let options = GameOptions::default();
    let game = create_game("Test", &members(4), &[], &RosterFilter::default(), &options).await;
    let mut guild = GuildGame::new(GuildId::new("g3"), options, game);
    guild.current_game.day.state = DayState::Running;

    let result = runner.run_day(&mut guild, 1).await;
    assert!(matches!(result, Err(RunnerError::AlreadyRunning(_))));
    assert_eq!(guild.current_game.day.num, -1);
}

#[tokio::test]
async fn test_same_seed_same_day() {
    let runner = runner().await;
    let options = GameOptions::default();
    let game = create_game("Test", &members(10), &[], &RosterFilter::default(), &options).await;
    let mut a = GuildGame::new(GuildId::new("a"), options.clone(), game.clone());
    let mut b = GuildGame::new(GuildId::new("b"), options, game);

    runner.run_day(&mut a, 42).await.unwrap();
    runner.run_day(&mut b, 42).await.unwrap();
    assert_eq!(a.current_game.day, b.current_game.day);
    assert_eq!(a.current_game.included_users, b.current_game.included_users);
}
