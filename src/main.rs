//! Hungry Games - Game Runner
//!
//! Runs a whole game from a data directory, one simulated day at a time,
//! and prints each day's events as text or JSON.

use clap::Parser;
use hungry_games::core::config::GameOptions;
use hungry_games::core::error::Result;
use hungry_games::core::types::GuildId;
use hungry_games::events::catalog::CatalogHandle;
use hungry_games::events::messages::MessageTemplates;
use hungry_games::game::day::Day;
use hungry_games::game::final_event::FinalEvent;
use hungry_games::game::roster::{create_game, Member, RosterFilter};
use hungry_games::game::state::GuildGame;
use hungry_games::simulation::runner::{RunnerError, SimulationRunner};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "hungry-games")]
#[command(about = "Simulate a Hungry Games battle royale day by day")]
struct Args {
    /// Data directory holding events/ and messages.json
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Number of generated players
    #[arg(long, default_value_t = 24)]
    players: usize,

    /// Players per team (0 disables teams); overrides the options file
    #[arg(long)]
    team_size: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Options file (.toml or .json)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Stop after this many days even without a winner
    #[arg(long, default_value_t = 100)]
    max_days: usize,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GameReport {
    seed: u64,
    days: Vec<Day>,
    winners: Vec<String>,
    ended_early: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hungry_games=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut options = match &args.options {
        Some(path) => GameOptions::load(path)?,
        None => {
            let default_path = args.data.join("options.toml");
            if default_path.exists() {
                GameOptions::load(&default_path)?
            } else {
                GameOptions::default()
            }
        }
    };
    if let Some(team_size) = args.team_size {
        options.team_size = team_size;
    }

    let messages = MessageTemplates::from_json(&fs::read_to_string(args.data.join("messages.json"))?)?;

    let rt = Runtime::new()?;
    let report = rt.block_on(run_game(&args, options, messages, seed))?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }
    Ok(())
}

async fn run_game(
    args: &Args,
    options: GameOptions,
    messages: MessageTemplates,
    seed: u64,
) -> Result<GameReport> {
    let catalog = CatalogHandle::spawn_load(args.data.join("events"))
        .wait_for_ready()
        .await?;
    let runner = SimulationRunner::new(catalog, Arc::new(messages));

    let members: Vec<Member> = (1..=args.players)
        .map(|i| Member {
            id: format!("{}", 100_000 + i),
            username: format!("Tribute {}", i),
            nickname: None,
            avatar_url: String::new(),
            bot: false,
        })
        .collect();
    let game = create_game("Hungry Games", &members, &[], &RosterFilter::default(), &options).await;
    let mut guild = GuildGame::new(GuildId::new("cli"), options, game);

    let mut report = GameReport {
        seed,
        days: Vec::new(),
        winners: Vec::new(),
        ended_early: None,
    };
    for day in 0..args.max_days {
        if guild.current_game.is_over(&guild.options) {
            break;
        }
        match runner.run_day(&mut guild, seed.wrapping_add(day as u64)).await {
            Ok(()) => report.days.push(guild.current_game.day.clone()),
            Err(RunnerError::Failed(failure)) => {
                tracing::warn!("Day failed: {}", failure);
                report.ended_early = Some(failure.reply);
                break;
            }
            Err(e) => {
                report.ended_early = Some(e.to_string());
                break;
            }
        }
    }
    guild.current_game.ended = true;
    report.winners = guild
        .current_game
        .living()
        .map(|p| p.name.clone())
        .collect();
    Ok(report)
}

fn print_event(event: &FinalEvent, indent: &str) {
    println!("{}{}", indent, event.message);
    for line in event.sub_message.lines() {
        println!("{}  {}", indent, line);
    }
    for attack in &event.attacks {
        print_event(attack, "      ");
    }
}

fn print_text(report: &GameReport) {
    println!("\n=== HUNGRY GAMES (seed {}) ===", report.seed);
    for day in &report.days {
        if day.is_bloodbath() {
            println!("\n--- The Bloodbath ---");
        } else {
            println!("\n--- Day {} ---", day.num);
        }
        for event in &day.events {
            print_event(event, "  ");
        }
    }
    if let Some(reason) = &report.ended_early {
        println!("\nThe games were stopped: {}", reason);
    }
    match report.winners.as_slice() {
        [] => println!("\nNobody survived."),
        [winner] => println!("\n{} wins the Hungry Games!", winner),
        many => println!("\nSurvivors: {}", many.join(", ")),
    }
}
