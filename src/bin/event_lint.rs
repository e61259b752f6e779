//! Event Lint
//!
//! Validates authored event JSON files and prints a reason code for every
//! event that would be rejected.

use clap::Parser;
use hungry_games::events::catalog::EventCategory;
use hungry_games::events::validate::{
    check_weapon_references, validate_arena_event, validate_event, validate_weapon_event,
    ValidationError,
};
use hungry_games::events::weapon::WeaponTable;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "event_lint")]
#[command(about = "Validate custom Hungry Games events")]
struct Args {
    /// Event category: bloodbath, player, arena or weapon
    #[arg(long, default_value = "player")]
    category: String,

    /// Weapon table used to check weapon grants
    #[arg(long, default_value = "data/events/weapons.json")]
    weapons: PathBuf,

    /// JSON files holding one event or an array of events
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn lint(category: EventCategory, value: &Value, weapons: &WeaponTable) -> Result<(), ValidationError> {
    match category {
        EventCategory::Bloodbath | EventCategory::Player => {
            let event = validate_event(value)?;
            check_weapon_references(&event, weapons)
        }
        EventCategory::Arena => {
            let arena = validate_arena_event(value)?;
            arena
                .outcomes
                .iter()
                .try_for_each(|outcome| check_weapon_references(outcome, weapons))
        }
        EventCategory::Weapon => validate_weapon_event(value).map(|_| ()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("hungry_games=warn")
        .init();

    let args = Args::parse();
    let category = match EventCategory::parse(&args.category) {
        Ok(category) => category,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let weapons: WeaponTable = fs::read_to_string(&args.weapons)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_else(|| {
            eprintln!("Warning: no weapon table at {}", args.weapons.display());
            WeaponTable::default()
        });

    let mut failures = 0;
    for path in &args.files {
        let value: Value = match fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
        {
            Ok(value) => value,
            Err(e) => {
                println!("{}: unreadable ({})", path.display(), e);
                failures += 1;
                continue;
            }
        };
        let events = match value {
            Value::Array(list) => list,
            single => vec![single],
        };
        for (i, event) in events.iter().enumerate() {
            match lint(category, event, &weapons) {
                Ok(()) => println!("{}[{}]: OK", path.display(), i),
                Err(code) => {
                    println!("{}[{}]: {}", path.display(), i, code);
                    failures += 1;
                }
            }
        }
    }

    if failures > 0 {
        eprintln!("{} event(s) rejected", failures);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
