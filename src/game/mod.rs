//! Game state: players, teams, days and the finalized events they show

pub mod day;
pub mod final_event;
pub mod forced;
pub mod grammar;
pub mod player;
pub mod roster;
pub mod state;
pub mod team;

pub use day::{Day, DayState};
pub use final_event::{FinalEvent, Icon};
pub use forced::{ForcedOutcome, ForcedState};
pub use player::{Player, PlayerState};
pub use state::{CustomEvents, DisabledEvents, Game, GuildGame};
pub use team::Team;
