//! Day simulation engine
//!
//! `day` drives a whole day; `picker`, `assign`, `outcome` and `battle` are
//! its steps. `runner` moves the work onto tokio's blocking pool.

pub mod assign;
pub mod battle;
pub mod constants;
pub mod day;
pub mod outcome;
pub mod picker;
pub mod runner;
pub mod weighted;

pub use day::{simulate_day, FailureReason, SimulationFailure};
pub use runner::{RunnerError, SimulationRunner, WorkerMessage};
