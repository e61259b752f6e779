//! Async front for day simulation
//!
//! Days are simulated on tokio's blocking pool against a copy of the guild's
//! game. The caller's game is only replaced when the worker completes, so a
//! failed or crashed worker leaves no partial state behind.

use crate::core::types::GuildId;
use crate::events::catalog::EventCatalog;
use crate::events::messages::MessageTemplates;
use crate::game::day::DayState;
use crate::game::state::GuildGame;
use crate::simulation::day::{simulate_day, SimulationFailure};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("a day is already being simulated for guild {0}")]
    AlreadyRunning(GuildId),
    #[error("simulation worker for guild {0} crashed")]
    WorkerCrashed(GuildId),
    #[error(transparent)]
    Failed(#[from] SimulationFailure),
}

/// Result sent back by a simulation worker
#[derive(Debug)]
pub enum WorkerMessage {
    Completed(Box<GuildGame>),
    Failed(SimulationFailure),
}

/// Marks a guild busy until dropped, including when the `run_day` future
/// is cancelled mid-run.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<GuildId>>,
    guild: GuildId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.guild);
    }
}

pub struct SimulationRunner {
    catalog: Arc<EventCatalog>,
    messages: Arc<MessageTemplates>,
    in_flight: Mutex<HashSet<GuildId>>,
}

impl SimulationRunner {
    pub fn new(catalog: Arc<EventCatalog>, messages: Arc<MessageTemplates>) -> Self {
        Self {
            catalog,
            messages,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn catalog(&self) -> &Arc<EventCatalog> {
        &self.catalog
    }

    pub fn messages(&self) -> &Arc<MessageTemplates> {
        &self.messages
    }

    /// Simulate the next day of `game`, replaying exactly for a given `seed`.
    pub async fn run_day(&self, game: &mut GuildGame, seed: u64) -> Result<(), RunnerError> {
        if game.current_game.day.state == DayState::Running {
            return Err(RunnerError::AlreadyRunning(game.id.clone()));
        }
        let Some(claim) = self.claim(&game.id) else {
            return Err(RunnerError::AlreadyRunning(game.id.clone()));
        };

        let result = self.spawn_worker(game.clone(), seed).await;
        drop(claim);

        match result {
            Ok(WorkerMessage::Completed(done)) => {
                *game = *done;
                info!(
                    guild = %game.id,
                    day = game.current_game.day.num,
                    alive = game.current_game.num_alive,
                    "Day simulated"
                );
                Ok(())
            }
            Ok(WorkerMessage::Failed(failure)) => {
                game.current_game.day.state = DayState::Idle;
                Err(RunnerError::Failed(failure))
            }
            Err(e) => {
                error!(guild = %game.id, "Simulation worker crashed: {}", e);
                game.current_game.day.state = DayState::Idle;
                Err(RunnerError::WorkerCrashed(game.id.clone()))
            }
        }
    }

    async fn spawn_worker(
        &self,
        mut game: GuildGame,
        seed: u64,
    ) -> Result<WorkerMessage, tokio::task::JoinError> {
        let catalog = Arc::clone(&self.catalog);
        let messages = Arc::clone(&self.messages);
        tokio::task::spawn_blocking(move || {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match simulate_day(&mut game, &catalog, &messages, &mut rng) {
                Ok(()) => WorkerMessage::Completed(Box::new(game)),
                Err(failure) => WorkerMessage::Failed(failure),
            }
        })
        .await
    }

    fn claim(&self, guild: &GuildId) -> Option<InFlightGuard<'_>> {
        let inserted = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(guild.clone());
        inserted.then(|| InFlightGuard {
            set: &self.in_flight,
            guild: guild.clone(),
        })
    }

    #[cfg(test)]
    fn is_in_flight(&self, guild: &GuildId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(guild)
    }
}
