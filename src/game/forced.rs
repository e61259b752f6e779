//! Forced outcomes: administrator overrides of a player's state

use crate::core::config::GameOptions;
use crate::core::error::{HgError, Result};
use crate::core::types::PlayerId;
use crate::events::messages::{MessageKind, MessageTemplates};
use crate::events::outcome::Outcome;
use crate::game::day::DayState;
use crate::game::final_event::FinalEvent;
use crate::game::player::{Player, PlayerState};
use crate::game::state::{Game, GuildGame};
use crate::simulation::outcome::apply_outcome;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForcedState {
    Dead,
    Living,
    Thriving,
    Wounded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcedOutcome {
    pub list: Vec<PlayerId>,
    pub state: ForcedState,
    /// Message template; a stock message is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Re-apply at the end of every day instead of once
    #[serde(default)]
    pub persists: bool,
}

impl ForcedOutcome {
    pub fn new(list: Vec<PlayerId>, state: ForcedState) -> Self {
        Self {
            list,
            state,
            text: None,
            persists: false,
        }
    }
}

/// The outcome that moves `player` into `state`, if it isn't there already.
pub fn outcome_for(player: &Player, state: ForcedState) -> Option<(Outcome, MessageKind)> {
    match state {
        ForcedState::Dead if player.living => Some((Outcome::Dies, MessageKind::ForcedDeath)),
        ForcedState::Living | ForcedState::Thriving if !player.living => {
            Some((Outcome::Revived, MessageKind::ForcedHeal))
        }
        ForcedState::Thriving if player.state == PlayerState::Wounded => {
            Some((Outcome::Thrives, MessageKind::ForcedHeal))
        }
        ForcedState::Wounded if player.living && player.state != PlayerState::Wounded => {
            Some((Outcome::Wounded, MessageKind::ForcedWound))
        }
        _ => None,
    }
}

/// Apply a forced outcome to every listed player, returning one event per
/// player whose state changed.
pub fn apply_forced_outcome<R: Rng + ?Sized>(
    game: &mut Game,
    options: &GameOptions,
    forced: &ForcedOutcome,
    messages: &MessageTemplates,
    rng: &mut R,
) -> Vec<FinalEvent> {
    let mut events = Vec::new();
    for id in &forced.list {
        let Some(index) = game.player_index(id) else {
            warn!("Forced outcome names unknown player {}", id);
            continue;
        };
        let Some((outcome, kind)) = outcome_for(&game.included_users[index], forced.state) else {
            continue;
        };
        apply_outcome(game, options, index, 0, None, outcome);
        let template = forced.text.clone().unwrap_or_else(|| messages.get(kind, rng));
        let player = &game.included_users[index];
        events.push(FinalEvent::finalize(
            &template,
            &[player],
            1,
            outcome,
            Outcome::Nothing,
            options,
            &game.included_users,
            rng,
        ));
    }
    events
}

impl GuildGame {
    /// Force players into a state.
    ///
    /// While no day is simulating the change happens now and its events are
    /// staged to open the next day; those players then sit out the next
    /// day's draw. While a finished day is being shown, each event is inserted
    /// after the player's last event of that day. Persistent outcomes are also
    /// kept and re-applied at the end of every later day.
    pub fn force_player_state<R: Rng + ?Sized>(
        &mut self,
        forced: ForcedOutcome,
        messages: &MessageTemplates,
        rng: &mut R,
    ) -> Result<String> {
        if forced.list.is_empty() {
            return Err(HgError::InvalidState("No players given.".into()));
        }
        let game = &mut self.current_game;
        if game.day.state == DayState::Running {
            return Err(HgError::InvalidState(
                "A day is being simulated; try again once it finishes.".into(),
            ));
        }

        let events = apply_forced_outcome(game, &self.options, &forced, messages, rng);
        match game.day.state {
            DayState::Complete => {
                for event in events {
                    let at = event
                        .affected
                        .first()
                        .and_then(|id| game.day.events.iter().rposition(|e| e.involves(id)))
                        .map(|i| i + 1)
                        .unwrap_or(game.day.events.len());
                    game.day.events.insert(at, event);
                }
            }
            _ => game.next_day.events.extend(events),
        }

        let state = forced.state;
        if forced.persists {
            game.forced_outcomes.push(forced);
        }
        info!(guild = %self.id, ?state, "Forced player state");
        Ok(format!(
            "Player(s) will be {} by the end of the day.",
            format!("{:?}", state).to_lowercase()
        ))
    }
}
