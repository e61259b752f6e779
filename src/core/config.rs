//! Per-guild game options
//!
//! Every option has a default so that partially written option files (TOML
//! or JSON) load cleanly. Keys use the same camelCase names the bot exposes
//! to guild administrators.

use crate::core::error::{HgError, Result};
use crate::events::outcome::OutcomeProbabilities;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// When teammates are kept on the same side of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collaboration {
    Disabled,
    #[default]
    Always,
    /// Collaborate only while more than one team is still alive
    UntilEnd,
}

/// Which players are mentioned in event messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionMode {
    #[default]
    Disabled,
    All,
    /// Only players who die in the event
    Death,
}

/// Options that shape how a guild's games are simulated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameOptions {
    // === TEAMS ===
    /// Players per team; 0 disables teams
    pub team_size: u32,

    pub teammates_collaborate: Collaboration,

    /// May a weapon wielder's own team end up as the victims of its use?
    pub use_enemy_weapon: bool,

    // === VICTORY ===
    /// Allow a day to end with nobody alive
    pub allow_no_victors: bool,

    // === EVENT SELECTION ===
    pub arena_events: bool,

    /// Chance per day (after the bloodbath) of an arena event
    pub probability_of_arena_event: f64,

    /// Chance a player holding weapons uses one instead of a normal event
    pub probability_of_use_weapon: f64,

    /// Chance of a battle instead of a normal event. Battles are forced once
    /// only two players remain.
    pub probability_of_battle: f64,

    pub bloodbath_outcome_probs: OutcomeProbabilities,
    pub arena_outcome_probs: OutcomeProbabilities,
    pub player_outcome_probs: OutcomeProbabilities,

    /// Relative weight of one custom event against one built-in event
    pub custom_event_weight: f64,

    // === WOUNDS ===
    /// Days a wound may bleed before it resolves
    pub bleed_days: u32,

    /// Chance a wound that has bled for `bleed_days` is fatal
    pub probability_of_bleed_to_death: f64,

    /// Damage a player can take in a battle before falling (1..=10)
    pub battle_health: u32,

    // === DISPLAY ===
    pub use_nicknames: bool,
    pub mention_all: MentionMode,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            team_size: 0,
            teammates_collaborate: Collaboration::Always,
            use_enemy_weapon: false,
            allow_no_victors: false,
            arena_events: true,
            probability_of_arena_event: 0.25,
            probability_of_use_weapon: 0.75,
            probability_of_battle: 0.05,
            bloodbath_outcome_probs: OutcomeProbabilities::bloodbath_default(),
            arena_outcome_probs: OutcomeProbabilities::arena_default(),
            player_outcome_probs: OutcomeProbabilities::player_default(),
            custom_event_weight: 2.0,
            bleed_days: 2,
            probability_of_bleed_to_death: 0.5,
            battle_health: 5,
            use_nicknames: false,
            mention_all: MentionMode::Disabled,
        }
    }
}

pub const MIN_BATTLE_HEALTH: u32 = 1;
pub const MAX_BATTLE_HEALTH: u32 = 10;

impl GameOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let options: GameOptions = toml::from_str(text)?;
        options.validate().map_err(HgError::Config)?;
        Ok(options)
    }

    /// Load options from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                let options: GameOptions = serde_json::from_str(&text)?;
                options.validate().map_err(HgError::Config)?;
                Ok(options)
            }
            _ => Self::from_toml_str(&text),
        }
    }

    /// Validate option ranges
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, p) in [
            ("probabilityOfArenaEvent", self.probability_of_arena_event),
            ("probabilityOfUseWeapon", self.probability_of_use_weapon),
            ("probabilityOfBattle", self.probability_of_battle),
            ("probabilityOfBleedToDeath", self.probability_of_bleed_to_death),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{} ({}) must be between 0 and 1", name, p));
            }
        }

        if !(MIN_BATTLE_HEALTH..=MAX_BATTLE_HEALTH).contains(&self.battle_health) {
            return Err(format!(
                "battleHealth ({}) must be between {} and {}",
                self.battle_health, MIN_BATTLE_HEALTH, MAX_BATTLE_HEALTH
            ));
        }

        if !self.custom_event_weight.is_finite() || self.custom_event_weight < 0.0 {
            return Err("customEventWeight must be a non-negative number".into());
        }

        Ok(())
    }

    /// Whether teammates collaborate given how many teams are still alive
    pub fn collaborates(&self, teams_alive: usize) -> bool {
        if self.team_size == 0 {
            return false;
        }
        match self.teammates_collaborate {
            Collaboration::Disabled => false,
            Collaboration::Always => true,
            Collaboration::UntilEnd => teams_alive > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = GameOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.battle_health, 5);
        assert_eq!(options.bleed_days, 2);
        assert_eq!(options.bloodbath_outcome_probs.revive, 0.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options = GameOptions::from_toml_str(
            r#"
            teamSize = 2
            teammatesCollaborate = "untilend"
            mentionAll = "death"

            [playerOutcomeProbs]
            kill = 50
            nothing = 50
            "#,
        )
        .unwrap();
        assert_eq!(options.team_size, 2);
        assert_eq!(options.teammates_collaborate, Collaboration::UntilEnd);
        assert_eq!(options.mention_all, MentionMode::Death);
        assert_eq!(options.player_outcome_probs.kill, 50.0);
        assert_eq!(options.player_outcome_probs.revive, 0.0);
        assert_eq!(options.probability_of_battle, 0.05);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(GameOptions::from_toml_str("battleHealth = 11").is_err());
        assert!(GameOptions::from_toml_str("probabilityOfBattle = 1.5").is_err());
    }

    #[test]
    fn test_collaboration_modes() {
        let mut options = GameOptions::default();
        assert!(!options.collaborates(3), "no teams without a team size");
        options.team_size = 2;
        assert!(options.collaborates(1));
        options.teammates_collaborate = Collaboration::UntilEnd;
        assert!(options.collaborates(2));
        assert!(!options.collaborates(1));
    }
}
