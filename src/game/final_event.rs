//! Finalized events: the display-ready record of one narrative step

use crate::core::config::{GameOptions, MentionMode};
use crate::core::types::PlayerId;
use crate::events::outcome::Outcome;
use crate::game::grammar::{format_multi_names, select_plural, NameFormat};
use crate::game::player::Player;
use crate::simulation::weighted::weighted_user_rand;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Picture shown next to an event line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerId>,
    pub url: String,
}

impl Icon {
    pub fn for_player(player: &Player) -> Self {
        Self {
            id: Some(player.id.clone()),
            url: player.avatar_url.clone(),
        }
    }

    pub fn marker(url: &str) -> Self {
        Self {
            id: None,
            url: url.to_string(),
        }
    }
}

/// A fully formatted event. Produced once and not changed afterwards, except
/// that the simulation may append bookkeeping lines to `sub_message`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalEvent {
    pub message: String,
    #[serde(default)]
    pub icons: Vec<Icon>,
    /// Participants in role order: victims first, then attackers
    #[serde(default)]
    pub affected: Vec<PlayerId>,
    pub num_victim: u32,
    pub victim_outcome: Outcome,
    pub attacker_outcome: Outcome,
    #[serde(default)]
    pub victim_killer: bool,
    #[serde(default)]
    pub attacker_killer: bool,
    #[serde(default)]
    pub mention_string: String,
    #[serde(default)]
    pub sub_message: String,
    #[serde(default)]
    pub battle: bool,
    /// Battle rounds, in order, starting with the opening line
    #[serde(default)]
    pub attacks: Vec<FinalEvent>,
}

impl FinalEvent {
    /// Event with no participants, such as an arena announcement
    pub fn simple(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Format a message template for the given participants.
    ///
    /// `affected` holds the victims followed by the attackers. `players` is the
    /// full roster, used to fill `{dead}` with players who are dead and not
    /// part of this event.
    #[allow(clippy::too_many_arguments)]
    pub fn finalize<R: Rng + ?Sized>(
        template: &str,
        affected: &[&Player],
        num_victim: usize,
        victim_outcome: Outcome,
        attacker_outcome: Outcome,
        options: &GameOptions,
        players: &[Player],
        rng: &mut R,
    ) -> Self {
        let num_victim = num_victim.min(affected.len());
        let (victims, attackers) = affected.split_at(num_victim);
        let names = NameFormat::from_nickname_option(options.use_nicknames);

        let mut mention_string = String::new();
        for (i, player) in affected.iter().enumerate() {
            let outcome = if i < num_victim {
                victim_outcome
            } else {
                attacker_outcome
            };
            let mention = match options.mention_all {
                MentionMode::Disabled => false,
                MentionMode::All => true,
                MentionMode::Death => outcome == Outcome::Dies,
            };
            if mention && !player.is_npc {
                mention_string.push_str(&format!("<@{}>", player.id));
            }
        }

        let mut message = select_plural(template, 'V', victims.len() > 1);
        message = select_plural(&message, 'A', attackers.len() > 1);
        message = message
            .replace("{victim}", &format_multi_names(victims, names))
            .replace("{attacker}", &format_multi_names(attackers, names));

        if message.contains("{dead}") {
            let limit = weighted_user_rand(rng) as usize;
            let dead: Vec<&Player> = players
                .iter()
                .filter(|p| !p.living && !affected.iter().any(|a| a.id == p.id))
                .take(limit)
                .collect();
            if dead.is_empty() {
                message = select_plural(&message.replace("{dead}", "an animal"), 'D', false);
            } else {
                message = select_plural(&message, 'D', dead.len() > 1)
                    .replace("{dead}", &format_multi_names(&dead, names));
            }
        }

        Self {
            message,
            icons: affected.iter().map(|p| Icon::for_player(p)).collect(),
            affected: affected.iter().map(|p| p.id.clone()).collect(),
            num_victim: num_victim as u32,
            victim_outcome,
            attacker_outcome,
            mention_string,
            ..Default::default()
        }
    }

    pub fn victims(&self) -> &[PlayerId] {
        let n = (self.num_victim as usize).min(self.affected.len());
        &self.affected[..n]
    }

    pub fn attackers(&self) -> &[PlayerId] {
        let n = (self.num_victim as usize).min(self.affected.len());
        &self.affected[n..]
    }

    pub fn involves(&self, player: &PlayerId) -> bool {
        self.affected.iter().any(|p| p == player)
    }

    pub fn push_sub_message(&mut self, line: &str) {
        if !self.sub_message.is_empty() {
            self.sub_message.push('\n');
        }
        self.sub_message.push_str(line);
    }
}
