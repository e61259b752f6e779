//! Participants of a game

use crate::core::types::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    #[default]
    Normal,
    Wounded,
    Dead,
    /// Revived today; reset to normal when the next day starts
    Zombie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub nickname: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub is_npc: bool,
    pub living: bool,
    pub state: PlayerState,
    /// Placement, 1 being the best
    pub rank: u32,
    pub kills: u32,
    /// Days this player has been bleeding from a wound
    pub bleeding: u32,
    /// Weapon id to count; counts are always at least 1
    #[serde(default)]
    pub weapons: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_death: Option<i32>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl Player {
    /// New living player. Backticks in names would break name formatting and
    /// are replaced.
    pub fn new(id: impl Into<String>, name: &str) -> Self {
        let name = sanitize_name(name);
        Self {
            id: PlayerId::new(id),
            nickname: name.clone(),
            name,
            avatar_url: String::new(),
            is_npc: false,
            living: true,
            state: PlayerState::Normal,
            rank: 1,
            kills: 0,
            bleeding: 0,
            weapons: BTreeMap::new(),
            day_of_death: None,
            settings: BTreeMap::new(),
        }
    }

    pub fn npc(id: impl Into<String>, name: &str, avatar_url: impl Into<String>) -> Self {
        let mut player = Self::new(id, name);
        player.is_npc = true;
        player.avatar_url = avatar_url.into();
        player
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = sanitize_name(nickname);
        self
    }

    pub fn with_weapon(mut self, weapon: &str, count: u32) -> Self {
        if count > 0 {
            self.weapons.insert(weapon.to_string(), count);
        }
        self
    }

    pub fn weapon_count(&self, weapon: &str) -> u32 {
        self.weapons.get(weapon).copied().unwrap_or(0)
    }

    pub fn has_weapons(&self) -> bool {
        !self.weapons.is_empty()
    }

    /// Add (or with a negative delta, remove) weapons. Entries that reach 0
    /// are removed. Returns the new count.
    pub fn adjust_weapon(&mut self, weapon: &str, delta: i64) -> u32 {
        let current = self.weapon_count(weapon) as i64;
        let next = current + delta;
        if next <= 0 {
            self.weapons.remove(weapon);
            0
        } else {
            let next = u32::try_from(next).unwrap_or(u32::MAX);
            self.weapons.insert(weapon.to_string(), next);
            next
        }
    }

    pub fn display_name(&self, use_nickname: bool) -> &str {
        if use_nickname && !self.nickname.is_empty() {
            &self.nickname
        } else {
            &self.name
        }
    }
}

fn sanitize_name(name: &str) -> String {
    name.replace('`', "\\`")
}
