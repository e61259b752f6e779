//! Battle catalog: opening lines, per-round attacks, and closing lines

use serde::{Deserialize, Serialize};

/// Damage dealt to one side of an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Damage {
    #[serde(default)]
    pub damage: u32,
}

/// One round of a battle between a single victim and a single attacker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackTemplate {
    pub message: String,
    #[serde(default)]
    pub attacker: Damage,
    #[serde(default)]
    pub victim: Damage,
}

impl AttackTemplate {
    pub fn new(message: impl Into<String>, victim_damage: u32, attacker_damage: u32) -> Self {
        Self {
            message: message.into(),
            attacker: Damage {
                damage: attacker_damage,
            },
            victim: Damage {
                damage: victim_damage,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BattleCatalog {
    #[serde(default)]
    pub starts: Vec<String>,
    #[serde(default)]
    pub attacks: Vec<AttackTemplate>,
    #[serde(default)]
    pub outcomes: Vec<String>,
}

impl BattleCatalog {
    /// A battle needs at least one of each kind of line and one attack that
    /// can hurt a victim.
    pub fn is_usable(&self) -> bool {
        !self.starts.is_empty()
            && !self.outcomes.is_empty()
            && self.attacks.iter().any(|a| a.victim.damage > 0 || a.attacker.damage > 0)
    }
}
