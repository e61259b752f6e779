//! Weapon definitions and the merged default + custom weapon table

use crate::events::event::{Event, EventKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A weapon and the events it can be used in
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeaponEvent {
    /// Display name; may contain `[C singular|plural]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Name of one unit of ammunition; may contain `[C singular|plural]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumable: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<Event>,
    #[serde(default)]
    pub custom: bool,
}

impl WeaponEvent {
    pub fn new(name: impl Into<String>, outcomes: Vec<Event>) -> Self {
        Self {
            name: Some(name.into()),
            consumable: None,
            outcomes: outcomes
                .into_iter()
                .map(|mut e| {
                    e.kind = EventKind::Weapon;
                    e
                })
                .collect(),
            custom: false,
        }
    }

    pub fn with_consumable(mut self, consumable: impl Into<String>) -> Self {
        self.consumable = Some(consumable.into());
        self
    }

    /// Display name, falling back to the weapon id
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(id)
    }
}

fn default_weapon_message() -> String {
    "{attacker} {action} {victim} with {weapon}.".to_string()
}

/// All weapons known to a game, keyed by weapon id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTable {
    /// Template used when a weapon outcome has no message of its own
    #[serde(default = "default_weapon_message")]
    pub message: String,
    #[serde(default)]
    pub weapons: BTreeMap<String, WeaponEvent>,
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            message: default_weapon_message(),
            weapons: BTreeMap::new(),
        }
    }
}

impl WeaponTable {
    pub fn get(&self, id: &str) -> Option<&WeaponEvent> {
        self.weapons.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.weapons.contains_key(id)
    }

    /// Merge custom weapons on top of this table.
    ///
    /// A custom weapon sharing an id with a default one adds its outcomes to
    /// the default's; new ids are inserted as-is.
    pub fn merged_with(&self, custom: &BTreeMap<String, WeaponEvent>) -> WeaponTable {
        let mut merged = self.clone();
        for (id, weapon) in custom {
            match merged.weapons.get_mut(id) {
                Some(existing) => existing.outcomes.extend(weapon.outcomes.iter().cloned()),
                None => {
                    merged.weapons.insert(id.clone(), weapon.clone());
                }
            }
        }
        merged
    }

    /// Drop weapon outcomes whose `"<weaponId>/<outcomeId>"` is disabled.
    pub fn without_disabled(mut self, is_disabled: impl Fn(&str) -> bool) -> WeaponTable {
        for (id, weapon) in self.weapons.iter_mut() {
            weapon.outcomes.retain(|outcome| match &outcome.id {
                Some(oid) => !is_disabled(&crate::core::types::EventId::child(id, oid)),
                None => true,
            });
        }
        self
    }
}
