//! Narrative message templates keyed by message kind

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every message kind the day simulation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    EventStart,
    EventEnd,
    Slaughter,
    PatchWounds,
    BleedOut,
    LotsOfDeath,
    NoDeath,
    LittleDeath,
    ForcedDeath,
    ForcedHeal,
    ForcedWound,
    TakeWeapon,
    GiveWeapon,
}

impl MessageKind {
    pub fn key(&self) -> &'static str {
        match self {
            MessageKind::EventStart => "eventStart",
            MessageKind::EventEnd => "eventEnd",
            MessageKind::Slaughter => "slaughter",
            MessageKind::PatchWounds => "patchWounds",
            MessageKind::BleedOut => "bleedOut",
            MessageKind::LotsOfDeath => "lotsOfDeath",
            MessageKind::NoDeath => "noDeath",
            MessageKind::LittleDeath => "littleDeath",
            MessageKind::ForcedDeath => "forcedDeath",
            MessageKind::ForcedHeal => "forcedHeal",
            MessageKind::ForcedWound => "forcedWound",
            MessageKind::TakeWeapon => "takeWeapon",
            MessageKind::GiveWeapon => "giveWeapon",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTemplates {
    templates: BTreeMap<String, Vec<String>>,
}

impl MessageTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> crate::core::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, kind: MessageKind, lines: Vec<String>) {
        self.templates.insert(kind.key().to_string(), lines);
    }

    /// A random template of the given kind.
    ///
    /// Returns `"badtype"` when the kind is unknown and `"nomessage"` when it
    /// has no templates.
    pub fn get<R: Rng + ?Sized>(&self, kind: MessageKind, rng: &mut R) -> String {
        match self.templates.get(kind.key()) {
            None => "badtype".to_string(),
            Some(list) => list
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "nomessage".to_string()),
        }
    }
}
