//! Event templates: narrative steps with role counts and outcomes

use crate::core::types::EventId;
use crate::events::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// Where an event template came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Normal,
    Arena,
    Weapon,
    Battle,
}

/// A weapon granted (positive count) or taken (negative count) by a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponGrant {
    pub id: String,
    #[serde(default = "default_weapon_count")]
    pub count: i32,
}

fn default_weapon_count() -> i32 {
    1
}

/// One side of an event (victims or attackers)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Role {
    /// Exact count when positive, "at least |count|" when negative
    #[serde(default)]
    pub count: i32,
    #[serde(default)]
    pub outcome: Outcome,
    /// Whether members of this role get kill credit for the other role
    #[serde(default)]
    pub killer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<WeaponGrant>,
}

impl Role {
    pub fn new(count: i32, outcome: Outcome) -> Self {
        Self {
            count,
            outcome,
            killer: false,
            weapon: None,
        }
    }

    /// Smallest number of participants this role can take
    pub fn min_count(&self) -> u32 {
        self.count.unsigned_abs()
    }

    pub fn is_at_least(&self) -> bool {
        self.count < 0
    }

    pub fn is_revived(&self) -> bool {
        self.outcome == Outcome::Revived
    }
}

/// Weapon consumption specifier.
///
/// Written in data as an integer, a numeric string, or `"<n>V"` / `"<n>A"`
/// for n times the number of victims / attackers (bare `"V"` means 1x).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConsumeRaw", into = "ConsumeRaw")]
pub enum Consumes {
    Fixed(u32),
    PerVictim(u32),
    PerAttacker(u32),
}

impl Consumes {
    pub fn resolve(&self, num_victim: u32, num_attacker: u32) -> u32 {
        match *self {
            Consumes::Fixed(n) => n,
            Consumes::PerVictim(n) => n.saturating_mul(num_victim),
            Consumes::PerAttacker(n) => n.saturating_mul(num_attacker),
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (digits, ctor): (&str, fn(u32) -> Consumes) = if let Some(d) = text.strip_suffix('V') {
            (d, Consumes::PerVictim)
        } else if let Some(d) = text.strip_suffix('A') {
            (d, Consumes::PerAttacker)
        } else {
            return text.parse().ok().map(Consumes::Fixed);
        };
        if digits.is_empty() {
            Some(ctor(1))
        } else {
            digits.parse().ok().map(ctor)
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ConsumeRaw {
    Number(i64),
    Text(String),
}

impl TryFrom<ConsumeRaw> for Consumes {
    type Error = String;

    fn try_from(raw: ConsumeRaw) -> Result<Self, Self::Error> {
        match raw {
            ConsumeRaw::Number(n) => u32::try_from(n)
                .map(Consumes::Fixed)
                .map_err(|_| format!("consume count out of range: {}", n)),
            ConsumeRaw::Text(s) => {
                Consumes::parse(&s).ok_or_else(|| format!("invalid consume specifier: {:?}", s))
            }
        }
    }
}

impl From<Consumes> for ConsumeRaw {
    fn from(c: Consumes) -> Self {
        match c {
            Consumes::Fixed(n) => ConsumeRaw::Number(n as i64),
            Consumes::PerVictim(n) => ConsumeRaw::Text(format!("{}V", n)),
            Consumes::PerAttacker(n) => ConsumeRaw::Text(format!("{}A", n)),
        }
    }
}

/// An event template, or a resolved copy of one.
///
/// Templates stored in the catalog are never mutated; resolving "at least"
/// counts always produces a fresh copy via [`Event::with_counts`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub victim: Role,
    #[serde(default)]
    pub attacker: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Consumes>,
    #[serde(default)]
    pub custom: bool,
}

impl Event {
    pub fn new(
        message: impl Into<String>,
        num_victim: i32,
        num_attacker: i32,
        victim_outcome: Outcome,
        attacker_outcome: Outcome,
    ) -> Self {
        Self {
            message: message.into(),
            victim: Role::new(num_victim, victim_outcome),
            attacker: Role::new(num_attacker, attacker_outcome),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(EventId::new(id));
        self
    }

    pub fn with_killers(mut self, victim: bool, attacker: bool) -> Self {
        self.victim.killer = victim;
        self.attacker.killer = attacker;
        self
    }

    pub fn with_consumes(mut self, consumes: Consumes) -> Self {
        self.consumes = Some(consumes);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn as_custom(mut self) -> Self {
        self.custom = true;
        self
    }

    /// Same text, roles and consumption, ignoring id and origin.
    pub fn same_content(&self, other: &Event) -> bool {
        self.message == other.message
            && self.action == other.action
            && self.consumes == other.consumes
            && self.victim == other.victim
            && self.attacker == other.attacker
    }

    /// Whether the template carries enough text to be shown.
    pub fn is_well_formed(&self) -> bool {
        !self.message.trim().is_empty() || self.action.is_some()
    }

    /// Minimum number of living participants the event needs
    pub fn min_effected(&self) -> u32 {
        let victims = if self.victim.is_revived() { 0 } else { self.victim.min_count() };
        let attackers = if self.attacker.is_revived() { 0 } else { self.attacker.min_count() };
        victims + attackers
    }

    /// Minimum number of dead participants the event needs
    pub fn min_revived(&self) -> u32 {
        let victims = if self.victim.is_revived() { self.victim.min_count() } else { 0 };
        let attackers = if self.attacker.is_revived() { self.attacker.min_count() } else { 0 };
        victims + attackers
    }

    pub fn has_at_least(&self) -> bool {
        self.victim.is_at_least() || self.attacker.is_at_least()
    }

    /// Fresh copy with concrete role counts
    pub fn with_counts(&self, num_victim: u32, num_attacker: u32) -> Event {
        let mut resolved = self.clone();
        resolved.victim.count = num_victim as i32;
        resolved.attacker.count = num_attacker as i32;
        resolved
    }

    /// Whether this event belongs to an outcome category.
    ///
    /// The `nothing` category only holds events where both roles are
    /// unaffected; every other category matches either role.
    pub fn matches_category(&self, category: Outcome) -> bool {
        if category == Outcome::Nothing {
            self.victim.outcome == Outcome::Nothing && self.attacker.outcome == Outcome::Nothing
        } else {
            self.victim.outcome == category || self.attacker.outcome == category
        }
    }

    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.as_str())
    }
}
