//! Validation of authored (custom) events.
//!
//! Authoring input arrives as loosely typed JSON: booleans may be the strings
//! `"true"`/`"false"` and counts may be numeric strings. Validation coerces
//! those and reports the first problem as a reason code.

use crate::core::types::EventId;
use crate::events::arena::ArenaEvent;
use crate::events::event::{Consumes, Event, EventKind, Role, WeaponGrant};
use crate::events::outcome::{Outcome, OutcomeProbabilities};
use crate::events::weapon::{WeaponEvent, WeaponTable};
use serde_json::{Map, Value};
use thiserror::Error;

const MAX_TEXT_LEN: usize = 1000;
const MAX_CONSUMES_LEN: usize = 100;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("BAD_MESSAGE")]
    BadMessage,
    #[error("BAD_ACTION")]
    BadAction,
    #[error("BAD_BATTLE")]
    BadBattle,
    #[error("BAD_CONSUMES")]
    BadConsumes,
    #[error("BAD_DATA")]
    BadData,
    #[error("BAD_VICTIM_OUTCOME")]
    BadVictimOutcome,
    #[error("BAD_VICTIM_KILLER")]
    BadVictimKiller,
    #[error("BAD_VICTIM_WEAPON")]
    BadVictimWeapon,
    #[error("BAD_ATTACKER_OUTCOME")]
    BadAttackerOutcome,
    #[error("BAD_ATTACKER_KILLER")]
    BadAttackerKiller,
    #[error("BAD_ATTACKER_WEAPON")]
    BadAttackerWeapon,
    #[error("BAD_OUTCOMES")]
    BadOutcomes,
    #[error("BAD_ID")]
    BadId,
}

#[derive(Clone, Copy)]
enum Side {
    Victim,
    Attacker,
}

impl Side {
    fn outcome_err(self) -> ValidationError {
        match self {
            Side::Victim => ValidationError::BadVictimOutcome,
            Side::Attacker => ValidationError::BadAttackerOutcome,
        }
    }

    fn killer_err(self) -> ValidationError {
        match self {
            Side::Victim => ValidationError::BadVictimKiller,
            Side::Attacker => ValidationError::BadAttackerKiller,
        }
    }

    fn weapon_err(self) -> ValidationError {
        match self {
            Side::Victim => ValidationError::BadVictimWeapon,
            Side::Attacker => ValidationError::BadAttackerWeapon,
        }
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, ()> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if !s.is_empty() && s.len() <= MAX_TEXT_LEN => Ok(Some(s.clone())),
        Some(_) => Err(()),
    }
}

fn validate_role(value: Option<&Value>, side: Side) -> Result<Role, ValidationError> {
    let Some(value) = value else {
        return Ok(Role::default());
    };
    let obj = value.as_object().ok_or(ValidationError::BadData)?;

    let outcome = match obj.get("outcome") {
        Some(Value::String(s)) => Outcome::parse(s).ok_or(side.outcome_err())?,
        _ => return Err(side.outcome_err()),
    };
    let count = obj
        .get("count")
        .and_then(as_int)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(ValidationError::BadData)?;
    let killer = match obj.get("killer") {
        None | Some(Value::Null) => false,
        Some(v) => as_bool(v).ok_or(side.killer_err())?,
    };
    let weapon = match obj.get("weapon") {
        None | Some(Value::Null) => None,
        Some(Value::Object(w)) => {
            let id = w
                .get("id")
                .and_then(Value::as_str)
                .ok_or(side.weapon_err())?
                .to_string();
            let count = w
                .get("count")
                .and_then(as_int)
                .and_then(|n| i32::try_from(n).ok())
                .ok_or(side.weapon_err())?;
            Some(WeaponGrant { id, count })
        }
        Some(_) => return Err(side.weapon_err()),
    };

    Ok(Role {
        count,
        outcome,
        killer,
        weapon,
    })
}

fn validate_id(obj: &Map<String, Value>) -> Result<Option<EventId>, ValidationError> {
    match obj.get("id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(EventId::new(s.clone()))),
        Some(_) => Err(ValidationError::BadId),
    }
}

/// Validate an authored normal or weapon outcome event.
pub fn validate_event(value: &Value) -> Result<Event, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::BadData)?;
    let id = validate_id(obj)?;

    let message = text_field(obj, "message").map_err(|_| ValidationError::BadMessage)?;
    let action = text_field(obj, "action").map_err(|_| ValidationError::BadAction)?;
    if message.is_none() && action.is_none() {
        return Err(ValidationError::BadMessage);
    }

    let battle = match obj.get("battle") {
        None | Some(Value::Null) => false,
        Some(v) => as_bool(v).ok_or(ValidationError::BadBattle)?,
    };

    let consumes = match obj.get("consumes") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(Consumes::Fixed(
            n.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(ValidationError::BadConsumes)?,
        )),
        Some(Value::String(s)) if !s.is_empty() && s.len() <= MAX_CONSUMES_LEN => {
            Some(Consumes::parse(s).ok_or(ValidationError::BadConsumes)?)
        }
        Some(_) => return Err(ValidationError::BadConsumes),
    };

    let victim = validate_role(obj.get("victim"), Side::Victim)?;
    let attacker = validate_role(obj.get("attacker"), Side::Attacker)?;

    Ok(Event {
        id,
        message: message.unwrap_or_default(),
        action,
        kind: if battle { EventKind::Battle } else { EventKind::Normal },
        victim,
        attacker,
        consumes,
        custom: true,
    })
}

fn validate_outcomes(obj: &Map<String, Value>) -> Result<Vec<Event>, ValidationError> {
    let list = obj
        .get("outcomes")
        .and_then(Value::as_array)
        .ok_or(ValidationError::BadOutcomes)?;
    if list.is_empty() {
        return Err(ValidationError::BadOutcomes);
    }
    list.iter().map(validate_event).collect()
}

/// Validate an authored arena event and all of its sub-outcomes.
pub fn validate_arena_event(value: &Value) -> Result<ArenaEvent, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::BadData)?;
    let id = validate_id(obj)?.ok_or(ValidationError::BadId)?;
    let message = text_field(obj, "message")
        .map_err(|_| ValidationError::BadMessage)?
        .ok_or(ValidationError::BadMessage)?;
    let outcomes = validate_outcomes(obj)?
        .into_iter()
        .map(|mut e| {
            e.kind = EventKind::Arena;
            e
        })
        .collect();
    let outcome_probs = match obj.get("outcomeProbs") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            serde_json::from_value::<OutcomeProbabilities>(v.clone())
                .map_err(|_| ValidationError::BadData)?,
        ),
    };
    Ok(ArenaEvent {
        id,
        message,
        outcomes,
        outcome_probs,
        custom: true,
    })
}

/// Validate an authored weapon and its outcome events.
pub fn validate_weapon_event(value: &Value) -> Result<WeaponEvent, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::BadData)?;
    let name = text_field(obj, "name").map_err(|_| ValidationError::BadData)?;
    let consumable = text_field(obj, "consumable").map_err(|_| ValidationError::BadData)?;
    let outcomes = validate_outcomes(obj)?
        .into_iter()
        .map(|mut e| {
            e.kind = EventKind::Weapon;
            e
        })
        .collect();
    Ok(WeaponEvent {
        name,
        consumable,
        outcomes,
        custom: true,
    })
}

/// Ensure every weapon an event grants or takes exists in the table.
pub fn check_weapon_references(event: &Event, weapons: &WeaponTable) -> Result<(), ValidationError> {
    if let Some(w) = &event.victim.weapon {
        if !weapons.contains(&w.id) {
            return Err(ValidationError::BadVictimWeapon);
        }
    }
    if let Some(w) = &event.attacker.weapon {
        if !weapons.contains(&w.id) {
            return Err(ValidationError::BadAttackerWeapon);
        }
    }
    Ok(())
}
