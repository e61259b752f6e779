//! Arena events: a day-wide scenario with its own pool of sub-outcomes

use crate::core::types::EventId;
use crate::events::event::{Event, EventKind};
use crate::events::outcome::OutcomeProbabilities;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaEvent {
    pub id: EventId,
    pub message: String,
    #[serde(default)]
    pub outcomes: Vec<Event>,
    /// Overrides the guild's arena outcome weights while this arena runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_probs: Option<OutcomeProbabilities>,
    #[serde(default)]
    pub custom: bool,
}

impl ArenaEvent {
    pub fn new(id: impl Into<String>, message: impl Into<String>, outcomes: Vec<Event>) -> Self {
        Self {
            id: EventId::new(id),
            message: message.into(),
            outcomes: outcomes
                .into_iter()
                .map(|mut e| {
                    e.kind = EventKind::Arena;
                    e
                })
                .collect(),
            outcome_probs: None,
            custom: false,
        }
    }

    /// Sub-outcomes not disabled by `is_disabled(sub_id)`.
    ///
    /// Sub-outcome ids are `"<arenaId>/<outcomeId>"`; outcomes without an id
    /// are always enabled.
    pub fn enabled_outcomes(&self, is_disabled: impl Fn(&str) -> bool) -> Vec<Event> {
        self.outcomes
            .iter()
            .filter(|outcome| match &outcome.id {
                Some(id) => !is_disabled(&EventId::child(self.id.as_str(), id)),
                None => true,
            })
            .cloned()
            .collect()
    }
}
