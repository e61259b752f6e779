//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a participant (a guild member id or an NPC id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Team identifier, unique within one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

/// Guild (server) identifier; one game runs per guild
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(pub String);

impl GuildId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque event identifier.
///
/// Built-in events use short stable ids from the data files. Custom events
/// use `<creatorId>/<timestampMs>-<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate an id for a newly authored custom event.
    pub fn generate_custom(creator: &str, timestamp_ms: u64) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}/{}-{}", creator, timestamp_ms, &suffix[..8]))
    }

    /// Whether this id has the shape of a custom event id.
    pub fn is_custom_format(&self) -> bool {
        let Some((creator, rest)) = self.0.split_once('/') else {
            return false;
        };
        let Some((stamp, suffix)) = rest.split_once('-') else {
            return false;
        };
        (17..=19).contains(&creator.len())
            && creator.bytes().all(|b| b.is_ascii_digit())
            && !stamp.is_empty()
            && stamp.bytes().all(|b| b.is_ascii_digit())
            && !suffix.is_empty()
            && suffix
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
    }

    /// Id of a sub-outcome of an arena or weapon event.
    pub fn child(parent: &str, outcome: &EventId) -> String {
        format!("{}/{}", parent, outcome.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
