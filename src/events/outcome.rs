//! Outcome kinds and the relative weights used to draw them

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens to a participant filling an event role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Nothing,
    Dies,
    Wounded,
    Thrives,
    Revived,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Nothing => "nothing",
            Outcome::Dies => "dies",
            Outcome::Wounded => "wounded",
            Outcome::Thrives => "thrives",
            Outcome::Revived => "revived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "nothing" => Some(Outcome::Nothing),
            "dies" => Some(Outcome::Dies),
            "wounded" => Some(Outcome::Wounded),
            "thrives" => Some(Outcome::Thrives),
            "revived" => Some(Outcome::Revived),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative weights of the five outcome categories.
///
/// Weights are relative, not percentages. Missing fields deserialize to 0 and
/// negative weights are treated as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    #[serde(default)]
    pub kill: f64,
    #[serde(default)]
    pub wound: f64,
    #[serde(default)]
    pub thrive: f64,
    #[serde(default)]
    pub revive: f64,
    #[serde(default)]
    pub nothing: f64,
}

impl OutcomeProbabilities {
    pub const fn new(kill: f64, wound: f64, thrive: f64, revive: f64, nothing: f64) -> Self {
        Self {
            kill,
            wound,
            thrive,
            revive,
            nothing,
        }
    }

    pub fn bloodbath_default() -> Self {
        Self::new(30.0, 6.0, 8.0, 0.0, 56.0)
    }

    pub fn player_default() -> Self {
        Self::new(22.0, 4.0, 8.0, 6.0, 60.0)
    }

    pub fn arena_default() -> Self {
        Self::new(64.0, 10.0, 5.0, 6.0, 15.0)
    }

    /// Weight of a category, clamped to be non-negative
    pub fn weight(&self, outcome: Outcome) -> f64 {
        let raw = match outcome {
            Outcome::Dies => self.kill,
            Outcome::Wounded => self.wound,
            Outcome::Thrives => self.thrive,
            Outcome::Revived => self.revive,
            Outcome::Nothing => self.nothing,
        };
        if raw.is_finite() {
            raw.max(0.0)
        } else {
            0.0
        }
    }

    pub fn total(&self) -> f64 {
        CATEGORY_ORDER.iter().map(|o| self.weight(*o)).sum()
    }

    /// Map a value in `[0, total)` to a category.
    ///
    /// Subtraction order is nothing, revive, thrive, wound; whatever is left
    /// falls through to dies.
    pub fn category_for(&self, value: f64) -> Outcome {
        let mut remaining = self.total();
        for outcome in CATEGORY_ORDER {
            remaining -= self.weight(outcome);
            if value > remaining {
                return outcome;
            }
        }
        Outcome::Dies
    }
}

impl Default for OutcomeProbabilities {
    fn default() -> Self {
        Self::player_default()
    }
}

const CATEGORY_ORDER: [Outcome; 4] = [
    Outcome::Nothing,
    Outcome::Revived,
    Outcome::Thrives,
    Outcome::Wounded,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        let probs = OutcomeProbabilities::new(10.0, 10.0, 10.0, 10.0, 10.0);
        assert_eq!(probs.total(), 50.0);
        assert_eq!(probs.category_for(49.0), Outcome::Nothing);
        assert_eq!(probs.category_for(35.0), Outcome::Revived);
        assert_eq!(probs.category_for(25.0), Outcome::Thrives);
        assert_eq!(probs.category_for(15.0), Outcome::Wounded);
        assert_eq!(probs.category_for(5.0), Outcome::Dies);
    }

    #[test]
    fn test_zero_weight_category_never_drawn() {
        let probs = OutcomeProbabilities::bloodbath_default();
        for step in 0..1000 {
            let value = probs.total() * step as f64 / 1000.0;
            assert_ne!(probs.category_for(value), Outcome::Revived);
        }
    }

    #[test]
    fn test_negative_weights_clamped() {
        let probs = OutcomeProbabilities::new(-5.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(probs.weight(Outcome::Dies), 0.0);
        assert_eq!(probs.total(), 1.0);
    }

    #[test]
    fn test_missing_fields_are_zero() {
        let probs: OutcomeProbabilities = serde_json::from_str(r#"{"kill": 3}"#).unwrap();
        assert_eq!(probs.kill, 3.0);
        assert_eq!(probs.nothing, 0.0);
    }
}
