//! Simulation constants: retry caps, summary thresholds and the
//! participant-count distribution.

/// Attempts the event picker makes before giving up
pub const MAX_PICK_ATTEMPTS: usize = 100;

/// Draws tried when resolving "at least N" counts for one event
pub const MAX_COUNT_RESOLVE_ATTEMPTS: usize = 100;

/// Category re-draws before falling back to a uniform pick
pub const MAX_CATEGORY_REDRAWS: usize = 10;

/// Rounds after which a battle is considered stuck
pub const MAX_BATTLE_ROUNDS: usize = 1000;

/// Events killing more than this many players earn a slaughter line
pub const SLAUGHTER_THRESHOLD: u32 = 4;

/// Share of the day's starting players killed above which the day is
/// announced as a bloodbath
pub const LOTS_OF_DEATH_RATE: f64 = 0.75;

/// Share below which the day is announced as quiet
pub const LITTLE_DEATH_RATE: f64 = 0.15;

/// Relative likelihood of each participant count for "at least" roles and
/// battles, as (count, probability). Probabilities sum to 1.
pub const MULTI_EVENT_USER_DISTRIBUTION: [(u32, f64); 9] = [
    (1, 0.66),
    (2, 0.259),
    (3, 0.03),
    (4, 0.02),
    (5, 0.01),
    (6, 0.015),
    (7, 0.005),
    (8, 0.0005),
    (9, 0.0005),
];

pub const BATTLE_BANNER: &str = "**A battle has broken out!**";

pub const FIST_LEFT_ICON: &str = "./img/fist_left.png";
pub const FIST_RIGHT_ICON: &str = "./img/fist_right.png";
pub const FIST_BOTH_ICON: &str = "./img/fist_both.png";
