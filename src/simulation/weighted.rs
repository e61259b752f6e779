//! Weighted random draws shared by the picker, assigner and battles

use crate::simulation::constants::MULTI_EVENT_USER_DISTRIBUTION;
use rand::Rng;

/// Draw a participant count from the multi-event distribution.
///
/// Always returns a count present in the distribution; rounding slack at the
/// top of the range falls on the largest count.
pub fn weighted_user_rand<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let roll: f64 = rng.gen();
    let mut sum = 0.0;
    for (count, probability) in MULTI_EVENT_USER_DISTRIBUTION {
        sum += probability;
        if roll < sum {
            return count;
        }
    }
    MULTI_EVENT_USER_DISTRIBUTION[MULTI_EVENT_USER_DISTRIBUTION.len() - 1].0
}

/// Pick an index where custom entries weigh `custom_weight` and built-in
/// entries weigh 1.
///
/// Returns `None` for an empty list. A non-positive total (for example every
/// entry custom with a zero weight) falls back to a uniform pick.
pub fn pick_custom_weighted<R: Rng + ?Sized>(
    custom_flags: &[bool],
    custom_weight: f64,
    rng: &mut R,
) -> Option<usize> {
    if custom_flags.is_empty() {
        return None;
    }
    let custom_weight = if custom_weight.is_finite() {
        custom_weight.max(0.0)
    } else {
        1.0
    };
    let weight_of = |custom: bool| if custom { custom_weight } else { 1.0 };
    let total: f64 = custom_flags.iter().map(|c| weight_of(*c)).sum();
    if total <= 0.0 {
        return Some(rng.gen_range(0..custom_flags.len()));
    }

    let mut pick = rng.gen::<f64>() * total;
    for (i, custom) in custom_flags.iter().enumerate() {
        let weight = weight_of(*custom);
        if weight <= 0.0 {
            continue;
        }
        if pick < weight {
            return Some(i);
        }
        pick -= weight;
    }
    custom_flags.iter().rposition(|c| weight_of(*c) > 0.0)
}
