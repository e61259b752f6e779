//! Property tests for weighted draws and weapon inventories

use hungry_games::game::Player;
use hungry_games::simulation::constants::MULTI_EVENT_USER_DISTRIBUTION;
use hungry_games::simulation::weighted::{pick_custom_weighted, weighted_user_rand};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn weighted_user_rand_mostly_draws_one() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let draws = 20_000;
    let ones = (0..draws).filter(|_| weighted_user_rand(&mut rng) == 1).count();
    let share = ones as f64 / draws as f64;
    assert!((share - 0.66).abs() < 0.02, "share of ones was {}", share);
}

proptest! {
    #[test]
    fn weighted_user_rand_stays_in_distribution(seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..64 {
            let n = weighted_user_rand(&mut rng);
            prop_assert!(MULTI_EVENT_USER_DISTRIBUTION.iter().any(|(count, _)| *count == n));
        }
    }

    #[test]
    fn custom_weighted_pick_in_bounds(
        flags in prop::collection::vec(any::<bool>(), 1..32),
        weight in 0.0f64..10.0,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let index = pick_custom_weighted(&flags, weight, &mut rng);
        prop_assert!(matches!(index, Some(i) if i < flags.len()));
    }

    #[test]
    fn weapon_counts_never_negative(
        start in 0u32..20,
        deltas in prop::collection::vec(-10i64..10, 0..24),
    ) {
        let mut player = Player::new("1", "A");
        if start > 0 {
            player = player.with_weapon("sword", start);
        }
        for delta in deltas {
            let left = player.adjust_weapon("sword", delta);
            prop_assert_eq!(left, player.weapon_count("sword"));
            if left == 0 {
                prop_assert!(!player.weapons.contains_key("sword"));
            }
        }
        prop_assert!(player.weapons.values().all(|&c| c >= 1));
    }
}
