use rand::Rng;

use crate::models::wheelmodels::WheelPrize;

/// Weighted random choice over the configured prize list.
///
/// The draw is taken over the actual sum of the weights rather than an
/// assumed total of 100, so a prize list whose weights add up to 97 or 130
/// still selects every prize in proportion to its weight.
pub fn total_weight(prizes: &[WheelPrize]) -> f64 {
    prizes.iter().map(|p| p.weight.max(0.0)).sum()
}

/// Selects the first prize whose cumulative weight exceeds `draw`, where
/// `draw` lies in `[0, total_weight)`. Returns `None` for an empty or
/// zero-weight prize list.
pub fn pick_prize(prizes: &[WheelPrize], draw: f64) -> Option<&WheelPrize> {
    let total = total_weight(prizes);
    if total <= 0.0 {
        return None;
    }

    let mut cumulative = 0.0;
    for prize in prizes {
        cumulative += prize.weight.max(0.0);
        if draw < cumulative {
            return Some(prize);
        }
    }

    // Floating-point edge: a draw equal to the total lands on the last
    // positive-weight prize.
    prizes.iter().rev().find(|p| p.weight > 0.0)
}

pub fn draw_prize<'a, R: Rng>(prizes: &'a [WheelPrize], rng: &mut R) -> Option<&'a WheelPrize> {
    let total = total_weight(prizes);
    if total <= 0.0 {
        return None;
    }
    let draw = rng.random_range(0.0..total);
    pick_prize(prizes, draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn prizes(weights: &[(i64, f64)]) -> Vec<WheelPrize> {
        weights
            .iter()
            .enumerate()
            .map(|(i, (amount, weight))| WheelPrize {
                label: format!("prize-{}", i),
                amount: *amount,
                weight: *weight,
            })
            .collect()
    }

    #[test]
    fn picks_by_cumulative_walk() {
        let list = prizes(&[(1_000, 50.0), (5_000, 30.0), (10_000, 20.0)]);

        assert_eq!(pick_prize(&list, 0.0).unwrap().amount, 1_000);
        assert_eq!(pick_prize(&list, 49.9).unwrap().amount, 1_000);
        assert_eq!(pick_prize(&list, 50.0).unwrap().amount, 5_000);
        assert_eq!(pick_prize(&list, 79.9).unwrap().amount, 5_000);
        assert_eq!(pick_prize(&list, 80.0).unwrap().amount, 10_000);
        assert_eq!(pick_prize(&list, 99.9).unwrap().amount, 10_000);
    }

    #[test]
    fn handles_weights_that_do_not_sum_to_100() {
        // Sums to 60; the draw space is [0, 60) so both prizes stay reachable.
        let list = prizes(&[(100, 40.0), (200, 20.0)]);
        assert_eq!(pick_prize(&list, 39.9).unwrap().amount, 100);
        assert_eq!(pick_prize(&list, 40.0).unwrap().amount, 200);
        assert_eq!(pick_prize(&list, 59.9).unwrap().amount, 200);
    }

    #[test]
    fn empty_or_zero_weight_list_yields_none() {
        assert!(pick_prize(&[], 10.0).is_none());
        let list = prizes(&[(100, 0.0)]);
        assert!(pick_prize(&list, 0.0).is_none());
    }

    #[test]
    fn zero_weight_prizes_are_never_selected() {
        let list = prizes(&[(100, 0.0), (200, 50.0)]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert_eq!(draw_prize(&list, &mut rng).unwrap().amount, 200);
        }
    }

    #[test]
    fn empirical_frequency_converges_to_configured_weights() {
        let list = prizes(&[(1_000, 60.0), (5_000, 30.0), (20_000, 10.0)]);
        let mut rng = StdRng::seed_from_u64(42);

        let trials = 200_000;
        let mut counts = [0u32; 3];
        for _ in 0..trials {
            let prize = draw_prize(&list, &mut rng).unwrap();
            let idx = list.iter().position(|p| p == prize).unwrap();
            counts[idx] += 1;
        }

        let total = total_weight(&list);
        for (i, prize) in list.iter().enumerate() {
            let expected = prize.weight / total;
            let observed = counts[i] as f64 / trials as f64;
            // Tolerance band of one percentage point over 200k trials.
            assert!(
                (observed - expected).abs() < 0.01,
                "prize {} observed {:.4}, expected {:.4}",
                i,
                observed,
                expected
            );
        }
    }
}
