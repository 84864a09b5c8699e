//! Mean helpers shared by the encoder and the scorer.
//!
//! Harmonic means let the weakest input dominate the result. Inputs at or
//! below zero are floored to [`HARMONIC_EPSILON`] so a single zero drags the
//! mean toward zero without making it exactly zero.

/// Floor applied to every harmonic-mean input.
pub const HARMONIC_EPSILON: f64 = 1e-3;

/// `n / Σ(1/xᵢ)` with each `xᵢ` floored to [`HARMONIC_EPSILON`].
///
/// Returns `0.0` for an empty slice.
pub fn harmonic_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let reciprocal_sum: f64 = values.iter().map(|v| 1.0 / floor(*v)).sum();
    values.len() as f64 / reciprocal_sum
}

/// `Σwᵢ / Σ(wᵢ/xᵢ)` over `(weight, value)` pairs.
///
/// Pairs with non-positive weight are ignored; returns `0.0` when nothing is
/// left.
pub fn weighted_harmonic_mean(pairs: &[(f64, f64)]) -> f64 {
    let mut weight_sum = 0.0;
    let mut reciprocal_sum = 0.0;
    for &(weight, value) in pairs {
        if weight <= 0.0 || !weight.is_finite() {
            continue;
        }
        weight_sum += weight;
        reciprocal_sum += weight / floor(value);
    }

    if weight_sum <= 0.0 {
        0.0
    } else {
        weight_sum / reciprocal_sum
    }
}

pub fn arithmetic_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn floor(value: f64) -> f64 {
    if value.is_finite() {
        value.max(HARMONIC_EPSILON)
    } else {
        HARMONIC_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_harmonic_mean_known_values() {
        assert_eq!(harmonic_mean(&[]), 0.0);
        assert!((harmonic_mean(&[7.5; 5]) - 7.5).abs() < 1e-12);
        let uneven = harmonic_mean(&[9.0, 9.0, 9.0, 9.0, 3.0]);
        assert!((uneven - 45.0 / 7.0).abs() < 1e-9);
        assert!(uneven < 7.5);
    }

    #[test]
    fn test_zero_is_floored_not_fatal() {
        let mean = harmonic_mean(&[10.0, 10.0, 0.0]);
        assert!(mean > 0.0);
        assert!(mean < 0.01);
    }

    #[test]
    fn test_weighted_harmonic_mean() {
        let even = weighted_harmonic_mean(&[(1.0, 4.0), (1.0, 4.0)]);
        assert!((even - 4.0).abs() < 1e-12);

        let skewed = weighted_harmonic_mean(&[(0.9, 10.0), (0.1, 1.0)]);
        assert!(skewed > 1.0 && skewed < 10.0);
        assert_eq!(weighted_harmonic_mean(&[(0.0, 5.0)]), 0.0);
    }

    proptest! {
        #[test]
        fn property_harmonic_never_exceeds_arithmetic(values in proptest::collection::vec(0.01f64..10.0, 1..8)) {
            let hm = harmonic_mean(&values);
            let am = arithmetic_mean(&values);
            prop_assert!(hm <= am + 1e-9);
        }

        #[test]
        fn property_equal_values_have_equal_means(value in 0.01f64..10.0, n in 1usize..8) {
            let values = vec![value; n];
            prop_assert!((harmonic_mean(&values) - arithmetic_mean(&values)).abs() < 1e-9);
        }

        #[test]
        fn property_unequal_values_are_strictly_below(a in 0.01f64..5.0, gap in 0.5f64..5.0) {
            let values = [a, a + gap];
            prop_assert!(harmonic_mean(&values) < arithmetic_mean(&values));
        }
    }
}
