/// Stochastic series generators used to seed price-like datasets
use super::rng::SeededRng;

/// Floor applied to every simulated price so chart scales stay meaningful
pub const PRICE_FLOOR: f64 = 0.01;

/// Geometric Brownian Motion price path
///
/// Returns `steps` values starting at `initial`. Each step applies
/// `dS = S * (drift * dt + volatility * dW)` with `dW = U(-1, 1) * sqrt(dt)`
/// and clamps the result to [`PRICE_FLOOR`].
pub fn geometric_brownian_motion(
    initial: f64,
    drift: f64,
    volatility: f64,
    steps: usize,
    dt: f64,
    rng: &mut SeededRng,
) -> Vec<f64> {
    if steps == 0 {
        return Vec::new();
    }

    let mut prices = Vec::with_capacity(steps);
    let mut current = initial.max(PRICE_FLOOR);
    prices.push(current);

    for _ in 1..steps {
        let d_w = rng.range(-1.0, 1.0) * dt.sqrt();
        let d_s = current * (drift * dt + volatility * d_w);
        current = (current + d_s).max(PRICE_FLOOR);
        prices.push(current);
    }

    prices
}

/// Exponential Moving Average over a whole series
///
/// Smoothing factor is `2 / (period + 1)`. The first output equals the first
/// input, so there is no warm-up gap.
pub fn ema(series: &[f64], period: usize) -> Vec<f64> {
    debug_assert!(period > 0, "ema period must be positive");

    let Some(&first) = series.first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(series.len());
    out.push(first);

    let mut prev = first;
    for &value in &series[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        out.push(prev);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_gbm_length_and_start() {
        let mut rng = SeededRng::new("gbm");
        let path = geometric_brownian_motion(100.0, 0.05, 0.2, 50, 0.1, &mut rng);
        assert_eq!(path.len(), 50);
        assert_eq!(path[0], 100.0);
    }

    #[test]
    fn test_gbm_zero_steps() {
        let mut rng = SeededRng::new("gbm");
        assert!(geometric_brownian_motion(100.0, 0.05, 0.2, 0, 0.1, &mut rng).is_empty());
    }

    #[test]
    fn test_gbm_clamps_to_floor() {
        // Volatility this large drives the walk through zero on the first down move
        let mut rng = SeededRng::new("crash");
        let path = geometric_brownian_motion(1.0, -5.0, 50.0, 200, 1.0, &mut rng);
        assert!(path.iter().all(|&p| p >= PRICE_FLOOR));
        assert!(path.iter().any(|&p| p == PRICE_FLOOR));
    }

    #[test]
    fn test_ema_first_value_and_alpha() {
        let out = ema(&[100.0, 102.0, 104.0], 3);
        // alpha = 0.5
        assert_eq!(out, vec![100.0, 101.0, 102.5]);
    }

    #[test]
    fn test_ema_empty() {
        assert!(ema(&[], 9).is_empty());
    }

    proptest! {
        #[test]
        fn prop_ema_same_length(series in prop::collection::vec(0.01f64..1000.0, 0..100), period in 1usize..50) {
            let out = ema(&series, period);
            prop_assert_eq!(out.len(), series.len());
            if let (Some(a), Some(b)) = (out.first(), series.first()) {
                prop_assert_eq!(a, b);
            }
        }

        #[test]
        fn prop_gbm_positive(initial in 0.01f64..1000.0, drift in -1.0f64..1.0, vol in 0.0f64..2.0, steps in 0usize..200) {
            let mut rng = SeededRng::new("prop-gbm");
            let path = geometric_brownian_motion(initial, drift, vol, steps, 0.1, &mut rng);
            prop_assert_eq!(path.len(), steps);
            prop_assert!(path.iter().all(|&p| p >= PRICE_FLOOR));
        }
    }
}
