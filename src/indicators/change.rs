// =============================================================================
// Percentage change & volume-weighted cap estimate
// =============================================================================
//
// Percent change over an anchor:
//   change = (current - past) / past * 100
//
// The "cap estimate" is price × traded volume for the bar. It is the traded
// notional of that day and NOT a market capitalization: it ignores supply
// entirely and moves with trading activity. Reports label it accordingly.

/// Percent change from `past` to `current`.
///
/// Returns `None` when `past` is zero or either input is non-finite, so the
/// caller can render the metric as unavailable.
pub fn percent_change(current: f64, past: f64) -> Option<f64> {
    if past == 0.0 {
        return None;
    }
    let change = (current - past) / past * 100.0;
    change.is_finite().then_some(change)
}

/// Volume-weighted cap estimate: `price × volume`.
///
/// An approximation only. See the module docs.
pub fn volume_weighted_cap_estimate(price: f64, volume: f64) -> f64 {
    price * volume
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_change_basic() {
        let change = percent_change(110.0, 100.0).unwrap();
        assert!((change - 10.0).abs() < 1e-10);
        let change = percent_change(50.0, 100.0).unwrap();
        assert!((change + 50.0).abs() < 1e-10);
    }

    #[test]
    fn percent_change_same_value_is_zero() {
        for x in [0.001, 1.0, 42.5, -3.0, 1e9] {
            assert_eq!(percent_change(x, x), Some(0.0), "x = {x}");
        }
    }

    #[test]
    fn percent_change_zero_anchor_is_flagged() {
        assert!(percent_change(10.0, 0.0).is_none());
        assert!(percent_change(0.0, 0.0).is_none());
    }

    #[test]
    fn percent_change_nan_is_none() {
        assert!(percent_change(f64::NAN, 1.0).is_none());
    }

    #[test]
    fn cap_estimate_is_price_times_volume() {
        assert!((volume_weighted_cap_estimate(25.0, 4_000.0) - 100_000.0).abs() < 1e-9);
    }
}
