// =============================================================================
// Rolling-window statistics (min / mean)
// =============================================================================
//
// Both helpers return a vector aligned with the input. Entry `i` covers the
// trailing window `values[i + 1 - window ..= i]`, so the current observation
// is always included and the first `window - 1` entries are `None`.

/// Rolling minimum over the trailing `window` values (inclusive of the
/// current one). Used for the N-day low of the `low` column.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        w.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

/// Simple moving average over the trailing `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Last value of [`rolling_mean`], if defined.
pub fn current_mean(values: &[f64], window: usize) -> Option<f64> {
    rolling_mean(values, window).last().copied().flatten()
}

fn rolling(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    for (offset, w) in values.windows(window).enumerate() {
        // A NaN anywhere in the window poisons the statistic.
        if w.iter().any(|v| !v.is_finite()) {
            continue;
        }
        let value = f(w);
        if value.is_finite() {
            result[offset + window - 1] = Some(value);
        }
    }

    result
}
