// =============================================================================
// Relative Strength Index (RSI) — Simple rolling-mean variant
// =============================================================================
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split each delta into a gain (positive part) and a loss (magnitude
//          of the negative part).
// Step 3 — Average gains and losses over the trailing `window` deltas with a
//          plain SMA (no Wilder smoothing).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Output is aligned index-for-index with the input closes. Index `i` needs
// `window` deltas, so the first defined value sits at `i == window`.
// =============================================================================

/// Compute the RSI series for `closes`, aligned with the input.
///
/// # Edge cases
/// - `window == 0` => every entry is `None`
/// - indices `< window` => `None` (not enough history)
/// - average loss zero with gains present => 100.0
/// - no movement at all (both averages zero) => 50.0
/// - non-finite inputs inside the window => `None` for that index
pub fn calculate_rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if window == 0 || closes.len() <= window {
        return result;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let window_f = window as f64;

    // deltas[j] is the change into closes[j + 1], so the window ending at
    // close `i` covers deltas[i - window .. i].
    for i in window..closes.len() {
        let (sum_gain, sum_loss) =
            deltas[i - window..i]
                .iter()
                .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
                    if d > 0.0 {
                        (g + d, l)
                    } else {
                        (g, l + d.abs())
                    }
                });

        result[i] = rsi_from_averages(sum_gain / window_f, sum_loss / window_f);
    }

    result
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi.clamp(0.0, 100.0))
    } else {
        None
    }
}
