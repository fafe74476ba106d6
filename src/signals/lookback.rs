// =============================================================================
// Lookback metrics — price / volume change and cap-estimate deltas
// =============================================================================
//
// For every lookback horizon the anchor is the last bar at or before
// `latest.timestamp - horizon`. Price, volume and cap-estimate figures of one
// horizon are all read from that same anchor bar.
// =============================================================================

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::change::{percent_change, volume_weighted_cap_estimate};
use crate::market_data::{PriceBar, PriceSeries};
use crate::types::Lookback;

/// Metrics of one symbol over one lookback horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookbackMetrics {
    pub lookback: Lookback,
    pub anchor: DateTime<Utc>,
    pub price_change_pct: Option<f64>,
    pub volume_change_pct: Option<f64>,
    /// price × volume at the anchor bar (approximation, see `indicators::change`).
    pub cap_estimate_anchor: f64,
    pub cap_estimate_delta: f64,
    pub cap_estimate_change_pct: Option<f64>,
}

/// Latest figures plus per-horizon metrics for one crypto symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoSummary {
    pub symbol: String,
    pub latest: PriceBar,
    pub cap_estimate: f64,
    /// One entry per [`Lookback::ALL`], in order; `None` when the series does
    /// not reach back far enough.
    pub lookbacks: Vec<(Lookback, Option<LookbackMetrics>)>,
}

/// Compute the summary for `series`. Returns `None` for an empty series.
pub fn summarize(series: &PriceSeries) -> Option<CryptoSummary> {
    let latest = series.latest()?.clone();
    let cap_estimate = volume_weighted_cap_estimate(latest.close, latest.volume);

    let lookbacks = Lookback::ALL
        .iter()
        .map(|&lb| (lb, metrics_for(series, &latest, lb)))
        .collect();

    Some(CryptoSummary {
        symbol: series.symbol().to_string(),
        latest,
        cap_estimate,
        lookbacks,
    })
}

fn metrics_for(series: &PriceSeries, latest: &PriceBar, lookback: Lookback) -> Option<LookbackMetrics> {
    let target = latest.timestamp.checked_sub_months(Months::new(lookback.months()))?;
    let anchor = &series.bars()[series.index_at_or_before(target)?];

    let cap_now = volume_weighted_cap_estimate(latest.close, latest.volume);
    let cap_anchor = volume_weighted_cap_estimate(anchor.close, anchor.volume);

    Some(LookbackMetrics {
        lookback,
        anchor: anchor.timestamp,
        price_change_pct: percent_change(latest.close, anchor.close),
        volume_change_pct: percent_change(latest.volume, anchor.volume),
        cap_estimate_anchor: cap_anchor,
        cap_estimate_delta: cap_now - cap_anchor,
        cap_estimate_change_pct: percent_change(cap_now, cap_anchor),
    })
}
