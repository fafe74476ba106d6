// =============================================================================
// Bottom Signal — composite dip detector
// =============================================================================
//
// Fires for the latest observation only when all three hold:
//   1. close < rolling N-bar low (inclusive of the current bar)
//   2. RSI < threshold (default 35)
//   3. volatility index close > its own N-bar SMA * spike factor (default 1.10)
//
// An undefined indicator (not enough history) makes its condition false.
// Nothing carries over between runs.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::indicators::rolling::current_mean;
use crate::market_data::{IndicatorFrame, PriceSeries};
use crate::types::SignalState;

/// Thresholds for the bottom-signal conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BottomSignalParams {
    pub rsi_threshold: f64,
    pub vix_window: usize,
    pub vix_spike_factor: f64,
}

impl Default for BottomSignalParams {
    fn default() -> Self {
        Self {
            rsi_threshold: 35.0,
            vix_window: 5,
            vix_spike_factor: 1.10,
        }
    }
}

/// The three sub-conditions of the composite signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalConditions {
    pub below_rolling_low: bool,
    pub oversold: bool,
    pub vix_spike: bool,
}

impl SignalConditions {
    pub fn state(&self) -> SignalState {
        if self.below_rolling_low && self.oversold && self.vix_spike {
            SignalState::BottomSignal
        } else {
            SignalState::NoSignal
        }
    }
}

/// Everything the dip report needs about the latest observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DipSnapshot {
    pub as_of: DateTime<Utc>,
    pub close: f64,
    pub rsi: Option<f64>,
    pub rolling_low: Option<f64>,
    pub vix_close: f64,
    pub vix_mean: Option<f64>,
    pub conditions: SignalConditions,
}

impl DipSnapshot {
    pub fn state(&self) -> SignalState {
        self.conditions.state()
    }
}

pub fn is_below_rolling_low(close: f64, rolling_low: Option<f64>) -> bool {
    rolling_low.is_some_and(|low| close < low)
}

pub fn is_oversold(rsi: Option<f64>, threshold: f64) -> bool {
    rsi.is_some_and(|v| v < threshold)
}

pub fn is_vix_spike(vix_close: f64, vix_mean: Option<f64>, factor: f64) -> bool {
    vix_mean.is_some_and(|mean| vix_close > mean * factor)
}

pub fn same_session(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Evaluate the latest row of `frame` against the latest volatility-index
/// close. Returns `None` when either series is empty.
pub fn evaluate(frame: &IndicatorFrame, vix: &PriceSeries, params: &BottomSignalParams) -> Option<DipSnapshot> {
    let row = frame.latest()?;
    let vix_latest = vix.latest()?;
    if !same_session(row.timestamp, vix_latest.timestamp) {
        warn!(
            symbol = frame.series().symbol(),
            equity_date = %row.timestamp.date_naive(),
            vix_date = %vix_latest.timestamp.date_naive(),
            "latest equity and volatility bars are from different sessions"
        );
    }
    let vix_closes = vix.closes();
    let vix_close = vix_latest.close;
    let vix_mean = current_mean(&vix_closes, params.vix_window);

    let conditions = SignalConditions {
        below_rolling_low: is_below_rolling_low(row.close, row.rolling_low),
        oversold: is_oversold(row.rsi, params.rsi_threshold),
        vix_spike: is_vix_spike(vix_close, vix_mean, params.vix_spike_factor),
    };

    debug!(
        symbol = frame.series().symbol(),
        close = row.close,
        rsi = ?row.rsi,
        rolling_low = ?row.rolling_low,
        vix_close,
        vix_mean = ?vix_mean,
        state = %conditions.state(),
        "bottom signal evaluated"
    );

    Some(DipSnapshot {
        as_of: row.timestamp,
        close: row.close,
        rsi: row.rsi,
        rolling_low: row.rolling_low,
        vix_close,
        vix_mean,
        conditions,
    })
}
