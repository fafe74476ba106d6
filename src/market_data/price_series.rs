use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::{rolling::rolling_min, rsi::calculate_rsi};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered bars for one ticker symbol.
///
/// Bars are ascending by timestamp with no duplicate timestamps; the
/// constructor enforces this, so a `PriceSeries` is immutable and always
/// well-ordered once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, sorting by timestamp. When two bars share a
    /// timestamp the later one in `bars` wins.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        // Stable sort keeps input order among equal timestamps, so keeping the
        // last of each run keeps the most recently supplied bar.
        bars.sort_by_key(|b| b.timestamp);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Index of the last bar at or before `at`, if any.
    pub fn index_at_or_before(&self, at: DateTime<Utc>) -> Option<usize> {
        // Bars are sorted, so the partition point is the count of bars <= at.
        let count = self.bars.partition_point(|b| b.timestamp <= at);
        count.checked_sub(1)
    }
}

// ---------------------------------------------------------------------------
// IndicatorFrame
// ---------------------------------------------------------------------------

/// A `PriceSeries` augmented with RSI and the rolling N-bar low, aligned
/// index-for-index with the bars.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    series: PriceSeries,
    rsi: Vec<Option<f64>>,
    rolling_low: Vec<Option<f64>>,
}

/// The derived values of one frame row.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub rsi: Option<f64>,
    pub rolling_low: Option<f64>,
}

impl IndicatorFrame {
    pub fn compute(series: PriceSeries, rsi_window: usize, low_window: usize) -> Self {
        let rsi = calculate_rsi(&series.closes(), rsi_window);
        let rolling_low = rolling_min(&series.lows(), low_window);
        Self {
            series,
            rsi,
            rolling_low,
        }
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn row(&self, index: usize) -> Option<IndicatorRow> {
        let bar = self.series.bars().get(index)?;
        Some(IndicatorRow {
            timestamp: bar.timestamp,
            close: bar.close,
            rsi: self.rsi.get(index).copied().flatten(),
            rolling_low: self.rolling_low.get(index).copied().flatten(),
        })
    }

    pub fn latest(&self) -> Option<IndicatorRow> {
        self.row(self.series.len().checked_sub(1)?)
    }
}
