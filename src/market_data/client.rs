// =============================================================================
// Market-data REST client — daily OHLCV from a chart endpoint
// =============================================================================
//
// Speaks the Yahoo-Finance-style chart API:
//   GET {base}/v8/finance/chart/{symbol}?range=6mo&interval=1d
//
// The response carries parallel arrays (timestamp, open, high, low, close,
// volume). Holidays and partial sessions show up as `null` entries; any bar
// with a null field is skipped rather than zero-filled.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::market_data::{PriceBar, PriceSeries};
use crate::retry::RetryPolicy;

/// The chart endpoint rejects requests without a browser-like agent.
const AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) market-brief/1.0";

/// Market-data client for daily price series.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl MarketDataClient {
    pub fn new(base_url: impl Into<String>, retry: RetryPolicy) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .context("failed to build market data HTTP client")?;

        debug!(base_url = %base_url, "MarketDataClient initialised");

        Ok(Self {
            base_url,
            client,
            retry,
        })
    }

    /// Fetch the OHLCV series for `symbol` over `range` (e.g. `6mo`, `5y`)
    /// at `interval` (e.g. `1d`).
    #[instrument(skip(self), name = "market_data::fetch_series")]
    pub async fn fetch_series(&self, symbol: &str, range: &str, interval: &str) -> Result<PriceSeries> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("invalid market data base url '{}'", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("market data base url cannot carry a path"))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("range", range)
            .append_pair("interval", interval);

        let resp = self
            .retry
            .send("market_data::chart", || self.client.get(url.clone()))
            .await
            .with_context(|| format!("GET chart for {symbol} request failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read chart response for {symbol}"))?;

        if !status.is_success() {
            anyhow::bail!("chart endpoint returned {} for {}: {}", status, symbol, body);
        }

        let series = parse_chart(symbol, &body)?;
        debug!(symbol, range, interval, bars = series.len(), "series fetched");
        Ok(series)
    }
}

// -----------------------------------------------------------------------------
// Response parsing
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parse a chart response body into a [`PriceSeries`].
pub fn parse_chart(symbol: &str, body: &str) -> Result<PriceSeries> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .with_context(|| format!("failed to parse chart response for {symbol}"))?;

    if let Some(err) = envelope.chart.error.filter(|e| !e.is_null()) {
        anyhow::bail!("chart endpoint reported an error for {symbol}: {err}");
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut r| (!r.is_empty()).then(|| r.swap_remove(0)))
        .with_context(|| format!("chart response for {symbol} has no result"))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let field = |col: &[Option<f64>]| col.get(i).copied().flatten();
        let bar = (|| {
            Some(PriceBar {
                timestamp: DateTime::<Utc>::from_timestamp(ts, 0)?,
                open: field(&quote.open)?,
                high: field(&quote.high)?,
                low: field(&quote.low)?,
                close: field(&quote.close)?,
                volume: field(&quote.volume)?,
            })
        })();
        match bar {
            Some(bar) => bars.push(bar),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(symbol, skipped, "skipped chart rows with missing fields");
    }

    Ok(PriceSeries::new(symbol, bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Router};

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "SPY"},
                "timestamp": [1704153600, 1704240000, 1704326400],
                "indicators": {"quote": [{
                    "open":   [470.0, 468.0, null],
                    "high":   [472.0, 469.5, 467.0],
                    "low":    [468.5, 466.0, 465.0],
                    "close":  [471.0, 467.0, 466.0],
                    "volume": [1000000, 1200000, 900000]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parse_skips_rows_with_nulls() {
        let series = parse_chart("SPY", CHART).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![471.0, 467.0]);
        assert_eq!(series.bars()[1].volume, 1_200_000.0);
    }

    #[test]
    fn parse_reports_upstream_error() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#;
        let err = parse_chart("NOPE", body).unwrap_err();
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_chart("SPY", "<html>").is_err());
    }

    #[tokio::test]
    async fn fetch_series_from_stub() {
        let app = Router::new().route(
            "/v8/finance/chart/:symbol",
            get(|Path(symbol): Path<String>| async move {
                if symbol == "SPY" {
                    CHART.into_response()
                } else {
                    (StatusCode::NOT_FOUND, "unknown").into_response()
                }
            }),
        );
        let addr = test_support::serve(app).await;
        let client = MarketDataClient::new(format!("http://{addr}/"), RetryPolicy::none()).unwrap();

        let series = client.fetch_series("SPY", "6mo", "1d").await.unwrap();
        assert_eq!(series.symbol(), "SPY");
        assert_eq!(series.len(), 2);

        assert!(client.fetch_series("QQQ", "6mo", "1d").await.is_err());
    }
}
