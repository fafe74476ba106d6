// Crypto summary pipeline: one long series per symbol → lookback metrics.

use chrono::NaiveDate;
use futures_util::future::join_all;
use tracing::{info, instrument, warn};

use crate::app_config::CryptoSettings;
use crate::market_data::MarketDataClient;
use crate::report;
use crate::signals::{lookback, CryptoSummary};

/// Build the crypto summary text. Symbols keep their configured order; a
/// symbol whose fetch fails (or returns nothing) gets a failure line.
#[instrument(skip_all, fields(symbols = settings.symbols.len()), name = "pipeline::crypto")]
pub async fn build_crypto_report(client: &MarketDataClient, settings: &CryptoSettings, date: NaiveDate) -> String {
    let summaries: Vec<Option<CryptoSummary>> = join_all(settings.symbols.iter().map(|symbol| async move {
        match client.fetch_series(symbol, &settings.range, &settings.interval).await {
            Ok(series) => {
                let summary = lookback::summarize(&series);
                if summary.is_none() {
                    warn!(symbol = %symbol, "empty price series");
                }
                summary
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "price series fetch failed");
                None
            }
        }
    }))
    .await;

    let entries: Vec<(String, Option<CryptoSummary>)> = settings.symbols.iter().cloned().zip(summaries).collect();
    info!(
        ok = entries.iter().filter(|(_, s)| s.is_some()).count(),
        "crypto summaries computed"
    );
    report::format_crypto_report(date, &entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use crate::test_support::{self, chart_body};
    use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Router};

    #[tokio::test]
    async fn failed_symbol_does_not_hide_others() {
        let app = Router::new().route(
            "/v8/finance/chart/:symbol",
            get(|Path(symbol): Path<String>| async move {
                if symbol == "BTC-USD" {
                    chart_body("BTC-USD", &(0..120).map(|i| 100.0 + i as f64).collect::<Vec<_>>()).into_response()
                } else {
                    StatusCode::NOT_FOUND.into_response()
                }
            }),
        );
        let addr = test_support::serve(app).await;
        let client = MarketDataClient::new(format!("http://{addr}"), RetryPolicy::none()).unwrap();
        let settings = CryptoSettings {
            symbols: vec!["ETH-USD".into(), "BTC-USD".into()],
            ..CryptoSettings::default()
        };

        let text = build_crypto_report(&client, &settings, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()).await;

        let eth = text.find("🪙 ETH-USD: Data fetch failed.").expect("eth failure line");
        let btc = text.find("🪙 BTC-USD\n").expect("btc block");
        assert!(eth < btc);
        assert!(text.contains("💵 Price: $219.00"));
        assert!(text.contains("3M: Price "));
        assert!(text.contains("1Y: n/a (insufficient history)"));
    }
}
