// Equity dip pipeline: SPY + volatility index → indicators → bottom signal.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::app_config::MarketSettings;
use crate::market_data::{IndicatorFrame, MarketDataClient, PriceSeries};
use crate::report::{self, FETCH_FAILED_MESSAGE};
use crate::signals::bottom;

async fn fetch_non_empty(client: &MarketDataClient, symbol: &str, settings: &MarketSettings) -> Option<PriceSeries> {
    match client.fetch_series(symbol, &settings.range, &settings.interval).await {
        Ok(series) if !series.is_empty() => Some(series),
        Ok(_) => {
            warn!(symbol, "empty price series");
            None
        }
        Err(e) => {
            warn!(symbol, error = %e, "price series fetch failed");
            None
        }
    }
}

/// Build the dip report text. Either series missing or empty yields
/// [`FETCH_FAILED_MESSAGE`].
#[instrument(skip_all, fields(symbol = %settings.symbol), name = "pipeline::dip")]
pub async fn build_dip_report(client: &MarketDataClient, settings: &MarketSettings, date: NaiveDate) -> String {
    let (equity, vix) = tokio::join!(
        fetch_non_empty(client, &settings.symbol, settings),
        fetch_non_empty(client, &settings.volatility_symbol, settings),
    );
    let (Some(equity), Some(vix)) = (equity, vix) else {
        return FETCH_FAILED_MESSAGE.to_string();
    };

    let frame = IndicatorFrame::compute(equity, settings.rsi_window, settings.low_window);
    let Some(snapshot) = bottom::evaluate(&frame, &vix, &settings.signal) else {
        return FETCH_FAILED_MESSAGE.to_string();
    };

    info!(state = %snapshot.state(), as_of = %snapshot.as_of, "dip evaluated");
    report::format_dip_report(date, &settings.display_name, settings.low_window, &snapshot)
}
