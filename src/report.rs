// =============================================================================
// Report Formatter — fixed-template text for the chat notifier
// =============================================================================
//
// Pure functions: the run date is passed in (captured once per invocation),
// numbers use fixed precision with no locale grouping, so the same inputs
// always render the same text.
//
//   prices / indicators / percentages : 2 decimals
//   volume / cap-estimate figures     : billions, 2 decimals, `B` suffix
//   undefined values                  : `n/a`
// =============================================================================

use chrono::NaiveDate;

use crate::signals::{CryptoSummary, DipSnapshot, LookbackMetrics};
use crate::types::SignalState;

/// Sent in place of a report when the required series could not be fetched.
pub const FETCH_FAILED_MESSAGE: &str = "Data fetch failed.";

const DISCLAIMER: &str = "Not investment advice. 🧂";
const NA: &str = "n/a";

fn fmt_num(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v:.2}"))
}

fn fmt_price(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("${v:.2}"))
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v:+.2}%"))
}

/// `1_234_000_000.0` → `1.23B`.
pub fn fmt_billions(value: f64) -> String {
    format!("{:.2}B", value / 1e9)
}

/// Signed variant of [`fmt_billions`] for deltas.
pub fn fmt_billions_signed(value: f64) -> String {
    format!("{:+.2}B", value / 1e9)
}

/// Build the equity dip report.
pub fn format_dip_report(date: NaiveDate, display_name: &str, low_window: usize, snap: &DipSnapshot) -> String {
    let c = &snap.conditions;
    let signal = match snap.state() {
        SignalState::BottomSignal => "✅ YES",
        SignalState::NoSignal => "❌ NO",
    };

    let mut msg = format!("📊 {} Dip Report — {}\n", display_name, date.format("%Y-%m-%d"));
    msg += &format!("📉 Close: {}\n", fmt_price(Some(snap.close)));
    msg += &format!(
        "📈 RSI: {} ({})\n",
        fmt_num(snap.rsi),
        if c.oversold { "Oversold" } else { "Normal" }
    );
    msg += &format!(
        "📉 {}d Low: {} ({})\n",
        low_window,
        fmt_price(snap.rolling_low),
        if c.below_rolling_low { "Below" } else { "Above" }
    );
    msg += &format!(
        "⚠️ VIX: {} ({})\n",
        fmt_num(Some(snap.vix_close)),
        if c.vix_spike { "Spiking" } else { "Calm" }
    );
    msg += &format!("\n📍 Bottom Signal: {signal}");
    msg += &format!("\n\n{DISCLAIMER}");
    msg
}

fn format_lookback_line(metrics: &LookbackMetrics) -> String {
    format!(
        "{}: Price {} | Volume {} | Cap Est. {} ({})",
        metrics.lookback,
        fmt_pct(metrics.price_change_pct),
        fmt_pct(metrics.volume_change_pct),
        fmt_billions_signed(metrics.cap_estimate_delta),
        fmt_pct(metrics.cap_estimate_change_pct),
    )
}

/// One symbol's block. `None` marks a symbol whose fetch failed.
fn format_crypto_block(symbol: &str, summary: Option<&CryptoSummary>) -> String {
    let Some(s) = summary else {
        return format!("🪙 {symbol}: {FETCH_FAILED_MESSAGE}\n");
    };

    let mut block = format!("🪙 {}\n", s.symbol);
    block += &format!("💵 Price: {}\n", fmt_price(Some(s.latest.close)));
    block += &format!("📦 Volume: {}\n", fmt_billions(s.latest.volume));
    block += &format!("🏦 Cap Est. (price × volume): {}\n", fmt_billions(s.cap_estimate));
    for (lookback, metrics) in &s.lookbacks {
        match metrics {
            Some(m) => block += &format!("{}\n", format_lookback_line(m)),
            None => block += &format!("{lookback}: {NA} (insufficient history)\n"),
        }
    }
    block
}

/// Build the crypto summary report. `entries` pairs each configured symbol
/// with its summary (or `None` if fetching failed), in configured order.
pub fn format_crypto_report(date: NaiveDate, entries: &[(String, Option<CryptoSummary>)]) -> String {
    let mut msg = format!("🪙 Crypto Summary — {}\n", date.format("%Y-%m-%d"));
    for (symbol, summary) in entries {
        msg.push('\n');
        msg += &format_crypto_block(symbol, summary.as_ref());
    }
    msg += "\nCap Est. is price × traded volume, not market capitalization.";
    msg += &format!("\n\n{DISCLAIMER}");
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PriceBar;
    use crate::signals::SignalConditions;
    use crate::types::Lookback;
    use chrono::{TimeZone, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn snapshot(conditions: SignalConditions, rsi: Option<f64>) -> DipSnapshot {
        DipSnapshot {
            as_of: Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap(),
            close: 512.346,
            rsi,
            rolling_low: Some(515.0),
            vix_close: 24.5,
            vix_mean: Some(20.0),
            conditions,
        }
    }

    #[test]
    fn dip_report_template() {
        let all = SignalConditions {
            below_rolling_low: true,
            oversold: true,
            vix_spike: true,
        };
        let text = format_dip_report(date(), "S&P 500", 5, &snapshot(all, Some(28.456)));
        let expected = "📊 S&P 500 Dip Report — 2026-10-16\n\
                        📉 Close: $512.35\n\
                        📈 RSI: 28.46 (Oversold)\n\
                        📉 5d Low: $515.00 (Below)\n\
                        ⚠️ VIX: 24.50 (Spiking)\n\
                        \n\
                        📍 Bottom Signal: ✅ YES\n\
                        \n\
                        Not investment advice. 🧂";
        assert_eq!(text, expected);
    }

    #[test]
    fn dip_report_undefined_rsi_and_no_signal() {
        let text = format_dip_report(date(), "S&P 500", 5, &snapshot(SignalConditions::default(), None));
        assert!(text.contains("📈 RSI: n/a (Normal)"));
        assert!(text.contains("(Above)"));
        assert!(text.contains("(Calm)"));
        assert!(text.contains("📍 Bottom Signal: ❌ NO"));
    }

    #[test]
    fn dip_report_is_deterministic() {
        let snap = snapshot(SignalConditions::default(), Some(40.0));
        assert_eq!(
            format_dip_report(date(), "S&P 500", 5, &snap),
            format_dip_report(date(), "S&P 500", 5, &snap)
        );
    }

    #[test]
    fn billions_formatting() {
        assert_eq!(fmt_billions(1_234_000_000.0), "1.23B");
        assert_eq!(fmt_billions(0.0), "0.00B");
        assert_eq!(fmt_billions_signed(-2_500_000_000.0), "-2.50B");
        assert_eq!(fmt_billions_signed(2_500_000_000.0), "+2.50B");
    }

    #[test]
    fn crypto_report_template() {
        let latest = PriceBar {
            timestamp: Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap(),
            open: 60_000.0,
            high: 61_000.0,
            low: 59_000.0,
            close: 60_500.0,
            volume: 30_000_000_000.0 / 60_500.0,
        };
        let three_m = LookbackMetrics {
            lookback: Lookback::ThreeMonths,
            anchor: Utc.with_ymd_and_hms(2026, 7, 16, 0, 0, 0).unwrap(),
            price_change_pct: Some(10.0),
            volume_change_pct: Some(-5.5),
            cap_estimate_anchor: 25_000_000_000.0,
            cap_estimate_delta: 5_000_000_000.0,
            cap_estimate_change_pct: Some(20.0),
        };
        let summary = CryptoSummary {
            symbol: "BTC-USD".into(),
            latest,
            cap_estimate: 30_000_000_000.0,
            lookbacks: vec![
                (Lookback::ThreeMonths, Some(three_m)),
                (Lookback::SixMonths, None),
            ],
        };
        let entries = vec![
            ("BTC-USD".to_string(), Some(summary)),
            ("ETH-USD".to_string(), None),
        ];

        let text = format_crypto_report(date(), &entries);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "🪙 Crypto Summary — 2026-10-16");
        assert_eq!(lines[2], "🪙 BTC-USD");
        assert_eq!(lines[3], "💵 Price: $60500.00");
        assert_eq!(lines[5], "🏦 Cap Est. (price × volume): 30.00B");
        assert_eq!(lines[6], "3M: Price +10.00% | Volume -5.50% | Cap Est. +5.00B (+20.00%)");
        assert_eq!(lines[7], "6M: n/a (insufficient history)");
        assert_eq!(lines[9], "🪙 ETH-USD: Data fetch failed.");
        assert!(text.ends_with(DISCLAIMER));
    }
}
