pub mod client;
pub mod price_series;

// Re-export the core types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use client::MarketDataClient;
pub use price_series::{IndicatorFrame, PriceBar, PriceSeries};
