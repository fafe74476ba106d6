// =============================================================================
// Signals Module
// =============================================================================
//
// Signal evaluation on top of the indicator core:
// - Bottom signal (dip detector) for the equity index
// - Lookback metrics (price / volume / cap-estimate change) for crypto

pub mod bottom;
pub mod lookback;

pub use bottom::{BottomSignalParams, DipSnapshot, SignalConditions};
pub use lookback::{CryptoSummary, LookbackMetrics};
