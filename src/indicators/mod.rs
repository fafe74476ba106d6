// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the market
// reports. Series functions return `Vec<Option<f64>>` aligned with their
// input so that missing history is explicit at every index; scalar helpers
// return `Option<f64>` for numerical edge cases.

pub mod change;
pub mod rolling;
pub mod rsi;
