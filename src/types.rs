// =============================================================================
// Shared types used across the market-brief pipelines
// =============================================================================

use serde::{Deserialize, Serialize};

/// Outcome of the bottom-signal evaluation for the latest observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalState {
    #[default]
    NoSignal,
    BottomSignal,
}

impl std::fmt::Display for SignalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSignal => write!(f, "NoSignal"),
            Self::BottomSignal => write!(f, "BottomSignal"),
        }
    }
}

/// Fixed lookback horizons for the crypto summary, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lookback {
    ThreeMonths,
    SixMonths,
    OneYear,
    ThreeYears,
}

impl Lookback {
    pub const ALL: [Lookback; 4] = [
        Lookback::ThreeMonths,
        Lookback::SixMonths,
        Lookback::OneYear,
        Lookback::ThreeYears,
    ];

    pub fn months(self) -> u32 {
        match self {
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::ThreeYears => 36,
        }
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThreeMonths => write!(f, "3M"),
            Self::SixMonths => write!(f, "6M"),
            Self::OneYear => write!(f, "1Y"),
            Self::ThreeYears => write!(f, "3Y"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_state_defaults_to_no_signal() {
        assert_eq!(SignalState::default(), SignalState::NoSignal);
        assert_eq!(SignalState::BottomSignal.to_string(), "BottomSignal");
    }

    #[test]
    fn lookback_labels_and_months() {
        let labels: Vec<String> = Lookback::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["3M", "6M", "1Y", "3Y"]);
        assert_eq!(Lookback::ThreeYears.months(), 36);
    }
}
