use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::constants::{SECOND_HALVING_DPR, THIRD_HALVING_DPR};

/// Active halving phase. Ordered: the chain only ever moves forward, so a
/// later phase compares greater than an earlier one and the mapping from
/// issuance to phase never reverts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HalvingPhase {
    Second,
    Third,
}

/// Per-phase target threshold and display title. Static for the lifetime of
/// the process.
#[derive(Debug, Clone)]
pub struct PhaseConfig {
    pub target: Amount,
    pub title: &'static str,
}

static SECOND_PHASE: Lazy<PhaseConfig> = Lazy::new(|| PhaseConfig {
    target: Amount::from_dpr(SECOND_HALVING_DPR),
    title: "DPR Second Halving Countdown",
});

static THIRD_PHASE: Lazy<PhaseConfig> = Lazy::new(|| PhaseConfig {
    target: Amount::from_dpr(THIRD_HALVING_DPR),
    title: "DPR Third Halving Countdown",
});

impl HalvingPhase {
    pub fn config(&self) -> &'static PhaseConfig {
        match self {
            Self::Second => &SECOND_PHASE,
            Self::Third => &THIRD_PHASE,
        }
    }

    /// Issuance threshold this phase counts down toward, in on-chain units.
    pub fn target(&self) -> &'static Amount {
        &self.config().target
    }

    pub fn title(&self) -> &'static str {
        self.config().title
    }
}

impl fmt::Display for HalvingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Second => write!(f, "SECOND"),
            Self::Third => write!(f, "THIRD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_are_scaled_to_chain_units() {
        // 2 × 10^9 DPR at 18 decimals = 2 × 10^27 raw units.
        assert_eq!(
            HalvingPhase::Second.target().to_string(),
            "2000000000000000000000000000"
        );
        assert_eq!(
            HalvingPhase::Third.target().to_string(),
            "3000000000000000000000000000"
        );
    }

    #[test]
    fn phases_advance_monotonically() {
        assert!(HalvingPhase::Second < HalvingPhase::Third);
        assert!(HalvingPhase::Second.target() < HalvingPhase::Third.target());
    }

    #[test]
    fn titles_match_display_copy() {
        assert_eq!(HalvingPhase::Second.title(), "DPR Second Halving Countdown");
        assert_eq!(HalvingPhase::Third.title(), "DPR Third Halving Countdown");
        assert_eq!(HalvingPhase::Third.to_string(), "THIRD");
    }
}
