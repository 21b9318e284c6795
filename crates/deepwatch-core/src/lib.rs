pub mod amount;
pub mod constants;
pub mod error;
pub mod format;
pub mod phase;
pub mod types;
pub mod validation;

pub use amount::Amount;
pub use constants::*;
pub use error::{DeepwatchError, ErrorKind};
pub use phase::{HalvingPhase, PhaseConfig};
pub use types::{EstimatedDays, HalvingStats, TimeLeft};
