//! deepwatch-engine
//!
//! The halving statistics engine: pure calculation over two issuance
//! snapshots, plus the polling scheduler that keeps a cached `HalvingStats`
//! record current against a live chain.
//!
//! The chain is reached only through the `ChainSource` trait from
//! deepwatch-client, so the whole engine runs against an in-process fake
//! in tests.

pub mod cache;
pub mod calc;
pub mod config;
pub mod scheduler;

pub use calc::{
    compute_stats, daily_increase, determine_phase, estimated_date, progress_percent,
    remaining_amount, remaining_days,
};
pub use config::EngineConfig;
pub use scheduler::{HalvingEngine, RefreshState, Subscription};
