//! deepwatch-client
//!
//! WebSocket JSON-RPC client for the Deeper Network chain.
//!
//! Methods used (standard Substrate surface):
//!   chain_getHeader      head header; carries the current block number
//!   chain_getBlockHash   block number to block hash
//!   state_getStorage     storage read, optionally pinned to a block hash;
//!                        total issuance lives under Balances::TotalIssuance
//!
//! The engine consumes this crate through the [`ChainSource`] trait so tests
//! can substitute an in-process fake for the network.

pub mod api;
pub mod client;
pub mod codec;
pub mod retry;

pub use api::RpcHeader;
pub use client::{ChainClient, ChainSource, ClientConfig};
// Implementors of `ChainSource` need the same attribute macro the trait
// was declared with.
pub use jsonrpsee::core::async_trait;
pub use codec::TOTAL_ISSUANCE_KEY;
pub use retry::connect_with_retry;
