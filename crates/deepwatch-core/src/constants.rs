/// ─── Deepwatch Constants ────────────────────────────────────────────────────
///
/// Deeper Network (DPR) mainnet parameters and engine defaults.
///
/// Everything here is a *default*: the runtime configuration structs
/// (`ClientConfig` in deepwatch-client, `EngineConfig` in deepwatch-engine)
/// carry the live values, so none of these are baked into engine logic.

use std::time::Duration;

// ── Chain parameters ─────────────────────────────────────────────────────────

/// Deeper Network mainnet WebSocket RPC endpoint.
pub const MAINNET_ENDPOINT: &str = "wss://mainnet-full.deeper.network";

/// Blocks produced per day on Deeper mainnet (5-second block time).
pub const BLOCKS_PER_DAY: u64 = 17_280;

/// On-chain DPR amounts carry 18 implied decimal places.
pub const DECIMAL_PLACES: u32 = 18;

/// Width of the issuance comparison window, in days.
pub const CALCULATION_DAYS: u32 = 7;

// ── Halving thresholds (whole DPR, scaled by 10^18 on chain) ─────────────────

/// Second-halving issuance threshold: 2 billion DPR.
pub const SECOND_HALVING_DPR: u64 = 2_000_000_000;

/// Third-halving issuance threshold: 3 billion DPR.
/// Deeper milestones step in 1-billion-DPR increments; confirm against the
/// live on-chain schedule before deployment.
pub const THIRD_HALVING_DPR: u64 = 3_000_000_000;

// ── Connection budget ────────────────────────────────────────────────────────

/// Connection-establishment attempts before `connect()` gives up.
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Delay between connection attempts; also the base unit of the
/// scheduler's linear refresh backoff (`RETRY_DELAY × attempt`).
pub const RETRY_DELAY: Duration = Duration::from_millis(1_000);

// ── Refresh budget ───────────────────────────────────────────────────────────

/// Refresh-cycle retries before the scheduler reports exhaustion.
pub const MAX_RETRIES: u32 = 3;

/// Deadline for the combined (issuance + block number) fetch.
pub const API_TIMEOUT: Duration = Duration::from_secs(10);

/// Age below which a cached snapshot is served without network access.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Default subscription refresh interval.
pub const DATA_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

// ── Validation bounds ────────────────────────────────────────────────────────

/// Balances at or above 10^BALANCE_LIMIT_EXP are rejected as corrupted
/// RPC data.
pub const BALANCE_LIMIT_EXP: u32 = 50;
