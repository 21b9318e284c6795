use std::time::Duration;

use deepwatch_core::constants::{
    API_TIMEOUT, BLOCKS_PER_DAY, CACHE_TTL, CALCULATION_DAYS, MAX_RETRIES, RETRY_DELAY,
};

/// Tunables for the refresh cycle. Defaults mirror the mainnet constants;
/// tests shrink the delays to keep wall-clock time down.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Block production rate used to locate the historical snapshot.
    pub blocks_per_day: u64,
    /// Width of the comparison window, in days.
    pub calculation_days: u32,
    /// Refresh attempts per cycle before giving up.
    pub max_retries: u32,
    /// Base pause between refresh attempts; attempt n waits n times this.
    pub retry_delay: Duration,
    /// Deadline for the concurrent head reads of one attempt.
    pub api_timeout: Duration,
    /// How long a cached record keeps serving unforced reads.
    pub cache_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            blocks_per_day: BLOCKS_PER_DAY,
            calculation_days: CALCULATION_DAYS,
            max_retries: MAX_RETRIES,
            retry_delay: RETRY_DELAY,
            api_timeout: API_TIMEOUT,
            cache_ttl: CACHE_TTL,
        }
    }
}

impl EngineConfig {
    /// Chain-head offset of the historical snapshot.
    pub fn window_blocks(&self) -> u64 {
        self.blocks_per_day * u64::from(self.calculation_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_mainnet_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.blocks_per_day, 17_280);
        assert_eq!(config.calculation_days, 7);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn window_spans_seven_days_of_blocks() {
        assert_eq!(EngineConfig::default().window_blocks(), 120_960);
    }
}
