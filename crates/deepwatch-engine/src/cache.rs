use std::time::{Duration, Instant};

use deepwatch_core::HalvingStats;

/// The single cached refresh result. Replaced wholesale on every successful
/// cycle; there is no partial update path.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    created_at: Instant,
    stats: HalvingStats,
}

impl CacheEntry {
    pub fn new(stats: HalvingStats) -> Self {
        Self {
            created_at: Instant::now(),
            stats,
        }
    }

    pub fn stats(&self) -> &HalvingStats {
        &self.stats
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepwatch_core::{EstimatedDays, HalvingPhase};

    fn entry() -> CacheEntry {
        CacheEntry::new(HalvingStats {
            current_issuance: "500".into(),
            remaining_amount: "1500".into(),
            estimated_days: EstimatedDays::Days(3),
            average_daily_increase: "500".into(),
            halving_phase: HalvingPhase::Second,
        })
    }

    #[test]
    fn fresh_inside_ttl_stale_outside() {
        let e = entry();
        assert!(e.is_fresh(Duration::from_secs(60)));
        assert!(!e.is_fresh(Duration::ZERO));
    }

    #[test]
    fn age_grows() {
        let e = entry();
        std::thread::sleep(Duration::from_millis(5));
        assert!(e.age() >= Duration::from_millis(5));
    }
}
