use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use deepwatch_client::ChainSource;
use deepwatch_core::validation::validate_block_number;
use deepwatch_core::{Amount, DeepwatchError, HalvingStats};

use crate::cache::CacheEntry;
use crate::calc::compute_stats;
use crate::config::EngineConfig;

/// Where the engine's refresh machinery currently stands. `Exhausted` means
/// a full retry budget burned with nothing to show; subscription ticks stay
/// quiet until `reset()` or a manual forced refresh re-arms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Fetching,
    Success,
    Failed,
    Exhausted,
}

/// Polling scheduler over any [`ChainSource`].
///
/// Owns the single cached record and the refresh cycle around it: cache
/// check, concurrent head reads under a deadline, historical snapshot,
/// calculation, validation, cache write. One refresh runs at a time; stale
/// readers that pile up behind it reuse its result instead of dialing the
/// chain again.
pub struct HalvingEngine<C: ChainSource> {
    source: Arc<C>,
    config: EngineConfig,
    cache: RwLock<Option<CacheEntry>>,
    refresh_gate: Mutex<()>,
    state: RwLock<RefreshState>,
    online: AtomicBool,
    online_kick: Notify,
}

impl<C: ChainSource> HalvingEngine<C> {
    pub fn new(source: Arc<C>, config: EngineConfig) -> Self {
        Self {
            source,
            config,
            cache: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            state: RwLock::new(RefreshState::Idle),
            online: AtomicBool::new(true),
            online_kick: Notify::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn state(&self) -> RefreshState {
        *self.state.read().await
    }

    async fn set_state(&self, next: RefreshState) {
        *self.state.write().await = next;
    }

    /// Re-arms a scheduler halted by budget exhaustion.
    pub async fn reset(&self) {
        self.set_state(RefreshState::Idle).await;
        info!("refresh state re-armed");
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Connectivity signal from the host. Going offline makes refreshes
    /// fail fast without touching the network; coming back online kicks
    /// the subscription loop into an immediate refresh.
    pub fn set_online(&self, online: bool) {
        let was = self.online.swap(online, Ordering::SeqCst);
        if !was && online {
            info!("connectivity restored");
            self.online_kick.notify_one();
        } else if was && !online {
            warn!("connectivity lost");
        }
    }

    /// Age of the cached record, if any.
    pub async fn last_refreshed(&self) -> Option<Duration> {
        self.cache.read().await.as_ref().map(|e| e.age())
    }

    /// Current statistics. A fresh cached record answers unforced calls
    /// without network traffic; otherwise one full refresh cycle runs.
    /// Concurrent callers serialize on the cycle and the laggards pick up
    /// the winner's record from the cache.
    pub async fn get_stats(&self, force_refresh: bool) -> Result<HalvingStats, DeepwatchError> {
        if !force_refresh {
            if let Some(stats) = self.cached_fresh().await {
                debug!("serving cached stats");
                return Ok(stats);
            }
        }
        let _gate = self.refresh_gate.lock().await;
        if !force_refresh {
            // The cycle we waited behind may have refilled the cache.
            if let Some(stats) = self.cached_fresh().await {
                return Ok(stats);
            }
        }
        self.refresh().await
    }

    async fn cached_fresh(&self) -> Option<HalvingStats> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|e| e.is_fresh(self.config.cache_ttl))
            .map(|e| e.stats().clone())
    }

    /// One refresh with the retry budget applied. Transient failures back
    /// off linearly (delay × attempt); deterministic calculation failures
    /// surface immediately, retrying those cannot change the answer.
    async fn refresh(&self) -> Result<HalvingStats, DeepwatchError> {
        if !self.is_online() {
            self.set_state(RefreshState::Failed).await;
            return Err(DeepwatchError::Offline);
        }
        self.set_state(RefreshState::Fetching).await;
        let budget = self.config.max_retries.max(1);
        let mut attempt = 0;
        let last = loop {
            attempt += 1;
            match self.refresh_once().await {
                Ok(stats) => {
                    self.set_state(RefreshState::Success).await;
                    return Ok(stats);
                }
                Err(e) if !e.is_retryable() => {
                    warn!(error = %e, "refresh failed, not retryable");
                    self.set_state(RefreshState::Failed).await;
                    return Err(e);
                }
                Err(e) if attempt >= budget => break e,
                Err(e) => {
                    warn!(attempt, budget, error = %e, "refresh attempt failed");
                    time::sleep(self.config.retry_delay * attempt).await;
                }
            }
        };
        warn!(budget, error = %last, "refresh budget exhausted");
        self.set_state(RefreshState::Exhausted).await;
        Err(DeepwatchError::RetriesExhausted {
            attempts: budget,
            last: Box::new(last),
        })
    }

    async fn refresh_once(&self) -> Result<HalvingStats, DeepwatchError> {
        // Current issuance and head number are independent; fetch them
        // together under one deadline. Losing the race drops both reads.
        let head_reads = async {
            tokio::try_join!(self.source.total_issuance(), self.source.current_block_number())
        };
        let (issuance, block_number) = match time::timeout(self.config.api_timeout, head_reads).await
        {
            Ok(result) => result?,
            Err(_) => return Err(DeepwatchError::Timeout(self.config.api_timeout)),
        };

        let window = self.config.window_blocks();
        let past = i128::from(block_number) - i128::from(window);
        if !validate_block_number(past) {
            return Err(DeepwatchError::WindowBeforeGenesis {
                current_block: block_number,
                window_blocks: window,
            });
        }
        let hash = self.source.block_hash(past as u64).await?;
        let previous = self.source.issuance_at(&hash).await?;

        let current: Amount = issuance.parse()?;
        let previous: Amount = previous.parse()?;
        let stats = compute_stats(&current, &previous, self.config.calculation_days)?;

        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry::new(stats.clone()));
        drop(cache);

        info!(
            phase = %stats.halving_phase,
            days = %stats.estimated_days,
            "stats refreshed"
        );
        Ok(stats)
    }

    /// Starts a periodic forced refresh, delivering each result to
    /// `on_update`. The first delivery happens one full `interval` after
    /// the call; cancelling before that produces no callbacks at all.
    /// Ticks never overlap: a slow refresh makes the loop skip, not queue.
    /// A zero `interval` is raised to one millisecond.
    pub fn subscribe<F>(self: Arc<Self>, interval: Duration, mut on_update: F) -> Subscription
    where
        F: FnMut(Result<HalvingStats, DeepwatchError>) + Send + 'static,
        C: 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let engine = Arc::clone(&self);
        let cancelled = Arc::new(AtomicBool::new(false));
        let task_cancelled = Arc::clone(&cancelled);
        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if task_cancelled.load(Ordering::SeqCst) {
                            break;
                        }
                        if engine.state().await == RefreshState::Exhausted {
                            debug!("refresh budget exhausted, tick skipped");
                            continue;
                        }
                        let result = engine.get_stats(true).await;
                        if task_cancelled.load(Ordering::SeqCst) {
                            break;
                        }
                        on_update(result);
                    }
                    _ = engine.online_kick.notified() => {
                        if task_cancelled.load(Ordering::SeqCst) {
                            break;
                        }
                        debug!("connectivity restored, refreshing now");
                        let result = engine.get_stats(true).await;
                        if task_cancelled.load(Ordering::SeqCst) {
                            break;
                        }
                        on_update(result);
                    }
                }
            }
        });

        let source = Arc::clone(&self.source);
        let release: Box<dyn FnOnce() + Send> = Box::new(move || {
            tokio::spawn(async move {
                source.disconnect().await;
            });
        });

        Subscription {
            cancelled,
            task,
            release: Some(release),
        }
    }
}

/// Handle to a running subscription loop. Dropping it stops the loop;
/// [`Subscription::cancel`] additionally releases the chain connection.
pub struct Subscription {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Stops pending and future ticks immediately. An in-flight refresh is
    /// aborted mid-cycle; its callback never fires.
    pub fn cancel(mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
        if let Some(release) = self.release.take() {
            release();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepwatch_client::async_trait;

    struct NullChain;

    #[async_trait]
    impl ChainSource for NullChain {
        async fn total_issuance(&self) -> Result<String, DeepwatchError> {
            Ok("500000000000000000000000000".to_string())
        }
        async fn current_block_number(&self) -> Result<u64, DeepwatchError> {
            Ok(1_000_000)
        }
        async fn block_hash(&self, number: u64) -> Result<String, DeepwatchError> {
            Ok(format!("0x{number:064x}"))
        }
        async fn issuance_at(&self, _hash: &str) -> Result<String, DeepwatchError> {
            Ok("490000000000000000000000000".to_string())
        }
        async fn disconnect(&self) {}
    }

    fn engine() -> HalvingEngine<NullChain> {
        HalvingEngine::new(Arc::new(NullChain), EngineConfig::default())
    }

    #[tokio::test]
    async fn starts_idle_online_and_empty() {
        let engine = engine();
        assert_eq!(engine.state().await, RefreshState::Idle);
        assert!(engine.is_online());
        assert!(engine.last_refreshed().await.is_none());
    }

    #[tokio::test]
    async fn online_flag_round_trips() {
        let engine = engine();
        engine.set_online(false);
        assert!(!engine.is_online());
        engine.set_online(true);
        assert!(engine.is_online());
    }

    #[tokio::test]
    async fn reset_returns_to_idle() {
        let engine = engine();
        engine.set_state(RefreshState::Exhausted).await;
        engine.reset().await;
        assert_eq!(engine.state().await, RefreshState::Idle);
    }
}
