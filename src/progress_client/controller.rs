// Per-lesson progress coordinator: cached state first, server truth when it
// arrives, optimistic local writes, best-effort sync behind them.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;

use crate::domain::models::{ProgressKey, ProgressRecord};
use crate::progress_client::{ProgressCache, ProgressTransport};

/// Retry schedule for pushes. The final failure is logged and dropped; the
/// optimistic local value stays authoritative for this session either way.
#[derive(Debug, Clone)]
pub struct SyncPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        SyncPolicy {
            attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// One controller per (user, course, lesson) view. Clones share state, so a
/// clone can be moved into a spawned task cheaply.
#[derive(Clone)]
pub struct ProgressController {
    key: ProgressKey,
    state: Arc<RwLock<ProgressRecord>>,
    cache: ProgressCache,
    transport: Arc<dyn ProgressTransport>,
    policy: SyncPolicy,
}

impl ProgressController {
    /// Build a controller seeded synchronously from the local cache, so the
    /// first paint has data before any network round trip.
    pub fn new(
        key: ProgressKey,
        cache: ProgressCache,
        transport: Arc<dyn ProgressTransport>,
    ) -> Self {
        Self::with_policy(key, cache, transport, SyncPolicy::default())
    }

    pub fn with_policy(
        key: ProgressKey,
        cache: ProgressCache,
        transport: Arc<dyn ProgressTransport>,
        policy: SyncPolicy,
    ) -> Self {
        let initial = cache.load(&key).unwrap_or_default();
        ProgressController {
            key,
            state: Arc::new(RwLock::new(initial)),
            cache,
            transport,
            policy,
        }
    }

    pub fn key(&self) -> &ProgressKey {
        &self.key
    }

    /// Current record for rendering.
    pub fn snapshot(&self) -> ProgressRecord {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read progress state");
                ProgressRecord::default()
            }
        }
    }

    /// Fetch the authoritative record and adopt it, writing through to the
    /// cache. On failure the cached/default state stands and nothing
    /// surfaces to the caller.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn refresh(&self) {
        match self.transport.fetch(&self.key).await {
            Ok(record) => {
                self.set_state(record.clone());
                self.cache.save(&self.key, &record);
            }
            Err(e) => {
                tracing::debug!(error = %e, "progress refresh failed, keeping local state");
            }
        }
    }

    /// Non-blocking form of [`Self::refresh`] for view initialization.
    pub fn spawn_refresh(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            this.refresh().await;
        });
    }

    /// Record a new watch percentage (clamped to 0..=100): state and cache
    /// update before this returns, the POST happens behind it.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn set_watched(&self, pct: u8) {
        let record = self.apply_local(|r| r.with_watched(pct));
        self.spawn_push(record);
    }

    /// Toggle the explicit completion mark. Undo is a legitimate transition:
    /// it returns the lesson to ready and clears the timestamp.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn set_completed(&self, done: bool) {
        let record = self.apply_local(|r| r.with_completed(done, Utc::now()));
        self.spawn_push(record);
    }

    fn apply_local(&self, update: impl FnOnce(ProgressRecord) -> ProgressRecord) -> ProgressRecord {
        let record = update(self.snapshot());
        self.set_state(record.clone());
        self.cache.save(&self.key, &record);
        record
    }

    fn set_state(&self, record: ProgressRecord) {
        match self.state.write() {
            Ok(mut guard) => *guard = record,
            Err(e) => {
                tracing::error!(error = %e, "failed to write progress state");
            }
        }
    }

    fn spawn_push(&self, record: ProgressRecord) {
        let this = self.clone();
        tokio::spawn(async move {
            this.push_with_retry(record).await;
        });
    }

    async fn push_with_retry(&self, record: ProgressRecord) {
        let attempts = self.policy.attempts.max(1);
        let mut delay = self.policy.base_delay;
        for attempt in 1..=attempts {
            match self.transport.push(&self.key, &record).await {
                Ok(()) => return,
                Err(e) if attempt < attempts => {
                    tracing::debug!(error = %e, attempt, "progress push failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempts, "progress push abandoned, keeping optimistic value");
                }
            }
        }
    }
}
