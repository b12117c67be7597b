use crate::integrations::SyncTarget;
use crate::storage::StoreError;
use crate::store::CrmStore;
use parking_lot::Mutex as SyncMutex;
use shared_types::{SyncConfig, SyncState, SyncStatus};
use spreadsheets::SheetError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Sync target rejected the push: {0}")]
    Remote(String),

    #[error("Cloud sync has not been set up")]
    NotConfigured,

    #[error("A sync is already running")]
    InProgress,

    #[error(transparent)]
    Encode(#[from] SheetError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed { last_sync: String },
    /// Another sync was running; nothing was pushed.
    Skipped,
}

/// Resets the in-progress flag when a sync finishes, however it finishes.
struct InProgressGuard<'a>(&'a AtomicBool);

impl<'a> InProgressGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Pushes the whole dataset to the configured target on a fixed interval.
pub struct SyncManager {
    store: CrmStore,
    target: Arc<dyn SyncTarget>,
    state: SyncMutex<SyncState>,
    in_progress: AtomicBool,
    /// Stop signal of the running timer loop, if any.
    timer: Mutex<Option<Arc<Notify>>>,
}

impl SyncManager {
    pub fn new(store: CrmStore, target: Arc<dyn SyncTarget>) -> Arc<Self> {
        Arc::new(Self {
            store,
            target,
            state: SyncMutex::new(SyncState::Disabled),
            in_progress: AtomicBool::new(false),
            timer: Mutex::new(None),
        })
    }

    pub fn state(&self) -> SyncState {
        *self.state.lock()
    }

    fn set_state(&self, state: SyncState) {
        *self.state.lock() = state;
    }

    pub fn status(&self) -> Result<SyncStatus, SyncError> {
        Ok(SyncStatus {
            state: self.state(),
            in_progress: self.in_progress.load(Ordering::Acquire),
            config: self.store.sync_config()?,
        })
    }

    /// Turn sync on: push once, and only if that succeeds save the settings and start the
    /// timer. On failure the manager is left disabled, and any stored settings are marked
    /// disabled so a restart does not resume them.
    pub async fn enable(
        self: &Arc<Self>,
        target: &str,
        interval_minutes: u64,
    ) -> Result<SyncConfig, SyncError> {
        self.stop_timer().await;
        self.set_state(SyncState::Enabling);

        let result = self.initial_sync(target).await;
        let last_sync = match result {
            Ok(last_sync) => last_sync,
            Err(e) => {
                tracing::error!("Failed to enable sync: {}", e);
                self.set_state(SyncState::Disabled);
                self.persist_disabled()?;
                return Err(e);
            }
        };

        let config = SyncConfig {
            is_enabled: true,
            target: target.to_string(),
            last_sync: Some(last_sync),
            sync_interval: interval_minutes.max(1),
        };
        if let Err(e) = self.store.save_sync_config(&config) {
            self.set_state(SyncState::Disabled);
            return Err(e.into());
        }

        self.start_timer(config.sync_interval).await;
        self.set_state(SyncState::Enabled);
        tracing::info!("Cloud sync enabled successfully");
        Ok(config)
    }

    async fn initial_sync(&self, target: &str) -> Result<String, SyncError> {
        let _guard = InProgressGuard::acquire(&self.in_progress).ok_or(SyncError::InProgress)?;
        let dataset = self.store.dataset()?;
        self.target.push(target, &dataset).await?;
        Ok(self.store.now())
    }

    /// Stop the timer and mark the stored settings disabled. A push already in flight is
    /// left to finish.
    pub async fn disable(&self) -> Result<(), SyncError> {
        self.stop_timer().await;
        self.set_state(SyncState::Disabled);
        self.persist_disabled()?;
        tracing::info!("Cloud sync disabled");
        Ok(())
    }

    fn persist_disabled(&self) -> Result<(), SyncError> {
        if let Some(mut config) = self.store.sync_config()? {
            if config.is_enabled {
                config.is_enabled = false;
                self.store.save_sync_config(&config)?;
            }
        }
        Ok(())
    }

    /// Resume the timer at startup when the stored settings say sync is on.
    pub async fn initialize(self: &Arc<Self>) -> Result<SyncState, SyncError> {
        match self.store.sync_config()? {
            Some(config) if config.is_enabled => {
                self.start_timer(config.sync_interval).await;
                self.set_state(SyncState::Enabled);
                tracing::info!("Auto sync initialized from saved config");
            }
            _ => self.set_state(SyncState::Disabled),
        }
        Ok(self.state())
    }

    /// Push now. Returns [`SyncOutcome::Skipped`] if another sync is still running.
    pub async fn sync_now(&self) -> Result<SyncOutcome, SyncError> {
        let Some(_guard) = InProgressGuard::acquire(&self.in_progress) else {
            tracing::warn!("Sync already in progress, skipping");
            return Ok(SyncOutcome::Skipped);
        };

        let config = self.store.sync_config()?.ok_or(SyncError::NotConfigured)?;
        let dataset = self.store.dataset()?;
        self.target.push(&config.target, &dataset).await?;

        // Re-read: the settings may have changed while the push was in flight
        let last_sync = self.store.now();
        let mut latest = self.store.sync_config()?.unwrap_or(config);
        latest.last_sync = Some(last_sync.clone());
        self.store.save_sync_config(&latest)?;

        tracing::info!("Sync completed at {}", last_sync);
        Ok(SyncOutcome::Completed { last_sync })
    }

    pub async fn shutdown(&self) {
        self.stop_timer().await;
        tracing::info!("Sync manager shut down");
    }

    async fn start_timer(self: &Arc<Self>, interval_minutes: u64) {
        self.stop_timer().await;

        let period = Duration::from_secs(interval_minutes.max(1) * 60);
        let manager: Weak<Self> = Arc::downgrade(self);
        let stop = Arc::new(Notify::new());
        let stopped = stop.clone();

        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // Stop is only observed between ticks; a push in flight runs to completion
                tokio::select! {
                    biased;
                    _ = stopped.notified() => break,
                    _ = interval.tick() => {}
                }
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                match manager.sync_now().await {
                    Ok(SyncOutcome::Completed { .. }) => {
                        tracing::debug!("Auto sync completed");
                    }
                    Ok(SyncOutcome::Skipped) => {}
                    Err(e) => {
                        tracing::error!("Auto sync failed: {}", e);
                    }
                }
            }
            tracing::debug!("Auto sync timer stopped");
        });

        *self.timer.lock().await = Some(stop);
        tracing::info!("Auto sync started with {} minute interval", interval_minutes.max(1));
    }

    async fn stop_timer(&self) {
        if let Some(stop) = self.timer.lock().await.take() {
            stop.notify_one();
        }
    }
}
