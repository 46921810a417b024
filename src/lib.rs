//! IDE Opener Background Worker
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Key-value store abstraction (local and synced scopes)
//! - sync: Workspace synchronization and merge
//! - commands: Message handlers for the UI surfaces
//! - status, history, catalog, monitor: worker services behind the commands
//! - scheduler, host: periodic alarms and the stdio message loop

use std::sync::Arc;

pub mod catalog;
pub mod commands;
pub mod config;
pub mod domain;
pub mod history;
pub mod host;
pub mod monitor;
pub mod notify;
pub mod repository;
pub mod scheduler;
pub mod status;
pub mod sync;

use catalog::Catalog;
use config::{StorageBackend, WorkerConfig};
use domain::DomainResult;
use history::HistoryLog;
use monitor::PerformanceMonitor;
use notify::{ChannelNotifier, NotificationSink};
use repository::{init_db, DbState, KeyValueStore, MemoryStore, StoreScope};
use scheduler::{Alarm, Scheduler};
use status::{AvailabilityProber, HttpProber, StatusBoard};
use sync::{Clock, SystemClock, WorkspaceSynchronizer};

/// Worker state shared across message handlers and alarms
pub struct AppState {
    pub db_state: Option<DbState>,
    pub local: Arc<dyn KeyValueStore>,
    pub synced: Arc<dyn KeyValueStore>,
    pub synchronizer: Arc<WorkspaceSynchronizer>,
    pub statuses: Arc<StatusBoard>,
    pub history: HistoryLog,
    pub catalog: Catalog,
    pub monitor: PerformanceMonitor,
    pub notifier: Arc<dyn NotificationSink>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wire services over the given stores
    pub fn from_parts(
        local: Arc<dyn KeyValueStore>,
        synced: Arc<dyn KeyValueStore>,
        prober: Arc<dyn AvailabilityProber>,
        notifier: Arc<dyn NotificationSink>,
        history_limit: usize,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let synchronizer = WorkspaceSynchronizer::new(synced.clone(), notifier.clone())
            .with_cache(local.clone())
            .with_clock(clock.clone());

        Self {
            db_state: None,
            statuses: Arc::new(StatusBoard::new(prober, local.clone(), notifier.clone())),
            history: HistoryLog::new(local.clone(), history_limit),
            catalog: Catalog::new(local.clone()),
            monitor: PerformanceMonitor::new(notifier.clone()),
            synchronizer: Arc::new(synchronizer),
            local,
            synced,
            notifier,
            clock,
        }
    }

    /// Open the configured stores and restore saved workspaces
    pub async fn open(config: &WorkerConfig, notifier: Arc<dyn NotificationSink>) -> DomainResult<Self> {
        let prober = Arc::new(HttpProber::new(config.probe_timeout())?);

        let state = match config.storage {
            StorageBackend::Sqlite => {
                let db_state = init_db(&config.db_path()).await?;
                log::info!("Database opened at {}", db_state.path().display());
                let local = Arc::new(db_state.store(StoreScope::Local));
                let synced = Arc::new(db_state.store(StoreScope::Sync));
                let mut state = Self::from_parts(local, synced, prober, notifier, config.history_limit);
                state.db_state = Some(db_state);
                state
            }
            StorageBackend::Memory => {
                log::warn!("Using in-memory storage; nothing will persist");
                Self::from_parts(
                    Arc::new(MemoryStore::new(StoreScope::Local)),
                    Arc::new(MemoryStore::new(StoreScope::Sync)),
                    prober,
                    notifier,
                    config.history_limit,
                )
            }
        };

        // Best effort: an unreadable local copy starts the worker empty
        match state.synchronizer.restore().await {
            Ok(restored) => log::info!("Worker state ready ({} workspaces)", restored),
            Err(e) => log::warn!("Starting without saved workspaces: {}", e),
        }
        Ok(state)
    }
}

/// Run the worker: logging, state, alarms and the stdio host
pub async fn run(config: WorkerConfig) -> DomainResult<()> {
    if let Err(e) = rolling_logger::init_logger(config.log_dir(), "ide-opener") {
        eprintln!("Logger unavailable: {}", e);
    }
    let _ = rolling_logger::info("Worker starting");

    let (notifier, notifications) = ChannelNotifier::channel();
    let state = Arc::new(AppState::open(&config, Arc::new(notifier)).await?);

    // Initial status check, as on install
    let startup = state.clone();
    tokio::spawn(async move {
        if let Err(e) = commands::check_ide_statuses(&startup).await {
            log::warn!("Initial status check failed: {}", e);
        }
    });

    let scheduler = Scheduler::start(state.clone(), Alarm::schedule(&config.alarms));

    let served = host::serve(tokio::io::stdin(), tokio::io::stdout(), state.clone(), notifications).await;
    scheduler.shutdown();

    if let Some(db) = &state.db_state {
        db.close().await;
    }

    served.map_err(|e| {
        let _ = rolling_logger::error(&format!("Host failed: {}", e));
        domain::DomainError::Internal(format!("host i/o failed: {}", e))
    })
}
