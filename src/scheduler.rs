//! Periodic Alarms
//!
//! Each alarm runs on its own interval task. A task awaits its run before
//! waiting for the next tick, so an alarm never overlaps with itself, and
//! missed ticks are skipped rather than bunched up.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::commands;
use crate::config::AlarmPeriods;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alarm {
    CheckStatuses,
    SyncWorkspaces,
    CleanupHistory,
}

impl Alarm {
    pub fn name(&self) -> &'static str {
        match self {
            Alarm::CheckStatuses => "checkStatuses",
            Alarm::SyncWorkspaces => "syncWorkspaces",
            Alarm::CleanupHistory => "cleanupHistory",
        }
    }

    pub fn schedule(periods: &AlarmPeriods) -> Vec<(Alarm, Duration)> {
        let minutes = |m: u64| Duration::from_secs(m.saturating_mul(60));
        vec![
            (Alarm::CheckStatuses, minutes(periods.check_statuses)),
            (Alarm::SyncWorkspaces, minutes(periods.sync_workspaces)),
            (Alarm::CleanupHistory, minutes(periods.cleanup_history)),
        ]
    }
}

/// Run one alarm's task now
pub async fn run_alarm(state: &AppState, alarm: Alarm) -> Result<(), String> {
    match alarm {
        Alarm::CheckStatuses => commands::check_ide_statuses(state).await.map(|_| ()),
        Alarm::SyncWorkspaces => {
            let report = commands::sync_workspaces(state).await;
            match report.error {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
        Alarm::CleanupHistory => commands::cleanup_history(state).await.map(|_| ()),
    }
}

pub struct Scheduler {
    tasks: Vec<(Alarm, JoinHandle<()>)>,
}

impl Scheduler {
    /// Start every alarm; the first run of each happens one period from now
    pub fn start(state: Arc<AppState>, alarms: Vec<(Alarm, Duration)>) -> Self {
        let tasks = alarms
            .into_iter()
            .map(|(alarm, period)| {
                let state = state.clone();
                let handle = tokio::spawn(async move {
                    let mut ticker = interval_at(Instant::now() + period, period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    loop {
                        ticker.tick().await;
                        log::debug!("Alarm {} fired", alarm.name());
                        if let Err(e) = run_alarm(&state, alarm).await {
                            log::warn!("Alarm {} failed: {}", alarm.name(), e);
                        }
                    }
                });
                log::info!("Alarm {} every {:?}", alarm.name(), period);
                (alarm, handle)
            })
            .collect();

        Self { tasks }
    }

    pub fn shutdown(self) {
        for (alarm, handle) in self.tasks {
            log::debug!("Stopping alarm {}", alarm.name());
            handle.abort();
        }
    }
}
