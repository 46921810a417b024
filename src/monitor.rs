//! Per-tab performance tracking

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Notification, PerformanceSample};
use crate::notify::NotificationSink;

/// Samples not refreshed for this long are dropped
pub const SAMPLE_TTL_MS: i64 = 30 * 60 * 1000;

pub struct PerformanceMonitor {
    samples: Mutex<HashMap<i64, PerformanceSample>>,
    notifier: Arc<dyn NotificationSink>,
}

impl PerformanceMonitor {
    pub fn new(notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            samples: Mutex::new(HashMap::new()),
            notifier,
        }
    }

    /// Fold `update` into the tab's sample and alert on any threshold breach.
    /// Returns the issues found.
    pub async fn record(&self, tab_id: i64, update: &PerformanceSample, now: i64) -> Vec<String> {
        let merged = {
            let mut samples = self.samples.lock().await;
            let cutoff = now.saturating_sub(SAMPLE_TTL_MS);
            samples.retain(|_, sample| sample.timestamp >= cutoff);

            let merged = samples
                .get(&tab_id)
                .cloned()
                .unwrap_or_default()
                .merged_with(update, now);
            samples.insert(tab_id, merged.clone());
            merged
        };

        let issues = merged.issues();
        if !issues.is_empty() {
            log::warn!("Tab {} performance issues: {}", tab_id, issues.join(", "));
            self.notifier.notify(Notification::performance_issues(&issues));
        }
        issues
    }

    pub async fn sample(&self, tab_id: i64) -> Option<PerformanceSample> {
        self.samples.lock().await.get(&tab_id).cloned()
    }

    /// Forget a closed tab. Returns whether it had a sample.
    pub async fn forget(&self, tab_id: i64) -> bool {
        self.samples.lock().await.remove(&tab_id).is_some()
    }
}
