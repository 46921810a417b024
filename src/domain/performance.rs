//! Page performance samples and thresholds

use serde::{Deserialize, Serialize};

pub const MAX_LOAD_TIME_MS: f64 = 5000.0;
pub const MAX_MEMORY_BYTES: f64 = 100.0 * 1024.0 * 1024.0;
pub const MAX_NETWORK_REQUESTS: f64 = 100.0;

/// Metrics reported by a content script. Absent fields keep the previous value
/// when merged into a tab's running sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_requests: Option<f64>,
    /// Receive time, unix ms
    #[serde(default)]
    pub timestamp: i64,
}

impl PerformanceSample {
    /// Overlay `update` on top of `self`
    pub fn merged_with(&self, update: &PerformanceSample, now: i64) -> PerformanceSample {
        PerformanceSample {
            load_time: update.load_time.or(self.load_time),
            memory_usage: update.memory_usage.or(self.memory_usage),
            cpu_usage: update.cpu_usage.or(self.cpu_usage),
            network_requests: update.network_requests.or(self.network_requests),
            timestamp: now,
        }
    }

    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.load_time.is_some_and(|v| v > MAX_LOAD_TIME_MS) {
            issues.push("High load time".to_string());
        }
        if self.memory_usage.is_some_and(|v| v > MAX_MEMORY_BYTES) {
            issues.push("High memory usage".to_string());
        }
        if self.network_requests.is_some_and(|v| v > MAX_NETWORK_REQUESTS) {
            issues.push("Many network requests".to_string());
        }
        issues
    }
}
