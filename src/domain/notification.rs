//! User-visible alerts

use serde::{Deserialize, Serialize};

pub const DEFAULT_ICON: &str = "icons/icon48.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    WorkspaceSaved,
    WorkspaceSyncFailed,
    StatusAlert,
    PerformanceAlert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub icon_url: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: &str, message: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
            icon_url: DEFAULT_ICON.to_string(),
        }
    }

    pub fn workspace_saved(title: &str) -> Self {
        Self::new(
            NotificationKind::WorkspaceSaved,
            "Workspace Saved",
            format!("\"{}\" has been saved", title),
        )
    }

    pub fn workspace_sync_failed(title: &str, error: &str) -> Self {
        Self::new(
            NotificationKind::WorkspaceSyncFailed,
            "Workspace Sync Failed",
            format!("\"{}\" was saved on this device but could not be synced: {}", title, error),
        )
    }

    pub fn ides_unavailable(count: usize) -> Self {
        Self::new(
            NotificationKind::StatusAlert,
            "IDE Status Alert",
            format!("{} IDE(s) are currently unavailable", count),
        )
    }

    pub fn performance_issues(issues: &[String]) -> Self {
        Self::new(
            NotificationKind::PerformanceAlert,
            "Performance Alert",
            format!("Issues detected: {}", issues.join(", ")),
        )
    }
}
