//! Message types exchanged with the UI surfaces

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{
    CompatibilityData, CompatibleIde, HistoryEntry, IdeEntry, PageDescriptor, PerformanceSample,
    RepoRef, Workspace,
};
use crate::sync::{SaveOutcome, SyncReport};

/// A request from the popup, options page or a content script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    SyncWorkspaces,
    SaveWorkspace {
        tab: PageDescriptor,
    },
    GetWorkspaces,
    CheckIdeStatus {
        url: String,
    },
    GetIdeStatuses,
    AddToHistory {
        ide: HistoryEntry,
    },
    ClearHistory,
    SearchIdes {
        #[serde(default)]
        query: String,
    },
    IdeCompatibilityData {
        data: CompatibilityData,
        #[serde(default, rename = "tabId")]
        tab_id: Option<i64>,
    },
    PerformanceData {
        data: PerformanceSample,
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    TabClosed {
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    RepositoryIdes {
        url: String,
    },
}

/// Toolbar badge the UI should show for a tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub text: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Sync(SyncReport),
    Saved(SaveOutcome),
    Workspaces {
        workspaces: Vec<Workspace>,
    },
    Status {
        url: String,
        available: bool,
    },
    Statuses(HashMap<String, bool>),
    Ack {
        success: bool,
    },
    Ides {
        ides: Vec<IdeEntry>,
    },
    Compatibility {
        ides: Vec<CompatibleIde>,
        #[serde(skip_serializing_if = "Option::is_none")]
        badge: Option<Badge>,
    },
    Performance {
        issues: Vec<String>,
    },
    Repository {
        repository: RepoRef,
        ides: Vec<CompatibleIde>,
    },
    Error {
        success: bool,
        error: String,
    },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            success: false,
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_type_tags() {
        let request: Request = serde_json::from_value(json!({"type": "SYNC_WORKSPACES"})).unwrap();
        assert_eq!(request, Request::SyncWorkspaces);

        let request: Request =
            serde_json::from_value(json!({"type": "CHECK_IDE_STATUS", "url": "https://vscode.dev"})).unwrap();
        assert_eq!(request, Request::CheckIdeStatus { url: "https://vscode.dev".to_string() });

        let request: Request = serde_json::from_value(json!({
            "type": "PERFORMANCE_DATA",
            "tabId": 3,
            "data": {"loadTime": 10}
        }))
        .unwrap();
        assert!(matches!(request, Request::PerformanceData { tab_id: 3, .. }));

        let request: Request = serde_json::from_value(json!({
            "type": "SAVE_WORKSPACE",
            "tab": {"title": "Repo", "url": "https://github.com/a/b", "favIconUrl": "f.ico"}
        }))
        .unwrap();
        match request {
            Request::SaveWorkspace { tab } => assert_eq!(tab.fav_icon_url.as_deref(), Some("f.ico")),
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_tab_and_repository_requests() {
        let request: Request = serde_json::from_value(json!({"type": "TAB_CLOSED", "tabId": 9})).unwrap();
        assert_eq!(request, Request::TabClosed { tab_id: 9 });

        let request: Request = serde_json::from_value(json!({"type": "CLEAR_HISTORY"})).unwrap();
        assert_eq!(request, Request::ClearHistory);

        let request: Request =
            serde_json::from_value(json!({"type": "REPOSITORY_IDES", "url": "https://github.com/a/b"})).unwrap();
        assert_eq!(request, Request::RepositoryIdes { url: "https://github.com/a/b".to_string() });
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(serde_json::from_value::<Request>(json!({"type": "LAUNCH_ROCKET"})).is_err());
    }

    #[test]
    fn test_sync_response_shape() {
        let ok = serde_json::to_value(Response::Sync(SyncReport::ok())).unwrap();
        assert_eq!(ok, json!({"success": true}));

        let err = serde_json::to_value(Response::error("quota")).unwrap();
        assert_eq!(err, json!({"success": false, "error": "quota"}));
    }
}
