//! Message Router
//!
//! Dispatches a request to its command and shapes the response. A bad
//! request or a failing command produces an error response; nothing here
//! takes the worker down.

use serde_json::Value;

use super::message::{Request, Response};
use super::{history_cmd, page_cmd, status_cmd, sync_cmd};
use crate::AppState;

pub async fn handle_message(state: &AppState, request: Request) -> Response {
    match request {
        Request::SyncWorkspaces => Response::Sync(sync_cmd::sync_workspaces(state).await),
        Request::SaveWorkspace { tab } => match sync_cmd::save_workspace(state, tab).await {
            Ok(outcome) => Response::Saved(outcome),
            Err(e) => Response::error(e),
        },
        Request::GetWorkspaces => Response::Workspaces {
            workspaces: sync_cmd::list_workspaces(state).await,
        },
        Request::CheckIdeStatus { url } => {
            let available = status_cmd::check_ide_status(state, &url).await;
            Response::Status { url, available }
        }
        Request::GetIdeStatuses => Response::Statuses(status_cmd::get_ide_statuses(state).await),
        Request::AddToHistory { ide } => match history_cmd::add_to_history(state, ide).await {
            Ok(()) => Response::Ack { success: true },
            Err(e) => Response::error(e),
        },
        Request::ClearHistory => match history_cmd::clear_history(state).await {
            Ok(()) => Response::Ack { success: true },
            Err(e) => Response::error(e),
        },
        Request::SearchIdes { query } => match history_cmd::search_ides(state, &query).await {
            Ok(ides) => Response::Ides { ides },
            Err(e) => Response::error(e),
        },
        Request::IdeCompatibilityData { data, tab_id } => {
            let (ides, badge) = page_cmd::ide_compatibility(&data, tab_id);
            Response::Compatibility { ides, badge }
        }
        Request::PerformanceData { data, tab_id } => Response::Performance {
            issues: page_cmd::performance_data(state, tab_id, &data).await,
        },
        Request::TabClosed { tab_id } => {
            page_cmd::tab_closed(state, tab_id).await;
            Response::Ack { success: true }
        }
        Request::RepositoryIdes { url } => match page_cmd::repository_ides(&url) {
            Ok((repository, ides)) => Response::Repository { repository, ides },
            Err(e) => Response::error(e),
        },
    }
}

/// Decode a raw message, dispatch it and encode the response
pub async fn handle_json(state: &AppState, message: Value) -> Value {
    let response = match serde_json::from_value::<Request>(message) {
        Ok(request) => {
            log::debug!("Handling {:?}", request);
            handle_message(state, request).await
        }
        Err(e) => {
            log::warn!("Rejected message: {}", e);
            Response::error(format!("invalid message: {}", e))
        }
    };

    serde_json::to_value(&response).unwrap_or_else(|e| {
        serde_json::json!({ "success": false, "error": format!("failed to encode response: {}", e) })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;
    use crate::notify::RecordingNotifier;
    use crate::repository::tests::FlakyStore;
    use crate::repository::{MemoryStore, StoreScope};
    use crate::status::AvailabilityProber;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    struct AlwaysUp;

    #[async_trait]
    impl AvailabilityProber for AlwaysUp {
        async fn probe(&self, _url: &str) -> bool {
            true
        }
    }

    fn test_state(synced: Arc<dyn crate::repository::KeyValueStore>) -> (AppState, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::from_parts(
            Arc::new(MemoryStore::new(StoreScope::Local)),
            synced,
            Arc::new(AlwaysUp),
            notifier.clone(),
            100,
        );
        (state, notifier)
    }

    #[tokio::test]
    async fn test_sync_message() {
        let (state, _) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));
        let response = handle_json(&state, json!({"type": "SYNC_WORKSPACES"})).await;
        assert_eq!(response, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_sync_message_reports_failure() {
        let synced = FlakyStore::new(StoreScope::Sync);
        synced.fail_reads.store(true, Ordering::SeqCst);
        let (state, _) = test_state(synced);

        let response = handle_json(&state, json!({"type": "SYNC_WORKSPACES"})).await;
        assert_eq!(response["success"], json!(false));
        assert!(response["error"].as_str().unwrap().contains("quota"));
    }

    #[tokio::test]
    async fn test_save_then_list() {
        let (state, notifier) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));

        let saved = handle_json(
            &state,
            json!({"type": "SAVE_WORKSPACE", "tab": {"title": "Test IDE", "url": "https://example.com", "favIconUrl": "favicon.ico"}}),
        )
        .await;
        assert_eq!(saved["success"], json!(true));
        assert_eq!(saved["workspace"]["title"], json!("Test IDE"));
        assert_eq!(saved["workspace"]["favicon"], json!("favicon.ico"));

        let listed = handle_json(&state, json!({"type": "GET_WORKSPACES"})).await;
        assert_eq!(listed["workspaces"].as_array().unwrap().len(), 1);
        assert_eq!(notifier.sent()[0].kind, NotificationKind::WorkspaceSaved);
    }

    #[tokio::test]
    async fn test_status_messages() {
        let (state, _) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));

        let response = handle_json(&state, json!({"type": "CHECK_IDE_STATUS", "url": "https://example.com"})).await;
        assert_eq!(response, json!({"url": "https://example.com", "available": true}));

        let statuses = handle_json(&state, json!({"type": "GET_IDE_STATUSES"})).await;
        assert_eq!(statuses, json!({"https://example.com": true}));
    }

    #[tokio::test]
    async fn test_history_and_search() {
        let (state, _) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));

        let ack = handle_json(
            &state,
            json!({"type": "ADD_TO_HISTORY", "ide": {"id": "vscode", "url": "https://vscode.dev", "timestamp": 1}}),
        )
        .await;
        assert_eq!(ack, json!({"success": true}));
        assert_eq!(state.history.list().await.unwrap().len(), 1);

        let found = handle_json(&state, json!({"type": "SEARCH_IDES", "query": "github"})).await;
        let ides = found["ides"].as_array().unwrap();
        assert_eq!(ides.len(), 1);
        assert_eq!(ides[0]["url"], json!("https://github.dev"));
    }

    #[tokio::test]
    async fn test_compatibility_sets_badge() {
        let (state, _) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));
        let response = handle_json(
            &state,
            json!({
                "type": "IDE_COMPATIBILITY_DATA",
                "tabId": 7,
                "data": {"url": "https://github.com/user/repo", "isGitHub": true}
            }),
        )
        .await;
        assert_eq!(response["ides"].as_array().unwrap().len(), 2);
        assert_eq!(response["badge"], json!({"text": "2", "color": "#4CAF50", "tabId": 7}));

        let plain = handle_json(
            &state,
            json!({"type": "IDE_COMPATIBILITY_DATA", "data": {"url": "https://example.com"}}),
        )
        .await;
        assert_eq!(plain, json!({"ides": []}));
    }

    #[tokio::test]
    async fn test_performance_message_alerts() {
        let (state, notifier) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));
        let response = handle_json(
            &state,
            json!({
                "type": "PERFORMANCE_DATA",
                "tabId": 1,
                "data": {"loadTime": 6000, "memoryUsage": 157286400, "networkRequests": 120}
            }),
        )
        .await;
        assert_eq!(response["issues"].as_array().unwrap().len(), 3);
        assert_eq!(notifier.sent()[0].title, "Performance Alert");
    }

    #[tokio::test]
    async fn test_tab_closed_forgets_sample() {
        let (state, _) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));
        handle_json(
            &state,
            json!({"type": "PERFORMANCE_DATA", "tabId": 5, "data": {"loadTime": 10}}),
        )
        .await;
        assert!(state.monitor.sample(5).await.is_some());

        let ack = handle_json(&state, json!({"type": "TAB_CLOSED", "tabId": 5})).await;
        assert_eq!(ack, json!({"success": true}));
        assert!(state.monitor.sample(5).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_history_message() {
        let (state, _) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));
        handle_json(
            &state,
            json!({"type": "ADD_TO_HISTORY", "ide": {"id": "vscode", "url": "https://vscode.dev", "timestamp": 1}}),
        )
        .await;

        let ack = handle_json(&state, json!({"type": "CLEAR_HISTORY"})).await;
        assert_eq!(ack, json!({"success": true}));
        assert!(state.history.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repository_ides_message() {
        let (state, _) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));
        let response = handle_json(
            &state,
            json!({"type": "REPOSITORY_IDES", "url": "https://github.com/user/repo"}),
        )
        .await;
        assert_eq!(
            response["repository"],
            json!({"owner": "user", "repo": "repo", "isValid": true})
        );
        assert_eq!(response["ides"][0]["url"], json!("https://github.dev/user/repo"));
        assert_eq!(response["ides"].as_array().unwrap().len(), 3);

        let rejected = handle_json(&state, json!({"type": "REPOSITORY_IDES", "url": "not-a-url"})).await;
        assert_eq!(rejected["success"], json!(false));
    }

    #[tokio::test]
    async fn test_bad_messages_get_error_response() {
        let (state, _) = test_state(Arc::new(MemoryStore::new(StoreScope::Sync)));

        let unknown = handle_json(&state, json!({"type": "LAUNCH_ROCKET"})).await;
        assert_eq!(unknown["success"], json!(false));

        let missing = handle_json(&state, json!({"type": "CHECK_IDE_STATUS"})).await;
        assert_eq!(missing["success"], json!(false));

        let empty_url = handle_json(&state, json!({"type": "SAVE_WORKSPACE", "tab": {"url": ""}})).await;
        assert_eq!(empty_url["success"], json!(false));
    }
}
