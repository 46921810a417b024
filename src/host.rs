//! Stdio Host
//!
//! Line-delimited JSON over a reader/writer pair (stdin/stdout in the
//! binary). Each input line is either `{"id": .., "message": {..}}` or a bare
//! message; each reply is `{"id": .., "response": {..}}`. Notifications are
//! pushed as `{"notification": {..}}` lines as they happen.
//!
//! Requests run concurrently, so replies may come back out of order.

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::commands::handle_json;
use crate::domain::Notification;
use crate::AppState;

/// Serve until the reader closes. Requests still running at that point are
/// awaited, and their notifications written, before returning.
pub async fn serve<R, W>(
    reader: R,
    mut writer: W,
    state: Arc<AppState>,
    mut notifications: mpsc::UnboundedReceiver<Notification>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    let write_task = tokio::spawn(async move {
        while let Some(line) = out_rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
        let _ = writer.shutdown().await;
    });

    let mut requests = JoinSet::new();
    let mut notifications_open = true;
    let mut lines = BufReader::new(reader).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                dispatch_line(line.trim(), &state, &out_tx, &mut requests);
            }
            notification = notifications.recv(), if notifications_open => match notification {
                Some(notification) => forward_notification(&out_tx, notification),
                None => notifications_open = false,
            },
            Some(joined) = requests.join_next(), if !requests.is_empty() => {
                if let Err(e) = joined {
                    log::error!("Request task failed: {}", e);
                }
            }
        }
    }

    log::info!("Input closed, finishing {} pending requests", requests.len());
    while let Some(joined) = requests.join_next().await {
        if let Err(e) = joined {
            log::error!("Request task failed: {}", e);
        }
    }
    while let Ok(notification) = notifications.try_recv() {
        forward_notification(&out_tx, notification);
    }

    drop(out_tx);
    let _ = write_task.await;
    Ok(())
}

fn dispatch_line(
    line: &str,
    state: &Arc<AppState>,
    out_tx: &mpsc::UnboundedSender<String>,
    requests: &mut JoinSet<()>,
) {
    if line.is_empty() {
        return;
    }

    let (id, message) = match serde_json::from_str::<Value>(line) {
        Ok(value) => split_envelope(value),
        Err(e) => {
            log::warn!("Ignoring unparseable line: {}", e);
            let reply = json!({
                "id": Value::Null,
                "response": { "success": false, "error": format!("invalid json: {}", e) },
            });
            let _ = out_tx.send(reply.to_string());
            return;
        }
    };

    let state = state.clone();
    let out_tx = out_tx.clone();
    requests.spawn(async move {
        let response = handle_json(&state, message).await;
        let reply = json!({ "id": id, "response": response });
        let _ = out_tx.send(reply.to_string());
    });
}

fn forward_notification(out_tx: &mpsc::UnboundedSender<String>, notification: Notification) {
    let line = json!({ "notification": notification }).to_string();
    if out_tx.send(line).is_err() {
        log::debug!("Notification dropped, output closed");
    }
}

/// `{"id", "message"}` envelope, or a bare message with no id
fn split_envelope(value: Value) -> (Value, Value) {
    match value {
        Value::Object(mut obj) if obj.contains_key("message") => {
            let id = obj.remove("id").unwrap_or(Value::Null);
            let message = obj.remove("message").unwrap_or(Value::Null);
            (id, message)
        }
        other => (Value::Null, other),
    }
}
