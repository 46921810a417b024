//! IDE Availability
//!
//! Liveness probes for catalog entries and the board of last known results.
//! Results are informational for the UI; nothing else depends on them.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::{DomainError, DomainResult, IdeEntry, Notification};
use crate::notify::NotificationSink;
use crate::repository::{keys, load_json, KeyValueStore};

#[async_trait]
pub trait AvailabilityProber: Send + Sync {
    /// `true` when the IDE answered; never fails
    async fn probe(&self, url: &str) -> bool;
}

/// `HEAD` request; only a 200 counts as up
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AvailabilityProber for HttpProber {
    async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                log::debug!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }
}

pub struct StatusBoard {
    prober: Arc<dyn AvailabilityProber>,
    local: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn NotificationSink>,
    statuses: RwLock<HashMap<String, bool>>,
}

impl StatusBoard {
    pub fn new(
        prober: Arc<dyn AvailabilityProber>,
        local: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            prober,
            local,
            notifier,
            statuses: RwLock::new(HashMap::new()),
        }
    }

    /// Probe one URL and record the result
    pub async fn check(&self, url: &str) -> bool {
        let up = self.prober.probe(url).await;
        self.statuses.write().await.insert(url.to_string(), up);
        up
    }

    /// Probe every stored catalog entry in turn. Alerts once when any of
    /// them is down.
    pub async fn check_all(&self) -> DomainResult<HashMap<String, bool>> {
        let ides: Vec<IdeEntry> = load_json(self.local.as_ref(), keys::IDES)
            .await?
            .unwrap_or_default();

        let mut down = 0;
        for ide in &ides {
            if !self.check(&ide.url).await {
                down += 1;
            }
        }

        if down > 0 {
            log::warn!("{} of {} IDEs unavailable", down, ides.len());
            self.notifier.notify(Notification::ides_unavailable(down));
        }

        Ok(self.statuses().await)
    }

    pub async fn statuses(&self) -> HashMap<String, bool> {
        self.statuses.read().await.clone()
    }
}
