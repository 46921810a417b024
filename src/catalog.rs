//! IDE Catalog
//!
//! Built-in popular IDEs followed by the user's custom entries.

use std::sync::Arc;

use crate::domain::{DomainResult, IdeEntry};
use crate::repository::{keys, load_json, KeyValueStore};

pub struct Catalog {
    local: Arc<dyn KeyValueStore>,
}

impl Catalog {
    pub fn new(local: Arc<dyn KeyValueStore>) -> Self {
        Self { local }
    }

    pub async fn entries(&self) -> DomainResult<Vec<IdeEntry>> {
        let custom: Vec<IdeEntry> = load_json(self.local.as_ref(), keys::CUSTOM_IDES)
            .await?
            .unwrap_or_default();

        let mut entries = IdeEntry::popular();
        entries.extend(custom);
        Ok(entries)
    }

    /// Case-insensitive match on name or id; blank query returns everything
    pub async fn search(&self, query: &str) -> DomainResult<Vec<IdeEntry>> {
        let entries = self.entries().await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(entries);
        }
        Ok(entries.into_iter().filter(|ide| ide.matches(&needle)).collect())
    }
}
