//! Launch history entry

use serde::{Deserialize, Serialize};

/// One IDE launch, appended by the popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub url: String,
    /// Launch time, unix ms
    #[serde(default)]
    pub timestamp: i64,
}
