//! Workspace domain entity
//!
//! A saved bookmark to an IDE session. Records are exchanged with the synced
//! store as `{id, title, url, favicon, created, lastModified}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::{DomainError, DomainResult, Entity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default)]
    pub created: i64,
    /// `None` sorts below every timestamp, so a record without one never
    /// displaces a competing record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

impl Entity for Workspace {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

impl Workspace {
    /// New record with `created == lastModified == now`
    pub fn from_page(id: String, page: &PageDescriptor, now: i64) -> Self {
        Self {
            id,
            title: page.title.clone(),
            url: page.url.clone(),
            favicon: page.fav_icon_url.clone(),
            created: now,
            last_modified: Some(now),
        }
    }

    /// Leniently decode one stored record.
    ///
    /// Missing or non-string `id` is rejected. A `lastModified` that is
    /// missing or not a number decodes as `None`.
    pub fn from_value(value: &Value) -> DomainResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| DomainError::InvalidInput("workspace record is not an object".into()))?;

        let id = match obj.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(DomainError::InvalidInput("workspace record has no id".into())),
        };

        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            id,
            title: text("title").unwrap_or_default(),
            url: text("url").unwrap_or_default(),
            favicon: text("favicon"),
            created: obj.get("created").and_then(as_millis).unwrap_or(0),
            last_modified: obj.get("lastModified").and_then(as_millis),
        })
    }
}

fn as_millis(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// The page a workspace is saved from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
}
