//! IDE catalog entry

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A web IDE the user can launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeEntry {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub shortcut: Option<String>,
}

impl Entity for IdeEntry {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

impl IdeEntry {
    pub fn new(id: &str, name: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            description: None,
            icon: None,
            tags: Vec::new(),
            shortcut: None,
        }
    }

    /// Case-insensitive match on name or id; `needle` must already be lowercase
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.id.to_lowercase().contains(needle)
    }

    /// Built-in IDEs shown before any custom entries
    pub fn popular() -> Vec<IdeEntry> {
        vec![
            IdeEntry {
                description: Some("Visual Studio Code in the browser".to_string()),
                icon: Some("https://code.visualstudio.com/favicon.ico".to_string()),
                tags: vec!["JavaScript".into(), "Python".into(), "General".into()],
                shortcut: Some("1".to_string()),
                ..IdeEntry::new("vscode", "VS Code Web", "https://vscode.dev")
            },
            IdeEntry {
                description: Some("Edit GitHub repositories directly".to_string()),
                icon: Some("fab fa-github".to_string()),
                tags: vec!["Git".into(), "Cloud".into()],
                shortcut: Some("2".to_string()),
                ..IdeEntry::new("github", "GitHub.dev", "https://github.dev")
            },
        ]
    }
}
