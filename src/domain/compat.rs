//! Page compatibility and repository URL helpers
//!
//! Decides which web IDEs can open the page a content script reports, and
//! builds IDE URLs from repository references.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult};

/// Hosts accepted as repository URLs
const REPOSITORY_HOSTS: [&str; 3] = ["github.com", "gitlab.com", "bitbucket.org"];

/// What the content script reports about the current page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityData {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "isGitHub")]
    pub is_github: bool,
    #[serde(default, rename = "isGitLab")]
    pub is_gitlab: bool,
    #[serde(default)]
    pub is_bitbucket: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibleIde {
    pub name: String,
    pub url: String,
}

/// IDEs able to open the reported page, in display order
pub fn find_compatible_ides(data: &CompatibilityData) -> Vec<CompatibleIde> {
    let mut ides = Vec::new();

    if data.is_github {
        ides.push(CompatibleIde {
            name: "GitHub.dev".to_string(),
            url: data.url.replacen("github.com", "github.dev", 1),
        });
        ides.push(CompatibleIde {
            name: "Gitpod".to_string(),
            url: format!("https://gitpod.io/#{}", data.url),
        });
    }

    if data.is_gitlab {
        ides.push(CompatibleIde {
            name: "GitLab Web IDE".to_string(),
            url: format!("{}/-/ide/", data.url),
        });
    }

    ides
}

/// Owner/repo pair parsed from a GitHub URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub is_valid: bool,
}

fn github_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://(?:www\.)?github\.com/([^/?#]+)/([^/?#]+?)(?:\.git)?(?:[/?#].*)?$")
            .expect("github url pattern is valid")
    })
}

pub fn parse_github_url(url: &str) -> RepoRef {
    match github_pattern().captures(url.trim()) {
        Some(caps) => RepoRef {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            is_valid: true,
        },
        None => RepoRef::default(),
    }
}

pub fn github_dev_url(repo: &RepoRef) -> String {
    format!("https://github.dev/{}/{}", repo.owner, repo.repo)
}

pub fn codesandbox_url(repo: &RepoRef) -> String {
    format!("https://codesandbox.io/s/github/{}/{}", repo.owner, repo.repo)
}

pub fn stackblitz_url(repo: &RepoRef) -> String {
    format!("https://stackblitz.com/github/{}/{}", repo.owner, repo.repo)
}

/// Absolute http(s) URL on a known forge with at least `owner/repo` in the path
pub fn is_valid_repository_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let host = parsed.host_str().unwrap_or_default().trim_start_matches("www.");
    if !REPOSITORY_HOSTS.contains(&host) {
        return false;
    }
    parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).count() >= 2)
        .unwrap_or(false)
}

/// Web IDE links for a repository URL. Only GitHub repositories map to IDE
/// links; other known forges yield an empty list.
pub fn ides_for_repository(url: &str) -> DomainResult<(RepoRef, Vec<CompatibleIde>)> {
    if !is_valid_repository_url(url) {
        return Err(DomainError::InvalidInput(format!("not a repository url: {}", url)));
    }

    let repo = parse_github_url(url);
    if !repo.is_valid {
        return Ok((repo, Vec::new()));
    }

    let ides = vec![
        CompatibleIde {
            name: "GitHub.dev".to_string(),
            url: github_dev_url(&repo),
        },
        CompatibleIde {
            name: "CodeSandbox".to_string(),
            url: codesandbox_url(&repo),
        },
        CompatibleIde {
            name: "StackBlitz".to_string(),
            url: stackblitz_url(&repo),
        },
    ];
    Ok((repo, ides))
}
