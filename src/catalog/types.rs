use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored in `downloadUrl` when the server page had no download anchor
pub const NOT_FOUND_SENTINEL: &str = "NOT_FOUND";

/// Stored in `downloadUrl` when the server page could not be fetched
pub const ERROR_SENTINEL: &str = "ERROR";

/// Result of following one server/redirect page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The final download URL (absolute)
    Resolved(String),

    /// The page loaded but carried no download anchor
    NotFound,

    /// The page could not be fetched
    TransportError,
}

impl ResolveOutcome {
    /// Returns true if a real download URL was found
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The value persisted in `DownloadLink::download_url`
    pub fn as_str(&self) -> &str {
        match self {
            Self::Resolved(url) => url,
            Self::NotFound => NOT_FOUND_SENTINEL,
            Self::TransportError => ERROR_SENTINEL,
        }
    }

    /// Reads a persisted `download_url` value back into an outcome
    pub fn from_stored(value: &str) -> Self {
        match value {
            NOT_FOUND_SENTINEL => Self::NotFound,
            ERROR_SENTINEL => Self::TransportError,
            url => Self::Resolved(url.to_string()),
        }
    }
}

impl fmt::Display for ResolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ResolveOutcome> for String {
    fn from(outcome: ResolveOutcome) -> Self {
        match outcome {
            ResolveOutcome::Resolved(url) => url,
            other => other.as_str().to_string(),
        }
    }
}

/// One download-server entry on a detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    /// Resolution or release marker, `"Unknown"` when absent
    pub quality: String,

    /// Container extension, `"mkv"` when absent
    pub format: String,

    /// Human-readable size such as `1.4GB`, `"Unknown"` when absent
    pub size: String,

    /// Absolute URL of the server/redirect page
    pub server_url: String,

    /// Final download URL, or one of the `NOT_FOUND` / `ERROR` sentinels
    pub download_url: String,
}

impl DownloadLink {
    /// The resolution outcome encoded in `download_url`
    pub fn outcome(&self) -> ResolveOutcome {
        ResolveOutcome::from_stored(&self.download_url)
    }
}

/// One item detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Numeric id taken from the URL; may be empty and is not unique
    pub id: String,
    pub title: String,
    /// Identity key for deduplication
    pub url: String,
    pub thumbnail: String,
    pub category: String,
    pub year: String,
    pub description: String,
    pub links: Vec<DownloadLink>,
}

impl Movie {
    /// Number of links whose download URL was resolved
    pub fn resolved_links(&self) -> usize {
        self.links.iter().filter(|l| l.outcome().is_resolved()).count()
    }
}
