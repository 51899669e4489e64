pub mod client;
pub mod query;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository item as returned by the GitHub search API.
///
/// Snapshot files store this layout; fields the tool does not use are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRepository {
    pub full_name: String,
    pub name: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<RawOwner>,
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Repository owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOwner {
    pub login: String,
    #[serde(default)]
    pub html_url: Option<String>,
}
