use crate::error::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};

/// Maximum page size accepted by the search API
pub const MAX_PER_PAGE: u32 = 100;

/// Longest search window, in days
pub const MAX_DAYS: u32 = 3650;

/// Search parameters for recently created, most starred repositories
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingQuery {
    /// Only repositories created after this instant
    pub created_after: DateTime<Utc>,
    /// Number of repositories to request
    pub limit: u32,
}

impl TrendingQuery {
    /// Repositories created within the last `days` days, relative to `now`
    pub fn days_back(now: DateTime<Utc>, days: u32, limit: u32) -> Self {
        Self {
            created_after: now - Duration::days(days.min(MAX_DAYS) as i64),
            limit: limit.clamp(1, MAX_PER_PAGE),
        }
    }

    /// The `q` search qualifier, e.g. `created:>2025-07-24T15:48:57Z`
    pub fn qualifier(&self) -> String {
        format!(
            "created:>{}",
            self.created_after.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }

    /// Query string pairs for the search endpoint
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.qualifier()),
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
            ("per_page", self.limit.to_string()),
        ]
    }
}

/// Decode the base64 `content` field of a README response.
///
/// GitHub wraps the payload at 60 columns, so whitespace is stripped first.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn decode_readme(content: &str) -> Result<String> {
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(cleaned)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
