pub mod analyzer;
pub mod compare;
pub mod snapshot;

use crate::github::{RawOwner, RawRepository};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language bucket for repositories without a primary language
pub const UNSPECIFIED_LANGUAGE: &str = "N/A";

/// A repository as captured in a snapshot.
///
/// Records are normalized when they are deserialized: a missing fork count
/// becomes 0 and a missing, null or blank language becomes
/// [`UNSPECIFIED_LANGUAGE`]. On disk they keep the search API item layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRepository", into = "RawRepository")]
pub struct RepositoryRecord {
    /// `owner/name`, unique within a snapshot
    pub full_name: String,
    /// Display name
    pub name: String,
    /// Link to the repository page
    pub html_url: String,
    /// Repository description
    pub description: Option<String>,
    /// Owner login
    pub owner_login: Option<String>,
    /// Link to the owner's profile
    pub owner_url: Option<String>,
    /// Star count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
    /// Primary language, or [`UNSPECIFIED_LANGUAGE`]
    pub language: String,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RawRepository> for RepositoryRecord {
    fn from(raw: RawRepository) -> Self {
        let language = raw
            .language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| UNSPECIFIED_LANGUAGE.to_string());

        let (owner_login, owner_url) = match raw.owner {
            Some(owner) => (Some(owner.login), owner.html_url),
            None => (None, None),
        };

        Self {
            full_name: raw.full_name,
            name: raw.name,
            html_url: raw.html_url,
            description: raw.description,
            owner_login,
            owner_url,
            stars: raw.stargazers_count,
            forks: raw.forks_count.unwrap_or(0),
            language,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

impl From<RepositoryRecord> for RawRepository {
    fn from(record: RepositoryRecord) -> Self {
        let language = if record.language == UNSPECIFIED_LANGUAGE {
            None
        } else {
            Some(record.language)
        };

        Self {
            full_name: record.full_name,
            name: record.name,
            html_url: record.html_url,
            description: record.description,
            owner: record.owner_login.map(|login| RawOwner {
                login,
                html_url: record.owner_url,
            }),
            stargazers_count: record.stars,
            forks_count: Some(record.forks),
            language,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Ordered repositories captured on one calendar date.
///
/// Rank is the 1-based position in `repositories`; it is never stored.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Capture date
    pub captured_on: NaiveDate,
    /// Repositories in rank order
    pub repositories: Vec<RepositoryRecord>,
}

impl Snapshot {
    /// Create a snapshot
    pub fn new(captured_on: NaiveDate, repositories: Vec<RepositoryRecord>) -> Self {
        Self {
            captured_on,
            repositories,
        }
    }

    /// Iterate over `(rank, record)` pairs, rank starting at 1
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &RepositoryRecord)> {
        self.repositories.iter().enumerate().map(|(i, r)| (i + 1, r))
    }
}

/// Language occurrence counts, most common first.
///
/// Languages with equal counts stay in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageHistogram(Vec<(String, usize)>);

impl LanguageHistogram {
    pub(crate) fn from_ordered(entries: Vec<(String, usize)>) -> Self {
        Self(entries)
    }

    /// Count for a language, 0 when absent
    pub fn get(&self, language: &str) -> usize {
        self.0
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(lang, count)| (lang.as_str(), *count))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(lang, _)| lang.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Totals and language mix of one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub repo_count: usize,
    pub total_stars: u64,
    pub total_forks: u64,
    pub languages: LanguageHistogram,
}

/// Percentage change relative to a baseline.
///
/// A zero baseline has no meaningful percentage and yields `NotApplicable`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentChange {
    Percent(f64),
    NotApplicable,
}

impl PercentChange {
    /// Signed change from `previous` to `current`, in percent
    pub fn between(previous: u64, current: u64) -> Self {
        if previous == 0 {
            return Self::NotApplicable;
        }
        let delta = current as f64 - previous as f64;
        Self::Percent(delta / previous as f64 * 100.0)
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{:+.2}%", p),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Change in a scalar total between two snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarDelta {
    pub previous: u64,
    pub current: u64,
    pub delta: i64,
    pub percent: PercentChange,
}

impl ScalarDelta {
    pub fn new(previous: u64, current: u64) -> Self {
        Self {
            previous,
            current,
            delta: current as i64 - previous as i64,
            percent: PercentChange::between(previous, current),
        }
    }
}

/// Change in the number of repositories using a language
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageDelta {
    pub language: String,
    pub previous: usize,
    pub current: usize,
    pub delta: i64,
    pub percent: PercentChange,
}

/// Repository that was not in the previous snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntrant {
    pub full_name: String,
    pub name: String,
    /// Rank in the current snapshot
    pub rank: usize,
    pub stars: u64,
}

/// Repository whose rank moved between snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct RankChange {
    pub full_name: String,
    pub name: String,
    pub previous_rank: usize,
    pub current_rank: usize,
    /// `previous_rank - current_rank`; positive means it moved toward rank 1
    pub rank_delta: i64,
    pub previous_stars: u64,
    pub current_stars: u64,
    /// Star velocity relative to `previous_stars`
    pub star_change: PercentChange,
}

impl RankChange {
    /// Whether the repository moved up the ranking
    pub fn improved(&self) -> bool {
        self.rank_delta > 0
    }
}

/// Difference between a previous and a current snapshot.
///
/// Repositories that dropped out of the current snapshot are not reported.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendComparison {
    pub stars: ScalarDelta,
    pub forks: ScalarDelta,
    /// Languages whose count changed, sorted by language name
    pub languages: Vec<LanguageDelta>,
    /// New entrants in current rank order
    pub new_entrants: Vec<NewEntrant>,
    /// Rank moves, largest absolute move first
    pub rank_changes: Vec<RankChange>,
}

impl TrendComparison {
    /// True when nothing moved between the two snapshots
    pub fn is_unchanged(&self) -> bool {
        self.stars.delta == 0
            && self.forks.delta == 0
            && self.languages.is_empty()
            && self.new_entrants.is_empty()
            && self.rank_changes.is_empty()
    }
}
