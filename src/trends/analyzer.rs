use crate::trends::{AggregateSummary, LanguageHistogram, RepositoryRecord};
use std::collections::HashMap;

/// Summarize a ranked list of repositories.
///
/// Returns `None` for an empty list: there is nothing to report.
pub fn summarize(repositories: &[RepositoryRecord]) -> Option<AggregateSummary> {
    if repositories.is_empty() {
        return None;
    }

    Some(AggregateSummary {
        repo_count: repositories.len(),
        total_stars: repositories.iter().map(|r| r.stars).sum(),
        total_forks: repositories.iter().map(|r| r.forks).sum(),
        languages: language_histogram(repositories),
    })
}

/// Count repositories per language, most common first.
///
/// Counts are occurrences, not star-weighted. The sort is stable so
/// languages with equal counts keep their first-seen order.
pub fn language_histogram(repositories: &[RepositoryRecord]) -> LanguageHistogram {
    let mut entries: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for repo in repositories {
        match positions.get(repo.language.as_str()) {
            Some(&idx) => entries[idx].1 += 1,
            None => {
                positions.insert(repo.language.as_str(), entries.len());
                entries.push((repo.language.clone(), 1));
            }
        }
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1));
    LanguageHistogram::from_ordered(entries)
}
