use crate::trends::{
    AggregateSummary, LanguageDelta, NewEntrant, PercentChange, RankChange, RepositoryRecord,
    ScalarDelta, TrendComparison,
};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

/// Rank and star count of a repository within one snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexEntry {
    rank: usize,
    stars: u64,
}

/// Compare a previous snapshot against the current one.
///
/// Both summaries must come from the matching repository lists. Repositories
/// are matched by `full_name` only. If a list repeats a name, the later
/// position wins in that list's index.
pub fn compare(
    previous_summary: &AggregateSummary,
    current_summary: &AggregateSummary,
    previous: &[RepositoryRecord],
    current: &[RepositoryRecord],
) -> TrendComparison {
    let previous_index = build_index(previous);
    let current_index = build_index(current);

    let mut new_entrants = Vec::new();
    let mut rank_changes = Vec::new();

    for repo in current {
        let now = current_index[repo.full_name.as_str()];

        match previous_index.get(repo.full_name.as_str()) {
            None => new_entrants.push(NewEntrant {
                full_name: repo.full_name.clone(),
                name: repo.name.clone(),
                rank: now.rank,
                stars: repo.stars,
            }),
            Some(before) if before.rank != now.rank => rank_changes.push(RankChange {
                full_name: repo.full_name.clone(),
                name: repo.name.clone(),
                previous_rank: before.rank,
                current_rank: now.rank,
                rank_delta: before.rank as i64 - now.rank as i64,
                previous_stars: before.stars,
                current_stars: repo.stars,
                star_change: PercentChange::between(before.stars, repo.stars),
            }),
            Some(_) => {}
        }
    }

    // sort_by_key is stable: equal moves keep current rank order
    rank_changes.sort_by_key(|change| Reverse(change.rank_delta.unsigned_abs()));

    TrendComparison {
        stars: ScalarDelta::new(previous_summary.total_stars, current_summary.total_stars),
        forks: ScalarDelta::new(previous_summary.total_forks, current_summary.total_forks),
        languages: language_deltas(previous_summary, current_summary),
        new_entrants,
        rank_changes,
    }
}

fn build_index(repositories: &[RepositoryRecord]) -> HashMap<&str, IndexEntry> {
    repositories
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            (
                repo.full_name.as_str(),
                IndexEntry {
                    rank: i + 1,
                    stars: repo.stars,
                },
            )
        })
        .collect()
}

/// Languages whose repository count changed, sorted by language name
fn language_deltas(previous: &AggregateSummary, current: &AggregateSummary) -> Vec<LanguageDelta> {
    let languages: BTreeSet<&str> = previous
        .languages
        .languages()
        .chain(current.languages.languages())
        .collect();

    languages
        .into_iter()
        .filter_map(|language| {
            let before = previous.languages.get(language);
            let after = current.languages.get(language);
            if before == after {
                return None;
            }
            Some(LanguageDelta {
                language: language.to_string(),
                previous: before,
                current: after,
                delta: after as i64 - before as i64,
                percent: PercentChange::between(before as u64, after as u64),
            })
        })
        .collect()
}
