use crate::report::truncate_chars;
use crate::trends::{AggregateSummary, RepositoryRecord, ScalarDelta, TrendComparison};
use chrono::NaiveDate;

const DESCRIPTION_LIMIT: usize = 100;

/// Render the current ranking and its summary for the terminal
pub fn render_overview(repos: &[RepositoryRecord], summary: &AggregateSummary) -> String {
    let header = "Trending GitHub repositories";
    let separator = "=".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("{}\n{}\n{}\n", separator, header, separator));
    out.push_str(&format!("Found {} repositories\n", summary.repo_count));

    for (i, repo) in repos.iter().enumerate() {
        out.push_str(&format!("\n#{} {}\n", i + 1, repo.name));
        out.push_str(&format!("  Link: {}\n", repo.html_url));

        let description = repo.description.as_deref().unwrap_or("No description");
        out.push_str(&format!(
            "  Description: {}\n",
            truncate_chars(description, DESCRIPTION_LIMIT)
        ));
        out.push_str(&format!("  Stars: {}\n", repo.stars));
        out.push_str(&format!("  Language: {}\n", repo.language));

        if let Some(created) = repo.created_at {
            out.push_str(&format!("  Created: {}\n", created.format("%Y-%m-%d")));
        }
        if let Some(updated) = repo.updated_at {
            out.push_str(&format!("  Updated: {}\n", updated.format("%Y-%m-%d")));
        }
        out.push_str(&format!("{}\n", "-".repeat(50)));
    }

    out.push_str(&format!("\nLanguages ({}):\n", summary.languages.len()));
    for (language, count) in summary.languages.iter() {
        out.push_str(&format!("  {}: {} {}\n", language, count, plural(count)));
    }

    out.push_str(&format!("\nTotal stars: {}\n", summary.total_stars));
    out.push_str(&format!("Total forks: {}\n", summary.total_forks));
    out.push_str(&format!("{}\n", separator));

    out
}

/// Render a trend comparison against the snapshot captured on `baseline`
pub fn render_comparison(comparison: &TrendComparison, baseline: NaiveDate) -> String {
    let separator = "=".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("{}\n", separator));
    out.push_str(&format!("Trend changes since {}\n", baseline.format("%Y-%m-%d")));
    out.push_str(&format!("{}\n", separator));

    out.push_str(&format!("{}\n", scalar_line("Total stars", &comparison.stars)));
    out.push_str(&format!("{}\n", scalar_line("Total forks", &comparison.forks)));

    out.push_str("\nLanguage changes:\n");
    if comparison.languages.is_empty() {
        out.push_str("  (none)\n");
    }
    for language in &comparison.languages {
        out.push_str(&format!(
            "  - {}: {} -> {} (change: {:+}, {})\n",
            language.language, language.previous, language.current, language.delta, language.percent
        ));
    }

    if !comparison.new_entrants.is_empty() {
        out.push_str(&format!("\nNew entrants ({}):\n", comparison.new_entrants.len()));
        for entrant in &comparison.new_entrants {
            out.push_str(&format!(
                "  #{} {} ({} stars)\n",
                entrant.rank, entrant.name, entrant.stars
            ));
        }
    }

    if !comparison.rank_changes.is_empty() {
        out.push_str(&format!("\nRank changes ({}):\n", comparison.rank_changes.len()));
        for change in &comparison.rank_changes {
            let arrow = if change.improved() { "↑" } else { "↓" };
            out.push_str(&format!(
                "  {} {}: #{} -> #{} (rank change: {:+}, star change: {})\n",
                arrow,
                change.name,
                change.previous_rank,
                change.current_rank,
                change.rank_delta,
                change.star_change
            ));
        }
    }

    out.push_str(&format!("{}\n", separator));
    out
}

fn scalar_line(label: &str, delta: &ScalarDelta) -> String {
    format!(
        "{}: {} -> {} (change: {:+}, {})",
        label, delta.previous, delta.current, delta.delta, delta.percent
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "repository"
    } else {
        "repositories"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::analyzer::summarize;
    use crate::trends::compare::compare;
    use crate::trends::test_support::record;

    #[test]
    fn test_render_overview() {
        let mut repo = record("o/widget", 1500, 30, "Rust");
        repo.description = Some("x".repeat(150));
        let repos = vec![repo, record("o/gadget", 700, 3, "N/A")];
        let summary = summarize(&repos).unwrap();

        let out = render_overview(&repos, &summary);

        assert!(out.contains("Found 2 repositories"));
        assert!(out.contains("#1 widget"));
        assert!(out.contains("#2 gadget"));
        assert!(out.contains(&format!("{}...", "x".repeat(100))));
        assert!(out.contains("Description: No description"));
        assert!(out.contains("Languages (2):"));
        assert!(out.contains("  Rust: 1 repository"));
        assert!(out.contains("Total stars: 2200"));
        assert!(out.contains("Total forks: 33"));
    }

    #[test]
    fn test_render_comparison() {
        let previous = vec![record("o/a", 100, 0, "Rust"), record("o/b", 50, 0, "Rust")];
        let current = vec![record("o/b", 80, 0, "Rust"), record("o/c", 60, 0, "Go")];
        let comparison = compare(
            &summarize(&previous).unwrap(),
            &summarize(&current).unwrap(),
            &previous,
            &current,
        );

        let out = render_comparison(&comparison, NaiveDate::from_ymd_opt(2025, 7, 24).unwrap());

        assert!(out.contains("Trend changes since 2025-07-24"));
        assert!(out.contains("Total stars: 150 -> 140 (change: -10, -6.67%)"));
        assert!(out.contains("Total forks: 0 -> 0 (change: +0, N/A)"));
        assert!(out.contains("  - Go: 0 -> 1 (change: +1, N/A)"));
        assert!(out.contains("  - Rust: 2 -> 1 (change: -1, -50.00%)"));
        assert!(out.contains("  #2 c (60 stars)"));
        assert!(out.contains("↑ b: #2 -> #1 (rank change: +1, star change: +60.00%)"));
    }

    #[test]
    fn test_render_comparison_no_language_changes() {
        let repos = vec![record("o/a", 1, 0, "Rust")];
        let summary = summarize(&repos).unwrap();
        let comparison = compare(&summary, &summary, &repos, &repos);

        let out = render_comparison(&comparison, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(out.contains("(none)"));
        assert!(!out.contains("New entrants"));
        assert!(!out.contains("Rank changes"));
    }
}
