use crate::ai::RepoSummary;
use crate::error::Result;
use crate::report::truncate_chars;
use crate::trends::{AggregateSummary, RepositoryRecord, TrendComparison};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const DESCRIPTION_LIMIT: usize = 50;

/// Report file name, e.g. `github_trending_7days_2025-07-31.md`
pub fn report_file_name(days: u32, date: NaiveDate) -> String {
    format!("github_trending_{}days_{}.md", days, date.format("%Y-%m-%d"))
}

/// Everything that goes into one Markdown report
pub struct MarkdownReport<'a> {
    pub generated_on: NaiveDate,
    pub days: u32,
    pub repositories: &'a [RepositoryRecord],
    /// Parallel to `repositories`; missing entries render without a summary
    pub summaries: &'a [RepoSummary],
    pub summary: &'a AggregateSummary,
    /// Comparison and the capture date of the baseline snapshot
    pub comparison: Option<(&'a TrendComparison, NaiveDate)>,
}

impl MarkdownReport<'_> {
    /// Render the report
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str("# Trending GitHub Repositories\n\n");
        output.push_str(&format!(
            "**Generated:** {}  **Window:** last {} days  **Repositories:** {}\n\n",
            self.generated_on.format("%Y-%m-%d"),
            self.days,
            self.repositories.len()
        ));

        output.push_str("## Ranking\n\n");
        output.push_str("| Rank | Repository | Owner | Stars | Forks | Language | Description |\n");
        output.push_str("|------|------------|-------|-------|-------|----------|-------------|\n");
        for (i, repo) in self.repositories.iter().enumerate() {
            output.push_str(&self.ranking_row(i, repo));
            output.push('\n');
        }
        output.push('\n');

        output.push_str("## Languages\n\n");
        output.push_str("| Language | Repositories |\n");
        output.push_str("| :------- | :----------- |\n");
        for (language, count) in self.summary.languages.iter() {
            output.push_str(&format!("| {} | {} |\n", language, count));
        }
        output.push('\n');

        output.push_str(&format!(
            "Total stars: {}  Total forks: {}\n\n",
            self.summary.total_stars, self.summary.total_forks
        ));
        output.push_str(
            "> N/A means the repository has no primary language, or is a documentation or multi-language project.\n",
        );

        if let Some((comparison, baseline)) = self.comparison {
            output.push('\n');
            output.push_str(&render_trend_section(comparison, baseline));
        }

        output
    }

    fn ranking_row(&self, index: usize, repo: &RepositoryRecord) -> String {
        let name = format!("[{}]({})", escape_cell(&repo.name), repo.html_url);
        let owner = match (&repo.owner_login, &repo.owner_url) {
            (Some(login), Some(url)) => format!("[{}]({})", login, url),
            (Some(login), None) => login.clone(),
            _ => "N/A".to_string(),
        };

        let description = repo.description.as_deref().unwrap_or("No description");
        let mut cell = escape_cell(&truncate_chars(description, DESCRIPTION_LIMIT));
        let summary = self
            .summaries
            .get(index)
            .filter(|summary| summary.repository == repo.full_name);
        if let Some(summary) = summary {
            let quoted = summary
                .text
                .lines()
                .map(|line| escape_cell(line.trim()))
                .collect::<Vec<_>>()
                .join("<br>");
            if summary.is_generated() {
                cell.push_str(&format!("<br>**AI summary:**<br>{}", quoted));
            } else {
                cell.push_str(&format!("<br>_{}_", quoted));
            }
        }

        format!(
            "| {} | {} | {} | {} | {} | {} | {} |",
            index + 1,
            name,
            owner,
            repo.stars,
            repo.forks,
            repo.language,
            cell
        )
    }

    /// Default location of this report under `reports_dir`
    pub fn default_path(&self, reports_dir: &Path) -> PathBuf {
        reports_dir.join(report_file_name(self.days, self.generated_on))
    }

    /// Write the report to `path`, creating parent directories
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        Ok(())
    }
}

/// Markdown section describing a trend comparison
pub fn render_trend_section(comparison: &TrendComparison, baseline: NaiveDate) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "## Trend changes since {}\n\n",
        baseline.format("%Y-%m-%d")
    ));

    output.push_str("| Metric | Previous | Current | Change | % |\n");
    output.push_str("|--------|----------|---------|--------|---|\n");
    for (label, delta) in [("Stars", &comparison.stars), ("Forks", &comparison.forks)] {
        output.push_str(&format!(
            "| {} | {} | {} | {:+} | {} |\n",
            label, delta.previous, delta.current, delta.delta, delta.percent
        ));
    }
    output.push('\n');

    if !comparison.languages.is_empty() {
        output.push_str("### Language changes\n\n");
        for language in &comparison.languages {
            output.push_str(&format!(
                "- {}: {} → {} ({:+}, {})\n",
                language.language, language.previous, language.current, language.delta, language.percent
            ));
        }
        output.push('\n');
    }

    if !comparison.new_entrants.is_empty() {
        output.push_str("### New entrants\n\n");
        for entrant in &comparison.new_entrants {
            output.push_str(&format!(
                "- #{} {} ({} stars)\n",
                entrant.rank, entrant.full_name, entrant.stars
            ));
        }
        output.push('\n');
    }

    if !comparison.rank_changes.is_empty() {
        output.push_str("### Rank changes\n\n");
        output.push_str("| Repository | Previous | Current | Change | Star change |\n");
        output.push_str("|------------|----------|---------|--------|-------------|\n");
        for change in &comparison.rank_changes {
            output.push_str(&format!(
                "| {} | #{} | #{} | {:+} | {} |\n",
                change.full_name,
                change.previous_rank,
                change.current_rank,
                change.rank_delta,
                change.star_change
            ));
        }
        output.push('\n');
    }

    output
}

/// Make text safe for a single table cell
fn escape_cell(text: &str) -> String {
    text.replace('\r', "")
        .replace('\n', " ")
        .replace('|', "\\|")
}
