pub mod client;
pub mod prompt;

/// Where a repository summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// Generated by the model from the README
    Ai,
    /// No API key configured
    NotConfigured,
    /// README could not be retrieved
    ReadmeUnavailable,
    /// The model call failed
    Failed,
}

/// Short AI-written overview of a repository, derived from its README
#[derive(Debug, Clone)]
pub struct RepoSummary {
    /// Repository full name
    pub repository: String,
    /// Summary text (bullet list when generated)
    pub text: String,
    pub source: SummarySource,
}

impl RepoSummary {
    /// Create a new model-generated summary
    pub fn new(repository: String, text: String) -> Self {
        Self::with_source(repository, text, SummarySource::Ai)
    }

    pub fn not_configured(repository: String) -> Self {
        Self::with_source(
            repository,
            "AI summary not configured.".to_string(),
            SummarySource::NotConfigured,
        )
    }

    pub fn readme_unavailable(repository: String) -> Self {
        Self::with_source(
            repository,
            "README could not be retrieved.".to_string(),
            SummarySource::ReadmeUnavailable,
        )
    }

    pub fn failed(repository: String) -> Self {
        Self::with_source(
            repository,
            "AI analysis request failed.".to_string(),
            SummarySource::Failed,
        )
    }

    fn with_source(repository: String, text: String, source: SummarySource) -> Self {
        Self {
            repository,
            text,
            source,
        }
    }

    /// True when the text came from the model
    pub fn is_generated(&self) -> bool {
        self.source == SummarySource::Ai
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_creation() {
        let summary = RepoSummary::new("o/a".to_string(), "- Fast".to_string());
        assert_eq!(summary.repository, "o/a");
        assert_eq!(summary.source, SummarySource::Ai);
    }

    #[test]
    fn test_fallback_summaries() {
        assert_eq!(
            RepoSummary::not_configured("o/a".to_string()).source,
            SummarySource::NotConfigured
        );
        assert_eq!(
            RepoSummary::readme_unavailable("o/a".to_string()).text,
            "README could not be retrieved."
        );
        assert_eq!(
            RepoSummary::failed("o/a".to_string()).source,
            SummarySource::Failed
        );
    }

    #[test]
    fn test_is_generated() {
        assert!(RepoSummary::new("o/a".to_string(), "- Fast".to_string()).is_generated());
        assert!(!RepoSummary::failed("o/a".to_string()).is_generated());
    }
}
