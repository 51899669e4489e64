use crate::ai::client::ChatClient;
use crate::ai::prompt::{clean_response, generate_insight_prompt};
use crate::ai::RepoSummary;
use crate::cache::ReadmeCache;
use crate::config::Config;
use crate::error::Result;
use crate::github::client::GitHubClient;
use crate::github::query::TrendingQuery;
use crate::trends::analyzer::summarize;
use crate::trends::compare::compare;
use crate::trends::snapshot::{target_date, SnapshotLocator, SnapshotStore};
use crate::trends::{AggregateSummary, RepositoryRecord, Snapshot, TrendComparison};
use chrono::Utc;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// A comparison against a stored snapshot
#[derive(Debug)]
pub struct BaselineComparison {
    /// Snapshot the current ranking was compared against
    pub baseline: SnapshotLocator,
    pub comparison: TrendComparison,
}

/// Orchestrator for coordinating the fetch, summarize and compare workflow
pub struct Orchestrator {
    config: Config,
    github: GitHubClient,
    cache: Option<ReadmeCache>,
    chat: Option<ChatClient>,
    store: SnapshotStore,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(config: Config) -> Result<Self> {
        let github =
            GitHubClient::new(config.github_token())?.with_api_url(config.github_api_url.clone());

        let cache = if config.cache_enabled {
            open_cache(&config)
        } else {
            None
        };

        let chat = match config.ai_api_key() {
            Some(key) => Some(
                ChatClient::new(key)?
                    .with_endpoint(config.ai_base_url.clone())
                    .with_model(config.ai_model.clone())
                    .with_max_tokens(config.ai_max_tokens)
                    .with_temperature(config.ai_temperature),
            ),
            None => {
                info!("no chat API key configured, AI summaries disabled");
                None
            }
        };

        let store = SnapshotStore::new(config.data_dir.clone())?;

        Ok(Self {
            config,
            github,
            cache,
            chat,
            store,
        })
    }

    /// Turn off AI summaries even when a key is configured
    pub fn without_ai(mut self) -> Self {
        self.chat = None;
        self
    }

    pub fn ai_enabled(&self) -> bool {
        self.chat.is_some()
    }

    /// Fetch the most starred repositories created in the last `days` days.
    ///
    /// Failures are logged and yield an empty list.
    pub async fn fetch_trending(&self, days: u32, limit: u32) -> Vec<RepositoryRecord> {
        if !self.github.has_token() {
            warn!("no GitHub token configured, using anonymous rate limits");
        }

        let query = TrendingQuery::days_back(Utc::now(), days, limit);
        match self.github.search_trending(&query).await {
            Ok(repos) => {
                info!(count = repos.len(), "fetched trending repositories");
                repos
            }
            Err(e) => {
                error!(error = %e, "failed to fetch trending repositories");
                Vec::new()
            }
        }
    }

    /// Persist today's ranking
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        let path = self.store.save(snapshot)?;
        info!(path = %path.display(), "saved snapshot");
        Ok(path)
    }

    /// README of a repository, from cache when possible
    pub async fn readme_for(&self, full_name: &str) -> Result<Option<String>> {
        if let Some(ref cache) = self.cache {
            match cache.get(full_name) {
                Ok(Some(readme)) => {
                    debug!(repo = full_name, "README cache hit");
                    return Ok(Some(readme));
                }
                Ok(None) => {}
                Err(e) => warn!(repo = full_name, error = %e, "README cache read failed"),
            }
        }

        let readme = self.github.fetch_readme(full_name).await?;

        if let (Some(cache), Some(content)) = (&self.cache, &readme) {
            if let Err(e) = cache.set(full_name, content) {
                warn!(repo = full_name, error = %e, "README cache write failed");
            }
        }

        Ok(readme)
    }

    /// Produce a summary for one repository. Never fails; problems are
    /// reported through the summary's source.
    pub async fn summarize_repository(&self, repo: &RepositoryRecord) -> RepoSummary {
        let chat = match self.chat {
            Some(ref chat) => chat,
            None => return RepoSummary::not_configured(repo.full_name.clone()),
        };

        let readme = match self.readme_for(&repo.full_name).await {
            Ok(Some(readme)) => readme,
            Ok(None) => return RepoSummary::readme_unavailable(repo.full_name.clone()),
            Err(e) => {
                warn!(repo = %repo.full_name, error = %e, "README fetch failed");
                return RepoSummary::readme_unavailable(repo.full_name.clone());
            }
        };

        tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;

        let prompt = generate_insight_prompt(repo, &readme, self.config.readme_max_chars);
        match chat.complete(prompt).await {
            Ok(reply) => RepoSummary::new(repo.full_name.clone(), clean_response(&reply)),
            Err(e) => {
                warn!(repo = %repo.full_name, error = %e, "AI summary failed");
                RepoSummary::failed(repo.full_name.clone())
            }
        }
    }

    /// Compare `current` with the stored snapshot closest to `days` days
    /// before it. The snapshot of the current day itself is never a candidate.
    pub fn comparison_for(
        &self,
        current: &Snapshot,
        current_summary: &AggregateSummary,
        days: u32,
    ) -> Result<Option<BaselineComparison>> {
        let target = target_date(current.captured_on, days);
        let closest = self.store.find_closest(
            target,
            self.config.comparison_tolerance_days,
            Some(current.captured_on),
        )?;

        let baseline = match closest {
            Some(locator) => locator,
            None => {
                info!(%target, "no snapshot close enough to compare against");
                return Ok(None);
            }
        };

        let previous = self.store.load(&baseline.path)?;
        let previous_summary = match summarize(&previous.repositories) {
            Some(summary) => summary,
            None => {
                warn!(path = %baseline.path.display(), "comparison snapshot is empty");
                return Ok(None);
            }
        };

        let comparison = compare(
            &previous_summary,
            current_summary,
            &previous.repositories,
            &current.repositories,
        );
        debug!(
            new_entrants = comparison.new_entrants.len(),
            rank_changes = comparison.rank_changes.len(),
            "compared against {}",
            baseline.captured_on
        );

        Ok(Some(BaselineComparison {
            baseline,
            comparison,
        }))
    }

    /// Get a reference to the config
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Open the README cache, running uncached when it is unavailable
fn open_cache(config: &Config) -> Option<ReadmeCache> {
    let opened = config
        .cache_dir()
        .and_then(|dir| ReadmeCache::new(&dir, config.cache_ttl_hours));

    match opened {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!(error = %e, "README cache unavailable, continuing without it");
            None
        }
    }
}
