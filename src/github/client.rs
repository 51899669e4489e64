use crate::error::{Result, TrendError};
use crate::github::query::{decode_readme, TrendingQuery};
use crate::trends::RepositoryRecord;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const GITHUB_API_URL: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const README_TIMEOUT: Duration = Duration::from_secs(15);

/// Minimal GitHub REST client for repository search and README lookup
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    api_url: String,
}

impl GitHubClient {
    /// Create a new client. Requests are anonymous when no token is given.
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gh-trending/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            token,
            api_url: GITHUB_API_URL.to_string(),
        })
    }

    /// Point the client at a different API root (GitHub Enterprise)
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Search for the most starred repositories matching `query`
    pub async fn search_trending(&self, query: &TrendingQuery) -> Result<Vec<RepositoryRecord>> {
        let url = format!("{}/search/repositories", self.api_url);
        debug!(q = %query.qualifier(), limit = query.limit, "searching repositories");

        let response = self
            .authorized(self.client.get(&url))
            .query(&query.params())
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TrendError::github_api(format!(
                "search failed with status {}: {}",
                status, error_text
            )));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.items)
    }

    /// Fetch and decode the README of `full_name` (`owner/repo`).
    ///
    /// Returns `None` when the repository has no README or no token is
    /// configured.
    pub async fn fetch_readme(&self, full_name: &str) -> Result<Option<String>> {
        if self.token.is_none() {
            warn!(repo = full_name, "no GitHub token, skipping README fetch");
            return Ok(None);
        }

        let url = format!("{}/repos/{}/readme", self.api_url, full_name);
        let response = self
            .authorized(self.client.get(&url))
            .timeout(README_TIMEOUT)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(repo = full_name, "repository has no README");
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            return Err(TrendError::github_api(format!(
                "README request for {} failed with status {}",
                full_name, status
            )));
        }

        let body: ReadmeResponse = response.json().await?;
        decode_readme(&body.content).map(Some)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", ACCEPT_HEADER);
        match self.token {
            Some(ref token) => request.header("Authorization", format!("token {}", token)),
            None => request,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepositoryRecord>,
}

#[derive(Debug, Deserialize)]
struct ReadmeResponse {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new(None).unwrap();
        assert!(!client.has_token());
        assert_eq!(client.api_url, GITHUB_API_URL);
    }

    #[test]
    fn test_client_with_api_url() {
        let client = GitHubClient::new(Some("ghp_test".to_string()))
            .unwrap()
            .with_api_url("https://github.example.com/api/v3/".to_string());
        assert!(client.has_token());
        assert_eq!(client.api_url, "https://github.example.com/api/v3");
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {"full_name": "o/a", "name": "a", "html_url": "https://github.com/o/a",
                 "stargazers_count": 900, "forks_count": 12, "language": "Rust"},
                {"full_name": "o/b", "name": "b", "html_url": "https://github.com/o/b",
                 "stargazers_count": 450, "language": null}
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].stars, 900);
        assert_eq!(response.items[1].language, "N/A");
    }

    #[tokio::test]
    async fn test_fetch_readme_without_token() {
        let client = GitHubClient::new(None).unwrap();
        let readme = client.fetch_readme("o/a").await.unwrap();
        assert!(readme.is_none());
    }
}
