use thiserror::Error;

/// Main error type for gh-trending
#[derive(Error, Debug)]
pub enum TrendError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// HTTP/API errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GitHub API returned a non-success response
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Chat completion API errors
    #[error("AI API error: {0}")]
    AiApi(String),

    /// README payload could not be decoded
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Caching errors
    #[error("Cache error: {0}")]
    Cache(#[from] sled::Error),

    /// Snapshot file has no recognizable date in its name
    #[error("Not a snapshot file: {0}")]
    InvalidSnapshotName(String),

    /// Regex errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for gh-trending operations
pub type Result<T> = std::result::Result<T, TrendError>;

impl TrendError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new GitHub API error
    pub fn github_api<S: Into<String>>(msg: S) -> Self {
        Self::GitHubApi(msg.into())
    }

    /// Create a new chat completion API error
    pub fn ai_api<S: Into<String>>(msg: S) -> Self {
        Self::AiApi(msg.into())
    }
}
