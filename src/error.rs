use thiserror::Error;

/// Main error type for gitlog-summary
#[derive(Error, Debug)]
pub enum GitlogError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// HTTP/API errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GitHub API errors
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Inference API errors
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid date argument
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Missing GitHub token
    #[error("GitHub token required for pushed commit summary")]
    MissingToken,
}

/// Result type alias for gitlog-summary operations
pub type Result<T> = std::result::Result<T, GitlogError>;

impl GitlogError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new GitHub API error
    pub fn github_api<S: Into<String>>(msg: S) -> Self {
        Self::GitHubApi(msg.into())
    }

    /// Create a new inference error
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        Self::Inference(msg.into())
    }
}
