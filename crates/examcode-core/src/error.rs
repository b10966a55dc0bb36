//! Error types for examcode

/// Result type alias using examcode's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for examcode operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid normalization or category rules
    #[error("rules error: {0}")]
    Rules(String),

    /// Catalog gateway errors
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Language model backend errors
    #[error("llm error: {0}")]
    Llm(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport errors
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new rules error
    pub fn rules(msg: impl Into<String>) -> Self {
        Self::Rules(msg.into())
    }

    /// Create a new catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a new llm error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Short machine-readable kind, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Rules(_) => "rules",
            Self::Catalog(_) => "catalog",
            Self::Llm(_) => "llm",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Http(_) => "http",
            Self::Timeout => "timeout",
        }
    }
}
