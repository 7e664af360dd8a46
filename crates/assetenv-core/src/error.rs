use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetEnvError {
    #[error("unknown environment for host '{0}'")]
    UnknownHost(String),

    #[error("config not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid pull-request host pattern '{pattern}'")]
    InvalidHostPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("pull-request host pattern '{0}' has no id capture group")]
    MissingIdCapture(String),

    #[error("http client init failed")]
    HttpClient(#[source] reqwest::Error),

    #[error("bundle fetch failed for {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("bundle fetch for {url} returned HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, AssetEnvError>;
