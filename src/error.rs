use std::path::PathBuf;

/// Fatal pipeline errors. Any of these aborts the run with no output written.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),
    #[error("invalid {name} for session path: {value:?}")]
    InvalidPath { name: &'static str, value: String },
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to read session file {}: {source}", path.display())]
    ReadSession {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    ReadPage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
