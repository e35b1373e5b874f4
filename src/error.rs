use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Timed out: {0}")]
    Timeout(String),
    #[error("Extraction error: {0}")]
    Extraction(String),
    #[error("Chart error: {0}")]
    Chart(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Browser launch failed: {0}")]
    Launch(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;
