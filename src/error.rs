use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("malformed search payload: {0}")]
    MalformedPayload(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("registry credential missing: set {0}")]
    MissingCredential(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
