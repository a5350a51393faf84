use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("no API key configured")]
    MissingKey,
    #[error("API key is not a valid header value")]
    InvalidKey,
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {0}")]
    Status(String),
    #[error("response contained no text")]
    EmptyResponse,
}
