use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Status(String),
    #[error("unexpected catalog response: {0}")]
    Decode(String),
}
