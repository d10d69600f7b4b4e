use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response and no usable cache entry exists.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("parse error: {0}")]
    Parse(String),
}
