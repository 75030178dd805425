use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("subscriptions require a running tokio runtime")]
    NoRuntime,
}
