#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}
