use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("Invalid URL: {0}")]
    InvalidURL(String),
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("File not found: {0}")]
    NotFound(String),
}
