use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExodusError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Format failed: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
