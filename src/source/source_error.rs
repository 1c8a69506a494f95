#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Invalid robots.txt location: {0}")]
    InvalidLocation(String),

    #[error("Fetching robots.txt failed: {0}")]
    TransferFailed(#[from] reqwest::Error),

    #[error("HTTP Error Status Code = {0}")]
    HttpError(u16),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
