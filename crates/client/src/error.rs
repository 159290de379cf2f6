use std::path::PathBuf;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("file is {0} bytes, below the {} byte upload minimum", crate::MIN_UPLOAD_SIZE)]
    FileTooSmall(u64),
    #[error("remote storage error: {message}")]
    Remote {
        /// Present for HTTP-level failures, absent for network-level faults
        status: Option<StatusCode>,
        message: String,
    },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Setup(String),
}

impl ClientError {
    /// True for local precondition failures that are detected before any
    /// network round trip.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::FileTooSmall(_))
    }

    pub(crate) fn remote(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }
}
