//! Structured OS action layer: launching apps and URLs, closing apps, and
//! volume control, exposed to the router as an `OsActionProvider`.

pub mod audio;
pub mod desktop;
pub mod process;
pub mod provider;

pub use provider::DesktopProvider;

/// OS action error types
#[derive(Debug, thiserror::Error)]
pub enum OsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OsResult<T> = Result<T, OsError>;

impl From<OsError> for nio_providers::ProviderError {
    fn from(err: OsError) -> Self {
        use nio_providers::ProviderError;
        match err {
            OsError::InvalidArgument(msg) => ProviderError::InvalidArgument(msg),
            OsError::OperationFailed(msg) => ProviderError::Command(msg),
            OsError::NotFound(msg) => ProviderError::NotFound(msg),
            OsError::Io(e) => ProviderError::Io(e),
        }
    }
}
