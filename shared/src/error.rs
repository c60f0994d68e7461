use http::StatusCode;
use image::ImageError;

/// Failures reported by an [`ObjectStore`](crate::storage::ObjectStore)
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("storage error: {0}")]
    Backend(String),
}

/// Everything that can stop a resize request from producing an image
#[derive(Debug, thiserror::Error)]
pub enum ResizeError {
    #[error("host not allowed: {0}")]
    InvalidHost(String),

    #[error("invalid dimensions: width={width} height={height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("failed to decode image: {0}")]
    Decode(#[source] ImageError),

    #[error("failed to encode JPEG: {0}")]
    Encode(#[source] ImageError),
}

impl From<StorageError> for ResizeError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { bucket, key } => ResizeError::NotFound { bucket, key },
            StorageError::Backend(msg) => ResizeError::Storage(msg),
        }
    }
}

impl ResizeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResizeError::InvalidHost(_) | ResizeError::InvalidDimensions { .. } => {
                StatusCode::BAD_REQUEST
            }
            ResizeError::NotFound { .. } => StatusCode::NOT_FOUND,
            ResizeError::Storage(_) | ResizeError::Decode(_) | ResizeError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client mistakes are logged at warn, everything else at error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}
