use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Input directory does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Invalid quality value: {0}. Must be between 0 and 100")]
    InvalidQuality(i64),

    #[error("Invalid compression method: {0}. Must be between 0 and 6")]
    InvalidMethod(i64),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

// `image` only reads sources here, so every failure it reports (truncated
// streams included) is a decode failure.
impl From<image::ImageError> for ConversionError {
    fn from(err: image::ImageError) -> Self {
        ConversionError::Decode(err.to_string())
    }
}

impl From<tempfile::PersistError> for ConversionError {
    fn from(err: tempfile::PersistError) -> Self {
        ConversionError::Io(err.error)
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_io_error_is_decode_error() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: ConversionError = image::ImageError::IoError(io).into();
        assert!(matches!(err, ConversionError::Decode(msg) if msg.contains("truncated")));
    }

    #[test]
    fn test_messages_are_descriptive() {
        let msg = ConversionError::InvalidQuality(-1).to_string();
        assert!(msg.contains("-1"));
        assert!(msg.contains("between 0 and 100"));
    }
}
