use std::path::PathBuf;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    /// Two distinct channel addresses sanitized to the same channel id.
    ChannelIdCollision {
        id: String,
        first: String,
        second: String,
    },
    /// The same operation id was produced for two operations in one document.
    DuplicateOperationId(String),
    /// A descriptor file could not be parsed.
    DescriptorError { file: PathBuf, message: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::ChannelIdCollision { id, first, second } => write!(
                f,
                "channel id collision: addresses '{}' and '{}' both sanitize to '{}'",
                first, second, id
            ),
            Error::DuplicateOperationId(id) => {
                write!(f, "duplicate operation id: '{}'", id)
            }
            Error::DescriptorError { file, message } => {
                write!(f, "invalid descriptor file {}: {}", file.display(), message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}
