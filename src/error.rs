use std::path::PathBuf;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    /// Manifest content that does not parse; `file` is unset for in-memory content
    ManifestError { file: Option<PathBuf>, message: String },
    UnknownView(String),
    UnknownSerializer { view: String, serializer: String },
    UnsupportedFormat(PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::ManifestError {
                file: Some(file),
                message,
            } => write!(f, "invalid manifest {}: {}", file.display(), message),
            Error::ManifestError { file: None, message } => {
                write!(f, "invalid manifest: {}", message)
            }
            Error::UnknownView(name) => write!(f, "unknown view: {}", name),
            Error::UnknownSerializer { view, serializer } => {
                write!(f, "view {} references unknown serializer {}", view, serializer)
            }
            Error::UnsupportedFormat(path) => {
                write!(f, "unsupported manifest format: {}", path.display())
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

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ManifestError {
            file: None,
            message: format!("JSON: {}", err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ManifestError {
            file: None,
            message: format!("YAML: {}", err),
        }
    }
}
