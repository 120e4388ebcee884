use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-level failure.
#[derive(Debug)]
pub enum StorageError {
    /// Filesystem failure; `context` names the file or directory involved.
    Io { context: String, source: io::Error },
    /// The stats file exists but is not valid JSON for `LibraryStats`.
    Json { context: String, source: serde_json::Error },
    /// A card-set file could not be parsed.
    Parse { path: String, message: String },
}

impl StorageError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Json { .. } => "json",
            Self::Parse { .. } => "parse",
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { context, source } => write!(f, "{context}: {source}"),
            Self::Json { context, source } => write!(f, "{context}: {source}"),
            Self::Parse { path, message } => write!(f, "{path}: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}
