//! Error types for the Lattes parser.
//!
//! Library crates use [`LattesError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all extraction and reporting operations.
#[derive(Debug, thiserror::Error)]
pub enum LattesError {
    /// A structurally required anchor, marker, or element is absent.
    #[error("missing section: {section}")]
    MissingSection { section: String },

    /// A fixed-width positional block ended before the expected sibling count.
    #[error("insufficient siblings after {marker}: expected {expected}, found {found}")]
    InsufficientSiblings {
        marker: String,
        expected: usize,
        found: usize,
    },

    /// A field's raw text could not be coerced to its expected shape.
    #[error("malformed field {field}: {message}")]
    MalformedField { field: String, message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Report serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any of the above, tagged with the document it happened in.
    #[error("{name}: {source}")]
    Document {
        name: String,
        source: Box<LattesError>,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LattesError>;

/// Stable classification of a [`LattesError`], ignoring document context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingSection,
    InsufficientSiblings,
    MalformedField,
    Config,
    Io,
    Serialization,
}

impl LattesError {
    /// Create a missing-section error for the named anchor or marker.
    pub fn missing(section: impl Into<String>) -> Self {
        Self::MissingSection {
            section: section.into(),
        }
    }

    /// Create a malformed-field error.
    pub fn malformed(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MalformedField {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Prefix the section, field, or marker name with an enclosing scope,
    /// e.g. `year` inside `articles[2]` becomes `articles[2].year`.
    pub fn within(self, scope: &str) -> Self {
        match self {
            Self::MissingSection { section } => Self::MissingSection {
                section: format!("{scope}.{section}"),
            },
            Self::MalformedField { field, message } => Self::MalformedField {
                field: format!("{scope}.{field}"),
                message,
            },
            Self::InsufficientSiblings {
                marker,
                expected,
                found,
            } => Self::InsufficientSiblings {
                marker: format!("{scope}.{marker}"),
                expected,
                found,
            },
            other => other,
        }
    }

    /// Tag this error with the document it came from.
    ///
    /// An error that already carries a document name keeps its first name.
    pub fn in_document(self, name: impl Into<String>) -> Self {
        match self {
            Self::Document { .. } => self,
            other => Self::Document {
                name: name.into(),
                source: Box::new(other),
            },
        }
    }

    /// The document name attached by [`LattesError::in_document`], if any.
    pub fn document(&self) -> Option<&str> {
        match self {
            Self::Document { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Classify the error, looking through the document wrapper.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSection { .. } => ErrorKind::MissingSection,
            Self::InsufficientSiblings { .. } => ErrorKind::InsufficientSiblings,
            Self::MalformedField { .. } => ErrorKind::MalformedField,
            Self::Config { .. } => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::Io,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Document { source, .. } => source.kind(),
        }
    }
}
