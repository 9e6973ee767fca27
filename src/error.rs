// src/error.rs
use std::fmt::{Display, Formatter};

/// Error taxonomy of the probing core.
///
/// Decode of valid-length input is total by construction; the only structural
/// precondition in the codec layer is the even-length requirement of 16-bit
/// linear input. Everything else is an I/O or container-parse boundary.
#[derive(Debug)]
pub enum ProbeError {
    /// Input source unavailable. Recoverable: the caller skips that probe.
    NotFound { path: String },
    /// Structural precondition violated on an input buffer.
    /// Reported per-buffer; sibling decodes are unaffected.
    MalformedInput { detail: String },
    /// Container parse failure on read-back (bad magic, chunk size mismatch).
    MalformedContainer { detail: String },
    /// Read/write failure at the storage boundary. Fatal to that single
    /// operation only.
    IoFailure {
        context: String,
        source: std::io::Error,
    },
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::NotFound { path } => {
                write!(f, "Input source not found: {}", path)
            }
            ProbeError::MalformedInput { detail } => {
                write!(f, "Malformed input buffer: {}", detail)
            }
            ProbeError::MalformedContainer { detail } => {
                write!(f, "Malformed audio container: {}", detail)
            }
            ProbeError::IoFailure { context, source } => {
                write!(f, "I/O failure while {}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::IoFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ProbeError {
    /// Maps a filesystem error for `path`, keeping the NotFound/IoFailure
    /// distinction the pipeline relies on.
    pub fn from_io(err: std::io::Error, context: &str, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ProbeError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            ProbeError::IoFailure {
                context: format!("{} {}", context, path.display()),
                source: err,
            }
        }
    }
}
