//! Error taxonomy shared by the scanner, the stores and the synchroniser.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Raised by `add_language` when the language code is already registered.
    /// Recoverable; callers decide how to surface it.
    #[error("language \"{language}\" already exists")]
    LanguageExists { language: String },

    /// An unrecognised backend name was requested. Fatal to the requested
    /// operation, not to the process.
    #[error("invalid driver \"{name}\", expected \"file\" or \"table\"")]
    InvalidDriver { name: String },

    /// A file could not be read or written. Store writes propagate this
    /// immediately; the scanner downgrades it to a warning and continues.
    #[error("failed to {action} {path:?}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored group file, JSON file or table row file failed to parse.
    /// Never treated as an empty catalog; the data loss risk is on the caller.
    #[error("malformed translation data in {path:?}: {detail}")]
    MalformedData { path: PathBuf, detail: String },

    /// The scanner configuration could not be compiled into a matcher.
    #[error("invalid scanner configuration: {detail}")]
    Scan { detail: String },
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Error::MalformedData {
            path: path.into(),
            detail: detail.into(),
        }
    }
}
