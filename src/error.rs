//! Error types.
//!
//! Internal code works with `anyhow` (`Res<T>`) and adds context as errors bubble up. Anything
//! returned from a public command or report is converted into [`Error`], which remembers which
//! part of the system failed so that callers (the CLI and the HTTP layer) can decide how to
//! surface it.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The result type used internally.
pub(crate) type Res<T> = std::result::Result<T, anyhow::Error>;

/// The result type returned by public functions.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad categories of failure.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or configuration file is missing or invalid.
    Config,
    /// The external feed could not be fetched, timed out, or returned garbage.
    DataSource,
    /// Creating the schema or writing rows failed.
    StoreWrite,
    /// A query against the store failed.
    StoreRead,
    /// The operation was abandoned because its cancellation signal fired first.
    Cancelled,
    /// The HTTP service failed to start or crashed.
    Service,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    /// Which part of the system failed.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The alternate form prints the whole context chain on one line.
        write!(f, "{:#}", self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal result into a public one, tagging the error with an [`ErrorType`].
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pub_result_keeps_type_and_context() {
        let res: Res<()> = Err(anyhow::anyhow!("disk on fire")).context("Unable to write rows");
        let err = res.pub_result(ErrorType::StoreWrite).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::StoreWrite);
        let message = err.to_string();
        assert!(message.contains("Unable to write rows"), "{message}");
        assert!(message.contains("disk on fire"), "{message}");
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::DataSource.to_string(), "data_source");
        assert_eq!(ErrorType::StoreRead.to_string(), "store_read");
    }
}
