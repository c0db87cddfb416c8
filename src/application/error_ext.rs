//! Error conversion helpers for collaborator I/O
//!
//! Provides an extension trait for attaching operation context to `io::Result`.

use std::fmt::Display;
use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add operation context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// self.source.list(actor, statuses)
    ///     .with_context("list catalog")?;
    /// ```
    fn with_context(self, action: impl Display) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_context(self, action: impl Display) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: action.to_string(),
            source: Box::new(e),
        })
    }
}
