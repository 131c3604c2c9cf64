//! Error conversion helpers for common I/O operations

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Attach the path being read to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(path).with_path_context(path)?;
    /// ```
    fn with_path_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ApplicationError::NotFound(path.to_path_buf()),
            _ => ApplicationError::Read {
                path: path.to_path_buf(),
                source,
            },
        })
    }
}
