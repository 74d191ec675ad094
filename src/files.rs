//! File access abstraction.
//!
//! Artifact discovery only needs to ask whether a file exists and read it.
//! Keeping those two calls behind a trait lets tests serve metadata from
//! memory and simulate I/O failures.

use camino::Utf8Path;

/// Read-only access to files produced by the build.
#[cfg_attr(test, mockall::automock)]
pub trait FileAccess {
    /// Returns whether a regular file exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined, for example when a
    /// parent directory is not readable.
    fn exists(&self, path: &Utf8Path) -> std::io::Result<bool>;

    /// Reads the full contents of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error encountered while opening or reading the file.
    fn read(&self, path: &Utf8Path) -> std::io::Result<Vec<u8>>;
}

/// Accesses files on the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileAccess;

impl FileAccess for SystemFileAccess {
    fn exists(&self, path: &Utf8Path) -> std::io::Result<bool> {
        match std::fs::metadata(path) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn read(&self, path: &Utf8Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
