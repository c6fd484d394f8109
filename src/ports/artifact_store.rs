//! Artifact store port: Trait for reading trained artifacts.
//!
//! This trait abstracts where the bundle lives (a directory on disk, or an
//! in-memory fixture in tests) from the loader.

use std::io;

/// Read-only source of named artifact files.
pub trait ArtifactStore: Send + Sync {
    /// Read the file called `name`.
    ///
    /// # Returns
    /// `None` if no such file exists.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>>;

    /// Human-readable location, for logs and error messages.
    fn location(&self) -> String;
}
