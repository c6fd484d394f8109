//! Artifact stores: a directory on disk, or an in-memory map for tests.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use crate::ports::ArtifactStore;

/// Artifacts stored as flat files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactStore for DirectoryStore {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        // Names come from the artifact table or a manifest; refuse anything
        // that would step outside the directory.
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid artifact name {name:?}"),
            ));
        }

        match std::fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Artifacts held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.into(), bytes.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.files.remove(name)
    }

    /// Copy every file of another store that exists under `names`.
    ///
    /// # Errors
    /// Returns error if the source store fails to read a file.
    pub fn snapshot(source: &dyn ArtifactStore, names: &[&str]) -> io::Result<Self> {
        let mut store = Self::new();
        for name in names {
            if let Some(bytes) = source.read(name)? {
                store.files.insert((*name).to_string(), bytes);
            }
        }
        Ok(store)
    }
}

impl ArtifactStore for MemoryStore {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.files.get(name).cloned())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
