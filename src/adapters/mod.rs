//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external formats:
//! - `sklearn`: fitted scikit-learn components exported as JSON
//! - `fs`: artifact stores (directory on disk, in-memory)
//! - `manifest`: SHA-256 manifest binding the bundle files

mod fs;
pub mod manifest;
pub mod sklearn;

pub use fs::{DirectoryStore, MemoryStore};
pub use manifest::{BundleManifest, ManifestError};
