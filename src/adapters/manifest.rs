//! Bundle manifest: SHA-256 digests binding the artifact files together.
//!
//! `manifest.json` is optional. When present, every file it lists must
//! match its digest, and every artifact the loader reads must be listed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ports::ArtifactStore;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const MANIFEST_VERSION: u32 = 1;

/// Error type for manifest handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("Invalid manifest.json: {0}")]
    Invalid(String),

    #[error("Unsupported manifest version: {0}")]
    UnsupportedVersion(u32),

    #[error("{0} is not listed in manifest.json")]
    Unlisted(String),

    #[error("File hash mismatch for {0}")]
    DigestMismatch(String),

    #[error("Failed to read {name}: {detail}")]
    Unreadable { name: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    pub version: u32,
    /// Unix seconds at which the bundle was exported.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// File name to lowercase hex SHA-256.
    pub files: BTreeMap<String, String>,
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

impl BundleManifest {
    /// Digest every named file in `store`.
    ///
    /// # Errors
    /// Returns error if a file is missing or unreadable.
    pub fn build(
        store: &dyn ArtifactStore,
        names: &[&str],
        created_at: Option<i64>,
    ) -> Result<Self, ManifestError> {
        let mut files = BTreeMap::new();
        for name in names {
            let bytes = read_required(store, name)?;
            files.insert((*name).to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            created_at,
            files,
        })
    }

    /// Read `manifest.json`, if the store has one.
    ///
    /// # Errors
    /// Returns error if the manifest exists but is unreadable or malformed.
    pub fn load(store: &dyn ArtifactStore) -> Result<Option<Self>, ManifestError> {
        let bytes = match store.read(MANIFEST_FILE) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(None),
            Err(e) => {
                return Err(ManifestError::Unreadable {
                    name: MANIFEST_FILE.into(),
                    detail: e.to_string(),
                })
            }
        };
        let manifest: Self =
            serde_json::from_slice(&bytes).map_err(|e| ManifestError::Invalid(e.to_string()))?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion(manifest.version));
        }
        if manifest.files.is_empty() {
            return Err(ManifestError::Invalid("manifest lists no files".into()));
        }
        Ok(Some(manifest))
    }

    /// Check the bytes of one artifact against its recorded digest.
    ///
    /// # Errors
    /// Returns error if the file is not listed or its digest differs.
    pub fn verify(&self, name: &str, bytes: &[u8]) -> Result<(), ManifestError> {
        let expected = self
            .files
            .get(name)
            .ok_or_else(|| ManifestError::Unlisted(name.to_string()))?;
        if !sha256_hex(bytes).eq_ignore_ascii_case(expected) {
            return Err(ManifestError::DigestMismatch(name.to_string()));
        }
        Ok(())
    }

    /// Pretty JSON with a trailing newline.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut out =
            serde_json::to_string_pretty(self).map_err(|e| ManifestError::Invalid(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}

fn read_required(store: &dyn ArtifactStore, name: &str) -> Result<Vec<u8>, ManifestError> {
    match store.read(name) {
        Ok(Some(bytes)) => Ok(bytes),
        Ok(None) => Err(ManifestError::Unreadable {
            name: name.into(),
            detail: "not found".into(),
        }),
        Err(e) => Err(ManifestError::Unreadable {
            name: name.into(),
            detail: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_build_then_verify() {
        let store = MemoryStore::new()
            .with("a.json", "[1]")
            .with("b.json", "[2]");
        let manifest = BundleManifest::build(&store, &["a.json", "b.json"], Some(7)).unwrap();
        assert_eq!(manifest.files.len(), 2);

        manifest.verify("a.json", b"[1]").expect("digest matches");
        assert_eq!(
            manifest.verify("a.json", b"[9]").unwrap_err(),
            ManifestError::DigestMismatch("a.json".into())
        );
        assert_eq!(
            manifest.verify("c.json", b"[1]").unwrap_err(),
            ManifestError::Unlisted("c.json".into())
        );
    }

    #[test]
    fn test_load_optional_and_versioned() {
        assert_eq!(BundleManifest::load(&MemoryStore::new()).unwrap(), None);

        let v2 = MemoryStore::new().with(MANIFEST_FILE, r#"{"version":2,"files":{"a":"00"}}"#);
        assert_eq!(
            BundleManifest::load(&v2).unwrap_err(),
            ManifestError::UnsupportedVersion(2)
        );

        let garbage = MemoryStore::new().with(MANIFEST_FILE, "not json");
        assert!(matches!(
            BundleManifest::load(&garbage),
            Err(ManifestError::Invalid(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let store = MemoryStore::new().with("a.json", "[1]");
        let manifest = BundleManifest::build(&store, &["a.json"], None).unwrap();
        let reparsed = MemoryStore::new().with(MANIFEST_FILE, manifest.to_json().unwrap());
        assert_eq!(BundleManifest::load(&reparsed).unwrap(), Some(manifest));
    }
}
