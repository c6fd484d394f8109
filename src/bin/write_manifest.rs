//! Manifest writer for an artifact bundle.
//!
//! Records the SHA-256 of each of the five artifacts in `manifest.json`, so
//! the app refuses to load a bundle whose files were swapped or edited.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <artifact_dir> [--created-at <unix_secs>]
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};

use obesilens::adapters::manifest::MANIFEST_FILE;
use obesilens::adapters::{BundleManifest, DirectoryStore};
use obesilens::domain::ArtifactKind;

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn usage() -> anyhow::Error {
    anyhow!("Usage: write_manifest <artifact_dir> [--created-at <unix_secs>]")
}

fn parse_args() -> Result<(PathBuf, Option<i64>)> {
    let mut args = env::args().skip(1);
    let mut dir: Option<PathBuf> = None;
    let mut created_at: Option<i64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--created-at" => {
                let v = args.next().ok_or_else(usage)?;
                let parsed = v
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| anyhow!("--created-at must be an integer"))?;
                created_at = Some(parsed);
            }
            "-h" | "--help" => return Err(usage()),
            _ => {
                if dir.is_some() {
                    return Err(usage());
                }
                dir = Some(PathBuf::from(arg));
            }
        }
    }

    Ok((dir.ok_or_else(usage)?, created_at))
}

fn main() -> Result<()> {
    let (dir, created_at) = parse_args()?;

    let store = DirectoryStore::new(&dir);
    let names: Vec<&str> = ArtifactKind::ALL.iter().map(|k| k.file_name()).collect();
    let created_at = created_at.unwrap_or_else(unix_now);
    let manifest = BundleManifest::build(&store, &names, Some(created_at))?;

    let path = dir.join(MANIFEST_FILE);
    fs::write(&path, manifest.to_json()?).with_context(|| format!("Failed to write {path:?}"))?;

    println!("Wrote manifest: {path:?}");
    for (name, digest) in &manifest.files {
        println!("  {digest}  {name}");
    }
    Ok(())
}
