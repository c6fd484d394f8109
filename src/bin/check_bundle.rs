//! Bundle checker.
//!
//! Loads an artifact bundle with all compatibility checks, prints what it
//! contains and optionally runs one prediction.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin check_bundle -- <artifact_dir> [--require-manifest] [--request <record.json>]
//! ```
//!
//! The request file holds one `RawRecord` in form wording, e.g.
//! `{"gender": "Perempuan", "family_history": "yes", ..., "mtrans": "Jalan Kaki"}`.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use obesilens::adapters::DirectoryStore;
use obesilens::{ArtifactBundle, InferencePipeline, Presentation, RawRecord};

struct Args {
    dir: PathBuf,
    require_manifest: bool,
    request: Option<PathBuf>,
}

fn usage() -> anyhow::Error {
    anyhow!("Usage: check_bundle <artifact_dir> [--require-manifest] [--request <record.json>]")
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let mut dir: Option<PathBuf> = None;
    let mut require_manifest = false;
    let mut request: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--require-manifest" => require_manifest = true,
            "--request" => request = Some(PathBuf::from(args.next().ok_or_else(usage)?)),
            "-h" | "--help" => return Err(usage()),
            _ => {
                if dir.is_some() {
                    return Err(usage());
                }
                dir = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(Args {
        dir: dir.ok_or_else(usage)?,
        require_manifest,
        request,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let store = DirectoryStore::new(&args.dir);
    let bundle = ArtifactBundle::load(&store, args.require_manifest)?;

    println!("Bundle:       {}", args.dir.display());
    println!("Fingerprint:  {}", bundle.fingerprint().unwrap_or("-"));
    println!("Columns:      {}", bundle.feature_columns().join(", "));
    println!("Encoded:      {} features", bundle.transformer().n_features_out());
    println!("Classes:");
    for (i, category) in bundle.categories().iter().enumerate() {
        println!("  {i}: {} ({})", category.label(), category.tier());
    }

    if let Some(path) = args.request {
        let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {path:?}"))?;
        let raw: RawRecord =
            serde_json::from_str(&text).with_context(|| format!("Invalid record in {path:?}"))?;

        let pipeline = InferencePipeline::new(Arc::new(bundle));
        let result = pipeline.predict_raw(&raw)?;
        let presentation = Presentation::from(&result);

        println!();
        println!("Prediction:   {} [{}]", result.label(), result.tier());
        println!("{}", presentation.message);
        if let Some(advice) = presentation.advice {
            println!("{advice}");
        }
    }

    Ok(())
}
