//! Runtime settings, read once from the environment.

use std::path::PathBuf;

const ARTIFACT_DIR_ENV: &str = "OBESILENS_ARTIFACT_DIR";
const REQUIRE_MANIFEST_ENV: &str = "OBESILENS_REQUIRE_MANIFEST";
const LOG_MODE_ENV: &str = "OBESILENS_LOG_MODE";
const LOG_FILE_ENV: &str = "OBESILENS_LOG_FILE";

const DEFAULT_ARTIFACT_DIR: &str = "artifacts";
const DEFAULT_LOG_FILE: &str = "obesilens.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise.
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub artifact_dir: PathBuf,
    pub require_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            require_manifest: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            artifact_dir: lookup(ARTIFACT_DIR_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.artifact_dir, PathBuf::from),
            require_manifest: lookup(REQUIRE_MANIFEST_ENV).is_some_and(|v| parse_bool(&v)),
            log_mode: lookup(LOG_MODE_ENV).map_or(defaults.log_mode, |v| LogMode::parse(&v)),
            log_file: lookup(LOG_FILE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.log_file, PathBuf::from),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}
