//! Obesilens: obesity-category prediction
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use obesilens::adapters::DirectoryStore;
use obesilens::config::Settings;
use obesilens::tui::App;
use obesilens::ArtifactBundle;

fn main() -> Result<()> {
    let settings = Settings::from_env();

    // Writing logs to the terminal would corrupt the TUI (alternate screen):
    // - interactive TTY: log to a file
    // - non-interactive: log to stdout
    let interactive = std::io::stdout().is_terminal();
    let (writer, _guard) = if settings.log_mode.use_file(interactive) {
        if let Some(parent) = settings.log_file.parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&settings.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    tracing::info!("Starting Obesilens...");

    // A failed load does not stop the app; the form stays usable and the
    // result panel reports why predictions are unavailable.
    let store = DirectoryStore::new(&settings.artifact_dir);
    let bundle = ArtifactBundle::load(&store, settings.require_manifest).map(Arc::new);
    if let Err(e) = &bundle {
        tracing::error!("Inference unavailable: {e}");
    }

    let mut app = App::new(bundle);
    app.run()?;

    tracing::info!("Obesilens shutdown complete.");
    Ok(())
}
