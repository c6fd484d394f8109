//! Main TUI application state.
//!
//! Handles:
//! - Form navigation and editing
//! - Running the pipeline on Enter
//! - Showing the load failure when no bundle is available

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::{ArtifactBundle, InferencePipeline, Presentation};
use crate::domain::MissingArtifactError;

use super::ui::{
    form::{render_form, FormState},
    render_disclaimer, render_header,
    result::{render_result, ResultState},
};

/// Main application state
pub struct App {
    /// Pipeline, or the reason the bundle could not be loaded
    pipeline: std::result::Result<InferencePipeline, MissingArtifactError>,

    form: FormState,

    result: ResultState,

    should_quit: bool,
}

impl App {
    /// Create the application around the outcome of the startup load.
    pub fn new(bundle: std::result::Result<Arc<ArtifactBundle>, MissingArtifactError>) -> Self {
        Self {
            pipeline: bundle.map(InferencePipeline::new),
            form: FormState::default(),
            result: ResultState::default(),
            should_quit: false,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(0),
                        Constraint::Length(2),
                    ])
                    .split(f.area());

                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .split(rows[1]);

                render_header(f, rows[0], &self.bundle_status());
                render_form(f, columns[0], &self.form);
                let load_error = self.load_error();
                render_result(f, columns[1], &self.result, load_error.as_deref());
                render_disclaimer(f, rows[2]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn bundle_status(&self) -> String {
        match &self.pipeline {
            Ok(p) => match p.bundle().short_fingerprint() {
                Some(fp) => format!("model {fp}"),
                None => "model siap".to_string(),
            },
            Err(_) => "model tidak tersedia".to_string(),
        }
    }

    fn load_error(&self) -> Option<String> {
        self.pipeline.as_ref().err().map(ToString::to_string)
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Left => self.form.step(-1),
            KeyCode::Right => self.form.step(1),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.form.reset();
                self.result = ResultState::Idle;
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let pipeline = match &self.pipeline {
            Ok(pipeline) => pipeline,
            Err(e) => {
                tracing::warn!("Prediction requested without a loaded bundle: {e}");
                self.result = ResultState::Unavailable;
                return;
            }
        };

        self.result = match pipeline.predict_raw(self.form.record()) {
            Ok(result) => ResultState::Complete(Presentation::from(&result)),
            Err(e) => ResultState::Error(e.to_string()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::DirectoryStore;
    use crate::domain::{ArtifactKind, WeightCategory};

    fn loaded_app() -> App {
        let store = DirectoryStore::new(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts"),
        );
        let bundle = ArtifactBundle::load(&store, true).expect("sample bundle");
        App::new(Ok(Arc::new(bundle)))
    }

    #[test]
    fn test_enter_runs_prediction_on_defaults() {
        let mut app = loaded_app();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        match &app.result {
            ResultState::Complete(p) => {
                assert_eq!(p.category, WeightCategory::OverweightLevelII);
            }
            other => panic!("unexpected result state: {other:?}"),
        }
        assert!(app.bundle_status().starts_with("model "));
        assert!(app.load_error().is_none());
    }

    #[test]
    fn test_reset_clears_result() {
        let mut app = loaded_app();
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(app.result, ResultState::Complete(_)));

        app.handle_key(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(app.result, ResultState::Idle);
        assert_eq!(app.form.record(), &crate::domain::RawRecord::default());
    }

    #[test]
    fn test_missing_bundle_never_predicts() {
        let mut app = App::new(Err(MissingArtifactError::not_found(ArtifactKind::Classifier)));
        assert!(app.load_error().unwrap().contains("model.json"));

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.result, ResultState::Unavailable);
        assert_eq!(app.bundle_status(), "model tidak tersedia");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(Err(MissingArtifactError::not_found(ArtifactKind::Scaler)));
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);

        let mut app = App::new(Err(MissingArtifactError::not_found(ArtifactKind::Scaler)));
        app.handle_key(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(!app.should_quit);
        app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.should_quit);
    }
}
