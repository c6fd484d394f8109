//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single screen:
//! - Sidebar form with the survey questions
//! - Result panel colored by severity tier

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::HealthTheme;
