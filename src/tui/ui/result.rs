//! Result panel.

use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::Presentation;
use crate::domain::SeverityTier;
use crate::tui::styles::HealthTheme;

/// What the result panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultState {
    /// No prediction requested yet
    #[default]
    Idle,
    Complete(Presentation),
    /// The request was rejected (input or stage failure)
    Error(String),
    /// A prediction was requested but no bundle is loaded
    Unavailable,
}

/// Render the result panel.
///
/// `load_error` is the startup load failure, if any; it is shown in every
/// state so the missing bundle is never mistaken for "no result yet".
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState, load_error: Option<&str>) {
    let mut lines = vec![Line::from("")];

    if let Some(err) = load_error {
        lines.push(Line::from(Span::styled(
            crate::application::LOAD_FAILED,
            HealthTheme::danger().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(err.to_string(), HealthTheme::text_muted())));
        lines.push(Line::from(""));
    }

    let border = match state {
        ResultState::Idle => {
            if load_error.is_none() {
                lines.push(Line::from(Span::styled(
                    "Isi formulir lalu tekan Enter untuk menjalankan prediksi.",
                    HealthTheme::text_secondary(),
                )));
            }
            HealthTheme::border()
        }
        ResultState::Complete(p) => {
            let style = HealthTheme::tier(p.tier);
            let icon = match p.tier {
                SeverityTier::Informational => "OK",
                SeverityTier::Cautionary | SeverityTier::Alert => "!",
            };
            lines.push(Line::from(Span::styled(
                format!("{icon} {}", p.title),
                style.add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(p.message.clone(), style)));
            if let Some(advice) = p.advice {
                lines.push(Line::from(Span::styled(advice, style)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                p.tier.description(),
                HealthTheme::text_muted(),
            )));
            style
        }
        ResultState::Error(message) => {
            lines.push(Line::from(Span::styled("! Error", HealthTheme::danger())));
            lines.push(Line::from(Span::styled(message.clone(), HealthTheme::text())));
            HealthTheme::danger()
        }
        ResultState::Unavailable => {
            lines.push(Line::from(Span::styled(
                crate::application::MODEL_UNAVAILABLE,
                HealthTheme::tier(SeverityTier::Cautionary),
            )));
            HealthTheme::danger()
        }
    };

    let block = Block::default()
        .title(Span::styled(" Hasil Analisis Prediktif ", HealthTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(border);

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(content, area);
}
