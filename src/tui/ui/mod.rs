//! UI module: View components for the TUI.

pub mod form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::HealthTheme;

pub fn render_header(f: &mut Frame, area: Rect, bundle_status: &str) {
    let text = vec![
        Line::from(vec![
            Span::styled(" Prediksi Tingkat Obesitas ", HealthTheme::header()),
            Span::styled(format!("  {bundle_status}"), HealthTheme::text_muted()),
        ]),
        Line::from(Span::styled(
            " Aplikasi ini bertujuan untuk memprediksi kategori obesitas berdasarkan kebiasaan gaya hidup dan parameter fisik.",
            HealthTheme::text_secondary(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(HealthTheme::border());

    f.render_widget(Paragraph::new(text).block(block), area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "Hasil prediksi bersifat indikatif dan tidak menggantikan pemeriksaan oleh tenaga kesehatan.",
        HealthTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(HealthTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
