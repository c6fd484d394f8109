//! Sidebar input form.

use std::ops::RangeInclusive;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::domain::{Answer, Column, Frequency, Gender, RawRecord, Transport, Vocabulary};
use crate::tui::styles::HealthTheme;

/// Form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Gender,
    FamilyHistory,
    Favc,
    Caec,
    Smoke,
    Scc,
    Calc,
    Mtrans,
    Age,
    Fcvc,
    Ncp,
    Ch2o,
    Faf,
    Tue,
}

/// How a field takes input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Selector or radio button over fixed options
    Choice(Vec<&'static str>),
    Slider(RangeInclusive<i64>),
}

const AGE_RANGE: RangeInclusive<i64> = 14..=65;

fn options<V: Vocabulary>() -> Vec<&'static str> {
    V::ALL.iter().map(|v| v.display()).collect()
}

impl FormField {
    pub const ALL: [FormField; 14] = [
        FormField::Gender,
        FormField::FamilyHistory,
        FormField::Favc,
        FormField::Caec,
        FormField::Smoke,
        FormField::Scc,
        FormField::Calc,
        FormField::Mtrans,
        FormField::Age,
        FormField::Fcvc,
        FormField::Ncp,
        FormField::Ch2o,
        FormField::Faf,
        FormField::Tue,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gender => "Jenis Kelamin",
            Self::FamilyHistory => "Memiliki riwayat obesitas dalam keluarga?",
            Self::Favc => "Sering mengonsumsi makanan tinggi kalori (FAVC)?",
            Self::Caec => "Konsumsi makanan di antara waktu makan utama (CAEC)?",
            Self::Smoke => "Apakah Anda merokok?",
            Self::Scc => "Apakah Anda memantau asupan kalori harian?",
            Self::Calc => "Frekuensi konsumsi alkohol (CALC)",
            Self::Mtrans => "Transportasi utama yang digunakan (MTRANS)",
            Self::Age => "Umur",
            Self::Fcvc => "Frekuensi konsumsi sayur (FCVC)",
            Self::Ncp => "Jumlah porsi makan utama per hari (NCP)",
            Self::Ch2o => "Konsumsi air per hari (liter) (CH2O)",
            Self::Faf => "Frekuensi aktivitas fisik per minggu (FAF)",
            Self::Tue => "Waktu penggunaan gawai per hari (jam) (TUE)",
        }
    }

    #[must_use]
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Self::Fcvc => Some("1: Tidak Pernah, 2: Kadang-kadang, 3: Selalu"),
            Self::Faf => Some("0: Tidak ada, 1: 1-2 hari, 2: 2-4 hari, 3: 4-5 hari"),
            Self::Tue => Some("0: 0-2 jam, 1: 3-5 jam, 2: >5 jam"),
            _ => None,
        }
    }

    #[must_use]
    pub fn input(self) -> Input {
        let slider = |column: Column| Input::Slider(column.bounds().unwrap_or(0..=0));
        match self {
            Self::Gender => Input::Choice(options::<Gender>()),
            Self::FamilyHistory | Self::Favc | Self::Smoke | Self::Scc => {
                Input::Choice(options::<Answer>())
            }
            Self::Caec | Self::Calc => Input::Choice(options::<Frequency>()),
            Self::Mtrans => Input::Choice(options::<Transport>()),
            Self::Age => Input::Slider(AGE_RANGE),
            Self::Fcvc => slider(Column::Fcvc),
            Self::Ncp => slider(Column::Ncp),
            Self::Ch2o => slider(Column::Ch2o),
            Self::Faf => slider(Column::Faf),
            Self::Tue => slider(Column::Tue),
        }
    }
}

/// Form state: the record being edited and the cursor.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    record: RawRecord,
    pub selected: usize,
}

impl FormState {
    #[must_use]
    pub fn record(&self) -> &RawRecord {
        &self.record
    }

    #[must_use]
    pub fn selected_field(&self) -> FormField {
        FormField::ALL[self.selected % FormField::ALL.len()]
    }

    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % FormField::ALL.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected == 0 {
            self.selected = FormField::ALL.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Restore the initial form values, keeping the cursor.
    pub fn reset(&mut self) {
        self.record = RawRecord::default();
    }

    /// Move the selected field by `delta`: choices wrap, sliders clamp.
    pub fn step(&mut self, delta: i64) {
        let field = self.selected_field();
        match field.input() {
            Input::Choice(options) => {
                let current = self.text(field);
                let len = options.len() as i64;
                let index = options.iter().position(|o| *o == current).unwrap_or(0) as i64;
                let next = (index + delta).rem_euclid(len) as usize;
                self.set_text(field, options[next]);
            }
            Input::Slider(range) => {
                let value = self.number(field).saturating_add(delta);
                self.set_number(field, value.clamp(*range.start(), *range.end()));
            }
        }
    }

    /// Current value as shown in the form.
    #[must_use]
    pub fn text(&self, field: FormField) -> String {
        let r = &self.record;
        match field {
            FormField::Gender => r.gender.clone(),
            FormField::FamilyHistory => r.family_history.clone(),
            FormField::Favc => r.favc.clone(),
            FormField::Caec => r.caec.clone(),
            FormField::Smoke => r.smoke.clone(),
            FormField::Scc => r.scc.clone(),
            FormField::Calc => r.calc.clone(),
            FormField::Mtrans => r.mtrans.clone(),
            _ => self.number(field).to_string(),
        }
    }

    fn number(&self, field: FormField) -> i64 {
        let r = &self.record;
        match field {
            FormField::Age => r.age.unwrap_or(*AGE_RANGE.start()),
            FormField::Fcvc => r.fcvc,
            FormField::Ncp => r.ncp,
            FormField::Ch2o => r.ch2o,
            FormField::Faf => r.faf,
            FormField::Tue => r.tue,
            _ => 0,
        }
    }

    fn set_text(&mut self, field: FormField, value: &str) {
        let r = &mut self.record;
        let slot = match field {
            FormField::Gender => &mut r.gender,
            FormField::FamilyHistory => &mut r.family_history,
            FormField::Favc => &mut r.favc,
            FormField::Caec => &mut r.caec,
            FormField::Smoke => &mut r.smoke,
            FormField::Scc => &mut r.scc,
            FormField::Calc => &mut r.calc,
            FormField::Mtrans => &mut r.mtrans,
            _ => return,
        };
        *slot = value.to_string();
    }

    fn set_number(&mut self, field: FormField, value: i64) {
        let r = &mut self.record;
        match field {
            FormField::Age => r.age = Some(value),
            FormField::Fcvc => r.fcvc = value,
            FormField::Ncp => r.ncp = value,
            FormField::Ch2o => r.ch2o = value,
            FormField::Faf => r.faf = value,
            FormField::Tue => r.tue = value,
            _ => {}
        }
    }
}

/// Render the sidebar form.
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let selected = state.selected_field();
    let items: Vec<ListItem> = FormField::ALL
        .iter()
        .map(|&field| {
            let is_selected = field == selected;
            let label_style = if is_selected {
                HealthTheme::focused()
            } else {
                HealthTheme::text_secondary()
            };
            let value_style = if is_selected {
                HealthTheme::selected()
            } else {
                HealthTheme::text()
            };
            let value = match field.input() {
                Input::Choice(_) => format!("‹ {} ›", state.text(field)),
                Input::Slider(range) => format!(
                    "{} [{}-{}]",
                    state.text(field),
                    range.start(),
                    range.end()
                ),
            };

            let mut lines = vec![
                Line::from(Span::styled(field.label(), label_style)),
                Line::from(vec![Span::raw("  "), Span::styled(value, value_style)]),
            ];
            if is_selected {
                if let Some(hint) = field.hint() {
                    lines.push(Line::from(Span::styled(
                        format!("  {hint}"),
                        HealthTheme::text_muted(),
                    )));
                }
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(Span::styled(
                " Formulir Input Data Pengguna ",
                HealthTheme::subtitle(),
            ))
            .borders(Borders::ALL)
            .border_style(HealthTheme::border_focused()),
    );
    f.render_widget(list, chunks[0]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[↑↓] ", HealthTheme::key_hint()),
        Span::styled("Pilih ", HealthTheme::key_desc()),
        Span::styled("[←→] ", HealthTheme::key_hint()),
        Span::styled("Ubah ", HealthTheme::key_desc()),
        Span::styled("[Enter] ", HealthTheme::key_hint()),
        Span::styled("Jalankan Prediksi ", HealthTheme::key_desc()),
        Span::styled("[R] ", HealthTheme::key_hint()),
        Span::styled("Reset ", HealthTheme::key_desc()),
        Span::styled("[Q] ", HealthTheme::key_hint()),
        Span::styled("Keluar", HealthTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(HealthTheme::border()),
    );
    f.render_widget(footer, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::normalizer;

    fn select(state: &mut FormState, field: FormField) {
        while state.selected_field() != field {
            state.next_field();
        }
    }

    #[test]
    fn test_initial_form_matches_defaults() {
        let state = FormState::default();
        assert_eq!(state.record(), &RawRecord::default());
        assert_eq!(state.text(FormField::Gender), "Laki-laki");
        assert_eq!(state.text(FormField::Age), "25");
        assert_eq!(state.selected_field(), FormField::Gender);
    }

    #[test]
    fn test_choices_wrap() {
        let mut state = FormState::default();
        select(&mut state, FormField::Mtrans);
        state.step(-1);
        assert_eq!(state.text(FormField::Mtrans), "Jalan Kaki");
        state.step(1);
        state.step(1);
        assert_eq!(state.text(FormField::Mtrans), "Motor");
    }

    #[test]
    fn test_sliders_clamp() {
        let mut state = FormState::default();
        select(&mut state, FormField::Ncp);
        for _ in 0..10 {
            state.step(1);
        }
        assert_eq!(state.record().ncp, 4);

        select(&mut state, FormField::Faf);
        for _ in 0..10 {
            state.step(-1);
        }
        assert_eq!(state.record().faf, 0);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = FormState::default();
        state.prev_field();
        assert_eq!(state.selected_field(), FormField::Tue);
        state.next_field();
        assert_eq!(state.selected_field(), FormField::Gender);
    }

    #[test]
    fn test_every_reachable_form_state_normalizes() {
        // Walk every option of every field; the form can never produce input
        // the normalizer rejects.
        let mut state = FormState::default();
        for field in FormField::ALL {
            select(&mut state, field);
            let steps = match field.input() {
                Input::Choice(options) => options.len(),
                Input::Slider(range) => (range.end() - range.start() + 1) as usize,
            };
            for _ in 0..steps {
                state.step(1);
                normalizer::normalize(state.record()).expect("form input is valid");
            }
            state.step(-100);
        }
    }

    #[test]
    fn test_reset_keeps_cursor() {
        let mut state = FormState::default();
        select(&mut state, FormField::Smoke);
        state.step(1);
        assert_eq!(state.text(FormField::Smoke), "no");
        state.reset();
        assert_eq!(state.text(FormField::Smoke), "yes");
        assert_eq!(state.selected_field(), FormField::Smoke);
    }
}
