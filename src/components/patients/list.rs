//! Patient master list. Entry point of the app and the place the detail
//! screen returns to.

use crate::api::PatientsApi;
use crate::app::Route;
use crate::components::Component;
use crate::format::{format_date, format_gender, or_dash};
use crate::models::Patient;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use std::sync::Arc;
use std::time::{Duration, Instant};

const BANNER_TIMEOUT: Duration = Duration::from_secs(5);

pub struct PatientList {
    api: Arc<dyn PatientsApi>,
    patients: Vec<Patient>,
    state: TableState,
    error_message: Option<String>,
    success_message: Option<String>,
    success_timer: Option<Instant>,
}

impl PatientList {
    /// Creates the list and fetches the records. `deleted` shows the banner
    /// announcing that the previous screen removed a patient.
    pub fn new(api: Arc<dyn PatientsApi>, deleted: bool) -> Self {
        let mut list = Self {
            api,
            patients: Vec::new(),
            state: TableState::default(),
            error_message: None,
            success_message: None,
            success_timer: None,
        };
        if deleted {
            list.success_message = Some("Pasien berhasil dihapus".to_string());
            list.success_timer = Some(Instant::now());
        }
        list.fetch_patients();
        list
    }

    /// Reloads the records, keeping the selection in bounds.
    pub fn fetch_patients(&mut self) {
        match self.api.list() {
            Ok(patients) => {
                self.patients = patients;
                if self.patients.is_empty() {
                    self.state.select(None);
                } else {
                    let selection = self
                        .state
                        .selected()
                        .unwrap_or(0)
                        .min(self.patients.len() - 1);
                    self.state.select(Some(selection));
                }
                self.error_message = None;
            }
            Err(e) => {
                tracing::error!(kind = ?e.kind(), error = %e, "failed to list patients");
                self.error_message = Some(format!("Gagal memuat daftar pasien: {}", e.kind()));
            }
        }
    }

    fn select_next(&mut self) {
        if self.patients.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.patients.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    fn select_previous(&mut self) {
        if self.patients.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.patients.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn selected_patient(&self) -> Option<&Patient> {
        self.state.selected().and_then(|i| self.patients.get(i))
    }

    fn check_timeouts(&mut self) {
        if self.success_timer.is_some_and(|t| t.elapsed() > BANNER_TIMEOUT) {
            self.success_message = None;
            self.success_timer = None;
        }
    }
}

impl Component for PatientList {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Route>> {
        match key.code {
            KeyCode::Down => self.select_next(),
            KeyCode::Up => self.select_previous(),
            KeyCode::Enter => {
                if let Some(id) = self.selected_patient().and_then(|p| p.id.clone()) {
                    return Ok(Some(Route::PatientDetail(id)));
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.fetch_patients(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                return Ok(Some(Route::Quit));
            }
            _ => {}
        }
        Ok(None)
    }

    fn on_tick(&mut self) -> Option<Route> {
        self.check_timeouts();
        None
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 16, 28))),
            area,
        );

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Table
                Constraint::Length(1), // Banner / error
                Constraint::Length(1), // Help
            ])
            .margin(1)
            .split(area);

        let header_block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
            .style(Style::default().bg(Color::Rgb(16, 16, 28)));
        frame.render_widget(header_block, layout[0]);

        let title = Paragraph::new("👥 DATA PASIEN")
            .style(
                Style::default()
                    .fg(Color::Rgb(230, 230, 250))
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);

        let header_cells = ["NORM", "Nama", "NIK", "Jenis Kelamin", "Tanggal Lahir"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Rgb(230, 230, 250))));
        let header = Row::new(header_cells)
            .style(Style::default().bg(Color::Rgb(26, 26, 36)))
            .height(1)
            .bottom_margin(1);

        let rows = self.patients.iter().map(|patient| {
            Row::new(vec![
                Cell::from(or_dash(patient.norm.as_deref()).to_string()),
                Cell::from(patient.display_name().to_string()),
                Cell::from(or_dash(patient.nik.as_deref()).to_string()),
                Cell::from(format_gender(patient.gender.as_deref())),
                Cell::from(format_date(patient.birth_date.as_deref())),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(12),
                Constraint::Percentage(33),
                Constraint::Percentage(22),
                Constraint::Percentage(15),
                Constraint::Percentage(18),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(format!(" Pasien ({}) ", self.patients.len()))
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
                .style(Style::default().bg(Color::Rgb(22, 22, 35))),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Rgb(40, 40, 65))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");

        frame.render_stateful_widget(table, layout[1], &mut self.state.clone());

        if let Some(error) = &self.error_message {
            let error_paragraph = Paragraph::new(error.as_str())
                .style(
                    Style::default()
                        .fg(Color::Rgb(255, 100, 100))
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center);
            frame.render_widget(error_paragraph, layout[2]);
        } else if let Some(success) = &self.success_message {
            let success_paragraph = Paragraph::new(success.as_str())
                .style(
                    Style::default()
                        .fg(Color::Rgb(140, 219, 140))
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center);
            frame.render_widget(success_paragraph, layout[2]);
        }

        let help_text = Paragraph::new("↑↓: Pilih | Enter: Lihat Detail | R: Muat Ulang | Esc: Keluar")
            .style(Style::default().fg(Color::Rgb(140, 140, 170)))
            .alignment(Alignment::Center);
        frame.render_widget(help_text, layout[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MemoryPatients;
    use crate::test_support::{key, screen_text};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn patient(id: &str, name: &str) -> Patient {
        Patient {
            id: Some(id.to_string()),
            norm: Some(format!("{:08}", id.parse::<u32>().unwrap())),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn api() -> Arc<MemoryPatients> {
        Arc::new(MemoryPatients::with([
            patient("1", "Siti Aminah"),
            patient("2", "Budi Santoso"),
        ]))
    }

    fn draw(list: &PatientList) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| list.render(frame)).unwrap();
        screen_text(terminal.backend().buffer())
    }

    #[test]
    fn enter_opens_selected_patient() {
        let mut list = PatientList::new(api(), false);
        list.handle_input(key(KeyCode::Down)).unwrap();
        assert_eq!(
            list.handle_input(key(KeyCode::Enter)).unwrap(),
            Some(Route::PatientDetail("2".to_string()))
        );
    }

    #[test]
    fn selection_wraps() {
        let mut list = PatientList::new(api(), false);
        list.handle_input(key(KeyCode::Up)).unwrap();
        assert_eq!(list.state.selected(), Some(1));
        list.handle_input(key(KeyCode::Down)).unwrap();
        assert_eq!(list.state.selected(), Some(0));
    }

    #[test]
    fn deleted_marker_shows_banner() {
        let screen = draw(&PatientList::new(api(), true));
        assert!(screen.contains("Pasien berhasil dihapus"));
        assert!(screen.contains("Siti Aminah"));

        let screen = draw(&PatientList::new(api(), false));
        assert!(!screen.contains("Pasien berhasil dihapus"));
    }

    #[test]
    fn refresh_picks_up_removed_records() {
        let api = api();
        let mut list = PatientList::new(api.clone(), false);
        list.handle_input(key(KeyCode::Down)).unwrap();
        api.records.lock().unwrap().remove("2");

        list.handle_input(key(KeyCode::Char('r'))).unwrap();
        assert_eq!(list.patients.len(), 1);
        assert_eq!(list.state.selected(), Some(0));
    }

    #[test]
    fn empty_list_has_nothing_to_open() {
        let mut list = PatientList::new(Arc::new(MemoryPatients::default()), false);
        assert_eq!(list.handle_input(key(KeyCode::Enter)).unwrap(), None);
        assert_eq!(list.handle_input(key(KeyCode::Esc)).unwrap(), Some(Route::Quit));
    }
}
