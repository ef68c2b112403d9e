//! Patient detail component: one record, shown read-only or as an edit form,
//! with update and delete against the records API.

use crate::api::{ApiError, ErrorKind, PatientsApi};
use crate::app::Route;
use crate::components::patients::fields::{
    field_at, render_field, FieldSpec, InputKind, CONTACT_FIELDS, FIELD_COUNT, IDENTITY_FIELDS,
};
use crate::components::patients::form::PatientForm;
use crate::components::Component;
use crate::format::{format_date, format_gender, or_dash};
use crate::models::Patient;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a backend call, delivered back to the screen that issued it.
#[derive(Debug)]
enum Outcome {
    Loaded(Result<Patient, ApiError>),
    Updated(Result<(), ApiError>),
    Deleted(Result<(), ApiError>),
}

/// Progress of the initial record load.
enum LoadState {
    Loading,
    Loaded(PatientForm),
    /// `reason` is set when the load failed for something other than a
    /// missing record; such failures can be retried.
    Missing { reason: Option<ErrorKind> },
}

/// Component showing one patient record, read-only or as an edit form.
pub struct PatientDetail {
    /// Records backend the worker threads call.
    api: Arc<dyn PatientsApi>,
    /// Identifier of the record this screen was opened for.
    patient_id: String,
    load: LoadState,
    /// A save request is in flight.
    saving: bool,
    /// A delete request is in flight.
    deleting: bool,
    /// Flat index into the identity and contact fields.
    selected_field: usize,
    /// Input line while a field is being typed into.
    input_value: Option<String>,
    show_confirmation: bool,
    confirmation_selected: usize, // 0 for Yes, 1 for No
    error_message: Option<String>,
    error_timer: Option<Instant>,
    success_message: Option<String>,
    success_timer: Option<Instant>,
    /// Handed to workers; results come back on `rx`.
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
}

impl PatientDetail {
    /// Creates the screen and starts loading the record.
    pub fn new(api: Arc<dyn PatientsApi>, patient_id: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel();

        let mut detail = Self {
            api,
            patient_id: patient_id.into(),
            load: LoadState::Loading,
            saving: false,
            deleting: false,
            selected_field: 0,
            input_value: None,
            show_confirmation: false,
            confirmation_selected: 1,
            error_message: None,
            error_timer: None,
            success_message: None,
            success_timer: None,
            tx,
            rx,
        };
        detail.start_load();
        detail
    }

    /// The loaded form, if the record has arrived.
    fn form(&self) -> Option<&PatientForm> {
        match &self.load {
            LoadState::Loaded(form) => Some(form),
            _ => None,
        }
    }

    /// Mutable access to the loaded form.
    fn form_mut(&mut self) -> Option<&mut PatientForm> {
        match &mut self.load {
            LoadState::Loaded(form) => Some(form),
            _ => None,
        }
    }

    /// Whether the loaded form is in edit mode.
    fn is_editing(&self) -> bool {
        self.form().is_some_and(PatientForm::is_editing)
    }

    /// Runs `call` on a worker thread. The outcome is picked up on tick; if
    /// this screen is gone by then the send fails and the outcome is dropped.
    fn dispatch<F>(&self, call: F)
    where
        F: FnOnce(&dyn PatientsApi) -> Outcome + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let _ = tx.send(call(api.as_ref()));
        });
    }

    /// Requests the record from the backend.
    fn start_load(&mut self) {
        self.load = LoadState::Loading;
        let id = self.patient_id.clone();
        tracing::debug!(patient_id = %id, "loading patient");
        self.dispatch(move |api| Outcome::Loaded(api.get_detail(&id)));
    }

    /// Sends the draft to the backend. Ignored while a save is pending.
    fn save(&mut self) {
        if self.saving || !self.is_editing() {
            return;
        }
        let Some(draft) = self.form().map(|form| form.draft().clone()) else {
            return;
        };
        self.saving = true;
        let id = self.patient_id.clone();
        tracing::info!(patient_id = %id, "saving patient");
        self.dispatch(move |api| Outcome::Updated(api.update(&id, &draft)));
    }

    /// Asks the backend to remove the record. Ignored while a delete is pending.
    fn delete(&mut self) {
        if self.deleting {
            return;
        }
        self.deleting = true;
        let id = self.patient_id.clone();
        tracing::info!(patient_id = %id, "deleting patient");
        self.dispatch(move |api| Outcome::Deleted(api.delete(&id)));
    }

    /// Handles the result of the record load.
    fn on_loaded(&mut self, result: Result<Patient, ApiError>) {
        match result {
            Ok(patient) => {
                self.load = LoadState::Loaded(PatientForm::new(patient));
            }
            Err(e) => {
                let kind = e.kind();
                tracing::warn!(patient_id = %self.patient_id, ?kind, error = %e, "failed to load patient");
                self.load = LoadState::Missing {
                    reason: (kind != ErrorKind::NotFound).then_some(kind),
                };
            }
        }
    }

    /// Handles the result of a save.
    fn on_updated(&mut self, result: Result<(), ApiError>) {
        self.saving = false;
        match result {
            Ok(()) => {
                if let Some(form) = self.form_mut() {
                    form.commit();
                }
                self.input_value = None;
                tracing::info!(patient_id = %self.patient_id, "patient updated");
                self.set_success("Pasien berhasil diperbarui!".to_string());
            }
            Err(e) => {
                tracing::error!(patient_id = %self.patient_id, kind = ?e.kind(), error = %e, "failed to update patient");
                self.set_error(format!("Gagal menyimpan perubahan: {}", e.kind()));
            }
        }
    }

    /// Handles the result of a delete; on success asks to return to the list.
    fn on_deleted(&mut self, result: Result<(), ApiError>) -> Option<Route> {
        self.deleting = false;
        match result {
            Ok(()) => {
                tracing::info!(patient_id = %self.patient_id, "patient deleted");
                Some(Route::PatientList { deleted: true })
            }
            Err(e) => {
                tracing::error!(patient_id = %self.patient_id, kind = ?e.kind(), error = %e, "failed to delete patient");
                self.set_error(format!("Gagal menghapus pasien: {}", e.kind()));
                None
            }
        }
    }

    /// Routes a finished backend call to its handler.
    fn apply_outcome(&mut self, outcome: Outcome) -> Option<Route> {
        match outcome {
            Outcome::Loaded(result) => self.on_loaded(result),
            Outcome::Updated(result) => self.on_updated(result),
            Outcome::Deleted(result) => return self.on_deleted(result),
        }
        None
    }

    /// Moves the field cursor, clamped to the last field.
    fn select_field(&mut self, index: usize) {
        self.selected_field = index.min(FIELD_COUNT - 1);
    }

    /// Enter on a field: start typing, or step a choice field.
    fn activate_field(&mut self) {
        let Some(spec) = field_at(self.selected_field) else {
            return;
        };
        if spec.input == InputKind::Choice {
            self.write_field(spec, String::new());
        } else {
            self.input_value = self.form().map(|form| spec.key.edit_value(form.draft()));
        }
    }

    /// Enter while typing: write the input line into the draft.
    fn apply_edited_value(&mut self) {
        let (Some(spec), Some(value)) = (field_at(self.selected_field), self.input_value.clone())
        else {
            return;
        };
        if !spec.input.accepts(&value) {
            self.set_error(format!("{} harus berformat {}", spec.label, spec.input.hint()));
            return;
        }
        if self.write_field(spec, value) {
            self.input_value = None;
        }
    }

    /// Applies `text` to the draft field described by `spec`.
    fn write_field(&mut self, spec: &FieldSpec, text: String) -> bool {
        let Some(form) = self.form_mut() else {
            return false;
        };
        match spec.key.to_update(text, form.draft()) {
            Ok(update) => form.apply(update),
            Err(e) => {
                tracing::warn!(field = spec.label, error = %e, "field rejected");
                self.set_error(format!("{} tidak dapat diubah", spec.label));
                false
            }
        }
    }

    /// Handles input events for the component.
    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<Route>> {
        self.check_timeouts();

        match self.load {
            LoadState::Loading => {
                if key.code == KeyCode::Esc {
                    return Ok(Some(Route::PatientList { deleted: false }));
                }
                return Ok(None);
            }
            LoadState::Missing { reason } => {
                match key.code {
                    KeyCode::Char('r') | KeyCode::Char('R') if reason.is_some() => {
                        self.start_load();
                    }
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('b') | KeyCode::Char('B') => {
                        return Ok(Some(Route::PatientList { deleted: false }));
                    }
                    _ => {}
                }
                return Ok(None);
            }
            LoadState::Loaded(_) => {}
        }

        if self.show_confirmation {
            match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                    self.confirmation_selected = 1 - self.confirmation_selected;
                }
                KeyCode::Enter => {
                    if self.confirmation_selected == 0 {
                        self.delete();
                    }
                    self.show_confirmation = false;
                }
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.delete();
                    self.show_confirmation = false;
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.show_confirmation = false;
                }
                _ => {}
            }
            return Ok(None);
        }

        if self.input_value.is_some() {
            if self.saving {
                return Ok(None);
            }
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S')
                    if key.modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    self.apply_edited_value();
                    if self.input_value.is_none() {
                        self.save();
                    }
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if let Some(input) = &mut self.input_value {
                        input.push(c);
                    }
                }
                KeyCode::Backspace => {
                    if let Some(input) = &mut self.input_value {
                        input.pop();
                    }
                }
                KeyCode::Enter => self.apply_edited_value(),
                KeyCode::Esc => {
                    self.input_value = None;
                    self.clear_error();
                }
                _ => {}
            }
            return Ok(None);
        }

        if self.is_editing() {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S')
                    if key.modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    self.save();
                }
                _ if self.saving => {}
                KeyCode::Up => {
                    self.select_field(self.selected_field.saturating_sub(1));
                }
                KeyCode::Down | KeyCode::Tab => {
                    self.select_field(self.selected_field + 1);
                }
                KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                    self.activate_field();
                }
                KeyCode::Esc => {
                    if let Some(form) = self.form_mut() {
                        form.cancel();
                    }
                    self.clear_error();
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('e') | KeyCode::Char('E') if !self.deleting => {
                if let Some(form) = self.form_mut() {
                    form.begin_edit();
                }
                self.select_field(0);
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete if !self.deleting => {
                self.show_confirmation = true;
                self.confirmation_selected = 1; // Default to "No" for safety
            }
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => {
                return Ok(Some(Route::PatientList { deleted: false }));
            }
            _ => {}
        }
        Ok(None)
    }

    /// Clears the error message.
    fn clear_error(&mut self) {
        self.error_message = None;
        self.error_timer = None;
    }

    /// Shows an error message for five seconds.
    fn set_error(&mut self, message: String) {
        self.clear_success();
        self.error_message = Some(message);
        self.error_timer = Some(Instant::now());
    }

    fn clear_success(&mut self) {
        self.success_message = None;
        self.success_timer = None;
    }

    /// Shows a success message for five seconds.
    fn set_success(&mut self, message: String) {
        self.clear_error();
        self.success_message = Some(message);
        self.success_timer = Some(Instant::now());
    }

    /// Expires messages older than five seconds.
    fn check_timeouts(&mut self) {
        if self.error_timer.is_some_and(|t| t.elapsed() > MESSAGE_TIMEOUT) {
            self.clear_error();
        }
        if self.success_timer.is_some_and(|t| t.elapsed() > MESSAGE_TIMEOUT) {
            self.clear_success();
        }
    }
}

impl Component for PatientDetail {
    fn handle_input(&mut self, event: KeyEvent) -> Result<Option<Route>> {
        self.handle_key(event)
    }

    fn on_tick(&mut self) -> Option<Route> {
        self.check_timeouts();
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(route) = self.apply_outcome(outcome) {
                return Some(route);
            }
        }
        None
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 16, 28))),
            area,
        );

        match &self.load {
            LoadState::Loading => self.render_loading(frame, area),
            LoadState::Missing { reason } => self.render_missing(frame, area, *reason),
            LoadState::Loaded(form) => {
                self.render_record(frame, area, form);
                if self.show_confirmation {
                    self.render_confirmation_dialog(frame, area, form.draft());
                }
            }
        }
    }
}

impl PatientDetail {
    fn centered_card(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let card = Self::centered_card(area, 50, 7);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(140, 140, 200)))
            .style(Style::default().bg(Color::Rgb(26, 26, 36)));
        let text = Paragraph::new(vec![
            Line::from(""),
            Line::from("⏳").alignment(Alignment::Center),
            Line::from(""),
            Line::from("Memuat detail pasien...").alignment(Alignment::Center),
        ])
        .style(Style::default().fg(Color::Rgb(180, 180, 200)))
        .block(block);
        frame.render_widget(text, card);
    }

    fn render_missing(&self, frame: &mut Frame, area: Rect, reason: Option<ErrorKind>) {
        let card = Self::centered_card(area, 56, 11);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(140, 140, 200)))
            .style(Style::default().bg(Color::Rgb(26, 26, 36)));

        let mut lines = vec![
            Line::from(""),
            Line::from("👥").alignment(Alignment::Center),
            Line::from(Span::styled(
                "Data tidak ditemukan",
                Style::default()
                    .fg(Color::Rgb(230, 230, 250))
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::from("Pasien yang Anda cari tidak tersedia").alignment(Alignment::Center),
        ];
        if let Some(kind) = reason {
            lines.push(
                Line::from(Span::styled(
                    format!("Penyebab: {kind}"),
                    Style::default().fg(Color::Rgb(255, 100, 100)),
                ))
                .alignment(Alignment::Center),
            );
        }
        lines.push(Line::from(""));
        lines.push(
            Line::from(Span::styled(
                "► ← Kembali ◄",
                Style::default()
                    .fg(Color::Rgb(129, 199, 245))
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        );
        if reason.is_some() {
            lines.push(Line::from("R: Coba lagi").alignment(Alignment::Center));
        }

        let text = Paragraph::new(lines)
            .style(Style::default().fg(Color::Rgb(180, 180, 200)))
            .block(block);
        frame.render_widget(text, card);
    }

    fn render_record(&self, frame: &mut Frame, area: Rect, form: &PatientForm) {
        let patient = form.draft();
        let editing = form.is_editing();

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(12),   // Field columns
                Constraint::Length(4), // Audit
                Constraint::Length(1), // Actions
                Constraint::Length(1), // Message
                Constraint::Length(1), // Help
            ])
            .margin(1)
            .split(area);

        self.render_header(frame, main_layout[0], patient, editing && form.is_dirty());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_layout[1]);
        self.render_column(frame, columns[0], " 💳 Identitas Utama ", &IDENTITY_FIELDS, 0, form);
        self.render_column(
            frame,
            columns[1],
            " 📞 Kontak & Alamat ",
            &CONTACT_FIELDS,
            IDENTITY_FIELDS.len(),
            form,
        );

        self.render_audit(frame, main_layout[2], patient);
        self.render_actions(frame, main_layout[3], editing);

        if let Some(error) = &self.error_message {
            let error_paragraph = Paragraph::new(error.as_str())
                .style(
                    Style::default()
                        .fg(Color::Rgb(255, 100, 100))
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center);
            frame.render_widget(error_paragraph, main_layout[4]);
        } else if let Some(success) = &self.success_message {
            let success_paragraph = Paragraph::new(success.as_str())
                .style(
                    Style::default()
                        .fg(Color::Rgb(140, 219, 140))
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center);
            frame.render_widget(success_paragraph, main_layout[4]);
        }

        let help_text = if self.input_value.is_some() {
            let hint = field_at(self.selected_field)
                .map(|spec| spec.input.hint())
                .unwrap_or_default();
            format!("Ketik nilai ({hint}) | Enter: Terapkan | Esc: Batalkan isian")
        } else if self.deleting {
            "Menghapus pasien... | Esc: Kembali".to_string()
        } else if editing {
            "↑/↓: Pilih field | Enter: Ubah field | Ctrl+S: Simpan | Esc: Batal".to_string()
        } else {
            "E: Edit Data | D: Hapus Pasien | Esc: Kembali".to_string()
        };
        let help_paragraph = Paragraph::new(help_text)
            .style(Style::default().fg(Color::Rgb(140, 140, 170)))
            .alignment(Alignment::Center);
        frame.render_widget(help_paragraph, main_layout[5]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, patient: &Patient, unsaved: bool) {
        let header_block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
            .style(Style::default().bg(Color::Rgb(16, 16, 28)));
        frame.render_widget(header_block, area);

        let editing = self.is_editing();
        let title = match (editing, unsaved) {
            (true, true) => "✍️  EDIT DATA PASIEN (belum disimpan)",
            (true, false) => "✍️  EDIT DATA PASIEN",
            _ => "👥 DETAIL PASIEN",
        };
        let age = patient.age.unwrap_or(0);
        let lines = vec![
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(Color::Rgb(230, 230, 250))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("NORM: ", Style::default().fg(Color::Rgb(180, 180, 200))),
                Span::styled(
                    or_dash(patient.norm.as_deref()).to_string(),
                    Style::default()
                        .fg(Color::Rgb(250, 250, 110))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("   "),
                Span::styled(
                    format!(" {} ", format_gender(patient.gender.as_deref())),
                    Style::default()
                        .fg(Color::Rgb(220, 220, 240))
                        .bg(Color::Rgb(80, 60, 130)),
                ),
                Span::raw(" "),
                Span::styled(
                    format!(" {age} tahun "),
                    Style::default()
                        .fg(Color::Rgb(220, 220, 240))
                        .bg(Color::Rgb(40, 40, 60)),
                ),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            area,
        );
    }

    fn render_column(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        specs: &[FieldSpec],
        offset: usize,
        form: &PatientForm,
    ) {
        let editing = form.is_editing();
        let rows: Vec<Row> = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let typing = if editing && offset + i == self.selected_field {
                    self.input_value.as_deref()
                } else {
                    None
                };
                render_field(spec, form.draft(), editing, typing)
            })
            .collect();

        let mut state = TableState::default();
        if editing {
            state.select(
                self.selected_field
                    .checked_sub(offset)
                    .filter(|local| *local < specs.len()),
            );
        }

        let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(10)])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(Span::styled(
                        title.to_string(),
                        Style::default()
                            .fg(Color::Rgb(230, 230, 250))
                            .add_modifier(Modifier::BOLD),
                    ))
                    .border_style(Style::default().fg(Color::Rgb(140, 140, 200)))
                    .style(Style::default().bg(Color::Rgb(26, 26, 36))),
            )
            .column_spacing(2)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Rgb(250, 250, 110))
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");

        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_audit(&self, frame: &mut Frame, area: Rect, patient: &Patient) {
        let audit = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("📅 Dibuat pada: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format_date(patient.created_at.as_deref())),
            ]),
            Line::from(vec![
                Span::styled(
                    "📅 Diperbarui pada: ",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format_date(patient.updated_at.as_deref())),
            ]),
        ])
        .style(Style::default().fg(Color::Rgb(200, 200, 220)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Informasi Audit ")
                .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
                .style(Style::default().bg(Color::Rgb(22, 22, 35))),
        );
        frame.render_widget(audit, area);
    }

    fn render_actions(&self, frame: &mut Frame, area: Rect, editing: bool) {
        let idle = Style::default().fg(Color::Rgb(180, 180, 200));
        let primary = Style::default()
            .fg(Color::Rgb(129, 199, 245))
            .add_modifier(Modifier::BOLD);
        let danger = Style::default()
            .fg(Color::Rgb(255, 100, 100))
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled("[ ← Kembali ]", idle), Span::raw("  ")];
        if editing {
            if self.saving {
                spans.push(Span::styled("[ ⏳ Menyimpan... ]", idle.add_modifier(Modifier::DIM)));
            } else {
                spans.push(Span::styled("[ 💾 Simpan Perubahan ]", primary));
            }
            spans.push(Span::raw("  "));
            spans.push(Span::styled("[ ✖ Batal ]", idle));
        } else {
            if self.deleting {
                spans.push(Span::styled("[ ✎ Edit Data ]", idle.add_modifier(Modifier::DIM)));
                spans.push(Span::raw("  "));
                spans.push(Span::styled("[ ⏳ Menghapus... ]", idle.add_modifier(Modifier::DIM)));
            } else {
                spans.push(Span::styled("[ ✎ Edit Data ]", primary));
                spans.push(Span::raw("  "));
                spans.push(Span::styled("[ 🗑 Hapus Pasien ]", danger));
            }
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }

    fn render_confirmation_dialog(&self, frame: &mut Frame, area: Rect, patient: &Patient) {
        let dialog_area = Self::centered_card(area, 60, 10);
        frame.render_widget(Clear, dialog_area);

        let dialog_block = Block::default()
            .title(" 🗑 Hapus Data Pasien? ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(230, 230, 250))
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(255, 100, 100)))
            .style(Style::default().bg(Color::Rgb(30, 30, 46)));

        frame.render_widget(dialog_block.clone(), dialog_area);

        let inner_area = dialog_block.inner(dialog_area);
        let content_layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner_area);

        let message = Paragraph::new(Line::from(vec![
            Span::raw("Tindakan ini akan menghapus semua data pasien "),
            Span::styled(
                patient.display_name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(
                " secara permanen. Data yang sudah dihapus tidak dapat dikembalikan.",
            ),
        ]))
        .style(Style::default().fg(Color::Rgb(220, 220, 240)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(message, content_layout[0]);

        let buttons_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(content_layout[1]);

        let yes_style = if self.confirmation_selected == 0 {
            Style::default()
                .fg(Color::Rgb(255, 100, 100))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(180, 180, 200))
        };
        let no_style = if self.confirmation_selected == 1 {
            Style::default()
                .fg(Color::Rgb(140, 219, 140))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(180, 180, 200))
        };

        let yes_text = if self.confirmation_selected == 0 {
            "► Ya, Hapus ◄"
        } else {
            "  Ya, Hapus  "
        };
        let no_text = if self.confirmation_selected == 1 {
            "► Batal ◄"
        } else {
            "  Batal  "
        };

        frame.render_widget(
            Paragraph::new(yes_text)
                .style(yes_style)
                .alignment(Alignment::Center),
            buttons_layout[0],
        );
        frame.render_widget(
            Paragraph::new(no_text)
                .style(no_style)
                .alignment(Alignment::Center),
            buttons_layout[1],
        );
    }
}
