//! Application state: the active screen and navigation between screens.

use crate::api::PatientsApi;
use crate::components::patients::{PatientDetail, PatientList};
use crate::components::Component;
use crate::tui::{self, Tui};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::fmt;
use std::sync::Arc;

/// Navigation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Patient master list. `deleted` carries the marker shown after a
    /// patient was removed from the detail screen.
    PatientList { deleted: bool },
    PatientDetail(String),
    Quit,
}

impl Route {
    /// Location string in the form the records web app uses.
    pub fn path(&self) -> String {
        match self {
            Route::PatientList { deleted: false } => "/master/pasien".to_string(),
            Route::PatientList { deleted: true } => "/master/pasien?deleted=1".to_string(),
            Route::PatientDetail(id) => format!("/master/pasien/{id}"),
            Route::Quit => "/quit".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub struct App {
    api: Arc<dyn PatientsApi>,
    route: Route,
    screen: Box<dyn Component>,
    pub should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn PatientsApi>, start: Route) -> Self {
        let screen = Self::screen_for(&api, &start);
        tracing::info!(route = %start, "starting");
        Self {
            api,
            should_quit: start == Route::Quit,
            route: start,
            screen,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    fn screen_for(api: &Arc<dyn PatientsApi>, route: &Route) -> Box<dyn Component> {
        match route {
            Route::PatientDetail(id) => Box::new(PatientDetail::new(Arc::clone(api), id.clone())),
            Route::PatientList { deleted } => Box::new(PatientList::new(Arc::clone(api), *deleted)),
            Route::Quit => Box::new(PatientList::new(Arc::clone(api), false)),
        }
    }

    /// Replaces the active screen. The old screen is dropped, so results of
    /// calls it still had running are discarded.
    pub fn navigate(&mut self, route: Route) {
        tracing::info!(from = %self.route, to = %route, "navigate");
        if route == Route::Quit {
            self.should_quit = true;
            self.route = route;
            return;
        }
        self.screen = Self::screen_for(&self.api, &route);
        self.route = route;
    }

    /// Runs the draw/input loop until a screen asks to quit.
    pub fn run(&mut self, tui: &mut Tui) -> Result<()> {
        while !self.should_quit {
            tui.draw(|frame| self.screen.render(frame))?;
            let event = tui.next_event()?;
            self.handle_event(event)?;
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: tui::Event) -> Result<()> {
        let next = match event {
            tui::Event::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key)?
            }
            tui::Event::Input(_) => None,
            tui::Event::Tick => self.screen.on_tick(),
        };
        if let Some(route) = next {
            self.navigate(route);
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<Route>> {
        // Global keybinding: Ctrl+Q to quit
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Route::Quit));
        }
        self.screen.handle_input(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MemoryPatients;
    use crate::models::Patient;
    use crate::test_support::{key, screen_text};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::{Duration, Instant};

    fn api() -> Arc<MemoryPatients> {
        Arc::new(MemoryPatients::with([Patient {
            id: Some("1".to_string()),
            name: Some("Budi Santoso".to_string()),
            ..Default::default()
        }]))
    }

    /// Ticks until the route changes or `done` holds.
    fn tick_until(app: &mut App, done: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(app) {
            assert!(Instant::now() < deadline, "timed out waiting on {}", app.route());
            app.handle_event(tui::Event::Tick).unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 36)).unwrap();
        terminal.draw(|frame| app.screen.render(frame)).unwrap();
        screen_text(terminal.backend().buffer())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(tui::Event::Input(Event::Key(key(code)))).unwrap();
    }

    #[test]
    fn paths() {
        assert_eq!(Route::PatientList { deleted: false }.path(), "/master/pasien");
        assert_eq!(
            Route::PatientList { deleted: true }.to_string(),
            "/master/pasien?deleted=1"
        );
        assert_eq!(Route::PatientDetail("42".into()).path(), "/master/pasien/42");
    }

    #[test]
    fn list_to_detail_to_deleted_list() {
        let api = api();
        let mut app = App::new(api.clone(), Route::PatientList { deleted: false });

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.route(), &Route::PatientDetail("1".to_string()));

        // 'd' opens the dialog once the record is shown; 'y' confirms.
        let deadline = Instant::now() + Duration::from_secs(5);
        while *api.delete_calls.lock().unwrap() == 0 {
            assert!(Instant::now() < deadline, "record never loaded");
            app.handle_event(tui::Event::Tick).unwrap();
            press(&mut app, KeyCode::Char('d'));
            press(&mut app, KeyCode::Char('y'));
            std::thread::sleep(Duration::from_millis(5));
        }

        tick_until(&mut app, |app| app.route() != &Route::PatientDetail("1".to_string()));
        assert_eq!(app.route(), &Route::PatientList { deleted: true });
        assert_eq!(*api.delete_calls.lock().unwrap(), 1);
    }

    #[test]
    fn leaving_detail_discards_its_pending_delete() {
        let api = api();
        let mut app = App::new(api.clone(), Route::PatientDetail("1".to_string()));
        tick_until(&mut app, |app| screen(app).contains("DETAIL PASIEN"));

        // No tick between confirming and leaving, so the outcome is never applied.
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.route(), &Route::PatientList { deleted: false });

        tick_until(&mut app, |_| api.records.lock().unwrap().is_empty());
        for _ in 0..5 {
            app.handle_event(tui::Event::Tick).unwrap();
        }
        assert_eq!(app.route(), &Route::PatientList { deleted: false });
        assert_eq!(*api.delete_calls.lock().unwrap(), 1);
    }

    #[test]
    fn back_from_detail_returns_plain_list() {
        let mut app = App::new(api(), Route::PatientDetail("1".to_string()));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.route(), &Route::PatientList { deleted: false });
    }

    #[test]
    fn ctrl_q_quits_from_any_screen() {
        let mut app = App::new(api(), Route::PatientDetail("1".to_string()));
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        app.handle_event(tui::Event::Input(Event::Key(ctrl_q))).unwrap();
        assert!(app.should_quit);
    }
}
