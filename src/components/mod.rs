use crate::app::Route;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::KeyEvent;

pub mod patients;

pub trait Component {
    /// Handles one key press. `Some(route)` asks the app to navigate away.
    fn handle_input(&mut self, event: KeyEvent) -> Result<Option<Route>>;
    fn render(&self, frame: &mut Frame);
    /// Called when no input arrived during a frame; used to pick up finished
    /// background calls and expire messages.
    fn on_tick(&mut self) -> Option<Route> {
        None
    }
}
