mod api;
mod app;
mod components;
mod config;
mod db;
mod format;
mod models;
mod tui;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use app::{App, Route};
use config::Config;
use crossterm::terminal::{self, LeaveAlternateScreen};
use db::SqlitePatients;
use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tui::Tui;

fn main() -> Result<()> {
    let config = Config::load();
    init_logging(&config)?;

    let store = SqlitePatients::new(&config.db_path);
    store.init_db()?;
    tracing::info!(db = %store.path().display(), "database ready");
    if config.seed {
        let inserted = store.seed_demo()?;
        tracing::info!(inserted, "seeded demo patients");
    }

    let start = match config.patient_id {
        Some(id) => Route::PatientDetail(id),
        None => Route::PatientList { deleted: false },
    };

    let _guard = CleanupGuard;
    let mut tui = Tui::new()?;
    tui.enter()?;

    let mut app = App::new(Arc::new(store), start);
    let res = app.run(&mut tui);

    tui.exit()?;

    if let Err(e) = res {
        tracing::error!(error = %e, "application error");
        eprintln!("Application Error: {e}");
    }
    Ok(())
}

/// Sends log output to a file; stdout belongs to the terminal UI.
fn init_logging(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;

    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // Ignore errors during cleanup
        let _ = terminal::disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
    }
}
