//! Runtime configuration.
//!
//! Values come from the command line first, then the environment (a `.env`
//! file is loaded if present), then the defaults below.

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "klinik.db";
pub const DEFAULT_LOG_FILE: &str = "klinik.log";
pub const DEFAULT_LOG_FILTER: &str = "klinik=info";

/// Terminal front desk for clinic patient records.
#[derive(Parser, Debug, Clone)]
#[command(name = "klinik", version, about, long_about = None)]
pub struct Config {
    /// Open the detail screen of this patient instead of the list.
    #[arg(value_name = "PATIENT_ID")]
    pub patient_id: Option<String>,

    /// SQLite database holding the patient records.
    #[arg(long, env = "KLINIK_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// File receiving log output. The terminal itself is owned by the UI.
    #[arg(long, env = "KLINIK_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log filter directives, `RUST_LOG` syntax.
    #[arg(long, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Insert demonstration patients when the database is empty.
    #[arg(long)]
    pub seed: bool,
}

impl Config {
    /// Loads `.env` and parses the process arguments.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}
