//! Terminal entry point for the outline editor.
//!
//! # Responsibility
//! - Parse CLI arguments and initialize logging.
//! - Open the outline file and hand the session to the event loop.
//!
//! # See also
//! - app.rs for key dispatch, render.rs for drawing.

mod app;
mod keymap;
mod render;
mod terminal;
mod text_input;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use outline_core::{default_log_dir, default_log_level, init_logging, JsonFileRepository, Session};

const DEFAULT_FILE: &str = "out.json";

#[derive(Debug, Parser)]
#[command(name = "outline", version, about = "Terminal outline editor")]
struct Cli {
    /// Outline file to open and save.
    #[arg(default_value = DEFAULT_FILE)]
    file: PathBuf,

    /// Log level: trace, debug, info, warn, or error.
    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,

    /// Directory for rolling log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.unwrap_or_else(default_log_dir);
    if let Err(err) = init_logging(&cli.log_level, &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut session = Session::open(JsonFileRepository::new(), cli.file);
    match app::run(&mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=terminal_run module=cli status=error error={err}");
            eprintln!("outline: terminal error: {err}");
            ExitCode::from(1)
        }
    }
}
