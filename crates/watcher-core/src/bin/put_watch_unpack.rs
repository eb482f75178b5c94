//! `put-watch-unpack`: decode put watch wire bytes (stdin) into a JSON
//! request descriptor (stdout).
//!
//! Usage:
//!   put-watch-unpack [--pretty]

use std::io::{self, Read, Write};
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;
use watcher_core::cli::unpack;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let pretty = std::env::args().skip(1).any(|a| a == "--pretty");

    let mut buf = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut buf) {
        error!("failed to read stdin: {e}");
        eprintln!("{e}");
        return ExitCode::from(1);
    }

    match unpack(&buf, pretty) {
        Ok(json) => {
            let mut stdout = io::stdout();
            if let Err(e) = writeln!(stdout, "{json}") {
                eprintln!("{e}");
                return ExitCode::from(1);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}
