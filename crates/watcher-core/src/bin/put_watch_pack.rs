//! `put-watch-pack`: encode a JSON request descriptor (stdin) into put watch
//! wire bytes (stdout).
//!
//! Usage:
//!   put-watch-pack [--skip-validation]
//!
//! Set `RUST_LOG=debug` to trace the encoding.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;
use watcher_core::cli::pack;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let skip_validation = std::env::args().skip(1).any(|a| a == "--skip-validation");

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        error!("failed to read stdin: {e}");
        eprintln!("{e}");
        return ExitCode::from(1);
    }

    match pack(buf.trim(), skip_validation) {
        Ok(bytes) => {
            if let Err(e) = io::stdout().write_all(&bytes) {
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
