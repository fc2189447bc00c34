//! `docmig-resolve`: resolve one document change and show what it would do.
//!
//! Usage:
//!   docmig-resolve [--color] < change.json
//!
//! The change is read from stdin as
//! `{"path", "before", "patch", "command", "instruction"}`. Nothing is
//! written to any database. Set `RUST_LOG=debug` to trace the resolution
//! steps on stderr.

use std::io::{self, Read, Write};

use docmig::cli::resolve_json;
use docmig::PresentOptions;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let options = PresentOptions {
        color: std::env::args().skip(1).any(|a| a == "--color"),
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match resolve_json(buf.trim(), &options) {
        Ok(report) => {
            if let Err(e) = io::stdout().write_all(report.text.as_bytes()) {
                eprintln!("{e}");
                std::process::exit(1);
            }
            if !report.resolved {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
