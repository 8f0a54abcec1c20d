//! Tracing setup
//!
//! `-v` turns on the wrapkit crates' own events (`-vv` debug, `-vvv` trace).
//! `WRAPKIT_LOG` (or `RUST_LOG`) takes a full filter and wins over `-v`:
//!
//! ```bash
//! wrapkit -vv plan --hierarchy hierarchy/ classes/*.json
//! WRAPKIT_LOG="wrapkit_hierarchy=trace" wrapkit --log-format json isa ...
//! ```
//!
//! Events go to stderr; stdout carries only JSON results.

use clap::ValueEnum;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Crates whose events `-v` enables
const TARGETS: [&str; 4] = ["wrapkit", "wrapkit_hierarchy", "wrapkit_properties", "wrapkit_overload"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Filter directives for a `-v` count; `None` leaves logging off
fn verbosity_directives(verbose: u8) -> Option<String> {
    let level = match verbose {
        0 => return None,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let directives: Vec<String> = TARGETS.iter().map(|t| format!("{t}={level}")).collect();
    Some(directives.join(","))
}

fn env_directives() -> Option<String> {
    std::env::var("WRAPKIT_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
}

pub fn init_tracing(verbose: u8, format: Option<LogFormat>) {
    let Some(directives) = env_directives().or_else(|| verbosity_directives(verbose)) else {
        return;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    let format = format.unwrap_or_else(|| {
        match std::env::var("WRAPKIT_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    });
    let layer = fmt::layer().with_writer(std::io::stderr);
    match format {
        LogFormat::Json => Registry::default().with(filter).with(layer.json()).init(),
        LogFormat::Text => Registry::default().with(filter).with(layer).init(),
    }
}
