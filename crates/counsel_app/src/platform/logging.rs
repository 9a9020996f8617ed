//! Logger setup for the chat server: terminal plus `./counsel.log`.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./counsel.log";
const LEVEL_VAR: &str = "COUNSEL_LOG";

/// HTTP and HTML parsing crates that would otherwise drown out the turn log.
const QUIET_TARGETS: [&str; 6] = [
    "hyper",
    "hyper_util",
    "reqwest",
    "rustls",
    "html5ever",
    "selectors",
];

/// Where log records go. The file is truncated on every start.
pub struct LogDestination<'a> {
    pub terminal: bool,
    pub file: Option<&'a Path>,
}

impl Default for LogDestination<'static> {
    fn default() -> Self {
        Self {
            terminal: true,
            file: Some(Path::new(LOG_FILE)),
        }
    }
}

/// Installs the global logger. `COUNSEL_LOG` (e.g. `debug`) overrides the
/// default `info` level. Calling this twice leaves the first logger in place.
pub fn initialize(destination: LogDestination<'_>) {
    let level = level_from(std::env::var(LEVEL_VAR).ok().as_deref());
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if destination.terminal {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if let Some(path) = destination.file {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("Warning: Could not create log file at {:?}: {}", path, err),
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

fn level_from(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

fn build_config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error);
    for target in QUIET_TARGETS {
        builder.add_filter_ignore_str(target);
    }
    builder.build()
}
