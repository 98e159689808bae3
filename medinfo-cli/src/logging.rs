// ============================================================================
// medinfo-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger Setup for the CLI
//
// The core library logs through the `log` facade; this module installs the
// env_logger backend with a compact colored format on stderr.
//
// USAGE:
// - default: info and above
// - --verbose: debug and above
// - RUST_LOG=...: overrides both (e.g. RUST_LOG=medinfo_core=trace)

use log::LevelFilter;
use owo_colors::OwoColorize;
use std::io::Write;

/// Level used when RUST_LOG is not set.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes the global logger. Call once, before any command runs.
pub fn init(verbose: bool) {
    let level = level_for(verbose);
    env_logger::Builder::new()
        .format(|buf, record| {
            let level_str = match record.level() {
                log::Level::Error => "ERROR",
                log::Level::Warn => "WARN ",
                log::Level::Info => "INFO ",
                log::Level::Debug => "DEBUG",
                log::Level::Trace => "TRACE",
            };
            let level_colored = match record.level() {
                log::Level::Error => level_str.bright_red().to_string(),
                log::Level::Warn => level_str.yellow().to_string(),
                log::Level::Info => level_str.green().to_string(),
                log::Level::Debug => level_str.blue().to_string(),
                log::Level::Trace => level_str.magenta().to_string(),
            };
            writeln!(buf, "{} {}", level_colored, record.args())
        })
        .filter(None, level)
        .parse_default_env()
        .init();

    log::debug!("Logger initialized with level: {}", level);
}
