// medinfo-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use medinfo_core::config::{DEFAULT_BUFFER_SIZE, DEFAULT_PARSE_SPEED, LIBRARY_FILE_ENV};
use medinfo_core::{CoreResult, ParseOptions};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Medinfo: Media file inspection tool",
    long_about = "Prints the tracks reported by the MediaInfo library via medinfo-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG overrides this).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prints track information for one or more media files
    Info(InfoArgs),
    /// Checks whether the MediaInfo library can be loaded
    Probe(ProbeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LibraryArgs {
    /// MediaInfo library file to load instead of searching for one.
    #[arg(long, value_name = "LIBRARY_FILE", env = LIBRARY_FILE_ENV)]
    pub library: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub library: LibraryArgs,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Media files to inspect
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub library: LibraryArgs,

    /// Custom Inform format; prints the raw report instead of the track summary
    #[arg(long, value_name = "FORMAT", conflicts_with = "json")]
    pub output: Option<String>,

    /// Print the flattened model as JSON
    #[arg(long)]
    pub json: bool,

    /// Feed the file through the buffer protocol instead of opening it by path
    #[arg(long)]
    pub stream: bool,

    /// Extract cover art as base64 (MediaInfo 18.03 and later)
    #[arg(long)]
    pub cover_data: bool,

    /// Parse speed between 0 (fastest) and 1 (most precise)
    #[arg(long, value_name = "SPEED", default_value_t = DEFAULT_PARSE_SPEED)]
    pub parse_speed: f64,

    /// Request the short report instead of the complete one
    #[arg(long, default_value_t = false)]
    pub no_full: bool,

    /// Enable the LegacyStreamDisplay option
    #[arg(long)]
    pub legacy_stream_display: bool,

    /// Extra library option as KEY=VALUE; may be repeated, applied in order
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,

    /// Chunk size in bytes used with --stream
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,
}

impl InfoArgs {
    /// Builds the core parse options from the command line.
    pub fn parse_options(&self) -> CoreResult<ParseOptions> {
        let mut builder = ParseOptions::builder()
            .cover_data(self.cover_data)
            .parse_speed(self.parse_speed)
            .full(!self.no_full)
            .legacy_stream_display(self.legacy_stream_display)
            .buffer_size(self.buffer_size);
        if let Some(path) = &self.library.library {
            builder = builder.library_file(path);
        }
        if let Some(format) = &self.output {
            builder = builder.output(format);
        }
        for (key, value) in &self.options {
            builder = builder.option(key, value);
        }
        builder.build()
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
