//! Implementation of the 'info' subcommand.
//!
//! Analyzes each file in turn and prints either the raw report of a custom
//! output format, the flattened model as JSON, or a short summary per track.

use crate::cli::InfoArgs;
use crate::error::{CliResult, open_error};
use crate::output::{print_heading, print_info, print_section};

use medinfo_core::media::AttributeValue;
use medinfo_core::{Binding, MediaInfo, ParseOptions, ParseOutput, Source, Track};

use std::fs::File;
use std::path::Path;

use log::{debug, warn};

/// Runs the info command over every file on the command line.
pub fn run_info(args: &InfoArgs) -> CliResult<()> {
    let options = args.parse_options()?;
    let binding = Binding::system();

    for (index, path) in args.files.iter().enumerate() {
        if index != 0 && !args.json {
            println!();
        }
        debug!("Processing {}", path.display());

        match parse_file(&binding, path, args.stream, &options)? {
            ParseOutput::Text(text) => println!("{}", text.trim_end()),
            ParseOutput::Model(info) if args.json => {
                println!("{}", serde_json::to_string_pretty(&info.to_data()?)?);
            }
            ParseOutput::Model(info) => print_summary(path, &info),
        }
    }
    Ok(())
}

fn parse_file(
    binding: &Binding,
    path: &Path,
    stream: bool,
    options: &ParseOptions,
) -> CliResult<ParseOutput> {
    if stream {
        let mut file = File::open(path).map_err(|e| open_error(path, e))?;
        MediaInfo::parse_with(binding, Source::stream(&mut file), options)
    } else {
        MediaInfo::parse_with(binding, path, options)
    }
}

fn display(value: Option<&AttributeValue>) -> String {
    value.map_or_else(|| "unknown".to_string(), ToString::to_string)
}

/// Duration in seconds; the report gives milliseconds, possibly fractional.
fn duration_seconds(track: &Track) -> Option<f64> {
    track
        .get_int("duration")
        .map(|ms| ms as f64)
        .or_else(|| track.get_str("duration")?.trim().parse::<f64>().ok())
        .map(|ms| ms / 1000.0)
}

fn print_summary(path: &Path, info: &MediaInfo) {
    print_heading(&format!("Processing {}", path.display()));

    if info.tracks.is_empty() {
        warn!("No tracks reported for {}", path.display());
        return;
    }

    for track in &info.tracks {
        match track.kind() {
            "General" => {
                print_info("The file format is", display(track.get("format")));
                print_section("General information dump");
                for (name, value) in track.attributes() {
                    print_info(name, value);
                }
            }
            "Video" => print_info(
                &format!("Video track {}", display(track.track_id())),
                format!(
                    "resolution {}×{}, bit rate {} bits/s",
                    display(track.get("width")),
                    display(track.get("height")),
                    display(track.get("bit_rate"))
                ),
            ),
            "Audio" => {
                if let Some(seconds) = duration_seconds(track) {
                    print_info(
                        &format!("Audio track {}", display(track.track_id())),
                        format!("duration {} seconds", seconds),
                    );
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with(name: &str, value: AttributeValue) -> Track {
        Track::new("Audio", [(name.to_string(), value)].into_iter().collect())
    }

    #[test]
    fn test_duration_seconds() {
        assert_eq!(duration_seconds(&track_with("duration", 4000.into())), Some(4.0));
        assert_eq!(
            duration_seconds(&track_with("duration", "1500.000".into())),
            Some(1.5)
        );
        assert_eq!(duration_seconds(&track_with("duration", "4 s".into())), None);
        assert_eq!(duration_seconds(&track_with("format", "AAC".into())), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(display(None), "unknown");
        assert_eq!(display(Some(&AttributeValue::Integer(1920))), "1920");
    }
}
