//! Configuration structures and constants for a single analysis.
//!
//! This module provides [`ParseOptions`], the set of knobs applied to a
//! library handle before a source is analyzed, together with its builder.

mod builder;

use std::path::PathBuf;

pub use builder::ParseOptionsBuilder;

use crate::error::{CoreError, CoreResult};

// Default constants

/// Default `ParseSpeed` passed to the library (0 = fastest, 1 = most precise).
pub const DEFAULT_PARSE_SPEED: f64 = 0.5;

/// Default size of each chunk read from a stream source, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Environment variable naming an explicit library file.
pub const LIBRARY_FILE_ENV: &str = "MEDINFO_LIBRARY";

/// Environment variable naming a directory searched before the system paths.
pub const LIBRARY_DIR_ENV: &str = "MEDINFO_LIBRARY_DIR";

/// How invalid code units in the library's wide-string output are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingErrors {
    /// Fail with [`CoreError::Decode`].
    #[default]
    Strict,
    /// Substitute U+FFFD.
    Replace,
}

/// Options for one call to [`crate::MediaInfo::parse`].
///
/// # Examples
///
/// ```rust
/// use medinfo_core::config::ParseOptions;
///
/// let options = ParseOptions::builder()
///     .parse_speed(1.0)
///     .full(false)
///     .option("Language", "raw")
///     .build()
///     .unwrap();
/// assert_eq!(options.extra_options.map(|o| o.len()), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Explicit library file; the candidate search is skipped when set.
    pub library_file: Option<PathBuf>,

    /// Extract cover art as base64 (libraries from 18.03 on).
    pub cover_data: bool,

    /// Passed to the library as `ParseSpeed`.
    pub parse_speed: f64,

    /// Request the complete report (`Complete` option), including
    /// machine-readable sizes and durations.
    pub full: bool,

    /// Passed to the library as `LegacyStreamDisplay`.
    pub legacy_stream_display: bool,

    /// Additional `MediaInfo_Option` calls, applied verbatim in order.
    /// `Some` counts as supplied even when empty.
    pub extra_options: Option<Vec<(String, String)>>,

    /// Custom Inform format. When set, the raw report text is returned
    /// instead of a parsed model.
    pub output: Option<String>,

    /// Chunk size for stream sources.
    pub buffer_size: usize,

    /// Decoding policy for the report text.
    pub encoding_errors: EncodingErrors,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            library_file: None,
            cover_data: false,
            parse_speed: DEFAULT_PARSE_SPEED,
            full: true,
            legacy_stream_display: false,
            extra_options: None,
            output: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            encoding_errors: EncodingErrors::Strict,
        }
    }
}

impl ParseOptions {
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }

    /// Checks value ranges that the library would otherwise silently accept.
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.parse_speed) {
            return Err(CoreError::InvalidConfig(format!(
                "parse_speed must be between 0 and 1, got {}",
                self.parse_speed
            )));
        }
        if self.buffer_size == 0 {
            return Err(CoreError::InvalidConfig(
                "buffer_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// True when a structured model should be built from the report.
    pub fn wants_model(&self) -> bool {
        self.output.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.parse_speed, 0.5);
        assert_eq!(options.buffer_size, 65536);
        assert!(options.full);
        assert!(!options.cover_data);
        assert!(!options.legacy_stream_display);
        assert!(options.wants_model());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let options = ParseOptions {
            parse_speed: 1.5,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(CoreError::InvalidConfig(_))));

        let options = ParseOptions {
            parse_speed: f64::NAN,
            ..Default::default()
        };
        assert!(options.validate().is_err());

        let options = ParseOptions {
            buffer_size: 0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}
