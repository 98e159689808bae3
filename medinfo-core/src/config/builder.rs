// ============================================================================
// medinfo-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for ParseOptions
//
// Fluent construction of ParseOptions. Every field starts at the default
// from the parent module; build() validates the result.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{EncodingErrors, ParseOptions};
use crate::error::CoreResult;

/// Builder for [`ParseOptions`].
///
/// # Examples
///
/// ```rust
/// use medinfo_core::config::ParseOptionsBuilder;
///
/// let options = ParseOptionsBuilder::new()
///     .cover_data(true)
///     .output("JSON")
///     .buffer_size(4096)
///     .build()
///     .unwrap();
/// assert_eq!(options.output.as_deref(), Some("JSON"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParseOptionsBuilder {
    options: ParseOptions,
}

impl ParseOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit library file, bypassing the candidate search.
    pub fn library_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.library_file = Some(path.into());
        self
    }

    pub fn cover_data(mut self, enabled: bool) -> Self {
        self.options.cover_data = enabled;
        self
    }

    pub fn parse_speed(mut self, speed: f64) -> Self {
        self.options.parse_speed = speed;
        self
    }

    pub fn full(mut self, enabled: bool) -> Self {
        self.options.full = enabled;
        self
    }

    pub fn legacy_stream_display(mut self, enabled: bool) -> Self {
        self.options.legacy_stream_display = enabled;
        self
    }

    /// Appends one extra library option. Order of calls is preserved.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options
            .extra_options
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Replaces the extra options with `options`, which may be empty.
    pub fn options<K, V>(mut self, options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.options.extra_options = Some(
            options
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Sets a custom Inform format; the parse result becomes raw text.
    pub fn output(mut self, format: impl Into<String>) -> Self {
        self.options.output = Some(format.into());
        self
    }

    pub fn buffer_size(mut self, bytes: usize) -> Self {
        self.options.buffer_size = bytes;
        self
    }

    pub fn encoding_errors(mut self, policy: EncodingErrors) -> Self {
        self.options.encoding_errors = policy;
        self
    }

    /// Validates and returns the options.
    pub fn build(self) -> CoreResult<ParseOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_option_order() {
        let options = ParseOptionsBuilder::new()
            .option("Language", "raw")
            .option("File_TestContinuousFileNames", "0")
            .build()
            .unwrap();
        assert_eq!(
            options.extra_options,
            Some(vec![
                ("Language".to_string(), "raw".to_string()),
                ("File_TestContinuousFileNames".to_string(), "0".to_string()),
            ])
        );
    }

    #[test]
    fn test_empty_option_set_is_still_supplied() {
        let options = ParseOptionsBuilder::new().build().unwrap();
        assert_eq!(options.extra_options, None);

        let options = ParseOptionsBuilder::new()
            .options(Vec::<(String, String)>::new())
            .build()
            .unwrap();
        assert_eq!(options.extra_options, Some(Vec::new()));
    }

    #[test]
    fn test_builder_validates() {
        assert!(ParseOptionsBuilder::new().parse_speed(-0.1).build().is_err());
        assert!(ParseOptionsBuilder::new().buffer_size(0).build().is_err());
        let options = ParseOptionsBuilder::new()
            .library_file("/opt/lib/libmediainfo.so.0")
            .encoding_errors(EncodingErrors::Replace)
            .build()
            .unwrap();
        assert_eq!(options.library_file, Some(PathBuf::from("/opt/lib/libmediainfo.so.0")));
        assert_eq!(options.encoding_errors, EncodingErrors::Replace);
    }
}
