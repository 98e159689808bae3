// ============================================================================
// medinfo-core/src/acquisition/mod.rs
// ============================================================================
//
// ACQUISITION ENGINE: From a Source to the Library's Report Text
//
// Drives one analysis through its lifecycle: open a session, apply the
// option plan, hand the source to the library (by location or through the
// buffer protocol), render the report, reset custom options, and release
// the handle. The session is dropped on every exit path, which closes and
// deletes the handle.
//
// KEY COMPONENTS:
// - Source / MediaStream: What can be analyzed (source.rs)
// - configuration_plan: Ordered option calls per library version (plan.rs)
// - feed_stream: Chunked feed-and-seek loop (stream.rs)
// - acquire: The full lifecycle, returning an AcquisitionReport

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

// ---- Internal crate imports ----
use crate::config::ParseOptions;
use crate::error::{CoreError, CoreResult};
use crate::external::{Binding, Session};
use crate::version::LibraryVersion;

// ============================================================================
// SUBMODULES
// ============================================================================

pub mod plan;
pub mod source;
pub mod stream;

pub use plan::{OptionCall, RESET_OPTION, compatibility_warning, configuration_plan, needs_reset};
pub use source::{MediaStream, Source, TextStream, looks_like_url};
pub use stream::{FeedEnd, FeedSummary, feed_stream};

// ============================================================================
// REPORT
// ============================================================================

/// Outcome of one acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionReport {
    /// Report text in the format selected by the `Inform` option.
    pub text: String,
    /// Library file that produced the report.
    pub library_path: PathBuf,
    /// Version text reported by the library.
    pub version_string: String,
    pub version: LibraryVersion,
    /// Non-fatal advisories raised during the analysis.
    pub warnings: Vec<String>,
}

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Runs one analysis of `source` and returns the raw report.
///
/// # Errors
///
/// - [`CoreError::InvalidConfig`] for out-of-range options
/// - [`CoreError::BinaryModeRequired`] for text streams, before any library call
/// - [`CoreError::LibraryLoad`] when no library could be used
/// - [`CoreError::NotFound`] / [`CoreError::OpenFailed`] when the library
///   refuses a path or URL
/// - [`CoreError::Io`] when reading or seeking a stream fails
/// - [`CoreError::Decode`] when the report is not valid for the selected policy
pub fn acquire(
    binding: &Binding,
    source: Source<'_>,
    options: &ParseOptions,
) -> CoreResult<AcquisitionReport> {
    options.validate()?;

    if let Source::Stream(stream) = &source {
        if !stream.is_binary() {
            return Err(CoreError::BinaryModeRequired);
        }
    }

    let session = binding.open_session(options.library_file.as_deref())?;
    let capabilities = session.capabilities();

    let mut warnings = Vec::new();
    if let Some(warning) = compatibility_warning(session.version_string(), &capabilities, options)
    {
        log::warn!("{}", warning);
        warnings.push(warning);
    }

    let description = source.describe();
    log::debug!("Analyzing {}", description);

    let outcome = run(&session, source, options);

    if needs_reset(&capabilities, options) {
        log::debug!("Resetting custom options");
        let reset = session.set_option(RESET_OPTION, "");
        // An analysis error takes precedence over a failed reset.
        if outcome.is_ok() {
            reset?;
        }
    }

    let text = outcome?;
    Ok(AcquisitionReport {
        text,
        library_path: session.library_path().to_path_buf(),
        version_string: session.version_string().to_string(),
        version: session.version().clone(),
        warnings,
    })
}

fn run(session: &Session, source: Source<'_>, options: &ParseOptions) -> CoreResult<String> {
    for call in configuration_plan(&session.capabilities(), options) {
        session.set_option(&call.key, &call.value)?;
    }

    match source {
        Source::Path(path) => open_location(session, &path.to_string_lossy())?,
        Source::Url(url) => open_location(session, &url)?,
        Source::Stream(stream) => {
            feed_stream(session, stream, options.buffer_size)?;
        }
    }

    session.inform(options.encoding_errors)
}

fn open_location(session: &Session, location: &str) -> CoreResult<()> {
    if session.open(location) != 0 {
        return Ok(());
    }
    if !looks_like_url(location) && !Path::new(location).exists() {
        return Err(CoreError::NotFound(location.to_string()));
    }
    Err(CoreError::OpenFailed(location.to_string()))
}
