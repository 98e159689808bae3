// ============================================================================
// medinfo-core/src/media/info.rs
// ============================================================================
//
// MEDIA INFO: The Result Model and the Entry Point
//
// MediaInfo holds the tracks of one report in document order. It is built
// either directly from report XML or by running an acquisition, in which
// case a custom output format yields the raw text instead.

// ---- External crate imports ----
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---- Standard library imports ----
use std::path::Path;

// ---- Internal crate imports ----
use super::builder::parse_report;
use super::track::Track;
use crate::acquisition::{self, Source};
use crate::config::ParseOptions;
use crate::error::CoreResult;
use crate::external::Binding;

/// What [`MediaInfo::parse`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutput {
    /// Structured model from the default XML report.
    Model(MediaInfo),
    /// Raw text for a custom output format.
    Text(String),
}

impl ParseOutput {
    pub fn into_model(self) -> Option<MediaInfo> {
        match self {
            ParseOutput::Model(info) => Some(info),
            ParseOutput::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            ParseOutput::Text(text) => Some(text),
            ParseOutput::Model(_) => None,
        }
    }
}

/// Information about a media source: an ordered list of tracks.
///
/// # Examples
///
/// ```rust
/// use medinfo_core::MediaInfo;
///
/// let xml = r#"<File>
///   <track type="General"><Duration>1000</Duration><Duration>1 s</Duration></track>
///   <track type="Audio"><Format>AAC</Format></track>
/// </File>"#;
/// let info = MediaInfo::from_xml(xml).unwrap();
/// assert_eq!(info.general_tracks()[0].get_int("duration"), Some(1000));
/// assert_eq!(info.audio_tracks()[0].get_str("format"), Some("AAC"));
/// assert!(info.video_tracks().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaInfo {
    pub tracks: Vec<Track>,
}

impl MediaInfo {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Builds the model from a complete XML report.
    pub fn from_xml(xml: &str) -> CoreResult<Self> {
        Ok(Self::new(parse_report(xml)?))
    }

    /// Analyzes `source` with the system library.
    ///
    /// Returns [`ParseOutput::Text`] when `options.output` is set, the
    /// parsed model otherwise.
    pub fn parse<'a>(source: impl Into<Source<'a>>, options: &ParseOptions) -> CoreResult<ParseOutput> {
        Self::parse_with(&Binding::system(), source, options)
    }

    /// Like [`MediaInfo::parse`] with an explicit binding.
    pub fn parse_with<'a>(
        binding: &Binding,
        source: impl Into<Source<'a>>,
        options: &ParseOptions,
    ) -> CoreResult<ParseOutput> {
        let report = acquisition::acquire(binding, source.into(), options)?;
        if options.wants_model() {
            Ok(ParseOutput::Model(Self::from_xml(&report.text)?))
        } else {
            Ok(ParseOutput::Text(report.text))
        }
    }

    /// Whether the system library (or `library_file`) can be loaded.
    pub fn can_parse(library_file: Option<&Path>) -> bool {
        Binding::system().can_parse(library_file)
    }

    /// Tracks whose kind equals `kind`, in document order.
    pub fn tracks_of(&self, kind: &str) -> Vec<&Track> {
        self.tracks.iter().filter(|track| track.kind() == kind).collect()
    }

    pub fn general_tracks(&self) -> Vec<&Track> {
        self.tracks_of("General")
    }

    pub fn video_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Video")
    }

    pub fn audio_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Audio")
    }

    pub fn text_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Text")
    }

    pub fn other_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Other")
    }

    pub fn image_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Image")
    }

    pub fn menu_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Menu")
    }

    /// `{"tracks": [...]}` with every track flattened.
    pub fn to_data(&self) -> CoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_data(data: Value) -> CoreResult<Self> {
        Ok(serde_json::from_value(data)?)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
