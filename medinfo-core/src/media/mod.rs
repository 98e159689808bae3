//! Report model: tracks, the XML model builder and the [`MediaInfo`] entry point.
//!
//! The builder turns the library's XML report into [`Track`] records; the
//! [`MediaInfo`] type wraps them and drives acquisition when given a source.

pub mod builder;
pub mod info;
pub mod track;

// Re-export commonly used types
pub use builder::{RawTrack, disambiguate, normalize_name, parse_report};
pub use info::{MediaInfo, ParseOutput};
pub use track::{AttributeValue, Track, coerce_int};
