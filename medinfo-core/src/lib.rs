//! Core library for inspecting media files with the MediaInfo shared library.
//!
//! This crate loads libmediainfo at runtime, drives it over a file path, a
//! URL or an open stream, and turns its XML report into tracks whose
//! attributes can be looked up by name.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use medinfo_core::{MediaInfo, ParseOptions};
//! use std::path::Path;
//!
//! let options = ParseOptions::builder().parse_speed(1.0).build().unwrap();
//! let info = MediaInfo::parse(Path::new("/path/to/video.mkv"), &options)
//!     .unwrap()
//!     .into_model()
//!     .unwrap();
//!
//! for track in info.video_tracks() {
//!     println!("{}: {:?}x{:?}", track, track.get_int("width"), track.get_int("height"));
//! }
//! ```

pub mod acquisition;
pub mod config;
pub mod error;
pub mod external;
pub mod media;
pub mod version;

// Re-exports for public API
pub use acquisition::{AcquisitionReport, MediaStream, Source, TextStream, acquire};
pub use config::{EncodingErrors, ParseOptions, ParseOptionsBuilder};
pub use error::{CoreError, CoreResult};
pub use external::{Binding, CandidateResolver, Platform};
pub use media::{AttributeValue, MediaInfo, ParseOutput, Track};
pub use version::{Capabilities, Feature, LibraryVersion};
