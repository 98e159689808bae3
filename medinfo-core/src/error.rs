// ============================================================================
// medinfo-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for medinfo-core
//
// This module defines the error type shared by every component of the crate:
// library loading, source acquisition, report decoding and XML parsing.
//
// KEY COMPONENTS:
// - CoreError: Enum of all failures surfaced to callers
// - CoreResult: Type alias for Result with CoreError
// - Conversion from roxmltree errors, keeping the line/column position

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the binding, the acquisition engine and the model builder.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No candidate library could be loaded or none reported a usable version.
    #[error("Failed to load library from {} - {}", join_paths(.paths), .errors.join(", "))]
    LibraryLoad {
        /// Every path that was attempted, in order.
        paths: Vec<PathBuf>,
        /// One message per failed candidate.
        errors: Vec<String>,
    },

    /// A local path does not exist and does not look like a URL.
    #[error("No such file or directory: {0}")]
    NotFound(String),

    /// The native library refused to open the source.
    #[error("An error occurred while opening {0} with libmediainfo")]
    OpenFailed(String),

    /// A stream source was not in binary mode.
    #[error("File should be opened in binary mode")]
    BinaryModeRequired,

    /// The report is not well-formed XML.
    #[error("XML parse error at line {line}, column {column}: {message}")]
    XmlParse {
        message: String,
        line: u32,
        column: u32,
    },

    /// A wide string returned by the library could not be decoded.
    #[error("Failed to decode library output: {0}")]
    Decode(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// True for the missing-file case of the path acquisition mode.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }

    /// True when no library candidate could be used.
    pub fn is_load_error(&self) -> bool {
        matches!(self, CoreError::LibraryLoad { .. })
    }
}

impl From<roxmltree::Error> for CoreError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        CoreError::XmlParse {
            message: err.to_string(),
            line: pos.row,
            column: pos.col,
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for medinfo-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_load_message_lists_paths_and_errors() {
        let err = CoreError::LibraryLoad {
            paths: vec![PathBuf::from("/a/libmediainfo.so.0"), PathBuf::from("libmediainfo.so.0")],
            errors: vec!["first".to_string(), "second".to_string()],
        };
        let message = err.to_string();
        assert!(message.starts_with("Failed to load library from /a/libmediainfo.so.0, libmediainfo.so.0"));
        assert!(message.ends_with("first, second"));
        assert!(err.is_load_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_xml_error_keeps_position() {
        let err: CoreError = roxmltree::Document::parse("<File>\n<track></File>")
            .map(|_| ())
            .unwrap_err()
            .into();
        match err {
            CoreError::XmlParse { line, .. } => assert_eq!(line, 2),
            other => panic!("Unexpected error type: {:?}", other),
        }
    }
}
