// ============================================================================
// medinfo-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result Type for Commands
//
// Commands return the core error type directly; main prints it and exits
// with status 1.

// ---- Internal crate imports ----
use medinfo_core::CoreError;

// ---- Standard library imports ----
use std::io;
use std::path::Path;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = medinfo_core::CoreResult<T>;

/// Maps a failure to open `path` onto the core error taxonomy.
///
/// A missing file becomes [`CoreError::NotFound`] so the message names it.
pub fn open_error(path: &Path, err: io::Error) -> CoreError {
    if err.kind() == io::ErrorKind::NotFound {
        CoreError::NotFound(path.display().to_string())
    } else {
        CoreError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error() {
        let missing = open_error(
            Path::new("/nope.mkv"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(missing.to_string(), "No such file or directory: /nope.mkv");

        let denied = open_error(
            Path::new("/root.mkv"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(denied, CoreError::Io(_)));
    }
}
