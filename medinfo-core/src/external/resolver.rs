// ============================================================================
// medinfo-core/src/external/resolver.rs
// ============================================================================
//
// LIBRARY RESOLUTION: Candidate Files for the MediaInfo Shared Library
//
// Produces the ordered list of library files to try. Each platform has its
// own file names; a library found in the colocated directory replaces the
// whole list, otherwise the bare names are handed to the system loader so
// the usual search paths apply.

// ---- Standard library imports ----
use std::env;
use std::path::PathBuf;

// ---- Internal crate imports ----
use crate::config::LIBRARY_DIR_ENV;

/// Platform families with distinct library file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }

    /// Library file names, most specific first.
    pub fn library_names(self) -> &'static [&'static str] {
        match self {
            Platform::Windows => &["MediaInfo.dll"],
            Platform::MacOs => &["libmediainfo.0.dylib", "libmediainfo.dylib"],
            Platform::Unix => &["libmediainfo.so.0"],
        }
    }
}

/// Resolves the candidate library files for a platform.
///
/// # Examples
///
/// ```rust
/// use medinfo_core::external::{CandidateResolver, Platform};
/// use std::path::PathBuf;
///
/// let resolver = CandidateResolver::new(Platform::MacOs, None);
/// assert_eq!(
///     resolver.candidates(),
///     vec![PathBuf::from("libmediainfo.0.dylib"), PathBuf::from("libmediainfo.dylib")]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateResolver {
    platform: Platform,
    colocated_dir: Option<PathBuf>,
}

impl CandidateResolver {
    pub fn new(platform: Platform, colocated_dir: Option<PathBuf>) -> Self {
        Self {
            platform,
            colocated_dir,
        }
    }

    /// Resolver for the current platform.
    ///
    /// The colocated directory is `MEDINFO_LIBRARY_DIR` when set, otherwise
    /// the directory containing the running executable.
    pub fn from_env() -> Self {
        let colocated_dir = env::var_os(LIBRARY_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                env::current_exe()
                    .ok()
                    .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
            });
        Self::new(Platform::current(), colocated_dir)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn colocated_dir(&self) -> Option<&PathBuf> {
        self.colocated_dir.as_ref()
    }

    /// Ordered candidate files.
    ///
    /// The first library name present as a file in the colocated directory
    /// is returned alone; otherwise every bare name is returned.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let names = self.platform.library_names();
        if let Some(dir) = &self.colocated_dir {
            for name in names {
                let colocated = dir.join(name);
                if colocated.is_file() {
                    log::debug!("Using colocated library {}", colocated.display());
                    return vec![colocated];
                }
            }
        }
        names.iter().map(PathBuf::from).collect()
    }
}

impl Default for CandidateResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::Windows.library_names(), &["MediaInfo.dll"]);
        assert_eq!(Platform::Unix.library_names(), &["libmediainfo.so.0"]);
        assert_eq!(Platform::MacOs.library_names().len(), 2);
    }

    #[test]
    fn test_candidates_without_colocated_library() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = CandidateResolver::new(Platform::Unix, Some(dir.path().to_path_buf()));
        assert_eq!(resolver.candidates(), vec![PathBuf::from("libmediainfo.so.0")]);
    }

    #[test]
    fn test_colocated_library_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("libmediainfo.dylib")).unwrap();
        let resolver = CandidateResolver::new(Platform::MacOs, Some(dir.path().to_path_buf()));
        assert_eq!(
            resolver.candidates(),
            vec![dir.path().join("libmediainfo.dylib")]
        );

        // The more specific name wins when both exist.
        File::create(dir.path().join("libmediainfo.0.dylib")).unwrap();
        assert_eq!(
            resolver.candidates(),
            vec![dir.path().join("libmediainfo.0.dylib")]
        );
    }

    #[test]
    fn test_colocated_directory_entry_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("MediaInfo.dll")).unwrap();
        let resolver = CandidateResolver::new(Platform::Windows, Some(dir.path().to_path_buf()));
        assert_eq!(resolver.candidates(), vec![PathBuf::from("MediaInfo.dll")]);
    }
}
