// ============================================================================
// medinfo-core/src/external/binding.rs
// ============================================================================
//
// NATIVE BINDING: Loading the Library and Owning Its Handles
//
// Tries each candidate library in order, creates a handle on the first one
// that loads, and asks it for its version. A candidate whose version string
// cannot be parsed is treated like one that failed to load. Failures are
// aggregated into a single CoreError::LibraryLoad.
//
// KEY COMPONENTS:
// - LibraryLoader: Trait turning a path into a NativeApi (injectable)
// - DynamicLoader: libloading-backed loader with a process-wide cache
// - Binding: Candidate search, probe and version query
// - Session: Exclusively owned handle, closed then deleted on drop

// ---- Standard library imports ----
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ---- Internal crate imports ----
use super::resolver::CandidateResolver;
use super::{NativeApi, RawHandle, ffi};
use crate::config::EncodingErrors;
use crate::error::{CoreError, CoreResult};
use crate::version::{Capabilities, LibraryVersion, VERSION_OPTION, parse_version_string};

// ============================================================================
// LOADERS
// ============================================================================

/// Turns a candidate path into a usable function table.
pub trait LibraryLoader: Send + Sync {
    /// Loads the library at `path`, returning a human-readable message on failure.
    fn load(&self, path: &Path) -> Result<Arc<dyn NativeApi>, String>;
}

/// Loads real shared libraries through `libloading`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicLoader;

impl LibraryLoader for DynamicLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn NativeApi>, String> {
        ffi::load_cached(path)
            .map(|api| api as Arc<dyn NativeApi>)
            .map_err(|e| e.to_string())
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// A live library handle, exclusively owned by one analysis.
///
/// Dropping the session closes and then deletes the handle, so every exit
/// path of an analysis releases it.
pub struct Session {
    api: Arc<dyn NativeApi>,
    handle: RawHandle,
    library_path: PathBuf,
    version_string: String,
    version: LibraryVersion,
    capabilities: Capabilities,
}

impl Session {
    pub fn library_path(&self) -> &Path {
        &self.library_path
    }

    /// Version text as reported by the library, e.g. `"24.06"`.
    pub fn version_string(&self) -> &str {
        &self.version_string
    }

    pub fn version(&self) -> &LibraryVersion {
        &self.version
    }

    /// Version-gated behaviour, evaluated once when the session was opened.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Sets a library option, returning the library's answer.
    pub fn set_option(&self, key: &str, value: &str) -> CoreResult<String> {
        log::debug!("MediaInfo_Option({:?}, {:?})", key, value);
        self.api
            .option(self.handle, key, value, EncodingErrors::Replace)
    }

    pub fn open(&self, location: &str) -> usize {
        self.api.open(self.handle, location)
    }

    pub fn open_buffer_init(&self, total_size: u64, offset: u64) -> usize {
        self.api.open_buffer_init(self.handle, total_size, offset)
    }

    pub fn open_buffer_continue(&self, data: &[u8]) -> usize {
        self.api.open_buffer_continue(self.handle, data)
    }

    pub fn open_buffer_continue_goto_get(&self) -> u64 {
        self.api.open_buffer_continue_goto_get(self.handle)
    }

    pub fn open_buffer_finalize(&self) -> usize {
        self.api.open_buffer_finalize(self.handle)
    }

    /// Renders the report in the format selected by the `Inform` option.
    pub fn inform(&self, policy: EncodingErrors) -> CoreResult<String> {
        self.api.inform(self.handle, policy)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        log::debug!("Closing MediaInfo handle");
        self.api.close(self.handle);
        self.api.delete(self.handle);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("library_path", &self.library_path)
            .field("version", &self.version_string)
            .finish()
    }
}

// ============================================================================
// BINDING
// ============================================================================

/// Locates and loads the MediaInfo library.
#[derive(Clone)]
pub struct Binding {
    resolver: CandidateResolver,
    loader: Arc<dyn LibraryLoader>,
}

impl Binding {
    pub fn new(resolver: CandidateResolver, loader: Arc<dyn LibraryLoader>) -> Self {
        Self { resolver, loader }
    }

    /// Binding for the current platform using real shared libraries.
    pub fn system() -> Self {
        Self::new(CandidateResolver::from_env(), Arc::new(DynamicLoader))
    }

    pub fn resolver(&self) -> &CandidateResolver {
        &self.resolver
    }

    /// Paths that [`Binding::open_session`] will try, in order.
    pub fn candidates(&self, library_file: Option<&Path>) -> Vec<PathBuf> {
        match library_file {
            Some(path) => vec![path.to_path_buf()],
            None => self.resolver.candidates(),
        }
    }

    /// Loads the first usable candidate and opens a handle on it.
    ///
    /// # Errors
    ///
    /// [`CoreError::LibraryLoad`] listing every attempted path and the
    /// reason each one failed.
    pub fn open_session(&self, library_file: Option<&Path>) -> CoreResult<Session> {
        let paths = self.candidates(library_file);
        let mut errors = Vec::new();

        for path in &paths {
            match self.try_candidate(path) {
                Ok(session) => {
                    log::debug!(
                        "Using MediaInfo v{} from {}",
                        session.version_string,
                        path.display()
                    );
                    return Ok(session);
                }
                Err(message) => {
                    log::warn!("Could not use library {}: {}", path.display(), message);
                    errors.push(message);
                }
            }
        }

        Err(CoreError::LibraryLoad { paths, errors })
    }

    fn try_candidate(&self, path: &Path) -> Result<Session, String> {
        let api = self.loader.load(path)?;
        let handle = api.new_handle();
        if handle.is_null() {
            return Err("MediaInfo_New returned a null handle".to_string());
        }

        // From here on the session owns the handle; an early return releases it.
        let mut session = Session {
            api,
            handle,
            library_path: path.to_path_buf(),
            version_string: String::new(),
            version: LibraryVersion::new(Vec::new()),
            capabilities: LibraryVersion::new(Vec::new()).capabilities(),
        };

        let info = session
            .set_option(VERSION_OPTION, "")
            .map_err(|e| e.to_string())?;
        let (version_string, version) = parse_version_string(&info)
            .ok_or_else(|| "Could not determine library version".to_string())?;

        session.capabilities = version.capabilities();
        session.version_string = version_string;
        session.version = version;
        Ok(session)
    }

    /// Whether a library can be loaded and opened.
    ///
    /// Any failure, including a panic inside a loader, is reported as `false`.
    pub fn can_parse(&self, library_file: Option<&Path>) -> bool {
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.open_session(library_file).map(drop).is_ok()
        }))
        .unwrap_or(false)
    }

    /// Raw and parsed version of the library that would be used.
    pub fn library_version(
        &self,
        library_file: Option<&Path>,
    ) -> CoreResult<(String, LibraryVersion)> {
        let session = self.open_session(library_file)?;
        Ok((session.version_string.clone(), session.version.clone()))
    }
}

impl Default for Binding {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MockLoader, MockNativeApi};
    use crate::external::resolver::Platform;

    fn binding_with(loader: MockLoader) -> Binding {
        Binding::new(
            CandidateResolver::new(Platform::Unix, None),
            Arc::new(loader),
        )
    }

    #[test]
    fn test_open_session_reads_version() {
        let api = MockNativeApi::new("MediaInfoLib - v21.09");
        let binding = binding_with(MockLoader::new().with_library("libmediainfo.so.0", api.clone()));

        let session = binding.open_session(None).unwrap();
        assert_eq!(session.version_string(), "21.09");
        assert_eq!(session.version(), &LibraryVersion::new(vec![21, 9]));
        assert!(session.capabilities().reset_option);
        assert_eq!(api.live_handles(), 1);

        drop(session);
        assert_eq!(api.live_handles(), 0);
        assert_eq!(api.closed_handles(), 1);
    }

    #[test]
    fn test_load_error_aggregates_every_candidate() {
        let binding = binding_with(MockLoader::new());
        let err = binding
            .open_session(Some(Path::new("/tmp/nonexistent-libmediainfo.so")))
            .unwrap_err();
        match err {
            CoreError::LibraryLoad { paths, errors } => {
                assert_eq!(paths, vec![PathBuf::from("/tmp/nonexistent-libmediainfo.so")]);
                assert_eq!(errors.len(), 1);
            }
            e => panic!("Unexpected error type: {:?}", e),
        }
    }

    #[test]
    fn test_unparseable_version_falls_through_to_next_candidate() {
        let broken = MockNativeApi::new("not a version");
        let good = MockNativeApi::new("MediaInfoLib - v18.03");
        let binding = Binding::new(
            CandidateResolver::new(Platform::MacOs, None),
            Arc::new(
                MockLoader::new()
                    .with_library("libmediainfo.0.dylib", broken.clone())
                    .with_library("libmediainfo.dylib", good.clone()),
            ),
        );

        let session = binding.open_session(None).unwrap();
        assert_eq!(session.library_path(), Path::new("libmediainfo.dylib"));
        // The rejected candidate's handle was released.
        assert_eq!(broken.live_handles(), 0);
        assert_eq!(broken.closed_handles(), 1);
    }

    #[test]
    fn test_all_versions_unparseable_is_load_error() {
        let broken = MockNativeApi::new("MediaInfoLib - vX");
        let binding = binding_with(MockLoader::new().with_library("libmediainfo.so.0", broken));
        let err = binding.open_session(None).unwrap_err();
        assert!(err.is_load_error());
        assert!(err.to_string().contains("Could not determine library version"));
    }

    #[test]
    fn test_can_parse() {
        let api = MockNativeApi::new("MediaInfoLib - v24.06");
        let binding = binding_with(MockLoader::new().with_library("libmediainfo.so.0", api.clone()));
        assert!(binding.can_parse(None));
        assert_eq!(api.live_handles(), 0);

        assert!(!binding_with(MockLoader::new()).can_parse(None));
    }

    #[test]
    fn test_library_version() {
        let api = MockNativeApi::new("MediaInfoLib - v17.10");
        let binding = binding_with(MockLoader::new().with_library("libmediainfo.so.0", api));
        let (raw, version) = binding.library_version(None).unwrap();
        assert_eq!(raw, "17.10");
        assert_eq!(version.capabilities().xml_keyword, "OLDXML");
    }
}
