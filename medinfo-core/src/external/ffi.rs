//! Runtime-loaded MediaInfo function table.
//!
//! The shared library is opened with `libloading` and each export is
//! resolved once into a typed function pointer. Loaded libraries are cached
//! per path for the lifetime of the process, so repeated analyses do not
//! reopen the file.

use std::collections::HashMap;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use libc::size_t;
use libloading::Library;
use once_cell::sync::Lazy;

use super::wide::{WideChar, from_wide_ptr, to_wide};
use super::{NativeApi, RawHandle};
use crate::config::EncodingErrors;
use crate::error::CoreResult;

// `system` is stdcall on 32-bit Windows and the C convention everywhere else.
type NewFn = unsafe extern "system" fn() -> *mut c_void;
type DeleteFn = unsafe extern "system" fn(*mut c_void);
type CloseFn = unsafe extern "system" fn(*mut c_void);
type OpenFn = unsafe extern "system" fn(*mut c_void, *const WideChar) -> size_t;
type OpenBufferInitFn = unsafe extern "system" fn(*mut c_void, u64, u64) -> size_t;
type OpenBufferContinueFn = unsafe extern "system" fn(*mut c_void, *const u8, size_t) -> size_t;
type OpenBufferGoToGetFn = unsafe extern "system" fn(*mut c_void) -> u64;
type OpenBufferFinalizeFn = unsafe extern "system" fn(*mut c_void) -> size_t;
type OptionFn =
    unsafe extern "system" fn(*mut c_void, *const WideChar, *const WideChar) -> *const WideChar;
type InformFn = unsafe extern "system" fn(*mut c_void, size_t) -> *const WideChar;

/// MediaInfo entry points resolved from one loaded shared library.
pub struct DynamicApi {
    path: PathBuf,
    new: NewFn,
    delete: DeleteFn,
    close: CloseFn,
    open: OpenFn,
    open_buffer_init: OpenBufferInitFn,
    open_buffer_continue: OpenBufferContinueFn,
    open_buffer_goto_get: OpenBufferGoToGetFn,
    open_buffer_finalize: OpenBufferFinalizeFn,
    option: OptionFn,
    inform: InformFn,
    // Keeps the function pointers above valid; must be dropped last.
    _library: Library,
}

impl std::fmt::Debug for DynamicApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicApi").field("path", &self.path).finish()
    }
}

impl DynamicApi {
    /// Opens `path` and resolves every MediaInfo export.
    pub fn load(path: &Path) -> Result<Self, libloading::Error> {
        // SAFETY: loading runs the library's initialisers; MediaInfo has no
        // initialisation requirements beyond being loaded once per path.
        let library = unsafe { Library::new(path)? };

        // SAFETY: the signatures match the MediaInfoDLL C interface.
        unsafe {
            let new = *library.get::<NewFn>(b"MediaInfo_New\0")?;
            let delete = *library.get::<DeleteFn>(b"MediaInfo_Delete\0")?;
            let close = *library.get::<CloseFn>(b"MediaInfo_Close\0")?;
            let open = *library.get::<OpenFn>(b"MediaInfo_Open\0")?;
            let open_buffer_init = *library.get::<OpenBufferInitFn>(b"MediaInfo_Open_Buffer_Init\0")?;
            let open_buffer_continue =
                *library.get::<OpenBufferContinueFn>(b"MediaInfo_Open_Buffer_Continue\0")?;
            let open_buffer_goto_get =
                *library.get::<OpenBufferGoToGetFn>(b"MediaInfo_Open_Buffer_Continue_GoTo_Get\0")?;
            let open_buffer_finalize =
                *library.get::<OpenBufferFinalizeFn>(b"MediaInfo_Open_Buffer_Finalize\0")?;
            let option = *library.get::<OptionFn>(b"MediaInfo_Option\0")?;
            let inform = *library.get::<InformFn>(b"MediaInfo_Inform\0")?;

            Ok(Self {
                path: path.to_path_buf(),
                new,
                delete,
                close,
                open,
                open_buffer_init,
                open_buffer_continue,
                open_buffer_goto_get,
                open_buffer_finalize,
                option,
                inform,
                _library: library,
            })
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NativeApi for DynamicApi {
    fn new_handle(&self) -> RawHandle {
        // SAFETY: MediaInfo_New takes no arguments.
        unsafe { RawHandle::from_ptr((self.new)()) }
    }

    fn delete(&self, handle: RawHandle) {
        unsafe { (self.delete)(handle.as_ptr()) }
    }

    fn close(&self, handle: RawHandle) {
        unsafe { (self.close)(handle.as_ptr()) }
    }

    fn option(
        &self,
        handle: RawHandle,
        key: &str,
        value: &str,
        policy: EncodingErrors,
    ) -> CoreResult<String> {
        let key = to_wide(key);
        let value = to_wide(value);
        // SAFETY: both arguments are nul-terminated and outlive the call; the
        // returned string is owned by the handle and copied immediately.
        unsafe {
            let result = (self.option)(handle.as_ptr(), key.as_ptr(), value.as_ptr());
            from_wide_ptr(result, policy)
        }
    }

    fn inform(&self, handle: RawHandle, policy: EncodingErrors) -> CoreResult<String> {
        unsafe {
            let result = (self.inform)(handle.as_ptr(), 0);
            from_wide_ptr(result, policy)
        }
    }

    fn open(&self, handle: RawHandle, location: &str) -> usize {
        let location = to_wide(location);
        unsafe { (self.open)(handle.as_ptr(), location.as_ptr()) }
    }

    fn open_buffer_init(&self, handle: RawHandle, total_size: u64, offset: u64) -> usize {
        unsafe { (self.open_buffer_init)(handle.as_ptr(), total_size, offset) }
    }

    fn open_buffer_continue(&self, handle: RawHandle, data: &[u8]) -> usize {
        unsafe { (self.open_buffer_continue)(handle.as_ptr(), data.as_ptr(), data.len()) }
    }

    fn open_buffer_continue_goto_get(&self, handle: RawHandle) -> u64 {
        unsafe { (self.open_buffer_goto_get)(handle.as_ptr()) }
    }

    fn open_buffer_finalize(&self, handle: RawHandle) -> usize {
        unsafe { (self.open_buffer_finalize)(handle.as_ptr()) }
    }
}

static LOADED: Lazy<Mutex<HashMap<PathBuf, Arc<DynamicApi>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Loads `path`, reusing an earlier load of the same path.
pub fn load_cached(path: &Path) -> Result<Arc<DynamicApi>, libloading::Error> {
    let mut loaded = LOADED.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(api) = loaded.get(path) {
        log::trace!("Reusing loaded library {}", path.display());
        return Ok(Arc::clone(api));
    }
    let api = Arc::new(DynamicApi::load(path)?);
    log::debug!("Loaded library {}", path.display());
    loaded.insert(path.to_path_buf(), Arc::clone(&api));
    Ok(api)
}
