// ============================================================================
// medinfo-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL LIBRARY: Interactions with the MediaInfo Shared Library
//
// This module encapsulates everything that touches the native MediaInfo
// library: locating candidate files, loading them at runtime, declaring the
// C function table, converting wide strings, and owning library handles.
//
// KEY COMPONENTS:
// - NativeApi: Trait over the ten MediaInfo entry points
// - DynamicApi: libloading-backed implementation (ffi.rs)
// - CandidateResolver: Platform-dependent candidate file list (resolver.rs)
// - Binding / Session: Loading, version detection and handle ownership (binding.rs)
// - MockNativeApi: Scripted implementation for tests (mocks.rs)
//
// The engine and the facade only ever talk to `dyn NativeApi`, so a scripted
// library can stand in for the real one in tests.

// ---- Internal crate imports ----
use crate::config::EncodingErrors;
use crate::error::CoreResult;

// ---- Standard library imports ----
use std::ffi::c_void;

// ============================================================================
// SUBMODULES
// ============================================================================

pub mod binding;
pub mod ffi;
pub mod resolver;
pub mod wide;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use binding::{Binding, DynamicLoader, LibraryLoader, Session};
pub use ffi::DynamicApi;
pub use resolver::{CandidateResolver, Platform};

// ============================================================================
// PROTOCOL CONSTANTS
// ============================================================================

/// Bit set in the `Open_Buffer_Continue` status when analysis is complete.
pub const STATUS_FINISHED: usize = 0x08;

/// `Open_Buffer_Continue_GoTo_Get` value meaning "no seek requested".
pub const NO_SEEK: u64 = u64::MAX;

/// Opaque `MediaInfo_New` handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(*mut c_void);

impl RawHandle {
    /// Wraps a pointer returned by a `MediaInfo_New` implementation.
    ///
    /// # Safety
    ///
    /// The pointer must be a live handle of the [`NativeApi`] it is passed
    /// back to, or null.
    pub unsafe fn from_ptr(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

// ============================================================================
// NATIVE FUNCTION TABLE
// ============================================================================

/// The MediaInfo C entry points used by this crate.
///
/// Every method maps to one exported function; see [`ffi::DynamicApi`] for
/// the exact signatures. Handles passed in must come from `new_handle` on
/// the same implementation and must not have been deleted.
pub trait NativeApi: Send + Sync {
    /// `MediaInfo_New`
    fn new_handle(&self) -> RawHandle;

    /// `MediaInfo_Delete`
    fn delete(&self, handle: RawHandle);

    /// `MediaInfo_Close`
    fn close(&self, handle: RawHandle);

    /// `MediaInfo_Option`; returns the previous value or the query result.
    fn option(
        &self,
        handle: RawHandle,
        key: &str,
        value: &str,
        policy: EncodingErrors,
    ) -> CoreResult<String>;

    /// `MediaInfo_Inform` with the reserved argument set to zero.
    fn inform(&self, handle: RawHandle, policy: EncodingErrors) -> CoreResult<String>;

    /// `MediaInfo_Open`; 0 means failure.
    fn open(&self, handle: RawHandle, location: &str) -> usize;

    /// `MediaInfo_Open_Buffer_Init`
    fn open_buffer_init(&self, handle: RawHandle, total_size: u64, offset: u64) -> usize;

    /// `MediaInfo_Open_Buffer_Continue`; returns the status bitmask.
    fn open_buffer_continue(&self, handle: RawHandle, data: &[u8]) -> usize;

    /// `MediaInfo_Open_Buffer_Continue_GoTo_Get`; [`NO_SEEK`] when no seek is wanted.
    fn open_buffer_continue_goto_get(&self, handle: RawHandle) -> u64;

    /// `MediaInfo_Open_Buffer_Finalize`
    fn open_buffer_finalize(&self, handle: RawHandle) -> usize;
}
