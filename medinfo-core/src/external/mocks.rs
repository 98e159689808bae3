// medinfo-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::binding::LibraryLoader;
use super::{NO_SEEK, NativeApi, RawHandle};
use crate::config::EncodingErrors;
use crate::error::CoreResult;
use crate::version::VERSION_OPTION;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// One call received by [`MockNativeApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    New,
    Delete,
    Close,
    Option(String, String),
    Inform,
    Open(String),
    BufferInit(u64, u64),
    BufferContinue(usize),
    GoToGet,
    BufferFinalize,
}

#[derive(Debug, Default)]
struct MockState {
    version_info: String,
    report: String,
    custom_reports: HashMap<String, String>,
    open_result: usize,
    continue_statuses: VecDeque<usize>,
    seek_requests: VecDeque<u64>,
    next_handle: usize,
    live: HashSet<usize>,
    closed: usize,
    inform_format: HashMap<usize, String>,
    fed: Vec<u8>,
    calls: Vec<MockCall>,
}

/// Scripted stand-in for the MediaInfo library.
///
/// Clones share state, so a test can keep one clone for assertions while the
/// binding owns another.
#[derive(Debug, Clone)]
pub struct MockNativeApi {
    state: Arc<Mutex<MockState>>,
}

impl MockNativeApi {
    /// Creates a mock answering `Info_Version` with `version_info`.
    pub fn new(version_info: &str) -> Self {
        let state = MockState {
            version_info: version_info.to_string(),
            open_result: 1,
            next_handle: 1,
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Report returned by `Inform` for the XML formats.
    pub fn with_report(self, report: &str) -> Self {
        self.state().report = report.to_string();
        self
    }

    /// Report returned by `Inform` when `format` was selected.
    pub fn with_custom_report(self, format: &str, report: &str) -> Self {
        self.state()
            .custom_reports
            .insert(format.to_string(), report.to_string());
        self
    }

    /// Value returned by every `Open` call.
    pub fn with_open_result(self, result: usize) -> Self {
        self.state().open_result = result;
        self
    }

    /// Statuses returned by successive `Open_Buffer_Continue` calls; 0 afterwards.
    pub fn with_continue_statuses(self, statuses: impl IntoIterator<Item = usize>) -> Self {
        self.state().continue_statuses.extend(statuses);
        self
    }

    /// Offsets returned by successive `GoTo_Get` calls; [`NO_SEEK`] afterwards.
    pub fn with_seek_requests(self, offsets: impl IntoIterator<Item = u64>) -> Self {
        self.state().seek_requests.extend(offsets);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Option calls other than the version query, in order.
    pub fn option_calls(&self) -> Vec<(String, String)> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Option(key, value) if key != VERSION_OPTION => {
                    Some((key.clone(), value.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Every byte passed to `Open_Buffer_Continue`.
    pub fn fed_bytes(&self) -> Vec<u8> {
        self.state().fed.clone()
    }

    pub fn live_handles(&self) -> usize {
        self.state().live.len()
    }

    pub fn closed_handles(&self) -> usize {
        self.state().closed
    }

    fn record(&self, call: MockCall) {
        self.state().calls.push(call);
    }
}

impl NativeApi for MockNativeApi {
    fn new_handle(&self) -> RawHandle {
        let mut state = self.state();
        state.calls.push(MockCall::New);
        let id = state.next_handle;
        state.next_handle += 1;
        state.live.insert(id);
        // SAFETY: the pointer is only ever used as an identifier by this mock.
        unsafe { RawHandle::from_ptr(id as *mut c_void) }
    }

    fn delete(&self, handle: RawHandle) {
        let mut state = self.state();
        state.calls.push(MockCall::Delete);
        state.live.remove(&(handle.as_ptr() as usize));
    }

    fn close(&self, _handle: RawHandle) {
        let mut state = self.state();
        state.calls.push(MockCall::Close);
        state.closed += 1;
    }

    fn option(
        &self,
        handle: RawHandle,
        key: &str,
        value: &str,
        _policy: EncodingErrors,
    ) -> CoreResult<String> {
        let mut state = self.state();
        state
            .calls
            .push(MockCall::Option(key.to_string(), value.to_string()));
        if key == VERSION_OPTION {
            return Ok(state.version_info.clone());
        }
        if key == "Inform" {
            state
                .inform_format
                .insert(handle.as_ptr() as usize, value.to_string());
        }
        Ok(String::new())
    }

    fn inform(&self, handle: RawHandle, _policy: EncodingErrors) -> CoreResult<String> {
        let mut state = self.state();
        state.calls.push(MockCall::Inform);
        let format = state
            .inform_format
            .get(&(handle.as_ptr() as usize))
            .cloned()
            .unwrap_or_default();
        Ok(state
            .custom_reports
            .get(&format)
            .cloned()
            .unwrap_or_else(|| state.report.clone()))
    }

    fn open(&self, _handle: RawHandle, location: &str) -> usize {
        let mut state = self.state();
        state.calls.push(MockCall::Open(location.to_string()));
        state.open_result
    }

    fn open_buffer_init(&self, _handle: RawHandle, total_size: u64, offset: u64) -> usize {
        self.record(MockCall::BufferInit(total_size, offset));
        1
    }

    fn open_buffer_continue(&self, _handle: RawHandle, data: &[u8]) -> usize {
        let mut state = self.state();
        state.calls.push(MockCall::BufferContinue(data.len()));
        state.fed.extend_from_slice(data);
        state.continue_statuses.pop_front().unwrap_or(0)
    }

    fn open_buffer_continue_goto_get(&self, _handle: RawHandle) -> u64 {
        let mut state = self.state();
        state.calls.push(MockCall::GoToGet);
        state.seek_requests.pop_front().unwrap_or(NO_SEEK)
    }

    fn open_buffer_finalize(&self, _handle: RawHandle) -> usize {
        self.record(MockCall::BufferFinalize);
        1
    }
}

/// Loader serving [`MockNativeApi`] instances by path.
#[derive(Debug, Clone, Default)]
pub struct MockLoader {
    libraries: HashMap<PathBuf, MockNativeApi>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(mut self, path: impl Into<PathBuf>, api: MockNativeApi) -> Self {
        self.libraries.insert(path.into(), api);
        self
    }
}

impl LibraryLoader for MockLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn NativeApi>, String> {
        match self.libraries.get(path) {
            Some(api) => Ok(Arc::new(api.clone())),
            None => Err(format!(
                "{}: cannot open shared object file: No such file or directory",
                path.display()
            )),
        }
    }
}
