//! Conversion between Rust strings and the platform `wchar_t` strings used by
//! the MediaInfo C API (UTF-16 on Windows, UTF-32 elsewhere).

use crate::config::EncodingErrors;
use crate::error::{CoreError, CoreResult};

pub type WideChar = libc::wchar_t;

/// Encodes `s` as a nul-terminated wide string.
///
/// The C side stops at the first nul, so an embedded nul truncates the value.
pub fn to_wide(s: &str) -> Vec<WideChar> {
    #[cfg(windows)]
    let mut wide: Vec<WideChar> = s.encode_utf16().map(|unit| unit as WideChar).collect();
    #[cfg(not(windows))]
    let mut wide: Vec<WideChar> = s.chars().map(|c| c as u32 as WideChar).collect();
    wide.push(0);
    wide
}

/// Decodes wide code units (without terminator) according to `policy`.
pub fn decode_wide(units: &[WideChar], policy: EncodingErrors) -> CoreResult<String> {
    #[cfg(windows)]
    {
        let mut out = String::with_capacity(units.len());
        for decoded in char::decode_utf16(units.iter().map(|&u| u as u16)) {
            match decoded {
                Ok(c) => out.push(c),
                Err(e) => match policy {
                    EncodingErrors::Strict => {
                        return Err(CoreError::Decode(format!(
                            "unpaired surrogate 0x{:04x}",
                            e.unpaired_surrogate()
                        )))
                    }
                    EncodingErrors::Replace => out.push(char::REPLACEMENT_CHARACTER),
                },
            }
        }
        Ok(out)
    }
    #[cfg(not(windows))]
    {
        let mut out = String::with_capacity(units.len());
        for &unit in units {
            let code = unit as u32;
            match char::from_u32(code) {
                Some(c) => out.push(c),
                None => match policy {
                    EncodingErrors::Strict => {
                        return Err(CoreError::Decode(format!("invalid code point 0x{:x}", code)))
                    }
                    EncodingErrors::Replace => out.push(char::REPLACEMENT_CHARACTER),
                },
            }
        }
        Ok(out)
    }
}

/// Decodes a nul-terminated wide string returned by the library.
///
/// A null pointer decodes to the empty string.
///
/// # Safety
///
/// `ptr` must be null or point to a nul-terminated `wchar_t` sequence that
/// stays valid for the duration of the call.
pub unsafe fn from_wide_ptr(ptr: *const WideChar, policy: EncodingErrors) -> CoreResult<String> {
    if ptr.is_null() {
        return Ok(String::new());
    }
    let mut len = 0usize;
    // SAFETY: the caller guarantees a terminator exists.
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        decode_wide(std::slice::from_raw_parts(ptr, len), policy)
    }
}
