//! Error types for slangrs operations

use crate::Blob;
use std::ffi::CString;
use std::fmt;
use thiserror::Error;

/// Status code returned by Slang operations
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlangResult(pub i32);

impl SlangResult {
    /// Success
    pub const OK: SlangResult = SlangResult(slangshim::SLANG_OK);
    /// Generic failure
    pub const FAIL: SlangResult = SlangResult(slangshim::SLANG_FAIL);
    /// Invalid argument
    pub const E_INVALID_ARG: SlangResult = SlangResult(slangshim::SLANG_E_INVALID_ARG);
    /// Operation not implemented by this build of Slang
    pub const E_NOT_IMPLEMENTED: SlangResult = SlangResult(slangshim::SLANG_E_NOT_IMPLEMENTED);
    /// Receiver slot or reference was null
    pub const E_INVALID_HANDLE: SlangResult = SlangResult(slangshim::SLANG_E_INVALID_HANDLE);
    /// The Slang shared library could not be loaded
    pub const E_NOT_AVAILABLE: SlangResult = SlangResult(slangshim::SLANG_E_NOT_AVAILABLE);

    /// Returns true if the result indicates success
    #[inline]
    pub fn is_success(&self) -> bool {
        self.0 >= 0
    }

    /// Returns true if the result indicates an error
    #[inline]
    pub fn is_error(&self) -> bool {
        self.0 < 0
    }

    /// Returns the raw status value
    #[inline]
    pub fn code(&self) -> i32 {
        self.0
    }
}

impl fmt::Debug for SlangResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlangResult(0x{:08x})", self.0 as u32)
    }
}

impl fmt::Display for SlangResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0 as u32)
    }
}

impl From<i32> for SlangResult {
    fn from(result: i32) -> Self {
        SlangResult(result)
    }
}

/// Error type for slangrs operations
#[derive(Error, Debug)]
pub enum Error {
    /// A Slang call failed
    #[error("Slang call failed ({result}){}", if message.is_empty() { String::new() } else { format!(": {message}") })]
    Slang {
        /// The status code
        result: SlangResult,
        /// Diagnostics reported alongside the failure, if any
        message: String,
    },

    /// Slang returned a null object where one was expected
    #[error("Null handle returned by {0}")]
    NullHandle(&'static str),

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// UTF-8 encoding error
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// IO error while reading or writing shader files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for slangrs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Turns a status code and optional diagnostics into a `Result`.
///
/// Diagnostics that accompany a success are logged as warnings.
pub(crate) fn check(result: i32, diagnostics: Option<Blob>) -> Result<()> {
    let message = diagnostics.map(|d| d.to_string_lossy()).unwrap_or_default();
    if SlangResult(result).is_error() {
        return Err(Error::Slang {
            result: SlangResult(result),
            message,
        });
    }
    if !message.is_empty() {
        log::warn!("{}", message.trim_end());
    }
    Ok(())
}

/// Converts a Rust string for the C boundary
pub(crate) fn c_string(what: &str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::InvalidParameter(format!("{what} contains a null byte: {value:?}")))
}
