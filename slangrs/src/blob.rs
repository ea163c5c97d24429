//! RAII wrapper for ISlangBlob

use crate::Result;
use slangshim::{Blob_getBufferPointer, Blob_getBufferSize, Blob_release, ISlangBlob};
use std::ops::Deref;
use std::slice;

/// RAII wrapper for ISlangBlob
///
/// Holds compiled code or diagnostics text. When dropped, the blob's
/// reference count is decremented.
pub struct Blob {
    ptr: *mut ISlangBlob,
}

impl Blob {
    /// Wraps a raw blob pointer, taking over its reference.
    ///
    /// # Safety
    /// The pointer must be a valid ISlangBlob pointer or null.
    pub(crate) unsafe fn from_raw(ptr: *mut ISlangBlob) -> Option<Self> {
        if ptr.is_null() { None } else { Some(Blob { ptr }) }
    }

    /// Returns the blob data as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            let data = Blob_getBufferPointer(&mut self.as_raw());
            let size = Blob_getBufferSize(&mut self.as_raw());
            if data.is_null() || size == 0 {
                return &[];
            }
            slice::from_raw_parts(data.cast::<u8>(), size)
        }
    }

    /// Returns the size of the blob in bytes.
    pub fn len(&self) -> usize {
        unsafe { Blob_getBufferSize(&mut self.as_raw()) }
    }

    /// Returns true if the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interprets the blob as UTF-8 text, trimming trailing nulls.
    pub fn as_str(&self) -> Result<&str> {
        std::str::from_utf8(trim_nul(self.as_bytes())).map_err(Into::into)
    }

    /// Converts the blob to a String, trimming trailing nulls and
    /// replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(trim_nul(self.as_bytes())).into_owned()
    }

    pub(crate) fn as_raw(&self) -> *mut ISlangBlob {
        self.ptr
    }
}

fn trim_nul(bytes: &[u8]) -> &[u8] {
    bytes
        .iter()
        .rposition(|&b| b != 0)
        .map(|i| &bytes[..=i])
        .unwrap_or(&[])
}

impl Drop for Blob {
    fn drop(&mut self) {
        unsafe {
            Blob_release(&mut self.ptr);
        }
    }
}

impl Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("len", &self.len())
            .field("ptr", &self.ptr)
            .finish()
    }
}

// Blobs are immutable once created and use atomic reference counting
unsafe impl Send for Blob {}
unsafe impl Sync for Blob {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_nul() {
        assert_eq!(trim_nul(b"abc\0\0"), b"abc");
        assert_eq!(trim_nul(b"\0"), b"");
        assert_eq!(trim_nul(b"a\0b"), b"a\0b");
    }
}
