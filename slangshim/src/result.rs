//! SlangResult status codes
//!
//! Codes follow Slang's HRESULT-style encoding: the sign bit marks failure,
//! bits 16..31 carry the facility and the low 16 bits the code.

use crate::types::SlangResult;

const fn make_error(facility: u32, code: u32) -> SlangResult {
    ((facility << 16) | code | 0x8000_0000) as SlangResult
}

const FACILITY_WIN_GENERAL: u32 = 0;
const FACILITY_WIN_API: u32 = 7;
const FACILITY_CORE: u32 = 0x200;

pub const SLANG_OK: SlangResult = 0;
pub const SLANG_FAIL: SlangResult = make_error(FACILITY_WIN_GENERAL, 0x4005);

pub const SLANG_E_NOT_IMPLEMENTED: SlangResult = make_error(FACILITY_WIN_GENERAL, 0x4001);
pub const SLANG_E_NO_INTERFACE: SlangResult = make_error(FACILITY_WIN_GENERAL, 0x4002);
pub const SLANG_E_ABORT: SlangResult = make_error(FACILITY_WIN_GENERAL, 0x4004);

pub const SLANG_E_INVALID_HANDLE: SlangResult = make_error(FACILITY_WIN_API, 6);
pub const SLANG_E_INVALID_ARG: SlangResult = make_error(FACILITY_WIN_API, 0x57);
pub const SLANG_E_OUT_OF_MEMORY: SlangResult = make_error(FACILITY_WIN_API, 0xe);

pub const SLANG_E_BUFFER_TOO_SMALL: SlangResult = make_error(FACILITY_CORE, 1);
pub const SLANG_E_UNINITIALIZED: SlangResult = make_error(FACILITY_CORE, 2);
pub const SLANG_E_PENDING: SlangResult = make_error(FACILITY_CORE, 3);
pub const SLANG_E_CANNOT_OPEN: SlangResult = make_error(FACILITY_CORE, 4);
pub const SLANG_E_NOT_FOUND: SlangResult = make_error(FACILITY_CORE, 5);
pub const SLANG_E_INTERNAL_FAIL: SlangResult = make_error(FACILITY_CORE, 6);
pub const SLANG_E_NOT_AVAILABLE: SlangResult = make_error(FACILITY_CORE, 7);
pub const SLANG_E_TIME_OUT: SlangResult = make_error(FACILITY_CORE, 8);

/// Returns true if the result indicates success
#[inline]
pub const fn succeeded(result: SlangResult) -> bool {
    result >= 0
}

/// Returns true if the result indicates failure
#[inline]
pub const fn failed(result: SlangResult) -> bool {
    result < 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_slang_encoding() {
        assert_eq!(SLANG_FAIL as u32, 0x8000_4005);
        assert_eq!(SLANG_E_INVALID_HANDLE as u32, 0x8007_0006);
        assert_eq!(SLANG_E_INVALID_ARG as u32, 0x8007_0057);
        assert_eq!(SLANG_E_NOT_AVAILABLE as u32, 0x8200_0007);
    }

    #[test]
    fn boundary_codes_are_distinct_failures() {
        assert!(failed(SLANG_E_INVALID_HANDLE));
        assert!(failed(SLANG_E_NOT_AVAILABLE));
        assert_ne!(SLANG_E_INVALID_HANDLE, SLANG_FAIL);
        assert_ne!(SLANG_E_NOT_AVAILABLE, SLANG_FAIL);
        assert!(succeeded(SLANG_OK));
    }
}
