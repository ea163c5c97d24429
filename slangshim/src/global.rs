//! Entry into the library: global-session creation and shutdown

use crate::interfaces::IGlobalSession;
use crate::loader::{api, loaded_api};
use crate::result::{SLANG_E_INVALID_ARG, SLANG_E_NOT_AVAILABLE};
use crate::types::{SLANG_API_VERSION, SlangGlobalSessionDesc, SlangResult};

/// Creates a global session with default options.
///
/// On success `out_global_session` holds a reference the caller releases with
/// `GlobalSession_release`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn GlobalSession_create(out_global_session: *mut *mut IGlobalSession) -> SlangResult {
    if out_global_session.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    debug_log!("[GlobalSession_create] out={:?}", out_global_session);

    match api() {
        Ok(api) => debug_log_return!(
            "[GlobalSession_create]",
            "{:#x}",
            unsafe { (api.slang_createGlobalSession)(SLANG_API_VERSION, out_global_session) }
        ),
        Err(e) => {
            log::warn!("GlobalSession_create: {e}");
            SLANG_E_NOT_AVAILABLE
        }
    }
}

/// Creates a global session from an explicit descriptor
#[unsafe(no_mangle)]
pub unsafe extern "C" fn GlobalSession_createWithDesc(
    desc: *const SlangGlobalSessionDesc,
    out_global_session: *mut *mut IGlobalSession,
) -> SlangResult {
    if desc.is_null() || out_global_session.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    debug_log!("[GlobalSession_createWithDesc] desc={:?}", unsafe { &*desc });

    match api() {
        Ok(api) => debug_log_return!(
            "[GlobalSession_createWithDesc]",
            "{:#x}",
            unsafe { (api.slang_createGlobalSession2)(desc, out_global_session) }
        ),
        Err(e) => {
            log::warn!("GlobalSession_createWithDesc: {e}");
            SLANG_E_NOT_AVAILABLE
        }
    }
}

/// Releases Slang's process-wide state. Every global session must already
/// be released. Does nothing if the library was never loaded.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Slang_shutdown() {
    debug_log!("[Slang_shutdown]");
    if let Some(api) = loaded_api() {
        unsafe { (api.slang_shutdown)() }
    }
}
