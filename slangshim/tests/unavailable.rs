//! Behaviour when the Slang library cannot be loaded
//!
//! Kept in its own test binary: the load outcome is cached for the process.

use slangshim::*;
use std::ptr;

#[test]
fn test_missing_library_reports_not_available() {
    let _ = env_logger::builder().is_test(true).try_init();
    // Only this binary reads the variable, and only from this test
    unsafe { std::env::set_var(LIBRARY_ENV, "/nonexistent/libslang-missing.so") };

    assert!(matches!(api(), Err(SlangShimError::LoadError(_))));
    #[cfg(feature = "mock")]
    assert!(matches!(
        install_api(slangshim::mock::api_table()),
        Err(SlangShimError::AlreadyInstalled)
    ));

    unsafe {
        let mut global = ptr::null_mut();
        assert_eq!(GlobalSession_create(&mut global), SLANG_E_NOT_AVAILABLE);
        assert!(global.is_null());

        let desc = SlangGlobalSessionDesc::default();
        assert_eq!(GlobalSession_createWithDesc(&desc, &mut global), SLANG_E_NOT_AVAILABLE);

        // Reflection nodes are opaque; with no library nothing dereferences them
        let mut node = ptr::NonNull::<SlangReflection>::dangling().as_ptr();
        assert_eq!(ShaderReflection_getParameterCount(&mut node), 0);
        assert!(ShaderReflection_getGlobalParamsVarLayout(&mut node).is_null());

        let mut attribute = ptr::NonNull::<SlangReflectionUserAttribute>::dangling().as_ptr();
        let mut value = 9;
        assert_eq!(
            UserAttribute_getArgumentValueInt(&mut attribute, 0, &mut value),
            SLANG_E_NOT_AVAILABLE
        );
        assert_eq!(value, 9);

        // Shutdown without a library is a no-op
        Slang_shutdown();
    }
}
