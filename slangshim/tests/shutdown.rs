//! Shutdown before anything loaded the library
//!
//! Kept in its own test binary: the load outcome is cached for the process.

use slangshim::*;

#[test]
fn test_shutdown_does_not_load_the_library() {
    let _ = env_logger::builder().is_test(true).try_init();
    unsafe { std::env::set_var(LIBRARY_ENV, "/nonexistent/libslang-missing.so") };

    unsafe { Slang_shutdown() };
    assert!(loaded_api().is_none());

    // Nothing was cached, so a table can still be installed
    assert!(install_api(slangshim::mock::api_table()).is_ok());
    assert!(loaded_api().is_some());
    unsafe { Slang_shutdown() };
}
