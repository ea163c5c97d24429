//! RAII wrapper for IGlobalSession

use crate::error::{c_string, check};
use crate::session::{Session, SessionBuilder};
use crate::{CapabilityId, CompileTarget, Error, Result, c_str};
use slangshim::*;
use std::ptr;

/// Profile identifier returned by [`GlobalSession::find_profile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(pub SlangProfileID);

/// Options for [`GlobalSession::with_desc`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalSessionOptions {
    /// Oldest language version accepted by sessions of this global session
    pub min_language_version: u32,
    /// Accept GLSL syntax in source files
    pub enable_glsl: bool,
}

impl Default for GlobalSessionOptions {
    fn default() -> Self {
        Self {
            min_language_version: SLANG_LANGUAGE_VERSION_2025,
            enable_glsl: false,
        }
    }
}

/// RAII wrapper for IGlobalSession
///
/// The process-level compiler instance. Creating one is expensive; share it
/// and create a [`Session`] per target configuration.
///
/// # Example
/// ```no_run
/// use slangrs::{CompileTarget, GlobalSession, SessionBuilder, TargetDescBuilder};
///
/// let global = GlobalSession::new().unwrap();
/// let session = global
///     .create_session(&SessionBuilder::new().target(TargetDescBuilder::new(CompileTarget::SpirV)))
///     .unwrap();
/// let module = session.load_module("shaders/blur").unwrap();
/// println!("{}", module.name());
/// ```
pub struct GlobalSession {
    ptr: *mut IGlobalSession,
}

impl GlobalSession {
    /// Creates a global session with default options.
    pub fn new() -> Result<Self> {
        let mut ptr = ptr::null_mut();
        check(unsafe { GlobalSession_create(&mut ptr) }, None)?;
        unsafe { Self::from_raw(ptr) }.ok_or(Error::NullHandle("GlobalSession_create"))
    }

    /// Creates a global session from explicit options.
    pub fn with_desc(options: &GlobalSessionOptions) -> Result<Self> {
        let desc = SlangGlobalSessionDesc {
            minLanguageVersion: options.min_language_version,
            enableGLSL: options.enable_glsl,
            ..Default::default()
        };
        let mut ptr = ptr::null_mut();
        check(unsafe { GlobalSession_createWithDesc(&desc, &mut ptr) }, None)?;
        unsafe { Self::from_raw(ptr) }.ok_or(Error::NullHandle("GlobalSession_createWithDesc"))
    }

    /// Takes over an owned reference.
    pub(crate) unsafe fn from_raw(ptr: *mut IGlobalSession) -> Option<Self> {
        if ptr.is_null() { None } else { Some(GlobalSession { ptr }) }
    }

    /// Wraps a borrowed reference, adding one of our own.
    pub(crate) unsafe fn from_borrowed(mut ptr: *mut IGlobalSession) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        unsafe { GlobalSession_addRef(&mut ptr) };
        Some(GlobalSession { ptr })
    }

    /// Looks up a profile such as `"spirv_1_5"` or `"sm_6_5"`.
    pub fn find_profile(&self, name: &str) -> Option<ProfileId> {
        let name = c_string("profile name", name).ok()?;
        match unsafe { GlobalSession_findProfile(&mut self.as_raw(), name.as_ptr()) } {
            SLANG_UNKNOWN_PROFILE => None,
            id => Some(ProfileId(id)),
        }
    }

    /// Looks up a capability such as `"spirv_1_5"` or `"SPV_KHR_ray_tracing"`.
    pub fn find_capability(&self, name: &str) -> Option<CapabilityId> {
        let name = c_string("capability name", name).ok()?;
        match unsafe { GlobalSession_findCapability(&mut self.as_raw(), name.as_ptr()) } {
            0 => None,
            id => Some(CapabilityId(id)),
        }
    }

    /// Returns true if this build of Slang can generate code for `target`.
    pub fn supports_target(&self, target: CompileTarget) -> bool {
        let result = unsafe { GlobalSession_checkCompileTargetSupport(&mut self.as_raw(), target.raw()) };
        result >= 0
    }

    /// Version tag of the loaded compiler
    pub fn build_tag(&self) -> &str {
        unsafe { c_str(GlobalSession_getBuildTagString(&mut self.as_raw())) }.unwrap_or_default()
    }

    /// Creates a session for the targets and options in `builder`.
    pub fn create_session(&self, builder: &SessionBuilder) -> Result<Session> {
        let desc = builder.lower(self)?;
        let mut ptr = ptr::null_mut();
        check(
            unsafe { GlobalSession_createSession(&mut self.as_raw(), desc.as_ptr(), &mut ptr) },
            None,
        )?;
        unsafe { Session::from_raw(ptr) }.ok_or(Error::NullHandle("GlobalSession_createSession"))
    }

    pub(crate) fn as_raw(&self) -> *mut IGlobalSession {
        self.ptr
    }
}

impl Clone for GlobalSession {
    fn clone(&self) -> Self {
        unsafe { GlobalSession_addRef(&mut self.as_raw()) };
        GlobalSession { ptr: self.ptr }
    }
}

impl Drop for GlobalSession {
    fn drop(&mut self) {
        unsafe {
            GlobalSession_release(&mut self.ptr);
        }
    }
}

impl std::fmt::Debug for GlobalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalSession").field("ptr", &self.ptr).finish()
    }
}

// The global session may move between threads but not be used from two at once
unsafe impl Send for GlobalSession {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_profile_and_capability_lookup() {
        let global = testing::global();
        assert!(global.find_profile("spirv_1_5").is_some());
        assert_eq!(global.find_profile("no_such_profile"), None);
        assert_eq!(global.find_profile("bad\0name"), None);
        assert!(global.find_capability("SPV_KHR_ray_tracing").is_some());
        assert_eq!(global.find_capability("teleportation"), None);
    }

    #[test]
    fn test_target_support() {
        let global = testing::global();
        assert!(global.supports_target(CompileTarget::SpirV));
        assert!(global.supports_target(CompileTarget::Wgsl));
        assert!(!global.supports_target(CompileTarget::Ptx));
    }

    #[test]
    fn test_with_desc_and_build_tag() {
        testing::setup();
        let global = GlobalSession::with_desc(&GlobalSessionOptions {
            enable_glsl: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(global.build_tag(), "0.0.0-mock");
        let copy = global.clone();
        assert_eq!(copy.as_raw(), global.as_raw());
    }
}
