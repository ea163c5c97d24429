//! Safe, ergonomic Rust API for the Slang shader compiler
//!
//! This crate wraps the flat exports of `slangshim` in RAII handles,
//! builders, iterators and `Result` types. Every handle releases its Slang
//! reference on drop; reflection views borrow the component type they came
//! from.
//!
//! # Example
//!
//! ```no_run
//! use slangrs::{CompileTarget, Downcast, GlobalSession, SessionBuilder, TargetDescBuilder};
//!
//! let global = GlobalSession::new().unwrap();
//! let session = global
//!     .create_session(
//!         &SessionBuilder::new()
//!             .target(TargetDescBuilder::new(CompileTarget::SpirV).profile("spirv_1_5"))
//!             .search_path("shaders"),
//!     )
//!     .unwrap();
//!
//! // Load a module and pick its compute entry point
//! let module = session.load_module("blur").unwrap();
//! let entry = module.find_entry_point_by_name("main").unwrap();
//!
//! // Compose, link and generate SPIR-V
//! let program = session
//!     .create_composite_component_type(&[module.downcast(), entry.downcast()])
//!     .unwrap();
//! let linked = program.link().unwrap();
//! let spirv = linked.entry_point_code(0, 0).unwrap();
//! println!("{} bytes of SPIR-V", spirv.len());
//! ```

mod blob;
mod component;
mod error;
mod flags;
mod global_session;
mod options;
pub mod reflect;
mod session;
mod target;

pub use blob::Blob;
pub use component::{ComponentType, Downcast, EntryPoint, EntryPoints, Module};
pub use error::{Error, Result, SlangResult};
pub use flags::{ResourceShapeFlags, TargetFlags};
pub use global_session::{GlobalSession, GlobalSessionOptions, ProfileId};
pub use options::{CapabilityId, CompilerOption, CompilerOptions, DebugInfoLevel, OptimizationLevel};
pub use reflect::ProgramLayout;
pub use session::{LoadedModules, Session, SessionBuilder, TargetDescBuilder};
pub use target::{CompileTarget, FloatingPointMode, LineDirectiveMode, MatrixLayout, Stage};

use std::ffi::{CStr, c_char};

/// Borrows a NUL-terminated string returned by Slang.
///
/// # Safety
/// `ptr` must be null or point to a string that outlives `'a`.
pub(crate) unsafe fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}
