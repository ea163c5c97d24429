//! Flat C exports over the Slang shader compiler
//!
//! Slang's API is a set of COM-style interfaces plus C reflection functions.
//! This crate re-exposes every operation a foreign caller needs as a free
//! `extern "C"` function named `<Family>_<operation>`, taking the address of
//! the caller's interface pointer as its receiver. Each export validates the
//! receiver, makes exactly one call into Slang and hands back what Slang
//! returned.

#![allow(non_snake_case)]
#![allow(non_camel_case_types)]
#![allow(clippy::missing_safety_doc)]

macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug-logs")]
        log::trace!($($arg)*)
    };
}

macro_rules! debug_log_return {
    ($tag:literal, $fmt:literal, $expr:expr) => {{
        #[cfg(feature = "debug-logs")]
        {
            let result = $expr;
            log::trace!(concat!($tag, " -> ", $fmt), result);
            result
        }
        #[cfg(not(feature = "debug-logs"))]
        {
            $expr
        }
    }};
}

pub mod handle;
pub mod interfaces;
pub mod loader;
pub mod result;
pub mod types;

mod global;
mod reflection;

#[cfg(feature = "mock")]
pub mod mock;

use thiserror::Error;

pub use global::{GlobalSession_create, GlobalSession_createWithDesc, Slang_shutdown};
pub use interfaces::*;
pub use loader::{LIBRARY_ENV, SlangApi, api, install_api, library_path, loaded_api};
pub use reflection::*;
pub use result::*;
pub use types::*;

#[derive(Error, Debug)]
pub enum SlangShimError {
    #[error("Failed to load Slang library: {0}")]
    LoadError(String),
    #[error("Function not found: {0}")]
    FunctionNotFound(String),
    #[error("A Slang API table is already installed")]
    AlreadyInstalled,
}

pub type Result<T> = std::result::Result<T, SlangShimError>;
