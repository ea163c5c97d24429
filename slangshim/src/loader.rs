//! Locates the Slang shared library and resolves its exported C functions
//!
//! COM methods dispatch through each object's own vtable; only the entry
//! points below need the library itself. They are resolved together, once,
//! the first time any export needs one.

use crate::interfaces::IGlobalSession;
use crate::types::*;
use crate::{Result, SlangShimError};
use libloading::{Library, library_filename};
use std::ffi::{OsString, c_char, c_float, c_int};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable overriding the Slang library path
pub const LIBRARY_ENV: &str = "SLANGSHIM_LIBRARY";

// Base names Slang has shipped its compiler library under
const LIBRARY_NAMES: &[&str] = &["slang", "slang-compiler"];

macro_rules! slang_api {
    ($(fn $name:ident($($arg:ident: $argty:ty),* $(,)?) $(-> $ret:ty)?;)*) => {
        /// Slang's exported C entry points
        #[derive(Clone, Copy)]
        pub struct SlangApi {
            $(pub $name: unsafe extern "C" fn($($argty),*) $(-> $ret)?,)*
        }

        impl SlangApi {
            unsafe fn resolve(library: &Library) -> Result<Self> {
                unsafe {
                    Ok(SlangApi {
                        $($name: *library
                            .get::<unsafe extern "C" fn($($argty),*) $(-> $ret)?>(
                                concat!(stringify!($name), "\0").as_bytes(),
                            )
                            .map_err(|_| SlangShimError::FunctionNotFound(stringify!($name).to_string()))?,)*
                    })
                }
            }
        }
    };
}

slang_api! {
    fn slang_createGlobalSession(api_version: SlangInt, out_global_session: *mut *mut IGlobalSession) -> SlangResult;
    fn slang_createGlobalSession2(desc: *const SlangGlobalSessionDesc, out_global_session: *mut *mut IGlobalSession) -> SlangResult;
    fn slang_shutdown();

    fn spReflection_GetParameterCount(reflection: *mut SlangReflection) -> u32;
    fn spReflection_GetParameterByIndex(reflection: *mut SlangReflection, index: u32) -> *mut SlangReflectionVariableLayout;
    fn spReflection_getEntryPointCount(reflection: *mut SlangReflection) -> SlangUInt;
    fn spReflection_getEntryPointByIndex(reflection: *mut SlangReflection, index: SlangUInt) -> *mut SlangReflectionEntryPoint;
    fn spReflection_findEntryPointByName(reflection: *mut SlangReflection, name: *const c_char) -> *mut SlangReflectionEntryPoint;
    fn spReflection_getGlobalParamsTypeLayout(reflection: *mut SlangReflection) -> *mut SlangReflectionTypeLayout;
    fn spReflection_getGlobalParamsVarLayout(reflection: *mut SlangReflection) -> *mut SlangReflectionVariableLayout;
    fn spReflection_FindTypeByName(reflection: *mut SlangReflection, name: *const c_char) -> *mut SlangReflectionType;

    fn spReflectionEntryPoint_getName(entry_point: *mut SlangReflectionEntryPoint) -> *const c_char;
    fn spReflectionEntryPoint_getStage(entry_point: *mut SlangReflectionEntryPoint) -> SlangStage;
    fn spReflectionEntryPoint_getParameterCount(entry_point: *mut SlangReflectionEntryPoint) -> u32;
    fn spReflectionEntryPoint_getParameterByIndex(entry_point: *mut SlangReflectionEntryPoint, index: u32) -> *mut SlangReflectionVariableLayout;
    fn spReflectionEntryPoint_getVarLayout(entry_point: *mut SlangReflectionEntryPoint) -> *mut SlangReflectionVariableLayout;
    fn spReflectionEntryPoint_getResultVarLayout(entry_point: *mut SlangReflectionEntryPoint) -> *mut SlangReflectionVariableLayout;
    fn spReflectionEntryPoint_getComputeThreadGroupSize(entry_point: *mut SlangReflectionEntryPoint, axis_count: SlangUInt, out_size_along_axis: *mut SlangUInt);

    fn spReflectionFunction_GetName(function: *mut SlangReflectionFunction) -> *const c_char;

    fn spReflectionType_GetKind(type_: *mut SlangReflectionType) -> SlangTypeKind;
    fn spReflectionType_GetFieldCount(type_: *mut SlangReflectionType) -> u32;
    fn spReflectionType_GetFieldByIndex(type_: *mut SlangReflectionType, index: u32) -> *mut SlangReflectionVariable;
    fn spReflectionType_GetElementCount(type_: *mut SlangReflectionType) -> usize;
    fn spReflectionType_GetElementType(type_: *mut SlangReflectionType) -> *mut SlangReflectionType;
    fn spReflectionType_GetRowCount(type_: *mut SlangReflectionType) -> u32;
    fn spReflectionType_GetColumnCount(type_: *mut SlangReflectionType) -> u32;
    fn spReflectionType_GetScalarType(type_: *mut SlangReflectionType) -> SlangScalarType;
    fn spReflectionType_GetResourceShape(type_: *mut SlangReflectionType) -> SlangResourceShape;
    fn spReflectionType_GetResourceAccess(type_: *mut SlangReflectionType) -> SlangResourceAccess;
    fn spReflectionType_GetResourceResultType(type_: *mut SlangReflectionType) -> *mut SlangReflectionType;
    fn spReflectionType_GetName(type_: *mut SlangReflectionType) -> *const c_char;
    fn spReflectionType_GetUserAttributeCount(type_: *mut SlangReflectionType) -> u32;
    fn spReflectionType_GetUserAttribute(type_: *mut SlangReflectionType, index: u32) -> *mut SlangReflectionUserAttribute;
    fn spReflectionType_FindUserAttributeByName(type_: *mut SlangReflectionType, name: *const c_char) -> *mut SlangReflectionUserAttribute;

    fn spReflectionTypeLayout_GetType(type_layout: *mut SlangReflectionTypeLayout) -> *mut SlangReflectionType;
    fn spReflectionTypeLayout_getKind(type_layout: *mut SlangReflectionTypeLayout) -> SlangTypeKind;
    fn spReflectionTypeLayout_GetSize(type_layout: *mut SlangReflectionTypeLayout, category: SlangParameterCategory) -> usize;
    fn spReflectionTypeLayout_GetStride(type_layout: *mut SlangReflectionTypeLayout, category: SlangParameterCategory) -> usize;
    fn spReflectionTypeLayout_getAlignment(type_layout: *mut SlangReflectionTypeLayout, category: SlangParameterCategory) -> i32;
    fn spReflectionTypeLayout_GetFieldByIndex(type_layout: *mut SlangReflectionTypeLayout, index: u32) -> *mut SlangReflectionVariableLayout;
    fn spReflectionTypeLayout_findFieldIndexByName(type_layout: *mut SlangReflectionTypeLayout, name_begin: *const c_char, name_end: *const c_char) -> SlangInt;
    fn spReflectionTypeLayout_GetElementStride(type_layout: *mut SlangReflectionTypeLayout, category: SlangParameterCategory) -> usize;
    fn spReflectionTypeLayout_GetElementTypeLayout(type_layout: *mut SlangReflectionTypeLayout) -> *mut SlangReflectionTypeLayout;
    fn spReflectionTypeLayout_GetElementVarLayout(type_layout: *mut SlangReflectionTypeLayout) -> *mut SlangReflectionVariableLayout;
    fn spReflectionTypeLayout_getContainerVarLayout(type_layout: *mut SlangReflectionTypeLayout) -> *mut SlangReflectionVariableLayout;
    fn spReflectionTypeLayout_GetParameterCategory(type_layout: *mut SlangReflectionTypeLayout) -> SlangParameterCategory;
    fn spReflectionTypeLayout_GetCategoryCount(type_layout: *mut SlangReflectionTypeLayout) -> u32;
    fn spReflectionTypeLayout_GetCategoryByIndex(type_layout: *mut SlangReflectionTypeLayout, index: u32) -> SlangParameterCategory;

    fn spReflectionVariable_GetName(variable: *mut SlangReflectionVariable) -> *const c_char;
    fn spReflectionVariable_GetType(variable: *mut SlangReflectionVariable) -> *mut SlangReflectionType;
    fn spReflectionVariable_GetUserAttributeCount(variable: *mut SlangReflectionVariable) -> u32;
    fn spReflectionVariable_GetUserAttribute(variable: *mut SlangReflectionVariable, index: u32) -> *mut SlangReflectionUserAttribute;
    fn spReflectionVariable_FindUserAttributeByName(variable: *mut SlangReflectionVariable, global_session: *mut IGlobalSession, name: *const c_char) -> *mut SlangReflectionUserAttribute;

    fn spReflectionVariableLayout_GetVariable(var_layout: *mut SlangReflectionVariableLayout) -> *mut SlangReflectionVariable;
    fn spReflectionVariableLayout_GetTypeLayout(var_layout: *mut SlangReflectionVariableLayout) -> *mut SlangReflectionTypeLayout;
    fn spReflectionVariableLayout_GetOffset(var_layout: *mut SlangReflectionVariableLayout, category: SlangParameterCategory) -> usize;
    fn spReflectionVariableLayout_GetSpace(var_layout: *mut SlangReflectionVariableLayout, category: SlangParameterCategory) -> usize;
    fn spReflectionVariableLayout_GetSemanticName(var_layout: *mut SlangReflectionVariableLayout) -> *const c_char;
    fn spReflectionVariableLayout_GetSemanticIndex(var_layout: *mut SlangReflectionVariableLayout) -> usize;
    fn spReflectionVariableLayout_getStage(var_layout: *mut SlangReflectionVariableLayout) -> SlangStage;
    fn spReflectionParameter_GetBindingIndex(parameter: *mut SlangReflectionVariableLayout) -> u32;
    fn spReflectionParameter_GetBindingSpace(parameter: *mut SlangReflectionVariableLayout) -> u32;

    fn spReflectionUserAttribute_GetName(attribute: *mut SlangReflectionUserAttribute) -> *const c_char;
    fn spReflectionUserAttribute_GetArgumentCount(attribute: *mut SlangReflectionUserAttribute) -> u32;
    fn spReflectionUserAttribute_GetArgumentType(attribute: *mut SlangReflectionUserAttribute, index: u32) -> *mut SlangReflectionType;
    fn spReflectionUserAttribute_GetArgumentValueInt(attribute: *mut SlangReflectionUserAttribute, index: u32, out_value: *mut c_int) -> SlangResult;
    fn spReflectionUserAttribute_GetArgumentValueFloat(attribute: *mut SlangReflectionUserAttribute, index: u32, out_value: *mut c_float) -> SlangResult;
    fn spReflectionUserAttribute_GetArgumentValueString(attribute: *mut SlangReflectionUserAttribute, index: u32, out_size: *mut usize) -> *const c_char;
}

struct LoadedApi {
    // Keeps the table's code mapped; None for installed tables
    _library: Option<Library>,
    api: SlangApi,
}

static STATE: OnceLock<Result<LoadedApi>> = OnceLock::new();

/// The process-wide entry point table, loading Slang on first use.
///
/// A failed load is remembered; later calls report the same error.
pub fn api() -> std::result::Result<&'static SlangApi, &'static SlangShimError> {
    match STATE.get_or_init(load) {
        Ok(loaded) => Ok(&loaded.api),
        Err(e) => Err(e),
    }
}

/// The entry point table if a library was already loaded or installed.
///
/// Never triggers a load.
pub fn loaded_api() -> Option<&'static SlangApi> {
    STATE.get().and_then(|state| state.as_ref().ok()).map(|loaded| &loaded.api)
}

/// Installs a caller-provided table instead of loading the library.
///
/// Must run before the first export that needs the library.
pub fn install_api(api: SlangApi) -> Result<()> {
    STATE
        .set(Ok(LoadedApi {
            _library: None,
            api,
        }))
        .map_err(|_| SlangShimError::AlreadyInstalled)
}

fn candidate_names() -> impl Iterator<Item = OsString> {
    LIBRARY_NAMES.iter().map(library_filename)
}

/// Where the library will be loaded from: `SLANGSHIM_LIBRARY`, else the
/// first platform library name found next to the executable, else the bare
/// name for the system search path.
pub fn library_path() -> PathBuf {
    if let Some(path) = std::env::var_os(LIBRARY_ENV) {
        return PathBuf::from(path);
    }

    if let Ok(exe) = std::env::current_exe() {
        for name in candidate_names() {
            let path = exe.with_file_name(&name);
            if path.exists() {
                return path;
            }
        }
    }

    PathBuf::from(library_filename(LIBRARY_NAMES[0]))
}

/// Bare library names left to try after `tried` failed to open
fn fallback_names(tried: &Path) -> impl Iterator<Item = OsString> {
    let tried = tried.as_os_str().to_os_string();
    candidate_names().filter(move |name| *name != tried)
}

fn open(path: &Path) -> Result<Library> {
    unsafe { Library::new(path) }
        .map_err(|e| SlangShimError::LoadError(format!("{}: {}", path.display(), e)))
}

fn load() -> Result<LoadedApi> {
    let path = library_path();
    log::debug!("Loading Slang from {}", path.display());

    let library = match open(&path) {
        Ok(library) => library,
        // Fall back to every name Slang ships under, on the system search path
        Err(first) if std::env::var_os(LIBRARY_ENV).is_none() => fallback_names(&path)
            .find_map(|name| open(Path::new(&name)).ok())
            .ok_or(first)?,
        Err(e) => return Err(e),
    };

    let api = unsafe { SlangApi::resolve(&library) }.inspect_err(|e| log::warn!("{e}"))?;
    log::debug!("Resolved Slang entry points");

    Ok(LoadedApi {
        _library: Some(library),
        api,
    })
}
