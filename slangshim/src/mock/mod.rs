//! In-process stand-in for the Slang library
//!
//! Enabled by the `mock` feature. [`install`] puts a function table backed by
//! Rust objects in place of the real library, so every export can be
//! exercised without Slang installed. Modules are described up front with
//! [`register_module`] and "loaded" by name afterwards.
//!
//! ```ignore
//! slangshim::mock::register_module(
//!     MockModule::new("compute").entry_point(MockEntryPoint::new("main", SLANG_STAGE_COMPUTE)),
//! );
//! slangshim::mock::install();
//! ```

mod model;
mod objects;
mod reflect;

pub use model::{MockArg, MockAttribute, MockEntryPoint, MockModule, MockType, MockVar};

use crate::loader::{SlangApi, install_api};
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

static MODULES: OnceLock<RwLock<HashMap<String, MockModule>>> = OnceLock::new();

fn modules() -> &'static RwLock<HashMap<String, MockModule>> {
    MODULES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Makes `module` loadable by its name, replacing any earlier registration.
///
/// Sessions that already loaded a module of that name keep their copy.
pub fn register_module(module: MockModule) {
    let name = module.name_str().to_string();
    log::debug!("Registering mock module {name}");
    modules()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, module);
}

/// A blob holding `data`, with one reference owned by the caller
pub fn blob(data: &[u8]) -> *mut crate::interfaces::ISlangBlob {
    objects::new_blob(data.to_vec())
}

pub(crate) fn lookup_module(name: &str) -> Option<MockModule> {
    modules()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

macro_rules! api_table {
    (objects: [$($object:ident),* $(,)?], reflect: [$($reflect:ident),* $(,)?] $(,)?) => {
        SlangApi {
            $($object: objects::$object,)*
            $($reflect: reflect::$reflect,)*
        }
    };
}

/// The fake library's entry point table
pub fn api_table() -> SlangApi {
    api_table! {
        objects: [slang_createGlobalSession, slang_createGlobalSession2, slang_shutdown],
        reflect: [
            spReflection_GetParameterCount,
            spReflection_GetParameterByIndex,
            spReflection_getEntryPointCount,
            spReflection_getEntryPointByIndex,
            spReflection_findEntryPointByName,
            spReflection_getGlobalParamsTypeLayout,
            spReflection_getGlobalParamsVarLayout,
            spReflection_FindTypeByName,
            spReflectionEntryPoint_getName,
            spReflectionEntryPoint_getStage,
            spReflectionEntryPoint_getParameterCount,
            spReflectionEntryPoint_getParameterByIndex,
            spReflectionEntryPoint_getVarLayout,
            spReflectionEntryPoint_getResultVarLayout,
            spReflectionEntryPoint_getComputeThreadGroupSize,
            spReflectionFunction_GetName,
            spReflectionType_GetKind,
            spReflectionType_GetFieldCount,
            spReflectionType_GetFieldByIndex,
            spReflectionType_GetElementCount,
            spReflectionType_GetElementType,
            spReflectionType_GetRowCount,
            spReflectionType_GetColumnCount,
            spReflectionType_GetScalarType,
            spReflectionType_GetResourceShape,
            spReflectionType_GetResourceAccess,
            spReflectionType_GetResourceResultType,
            spReflectionType_GetName,
            spReflectionType_GetUserAttributeCount,
            spReflectionType_GetUserAttribute,
            spReflectionType_FindUserAttributeByName,
            spReflectionTypeLayout_GetType,
            spReflectionTypeLayout_getKind,
            spReflectionTypeLayout_GetSize,
            spReflectionTypeLayout_GetStride,
            spReflectionTypeLayout_getAlignment,
            spReflectionTypeLayout_GetFieldByIndex,
            spReflectionTypeLayout_findFieldIndexByName,
            spReflectionTypeLayout_GetElementStride,
            spReflectionTypeLayout_GetElementTypeLayout,
            spReflectionTypeLayout_GetElementVarLayout,
            spReflectionTypeLayout_getContainerVarLayout,
            spReflectionTypeLayout_GetParameterCategory,
            spReflectionTypeLayout_GetCategoryCount,
            spReflectionTypeLayout_GetCategoryByIndex,
            spReflectionVariable_GetName,
            spReflectionVariable_GetType,
            spReflectionVariable_GetUserAttributeCount,
            spReflectionVariable_GetUserAttribute,
            spReflectionVariable_FindUserAttributeByName,
            spReflectionVariableLayout_GetVariable,
            spReflectionVariableLayout_GetTypeLayout,
            spReflectionVariableLayout_GetOffset,
            spReflectionVariableLayout_GetSpace,
            spReflectionVariableLayout_GetSemanticName,
            spReflectionVariableLayout_GetSemanticIndex,
            spReflectionVariableLayout_getStage,
            spReflectionParameter_GetBindingIndex,
            spReflectionParameter_GetBindingSpace,
            spReflectionUserAttribute_GetName,
            spReflectionUserAttribute_GetArgumentCount,
            spReflectionUserAttribute_GetArgumentType,
            spReflectionUserAttribute_GetArgumentValueInt,
            spReflectionUserAttribute_GetArgumentValueFloat,
            spReflectionUserAttribute_GetArgumentValueString,
        ],
    }
}

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Installs the fake table for this process. Idempotent; returns false if a
/// real library was loaded first.
pub fn install() -> bool {
    *INSTALLED.get_or_init(|| match install_api(api_table()) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("mock not installed: {e}");
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_modules_are_found_by_name() {
        register_module(MockModule::new("registry_check"));
        assert!(lookup_module("registry_check").is_some());
        assert!(lookup_module("never_registered").is_none());
    }

    #[test]
    fn install_is_idempotent() {
        assert!(install());
        assert!(install());
    }
}
