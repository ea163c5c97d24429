//! Reflection exports
//!
//! Reflection nodes are plain pointers into the program layout owned by a
//! component type. Slang exposes them through `spReflection*` C functions,
//! so each export here resolves through the process-wide [`SlangApi`] table.

use crate::handle::{Sentinel, receiver};
use crate::interfaces::IGlobalSession;
use crate::loader::{SlangApi, api};
use crate::result::{SLANG_E_INVALID_HANDLE, SLANG_E_NOT_AVAILABLE};
use crate::types::*;
use std::ffi::{c_char, c_float, c_int};

macro_rules! reflection_exports {
    (@invalid $ret:ty) => { <$ret as Sentinel>::sentinel() };
    (@invalid $ret:ty, status) => { SLANG_E_INVALID_HANDLE };
    (@unavailable $ret:ty) => { <$ret as Sentinel>::sentinel() };
    (@unavailable $ret:ty, status) => { SLANG_E_NOT_AVAILABLE };

    ($(
        $family:ident($node:ty) {
            $(
                $(#[$meta:meta])*
                fn $op:ident($($arg:ident: $argty:ty),* $(,)?) -> $ret:ty = $entry:ident $(=> $status:ident)?;
            )*
        }
    )*) => {
        paste::paste! {
            $($(
                $(#[$meta])*
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<$family _ $op>](this: *mut *mut $node $(, $arg: $argty)*) -> $ret {
                    unsafe {
                        let Some(node) = receiver(this, stringify!([<$family _ $op>])) else {
                            return reflection_exports!(@invalid $ret $(, $status)?);
                        };
                        debug_log!(concat!("[", stringify!([<$family _ $op>]), "] this={:?}"), node);
                        match api() {
                            Ok(api) => (api.$entry)(node $(, $arg)*),
                            Err(_) => reflection_exports!(@unavailable $ret $(, $status)?),
                        }
                    }
                }
            )*)*
        }
    };
}

reflection_exports! {
    ShaderReflection(SlangReflection) {
        fn getParameterCount() -> u32 = spReflection_GetParameterCount;
        fn getParameterByIndex(index: u32) -> *mut SlangReflectionVariableLayout = spReflection_GetParameterByIndex;
        fn getEntryPointCount() -> SlangUInt = spReflection_getEntryPointCount;
        fn getEntryPointByIndex(index: SlangUInt) -> *mut SlangReflectionEntryPoint = spReflection_getEntryPointByIndex;
        fn findEntryPointByName(name: *const c_char) -> *mut SlangReflectionEntryPoint = spReflection_findEntryPointByName;
        fn getGlobalParamsTypeLayout() -> *mut SlangReflectionTypeLayout = spReflection_getGlobalParamsTypeLayout;
        fn getGlobalParamsVarLayout() -> *mut SlangReflectionVariableLayout = spReflection_getGlobalParamsVarLayout;
        fn findTypeByName(name: *const c_char) -> *mut SlangReflectionType = spReflection_FindTypeByName;
    }

    EntryPointReflection(SlangReflectionEntryPoint) {
        fn getName() -> *const c_char = spReflectionEntryPoint_getName;
        fn getStage() -> SlangStage = spReflectionEntryPoint_getStage;
        fn getParameterCount() -> u32 = spReflectionEntryPoint_getParameterCount;
        fn getParameterByIndex(index: u32) -> *mut SlangReflectionVariableLayout = spReflectionEntryPoint_getParameterByIndex;
        fn getVarLayout() -> *mut SlangReflectionVariableLayout = spReflectionEntryPoint_getVarLayout;
        fn getResultVarLayout() -> *mut SlangReflectionVariableLayout = spReflectionEntryPoint_getResultVarLayout;
        /// Writes `axis_count` sizes; the output is untouched when the
        /// receiver is invalid.
        fn getComputeThreadGroupSize(axis_count: SlangUInt, out_size_along_axis: *mut SlangUInt) -> () = spReflectionEntryPoint_getComputeThreadGroupSize;
    }

    FunctionReflection(SlangReflectionFunction) {
        fn getName() -> *const c_char = spReflectionFunction_GetName;
    }

    TypeReflection(SlangReflectionType) {
        fn getKind() -> SlangTypeKind = spReflectionType_GetKind;
        fn getFieldCount() -> u32 = spReflectionType_GetFieldCount;
        fn getFieldByIndex(index: u32) -> *mut SlangReflectionVariable = spReflectionType_GetFieldByIndex;
        fn getElementCount() -> usize = spReflectionType_GetElementCount;
        fn getElementType() -> *mut SlangReflectionType = spReflectionType_GetElementType;
        fn getRowCount() -> u32 = spReflectionType_GetRowCount;
        fn getColumnCount() -> u32 = spReflectionType_GetColumnCount;
        fn getScalarType() -> SlangScalarType = spReflectionType_GetScalarType;
        fn getResourceShape() -> SlangResourceShape = spReflectionType_GetResourceShape;
        fn getResourceAccess() -> SlangResourceAccess = spReflectionType_GetResourceAccess;
        fn getResourceResultType() -> *mut SlangReflectionType = spReflectionType_GetResourceResultType;
        fn getName() -> *const c_char = spReflectionType_GetName;
        fn getUserAttributeCount() -> u32 = spReflectionType_GetUserAttributeCount;
        fn getUserAttributeByIndex(index: u32) -> *mut SlangReflectionUserAttribute = spReflectionType_GetUserAttribute;
        fn findUserAttributeByName(name: *const c_char) -> *mut SlangReflectionUserAttribute = spReflectionType_FindUserAttributeByName;
    }

    TypeLayoutReflection(SlangReflectionTypeLayout) {
        fn getKind() -> SlangTypeKind = spReflectionTypeLayout_getKind;
        fn getType() -> *mut SlangReflectionType = spReflectionTypeLayout_GetType;
        fn getFieldByIndex(index: u32) -> *mut SlangReflectionVariableLayout = spReflectionTypeLayout_GetFieldByIndex;
        fn getElementTypeLayout() -> *mut SlangReflectionTypeLayout = spReflectionTypeLayout_GetElementTypeLayout;
        fn getElementVarLayout() -> *mut SlangReflectionVariableLayout = spReflectionTypeLayout_GetElementVarLayout;
        fn getContainerVarLayout() -> *mut SlangReflectionVariableLayout = spReflectionTypeLayout_getContainerVarLayout;
        fn getSize(category: SlangParameterCategory) -> usize = spReflectionTypeLayout_GetSize;
        fn getStride(category: SlangParameterCategory) -> usize = spReflectionTypeLayout_GetStride;
        fn getAlignment(category: SlangParameterCategory) -> i32 = spReflectionTypeLayout_getAlignment;
        fn getElementStride(category: SlangParameterCategory) -> usize = spReflectionTypeLayout_GetElementStride;
        fn getParameterCategory() -> SlangParameterCategory = spReflectionTypeLayout_GetParameterCategory;
        fn getCategoryCount() -> u32 = spReflectionTypeLayout_GetCategoryCount;
        fn getCategoryByIndex(index: u32) -> SlangParameterCategory = spReflectionTypeLayout_GetCategoryByIndex;
    }

    VariableReflection(SlangReflectionVariable) {
        fn getName() -> *const c_char = spReflectionVariable_GetName;
        fn getType() -> *mut SlangReflectionType = spReflectionVariable_GetType;
        fn getUserAttributeCount() -> u32 = spReflectionVariable_GetUserAttributeCount;
        fn getUserAttributeByIndex(index: u32) -> *mut SlangReflectionUserAttribute = spReflectionVariable_GetUserAttribute;
        fn findUserAttributeByName(global_session: *mut IGlobalSession, name: *const c_char) -> *mut SlangReflectionUserAttribute = spReflectionVariable_FindUserAttributeByName;
    }

    VariableLayoutReflection(SlangReflectionVariableLayout) {
        fn getVariable() -> *mut SlangReflectionVariable = spReflectionVariableLayout_GetVariable;
        fn getTypeLayout() -> *mut SlangReflectionTypeLayout = spReflectionVariableLayout_GetTypeLayout;
        fn getOffset(category: SlangParameterCategory) -> usize = spReflectionVariableLayout_GetOffset;
        fn getSpace(category: SlangParameterCategory) -> usize = spReflectionVariableLayout_GetSpace;
        fn getBindingIndex() -> u32 = spReflectionParameter_GetBindingIndex;
        fn getBindingSpace() -> u32 = spReflectionParameter_GetBindingSpace;
        fn getSemanticName() -> *const c_char = spReflectionVariableLayout_GetSemanticName;
        fn getSemanticIndex() -> usize = spReflectionVariableLayout_GetSemanticIndex;
        fn getStage() -> SlangStage = spReflectionVariableLayout_getStage;
    }

    UserAttribute(SlangReflectionUserAttribute) {
        fn getName() -> *const c_char = spReflectionUserAttribute_GetName;
        fn getArgumentCount() -> u32 = spReflectionUserAttribute_GetArgumentCount;
        fn getArgumentType(index: u32) -> *mut SlangReflectionType = spReflectionUserAttribute_GetArgumentType;
        fn getArgumentValueInt(index: u32, out_value: *mut c_int) -> SlangResult = spReflectionUserAttribute_GetArgumentValueInt => status;
        fn getArgumentValueFloat(index: u32, out_value: *mut c_float) -> SlangResult = spReflectionUserAttribute_GetArgumentValueFloat => status;
        /// The string is not NUL-terminated; its length goes to `out_size`
        fn getArgumentValueString(index: u32, out_size: *mut usize) -> *const c_char = spReflectionUserAttribute_GetArgumentValueString;
    }
}

/// Calls `first` on the receiver, then `then` on the intermediate node,
/// stopping at the sentinel if either step comes back empty.
unsafe fn through<A, B, R: Sentinel>(
    this: *mut *mut A,
    op: &str,
    first: impl FnOnce(&SlangApi, *mut A) -> *mut B,
    then: impl FnOnce(&SlangApi, *mut B) -> R,
) -> R {
    let Some(node) = (unsafe { receiver(this, op) }) else {
        return R::sentinel();
    };
    debug_log!("[{}] this={:?}", op, node);
    let Ok(api) = api() else {
        return R::sentinel();
    };
    let inner = first(api, node);
    if inner.is_null() {
        return R::sentinel();
    }
    then(api, inner)
}

/// Field count of the layout's type
#[unsafe(no_mangle)]
pub unsafe extern "C" fn TypeLayoutReflection_getFieldCount(this: *mut *mut SlangReflectionTypeLayout) -> u32 {
    unsafe {
        through(
            this,
            "TypeLayoutReflection_getFieldCount",
            |api, layout| (api.spReflectionTypeLayout_GetType)(layout),
            |api, ty| (api.spReflectionType_GetFieldCount)(ty),
        )
    }
}

/// Name of the layout's type
#[unsafe(no_mangle)]
pub unsafe extern "C" fn TypeLayoutReflection_getName(this: *mut *mut SlangReflectionTypeLayout) -> *const c_char {
    unsafe {
        through(
            this,
            "TypeLayoutReflection_getName",
            |api, layout| (api.spReflectionTypeLayout_GetType)(layout),
            |api, ty| (api.spReflectionType_GetName)(ty),
        )
    }
}

/// Index of the field named by `[name_begin, name_end)`, or -1.
/// A null `name_end` means `name_begin` is NUL-terminated.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn TypeLayoutReflection_findFieldIndexByName(
    this: *mut *mut SlangReflectionTypeLayout,
    name_begin: *const c_char,
    name_end: *const c_char,
) -> SlangInt {
    unsafe {
        let Some(layout) = receiver(this, "TypeLayoutReflection_findFieldIndexByName") else {
            return -1;
        };
        debug_log!("[TypeLayoutReflection_findFieldIndexByName] this={:?}", layout);
        match api() {
            Ok(api) => (api.spReflectionTypeLayout_findFieldIndexByName)(layout, name_begin, name_end),
            Err(_) => -1,
        }
    }
}

/// Type layout of the entry point's parameter block
#[unsafe(no_mangle)]
pub unsafe extern "C" fn EntryPointReflection_getTypeLayout(
    this: *mut *mut SlangReflectionEntryPoint,
) -> *mut SlangReflectionTypeLayout {
    unsafe {
        through(
            this,
            "EntryPointReflection_getTypeLayout",
            |api, entry_point| (api.spReflectionEntryPoint_getVarLayout)(entry_point),
            |api, var_layout| (api.spReflectionVariableLayout_GetTypeLayout)(var_layout),
        )
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn VariableLayoutReflection_getName(this: *mut *mut SlangReflectionVariableLayout) -> *const c_char {
    unsafe {
        through(
            this,
            "VariableLayoutReflection_getName",
            |api, layout| (api.spReflectionVariableLayout_GetVariable)(layout),
            |api, var| (api.spReflectionVariable_GetName)(var),
        )
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn VariableLayoutReflection_getUserAttributeCount(
    this: *mut *mut SlangReflectionVariableLayout,
) -> u32 {
    unsafe {
        through(
            this,
            "VariableLayoutReflection_getUserAttributeCount",
            |api, layout| (api.spReflectionVariableLayout_GetVariable)(layout),
            |api, var| (api.spReflectionVariable_GetUserAttributeCount)(var),
        )
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn VariableLayoutReflection_getUserAttributeByIndex(
    this: *mut *mut SlangReflectionVariableLayout,
    index: u32,
) -> *mut SlangReflectionUserAttribute {
    unsafe {
        through(
            this,
            "VariableLayoutReflection_getUserAttributeByIndex",
            |api, layout| (api.spReflectionVariableLayout_GetVariable)(layout),
            |api, var| (api.spReflectionVariable_GetUserAttribute)(var, index),
        )
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn VariableLayoutReflection_findUserAttributeByName(
    this: *mut *mut SlangReflectionVariableLayout,
    global_session: *mut IGlobalSession,
    name: *const c_char,
) -> *mut SlangReflectionUserAttribute {
    unsafe {
        through(
            this,
            "VariableLayoutReflection_findUserAttributeByName",
            |api, layout| (api.spReflectionVariableLayout_GetVariable)(layout),
            |api, var| (api.spReflectionVariable_FindUserAttributeByName)(var, global_session, name),
        )
    }
}
