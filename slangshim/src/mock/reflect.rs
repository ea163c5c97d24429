//! `spReflection*` functions over the in-memory model

use super::model::*;
use crate::interfaces::IGlobalSession;
use crate::result::{SLANG_E_INVALID_ARG, SLANG_OK};
use crate::types::*;
use std::ffi::{CStr, CString, c_char, c_float, c_int};
use std::ptr;

// ============ Node casts ============

unsafe fn node<'a, N, T>(ptr: *mut T) -> Option<&'a N> {
    unsafe { ptr.cast::<N>().as_ref() }
}

fn handle<N, T>(node: &N) -> *mut T {
    node as *const N as *mut T
}

fn opt_handle<N, T>(node: Option<&N>) -> *mut T {
    node.map_or(ptr::null_mut(), handle)
}

fn name_ptr(name: &Option<CString>) -> *const c_char {
    name.as_ref().map_or(ptr::null(), |n| n.as_ptr())
}

unsafe fn program<'a>(p: *mut SlangReflection) -> Option<&'a MockProgram> {
    unsafe { node(p) }
}

unsafe fn entry_point<'a>(p: *mut SlangReflectionEntryPoint) -> Option<&'a MockEntryPoint> {
    unsafe { node(p) }
}

unsafe fn ty<'a, T>(p: *mut T) -> Option<&'a MockType> {
    unsafe { node(p) }
}

unsafe fn var<'a, T>(p: *mut T) -> Option<&'a MockVar> {
    unsafe { node(p) }
}

unsafe fn attribute<'a>(p: *mut SlangReflectionUserAttribute) -> Option<&'a MockAttribute> {
    unsafe { node(p) }
}

unsafe fn find_attribute<'a>(attributes: &'a [MockAttribute], name: *const c_char) -> Option<&'a MockAttribute> {
    if name.is_null() {
        return None;
    }
    let name = unsafe { CStr::from_ptr(name) };
    attributes.iter().find(|a| a.name.as_c_str() == name)
}

// ============ Program ============

pub(crate) unsafe extern "C" fn spReflection_GetParameterCount(p: *mut SlangReflection) -> u32 {
    unsafe { program(p) }.map_or(0, |p| p.globals.ty.fields.len() as u32)
}

pub(crate) unsafe extern "C" fn spReflection_GetParameterByIndex(
    p: *mut SlangReflection,
    index: u32,
) -> *mut SlangReflectionVariableLayout {
    opt_handle(unsafe { program(p) }.and_then(|p| p.globals.ty.fields.get(index as usize)))
}

pub(crate) unsafe extern "C" fn spReflection_getEntryPointCount(p: *mut SlangReflection) -> SlangUInt {
    unsafe { program(p) }.map_or(0, |p| p.entry_points.len())
}

pub(crate) unsafe extern "C" fn spReflection_getEntryPointByIndex(
    p: *mut SlangReflection,
    index: SlangUInt,
) -> *mut SlangReflectionEntryPoint {
    opt_handle(unsafe { program(p) }.and_then(|p| p.entry_points.get(index)))
}

pub(crate) unsafe extern "C" fn spReflection_findEntryPointByName(
    p: *mut SlangReflection,
    name: *const c_char,
) -> *mut SlangReflectionEntryPoint {
    if name.is_null() {
        return ptr::null_mut();
    }
    let name = unsafe { CStr::from_ptr(name) };
    opt_handle(unsafe { program(p) }.and_then(|p| p.entry_points.iter().find(|e| e.name.as_c_str() == name)))
}

pub(crate) unsafe extern "C" fn spReflection_getGlobalParamsTypeLayout(
    p: *mut SlangReflection,
) -> *mut SlangReflectionTypeLayout {
    opt_handle(unsafe { program(p) }.map(|p| &p.globals.ty))
}

pub(crate) unsafe extern "C" fn spReflection_getGlobalParamsVarLayout(
    p: *mut SlangReflection,
) -> *mut SlangReflectionVariableLayout {
    opt_handle(unsafe { program(p) }.map(|p| &p.globals))
}

pub(crate) unsafe extern "C" fn spReflection_FindTypeByName(
    p: *mut SlangReflection,
    name: *const c_char,
) -> *mut SlangReflectionType {
    if name.is_null() {
        return ptr::null_mut();
    }
    let name = unsafe { CStr::from_ptr(name) };
    opt_handle(unsafe { program(p) }.and_then(|p| p.find_type(name.to_bytes())))
}

// ============ Entry points & functions ============

pub(crate) unsafe extern "C" fn spReflectionEntryPoint_getName(e: *mut SlangReflectionEntryPoint) -> *const c_char {
    unsafe { entry_point(e) }.map_or(ptr::null(), |e| e.name.as_ptr())
}

pub(crate) unsafe extern "C" fn spReflectionEntryPoint_getStage(e: *mut SlangReflectionEntryPoint) -> SlangStage {
    unsafe { entry_point(e) }.map_or(SLANG_STAGE_NONE, |e| e.stage)
}

pub(crate) unsafe extern "C" fn spReflectionEntryPoint_getParameterCount(e: *mut SlangReflectionEntryPoint) -> u32 {
    unsafe { entry_point(e) }.map_or(0, |e| e.params.ty.fields.len() as u32)
}

pub(crate) unsafe extern "C" fn spReflectionEntryPoint_getParameterByIndex(
    e: *mut SlangReflectionEntryPoint,
    index: u32,
) -> *mut SlangReflectionVariableLayout {
    opt_handle(unsafe { entry_point(e) }.and_then(|e| e.params.ty.fields.get(index as usize)))
}

pub(crate) unsafe extern "C" fn spReflectionEntryPoint_getVarLayout(
    e: *mut SlangReflectionEntryPoint,
) -> *mut SlangReflectionVariableLayout {
    opt_handle(unsafe { entry_point(e) }.map(|e| &e.params))
}

pub(crate) unsafe extern "C" fn spReflectionEntryPoint_getResultVarLayout(
    e: *mut SlangReflectionEntryPoint,
) -> *mut SlangReflectionVariableLayout {
    opt_handle(unsafe { entry_point(e) }.and_then(|e| e.result.as_ref()))
}

pub(crate) unsafe extern "C" fn spReflectionEntryPoint_getComputeThreadGroupSize(
    e: *mut SlangReflectionEntryPoint,
    axis_count: SlangUInt,
    out_size_along_axis: *mut SlangUInt,
) {
    let Some(e) = (unsafe { entry_point(e) }) else {
        return;
    };
    if out_size_along_axis.is_null() {
        return;
    }
    for axis in 0..axis_count.min(3) {
        unsafe { *out_size_along_axis.add(axis) = e.thread_group_size[axis] };
    }
}

pub(crate) unsafe extern "C" fn spReflectionFunction_GetName(f: *mut SlangReflectionFunction) -> *const c_char {
    unsafe { node::<MockFunction, _>(f) }.map_or(ptr::null(), |f| f.name.as_ptr())
}

// ============ Types ============

pub(crate) unsafe extern "C" fn spReflectionType_GetKind(t: *mut SlangReflectionType) -> SlangTypeKind {
    unsafe { ty(t) }.map_or(SLANG_TYPE_KIND_NONE, |t| t.kind)
}

pub(crate) unsafe extern "C" fn spReflectionType_GetFieldCount(t: *mut SlangReflectionType) -> u32 {
    unsafe { ty(t) }.map_or(0, |t| t.fields.len() as u32)
}

pub(crate) unsafe extern "C" fn spReflectionType_GetFieldByIndex(
    t: *mut SlangReflectionType,
    index: u32,
) -> *mut SlangReflectionVariable {
    opt_handle(unsafe { ty(t) }.and_then(|t| t.fields.get(index as usize)))
}

pub(crate) unsafe extern "C" fn spReflectionType_GetElementCount(t: *mut SlangReflectionType) -> usize {
    unsafe { ty(t) }.map_or(0, |t| t.element_count)
}

pub(crate) unsafe extern "C" fn spReflectionType_GetElementType(t: *mut SlangReflectionType) -> *mut SlangReflectionType {
    opt_handle(unsafe { ty(t) }.and_then(|t| t.element.as_deref()).map(|e| &e.ty))
}

pub(crate) unsafe extern "C" fn spReflectionType_GetRowCount(t: *mut SlangReflectionType) -> u32 {
    unsafe { ty(t) }.map_or(0, |t| t.rows)
}

pub(crate) unsafe extern "C" fn spReflectionType_GetColumnCount(t: *mut SlangReflectionType) -> u32 {
    unsafe { ty(t) }.map_or(0, |t| t.columns)
}

pub(crate) unsafe extern "C" fn spReflectionType_GetScalarType(t: *mut SlangReflectionType) -> SlangScalarType {
    unsafe { ty(t) }.map_or(SLANG_SCALAR_TYPE_NONE, |t| t.scalar_type)
}

pub(crate) unsafe extern "C" fn spReflectionType_GetResourceShape(t: *mut SlangReflectionType) -> SlangResourceShape {
    unsafe { ty(t) }.map_or(SLANG_RESOURCE_NONE, |t| t.shape)
}

pub(crate) unsafe extern "C" fn spReflectionType_GetResourceAccess(t: *mut SlangReflectionType) -> SlangResourceAccess {
    unsafe { ty(t) }.map_or(SLANG_RESOURCE_ACCESS_NONE, |t| t.access)
}

pub(crate) unsafe extern "C" fn spReflectionType_GetResourceResultType(
    t: *mut SlangReflectionType,
) -> *mut SlangReflectionType {
    opt_handle(unsafe { ty(t) }.and_then(|t| t.result_type.as_deref()))
}

pub(crate) unsafe extern "C" fn spReflectionType_GetName(t: *mut SlangReflectionType) -> *const c_char {
    unsafe { ty(t) }.map_or(ptr::null(), |t| name_ptr(&t.name))
}

pub(crate) unsafe extern "C" fn spReflectionType_GetUserAttributeCount(t: *mut SlangReflectionType) -> u32 {
    unsafe { ty(t) }.map_or(0, |t| t.attributes.len() as u32)
}

pub(crate) unsafe extern "C" fn spReflectionType_GetUserAttribute(
    t: *mut SlangReflectionType,
    index: u32,
) -> *mut SlangReflectionUserAttribute {
    opt_handle(unsafe { ty(t) }.and_then(|t| t.attributes.get(index as usize)))
}

pub(crate) unsafe extern "C" fn spReflectionType_FindUserAttributeByName(
    t: *mut SlangReflectionType,
    name: *const c_char,
) -> *mut SlangReflectionUserAttribute {
    opt_handle(unsafe { ty(t) }.and_then(|t| unsafe { find_attribute(&t.attributes, name) }))
}

// ============ Type layouts ============

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetType(t: *mut SlangReflectionTypeLayout) -> *mut SlangReflectionType {
    opt_handle(unsafe { ty(t) })
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_getKind(t: *mut SlangReflectionTypeLayout) -> SlangTypeKind {
    unsafe { ty(t) }.map_or(SLANG_TYPE_KIND_NONE, |t| t.kind)
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetSize(
    t: *mut SlangReflectionTypeLayout,
    category: SlangParameterCategory,
) -> usize {
    unsafe { ty(t) }.map_or(0, |t| t.size_in(category))
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetStride(
    t: *mut SlangReflectionTypeLayout,
    category: SlangParameterCategory,
) -> usize {
    unsafe { ty(t) }.map_or(0, |t| t.stride_in(category))
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_getAlignment(
    t: *mut SlangReflectionTypeLayout,
    category: SlangParameterCategory,
) -> i32 {
    match unsafe { ty(t) } {
        Some(t) if category == SLANG_PARAMETER_CATEGORY_UNIFORM => t.alignment as i32,
        Some(_) => 1,
        None => 0,
    }
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetFieldByIndex(
    t: *mut SlangReflectionTypeLayout,
    index: u32,
) -> *mut SlangReflectionVariableLayout {
    opt_handle(unsafe { ty(t) }.and_then(|t| t.fields.get(index as usize)))
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_findFieldIndexByName(
    t: *mut SlangReflectionTypeLayout,
    name_begin: *const c_char,
    name_end: *const c_char,
) -> SlangInt {
    let Some(t) = (unsafe { ty(t) }) else {
        return -1;
    };
    if name_begin.is_null() {
        return -1;
    }
    let name = if name_end.is_null() {
        unsafe { CStr::from_ptr(name_begin) }.to_bytes()
    } else {
        let len = (name_end as usize).saturating_sub(name_begin as usize);
        unsafe { std::slice::from_raw_parts(name_begin.cast::<u8>(), len) }
    };
    t.fields
        .iter()
        .position(|f| f.name.as_ref().is_some_and(|n| n.as_bytes() == name))
        .map_or(-1, |i| i as SlangInt)
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetElementStride(
    t: *mut SlangReflectionTypeLayout,
    category: SlangParameterCategory,
) -> usize {
    unsafe { ty(t) }
        .and_then(|t| t.element.as_deref())
        .map_or(0, |e| e.ty.stride_in(category))
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetElementTypeLayout(
    t: *mut SlangReflectionTypeLayout,
) -> *mut SlangReflectionTypeLayout {
    opt_handle(unsafe { ty(t) }.and_then(|t| t.element.as_deref()).map(|e| &e.ty))
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetElementVarLayout(
    t: *mut SlangReflectionTypeLayout,
) -> *mut SlangReflectionVariableLayout {
    opt_handle(unsafe { ty(t) }.and_then(|t| t.element.as_deref()))
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_getContainerVarLayout(
    t: *mut SlangReflectionTypeLayout,
) -> *mut SlangReflectionVariableLayout {
    opt_handle(unsafe { ty(t) }.and_then(|t| t.container.as_deref()))
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetParameterCategory(
    t: *mut SlangReflectionTypeLayout,
) -> SlangParameterCategory {
    unsafe { ty(t) }.map_or(SLANG_PARAMETER_CATEGORY_NONE, |t| t.category)
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetCategoryCount(t: *mut SlangReflectionTypeLayout) -> u32 {
    unsafe { ty(t) }.map_or(0, |t| t.categories().len() as u32)
}

pub(crate) unsafe extern "C" fn spReflectionTypeLayout_GetCategoryByIndex(
    t: *mut SlangReflectionTypeLayout,
    index: u32,
) -> SlangParameterCategory {
    unsafe { ty(t) }
        .and_then(|t| t.categories().get(index as usize).copied())
        .unwrap_or(SLANG_PARAMETER_CATEGORY_NONE)
}

// ============ Variables ============

pub(crate) unsafe extern "C" fn spReflectionVariable_GetName(v: *mut SlangReflectionVariable) -> *const c_char {
    unsafe { var(v) }.map_or(ptr::null(), |v| name_ptr(&v.name))
}

pub(crate) unsafe extern "C" fn spReflectionVariable_GetType(v: *mut SlangReflectionVariable) -> *mut SlangReflectionType {
    opt_handle(unsafe { var(v) }.map(|v| &v.ty))
}

pub(crate) unsafe extern "C" fn spReflectionVariable_GetUserAttributeCount(v: *mut SlangReflectionVariable) -> u32 {
    unsafe { var(v) }.map_or(0, |v| v.attributes.len() as u32)
}

pub(crate) unsafe extern "C" fn spReflectionVariable_GetUserAttribute(
    v: *mut SlangReflectionVariable,
    index: u32,
) -> *mut SlangReflectionUserAttribute {
    opt_handle(unsafe { var(v) }.and_then(|v| v.attributes.get(index as usize)))
}

pub(crate) unsafe extern "C" fn spReflectionVariable_FindUserAttributeByName(
    v: *mut SlangReflectionVariable,
    _global_session: *mut IGlobalSession,
    name: *const c_char,
) -> *mut SlangReflectionUserAttribute {
    opt_handle(unsafe { var(v) }.and_then(|v| unsafe { find_attribute(&v.attributes, name) }))
}

pub(crate) unsafe extern "C" fn spReflectionVariableLayout_GetVariable(
    v: *mut SlangReflectionVariableLayout,
) -> *mut SlangReflectionVariable {
    opt_handle(unsafe { var(v) })
}

pub(crate) unsafe extern "C" fn spReflectionVariableLayout_GetTypeLayout(
    v: *mut SlangReflectionVariableLayout,
) -> *mut SlangReflectionTypeLayout {
    opt_handle(unsafe { var(v) }.map(|v| &v.ty))
}

pub(crate) unsafe extern "C" fn spReflectionVariableLayout_GetOffset(
    v: *mut SlangReflectionVariableLayout,
    category: SlangParameterCategory,
) -> usize {
    unsafe { var(v) }.map_or(0, |v| v.offset_in(category))
}

pub(crate) unsafe extern "C" fn spReflectionVariableLayout_GetSpace(
    v: *mut SlangReflectionVariableLayout,
    category: SlangParameterCategory,
) -> usize {
    unsafe { var(v) }.map_or(0, |v| v.space_in(category))
}

pub(crate) unsafe extern "C" fn spReflectionVariableLayout_GetSemanticName(
    v: *mut SlangReflectionVariableLayout,
) -> *const c_char {
    unsafe { var(v) }
        .and_then(|v| v.semantic.as_ref())
        .map_or(ptr::null(), |(name, _)| name.as_ptr())
}

pub(crate) unsafe extern "C" fn spReflectionVariableLayout_GetSemanticIndex(v: *mut SlangReflectionVariableLayout) -> usize {
    unsafe { var(v) }
        .and_then(|v| v.semantic.as_ref())
        .map_or(0, |(_, index)| *index)
}

pub(crate) unsafe extern "C" fn spReflectionVariableLayout_getStage(v: *mut SlangReflectionVariableLayout) -> SlangStage {
    unsafe { var(v) }.map_or(SLANG_STAGE_NONE, |v| v.stage)
}

pub(crate) unsafe extern "C" fn spReflectionParameter_GetBindingIndex(v: *mut SlangReflectionVariableLayout) -> u32 {
    unsafe { var(v) }.map_or(0, |v| v.binding_index)
}

pub(crate) unsafe extern "C" fn spReflectionParameter_GetBindingSpace(v: *mut SlangReflectionVariableLayout) -> u32 {
    unsafe { var(v) }.map_or(0, |v| v.binding_space)
}

// ============ User attributes ============

pub(crate) unsafe extern "C" fn spReflectionUserAttribute_GetName(a: *mut SlangReflectionUserAttribute) -> *const c_char {
    unsafe { attribute(a) }.map_or(ptr::null(), |a| a.name.as_ptr())
}

pub(crate) unsafe extern "C" fn spReflectionUserAttribute_GetArgumentCount(a: *mut SlangReflectionUserAttribute) -> u32 {
    unsafe { attribute(a) }.map_or(0, |a| a.args.len() as u32)
}

pub(crate) unsafe extern "C" fn spReflectionUserAttribute_GetArgumentType(
    a: *mut SlangReflectionUserAttribute,
    index: u32,
) -> *mut SlangReflectionType {
    opt_handle(unsafe { attribute(a) }.and_then(|a| a.args.get(index as usize)).map(|(_, arg_ty)| arg_ty))
}

pub(crate) unsafe extern "C" fn spReflectionUserAttribute_GetArgumentValueInt(
    a: *mut SlangReflectionUserAttribute,
    index: u32,
    out_value: *mut c_int,
) -> SlangResult {
    match unsafe { attribute(a) }.and_then(|a| a.args.get(index as usize)) {
        Some((MockArg::Int(value), _)) if !out_value.is_null() => {
            unsafe { *out_value = *value };
            SLANG_OK
        }
        _ => SLANG_E_INVALID_ARG,
    }
}

pub(crate) unsafe extern "C" fn spReflectionUserAttribute_GetArgumentValueFloat(
    a: *mut SlangReflectionUserAttribute,
    index: u32,
    out_value: *mut c_float,
) -> SlangResult {
    match unsafe { attribute(a) }.and_then(|a| a.args.get(index as usize)) {
        Some((MockArg::Float(value), _)) if !out_value.is_null() => {
            unsafe { *out_value = *value };
            SLANG_OK
        }
        _ => SLANG_E_INVALID_ARG,
    }
}

pub(crate) unsafe extern "C" fn spReflectionUserAttribute_GetArgumentValueString(
    a: *mut SlangReflectionUserAttribute,
    index: u32,
    out_size: *mut usize,
) -> *const c_char {
    let Some(a) = (unsafe { attribute(a) }) else {
        return ptr::null();
    };
    match a.args.get(index as usize) {
        Some((MockArg::Str(_), _)) => {
            let bytes = &a.strings[index as usize];
            if !out_size.is_null() {
                unsafe { *out_size = bytes.len() };
            }
            bytes.as_ptr().cast()
        }
        _ => ptr::null(),
    }
}
