//! Fake COM objects: global session, session, component types and blobs
//!
//! Objects are boxed, reference counted with atomics, and freed on their
//! last release. Ownership follows Slang: a session owns the modules it
//! loaded, out-parameter references belong to the caller, and every other
//! component holds a reference to its session. Modules only borrow theirs,
//! since the session already holds them.

use super::lookup_module;
use super::model::*;
use crate::interfaces::*;
use crate::result::*;
use crate::types::*;
use std::ffi::{CStr, c_char, c_void};
use std::ptr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

const BUILD_TAG: &CStr = c"0.0.0-mock";

const PROFILES: &[&str] = &[
    "glsl_450", "glsl_460", "sm_5_0", "sm_5_1", "sm_6_0", "sm_6_5", "sm_6_6", "spirv_1_0", "spirv_1_3",
    "spirv_1_4", "spirv_1_5", "spirv_1_6", "metallib_2_3", "wgsl",
];

const CAPABILITIES: &[&str] = &[
    "spirv_1_0", "spirv_1_5", "spirv_1_6", "glsl", "hlsl", "metal", "wgsl", "SPV_KHR_ray_tracing",
];

const SUPPORTED_TARGETS: &[SlangCompileTarget] =
    &[SLANG_GLSL, SLANG_HLSL, SLANG_SPIRV, SLANG_SPIRV_ASM, SLANG_METAL, SLANG_WGSL];

// ============ Reference counting ============

trait MockObject: Sized {
    fn refs(&self) -> &AtomicU32;
    fn supports(&self, iid: &SlangUUID) -> bool;
}

fn into_raw<T, I>(obj: T) -> *mut I {
    Box::into_raw(Box::new(obj)).cast()
}

unsafe extern "system" fn query_interface<T: MockObject>(
    this: *mut ISlangUnknown,
    iid: *const SlangUUID,
    out_object: *mut *mut c_void,
) -> SlangResult {
    if iid.is_null() || out_object.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    let obj = unsafe { &*this.cast::<T>() };
    if !obj.supports(unsafe { &*iid }) {
        return SLANG_E_NO_INTERFACE;
    }
    obj.refs().fetch_add(1, Ordering::AcqRel);
    unsafe { *out_object = this.cast() };
    SLANG_OK
}

unsafe extern "system" fn add_ref<T: MockObject>(this: *mut ISlangUnknown) -> u32 {
    unsafe { &*this.cast::<T>() }.refs().fetch_add(1, Ordering::AcqRel) + 1
}

unsafe extern "system" fn release<T: MockObject>(this: *mut ISlangUnknown) -> u32 {
    let refs = unsafe { &*this.cast::<T>() }.refs();
    // An over-release leaves the count at zero instead of wrapping
    let Ok(previous) = refs.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1)) else {
        log::warn!("mock: release of an object with no references");
        return 0;
    };
    if previous == 1 {
        drop(unsafe { Box::from_raw(this.cast::<T>()) });
    }
    previous - 1
}

const fn unknown_vtbl<T: MockObject>() -> ISlangUnknownVtbl {
    ISlangUnknownVtbl {
        queryInterface: query_interface::<T>,
        addRef: add_ref::<T>,
        release: release::<T>,
    }
}

/// Releases a reference through its `ISlangUnknown` prefix
unsafe fn release_raw<T>(obj: *mut T) {
    let unknown = obj.cast::<ISlangUnknown>();
    unsafe { ((*(*unknown).vtable).release)(unknown) };
}

unsafe fn add_ref_raw<T>(obj: *mut T) {
    let unknown = obj.cast::<ISlangUnknown>();
    unsafe { ((*(*unknown).vtable).addRef)(unknown) };
}

unsafe fn c_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(s) }.to_str().ok()
    }
}

// ============ Blobs ============

#[repr(C)]
struct MockBlob {
    vtable: *const ISlangBlobVtbl,
    refs: AtomicU32,
    data: Vec<u8>,
    len: usize,
}

impl MockObject for MockBlob {
    fn refs(&self) -> &AtomicU32 {
        &self.refs
    }

    fn supports(&self, iid: &SlangUUID) -> bool {
        *iid == IID_ISLANG_UNKNOWN || *iid == IID_ISLANG_BLOB
    }
}

static BLOB_VTBL: ISlangBlobVtbl = ISlangBlobVtbl {
    base: unknown_vtbl::<MockBlob>(),
    getBufferPointer: blob_buffer_pointer,
    getBufferSize: blob_buffer_size,
};

unsafe extern "system" fn blob_buffer_pointer(this: *mut ISlangBlob) -> *const c_void {
    unsafe { &*this.cast::<MockBlob>() }.data.as_ptr().cast()
}

unsafe extern "system" fn blob_buffer_size(this: *mut ISlangBlob) -> usize {
    unsafe { &*this.cast::<MockBlob>() }.len
}

pub(crate) fn new_blob(data: Vec<u8>) -> *mut ISlangBlob {
    let len = data.len();
    into_raw(MockBlob {
        vtable: &BLOB_VTBL,
        refs: AtomicU32::new(1),
        data,
        len,
    })
}

/// Text blob; the buffer carries a trailing NUL that the size excludes
fn text_blob(text: &str) -> *mut ISlangBlob {
    let mut data = text.as_bytes().to_vec();
    let len = data.len();
    data.push(0);
    into_raw(MockBlob {
        vtable: &BLOB_VTBL,
        refs: AtomicU32::new(1),
        data,
        len,
    })
}

unsafe fn write_diagnostics(out_diagnostics: *mut *mut ISlangBlob, text: &str) {
    if !out_diagnostics.is_null() {
        unsafe { *out_diagnostics = text_blob(text) };
    }
}

// ============ Global session ============

#[repr(C)]
struct MockGlobalSession {
    vtable: *const IGlobalSessionVtbl,
    refs: AtomicU32,
}

impl MockObject for MockGlobalSession {
    fn refs(&self) -> &AtomicU32 {
        &self.refs
    }

    fn supports(&self, iid: &SlangUUID) -> bool {
        *iid == IID_ISLANG_UNKNOWN || *iid == IID_IGLOBAL_SESSION
    }
}

fn new_global_session() -> *mut IGlobalSession {
    into_raw(MockGlobalSession {
        vtable: &GLOBAL_SESSION_VTBL,
        refs: AtomicU32::new(1),
    })
}

pub(crate) unsafe extern "C" fn slang_createGlobalSession(
    api_version: SlangInt,
    out_global_session: *mut *mut IGlobalSession,
) -> SlangResult {
    if out_global_session.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    if api_version != SLANG_API_VERSION {
        return SLANG_E_NOT_IMPLEMENTED;
    }
    unsafe { *out_global_session = new_global_session() };
    SLANG_OK
}

pub(crate) unsafe extern "C" fn slang_createGlobalSession2(
    desc: *const SlangGlobalSessionDesc,
    out_global_session: *mut *mut IGlobalSession,
) -> SlangResult {
    if desc.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    unsafe { slang_createGlobalSession((*desc).apiVersion as SlangInt, out_global_session) }
}

pub(crate) unsafe extern "C" fn slang_shutdown() {}

unsafe extern "system" fn gs_create_session(
    this: *mut IGlobalSession,
    desc: *const SessionDesc,
    out_session: *mut *mut ISession,
) -> SlangResult {
    if desc.is_null() || out_session.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    let desc = unsafe { &*desc };
    if desc.targetCount < 0 || (desc.targetCount > 0 && desc.targets.is_null()) {
        return SLANG_E_INVALID_ARG;
    }
    let targets = if desc.targetCount == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(desc.targets, desc.targetCount as usize) }
            .iter()
            .map(|t| t.format)
            .collect()
    };

    unsafe { add_ref_raw(this) };
    let session = MockSession {
        vtable: &SESSION_VTBL,
        refs: AtomicU32::new(1),
        global: this,
        targets,
        loaded: Mutex::new(Vec::new()),
    };
    unsafe { *out_session = into_raw(session) };
    SLANG_OK
}

unsafe extern "system" fn gs_find_profile(_this: *mut IGlobalSession, name: *const c_char) -> SlangProfileID {
    unsafe { c_str(name) }
        .and_then(|name| PROFILES.iter().position(|p| *p == name))
        .map_or(SLANG_UNKNOWN_PROFILE, |i| i as SlangProfileID + 1)
}

unsafe extern "system" fn gs_set_downstream_compiler_path(_: *mut IGlobalSession, _: SlangPassThrough, _: *const c_char) {}

unsafe extern "system" fn gs_set_downstream_compiler_prelude(_: *mut IGlobalSession, _: SlangPassThrough, _: *const c_char) {}

unsafe extern "system" fn gs_get_downstream_compiler_prelude(_: *mut IGlobalSession, _: SlangPassThrough, _: *mut *mut ISlangBlob) {}

unsafe extern "system" fn gs_get_build_tag_string(_this: *mut IGlobalSession) -> *const c_char {
    BUILD_TAG.as_ptr()
}

unsafe extern "system" fn gs_set_default_downstream_compiler(
    _: *mut IGlobalSession,
    _: SlangSourceLanguage,
    _: SlangPassThrough,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn gs_get_default_downstream_compiler(_: *mut IGlobalSession, _: SlangSourceLanguage) -> SlangPassThrough {
    0
}

unsafe extern "system" fn gs_set_language_prelude(_: *mut IGlobalSession, _: SlangSourceLanguage, _: *const c_char) {}

unsafe extern "system" fn gs_get_language_prelude(_: *mut IGlobalSession, _: SlangSourceLanguage, _: *mut *mut ISlangBlob) {}

unsafe extern "system" fn gs_create_compile_request(_: *mut IGlobalSession, _: *mut *mut c_void) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn gs_add_builtins(_: *mut IGlobalSession, _: *const c_char, _: *const c_char) {}

unsafe extern "system" fn gs_set_shared_library_loader(_: *mut IGlobalSession, _: *mut c_void) {}

unsafe extern "system" fn gs_get_shared_library_loader(_: *mut IGlobalSession) -> *mut c_void {
    ptr::null_mut()
}

unsafe extern "system" fn gs_check_compile_target_support(_: *mut IGlobalSession, target: SlangCompileTarget) -> SlangResult {
    if SUPPORTED_TARGETS.contains(&target) {
        SLANG_OK
    } else {
        SLANG_E_NOT_IMPLEMENTED
    }
}

unsafe extern "system" fn gs_check_pass_through_support(_: *mut IGlobalSession, _: SlangPassThrough) -> SlangResult {
    SLANG_E_NOT_FOUND
}

unsafe extern "system" fn gs_compile_core_module(_: *mut IGlobalSession, _: CompileCoreModuleFlags) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn gs_load_core_module(_: *mut IGlobalSession, _: *const c_void, _: usize) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn gs_save_core_module(_: *mut IGlobalSession, _: SlangArchiveType, _: *mut *mut ISlangBlob) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn gs_find_capability(_this: *mut IGlobalSession, name: *const c_char) -> SlangCapabilityID {
    unsafe { c_str(name) }
        .and_then(|name| CAPABILITIES.iter().position(|c| *c == name))
        .map_or(0, |i| i as SlangCapabilityID + 1)
}

static GLOBAL_SESSION_VTBL: IGlobalSessionVtbl = IGlobalSessionVtbl {
    base: unknown_vtbl::<MockGlobalSession>(),
    createSession: gs_create_session,
    findProfile: gs_find_profile,
    setDownstreamCompilerPath: gs_set_downstream_compiler_path,
    setDownstreamCompilerPrelude: gs_set_downstream_compiler_prelude,
    getDownstreamCompilerPrelude: gs_get_downstream_compiler_prelude,
    getBuildTagString: gs_get_build_tag_string,
    setDefaultDownstreamCompiler: gs_set_default_downstream_compiler,
    getDefaultDownstreamCompiler: gs_get_default_downstream_compiler,
    setLanguagePrelude: gs_set_language_prelude,
    getLanguagePrelude: gs_get_language_prelude,
    createCompileRequest: gs_create_compile_request,
    addBuiltins: gs_add_builtins,
    setSharedLibraryLoader: gs_set_shared_library_loader,
    getSharedLibraryLoader: gs_get_shared_library_loader,
    checkCompileTargetSupport: gs_check_compile_target_support,
    checkPassThroughSupport: gs_check_pass_through_support,
    compileCoreModule: gs_compile_core_module,
    loadCoreModule: gs_load_core_module,
    saveCoreModule: gs_save_core_module,
    findCapability: gs_find_capability,
};

// ============ Session ============

#[repr(C)]
struct MockSession {
    vtable: *const ISessionVtbl,
    refs: AtomicU32,
    global: *mut IGlobalSession,
    targets: Vec<SlangCompileTarget>,
    loaded: Mutex<Vec<*mut IModule>>,
}

impl MockObject for MockSession {
    fn refs(&self) -> &AtomicU32 {
        &self.refs
    }

    fn supports(&self, iid: &SlangUUID) -> bool {
        *iid == IID_ISLANG_UNKNOWN || *iid == IID_ISESSION
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        let loaded = self.loaded.get_mut().unwrap_or_else(PoisonError::into_inner);
        for module in loaded.drain(..) {
            unsafe { release_raw(module) };
        }
        unsafe { release_raw(self.global) };
    }
}

unsafe fn session<'a>(this: *mut ISession) -> &'a MockSession {
    unsafe { &*this.cast::<MockSession>() }
}

unsafe fn load_module(this: *mut ISession, name: *const c_char, out_diagnostics: *mut *mut ISlangBlob) -> *mut IModule {
    let Some(name) = (unsafe { c_str(name) }) else {
        unsafe { write_diagnostics(out_diagnostics, "error: module name is not a valid string") };
        return ptr::null_mut();
    };

    let session = unsafe { session(this) };
    let mut loaded = session.loaded.lock().unwrap_or_else(PoisonError::into_inner);
    let existing = loaded.iter().copied().find(|&m| {
        unsafe { component(m) }
            .module
            .as_ref()
            .is_some_and(|module| module.name_str() == name)
    });
    if let Some(existing) = existing {
        return existing;
    }

    let Some(module) = lookup_module(name) else {
        let text = format!("{name}.slang(1): error 1: cannot open file '{name}.slang'.");
        unsafe { write_diagnostics(out_diagnostics, &text) };
        return ptr::null_mut();
    };
    if let Some(error) = &module.load_error {
        unsafe { write_diagnostics(out_diagnostics, error) };
        return ptr::null_mut();
    }
    if let Some(warning) = &module.warning {
        unsafe { write_diagnostics(out_diagnostics, warning) };
    }

    let module: *mut IModule = into_raw(MockComponent::module(this, module));
    loaded.push(module);
    module
}

unsafe extern "system" fn session_get_global_session(this: *mut ISession) -> *mut IGlobalSession {
    unsafe { session(this) }.global
}

unsafe extern "system" fn session_load_module(
    this: *mut ISession,
    module_name: *const c_char,
    out_diagnostics: *mut *mut ISlangBlob,
) -> *mut IModule {
    unsafe { load_module(this, module_name, out_diagnostics) }
}

unsafe extern "system" fn session_load_module_from_source(
    this: *mut ISession,
    module_name: *const c_char,
    _path: *const c_char,
    source: *mut ISlangBlob,
    out_diagnostics: *mut *mut ISlangBlob,
) -> *mut IModule {
    if source.is_null() {
        unsafe { write_diagnostics(out_diagnostics, "error: no source blob given") };
        return ptr::null_mut();
    }
    unsafe { load_module(this, module_name, out_diagnostics) }
}

unsafe extern "system" fn session_create_composite_component_type(
    this: *mut ISession,
    component_types: *const *mut IComponentType,
    component_type_count: SlangInt,
    out_composite_component_type: *mut *mut IComponentType,
    out_diagnostics: *mut *mut ISlangBlob,
) -> SlangResult {
    if out_composite_component_type.is_null()
        || component_type_count < 0
        || (component_type_count > 0 && component_types.is_null())
    {
        return SLANG_E_INVALID_ARG;
    }
    let parts = if component_type_count == 0 {
        &[][..]
    } else {
        unsafe { std::slice::from_raw_parts(component_types, component_type_count as usize) }
    };
    if parts.iter().any(|p| p.is_null()) {
        unsafe { write_diagnostics(out_diagnostics, "error: null component type in composite") };
        return SLANG_E_INVALID_ARG;
    }

    let mut program = MockProgram::empty();
    let mut options = Vec::new();
    for &part in parts {
        let part = unsafe { component(part) };
        program.merge(&part.program);
        options.extend_from_slice(&part.options);
    }
    unsafe { *out_composite_component_type = into_raw(MockComponent::composite(this, program, options)) };
    SLANG_OK
}

unsafe extern "system" fn session_specialize_type(
    _: *mut ISession,
    _: *mut SlangReflectionType,
    _: *const c_void,
    _: SlangInt,
    _: *mut *mut ISlangBlob,
) -> *mut SlangReflectionType {
    ptr::null_mut()
}

unsafe extern "system" fn session_get_type_layout(
    _: *mut ISession,
    _: *mut SlangReflectionType,
    _: SlangInt,
    _: SlangLayoutRules,
    _: *mut *mut ISlangBlob,
) -> *mut SlangReflectionTypeLayout {
    ptr::null_mut()
}

unsafe extern "system" fn session_get_container_type(
    _: *mut ISession,
    _: *mut SlangReflectionType,
    _: SlangContainerType,
    _: *mut *mut ISlangBlob,
) -> *mut SlangReflectionType {
    ptr::null_mut()
}

unsafe extern "system" fn session_get_dynamic_type(_: *mut ISession) -> *mut SlangReflectionType {
    ptr::null_mut()
}

unsafe extern "system" fn session_get_type_rtti_mangled_name(
    _: *mut ISession,
    _: *mut SlangReflectionType,
    _: *mut *mut ISlangBlob,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn session_get_type_conformance_witness_mangled_name(
    _: *mut ISession,
    _: *mut SlangReflectionType,
    _: *mut SlangReflectionType,
    _: *mut *mut ISlangBlob,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn session_get_type_conformance_witness_sequential_id(
    _: *mut ISession,
    _: *mut SlangReflectionType,
    _: *mut SlangReflectionType,
    _: *mut u32,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn session_create_compile_request(_: *mut ISession, _: *mut *mut c_void) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn session_create_type_conformance_component_type(
    _: *mut ISession,
    _: *mut SlangReflectionType,
    _: *mut SlangReflectionType,
    _: *mut *mut c_void,
    _: SlangInt,
    _: *mut *mut ISlangBlob,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn session_load_module_from_ir_blob(
    _: *mut ISession,
    _: *const c_char,
    _: *const c_char,
    _: *mut ISlangBlob,
    out_diagnostics: *mut *mut ISlangBlob,
) -> *mut IModule {
    unsafe { write_diagnostics(out_diagnostics, "error: IR modules are not supported") };
    ptr::null_mut()
}

unsafe extern "system" fn session_get_loaded_module_count(this: *mut ISession) -> SlangInt {
    let session = unsafe { session(this) };
    session.loaded.lock().unwrap_or_else(PoisonError::into_inner).len() as SlangInt
}

unsafe extern "system" fn session_get_loaded_module(this: *mut ISession, index: SlangInt) -> *mut IModule {
    let session = unsafe { session(this) };
    let loaded = session.loaded.lock().unwrap_or_else(PoisonError::into_inner);
    usize::try_from(index)
        .ok()
        .and_then(|i| loaded.get(i).copied())
        .unwrap_or(ptr::null_mut())
}

unsafe extern "system" fn session_is_binary_module_up_to_date(_: *mut ISession, _: *const c_char, _: *mut ISlangBlob) -> bool {
    false
}

unsafe extern "system" fn session_load_module_from_source_string(
    this: *mut ISession,
    module_name: *const c_char,
    _path: *const c_char,
    _string: *const c_char,
    out_diagnostics: *mut *mut ISlangBlob,
) -> *mut IModule {
    unsafe { load_module(this, module_name, out_diagnostics) }
}

static SESSION_VTBL: ISessionVtbl = ISessionVtbl {
    base: unknown_vtbl::<MockSession>(),
    getGlobalSession: session_get_global_session,
    loadModule: session_load_module,
    loadModuleFromSource: session_load_module_from_source,
    createCompositeComponentType: session_create_composite_component_type,
    specializeType: session_specialize_type,
    getTypeLayout: session_get_type_layout,
    getContainerType: session_get_container_type,
    getDynamicType: session_get_dynamic_type,
    getTypeRTTIMangledName: session_get_type_rtti_mangled_name,
    getTypeConformanceWitnessMangledName: session_get_type_conformance_witness_mangled_name,
    getTypeConformanceWitnessSequentialID: session_get_type_conformance_witness_sequential_id,
    createCompileRequest: session_create_compile_request,
    createTypeConformanceComponentType: session_create_type_conformance_component_type,
    loadModuleFromIRBlob: session_load_module_from_ir_blob,
    getLoadedModuleCount: session_get_loaded_module_count,
    getLoadedModule: session_get_loaded_module,
    isBinaryModuleUpToDate: session_is_binary_module_up_to_date,
    loadModuleFromSourceString: session_load_module_from_source_string,
};

// ============ Component types ============

/// Module, entry point, composite or linked program, told apart by which
/// vtable it carries
#[repr(C)]
struct MockComponent {
    vtable: *const IComponentTypeVtbl,
    refs: AtomicU32,
    session: *mut ISession,
    // False for modules, which the session owns
    holds_session: bool,
    program: MockProgram,
    module: Option<MockModule>,
    entry_point: Option<MockEntryPoint>,
    options: Vec<CompilerOptionName>,
}

impl MockObject for MockComponent {
    fn refs(&self) -> &AtomicU32 {
        &self.refs
    }

    fn supports(&self, iid: &SlangUUID) -> bool {
        *iid == IID_ISLANG_UNKNOWN
            || *iid == IID_ICOMPONENT_TYPE
            || (*iid == IID_IMODULE && self.module.is_some())
            || (*iid == IID_IENTRY_POINT && self.entry_point.is_some())
    }
}

impl MockComponent {
    fn module(session: *mut ISession, module: MockModule) -> Self {
        Self {
            vtable: (&MODULE_VTBL as *const IModuleVtbl).cast(),
            refs: AtomicU32::new(1),
            session,
            holds_session: false,
            program: MockProgram::with_globals(&module.globals),
            module: Some(module),
            entry_point: None,
            options: Vec::new(),
        }
    }

    fn entry_point(session: *mut ISession, entry_point: MockEntryPoint) -> Self {
        let mut program = MockProgram::empty();
        program.add_entry_points(std::slice::from_ref(&entry_point));
        unsafe { add_ref_raw(session) };
        Self {
            vtable: (&ENTRY_POINT_VTBL as *const IEntryPointVtbl).cast(),
            refs: AtomicU32::new(1),
            session,
            holds_session: true,
            program,
            module: None,
            entry_point: Some(entry_point),
            options: Vec::new(),
        }
    }

    fn composite(session: *mut ISession, program: MockProgram, options: Vec<CompilerOptionName>) -> Self {
        unsafe { add_ref_raw(session) };
        Self {
            vtable: &COMPONENT_VTBL,
            refs: AtomicU32::new(1),
            session,
            holds_session: true,
            program,
            module: None,
            entry_point: None,
            options,
        }
    }

    fn target(&self, index: SlangInt) -> Option<SlangCompileTarget> {
        let session = unsafe { session(self.session) };
        usize::try_from(index).ok().and_then(|i| session.targets.get(i).copied())
    }
}

impl Drop for MockComponent {
    fn drop(&mut self) {
        if self.holds_session {
            unsafe { release_raw(self.session) };
        }
    }
}

unsafe fn component<'a, T>(this: *mut T) -> &'a MockComponent {
    unsafe { &*this.cast::<MockComponent>() }
}

fn target_name(format: SlangCompileTarget) -> &'static str {
    match format {
        SLANG_GLSL => "glsl",
        SLANG_HLSL => "hlsl",
        SLANG_SPIRV => "spirv",
        SLANG_SPIRV_ASM => "spirv-asm",
        SLANG_METAL => "metal",
        SLANG_WGSL => "wgsl",
        _ => "unknown",
    }
}

fn stage_name(stage: SlangStage) -> &'static str {
    match stage {
        SLANG_STAGE_VERTEX => "vertex",
        SLANG_STAGE_FRAGMENT => "fragment",
        SLANG_STAGE_COMPUTE => "compute",
        SLANG_STAGE_GEOMETRY => "geometry",
        SLANG_STAGE_MESH => "mesh",
        _ => "other",
    }
}

/// Deterministic stand-in for generated code: a SPIR-V header followed by
/// the entry point names for binary SPIR-V, a comment listing otherwise.
fn generate_code(format: SlangCompileTarget, entry_points: &[&MockEntryPoint], options: &[CompilerOptionName]) -> Vec<u8> {
    if format == SLANG_SPIRV {
        let mut code = Vec::new();
        for word in [0x0723_0203u32, 0x0001_0000, 0, 1, 0] {
            code.extend_from_slice(&word.to_le_bytes());
        }
        for entry_point in entry_points {
            code.extend_from_slice(entry_point.name_bytes());
            let padding = 4 - entry_point.name_bytes().len() % 4;
            code.extend(std::iter::repeat_n(0u8, padding));
        }
        return code;
    }

    let mut text = format!("// {} generated by mock slang\n", target_name(format));
    for entry_point in entry_points {
        text += &format!(
            "// entry {} {}\n",
            entry_point.name.to_string_lossy(),
            stage_name(entry_point.stage)
        );
    }
    if !options.is_empty() {
        let names: Vec<_> = options.iter().map(|o| o.to_string()).collect();
        text += &format!("// options {}\n", names.join(","));
    }
    text.into_bytes()
}

unsafe extern "system" fn ct_get_session(this: *mut IComponentType) -> *mut ISession {
    unsafe { component(this) }.session
}

unsafe extern "system" fn ct_get_layout(
    this: *mut IComponentType,
    target_index: SlangInt,
    out_diagnostics: *mut *mut ISlangBlob,
) -> *mut SlangReflection {
    let component = unsafe { component(this) };
    if component.target(target_index).is_none() {
        let text = format!("error: target index {target_index} is out of range");
        unsafe { write_diagnostics(out_diagnostics, &text) };
        return ptr::null_mut();
    }
    (&component.program as *const MockProgram).cast_mut().cast()
}

unsafe extern "system" fn ct_get_specialization_param_count(_: *mut IComponentType) -> SlangInt {
    0
}

unsafe extern "system" fn ct_get_entry_point_code(
    this: *mut IComponentType,
    entry_point_index: SlangInt,
    target_index: SlangInt,
    out_code: *mut *mut ISlangBlob,
    out_diagnostics: *mut *mut ISlangBlob,
) -> SlangResult {
    if out_code.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    let component = unsafe { component(this) };
    let Some(format) = component.target(target_index) else {
        let text = format!("error: target index {target_index} is out of range");
        unsafe { write_diagnostics(out_diagnostics, &text) };
        return SLANG_E_INVALID_ARG;
    };
    let Some(entry_point) = usize::try_from(entry_point_index)
        .ok()
        .and_then(|i| component.program.entry_points.get(i))
    else {
        let text = format!("error: entry point index {entry_point_index} is out of range");
        unsafe { write_diagnostics(out_diagnostics, &text) };
        return SLANG_E_INVALID_ARG;
    };
    unsafe { *out_code = new_blob(generate_code(format, &[entry_point], &component.options)) };
    SLANG_OK
}

unsafe extern "system" fn ct_get_result_as_file_system(
    _: *mut IComponentType,
    _: SlangInt,
    _: SlangInt,
    _: *mut *mut c_void,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn ct_get_entry_point_hash(_: *mut IComponentType, _: SlangInt, _: SlangInt, _: *mut *mut ISlangBlob) {}

unsafe extern "system" fn ct_specialize(
    _: *mut IComponentType,
    _: *const c_void,
    _: SlangInt,
    _: *mut *mut IComponentType,
    _: *mut *mut ISlangBlob,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn ct_link(
    this: *mut IComponentType,
    out_linked_component_type: *mut *mut IComponentType,
    _out_diagnostics: *mut *mut ISlangBlob,
) -> SlangResult {
    if out_linked_component_type.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    let component = unsafe { component(this) };
    let linked = MockComponent::composite(component.session, component.program.clone(), component.options.clone());
    unsafe { *out_linked_component_type = into_raw(linked) };
    SLANG_OK
}

unsafe extern "system" fn ct_get_entry_point_host_callable(
    _: *mut IComponentType,
    _: i32,
    _: i32,
    _: *mut *mut c_void,
    _: *mut *mut ISlangBlob,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn ct_rename_entry_point(_: *mut IComponentType, _: *const c_char, _: *mut *mut IComponentType) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn ct_link_with_options(
    this: *mut IComponentType,
    out_linked_component_type: *mut *mut IComponentType,
    compiler_option_entry_count: u32,
    compiler_option_entries: *mut CompilerOptionEntry,
    _out_diagnostics: *mut *mut ISlangBlob,
) -> SlangResult {
    if out_linked_component_type.is_null() || (compiler_option_entry_count > 0 && compiler_option_entries.is_null()) {
        return SLANG_E_INVALID_ARG;
    }
    let component = unsafe { component(this) };
    let mut options = component.options.clone();
    if compiler_option_entry_count > 0 {
        let entries =
            unsafe { std::slice::from_raw_parts(compiler_option_entries, compiler_option_entry_count as usize) };
        options.extend(entries.iter().map(|e| e.name));
    }
    let linked = MockComponent::composite(component.session, component.program.clone(), options);
    unsafe { *out_linked_component_type = into_raw(linked) };
    SLANG_OK
}

unsafe extern "system" fn ct_get_target_code(
    this: *mut IComponentType,
    target_index: SlangInt,
    out_code: *mut *mut ISlangBlob,
    out_diagnostics: *mut *mut ISlangBlob,
) -> SlangResult {
    if out_code.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    let component = unsafe { component(this) };
    let Some(format) = component.target(target_index) else {
        let text = format!("error: target index {target_index} is out of range");
        unsafe { write_diagnostics(out_diagnostics, &text) };
        return SLANG_E_INVALID_ARG;
    };
    let entry_points: Vec<_> = component.program.entry_points.iter().collect();
    unsafe { *out_code = new_blob(generate_code(format, &entry_points, &component.options)) };
    SLANG_OK
}

unsafe extern "system" fn ct_get_target_metadata(
    _: *mut IComponentType,
    _: SlangInt,
    _: *mut *mut c_void,
    _: *mut *mut ISlangBlob,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn ct_get_entry_point_metadata(
    _: *mut IComponentType,
    _: SlangInt,
    _: SlangInt,
    _: *mut *mut c_void,
    _: *mut *mut ISlangBlob,
) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

const COMPONENT_BASE: IComponentTypeVtbl = IComponentTypeVtbl {
    base: unknown_vtbl::<MockComponent>(),
    getSession: ct_get_session,
    getLayout: ct_get_layout,
    getSpecializationParamCount: ct_get_specialization_param_count,
    getEntryPointCode: ct_get_entry_point_code,
    getResultAsFileSystem: ct_get_result_as_file_system,
    getEntryPointHash: ct_get_entry_point_hash,
    specialize: ct_specialize,
    link: ct_link,
    getEntryPointHostCallable: ct_get_entry_point_host_callable,
    renameEntryPoint: ct_rename_entry_point,
    linkWithOptions: ct_link_with_options,
    getTargetCode: ct_get_target_code,
    getTargetMetadata: ct_get_target_metadata,
    getEntryPointMetadata: ct_get_entry_point_metadata,
};

static COMPONENT_VTBL: IComponentTypeVtbl = COMPONENT_BASE;

// ============ Modules & entry points ============

unsafe fn new_entry_point(module: &MockComponent, entry_point: &MockEntryPoint, out_entry_point: *mut *mut IEntryPoint) {
    let entry_point = MockComponent::entry_point(module.session, entry_point.clone());
    unsafe { *out_entry_point = into_raw(entry_point) };
}

unsafe extern "system" fn module_find_entry_point_by_name(
    this: *mut IModule,
    name: *const c_char,
    out_entry_point: *mut *mut IEntryPoint,
) -> SlangResult {
    if out_entry_point.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    let Some(name) = (unsafe { c_str(name) }) else {
        return SLANG_E_INVALID_ARG;
    };
    let component = unsafe { component(this) };
    let found = component
        .module
        .as_ref()
        .and_then(|m| m.entry_points.iter().find(|e| e.name.to_str() == Ok(name)));
    match found {
        Some(entry_point) => {
            unsafe { new_entry_point(component, entry_point, out_entry_point) };
            SLANG_OK
        }
        None => SLANG_FAIL,
    }
}

unsafe extern "system" fn module_get_defined_entry_point_count(this: *mut IModule) -> SlangInt32 {
    unsafe { component(this) }
        .module
        .as_ref()
        .map_or(0, |m| m.entry_points.len() as SlangInt32)
}

unsafe extern "system" fn module_get_defined_entry_point(
    this: *mut IModule,
    index: SlangInt32,
    out_entry_point: *mut *mut IEntryPoint,
) -> SlangResult {
    if out_entry_point.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    let component = unsafe { component(this) };
    let found = component
        .module
        .as_ref()
        .and_then(|m| usize::try_from(index).ok().and_then(|i| m.entry_points.get(i)));
    match found {
        Some(entry_point) => {
            unsafe { new_entry_point(component, entry_point, out_entry_point) };
            SLANG_OK
        }
        None => SLANG_E_INVALID_ARG,
    }
}

unsafe extern "system" fn module_serialize(_: *mut IModule, _: *mut *mut ISlangBlob) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn module_write_to_file(_: *mut IModule, _: *const c_char) -> SlangResult {
    SLANG_E_NOT_IMPLEMENTED
}

unsafe extern "system" fn module_get_name(this: *mut IModule) -> *const c_char {
    unsafe { component(this) }.module.as_ref().map_or(ptr::null(), |m| m.name.as_ptr())
}

unsafe extern "system" fn module_get_file_path(this: *mut IModule) -> *const c_char {
    unsafe { component(this) }.module.as_ref().map_or(ptr::null(), |m| m.path.as_ptr())
}

unsafe extern "system" fn module_get_unique_identity(this: *mut IModule) -> *const c_char {
    unsafe { module_get_file_path(this) }
}

unsafe extern "system" fn module_find_and_check_entry_point(
    this: *mut IModule,
    name: *const c_char,
    stage: SlangStage,
    out_entry_point: *mut *mut IEntryPoint,
    out_diagnostics: *mut *mut ISlangBlob,
) -> SlangResult {
    if out_entry_point.is_null() {
        return SLANG_E_INVALID_ARG;
    }
    let Some(name) = (unsafe { c_str(name) }) else {
        return SLANG_E_INVALID_ARG;
    };
    let component = unsafe { component(this) };
    let found = component
        .module
        .as_ref()
        .and_then(|m| m.entry_points.iter().find(|e| e.name.to_str() == Ok(name)));
    match found {
        Some(entry_point) if entry_point.stage == stage => {
            unsafe { new_entry_point(component, entry_point, out_entry_point) };
            SLANG_OK
        }
        Some(_) => {
            let text = format!("error 38001: entry point '{name}' is not a {} shader", stage_name(stage));
            unsafe { write_diagnostics(out_diagnostics, &text) };
            SLANG_FAIL
        }
        None => {
            let text = format!("error 38000: no function found matching entry point name '{name}'");
            unsafe { write_diagnostics(out_diagnostics, &text) };
            SLANG_FAIL
        }
    }
}

static MODULE_VTBL: IModuleVtbl = IModuleVtbl {
    base: COMPONENT_BASE,
    findEntryPointByName: module_find_entry_point_by_name,
    getDefinedEntryPointCount: module_get_defined_entry_point_count,
    getDefinedEntryPoint: module_get_defined_entry_point,
    serialize: module_serialize,
    writeToFile: module_write_to_file,
    getName: module_get_name,
    getFilePath: module_get_file_path,
    getUniqueIdentity: module_get_unique_identity,
    findAndCheckEntryPoint: module_find_and_check_entry_point,
};

unsafe extern "system" fn entry_point_get_function_reflection(this: *mut IEntryPoint) -> *mut SlangReflectionFunction {
    unsafe { component(this) }
        .entry_point
        .as_ref()
        .map_or(ptr::null_mut(), |e| (&e.function as *const MockFunction).cast_mut().cast())
}

static ENTRY_POINT_VTBL: IEntryPointVtbl = IEntryPointVtbl {
    base: COMPONENT_BASE,
    getFunctionReflection: entry_point_get_function_reflection,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_at_zero_leaves_the_count_alone() {
        let blob: *mut MockBlob = Box::into_raw(Box::new(MockBlob {
            vtable: &BLOB_VTBL,
            refs: AtomicU32::new(0),
            data: Vec::new(),
            len: 0,
        }));
        unsafe {
            assert_eq!(release::<MockBlob>(blob.cast()), 0);
            assert_eq!((*blob).refs.load(Ordering::Acquire), 0);
            drop(Box::from_raw(blob));
        }
    }

    #[test]
    fn test_last_release_reports_zero() {
        let blob = new_blob(b"abc".to_vec());
        unsafe {
            assert_eq!(add_ref::<MockBlob>(blob.cast()), 2);
            assert_eq!(release::<MockBlob>(blob.cast()), 1);
            assert_eq!(release::<MockBlob>(blob.cast()), 0);
        }
    }
}
