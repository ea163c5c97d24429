//! Slang's COM interfaces and their flat exports
//!
//! Declarations list every virtual method in vtable order; only the methods
//! tagged `export` or `status` become `<Family>_<method>` functions.

use crate::handle;
use crate::types::*;
use slangshim_proc::slang_interface;
use std::ffi::{c_char, c_void};

slang_interface! {
    /// Root of every reference-counted Slang object
    ISlangUnknown as Unknown {
        vtable: ISlangUnknownVtbl,
        /// Asks the object for another interface. On success the out slot
        /// holds a new reference.
        fn queryInterface(uuid: *const SlangUUID, out_object: *mut *mut c_void) -> SlangResult => status;
        fn addRef() -> u32 => export;
        fn release() -> u32 => export;
    }
}

slang_interface! {
    /// Read-only byte buffer: compiled code or diagnostics text
    ISlangBlob: ISlangUnknown as Blob {
        vtable: ISlangBlobVtbl,
        fn getBufferPointer() -> *const c_void => export;
        fn getBufferSize() -> usize => export;
    }
}

slang_interface! {
    /// Process-level compiler instance
    IGlobalSession: ISlangUnknown as GlobalSession {
        vtable: IGlobalSessionVtbl,
        fn createSession(desc: *const SessionDesc, out_session: *mut *mut ISession) -> SlangResult => status;
        fn findProfile(name: *const c_char) -> SlangProfileID => export;
        fn setDownstreamCompilerPath(pass_through: SlangPassThrough, path: *const c_char);
        fn setDownstreamCompilerPrelude(pass_through: SlangPassThrough, prelude_text: *const c_char);
        fn getDownstreamCompilerPrelude(pass_through: SlangPassThrough, out_prelude: *mut *mut ISlangBlob);
        /// Version tag of the loaded compiler, owned by the global session
        fn getBuildTagString() -> *const c_char => export;
        fn setDefaultDownstreamCompiler(source_language: SlangSourceLanguage, default_compiler: SlangPassThrough) -> SlangResult;
        fn getDefaultDownstreamCompiler(source_language: SlangSourceLanguage) -> SlangPassThrough;
        fn setLanguagePrelude(source_language: SlangSourceLanguage, prelude_text: *const c_char);
        fn getLanguagePrelude(source_language: SlangSourceLanguage, out_prelude: *mut *mut ISlangBlob);
        fn createCompileRequest(out_compile_request: *mut *mut c_void) -> SlangResult;
        fn addBuiltins(source_path: *const c_char, source_string: *const c_char);
        fn setSharedLibraryLoader(loader: *mut c_void);
        fn getSharedLibraryLoader() -> *mut c_void;
        fn checkCompileTargetSupport(target: SlangCompileTarget) -> SlangResult => status;
        fn checkPassThroughSupport(pass_through: SlangPassThrough) -> SlangResult;
        fn compileCoreModule(flags: CompileCoreModuleFlags) -> SlangResult;
        fn loadCoreModule(core_module: *const c_void, core_module_size_in_bytes: usize) -> SlangResult;
        fn saveCoreModule(archive_type: SlangArchiveType, out_blob: *mut *mut ISlangBlob) -> SlangResult;
        fn findCapability(name: *const c_char) -> SlangCapabilityID => export;
    }
}

slang_interface! {
    /// A scope for loading modules against a fixed set of targets
    ISession: ISlangUnknown as Session {
        vtable: ISessionVtbl,
        /// Borrowed; no reference is added
        fn getGlobalSession() -> *mut IGlobalSession => export;
        /// Loads a module by name through the search paths. The session owns
        /// the returned module.
        fn loadModule(module_name: *const c_char, out_diagnostics: *mut *mut ISlangBlob) -> *mut IModule => export;
        fn loadModuleFromSource(
            module_name: *const c_char,
            path: *const c_char,
            source: *mut ISlangBlob,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> *mut IModule => export;
        fn createCompositeComponentType(
            component_types: *const *mut IComponentType,
            component_type_count: SlangInt,
            out_composite_component_type: *mut *mut IComponentType,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult => status;
        fn specializeType(
            type_: *mut SlangReflectionType,
            specialization_args: *const c_void,
            specialization_arg_count: SlangInt,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> *mut SlangReflectionType;
        fn getTypeLayout(
            type_: *mut SlangReflectionType,
            target_index: SlangInt,
            rules: SlangLayoutRules,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> *mut SlangReflectionTypeLayout;
        fn getContainerType(
            element_type: *mut SlangReflectionType,
            container_type: SlangContainerType,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> *mut SlangReflectionType;
        fn getDynamicType() -> *mut SlangReflectionType;
        fn getTypeRTTIMangledName(type_: *mut SlangReflectionType, out_name_blob: *mut *mut ISlangBlob) -> SlangResult;
        fn getTypeConformanceWitnessMangledName(
            type_: *mut SlangReflectionType,
            interface_type: *mut SlangReflectionType,
            out_name_blob: *mut *mut ISlangBlob,
        ) -> SlangResult;
        fn getTypeConformanceWitnessSequentialID(
            type_: *mut SlangReflectionType,
            interface_type: *mut SlangReflectionType,
            out_id: *mut u32,
        ) -> SlangResult;
        fn createCompileRequest(out_compile_request: *mut *mut c_void) -> SlangResult;
        fn createTypeConformanceComponentType(
            type_: *mut SlangReflectionType,
            interface_type: *mut SlangReflectionType,
            out_conformance: *mut *mut c_void,
            conformance_id_override: SlangInt,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult;
        fn loadModuleFromIRBlob(
            module_name: *const c_char,
            path: *const c_char,
            source: *mut ISlangBlob,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> *mut IModule;
        fn getLoadedModuleCount() -> SlangInt => export;
        /// Borrowed; the session keeps it alive
        fn getLoadedModule(index: SlangInt) -> *mut IModule => export;
        fn isBinaryModuleUpToDate(module_path: *const c_char, binary_module_blob: *mut ISlangBlob) -> bool;
        fn loadModuleFromSourceString(
            module_name: *const c_char,
            path: *const c_char,
            string: *const c_char,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> *mut IModule => export;
    }
}

slang_interface! {
    /// Anything that can be composed, linked and compiled
    IComponentType: ISlangUnknown as ComponentType {
        vtable: IComponentTypeVtbl,
        fn getSession() -> *mut ISession => export;
        /// Program layout for one target, owned by the component type.
        /// Null on failure, e.g. an out-of-range target index.
        fn getLayout(target_index: SlangInt, out_diagnostics: *mut *mut ISlangBlob) -> *mut SlangReflection => export;
        fn getSpecializationParamCount() -> SlangInt => export;
        fn getEntryPointCode(
            entry_point_index: SlangInt,
            target_index: SlangInt,
            out_code: *mut *mut ISlangBlob,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult => status;
        fn getResultAsFileSystem(
            entry_point_index: SlangInt,
            target_index: SlangInt,
            out_file_system: *mut *mut c_void,
        ) -> SlangResult;
        fn getEntryPointHash(entry_point_index: SlangInt, target_index: SlangInt, out_hash: *mut *mut ISlangBlob);
        fn specialize(
            specialization_args: *const c_void,
            specialization_arg_count: SlangInt,
            out_specialized_component_type: *mut *mut IComponentType,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult;
        fn link(out_linked_component_type: *mut *mut IComponentType, out_diagnostics: *mut *mut ISlangBlob) -> SlangResult => status;
        fn getEntryPointHostCallable(
            entry_point_index: i32,
            target_index: i32,
            out_shared_library: *mut *mut c_void,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult;
        fn renameEntryPoint(new_name: *const c_char, out_entry_point: *mut *mut IComponentType) -> SlangResult;
        fn linkWithOptions(
            out_linked_component_type: *mut *mut IComponentType,
            compiler_option_entry_count: u32,
            compiler_option_entries: *mut CompilerOptionEntry,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult => status;
        fn getTargetCode(
            target_index: SlangInt,
            out_code: *mut *mut ISlangBlob,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult => status;
        fn getTargetMetadata(
            target_index: SlangInt,
            out_metadata: *mut *mut c_void,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult;
        fn getEntryPointMetadata(
            entry_point_index: SlangInt,
            target_index: SlangInt,
            out_metadata: *mut *mut c_void,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult;
    }
}

slang_interface! {
    IEntryPoint: IComponentType as EntryPoint {
        vtable: IEntryPointVtbl,
        fn getFunctionReflection() -> *mut SlangReflectionFunction => export;
    }
}

slang_interface! {
    /// A loaded translation unit
    IModule: IComponentType as Module {
        vtable: IModuleVtbl,
        /// Looks up an entry point declared with `[shader(...)]`. On success
        /// the out slot holds a reference the caller must release.
        fn findEntryPointByName(name: *const c_char, out_entry_point: *mut *mut IEntryPoint) -> SlangResult => status;
        fn getDefinedEntryPointCount() -> SlangInt32 => export;
        fn getDefinedEntryPoint(index: SlangInt32, out_entry_point: *mut *mut IEntryPoint) -> SlangResult => status;
        fn serialize(out_serialized_blob: *mut *mut ISlangBlob) -> SlangResult;
        fn writeToFile(file_name: *const c_char) -> SlangResult;
        fn getName() -> *const c_char => export;
        fn getFilePath() -> *const c_char => export;
        fn getUniqueIdentity() -> *const c_char;
        /// Like `findEntryPointByName`, but also checks an undecorated
        /// function as an entry point for `stage`
        fn findAndCheckEntryPoint(
            name: *const c_char,
            stage: SlangStage,
            out_entry_point: *mut *mut IEntryPoint,
            out_diagnostics: *mut *mut ISlangBlob,
        ) -> SlangResult => status;
    }
}

// addRef/release for each family go through the ISlangUnknown prefix
macro_rules! ref_count_exports {
    ($($family:ident: $iface:ty { $($op:ident),* }),* $(,)?) => {
        paste::paste! {
            $($(
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<$family _ $op>](this: *mut *mut $iface) -> u32 {
                    unsafe { handle::[<$op:snake>](this, concat!(stringify!($family), "_", stringify!($op))) }
                }
            )*)*
        }
    };
}

ref_count_exports! {
    GlobalSession: IGlobalSession { addRef, release },
    Session: ISession { addRef, release },
    ComponentType: IComponentType { addRef, release },
    Module: IModule { release },
    EntryPoint: IEntryPoint { release },
    Blob: ISlangBlob { release },
}
