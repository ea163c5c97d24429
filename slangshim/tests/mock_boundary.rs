//! Boundary tests against the in-process fake library

use slangshim::handle::upcast;
use slangshim::mock::{self, MockArg, MockAttribute, MockEntryPoint, MockModule, MockType, MockVar};
use slangshim::*;
use std::ffi::{CStr, c_char, c_float, c_int};
use std::ptr;

fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert!(mock::install(), "fake library must be installed before any load");

    let params = MockType::structure(
        "Params",
        vec![
            MockVar::new("scale", MockType::scalar(SLANG_SCALAR_TYPE_FLOAT32)),
            MockVar::new("count", MockType::scalar(SLANG_SCALAR_TYPE_UINT32)),
        ],
    );
    let output = MockType::resource(
        "RWStructuredBuffer",
        SLANG_STRUCTURED_BUFFER,
        SLANG_RESOURCE_ACCESS_READ_WRITE,
        MockType::scalar(SLANG_SCALAR_TYPE_FLOAT32),
    );
    mock::register_module(
        MockModule::new("compute")
            .parameter(MockVar::new("output", output).binding(0, 0))
            .parameter(
                MockVar::new("params", MockType::constant_buffer(params))
                    .binding(1, 0)
                    .with_attribute(
                        MockAttribute::new("Tweak")
                            .arg(MockArg::Int(3))
                            .arg(MockArg::Float(0.5))
                            .arg(MockArg::Str("slider".to_string())),
                    ),
            )
            .entry_point(
                MockEntryPoint::new("main", SLANG_STAGE_COMPUTE)
                    .thread_group_size([64, 1, 1])
                    .parameter(
                        MockVar::new("id", MockType::vector(SLANG_SCALAR_TYPE_UINT32, 3))
                            .semantic("SV_DispatchThreadID", 0),
                    ),
            ),
    );
    mock::register_module(
        MockModule::new("lighting")
            .entry_point(MockEntryPoint::new("vsMain", SLANG_STAGE_VERTEX))
            .entry_point(MockEntryPoint::new("psMain", SLANG_STAGE_FRAGMENT)),
    );
    mock::register_module(MockModule::new("broken").load_error("broken.slang(3): error 30015: undefined identifier 'x'"));
    mock::register_module(
        MockModule::new("noisy").warning("noisy.slang(1): warning 15205: implicit conversion"),
    );
}

// ============ Helpers ============

struct Fixture {
    global: *mut IGlobalSession,
    session: *mut ISession,
}

impl Fixture {
    fn new(formats: &[SlangCompileTarget]) -> Self {
        setup();
        let targets: Vec<_> = formats
            .iter()
            .map(|&format| TargetDesc {
                format,
                ..Default::default()
            })
            .collect();
        let desc = SessionDesc {
            targets: targets.as_ptr(),
            targetCount: targets.len() as SlangInt,
            ..Default::default()
        };

        unsafe {
            let mut global = ptr::null_mut();
            assert_eq!(GlobalSession_create(&mut global), SLANG_OK);
            let mut session = ptr::null_mut();
            assert_eq!(GlobalSession_createSession(&mut global, &desc, &mut session), SLANG_OK);
            Self { global, session }
        }
    }

    fn load(&mut self, name: &CStr) -> *mut IModule {
        let mut diagnostics: *mut ISlangBlob = ptr::null_mut();
        let module = unsafe { Session_loadModule(&mut self.session, name.as_ptr(), &mut diagnostics) };
        unsafe { release_blob(diagnostics) };
        assert!(!module.is_null(), "{name:?} should load");
        module
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        unsafe {
            Session_release(&mut self.session);
            GlobalSession_release(&mut self.global);
        }
    }
}

unsafe fn blob_bytes(mut blob: *mut ISlangBlob) -> Vec<u8> {
    unsafe {
        let data = Blob_getBufferPointer(&mut blob);
        let size = Blob_getBufferSize(&mut blob);
        std::slice::from_raw_parts(data.cast::<u8>(), size).to_vec()
    }
}

unsafe fn release_blob(mut blob: *mut ISlangBlob) {
    if !blob.is_null() {
        unsafe { Blob_release(&mut blob) };
    }
}

unsafe fn text(s: *const c_char) -> String {
    assert!(!s.is_null());
    unsafe { CStr::from_ptr(s) }.to_string_lossy().into_owned()
}

// ============ Global session ============

#[test]
fn test_global_session_queries() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    unsafe {
        assert_ne!(GlobalSession_findProfile(&mut fx.global, c"spirv_1_5".as_ptr()), SLANG_UNKNOWN_PROFILE);
        assert_eq!(GlobalSession_findProfile(&mut fx.global, c"no_such_profile".as_ptr()), SLANG_UNKNOWN_PROFILE);
        assert_ne!(GlobalSession_findCapability(&mut fx.global, c"spirv_1_5".as_ptr()), 0);
        assert_eq!(GlobalSession_checkCompileTargetSupport(&mut fx.global, SLANG_SPIRV), SLANG_OK);
        assert!(failed(GlobalSession_checkCompileTargetSupport(&mut fx.global, SLANG_DXIL)));
        assert!(!text(GlobalSession_getBuildTagString(&mut fx.global)).is_empty());
    }
}

#[test]
fn test_create_with_desc() {
    setup();
    unsafe {
        let desc = SlangGlobalSessionDesc::default();
        let mut global = ptr::null_mut();
        assert_eq!(GlobalSession_createWithDesc(&desc, &mut global), SLANG_OK);
        assert!(!global.is_null());
        assert_eq!(GlobalSession_release(&mut global), 0);
    }
}

#[test]
fn test_create_rejects_null_output() {
    setup();
    unsafe {
        assert_eq!(GlobalSession_create(ptr::null_mut()), SLANG_E_INVALID_ARG);
    }
}

#[test]
fn test_session_borrows_its_global_session() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    unsafe {
        assert_eq!(Session_getGlobalSession(&mut fx.session), fx.global);
    }
}

// ============ Receiver validation ============

#[test]
fn test_null_receivers_return_invalid_handle() {
    setup();
    unsafe {
        let mut null_module: *mut IModule = ptr::null_mut();
        let untouched = 0x1000 as *mut IEntryPoint;
        let mut out = untouched;

        // Null slot
        assert_eq!(
            Module_findEntryPointByName(ptr::null_mut(), c"main".as_ptr(), &mut out),
            SLANG_E_INVALID_HANDLE
        );
        // Slot holding a null reference
        assert_eq!(
            Module_findEntryPointByName(&mut null_module, c"main".as_ptr(), &mut out),
            SLANG_E_INVALID_HANDLE
        );
        assert_eq!(out, untouched, "output must not be written");

        let mut null_component: *mut IComponentType = ptr::null_mut();
        let mut code = ptr::null_mut();
        assert_eq!(
            ComponentType_getTargetCode(&mut null_component, 0, &mut code, ptr::null_mut()),
            SLANG_E_INVALID_HANDLE
        );
        assert!(code.is_null());
    }
}

#[test]
fn test_null_receivers_return_sentinels() {
    setup();
    unsafe {
        let mut session: *mut ISession = ptr::null_mut();
        assert!(Session_loadModule(&mut session, c"compute".as_ptr(), ptr::null_mut()).is_null());
        assert_eq!(Session_getLoadedModuleCount(&mut session), 0);

        let mut module: *mut IModule = ptr::null_mut();
        assert!(Module_getName(&mut module).is_null());
        assert_eq!(Module_getDefinedEntryPointCount(&mut module), 0);
        assert_eq!(Module_release(&mut module), 0);

        let mut reflection: *mut SlangReflection = ptr::null_mut();
        assert_eq!(ShaderReflection_getParameterCount(&mut reflection), 0);
        assert!(ShaderReflection_getGlobalParamsTypeLayout(&mut reflection).is_null());

        let mut layout: *mut SlangReflectionTypeLayout = ptr::null_mut();
        assert_eq!(TypeLayoutReflection_getFieldCount(&mut layout), 0);
        assert_eq!(TypeLayoutReflection_findFieldIndexByName(&mut layout, c"x".as_ptr(), ptr::null()), -1);

        let mut entry_point: *mut SlangReflectionEntryPoint = ptr::null_mut();
        let mut sizes: [SlangUInt; 3] = [7, 7, 7];
        EntryPointReflection_getComputeThreadGroupSize(&mut entry_point, 3, sizes.as_mut_ptr());
        assert_eq!(sizes, [7, 7, 7]);

        let mut attribute: *mut SlangReflectionUserAttribute = ptr::null_mut();
        let mut value: c_int = 42;
        assert_eq!(UserAttribute_getArgumentValueInt(&mut attribute, 0, &mut value), SLANG_E_INVALID_HANDLE);
        assert_eq!(value, 42);
    }
}

// ============ Modules & entry points ============

#[test]
fn test_single_compute_entry_point() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let mut module = fx.load(c"compute");
    unsafe {
        assert_eq!(Module_getDefinedEntryPointCount(&mut module), 1);

        let mut entry_point = ptr::null_mut();
        assert_eq!(Module_getDefinedEntryPoint(&mut module, 0, &mut entry_point), SLANG_OK);
        assert!(!entry_point.is_null());

        let mut function = EntryPoint_getFunctionReflection(&mut entry_point);
        assert_eq!(text(FunctionReflection_getName(&mut function)), "main");

        let mut component = upcast::<IEntryPoint, IComponentType>(entry_point);
        let mut layout = ComponentType_getLayout(&mut component, 0, ptr::null_mut());
        let mut reflected = ShaderReflection_getEntryPointByIndex(&mut layout, 0);
        assert_eq!(text(EntryPointReflection_getName(&mut reflected)), "main");
        assert_eq!(EntryPointReflection_getStage(&mut reflected), SLANG_STAGE_COMPUTE);

        let mut sizes: [SlangUInt; 3] = [0; 3];
        EntryPointReflection_getComputeThreadGroupSize(&mut reflected, 3, sizes.as_mut_ptr());
        assert_eq!(sizes, [64, 1, 1]);

        assert_eq!(EntryPoint_release(&mut entry_point), 0);
    }
}

#[test]
fn test_find_entry_point_by_name_hands_out_an_owned_reference() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let mut module = fx.load(c"lighting");
    unsafe {
        let mut entry_point = ptr::null_mut();
        assert_eq!(Module_findEntryPointByName(&mut module, c"psMain".as_ptr(), &mut entry_point), SLANG_OK);
        assert!(!entry_point.is_null());

        let mut function = EntryPoint_getFunctionReflection(&mut entry_point);
        assert_eq!(text(FunctionReflection_getName(&mut function)), "psMain");

        // The caller holds the only reference
        let mut component = upcast::<IEntryPoint, IComponentType>(entry_point);
        assert_eq!(ComponentType_addRef(&mut component), 2);
        assert_eq!(ComponentType_release(&mut component), 1);
        assert_eq!(EntryPoint_release(&mut entry_point), 0);

        let mut missing = ptr::null_mut();
        assert!(failed(Module_findEntryPointByName(&mut module, c"nope".as_ptr(), &mut missing)));
        assert!(missing.is_null());
    }
}

#[test]
fn test_find_and_check_entry_point_reports_stage_mismatch() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let mut module = fx.load(c"lighting");
    unsafe {
        let mut entry_point = ptr::null_mut();
        let mut diagnostics = ptr::null_mut();
        let result = Module_findAndCheckEntryPoint(
            &mut module,
            c"vsMain".as_ptr(),
            SLANG_STAGE_FRAGMENT,
            &mut entry_point,
            &mut diagnostics,
        );
        assert!(failed(result));
        assert!(entry_point.is_null());
        assert!(String::from_utf8_lossy(&blob_bytes(diagnostics)).contains("vsMain"));
        release_blob(diagnostics);

        let result = Module_findAndCheckEntryPoint(
            &mut module,
            c"vsMain".as_ptr(),
            SLANG_STAGE_VERTEX,
            &mut entry_point,
            ptr::null_mut(),
        );
        assert_eq!(result, SLANG_OK);
        assert_eq!(EntryPoint_release(&mut entry_point), 0);
    }
}

#[test]
fn test_out_of_range_entry_point_index() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let mut module = fx.load(c"compute");
    unsafe {
        let mut entry_point = ptr::null_mut();
        assert!(failed(Module_getDefinedEntryPoint(&mut module, 5, &mut entry_point)));
        assert!(entry_point.is_null());
    }
}

#[test]
fn test_module_name_and_path() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let mut module = fx.load(c"compute");
    unsafe {
        assert_eq!(text(Module_getName(&mut module)), "compute");
        assert_eq!(text(Module_getFilePath(&mut module)), "compute.slang");
    }
}

#[test]
fn test_session_owns_loaded_modules() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let first = fx.load(c"compute");
    let again = fx.load(c"compute");
    assert_eq!(first, again, "a module is loaded once per session");
    fx.load(c"lighting");
    unsafe {
        assert_eq!(Session_getLoadedModuleCount(&mut fx.session), 2);
        assert_eq!(Session_getLoadedModule(&mut fx.session, 0), first);
        assert!(Session_getLoadedModule(&mut fx.session, 9).is_null());
    }
}

#[test]
fn test_load_failure_returns_null_with_diagnostics() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    unsafe {
        let mut diagnostics = ptr::null_mut();
        let module = Session_loadModule(&mut fx.session, c"broken".as_ptr(), &mut diagnostics);
        assert!(module.is_null());
        let message = String::from_utf8_lossy(&blob_bytes(diagnostics)).into_owned();
        assert!(message.contains("undefined identifier"), "{message}");
        release_blob(diagnostics);

        let mut diagnostics = ptr::null_mut();
        let module = Session_loadModule(&mut fx.session, c"missing".as_ptr(), &mut diagnostics);
        assert!(module.is_null());
        assert!(!diagnostics.is_null());
        release_blob(diagnostics);
    }
}

#[test]
fn test_warnings_come_back_with_the_module() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    unsafe {
        let mut diagnostics = ptr::null_mut();
        let module = Session_loadModuleFromSourceString(
            &mut fx.session,
            c"noisy".as_ptr(),
            c"noisy.slang".as_ptr(),
            c"float f(int x) { return x; }".as_ptr(),
            &mut diagnostics,
        );
        assert!(!module.is_null());
        assert!(String::from_utf8_lossy(&blob_bytes(diagnostics)).contains("warning"));
        release_blob(diagnostics);
    }
}

#[test]
fn test_load_module_from_source_blob() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    unsafe {
        let mut source = mock::blob(b"[shader(\"compute\")] void main() {}");
        let mut diagnostics = ptr::null_mut();
        let mut module = Session_loadModuleFromSource(
            &mut fx.session,
            c"compute".as_ptr(),
            c"compute.slang".as_ptr(),
            source,
            &mut diagnostics,
        );
        assert!(!module.is_null());
        assert!(diagnostics.is_null());
        assert_eq!(text(Module_getName(&mut module)), "compute");
        assert_eq!(Session_getLoadedModuleCount(&mut fx.session), 1);

        // No diagnostics slot is fine
        let again = Session_loadModuleFromSource(
            &mut fx.session,
            c"compute".as_ptr(),
            c"compute.slang".as_ptr(),
            source,
            ptr::null_mut(),
        );
        assert_eq!(again, module);

        let mut null_session: *mut ISession = ptr::null_mut();
        let untouched = 0x1000 as *mut ISlangBlob;
        let mut out = untouched;
        assert!(
            Session_loadModuleFromSource(&mut null_session, c"compute".as_ptr(), ptr::null(), source, &mut out)
                .is_null()
        );
        assert!(
            Session_loadModuleFromSource(ptr::null_mut(), c"compute".as_ptr(), ptr::null(), source, &mut out)
                .is_null()
        );
        assert_eq!(out, untouched, "diagnostics must not be written");

        let missing = Session_loadModuleFromSource(
            &mut fx.session,
            c"lighting".as_ptr(),
            c"lighting.slang".as_ptr(),
            ptr::null_mut(),
            &mut diagnostics,
        );
        assert!(missing.is_null());
        assert!(String::from_utf8_lossy(&blob_bytes(diagnostics)).contains("error"));
        release_blob(diagnostics);

        assert_eq!(Blob_release(&mut source), 0);
    }
}

#[test]
fn test_component_reports_its_owning_session() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let module = fx.load(c"compute");
    unsafe {
        let mut component = upcast::<IModule, IComponentType>(module);
        assert_eq!(ComponentType_getSession(&mut component), fx.session);

        let mut linked = compose_and_link(&mut fx, module, c"main");
        assert_eq!(ComponentType_getSession(&mut linked), fx.session);
        ComponentType_release(&mut linked);

        let mut null_component: *mut IComponentType = ptr::null_mut();
        assert!(ComponentType_getSession(&mut null_component).is_null());
        assert!(ComponentType_getSession(ptr::null_mut()).is_null());
    }
}

#[test]
fn test_entry_point_outlives_released_session() {
    unsafe {
        let mut fx = Fixture::new(&[SLANG_SPIRV]);
        let mut module = fx.load(c"compute");
        let mut entry_point = ptr::null_mut();
        assert_eq!(Module_findEntryPointByName(&mut module, c"main".as_ptr(), &mut entry_point), SLANG_OK);
        let session = fx.session;
        drop(fx);

        // The entry point's reference keeps the session and its targets alive
        let mut component = upcast::<IEntryPoint, IComponentType>(entry_point);
        assert_eq!(ComponentType_getSession(&mut component), session);
        let mut code = ptr::null_mut();
        assert_eq!(ComponentType_getEntryPointCode(&mut component, 0, 0, &mut code, ptr::null_mut()), SLANG_OK);
        assert!(Blob_getBufferSize(&mut code) >= 20);
        release_blob(code);
        assert_eq!(EntryPoint_release(&mut entry_point), 0);
    }
}

// ============ Composition, linking & code ============

unsafe fn compose_and_link(fx: &mut Fixture, module: *mut IModule, entry: &CStr) -> *mut IComponentType {
    unsafe {
        let mut module = module;
        let mut entry_point = ptr::null_mut();
        assert_eq!(Module_findEntryPointByName(&mut module, entry.as_ptr(), &mut entry_point), SLANG_OK);

        let parts = [
            upcast::<IModule, IComponentType>(module),
            upcast::<IEntryPoint, IComponentType>(entry_point),
        ];
        let mut composite = ptr::null_mut();
        assert_eq!(
            Session_createCompositeComponentType(
                &mut fx.session,
                parts.as_ptr(),
                parts.len() as SlangInt,
                &mut composite,
                ptr::null_mut(),
            ),
            SLANG_OK
        );
        EntryPoint_release(&mut entry_point);

        let mut linked = ptr::null_mut();
        assert_eq!(ComponentType_link(&mut composite, &mut linked, ptr::null_mut()), SLANG_OK);
        ComponentType_release(&mut composite);
        linked
    }
}

#[test]
fn test_target_code_blob_length_matches_bytes() {
    let mut fx = Fixture::new(&[SLANG_SPIRV, SLANG_GLSL]);
    let module = fx.load(c"compute");
    unsafe {
        let mut linked = compose_and_link(&mut fx, module, c"main");

        let mut code = ptr::null_mut();
        assert_eq!(ComponentType_getTargetCode(&mut linked, 0, &mut code, ptr::null_mut()), SLANG_OK);
        let size = Blob_getBufferSize(&mut code);
        let bytes = blob_bytes(code);
        assert_eq!(bytes.len(), size);
        assert_eq!(&bytes[..4], &0x0723_0203u32.to_le_bytes(), "SPIR-V magic");
        release_blob(code);

        let mut glsl = ptr::null_mut();
        assert_eq!(ComponentType_getEntryPointCode(&mut linked, 0, 1, &mut glsl, ptr::null_mut()), SLANG_OK);
        assert!(String::from_utf8_lossy(&blob_bytes(glsl)).contains("main"));
        release_blob(glsl);

        assert_eq!(ComponentType_release(&mut linked), 0);
    }
}

#[test]
fn test_invalid_target_index_leaves_output_untouched() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let module = fx.load(c"compute");
    unsafe {
        let mut linked = compose_and_link(&mut fx, module, c"main");

        let mut code = ptr::null_mut();
        let mut diagnostics = ptr::null_mut();
        let result = ComponentType_getTargetCode(&mut linked, 3, &mut code, &mut diagnostics);
        assert!(failed(result));
        assert!(code.is_null());
        release_blob(diagnostics);

        assert!(ComponentType_getLayout(&mut linked, 3, ptr::null_mut()).is_null());
        ComponentType_release(&mut linked);
    }
}

#[test]
fn test_link_with_options_is_recorded_in_the_output() {
    let mut fx = Fixture::new(&[SLANG_GLSL]);
    let module = fx.load(c"compute");
    unsafe {
        let mut linked = compose_and_link(&mut fx, module, c"main");
        let mut options = [CompilerOptionEntry {
            name: COMPILER_OPTION_OPTIMIZATION,
            value: CompilerOptionValue {
                intValue0: 3,
                ..Default::default()
            },
        }];
        let mut relinked = ptr::null_mut();
        let result = ComponentType_linkWithOptions(
            &mut linked,
            &mut relinked,
            options.len() as u32,
            options.as_mut_ptr(),
            ptr::null_mut(),
        );
        assert_eq!(result, SLANG_OK);

        let mut code = ptr::null_mut();
        assert_eq!(ComponentType_getTargetCode(&mut relinked, 0, &mut code, ptr::null_mut()), SLANG_OK);
        let listing = String::from_utf8_lossy(&blob_bytes(code)).into_owned();
        assert!(listing.contains(&format!("options {COMPILER_OPTION_OPTIMIZATION}")), "{listing}");
        release_blob(code);

        ComponentType_release(&mut relinked);
        ComponentType_release(&mut linked);
    }
}

#[test]
fn test_query_interface_distinguishes_modules() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let module = fx.load(c"compute");
    unsafe {
        let mut unknown = slangshim::handle::as_unknown(module);
        let mut out = ptr::null_mut();
        assert_eq!(Unknown_queryInterface(&mut unknown, &IID_IMODULE, &mut out), SLANG_OK);
        assert_eq!(out.cast::<IModule>(), module);
        Unknown_release(&mut unknown);

        let mut out = ptr::null_mut();
        assert_eq!(
            Unknown_queryInterface(&mut unknown, &IID_IGLOBAL_SESSION, &mut out),
            SLANG_E_NO_INTERFACE
        );
        assert!(out.is_null());
    }
}

// ============ Reflection ============

#[test]
fn test_parameter_names_round_trip() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let module = fx.load(c"compute");
    unsafe {
        let mut linked = compose_and_link(&mut fx, module, c"main");
        let mut layout = ComponentType_getLayout(&mut linked, 0, ptr::null_mut());
        assert!(!layout.is_null());

        let count = ShaderReflection_getParameterCount(&mut layout);
        let names: Vec<_> = (0..count)
            .map(|i| {
                let mut param = ShaderReflection_getParameterByIndex(&mut layout, i);
                text(VariableLayoutReflection_getName(&mut param))
            })
            .collect();
        pretty_assertions::assert_eq!(names, vec!["output", "params"]);

        let mut params = ShaderReflection_getParameterByIndex(&mut layout, 1);
        assert_eq!(VariableLayoutReflection_getBindingIndex(&mut params), 1);
        assert_eq!(VariableLayoutReflection_getBindingSpace(&mut params), 0);

        let mut globals = ShaderReflection_getGlobalParamsTypeLayout(&mut layout);
        assert_eq!(TypeLayoutReflection_getFieldCount(&mut globals), 2);
        assert_eq!(
            TypeLayoutReflection_findFieldIndexByName(&mut globals, c"params".as_ptr(), ptr::null()),
            1
        );

        ComponentType_release(&mut linked);
    }
}

#[test]
fn test_constant_buffer_element_layout() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let module = fx.load(c"compute");
    unsafe {
        let mut component = upcast::<IModule, IComponentType>(module);
        let mut layout = ComponentType_getLayout(&mut component, 0, ptr::null_mut());
        let mut params = ShaderReflection_getParameterByIndex(&mut layout, 1);
        let mut buffer = VariableLayoutReflection_getTypeLayout(&mut params);
        assert_eq!(TypeLayoutReflection_getKind(&mut buffer), SLANG_TYPE_KIND_CONSTANT_BUFFER);

        let mut element = TypeLayoutReflection_getElementTypeLayout(&mut buffer);
        assert_eq!(text(TypeLayoutReflection_getName(&mut element)), "Params");
        assert_eq!(TypeLayoutReflection_getSize(&mut element, SLANG_PARAMETER_CATEGORY_UNIFORM), 8);

        let mut count_field = TypeLayoutReflection_getFieldByIndex(&mut element, 1);
        assert_eq!(text(VariableLayoutReflection_getName(&mut count_field)), "count");
        assert_eq!(VariableLayoutReflection_getOffset(&mut count_field, SLANG_PARAMETER_CATEGORY_UNIFORM), 4);

        let mut ty = TypeLayoutReflection_getType(&mut element);
        assert_eq!(TypeReflection_getKind(&mut ty), SLANG_TYPE_KIND_STRUCT);
        assert_eq!(TypeReflection_getFieldCount(&mut ty), 2);

        assert!(!ShaderReflection_findTypeByName(&mut layout, c"Params".as_ptr()).is_null());
    }
}

#[test]
fn test_entry_point_parameters_and_semantics() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let module = fx.load(c"compute");
    unsafe {
        let mut linked = compose_and_link(&mut fx, module, c"main");
        let mut layout = ComponentType_getLayout(&mut linked, 0, ptr::null_mut());
        let mut entry_point = ShaderReflection_findEntryPointByName(&mut layout, c"main".as_ptr());
        assert_eq!(EntryPointReflection_getParameterCount(&mut entry_point), 1);

        let mut id = EntryPointReflection_getParameterByIndex(&mut entry_point, 0);
        assert_eq!(text(VariableLayoutReflection_getSemanticName(&mut id)), "SV_DispatchThreadID");
        assert_eq!(VariableLayoutReflection_getSemanticIndex(&mut id), 0);
        assert_eq!(VariableLayoutReflection_getStage(&mut id), SLANG_STAGE_COMPUTE);

        let mut id_type = VariableLayoutReflection_getTypeLayout(&mut id);
        let mut ty = TypeLayoutReflection_getType(&mut id_type);
        assert_eq!(TypeReflection_getKind(&mut ty), SLANG_TYPE_KIND_VECTOR);
        assert_eq!(TypeReflection_getElementCount(&mut ty), 3);

        assert!(!EntryPointReflection_getTypeLayout(&mut entry_point).is_null());
        ComponentType_release(&mut linked);
    }
}

#[test]
fn test_user_attribute_arguments() {
    let mut fx = Fixture::new(&[SLANG_SPIRV]);
    let module = fx.load(c"compute");
    unsafe {
        let mut component = upcast::<IModule, IComponentType>(module);
        let mut layout = ComponentType_getLayout(&mut component, 0, ptr::null_mut());
        let mut params = ShaderReflection_getParameterByIndex(&mut layout, 1);
        assert_eq!(VariableLayoutReflection_getUserAttributeCount(&mut params), 1);

        let mut attribute = VariableLayoutReflection_findUserAttributeByName(&mut params, fx.global, c"Tweak".as_ptr());
        assert!(!attribute.is_null());
        assert_eq!(text(UserAttribute_getName(&mut attribute)), "Tweak");
        assert_eq!(UserAttribute_getArgumentCount(&mut attribute), 3);

        let mut int_value: c_int = 0;
        assert_eq!(UserAttribute_getArgumentValueInt(&mut attribute, 0, &mut int_value), SLANG_OK);
        assert_eq!(int_value, 3);

        let mut float_value: c_float = 0.0;
        assert_eq!(UserAttribute_getArgumentValueFloat(&mut attribute, 1, &mut float_value), SLANG_OK);
        assert_eq!(float_value, 0.5);
        assert!(failed(UserAttribute_getArgumentValueFloat(&mut attribute, 0, &mut float_value)));

        let mut size = 0usize;
        let s = UserAttribute_getArgumentValueString(&mut attribute, 2, &mut size);
        assert_eq!(std::slice::from_raw_parts(s.cast::<u8>(), size), b"slider");

        assert!(VariableLayoutReflection_findUserAttributeByName(&mut params, fx.global, c"Other".as_ptr()).is_null());
    }
}
