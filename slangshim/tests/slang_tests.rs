//! Integration tests against a real Slang library
//!
//! These need libslang next to the test binary or named by
//! `SLANGSHIM_LIBRARY`, so they are ignored by default:
//! `cargo test -p slangshim -- --ignored`.

use slangshim::*;
use std::ffi::{CStr, c_char};
use std::ptr;

const COMPUTE_SHADER: &CStr = c"
RWStructuredBuffer<float> output;
StructuredBuffer<float> input;

[shader(\"compute\")]
[numthreads(64, 1, 1)]
void main(uint3 id : SV_DispatchThreadID) {
    output[id.x] = input[id.x] * 2.0;
}
";

const BAD_SHADER: &CStr = c"
[shader(\"fragment\")]
float4 main() : SV_Target {
    return undefined_variable;
}
";

unsafe fn blob_text(mut blob: *mut ISlangBlob) -> String {
    if blob.is_null() {
        return String::new();
    }
    unsafe {
        let data = Blob_getBufferPointer(&mut blob);
        let size = Blob_getBufferSize(&mut blob);
        String::from_utf8_lossy(std::slice::from_raw_parts(data.cast::<u8>(), size)).into_owned()
    }
}

unsafe fn text(s: *const c_char) -> String {
    assert!(!s.is_null());
    unsafe { CStr::from_ptr(s) }.to_string_lossy().into_owned()
}

unsafe fn spirv_session() -> (*mut IGlobalSession, *mut ISession) {
    unsafe {
        let mut global = ptr::null_mut();
        assert_eq!(GlobalSession_create(&mut global), SLANG_OK, "Slang library not loadable");

        let target = TargetDesc {
            format: SLANG_SPIRV,
            profile: GlobalSession_findProfile(&mut global, c"spirv_1_5".as_ptr()),
            ..Default::default()
        };
        let desc = SessionDesc {
            targets: &target,
            targetCount: 1,
            ..Default::default()
        };
        let mut session = ptr::null_mut();
        assert_eq!(GlobalSession_createSession(&mut global, &desc, &mut session), SLANG_OK);
        (global, session)
    }
}

#[test]
#[ignore = "requires libslang"]
fn test_compile_compute_shader() {
    unsafe {
        let (mut global, mut session) = spirv_session();

        let mut diagnostics = ptr::null_mut();
        let mut module = Session_loadModuleFromSourceString(
            &mut session,
            c"compute".as_ptr(),
            c"compute.slang".as_ptr(),
            COMPUTE_SHADER.as_ptr(),
            &mut diagnostics,
        );
        assert!(!module.is_null(), "load failed: {}", blob_text(diagnostics));
        if !diagnostics.is_null() {
            Blob_release(&mut diagnostics);
        }

        assert_eq!(Module_getDefinedEntryPointCount(&mut module), 1);
        let mut entry_point = ptr::null_mut();
        assert_eq!(Module_findEntryPointByName(&mut module, c"main".as_ptr(), &mut entry_point), SLANG_OK);
        let mut function = EntryPoint_getFunctionReflection(&mut entry_point);
        assert_eq!(text(FunctionReflection_getName(&mut function)), "main");

        let parts = [module.cast::<IComponentType>(), entry_point.cast::<IComponentType>()];
        let mut composite = ptr::null_mut();
        assert_eq!(
            Session_createCompositeComponentType(&mut session, parts.as_ptr(), 2, &mut composite, ptr::null_mut()),
            SLANG_OK
        );
        let mut linked = ptr::null_mut();
        assert_eq!(ComponentType_link(&mut composite, &mut linked, ptr::null_mut()), SLANG_OK);

        let mut code = ptr::null_mut();
        let mut diagnostics = ptr::null_mut();
        let result = ComponentType_getTargetCode(&mut linked, 0, &mut code, &mut diagnostics);
        assert_eq!(result, SLANG_OK, "{}", blob_text(diagnostics));
        assert!(Blob_getBufferSize(&mut code) >= 20);
        let magic = Blob_getBufferPointer(&mut code).cast::<u32>().read_unaligned();
        assert_eq!(magic, 0x0723_0203, "SPIR-V magic");
        println!("Compute shader compiled: {} bytes", Blob_getBufferSize(&mut code));

        let mut layout = ComponentType_getLayout(&mut linked, 0, ptr::null_mut());
        let count = ShaderReflection_getParameterCount(&mut layout);
        let mut names: Vec<_> = (0..count)
            .map(|i| {
                let mut param = ShaderReflection_getParameterByIndex(&mut layout, i);
                text(VariableLayoutReflection_getName(&mut param))
            })
            .collect();
        names.sort();
        assert_eq!(names, vec!["input", "output"]);
        let mut reflected = ShaderReflection_getEntryPointByIndex(&mut layout, 0);
        assert_eq!(EntryPointReflection_getStage(&mut reflected), SLANG_STAGE_COMPUTE);
        let mut sizes: [SlangUInt; 3] = [0; 3];
        EntryPointReflection_getComputeThreadGroupSize(&mut reflected, 3, sizes.as_mut_ptr());
        assert_eq!(sizes, [64, 1, 1]);

        Blob_release(&mut code);
        ComponentType_release(&mut linked);
        ComponentType_release(&mut composite);
        EntryPoint_release(&mut entry_point);
        Session_release(&mut session);
        GlobalSession_release(&mut global);
    }
}

#[test]
#[ignore = "requires libslang"]
fn test_compile_error_reports_diagnostics() {
    unsafe {
        let (mut global, mut session) = spirv_session();

        let mut diagnostics = ptr::null_mut();
        let module = Session_loadModuleFromSourceString(
            &mut session,
            c"bad".as_ptr(),
            c"bad.slang".as_ptr(),
            BAD_SHADER.as_ptr(),
            &mut diagnostics,
        );
        assert!(module.is_null(), "bad shader should fail to load");
        let message = blob_text(diagnostics);
        assert!(message.contains("undefined"), "Error should mention undefined variable: {message}");
        println!("Got expected error: {}", message.trim());

        Blob_release(&mut diagnostics);
        Session_release(&mut session);
        GlobalSession_release(&mut global);
    }
}
