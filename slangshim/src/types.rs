//! Plain-data types shared with the Slang library
//!
//! Everything here mirrors `slang.h` exactly; enumerations cross the
//! boundary as their integral representation.

use std::ffi::{c_char, c_void};
use std::fmt;

pub type SlangResult = i32;
pub type SlangInt = isize;
pub type SlangUInt = usize;
pub type SlangInt32 = i32;

pub type SlangProfileID = u32;
pub type SlangCapabilityID = i32;
pub type SlangStage = u32;
pub type SlangTypeKind = u32;
pub type SlangScalarType = u32;
pub type SlangParameterCategory = u32;
pub type SlangResourceShape = u32;
pub type SlangResourceAccess = u32;
pub type SlangCompileTarget = i32;
pub type SlangPassThrough = i32;
pub type SlangSourceLanguage = i32;
pub type SlangArchiveType = i32;
pub type SlangMatrixLayoutMode = u32;
pub type SlangFloatingPointMode = u32;
pub type SlangLineDirectiveMode = u32;
pub type SlangTargetFlags = u32;
pub type SlangLayoutRules = u32;
pub type SlangContainerType = i32;
pub type SessionFlags = u32;
pub type CompileCoreModuleFlags = u32;
pub type CompilerOptionName = i32;
pub type CompilerOptionValueKind = i32;

pub const SLANG_API_VERSION: SlangInt = 0;
pub const SLANG_LANGUAGE_VERSION_2025: u32 = 2025;
pub const SLANG_UNKNOWN_PROFILE: SlangProfileID = 0;

// Stages
pub const SLANG_STAGE_NONE: SlangStage = 0;
pub const SLANG_STAGE_VERTEX: SlangStage = 1;
pub const SLANG_STAGE_HULL: SlangStage = 2;
pub const SLANG_STAGE_DOMAIN: SlangStage = 3;
pub const SLANG_STAGE_GEOMETRY: SlangStage = 4;
pub const SLANG_STAGE_FRAGMENT: SlangStage = 5;
pub const SLANG_STAGE_COMPUTE: SlangStage = 6;
pub const SLANG_STAGE_RAY_GENERATION: SlangStage = 7;
pub const SLANG_STAGE_INTERSECTION: SlangStage = 8;
pub const SLANG_STAGE_ANY_HIT: SlangStage = 9;
pub const SLANG_STAGE_CLOSEST_HIT: SlangStage = 10;
pub const SLANG_STAGE_MISS: SlangStage = 11;
pub const SLANG_STAGE_CALLABLE: SlangStage = 12;
pub const SLANG_STAGE_MESH: SlangStage = 13;
pub const SLANG_STAGE_AMPLIFICATION: SlangStage = 14;
pub const SLANG_STAGE_DISPATCH: SlangStage = 15;

// Type kinds
pub const SLANG_TYPE_KIND_NONE: SlangTypeKind = 0;
pub const SLANG_TYPE_KIND_STRUCT: SlangTypeKind = 1;
pub const SLANG_TYPE_KIND_ARRAY: SlangTypeKind = 2;
pub const SLANG_TYPE_KIND_MATRIX: SlangTypeKind = 3;
pub const SLANG_TYPE_KIND_VECTOR: SlangTypeKind = 4;
pub const SLANG_TYPE_KIND_SCALAR: SlangTypeKind = 5;
pub const SLANG_TYPE_KIND_CONSTANT_BUFFER: SlangTypeKind = 6;
pub const SLANG_TYPE_KIND_RESOURCE: SlangTypeKind = 7;
pub const SLANG_TYPE_KIND_SAMPLER_STATE: SlangTypeKind = 8;
pub const SLANG_TYPE_KIND_TEXTURE_BUFFER: SlangTypeKind = 9;
pub const SLANG_TYPE_KIND_SHADER_STORAGE_BUFFER: SlangTypeKind = 10;
pub const SLANG_TYPE_KIND_PARAMETER_BLOCK: SlangTypeKind = 11;
pub const SLANG_TYPE_KIND_GENERIC_TYPE_PARAMETER: SlangTypeKind = 12;
pub const SLANG_TYPE_KIND_INTERFACE: SlangTypeKind = 13;
pub const SLANG_TYPE_KIND_OUTPUT_STREAM: SlangTypeKind = 14;
pub const SLANG_TYPE_KIND_MESH_OUTPUT: SlangTypeKind = 15;
pub const SLANG_TYPE_KIND_SPECIALIZED: SlangTypeKind = 16;
pub const SLANG_TYPE_KIND_FEEDBACK: SlangTypeKind = 17;
pub const SLANG_TYPE_KIND_POINTER: SlangTypeKind = 18;
pub const SLANG_TYPE_KIND_DYNAMIC_RESOURCE: SlangTypeKind = 19;

// Scalar types
pub const SLANG_SCALAR_TYPE_NONE: SlangScalarType = 0;
pub const SLANG_SCALAR_TYPE_VOID: SlangScalarType = 1;
pub const SLANG_SCALAR_TYPE_BOOL: SlangScalarType = 2;
pub const SLANG_SCALAR_TYPE_INT32: SlangScalarType = 3;
pub const SLANG_SCALAR_TYPE_UINT32: SlangScalarType = 4;
pub const SLANG_SCALAR_TYPE_INT64: SlangScalarType = 5;
pub const SLANG_SCALAR_TYPE_UINT64: SlangScalarType = 6;
pub const SLANG_SCALAR_TYPE_FLOAT16: SlangScalarType = 7;
pub const SLANG_SCALAR_TYPE_FLOAT32: SlangScalarType = 8;
pub const SLANG_SCALAR_TYPE_FLOAT64: SlangScalarType = 9;
pub const SLANG_SCALAR_TYPE_INT8: SlangScalarType = 10;
pub const SLANG_SCALAR_TYPE_UINT8: SlangScalarType = 11;
pub const SLANG_SCALAR_TYPE_INT16: SlangScalarType = 12;
pub const SLANG_SCALAR_TYPE_UINT16: SlangScalarType = 13;
pub const SLANG_SCALAR_TYPE_INTPTR: SlangScalarType = 14;
pub const SLANG_SCALAR_TYPE_UINTPTR: SlangScalarType = 15;

// Resource shapes
pub const SLANG_RESOURCE_BASE_SHAPE_MASK: SlangResourceShape = 0x0F;
pub const SLANG_RESOURCE_NONE: SlangResourceShape = 0x00;
pub const SLANG_TEXTURE_1D: SlangResourceShape = 0x01;
pub const SLANG_TEXTURE_2D: SlangResourceShape = 0x02;
pub const SLANG_TEXTURE_3D: SlangResourceShape = 0x03;
pub const SLANG_TEXTURE_CUBE: SlangResourceShape = 0x04;
pub const SLANG_TEXTURE_BUFFER: SlangResourceShape = 0x05;
pub const SLANG_STRUCTURED_BUFFER: SlangResourceShape = 0x06;
pub const SLANG_BYTE_ADDRESS_BUFFER: SlangResourceShape = 0x07;
pub const SLANG_RESOURCE_UNKNOWN: SlangResourceShape = 0x08;
pub const SLANG_ACCELERATION_STRUCTURE: SlangResourceShape = 0x09;
pub const SLANG_TEXTURE_SUBPASS: SlangResourceShape = 0x0A;
pub const SLANG_TEXTURE_FEEDBACK_FLAG: SlangResourceShape = 0x10;
pub const SLANG_TEXTURE_SHADOW_FLAG: SlangResourceShape = 0x20;
pub const SLANG_TEXTURE_ARRAY_FLAG: SlangResourceShape = 0x40;
pub const SLANG_TEXTURE_MULTISAMPLE_FLAG: SlangResourceShape = 0x80;
pub const SLANG_TEXTURE_COMBINED_FLAG: SlangResourceShape = 0x100;

// Resource access
pub const SLANG_RESOURCE_ACCESS_NONE: SlangResourceAccess = 0;
pub const SLANG_RESOURCE_ACCESS_READ: SlangResourceAccess = 1;
pub const SLANG_RESOURCE_ACCESS_READ_WRITE: SlangResourceAccess = 2;
pub const SLANG_RESOURCE_ACCESS_RASTER_ORDERED: SlangResourceAccess = 3;
pub const SLANG_RESOURCE_ACCESS_APPEND: SlangResourceAccess = 4;
pub const SLANG_RESOURCE_ACCESS_CONSUME: SlangResourceAccess = 5;
pub const SLANG_RESOURCE_ACCESS_WRITE: SlangResourceAccess = 6;
pub const SLANG_RESOURCE_ACCESS_FEEDBACK: SlangResourceAccess = 7;
pub const SLANG_RESOURCE_ACCESS_UNKNOWN: SlangResourceAccess = 0x7FFF_FFFF;

// Parameter categories
pub const SLANG_PARAMETER_CATEGORY_NONE: SlangParameterCategory = 0;
pub const SLANG_PARAMETER_CATEGORY_MIXED: SlangParameterCategory = 1;
pub const SLANG_PARAMETER_CATEGORY_CONSTANT_BUFFER: SlangParameterCategory = 2;
pub const SLANG_PARAMETER_CATEGORY_SHADER_RESOURCE: SlangParameterCategory = 3;
pub const SLANG_PARAMETER_CATEGORY_UNORDERED_ACCESS: SlangParameterCategory = 4;
pub const SLANG_PARAMETER_CATEGORY_VARYING_INPUT: SlangParameterCategory = 5;
pub const SLANG_PARAMETER_CATEGORY_VARYING_OUTPUT: SlangParameterCategory = 6;
pub const SLANG_PARAMETER_CATEGORY_SAMPLER_STATE: SlangParameterCategory = 7;
pub const SLANG_PARAMETER_CATEGORY_UNIFORM: SlangParameterCategory = 8;
pub const SLANG_PARAMETER_CATEGORY_DESCRIPTOR_TABLE_SLOT: SlangParameterCategory = 9;
pub const SLANG_PARAMETER_CATEGORY_SPECIALIZATION_CONSTANT: SlangParameterCategory = 10;
pub const SLANG_PARAMETER_CATEGORY_PUSH_CONSTANT_BUFFER: SlangParameterCategory = 11;
pub const SLANG_PARAMETER_CATEGORY_REGISTER_SPACE: SlangParameterCategory = 12;
pub const SLANG_PARAMETER_CATEGORY_GENERIC: SlangParameterCategory = 13;
pub const SLANG_PARAMETER_CATEGORY_RAY_PAYLOAD: SlangParameterCategory = 14;
pub const SLANG_PARAMETER_CATEGORY_HIT_ATTRIBUTES: SlangParameterCategory = 15;
pub const SLANG_PARAMETER_CATEGORY_CALLABLE_PAYLOAD: SlangParameterCategory = 16;
pub const SLANG_PARAMETER_CATEGORY_SHADER_RECORD: SlangParameterCategory = 17;
pub const SLANG_PARAMETER_CATEGORY_EXISTENTIAL_TYPE_PARAM: SlangParameterCategory = 18;
pub const SLANG_PARAMETER_CATEGORY_EXISTENTIAL_OBJECT_PARAM: SlangParameterCategory = 19;
pub const SLANG_PARAMETER_CATEGORY_SUB_ELEMENT_REGISTER_SPACE: SlangParameterCategory = 20;
pub const SLANG_PARAMETER_CATEGORY_SUBPASS: SlangParameterCategory = 21;
pub const SLANG_PARAMETER_CATEGORY_METAL_ARGUMENT_BUFFER_ELEMENT: SlangParameterCategory = 22;
pub const SLANG_PARAMETER_CATEGORY_METAL_ATTRIBUTE: SlangParameterCategory = 23;
pub const SLANG_PARAMETER_CATEGORY_METAL_PAYLOAD: SlangParameterCategory = 24;

// Compile targets
pub const SLANG_TARGET_UNKNOWN: SlangCompileTarget = 0;
pub const SLANG_TARGET_NONE: SlangCompileTarget = 1;
pub const SLANG_GLSL: SlangCompileTarget = 2;
pub const SLANG_HLSL: SlangCompileTarget = 5;
pub const SLANG_SPIRV: SlangCompileTarget = 6;
pub const SLANG_SPIRV_ASM: SlangCompileTarget = 7;
pub const SLANG_DXBC: SlangCompileTarget = 8;
pub const SLANG_DXBC_ASM: SlangCompileTarget = 9;
pub const SLANG_DXIL: SlangCompileTarget = 10;
pub const SLANG_DXIL_ASM: SlangCompileTarget = 11;
pub const SLANG_C_SOURCE: SlangCompileTarget = 12;
pub const SLANG_CPP_SOURCE: SlangCompileTarget = 13;
pub const SLANG_HOST_EXECUTABLE: SlangCompileTarget = 14;
pub const SLANG_SHADER_SHARED_LIBRARY: SlangCompileTarget = 15;
pub const SLANG_SHADER_HOST_CALLABLE: SlangCompileTarget = 16;
pub const SLANG_CUDA_SOURCE: SlangCompileTarget = 17;
pub const SLANG_PTX: SlangCompileTarget = 18;
pub const SLANG_CUDA_OBJECT_CODE: SlangCompileTarget = 19;
pub const SLANG_OBJECT_CODE: SlangCompileTarget = 20;
pub const SLANG_HOST_CPP_SOURCE: SlangCompileTarget = 21;
pub const SLANG_HOST_HOST_CALLABLE: SlangCompileTarget = 22;
pub const SLANG_CPP_PYTORCH_BINDING: SlangCompileTarget = 23;
pub const SLANG_METAL: SlangCompileTarget = 24;
pub const SLANG_METAL_LIB: SlangCompileTarget = 25;
pub const SLANG_METAL_LIB_ASM: SlangCompileTarget = 26;
pub const SLANG_HOST_SHARED_LIBRARY: SlangCompileTarget = 27;
pub const SLANG_WGSL: SlangCompileTarget = 28;

// Matrix layout
pub const SLANG_MATRIX_LAYOUT_MODE_UNKNOWN: SlangMatrixLayoutMode = 0;
pub const SLANG_MATRIX_LAYOUT_ROW_MAJOR: SlangMatrixLayoutMode = 1;
pub const SLANG_MATRIX_LAYOUT_COLUMN_MAJOR: SlangMatrixLayoutMode = 2;

// Floating point / line directives
pub const SLANG_FLOATING_POINT_MODE_DEFAULT: SlangFloatingPointMode = 0;
pub const SLANG_FLOATING_POINT_MODE_FAST: SlangFloatingPointMode = 1;
pub const SLANG_FLOATING_POINT_MODE_PRECISE: SlangFloatingPointMode = 2;

pub const SLANG_LINE_DIRECTIVE_MODE_DEFAULT: SlangLineDirectiveMode = 0;
pub const SLANG_LINE_DIRECTIVE_MODE_NONE: SlangLineDirectiveMode = 1;
pub const SLANG_LINE_DIRECTIVE_MODE_STANDARD: SlangLineDirectiveMode = 2;
pub const SLANG_LINE_DIRECTIVE_MODE_GLSL: SlangLineDirectiveMode = 3;
pub const SLANG_LINE_DIRECTIVE_MODE_SOURCE_MAP: SlangLineDirectiveMode = 4;

// Target flags
pub const SLANG_TARGET_FLAG_PARAMETER_BLOCKS_USE_REGISTER_SPACES: SlangTargetFlags = 1 << 4;
pub const SLANG_TARGET_FLAG_GENERATE_WHOLE_PROGRAM: SlangTargetFlags = 1 << 8;
pub const SLANG_TARGET_FLAG_DUMP_IR: SlangTargetFlags = 1 << 9;
pub const SLANG_TARGET_FLAG_GENERATE_SPIRV_DIRECTLY: SlangTargetFlags = 1 << 10;

// Compiler option names
pub const COMPILER_OPTION_MACRO_DEFINE: CompilerOptionName = 0;
pub const COMPILER_OPTION_INCLUDE: CompilerOptionName = 6;
pub const COMPILER_OPTION_MATRIX_LAYOUT_COLUMN: CompilerOptionName = 8;
pub const COMPILER_OPTION_MATRIX_LAYOUT_ROW: CompilerOptionName = 9;
pub const COMPILER_OPTION_WARNINGS_AS_ERRORS: CompilerOptionName = 19;
pub const COMPILER_OPTION_CAPABILITY: CompilerOptionName = 39;
pub const COMPILER_OPTION_FLOATING_POINT_MODE: CompilerOptionName = 43;
pub const COMPILER_OPTION_DEBUG_INFORMATION: CompilerOptionName = 44;
pub const COMPILER_OPTION_OPTIMIZATION: CompilerOptionName = 46;
pub const COMPILER_OPTION_EMIT_SPIRV_DIRECTLY: CompilerOptionName = 58;

pub const COMPILER_OPTION_VALUE_KIND_INT: CompilerOptionValueKind = 0;
pub const COMPILER_OPTION_VALUE_KIND_STRING: CompilerOptionValueKind = 1;

/// GUID in the layout Slang uses for interface ids
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlangUUID {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl SlangUUID {
    /// Builds a UUID from its canonical 128-bit value
    pub const fn from_u128(v: u128) -> Self {
        Self {
            data1: (v >> 96) as u32,
            data2: (v >> 80) as u16,
            data3: (v >> 64) as u16,
            data4: (v as u64).to_be_bytes(),
        }
    }
}

impl From<uuid::Uuid> for SlangUUID {
    fn from(id: uuid::Uuid) -> Self {
        let (data1, data2, data3, data4) = id.as_fields();
        Self {
            data1,
            data2,
            data3,
            data4: *data4,
        }
    }
}

impl From<SlangUUID> for uuid::Uuid {
    fn from(id: SlangUUID) -> Self {
        uuid::Uuid::from_fields(id.data1, id.data2, id.data3, &id.data4)
    }
}

impl fmt::Debug for SlangUUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", uuid::Uuid::from(*self).hyphenated())
    }
}

pub const IID_ISLANG_UNKNOWN: SlangUUID = SlangUUID::from_u128(0x00000000_0000_0000_c000_000000000046);
pub const IID_ISLANG_BLOB: SlangUUID = SlangUUID::from_u128(0x8ba5fb08_5195_40e2_ac58_0d989c3a0102);
pub const IID_IGLOBAL_SESSION: SlangUUID = SlangUUID::from_u128(0xc140b5fd_0c78_452e_ba7c_1a1e70c7f71c);
pub const IID_ISESSION: SlangUUID = SlangUUID::from_u128(0x67618701_d116_468f_ab3b_474bedce0e3d);
pub const IID_ICOMPONENT_TYPE: SlangUUID = SlangUUID::from_u128(0x5bc42be8_5c50_4929_9e5e_d15e7c24015f);
pub const IID_IENTRY_POINT: SlangUUID = SlangUUID::from_u128(0x8f241361_f5bd_4ca0_a3ac_02f7fa2402b8);
pub const IID_IMODULE: SlangUUID = SlangUUID::from_u128(0x0c720e64_8722_4d31_8990_638a98b1c279);

/// `slang_createGlobalSession2` parameters
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct SlangGlobalSessionDesc {
    pub structureSize: u32,
    pub apiVersion: u32,
    pub minLanguageVersion: u32,
    pub enableGLSL: bool,
    pub reserved: [u32; 16],
}

impl Default for SlangGlobalSessionDesc {
    fn default() -> Self {
        Self {
            structureSize: std::mem::size_of::<Self>() as u32,
            apiVersion: SLANG_API_VERSION as u32,
            minLanguageVersion: SLANG_LANGUAGE_VERSION_2025,
            enableGLSL: false,
            reserved: [0; 16],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct PreprocessorMacroDesc {
    pub name: *const c_char,
    pub value: *const c_char,
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CompilerOptionValue {
    pub kind: CompilerOptionValueKind,
    pub intValue0: i32,
    pub intValue1: i32,
    pub stringValue0: *const c_char,
    pub stringValue1: *const c_char,
}

impl Default for CompilerOptionValue {
    fn default() -> Self {
        Self {
            kind: COMPILER_OPTION_VALUE_KIND_INT,
            intValue0: 0,
            intValue1: 0,
            stringValue0: std::ptr::null(),
            stringValue1: std::ptr::null(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CompilerOptionEntry {
    pub name: CompilerOptionName,
    pub value: CompilerOptionValue,
}

/// One code-generation target of a session
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct TargetDesc {
    pub structureSize: usize,
    pub format: SlangCompileTarget,
    pub profile: SlangProfileID,
    pub flags: SlangTargetFlags,
    pub floatingPointMode: SlangFloatingPointMode,
    pub lineDirectiveMode: SlangLineDirectiveMode,
    pub forceGLSLScalarBufferLayout: bool,
    pub compilerOptionEntries: *mut CompilerOptionEntry,
    pub compilerOptionEntryCount: u32,
}

impl Default for TargetDesc {
    fn default() -> Self {
        Self {
            structureSize: std::mem::size_of::<Self>(),
            format: SLANG_TARGET_UNKNOWN,
            profile: SLANG_UNKNOWN_PROFILE,
            flags: SLANG_TARGET_FLAG_GENERATE_SPIRV_DIRECTLY,
            floatingPointMode: SLANG_FLOATING_POINT_MODE_DEFAULT,
            lineDirectiveMode: SLANG_LINE_DIRECTIVE_MODE_DEFAULT,
            forceGLSLScalarBufferLayout: false,
            compilerOptionEntries: std::ptr::null_mut(),
            compilerOptionEntryCount: 0,
        }
    }
}

/// `IGlobalSession::createSession` parameters
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct SessionDesc {
    pub structureSize: usize,
    pub targets: *const TargetDesc,
    pub targetCount: SlangInt,
    pub flags: SessionFlags,
    pub defaultMatrixLayoutMode: SlangMatrixLayoutMode,
    pub searchPaths: *const *const c_char,
    pub searchPathCount: SlangInt,
    pub preprocessorMacros: *const PreprocessorMacroDesc,
    pub preprocessorMacroCount: SlangInt,
    pub fileSystem: *mut c_void,
    pub enableEffectAnnotations: bool,
    pub allowGLSLSyntax: bool,
    pub compilerOptionEntries: *mut CompilerOptionEntry,
    pub compilerOptionEntryCount: u32,
    pub skipSPIRVValidation: bool,
}

impl Default for SessionDesc {
    fn default() -> Self {
        Self {
            structureSize: std::mem::size_of::<Self>(),
            targets: std::ptr::null(),
            targetCount: 0,
            flags: 0,
            defaultMatrixLayoutMode: SLANG_MATRIX_LAYOUT_ROW_MAJOR,
            searchPaths: std::ptr::null(),
            searchPathCount: 0,
            preprocessorMacros: std::ptr::null(),
            preprocessorMacroCount: 0,
            fileSystem: std::ptr::null_mut(),
            enableEffectAnnotations: false,
            allowGLSLSyntax: false,
            compilerOptionEntries: std::ptr::null_mut(),
            compilerOptionEntryCount: 0,
            skipSPIRVValidation: false,
        }
    }
}

macro_rules! opaque_nodes {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )*
    };
}

opaque_nodes! {
    /// Program layout root returned by `IComponentType::getLayout`
    SlangReflection,
    SlangReflectionEntryPoint,
    SlangReflectionFunction,
    SlangReflectionType,
    SlangReflectionTypeLayout,
    SlangReflectionVariable,
    SlangReflectionVariableLayout,
    SlangReflectionUserAttribute,
    SlangReflectionGeneric,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_fields_follow_guid_layout() {
        let blob = IID_ISLANG_BLOB;
        assert_eq!(blob.data1, 0x8ba5fb08);
        assert_eq!(blob.data2, 0x5195);
        assert_eq!(blob.data3, 0x40e2);
        assert_eq!(blob.data4, [0xac, 0x58, 0x0d, 0x98, 0x9c, 0x3a, 0x01, 0x02]);
    }

    #[test]
    fn uuid_crate_conversion_agrees_with_const_builder() {
        let parsed = uuid::Uuid::parse_str("5bc42be8-5c50-4929-9e5e-d15e7c24015f").unwrap();
        assert_eq!(SlangUUID::from(parsed), IID_ICOMPONENT_TYPE);
        assert_eq!(uuid::Uuid::from(IID_ICOMPONENT_TYPE), parsed);
    }

    #[test]
    fn descriptors_carry_their_own_size() {
        assert_eq!(SessionDesc::default().structureSize, std::mem::size_of::<SessionDesc>());
        assert_eq!(TargetDesc::default().structureSize, std::mem::size_of::<TargetDesc>());
        assert_eq!(
            SlangGlobalSessionDesc::default().structureSize as usize,
            std::mem::size_of::<SlangGlobalSessionDesc>()
        );
    }
}
