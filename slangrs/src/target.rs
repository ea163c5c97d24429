//! Code-generation targets, pipeline stages and target modes

use crate::{Error, Result};
use slangshim::*;
use std::fmt;
use std::str::FromStr;

/// Declares a Rust enum over one of Slang's integral enumerations, with a
/// lossless `raw()` and a `From` that maps unknown values to `$fallback`.
macro_rules! slang_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $raw:ty, fallback $fallback:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            /// Returns the value Slang uses for this variant
            pub fn raw(self) -> $raw {
                match self {
                    $($name::$variant => $value,)*
                }
            }
        }

        impl From<$raw> for $name {
            fn from(value: $raw) -> Self {
                match value {
                    $(v if v == $value => $name::$variant,)*
                    _ => $name::$fallback,
                }
            }
        }
    };
}

pub(crate) use slang_enum;

slang_enum! {
    /// Output format of a code-generation target
    pub enum CompileTarget: SlangCompileTarget, fallback Unknown {
        /// Unrecognized target
        Unknown = SLANG_TARGET_UNKNOWN,
        /// No code generation; front end only
        None = SLANG_TARGET_NONE,
        /// GLSL source
        Glsl = SLANG_GLSL,
        /// HLSL source
        Hlsl = SLANG_HLSL,
        /// SPIR-V binary
        SpirV = SLANG_SPIRV,
        /// SPIR-V assembly text
        SpirVAsm = SLANG_SPIRV_ASM,
        /// DXBC bytecode
        Dxbc = SLANG_DXBC,
        /// DXBC assembly
        DxbcAsm = SLANG_DXBC_ASM,
        /// DXIL bytecode
        Dxil = SLANG_DXIL,
        /// DXIL assembly
        DxilAsm = SLANG_DXIL_ASM,
        /// C source
        CSource = SLANG_C_SOURCE,
        /// C++ source
        CppSource = SLANG_CPP_SOURCE,
        /// CUDA source
        CudaSource = SLANG_CUDA_SOURCE,
        /// PTX
        Ptx = SLANG_PTX,
        /// Metal Shading Language source
        Metal = SLANG_METAL,
        /// Metal library
        MetalLib = SLANG_METAL_LIB,
        /// Metal library assembly
        MetalLibAsm = SLANG_METAL_LIB_ASM,
        /// WGSL source
        Wgsl = SLANG_WGSL,
    }
}

impl CompileTarget {
    /// Short name used on command lines ("spirv", "glsl", ...)
    pub fn name(&self) -> &'static str {
        match self {
            CompileTarget::Unknown => "unknown",
            CompileTarget::None => "none",
            CompileTarget::Glsl => "glsl",
            CompileTarget::Hlsl => "hlsl",
            CompileTarget::SpirV => "spirv",
            CompileTarget::SpirVAsm => "spirv-asm",
            CompileTarget::Dxbc => "dxbc",
            CompileTarget::DxbcAsm => "dxbc-asm",
            CompileTarget::Dxil => "dxil",
            CompileTarget::DxilAsm => "dxil-asm",
            CompileTarget::CSource => "c",
            CompileTarget::CppSource => "cpp",
            CompileTarget::CudaSource => "cuda",
            CompileTarget::Ptx => "ptx",
            CompileTarget::Metal => "metal",
            CompileTarget::MetalLib => "metallib",
            CompileTarget::MetalLibAsm => "metallib-asm",
            CompileTarget::Wgsl => "wgsl",
        }
    }

    /// True for formats whose output is text
    pub fn is_text(&self) -> bool {
        !matches!(
            self,
            CompileTarget::SpirV | CompileTarget::Dxbc | CompileTarget::Dxil | CompileTarget::MetalLib
        )
    }
}

impl fmt::Display for CompileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompileTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let target = match s.to_ascii_lowercase().as_str() {
            "glsl" => CompileTarget::Glsl,
            "hlsl" => CompileTarget::Hlsl,
            "spirv" | "spv" => CompileTarget::SpirV,
            "spirv-asm" | "spvasm" => CompileTarget::SpirVAsm,
            "dxbc" => CompileTarget::Dxbc,
            "dxbc-asm" => CompileTarget::DxbcAsm,
            "dxil" => CompileTarget::Dxil,
            "dxil-asm" => CompileTarget::DxilAsm,
            "c" => CompileTarget::CSource,
            "cpp" => CompileTarget::CppSource,
            "cuda" => CompileTarget::CudaSource,
            "ptx" => CompileTarget::Ptx,
            "metal" => CompileTarget::Metal,
            "metallib" => CompileTarget::MetalLib,
            "metallib-asm" => CompileTarget::MetalLibAsm,
            "wgsl" => CompileTarget::Wgsl,
            _ => return Err(Error::InvalidParameter(format!("unknown target: {s}"))),
        };
        Ok(target)
    }
}

slang_enum! {
    /// Pipeline stage of an entry point
    pub enum Stage: SlangStage, fallback None {
        /// No stage
        None = SLANG_STAGE_NONE,
        /// Vertex shader
        Vertex = SLANG_STAGE_VERTEX,
        /// Hull (tessellation control) shader
        Hull = SLANG_STAGE_HULL,
        /// Domain (tessellation evaluation) shader
        Domain = SLANG_STAGE_DOMAIN,
        /// Geometry shader
        Geometry = SLANG_STAGE_GEOMETRY,
        /// Fragment (pixel) shader
        Fragment = SLANG_STAGE_FRAGMENT,
        /// Compute shader
        Compute = SLANG_STAGE_COMPUTE,
        /// Ray generation shader
        RayGeneration = SLANG_STAGE_RAY_GENERATION,
        /// Intersection shader
        Intersection = SLANG_STAGE_INTERSECTION,
        /// Any-hit shader
        AnyHit = SLANG_STAGE_ANY_HIT,
        /// Closest-hit shader
        ClosestHit = SLANG_STAGE_CLOSEST_HIT,
        /// Miss shader
        Miss = SLANG_STAGE_MISS,
        /// Callable shader
        Callable = SLANG_STAGE_CALLABLE,
        /// Mesh shader
        Mesh = SLANG_STAGE_MESH,
        /// Amplification (task) shader
        Amplification = SLANG_STAGE_AMPLIFICATION,
        /// Dispatch stage
        Dispatch = SLANG_STAGE_DISPATCH,
    }
}

impl Stage {
    /// Lower-case stage name as written in `[shader("...")]`
    pub fn name(&self) -> &'static str {
        match self {
            Stage::None => "none",
            Stage::Vertex => "vertex",
            Stage::Hull => "hull",
            Stage::Domain => "domain",
            Stage::Geometry => "geometry",
            Stage::Fragment => "fragment",
            Stage::Compute => "compute",
            Stage::RayGeneration => "raygeneration",
            Stage::Intersection => "intersection",
            Stage::AnyHit => "anyhit",
            Stage::ClosestHit => "closesthit",
            Stage::Miss => "miss",
            Stage::Callable => "callable",
            Stage::Mesh => "mesh",
            Stage::Amplification => "amplification",
            Stage::Dispatch => "dispatch",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

slang_enum! {
    /// Default storage layout of matrices
    pub enum MatrixLayout: SlangMatrixLayoutMode, fallback Unknown {
        /// Let Slang decide
        Unknown = SLANG_MATRIX_LAYOUT_MODE_UNKNOWN,
        /// Row-major storage
        RowMajor = SLANG_MATRIX_LAYOUT_ROW_MAJOR,
        /// Column-major storage
        ColumnMajor = SLANG_MATRIX_LAYOUT_COLUMN_MAJOR,
    }
}

slang_enum! {
    /// Floating-point optimization mode of a target
    pub enum FloatingPointMode: SlangFloatingPointMode, fallback Default {
        /// Target default
        Default = SLANG_FLOATING_POINT_MODE_DEFAULT,
        /// Allow value-changing optimizations
        Fast = SLANG_FLOATING_POINT_MODE_FAST,
        /// Preserve IEEE semantics
        Precise = SLANG_FLOATING_POINT_MODE_PRECISE,
    }
}

slang_enum! {
    /// How `#line` directives are emitted in generated source
    pub enum LineDirectiveMode: SlangLineDirectiveMode, fallback Default {
        /// Target default
        Default = SLANG_LINE_DIRECTIVE_MODE_DEFAULT,
        /// No line directives
        None = SLANG_LINE_DIRECTIVE_MODE_NONE,
        /// `#line N "file"`
        Standard = SLANG_LINE_DIRECTIVE_MODE_STANDARD,
        /// GLSL-style `#line N fileIndex`
        Glsl = SLANG_LINE_DIRECTIVE_MODE_GLSL,
        /// Separate source map
        SourceMap = SLANG_LINE_DIRECTIVE_MODE_SOURCE_MAP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_names_round_trip() {
        for target in [CompileTarget::SpirV, CompileTarget::Glsl, CompileTarget::Wgsl, CompileTarget::Metal] {
            assert_eq!(target.name().parse::<CompileTarget>().unwrap(), target);
        }
        assert!("vulkan".parse::<CompileTarget>().is_err());
    }

    #[test]
    fn test_raw_values() {
        assert_eq!(CompileTarget::SpirV.raw(), 6);
        assert_eq!(Stage::Compute.raw(), 6);
        assert_eq!(Stage::from(5), Stage::Fragment);
        assert_eq!(Stage::from(999), Stage::None);
        assert_eq!(CompileTarget::from(-3), CompileTarget::Unknown);
    }

    #[test]
    fn test_binary_targets() {
        assert!(!CompileTarget::SpirV.is_text());
        assert!(CompileTarget::SpirVAsm.is_text());
    }
}
