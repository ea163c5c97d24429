//! Target and resource-shape flags

use bitflags::bitflags;
use slangshim::*;

bitflags! {
    /// Per-target code generation flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TargetFlags: u32 {
        /// Give each `ParameterBlock` its own register space
        const PARAMETER_BLOCKS_USE_REGISTER_SPACES = SLANG_TARGET_FLAG_PARAMETER_BLOCKS_USE_REGISTER_SPACES;

        /// Generate code for the whole program rather than per entry point
        const GENERATE_WHOLE_PROGRAM = SLANG_TARGET_FLAG_GENERATE_WHOLE_PROGRAM;

        /// Dump intermediate IR
        const DUMP_IR = SLANG_TARGET_FLAG_DUMP_IR;

        /// Emit SPIR-V directly instead of going through GLSL
        const GENERATE_SPIRV_DIRECTLY = SLANG_TARGET_FLAG_GENERATE_SPIRV_DIRECTLY;
    }
}

impl Default for TargetFlags {
    /// Slang's default: SPIR-V is emitted directly
    fn default() -> Self {
        TargetFlags::GENERATE_SPIRV_DIRECTLY
    }
}

bitflags! {
    /// Modifier bits carried above the base shape of a resource type
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResourceShapeFlags: u32 {
        /// Sampler feedback texture
        const FEEDBACK = SLANG_TEXTURE_FEEDBACK_FLAG;

        /// Shadow (comparison) texture
        const SHADOW = SLANG_TEXTURE_SHADOW_FLAG;

        /// Texture array
        const ARRAY = SLANG_TEXTURE_ARRAY_FLAG;

        /// Multisampled texture
        const MULTISAMPLE = SLANG_TEXTURE_MULTISAMPLE_FLAG;

        /// Combined texture and sampler
        const COMBINED = SLANG_TEXTURE_COMBINED_FLAG;
    }
}

impl Default for ResourceShapeFlags {
    fn default() -> Self {
        ResourceShapeFlags::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_flags_default() {
        assert_eq!(TargetFlags::default().bits(), 1 << 10);
    }

    #[test]
    fn test_shape_flags_ignore_base_shape() {
        let raw = SLANG_TEXTURE_2D | SLANG_TEXTURE_ARRAY_FLAG | SLANG_TEXTURE_SHADOW_FLAG;
        let flags = ResourceShapeFlags::from_bits_truncate(raw);
        assert!(flags.contains(ResourceShapeFlags::ARRAY | ResourceShapeFlags::SHADOW));
        assert!(!flags.contains(ResourceShapeFlags::MULTISAMPLE));
    }
}
