//! Type and type-layout reflection

use super::{UserAttribute, Variable, VariableLayout, index_iter, reflection_view};
use crate::error::c_string;
use crate::target::slang_enum;
use crate::{ResourceShapeFlags, c_str};
use slangshim::*;
use std::ffi::c_char;

slang_enum! {
    /// Broad kind of a type
    pub enum TypeKind: SlangTypeKind, fallback None {
        /// Unknown or not a type
        None = SLANG_TYPE_KIND_NONE,
        /// Struct
        Struct = SLANG_TYPE_KIND_STRUCT,
        /// Fixed or unsized array
        Array = SLANG_TYPE_KIND_ARRAY,
        /// Matrix
        Matrix = SLANG_TYPE_KIND_MATRIX,
        /// Vector
        Vector = SLANG_TYPE_KIND_VECTOR,
        /// Scalar
        Scalar = SLANG_TYPE_KIND_SCALAR,
        /// `ConstantBuffer<T>` or `cbuffer`
        ConstantBuffer = SLANG_TYPE_KIND_CONSTANT_BUFFER,
        /// Texture or buffer resource
        Resource = SLANG_TYPE_KIND_RESOURCE,
        /// Sampler
        SamplerState = SLANG_TYPE_KIND_SAMPLER_STATE,
        /// `TextureBuffer<T>`
        TextureBuffer = SLANG_TYPE_KIND_TEXTURE_BUFFER,
        /// GLSL shader storage buffer
        ShaderStorageBuffer = SLANG_TYPE_KIND_SHADER_STORAGE_BUFFER,
        /// `ParameterBlock<T>`
        ParameterBlock = SLANG_TYPE_KIND_PARAMETER_BLOCK,
        /// Generic type parameter
        GenericTypeParameter = SLANG_TYPE_KIND_GENERIC_TYPE_PARAMETER,
        /// Interface
        Interface = SLANG_TYPE_KIND_INTERFACE,
        /// Geometry shader output stream
        OutputStream = SLANG_TYPE_KIND_OUTPUT_STREAM,
        /// Mesh shader output
        MeshOutput = SLANG_TYPE_KIND_MESH_OUTPUT,
        /// Specialized generic
        Specialized = SLANG_TYPE_KIND_SPECIALIZED,
        /// Sampler feedback
        Feedback = SLANG_TYPE_KIND_FEEDBACK,
        /// Pointer
        Pointer = SLANG_TYPE_KIND_POINTER,
        /// Descriptor-heap resource
        DynamicResource = SLANG_TYPE_KIND_DYNAMIC_RESOURCE,
    }
}

slang_enum! {
    /// Element type of scalars, vectors and matrices
    pub enum ScalarType: SlangScalarType, fallback None {
        /// Not a scalar
        None = SLANG_SCALAR_TYPE_NONE,
        /// void
        Void = SLANG_SCALAR_TYPE_VOID,
        /// bool
        Bool = SLANG_SCALAR_TYPE_BOOL,
        /// int
        Int32 = SLANG_SCALAR_TYPE_INT32,
        /// uint
        UInt32 = SLANG_SCALAR_TYPE_UINT32,
        /// int64_t
        Int64 = SLANG_SCALAR_TYPE_INT64,
        /// uint64_t
        UInt64 = SLANG_SCALAR_TYPE_UINT64,
        /// half
        Float16 = SLANG_SCALAR_TYPE_FLOAT16,
        /// float
        Float32 = SLANG_SCALAR_TYPE_FLOAT32,
        /// double
        Float64 = SLANG_SCALAR_TYPE_FLOAT64,
        /// int8_t
        Int8 = SLANG_SCALAR_TYPE_INT8,
        /// uint8_t
        UInt8 = SLANG_SCALAR_TYPE_UINT8,
        /// int16_t
        Int16 = SLANG_SCALAR_TYPE_INT16,
        /// uint16_t
        UInt16 = SLANG_SCALAR_TYPE_UINT16,
        /// intptr_t
        IntPtr = SLANG_SCALAR_TYPE_INTPTR,
        /// uintptr_t
        UIntPtr = SLANG_SCALAR_TYPE_UINTPTR,
    }
}

slang_enum! {
    /// Kind of resource a parameter consumes: bytes, registers, slots
    pub enum ParameterCategory: SlangParameterCategory, fallback None {
        /// Nothing
        None = SLANG_PARAMETER_CATEGORY_NONE,
        /// More than one category; query each
        Mixed = SLANG_PARAMETER_CATEGORY_MIXED,
        /// Constant buffer register (`b`)
        ConstantBuffer = SLANG_PARAMETER_CATEGORY_CONSTANT_BUFFER,
        /// Shader resource register (`t`)
        ShaderResource = SLANG_PARAMETER_CATEGORY_SHADER_RESOURCE,
        /// Unordered access register (`u`)
        UnorderedAccess = SLANG_PARAMETER_CATEGORY_UNORDERED_ACCESS,
        /// Varying input location
        VaryingInput = SLANG_PARAMETER_CATEGORY_VARYING_INPUT,
        /// Varying output location
        VaryingOutput = SLANG_PARAMETER_CATEGORY_VARYING_OUTPUT,
        /// Sampler register (`s`)
        SamplerState = SLANG_PARAMETER_CATEGORY_SAMPLER_STATE,
        /// Bytes of ordinary uniform data
        Uniform = SLANG_PARAMETER_CATEGORY_UNIFORM,
        /// Vulkan descriptor table slot
        DescriptorTableSlot = SLANG_PARAMETER_CATEGORY_DESCRIPTOR_TABLE_SLOT,
        /// Specialization constant id
        SpecializationConstant = SLANG_PARAMETER_CATEGORY_SPECIALIZATION_CONSTANT,
        /// Push constant buffer
        PushConstantBuffer = SLANG_PARAMETER_CATEGORY_PUSH_CONSTANT_BUFFER,
        /// Register space or descriptor set
        RegisterSpace = SLANG_PARAMETER_CATEGORY_REGISTER_SPACE,
        /// Generic parameter slot
        Generic = SLANG_PARAMETER_CATEGORY_GENERIC,
        /// Ray payload
        RayPayload = SLANG_PARAMETER_CATEGORY_RAY_PAYLOAD,
        /// Hit attributes
        HitAttributes = SLANG_PARAMETER_CATEGORY_HIT_ATTRIBUTES,
        /// Callable payload
        CallablePayload = SLANG_PARAMETER_CATEGORY_CALLABLE_PAYLOAD,
        /// Shader record
        ShaderRecord = SLANG_PARAMETER_CATEGORY_SHADER_RECORD,
        /// Existential type parameter
        ExistentialTypeParam = SLANG_PARAMETER_CATEGORY_EXISTENTIAL_TYPE_PARAM,
        /// Existential object parameter
        ExistentialObjectParam = SLANG_PARAMETER_CATEGORY_EXISTENTIAL_OBJECT_PARAM,
        /// Register space for sub-elements
        SubElementRegisterSpace = SLANG_PARAMETER_CATEGORY_SUB_ELEMENT_REGISTER_SPACE,
        /// Subpass input
        Subpass = SLANG_PARAMETER_CATEGORY_SUBPASS,
        /// Metal argument buffer element
        MetalArgumentBufferElement = SLANG_PARAMETER_CATEGORY_METAL_ARGUMENT_BUFFER_ELEMENT,
        /// Metal `[[attribute]]`
        MetalAttribute = SLANG_PARAMETER_CATEGORY_METAL_ATTRIBUTE,
        /// Metal payload
        MetalPayload = SLANG_PARAMETER_CATEGORY_METAL_PAYLOAD,
    }
}

impl ParameterCategory {
    /// Lower-case name for display
    pub fn name(&self) -> &'static str {
        match self {
            ParameterCategory::None => "none",
            ParameterCategory::Mixed => "mixed",
            ParameterCategory::ConstantBuffer => "constant-buffer",
            ParameterCategory::ShaderResource => "shader-resource",
            ParameterCategory::UnorderedAccess => "unordered-access",
            ParameterCategory::VaryingInput => "varying-input",
            ParameterCategory::VaryingOutput => "varying-output",
            ParameterCategory::SamplerState => "sampler",
            ParameterCategory::Uniform => "uniform",
            ParameterCategory::DescriptorTableSlot => "descriptor-table-slot",
            ParameterCategory::SpecializationConstant => "specialization-constant",
            ParameterCategory::PushConstantBuffer => "push-constant-buffer",
            ParameterCategory::RegisterSpace => "register-space",
            ParameterCategory::Generic => "generic",
            ParameterCategory::RayPayload => "ray-payload",
            ParameterCategory::HitAttributes => "hit-attributes",
            ParameterCategory::CallablePayload => "callable-payload",
            ParameterCategory::ShaderRecord => "shader-record",
            ParameterCategory::ExistentialTypeParam => "existential-type-param",
            ParameterCategory::ExistentialObjectParam => "existential-object-param",
            ParameterCategory::SubElementRegisterSpace => "sub-element-register-space",
            ParameterCategory::Subpass => "subpass",
            ParameterCategory::MetalArgumentBufferElement => "metal-argument-buffer-element",
            ParameterCategory::MetalAttribute => "metal-attribute",
            ParameterCategory::MetalPayload => "metal-payload",
        }
    }
}

slang_enum! {
    /// How a shader may access a resource
    pub enum ResourceAccess: SlangResourceAccess, fallback Unknown {
        /// No access
        None = SLANG_RESOURCE_ACCESS_NONE,
        /// Read-only
        Read = SLANG_RESOURCE_ACCESS_READ,
        /// Read-write
        ReadWrite = SLANG_RESOURCE_ACCESS_READ_WRITE,
        /// Rasterizer-ordered read-write
        RasterOrdered = SLANG_RESOURCE_ACCESS_RASTER_ORDERED,
        /// Append buffer
        Append = SLANG_RESOURCE_ACCESS_APPEND,
        /// Consume buffer
        Consume = SLANG_RESOURCE_ACCESS_CONSUME,
        /// Write-only
        Write = SLANG_RESOURCE_ACCESS_WRITE,
        /// Sampler feedback
        Feedback = SLANG_RESOURCE_ACCESS_FEEDBACK,
        /// Unrecognized
        Unknown = SLANG_RESOURCE_ACCESS_UNKNOWN,
    }
}

slang_enum! {
    /// Base shape of a resource, without modifier flags
    pub enum ResourceBaseShape: SlangResourceShape, fallback Unknown {
        /// Not a resource
        None = SLANG_RESOURCE_NONE,
        /// 1D texture
        Texture1D = SLANG_TEXTURE_1D,
        /// 2D texture
        Texture2D = SLANG_TEXTURE_2D,
        /// 3D texture
        Texture3D = SLANG_TEXTURE_3D,
        /// Cube texture
        TextureCube = SLANG_TEXTURE_CUBE,
        /// Typed texel buffer
        TextureBuffer = SLANG_TEXTURE_BUFFER,
        /// Structured buffer
        StructuredBuffer = SLANG_STRUCTURED_BUFFER,
        /// Byte-address buffer
        ByteAddressBuffer = SLANG_BYTE_ADDRESS_BUFFER,
        /// Unknown shape
        Unknown = SLANG_RESOURCE_UNKNOWN,
        /// Ray-tracing acceleration structure
        AccelerationStructure = SLANG_ACCELERATION_STRUCTURE,
        /// Subpass input
        TextureSubpass = SLANG_TEXTURE_SUBPASS,
    }
}

/// Resource shape split into its base shape and modifier flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceShape {
    /// Base shape
    pub base: ResourceBaseShape,
    /// Array, multisample, shadow and similar modifiers
    pub flags: ResourceShapeFlags,
}

impl From<SlangResourceShape> for ResourceShape {
    fn from(raw: SlangResourceShape) -> Self {
        ResourceShape {
            base: ResourceBaseShape::from(raw & SLANG_RESOURCE_BASE_SHAPE_MASK),
            flags: ResourceShapeFlags::from_bits_truncate(raw),
        }
    }
}

reflection_view! {
    /// A type as written in source
    TypeReflection(SlangReflectionType)
}

impl<'a> TypeReflection<'a> {
    /// Type kind
    pub fn kind(&self) -> TypeKind {
        TypeKind::from(unsafe { TypeReflection_getKind(&mut self.as_raw()) })
    }

    /// Type name, if it has one
    pub fn name(&self) -> Option<&'a str> {
        unsafe { c_str(TypeReflection_getName(&mut self.as_raw())) }
    }

    /// Number of struct fields
    pub fn field_count(&self) -> u32 {
        unsafe { TypeReflection_getFieldCount(&mut self.as_raw()) }
    }

    /// Gets a struct field by index.
    pub fn field(&self, index: u32) -> Option<Variable<'a>> {
        unsafe { Variable::from_raw(TypeReflection_getFieldByIndex(&mut self.as_raw(), index)) }
    }

    /// Iterates the struct fields.
    pub fn fields(&self) -> Fields<'a> {
        Fields::new(*self, self.field_count())
    }

    /// Array length or vector width; 0 for unsized arrays
    pub fn element_count(&self) -> usize {
        unsafe { TypeReflection_getElementCount(&mut self.as_raw()) }
    }

    /// Element type of an array, vector or matrix
    pub fn element_type(&self) -> Option<TypeReflection<'a>> {
        unsafe { TypeReflection::from_raw(TypeReflection_getElementType(&mut self.as_raw())) }
    }

    /// Matrix rows (1 for vectors and scalars)
    pub fn row_count(&self) -> u32 {
        unsafe { TypeReflection_getRowCount(&mut self.as_raw()) }
    }

    /// Matrix or vector columns
    pub fn column_count(&self) -> u32 {
        unsafe { TypeReflection_getColumnCount(&mut self.as_raw()) }
    }

    /// Scalar element type
    pub fn scalar_type(&self) -> ScalarType {
        ScalarType::from(unsafe { TypeReflection_getScalarType(&mut self.as_raw()) })
    }

    /// Shape of a resource type
    pub fn resource_shape(&self) -> ResourceShape {
        ResourceShape::from(unsafe { TypeReflection_getResourceShape(&mut self.as_raw()) })
    }

    /// Access mode of a resource type
    pub fn resource_access(&self) -> ResourceAccess {
        ResourceAccess::from(unsafe { TypeReflection_getResourceAccess(&mut self.as_raw()) })
    }

    /// Element type a resource returns when read
    pub fn resource_result_type(&self) -> Option<TypeReflection<'a>> {
        unsafe { TypeReflection::from_raw(TypeReflection_getResourceResultType(&mut self.as_raw())) }
    }

    /// Number of user attributes on the type declaration
    pub fn user_attribute_count(&self) -> u32 {
        unsafe { TypeReflection_getUserAttributeCount(&mut self.as_raw()) }
    }

    /// Gets a user attribute by index.
    pub fn user_attribute(&self, index: u32) -> Option<UserAttribute<'a>> {
        unsafe { UserAttribute::from_raw(TypeReflection_getUserAttributeByIndex(&mut self.as_raw(), index)) }
    }

    /// Iterates the user attributes.
    pub fn user_attributes(&self) -> TypeAttributes<'a> {
        TypeAttributes::new(*self, self.user_attribute_count())
    }

    /// Finds a user attribute by name.
    pub fn find_user_attribute_by_name(&self, name: &str) -> Option<UserAttribute<'a>> {
        let name = c_string("attribute name", name).ok()?;
        unsafe {
            UserAttribute::from_raw(TypeReflection_findUserAttributeByName(
                &mut self.as_raw(),
                name.as_ptr(),
            ))
        }
    }
}

index_iter! {
    /// Iterator over a struct type's fields
    Fields: TypeReflection => Variable, field
}

index_iter! {
    /// Iterator over a type's user attributes
    TypeAttributes: TypeReflection => UserAttribute, user_attribute
}

reflection_view! {
    /// A type together with how it was laid out for a target
    TypeLayout(SlangReflectionTypeLayout)
}

impl<'a> TypeLayout<'a> {
    /// The type being laid out
    pub fn ty(&self) -> Option<TypeReflection<'a>> {
        unsafe { TypeReflection::from_raw(TypeLayoutReflection_getType(&mut self.as_raw())) }
    }

    /// Type kind
    pub fn kind(&self) -> TypeKind {
        TypeKind::from(unsafe { TypeLayoutReflection_getKind(&mut self.as_raw()) })
    }

    /// Type name, if it has one
    pub fn name(&self) -> Option<&'a str> {
        unsafe { c_str(TypeLayoutReflection_getName(&mut self.as_raw())) }
    }

    /// Number of struct fields
    pub fn field_count(&self) -> u32 {
        unsafe { TypeLayoutReflection_getFieldCount(&mut self.as_raw()) }
    }

    /// Gets a field layout by index.
    pub fn field(&self, index: u32) -> Option<VariableLayout<'a>> {
        unsafe { VariableLayout::from_raw(TypeLayoutReflection_getFieldByIndex(&mut self.as_raw(), index)) }
    }

    /// Iterates the field layouts.
    pub fn fields(&self) -> FieldLayouts<'a> {
        FieldLayouts::new(*self, self.field_count())
    }

    /// Index of the field called `name`
    pub fn find_field_index_by_name(&self, name: &str) -> Option<u32> {
        let begin = name.as_ptr().cast::<c_char>();
        let end = begin.wrapping_add(name.len());
        let index = unsafe { TypeLayoutReflection_findFieldIndexByName(&mut self.as_raw(), begin, end) };
        u32::try_from(index).ok()
    }

    /// Units of `category` consumed: bytes for uniform data, slots otherwise
    pub fn size(&self, category: ParameterCategory) -> usize {
        unsafe { TypeLayoutReflection_getSize(&mut self.as_raw(), category.raw()) }
    }

    /// Size rounded up to alignment, as used for array elements
    pub fn stride(&self, category: ParameterCategory) -> usize {
        unsafe { TypeLayoutReflection_getStride(&mut self.as_raw(), category.raw()) }
    }

    /// Required alignment in `category`
    pub fn alignment(&self, category: ParameterCategory) -> i32 {
        unsafe { TypeLayoutReflection_getAlignment(&mut self.as_raw(), category.raw()) }
    }

    /// Stride between array elements
    pub fn element_stride(&self, category: ParameterCategory) -> usize {
        unsafe { TypeLayoutReflection_getElementStride(&mut self.as_raw(), category.raw()) }
    }

    /// Layout of an array, vector, matrix or buffer element
    pub fn element_type_layout(&self) -> Option<TypeLayout<'a>> {
        unsafe { TypeLayout::from_raw(TypeLayoutReflection_getElementTypeLayout(&mut self.as_raw())) }
    }

    /// Variable layout of the element, with its offsets inside the container
    pub fn element_var_layout(&self) -> Option<VariableLayout<'a>> {
        unsafe { VariableLayout::from_raw(TypeLayoutReflection_getElementVarLayout(&mut self.as_raw())) }
    }

    /// Variable layout of a constant buffer or parameter block itself
    pub fn container_var_layout(&self) -> Option<VariableLayout<'a>> {
        unsafe { VariableLayout::from_raw(TypeLayoutReflection_getContainerVarLayout(&mut self.as_raw())) }
    }

    /// Single category consumed, or `Mixed`
    pub fn parameter_category(&self) -> ParameterCategory {
        ParameterCategory::from(unsafe { TypeLayoutReflection_getParameterCategory(&mut self.as_raw()) })
    }

    /// Number of categories consumed
    pub fn category_count(&self) -> u32 {
        unsafe { TypeLayoutReflection_getCategoryCount(&mut self.as_raw()) }
    }

    /// Every category consumed
    pub fn categories(&self) -> impl ExactSizeIterator<Item = ParameterCategory> + 'a {
        let layout = *self;
        (0..layout.category_count()).map(move |i| {
            ParameterCategory::from(unsafe { TypeLayoutReflection_getCategoryByIndex(&mut layout.as_raw(), i) })
        })
    }
}

index_iter! {
    /// Iterator over a struct layout's fields
    FieldLayouts: TypeLayout => VariableLayout, field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompileTarget, testing};

    #[test]
    fn test_resource_shape_split() {
        let shape = ResourceShape::from(SLANG_TEXTURE_2D | SLANG_TEXTURE_ARRAY_FLAG);
        assert_eq!(shape.base, ResourceBaseShape::Texture2D);
        assert_eq!(shape.flags, ResourceShapeFlags::ARRAY);
        assert_eq!(ResourceShape::from(SLANG_STRUCTURED_BUFFER).flags, ResourceShapeFlags::empty());
    }

    #[test]
    fn test_constant_buffer_element_layout() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let layout = module.layout(0).unwrap();
        let params = layout.parameter(1).unwrap().type_layout().unwrap();
        assert_eq!(params.kind(), TypeKind::ConstantBuffer);
        assert_eq!(params.parameter_category(), ParameterCategory::ConstantBuffer);
        assert!(params.container_var_layout().is_some());

        let element = params.element_type_layout().unwrap();
        assert_eq!(element.name(), Some("Params"));
        assert_eq!(element.size(ParameterCategory::Uniform), 8);
        assert_eq!(element.find_field_index_by_name("count"), Some(1));
        assert_eq!(element.find_field_index_by_name("cou"), None);
        let count = element.field(1).unwrap();
        assert_eq!(count.offset(ParameterCategory::Uniform), 4);
        assert_eq!(count.type_layout().unwrap().ty().unwrap().scalar_type(), ScalarType::UInt32);
    }

    #[test]
    fn test_resource_type() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let layout = module.layout(0).unwrap();
        let output = layout.parameter(0).unwrap().variable().unwrap().ty().unwrap();
        assert_eq!(output.kind(), TypeKind::Resource);
        assert_eq!(output.resource_shape().base, ResourceBaseShape::StructuredBuffer);
        assert_eq!(output.resource_access(), ResourceAccess::ReadWrite);
        assert_eq!(output.resource_result_type().unwrap().scalar_type(), ScalarType::Float32);
    }

    #[test]
    fn test_array_of_structs_and_mixed_categories() {
        let session = testing::session(CompileTarget::Hlsl);
        let module = session.load_module(testing::LIGHTING).unwrap();
        let layout = module.layout(0).unwrap();

        let lights = layout.parameter(2).unwrap().type_layout().unwrap();
        assert_eq!(lights.kind(), TypeKind::Array);
        assert_eq!(lights.ty().unwrap().element_count(), 4);
        assert_eq!(lights.element_stride(ParameterCategory::Uniform), 16);
        assert_eq!(lights.size(ParameterCategory::Uniform), 64);
        let light = lights.element_type_layout().unwrap();
        let names: Vec<_> = light.fields().map(|f| f.name().unwrap_or("?")).collect();
        assert_eq!(names, vec!["position", "intensity"]);

        let globals = layout.global_params_type_layout().unwrap();
        let categories: Vec<_> = globals.categories().collect();
        assert_eq!(
            categories,
            vec![
                ParameterCategory::ShaderResource,
                ParameterCategory::SamplerState,
                ParameterCategory::Uniform
            ]
        );
        assert_eq!(globals.parameter_category(), ParameterCategory::Mixed);
    }
}
