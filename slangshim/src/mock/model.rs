//! In-memory reflection model served by the fake library
//!
//! Type and type-layout nodes are the same `MockType`; variable and
//! variable-layout nodes are the same `MockVar`. Layout numbers follow a
//! simple scalar-aligned packing, not any particular target's rules.

use crate::types::*;
use std::ffi::CString;

fn c_string(s: &str) -> CString {
    CString::new(s).unwrap_or_default()
}

fn align_up(value: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        value
    } else {
        value.div_ceil(alignment) * alignment
    }
}

fn scalar_info(scalar: SlangScalarType) -> (&'static str, usize) {
    match scalar {
        SLANG_SCALAR_TYPE_BOOL => ("bool", 4),
        SLANG_SCALAR_TYPE_INT32 => ("int", 4),
        SLANG_SCALAR_TYPE_UINT32 => ("uint", 4),
        SLANG_SCALAR_TYPE_INT64 => ("int64_t", 8),
        SLANG_SCALAR_TYPE_UINT64 => ("uint64_t", 8),
        SLANG_SCALAR_TYPE_FLOAT16 => ("half", 2),
        SLANG_SCALAR_TYPE_FLOAT32 => ("float", 4),
        SLANG_SCALAR_TYPE_FLOAT64 => ("double", 8),
        SLANG_SCALAR_TYPE_INT8 => ("int8_t", 1),
        SLANG_SCALAR_TYPE_UINT8 => ("uint8_t", 1),
        SLANG_SCALAR_TYPE_INT16 => ("int16_t", 2),
        SLANG_SCALAR_TYPE_UINT16 => ("uint16_t", 2),
        SLANG_SCALAR_TYPE_INTPTR | SLANG_SCALAR_TYPE_UINTPTR => ("intptr_t", 8),
        _ => ("void", 0),
    }
}

/// A type together with its layout
#[derive(Clone, Debug)]
pub struct MockType {
    pub(crate) kind: SlangTypeKind,
    pub(crate) name: Option<CString>,
    pub(crate) scalar_type: SlangScalarType,
    pub(crate) rows: u32,
    pub(crate) columns: u32,
    pub(crate) element_count: usize,
    pub(crate) shape: SlangResourceShape,
    pub(crate) access: SlangResourceAccess,
    pub(crate) category: SlangParameterCategory,
    pub(crate) size: usize,
    pub(crate) alignment: usize,
    pub(crate) fields: Vec<MockVar>,
    pub(crate) element: Option<Box<MockVar>>,
    pub(crate) container: Option<Box<MockVar>>,
    pub(crate) result_type: Option<Box<MockType>>,
    pub(crate) attributes: Vec<MockAttribute>,
}

impl MockType {
    fn bare(kind: SlangTypeKind, name: Option<&str>, category: SlangParameterCategory) -> Self {
        Self {
            kind,
            name: name.map(c_string),
            scalar_type: SLANG_SCALAR_TYPE_NONE,
            rows: 0,
            columns: 0,
            element_count: 0,
            shape: SLANG_RESOURCE_NONE,
            access: SLANG_RESOURCE_ACCESS_NONE,
            category,
            size: 0,
            alignment: 1,
            fields: Vec::new(),
            element: None,
            container: None,
            result_type: None,
            attributes: Vec::new(),
        }
    }

    pub fn scalar(scalar: SlangScalarType) -> Self {
        let (name, size) = scalar_info(scalar);
        Self {
            scalar_type: scalar,
            size,
            alignment: size.max(1),
            rows: 1,
            columns: 1,
            ..Self::bare(SLANG_TYPE_KIND_SCALAR, Some(name), SLANG_PARAMETER_CATEGORY_UNIFORM)
        }
    }

    pub fn vector(scalar: SlangScalarType, count: usize) -> Self {
        let element = Self::scalar(scalar);
        Self {
            scalar_type: scalar,
            size: element.size * count,
            alignment: element.alignment,
            rows: 1,
            columns: count as u32,
            element_count: count,
            element: Some(Box::new(MockVar::new("", element))),
            ..Self::bare(SLANG_TYPE_KIND_VECTOR, Some("vector"), SLANG_PARAMETER_CATEGORY_UNIFORM)
        }
    }

    pub fn matrix(scalar: SlangScalarType, rows: u32, columns: u32) -> Self {
        let row = Self::vector(scalar, columns as usize);
        Self {
            scalar_type: scalar,
            size: row.size * rows as usize,
            alignment: row.alignment,
            rows,
            columns,
            element_count: rows as usize,
            element: Some(Box::new(MockVar::new("", row))),
            ..Self::bare(SLANG_TYPE_KIND_MATRIX, Some("matrix"), SLANG_PARAMETER_CATEGORY_UNIFORM)
        }
    }

    /// Struct whose fields are laid out in declaration order
    pub fn structure(name: &str, fields: Vec<MockVar>) -> Self {
        let mut ty = Self::bare(SLANG_TYPE_KIND_STRUCT, Some(name), SLANG_PARAMETER_CATEGORY_NONE);
        for field in fields {
            ty.push_field(field);
        }
        ty
    }

    pub fn array(element: MockType, count: usize) -> Self {
        let stride = element.uniform_stride();
        Self {
            size: stride * count,
            alignment: element.alignment,
            element_count: count,
            category: element.category,
            element: Some(Box::new(MockVar::new("", element))),
            ..Self::bare(SLANG_TYPE_KIND_ARRAY, None, SLANG_PARAMETER_CATEGORY_NONE)
        }
    }

    /// Texture or buffer; read-only access binds as a shader resource,
    /// anything else as an unordered-access view.
    pub fn resource(name: &str, shape: SlangResourceShape, access: SlangResourceAccess, result: MockType) -> Self {
        let category = if access == SLANG_RESOURCE_ACCESS_READ {
            SLANG_PARAMETER_CATEGORY_SHADER_RESOURCE
        } else {
            SLANG_PARAMETER_CATEGORY_UNORDERED_ACCESS
        };
        Self {
            shape,
            access,
            result_type: Some(Box::new(result)),
            ..Self::bare(SLANG_TYPE_KIND_RESOURCE, Some(name), category)
        }
    }

    pub fn sampler() -> Self {
        Self::bare(
            SLANG_TYPE_KIND_SAMPLER_STATE,
            Some("SamplerState"),
            SLANG_PARAMETER_CATEGORY_SAMPLER_STATE,
        )
    }

    pub fn constant_buffer(element: MockType) -> Self {
        let container = Self::bare(
            SLANG_TYPE_KIND_CONSTANT_BUFFER,
            Some("ConstantBuffer"),
            SLANG_PARAMETER_CATEGORY_CONSTANT_BUFFER,
        );
        Self {
            element: Some(Box::new(MockVar::new("", element))),
            container: Some(Box::new(MockVar::new("", container))),
            ..Self::bare(
                SLANG_TYPE_KIND_CONSTANT_BUFFER,
                Some("ConstantBuffer"),
                SLANG_PARAMETER_CATEGORY_CONSTANT_BUFFER,
            )
        }
    }

    pub fn with_attribute(mut self, attribute: MockAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub(crate) fn push_field(&mut self, mut field: MockVar) {
        if field.ty.category == SLANG_PARAMETER_CATEGORY_UNIFORM || field.ty.size > 0 {
            field.offset = align_up(self.size, field.ty.alignment);
            self.size = field.offset + field.ty.size;
            self.alignment = self.alignment.max(field.ty.alignment);
        }
        self.category = match (self.category, field.ty.category) {
            (SLANG_PARAMETER_CATEGORY_NONE, c) => c,
            (current, c) if current == c => current,
            _ => SLANG_PARAMETER_CATEGORY_MIXED,
        };
        self.fields.push(field);
    }

    pub(crate) fn uniform_stride(&self) -> usize {
        align_up(self.size, self.alignment)
    }

    /// Every category this layout consumes, in first-use order
    pub(crate) fn categories(&self) -> Vec<SlangParameterCategory> {
        match self.kind {
            SLANG_TYPE_KIND_STRUCT => {
                let mut out = Vec::new();
                for category in self.fields.iter().flat_map(|f| f.ty.categories()) {
                    if !out.contains(&category) {
                        out.push(category);
                    }
                }
                out
            }
            _ if self.category == SLANG_PARAMETER_CATEGORY_NONE => Vec::new(),
            _ => vec![self.category],
        }
    }

    /// Units of `category` consumed: bytes for uniform data, slots otherwise
    pub(crate) fn size_in(&self, category: SlangParameterCategory) -> usize {
        if category == SLANG_PARAMETER_CATEGORY_UNIFORM {
            return self.size;
        }
        match self.kind {
            SLANG_TYPE_KIND_STRUCT => self.fields.iter().map(|f| f.ty.size_in(category)).sum(),
            SLANG_TYPE_KIND_ARRAY => {
                let per_element = self.element.as_ref().map_or(0, |e| e.ty.size_in(category));
                per_element * self.element_count
            }
            _ if self.category == category => 1,
            _ => 0,
        }
    }

    pub(crate) fn stride_in(&self, category: SlangParameterCategory) -> usize {
        if category == SLANG_PARAMETER_CATEGORY_UNIFORM {
            self.uniform_stride()
        } else {
            self.size_in(category)
        }
    }

    pub(crate) fn find_type(&self, name: &[u8]) -> Option<&MockType> {
        if self.name.as_ref().is_some_and(|n| n.as_bytes() == name) {
            return Some(self);
        }
        self.fields
            .iter()
            .map(|f| &f.ty)
            .chain(self.element.as_deref().map(|e| &e.ty))
            .chain(self.result_type.as_deref())
            .find_map(|t| t.find_type(name))
    }
}

/// A variable together with its layout
#[derive(Clone, Debug)]
pub struct MockVar {
    pub(crate) name: Option<CString>,
    pub(crate) ty: MockType,
    pub(crate) offset: usize,
    pub(crate) binding_index: u32,
    pub(crate) binding_space: u32,
    pub(crate) semantic: Option<(CString, usize)>,
    pub(crate) stage: SlangStage,
    pub(crate) attributes: Vec<MockAttribute>,
}

impl MockVar {
    /// An empty name models Slang's anonymous element and container layouts
    pub fn new(name: &str, ty: MockType) -> Self {
        Self {
            name: (!name.is_empty()).then(|| c_string(name)),
            ty,
            offset: 0,
            binding_index: 0,
            binding_space: 0,
            semantic: None,
            stage: SLANG_STAGE_NONE,
            attributes: Vec::new(),
        }
    }

    pub fn binding(mut self, index: u32, space: u32) -> Self {
        self.binding_index = index;
        self.binding_space = space;
        self
    }

    pub fn semantic(mut self, name: &str, index: usize) -> Self {
        self.semantic = Some((c_string(name), index));
        self
    }

    pub fn with_attribute(mut self, attribute: MockAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub(crate) fn offset_in(&self, category: SlangParameterCategory) -> usize {
        if category == SLANG_PARAMETER_CATEGORY_UNIFORM {
            self.offset
        } else if self.ty.categories().contains(&category) {
            self.binding_index as usize
        } else {
            0
        }
    }

    pub(crate) fn space_in(&self, category: SlangParameterCategory) -> usize {
        if category != SLANG_PARAMETER_CATEGORY_UNIFORM && self.ty.categories().contains(&category) {
            self.binding_space as usize
        } else {
            0
        }
    }
}

#[derive(Clone, Debug)]
pub enum MockArg {
    Int(i32),
    Float(f32),
    Str(String),
}

/// A user attribute such as `[MyAttr(1, "x")]`
#[derive(Clone, Debug)]
pub struct MockAttribute {
    pub(crate) name: CString,
    pub(crate) args: Vec<(MockArg, MockType)>,
    // Raw bytes of string arguments, indexed like `args`
    pub(crate) strings: Vec<Vec<u8>>,
}

impl MockAttribute {
    pub fn new(name: &str) -> Self {
        Self {
            name: c_string(name),
            args: Vec::new(),
            strings: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: MockArg) -> Self {
        let (ty, bytes) = match &arg {
            MockArg::Int(_) => (MockType::scalar(SLANG_SCALAR_TYPE_INT32), Vec::new()),
            MockArg::Float(_) => (MockType::scalar(SLANG_SCALAR_TYPE_FLOAT32), Vec::new()),
            MockArg::Str(s) => (
                MockType::bare(SLANG_TYPE_KIND_NONE, Some("String"), SLANG_PARAMETER_CATEGORY_NONE),
                s.as_bytes().to_vec(),
            ),
        };
        self.args.push((arg, ty));
        self.strings.push(bytes);
        self
    }
}

#[derive(Clone, Debug)]
pub(crate) struct MockFunction {
    pub(crate) name: CString,
}

#[derive(Clone, Debug)]
pub struct MockEntryPoint {
    pub(crate) name: CString,
    pub(crate) stage: SlangStage,
    pub(crate) thread_group_size: [SlangUInt; 3],
    pub(crate) params: MockVar,
    pub(crate) result: Option<MockVar>,
    pub(crate) function: MockFunction,
}

impl MockEntryPoint {
    pub fn new(name: &str, stage: SlangStage) -> Self {
        Self {
            name: c_string(name),
            stage,
            thread_group_size: [1, 1, 1],
            params: MockVar::new("", MockType::structure("", Vec::new())),
            result: None,
            function: MockFunction { name: c_string(name) },
        }
    }

    pub fn thread_group_size(mut self, size: [SlangUInt; 3]) -> Self {
        self.thread_group_size = size;
        self
    }

    pub fn parameter(mut self, mut var: MockVar) -> Self {
        var.stage = self.stage;
        self.params.ty.push_field(var);
        self
    }

    pub fn result(mut self, mut var: MockVar) -> Self {
        var.stage = self.stage;
        self.result = Some(var);
        self
    }

    pub(crate) fn name_bytes(&self) -> &[u8] {
        self.name.as_bytes()
    }
}

/// A module the fake library will "load" by name
#[derive(Clone, Debug)]
pub struct MockModule {
    pub(crate) name: CString,
    pub(crate) path: CString,
    pub(crate) globals: Vec<MockVar>,
    pub(crate) entry_points: Vec<MockEntryPoint>,
    pub(crate) warning: Option<String>,
    pub(crate) load_error: Option<String>,
}

impl MockModule {
    pub fn new(name: &str) -> Self {
        Self {
            name: c_string(name),
            path: c_string(&format!("{name}.slang")),
            globals: Vec::new(),
            entry_points: Vec::new(),
            warning: None,
            load_error: None,
        }
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = c_string(path);
        self
    }

    pub fn parameter(mut self, var: MockVar) -> Self {
        self.globals.push(var);
        self
    }

    pub fn entry_point(mut self, entry_point: MockEntryPoint) -> Self {
        self.entry_points.push(entry_point);
        self
    }

    /// Loads succeed but report this text as diagnostics
    pub fn warning(mut self, text: &str) -> Self {
        self.warning = Some(text.to_string());
        self
    }

    /// Loads fail with this text as diagnostics
    pub fn load_error(mut self, text: &str) -> Self {
        self.load_error = Some(text.to_string());
        self
    }

    pub(crate) fn name_str(&self) -> &str {
        self.name.to_str().unwrap_or_default()
    }
}

/// Root of a component type's layout
#[derive(Clone, Debug)]
pub(crate) struct MockProgram {
    pub(crate) globals: MockVar,
    pub(crate) entry_points: Vec<MockEntryPoint>,
}

impl MockProgram {
    pub(crate) fn empty() -> Self {
        Self {
            globals: MockVar::new("", MockType::structure("", Vec::new())),
            entry_points: Vec::new(),
        }
    }

    pub(crate) fn with_globals(globals: &[MockVar]) -> Self {
        let mut program = Self::empty();
        program.add_globals(globals);
        program
    }

    /// Adds parameters not already present by name
    pub(crate) fn add_globals(&mut self, globals: &[MockVar]) {
        for var in globals {
            if !self.globals.ty.fields.iter().any(|f| f.name == var.name) {
                self.globals.ty.push_field(var.clone());
            }
        }
    }

    pub(crate) fn add_entry_points(&mut self, entry_points: &[MockEntryPoint]) {
        for entry_point in entry_points {
            if !self.entry_points.iter().any(|e| e.name == entry_point.name) {
                self.entry_points.push(entry_point.clone());
            }
        }
    }

    pub(crate) fn merge(&mut self, other: &MockProgram) {
        self.add_globals(&other.globals.ty.fields);
        self.add_entry_points(&other.entry_points);
    }

    pub(crate) fn find_type(&self, name: &[u8]) -> Option<&MockType> {
        self.globals
            .ty
            .fields
            .iter()
            .map(|f| &f.ty)
            .chain(
                self.entry_points
                    .iter()
                    .flat_map(|e| e.params.ty.fields.iter().map(|f| &f.ty)),
            )
            .find_map(|t| t.find_type(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_fields_are_packed_with_alignment() {
        let ty = MockType::structure(
            "Params",
            vec![
                MockVar::new("scale", MockType::scalar(SLANG_SCALAR_TYPE_FLOAT32)),
                MockVar::new("offset", MockType::vector(SLANG_SCALAR_TYPE_FLOAT64, 2)),
                MockVar::new("count", MockType::scalar(SLANG_SCALAR_TYPE_UINT32)),
            ],
        );
        let offsets: Vec<_> = ty.fields.iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 8, 24]);
        assert_eq!(ty.size, 28);
        assert_eq!(ty.uniform_stride(), 32);
        assert_eq!(ty.category, SLANG_PARAMETER_CATEGORY_UNIFORM);
    }

    #[test]
    fn mixed_struct_reports_every_category() {
        let ty = MockType::structure(
            "Material",
            vec![
                MockVar::new("tint", MockType::vector(SLANG_SCALAR_TYPE_FLOAT32, 4)),
                MockVar::new("sampler", MockType::sampler()),
            ],
        );
        assert_eq!(ty.category, SLANG_PARAMETER_CATEGORY_MIXED);
        assert_eq!(
            ty.categories(),
            vec![SLANG_PARAMETER_CATEGORY_UNIFORM, SLANG_PARAMETER_CATEGORY_SAMPLER_STATE]
        );
        assert_eq!(ty.size_in(SLANG_PARAMETER_CATEGORY_SAMPLER_STATE), 1);
    }

    #[test]
    fn arrays_of_resources_consume_one_slot_per_element() {
        let texture = MockType::resource(
            "Texture2D",
            SLANG_TEXTURE_2D,
            SLANG_RESOURCE_ACCESS_READ,
            MockType::vector(SLANG_SCALAR_TYPE_FLOAT32, 4),
        );
        let array = MockType::array(texture, 8);
        assert_eq!(array.size_in(SLANG_PARAMETER_CATEGORY_SHADER_RESOURCE), 8);
        assert_eq!(array.size_in(SLANG_PARAMETER_CATEGORY_UNIFORM), 0);
    }

    #[test]
    fn merged_programs_keep_one_copy_of_each_parameter() {
        let a = MockProgram::with_globals(&[MockVar::new("g", MockType::scalar(SLANG_SCALAR_TYPE_INT32))]);
        let mut b = MockProgram::with_globals(&[MockVar::new("g", MockType::scalar(SLANG_SCALAR_TYPE_INT32))]);
        b.merge(&a);
        assert_eq!(b.globals.ty.fields.len(), 1);
    }
}
