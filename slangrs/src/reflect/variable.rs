//! Variable and variable-layout reflection

use super::{ParameterCategory, TypeLayout, TypeReflection, UserAttribute, index_iter, reflection_view};
use crate::error::c_string;
use crate::{GlobalSession, Stage, c_str};
use slangshim::*;

reflection_view! {
    /// A declared variable: a global parameter, struct field or entry point parameter
    Variable(SlangReflectionVariable)
}

impl<'a> Variable<'a> {
    /// Declared name
    pub fn name(&self) -> Option<&'a str> {
        unsafe { c_str(VariableReflection_getName(&mut self.as_raw())) }
    }

    /// Declared type
    pub fn ty(&self) -> Option<TypeReflection<'a>> {
        unsafe { TypeReflection::from_raw(VariableReflection_getType(&mut self.as_raw())) }
    }

    pub fn user_attribute_count(&self) -> u32 {
        unsafe { VariableReflection_getUserAttributeCount(&mut self.as_raw()) }
    }

    pub fn user_attribute(&self, index: u32) -> Option<UserAttribute<'a>> {
        unsafe { UserAttribute::from_raw(VariableReflection_getUserAttributeByIndex(&mut self.as_raw(), index)) }
    }

    /// Iterates the user attributes on the declaration.
    pub fn user_attributes(&self) -> VariableAttributes<'a> {
        VariableAttributes::new(*self, self.user_attribute_count())
    }

    /// Finds a user attribute by name. Slang resolves the name through
    /// `global`, so pass the session that compiled the program.
    pub fn find_user_attribute_by_name(&self, global: &GlobalSession, name: &str) -> Option<UserAttribute<'a>> {
        let name = c_string("attribute name", name).ok()?;
        unsafe {
            UserAttribute::from_raw(VariableReflection_findUserAttributeByName(
                &mut self.as_raw(),
                global.as_raw(),
                name.as_ptr(),
            ))
        }
    }
}

index_iter! {
    /// Iterator over a variable's user attributes
    VariableAttributes: Variable => UserAttribute, user_attribute
}

reflection_view! {
    /// A variable together with where it was placed for a target
    VariableLayout(SlangReflectionVariableLayout)
}

impl<'a> VariableLayout<'a> {
    /// The variable being laid out
    pub fn variable(&self) -> Option<Variable<'a>> {
        unsafe { Variable::from_raw(VariableLayoutReflection_getVariable(&mut self.as_raw())) }
    }

    /// Variable name
    pub fn name(&self) -> Option<&'a str> {
        unsafe { c_str(VariableLayoutReflection_getName(&mut self.as_raw())) }
    }

    /// Layout of the variable's type
    pub fn type_layout(&self) -> Option<TypeLayout<'a>> {
        unsafe { TypeLayout::from_raw(VariableLayoutReflection_getTypeLayout(&mut self.as_raw())) }
    }

    /// Offset in `category`: bytes for uniform data, a register or slot
    /// otherwise
    pub fn offset(&self, category: ParameterCategory) -> usize {
        unsafe { VariableLayoutReflection_getOffset(&mut self.as_raw(), category.raw()) }
    }

    /// Register space or descriptor set used for `category`
    pub fn space(&self, category: ParameterCategory) -> usize {
        unsafe { VariableLayoutReflection_getSpace(&mut self.as_raw(), category.raw()) }
    }

    /// Binding in the variable's primary category
    pub fn binding_index(&self) -> u32 {
        unsafe { VariableLayoutReflection_getBindingIndex(&mut self.as_raw()) }
    }

    /// Space or set in the variable's primary category
    pub fn binding_space(&self) -> u32 {
        unsafe { VariableLayoutReflection_getBindingSpace(&mut self.as_raw()) }
    }

    /// Semantic such as `SV_Position`, for varying parameters
    pub fn semantic_name(&self) -> Option<&'a str> {
        unsafe { c_str(VariableLayoutReflection_getSemanticName(&mut self.as_raw())) }
    }

    pub fn semantic_index(&self) -> usize {
        unsafe { VariableLayoutReflection_getSemanticIndex(&mut self.as_raw()) }
    }

    /// Stage of the entry point this is a parameter of
    pub fn stage(&self) -> Stage {
        Stage::from(unsafe { VariableLayoutReflection_getStage(&mut self.as_raw()) })
    }

    pub fn user_attribute_count(&self) -> u32 {
        unsafe { VariableLayoutReflection_getUserAttributeCount(&mut self.as_raw()) }
    }

    pub fn user_attribute(&self, index: u32) -> Option<UserAttribute<'a>> {
        unsafe {
            UserAttribute::from_raw(VariableLayoutReflection_getUserAttributeByIndex(
                &mut self.as_raw(),
                index,
            ))
        }
    }

    /// Iterates the user attributes on the underlying variable.
    pub fn user_attributes(&self) -> LayoutAttributes<'a> {
        LayoutAttributes::new(*self, self.user_attribute_count())
    }

    /// Finds a user attribute on the underlying variable by name.
    pub fn find_user_attribute_by_name(&self, global: &GlobalSession, name: &str) -> Option<UserAttribute<'a>> {
        let name = c_string("attribute name", name).ok()?;
        unsafe {
            UserAttribute::from_raw(VariableLayoutReflection_findUserAttributeByName(
                &mut self.as_raw(),
                global.as_raw(),
                name.as_ptr(),
            ))
        }
    }
}

index_iter! {
    /// Iterator over a variable layout's user attributes
    LayoutAttributes: VariableLayout => UserAttribute, user_attribute
}
