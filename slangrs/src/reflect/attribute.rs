//! User attribute reflection

use super::{TypeReflection, reflection_view};
use crate::error::check;
use crate::{Result, c_str};
use slangshim::*;
use std::ffi::{c_float, c_int};

reflection_view! {
    /// A user-defined attribute such as `[Tunable(0.0, 4.0)]`
    UserAttribute(SlangReflectionUserAttribute)
}

impl<'a> UserAttribute<'a> {
    /// Attribute name without brackets
    pub fn name(&self) -> Option<&'a str> {
        unsafe { c_str(UserAttribute_getName(&mut self.as_raw())) }
    }

    pub fn argument_count(&self) -> u32 {
        unsafe { UserAttribute_getArgumentCount(&mut self.as_raw()) }
    }

    /// Type of argument `index`
    pub fn argument_type(&self, index: u32) -> Option<TypeReflection<'a>> {
        unsafe { TypeReflection::from_raw(UserAttribute_getArgumentType(&mut self.as_raw(), index)) }
    }

    /// Reads argument `index` as an integer. Fails if it is not one.
    pub fn argument_int(&self, index: u32) -> Result<i32> {
        let mut value: c_int = 0;
        check(
            unsafe { UserAttribute_getArgumentValueInt(&mut self.as_raw(), index, &mut value) },
            None,
        )?;
        Ok(value)
    }

    /// Reads argument `index` as a float. Fails if it is not one.
    pub fn argument_float(&self, index: u32) -> Result<f32> {
        let mut value: c_float = 0.0;
        check(
            unsafe { UserAttribute_getArgumentValueFloat(&mut self.as_raw(), index, &mut value) },
            None,
        )?;
        Ok(value)
    }

    /// Reads argument `index` as a string literal
    pub fn argument_string(&self, index: u32) -> Option<&'a str> {
        let mut len = 0usize;
        let ptr = unsafe { UserAttribute_getArgumentValueString(&mut self.as_raw(), index, &mut len) };
        if ptr.is_null() {
            return None;
        }
        // Not NUL-terminated; the length is reported separately
        let bytes = unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) };
        std::str::from_utf8(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::reflect::{ScalarType, TypeKind};
    use crate::{CompileTarget, Error, testing};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attribute_arguments() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let layout = module.layout(0).unwrap();
        let tunable = layout.parameter(1).unwrap().user_attribute(0).unwrap();

        assert_eq!(tunable.name(), Some("Tunable"));
        assert_eq!(tunable.argument_count(), 3);
        assert_eq!(tunable.argument_float(0).unwrap(), 0.5);
        assert_eq!(tunable.argument_int(1).unwrap(), 4);
        assert_eq!(tunable.argument_string(2), Some("scale"));
        assert_eq!(tunable.argument_type(1).unwrap().scalar_type(), ScalarType::Int32);
        assert_eq!(tunable.argument_type(2).unwrap().kind(), TypeKind::None);
    }

    #[test]
    fn test_mismatched_argument_kind() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let layout = module.layout(0).unwrap();
        let tunable = layout.parameter(1).unwrap().user_attribute(0).unwrap();

        assert!(matches!(tunable.argument_int(0), Err(Error::Slang { .. })));
        assert!(tunable.argument_float(2).is_err());
        assert_eq!(tunable.argument_string(1), None);
        assert_eq!(tunable.argument_string(9), None);
        assert!(tunable.argument_type(9).is_none());
    }

    #[test]
    fn test_type_attribute() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let layout = module.layout(0).unwrap();
        let params = layout.find_type_by_name("Params").unwrap();
        assert_eq!(params.user_attribute_count(), 1);
        let packed = params.find_user_attribute_by_name("Packed").unwrap();
        assert_eq!(packed.argument_count(), 0);
        assert!(params.find_user_attribute_by_name("Tunable").is_none());
        assert_eq!(params.user_attributes().len(), 1);
    }
}
