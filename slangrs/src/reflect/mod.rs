//! Program reflection API
//!
//! Reflection nodes live inside the program layout of a component type, so
//! every view here borrows the [`ComponentType`](crate::ComponentType) it came
//! from and cannot outlive it.
//!
//! # Example
//! ```no_run
//! use slangrs::{CompileTarget, Downcast, GlobalSession, SessionBuilder, TargetDescBuilder};
//! use slangrs::reflect::ParameterCategory;
//!
//! let global = GlobalSession::new().unwrap();
//! let session = global
//!     .create_session(&SessionBuilder::new().target(TargetDescBuilder::new(CompileTarget::SpirV)))
//!     .unwrap();
//! let module = session.load_module("shaders/blur").unwrap();
//! let layout = module.layout(0).unwrap();
//!
//! for param in layout.parameters() {
//!     println!(
//!         "{} binding={} space={}",
//!         param.name().unwrap_or("?"),
//!         param.binding_index(),
//!         param.binding_space()
//!     );
//! }
//! for entry in layout.entry_points() {
//!     println!("{} {:?}", entry.name().unwrap_or("?"), entry.stage());
//! }
//! # let _ = ParameterCategory::Uniform;
//! ```

mod attribute;
mod entry_point;
mod types;
mod variable;

pub use attribute::UserAttribute;
pub use entry_point::{EntryPointParameters, EntryPointReflection, FunctionReflection};
pub use types::{
    FieldLayouts, Fields, ParameterCategory, ResourceAccess, ResourceBaseShape, ResourceShape, ScalarType,
    TypeAttributes, TypeKind, TypeLayout, TypeReflection,
};
pub use variable::{LayoutAttributes, Variable, VariableAttributes, VariableLayout};

use crate::error::c_string;
use slangshim::*;
use std::marker::PhantomData;

/// Declares an index-based iterator over a reflection view's children.
///
/// `$get` is a method on the parent taking `u32` and returning
/// `Option<$item>`; iteration ends early if it returns `None`.
macro_rules! index_iter {
    ($(#[$meta:meta])* $name:ident: $parent:ident => $item:ident, $get:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name<'a> {
            parent: $parent<'a>,
            index: u32,
            count: u32,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(parent: $parent<'a>, count: u32) -> Self {
                $name { parent, index: 0, count }
            }
        }

        impl<'a> Iterator for $name<'a> {
            type Item = $item<'a>;

            fn next(&mut self) -> Option<Self::Item> {
                if self.index >= self.count {
                    return None;
                }
                let item = self.parent.$get(self.index);
                self.index += 1;
                if item.is_none() {
                    self.index = self.count;
                }
                item
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let remaining = (self.count - self.index) as usize;
                (remaining, Some(remaining))
            }
        }

        impl<'a> ExactSizeIterator for $name<'a> {}
    };
}

pub(crate) use index_iter;

/// Wraps a non-null reflection pointer in a borrowed view.
macro_rules! reflection_view {
    ($(#[$meta:meta])* $name:ident($raw:ty)) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name<'a> {
            ptr: *mut $raw,
            _marker: std::marker::PhantomData<&'a ()>,
        }

        impl<'a> $name<'a> {
            /// # Safety
            /// `ptr` must be null or a node that stays valid for `'a`.
            pub(crate) unsafe fn from_raw(ptr: *mut $raw) -> Option<Self> {
                if ptr.is_null() {
                    None
                } else {
                    Some($name {
                        ptr,
                        _marker: std::marker::PhantomData,
                    })
                }
            }

            pub(crate) fn as_raw(&self) -> *mut $raw {
                self.ptr
            }
        }

        impl std::fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name)).field("ptr", &self.ptr).finish()
            }
        }
    };
}

pub(crate) use reflection_view;

/// Program layout of a component type for one target
#[derive(Clone, Copy)]
pub struct ProgramLayout<'a> {
    ptr: *mut SlangReflection,
    _marker: PhantomData<&'a ()>,
}

impl<'a> ProgramLayout<'a> {
    pub(crate) unsafe fn from_raw(ptr: *mut SlangReflection) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(ProgramLayout {
                ptr,
                _marker: PhantomData,
            })
        }
    }

    fn as_raw(&self) -> *mut SlangReflection {
        self.ptr
    }

    /// Number of global shader parameters
    pub fn parameter_count(&self) -> u32 {
        unsafe { ShaderReflection_getParameterCount(&mut self.as_raw()) }
    }

    /// Gets a global parameter by index.
    pub fn parameter(&self, index: u32) -> Option<VariableLayout<'a>> {
        unsafe { VariableLayout::from_raw(ShaderReflection_getParameterByIndex(&mut self.as_raw(), index)) }
    }

    /// Iterates the global parameters.
    pub fn parameters(&self) -> Parameters<'a> {
        Parameters::new(*self, self.parameter_count())
    }

    /// Number of entry points in the program
    pub fn entry_point_count(&self) -> u32 {
        unsafe { ShaderReflection_getEntryPointCount(&mut self.as_raw()) as u32 }
    }

    /// Gets an entry point by index.
    pub fn entry_point(&self, index: u32) -> Option<EntryPointReflection<'a>> {
        unsafe {
            EntryPointReflection::from_raw(ShaderReflection_getEntryPointByIndex(
                &mut self.as_raw(),
                index as SlangUInt,
            ))
        }
    }

    /// Iterates the entry points.
    pub fn entry_points(&self) -> EntryPoints<'a> {
        EntryPoints::new(*self, self.entry_point_count())
    }

    /// Finds an entry point by name.
    pub fn find_entry_point_by_name(&self, name: &str) -> Option<EntryPointReflection<'a>> {
        let name = c_string("entry point name", name).ok()?;
        unsafe {
            EntryPointReflection::from_raw(ShaderReflection_findEntryPointByName(&mut self.as_raw(), name.as_ptr()))
        }
    }

    /// Layout of all global parameters, viewed as one struct
    pub fn global_params_type_layout(&self) -> Option<TypeLayout<'a>> {
        unsafe { TypeLayout::from_raw(ShaderReflection_getGlobalParamsTypeLayout(&mut self.as_raw())) }
    }

    /// Variable layout wrapping [`Self::global_params_type_layout`]
    pub fn global_params_var_layout(&self) -> Option<VariableLayout<'a>> {
        unsafe { VariableLayout::from_raw(ShaderReflection_getGlobalParamsVarLayout(&mut self.as_raw())) }
    }

    /// Finds a type used by the program by name.
    pub fn find_type_by_name(&self, name: &str) -> Option<TypeReflection<'a>> {
        let name = c_string("type name", name).ok()?;
        unsafe { TypeReflection::from_raw(ShaderReflection_findTypeByName(&mut self.as_raw(), name.as_ptr())) }
    }
}

impl std::fmt::Debug for ProgramLayout<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramLayout")
            .field("parameters", &self.parameter_count())
            .field("entry_points", &self.entry_point_count())
            .finish()
    }
}

index_iter! {
    /// Iterator over a program's global parameters
    Parameters: ProgramLayout => VariableLayout, parameter
}

index_iter! {
    /// Iterator over a program's entry points
    EntryPoints: ProgramLayout => EntryPointReflection, entry_point
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompileTarget, Downcast, testing};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_global_parameter_names() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let layout = module.layout(0).unwrap();
        assert_eq!(layout.parameter_count(), 2);
        let names: Vec<_> = layout.parameters().map(|p| p.name().unwrap_or("?")).collect();
        assert_eq!(names, vec!["output", "params"]);
        assert!(layout.parameter(2).is_none());
    }

    #[test]
    fn test_composite_lists_entry_points() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::LIGHTING).unwrap();
        let vs = module.find_entry_point_by_name("vsMain").unwrap();
        let ps = module.find_entry_point_by_name("psMain").unwrap();
        let program = session
            .create_composite_component_type(&[module.downcast(), vs.downcast(), ps.downcast()])
            .unwrap();
        let layout = program.layout(0).unwrap();

        assert_eq!(layout.entry_points().len(), 2);
        let ps = layout.find_entry_point_by_name("psMain").unwrap();
        assert_eq!(ps.name(), Some("psMain"));
        assert!(layout.find_entry_point_by_name("csMain").is_none());
    }

    #[test]
    fn test_global_params_struct() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let layout = module.layout(0).unwrap();
        let globals = layout.global_params_type_layout().unwrap();
        assert_eq!(globals.kind(), TypeKind::Struct);
        assert_eq!(globals.field_count(), 2);
        assert!(layout.global_params_var_layout().is_some());
        assert_eq!(layout.find_type_by_name("Params").unwrap().name(), Some("Params"));
    }
}
