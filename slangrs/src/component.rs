//! Component types: modules, entry points and their composites

use crate::error::{c_string, check};
use crate::reflect::{FunctionReflection, ProgramLayout};
use crate::{Blob, CompilerOptions, Error, Result, Session, SlangResult, Stage, c_str};
use slangshim::handle::upcast;
use slangshim::*;
use std::ops::Deref;
use std::ptr;

/// RAII wrapper for IComponentType
///
/// Anything that can be composed, linked and compiled. [`Module`] and
/// [`EntryPoint`] dereference to this type.
///
/// Holds a reference to its session, so the session outlives every handle
/// taken from it.
pub struct ComponentType {
    ptr: *mut IComponentType,
    // Released after `ptr`
    session: Option<Session>,
}

impl ComponentType {
    /// Takes over an owned reference.
    pub(crate) unsafe fn from_raw(mut ptr: *mut IComponentType) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        let session = unsafe { Session::from_borrowed(ComponentType_getSession(&mut ptr)) };
        Some(ComponentType { ptr, session })
    }

    /// Wraps a borrowed reference, adding one of our own.
    pub(crate) unsafe fn from_borrowed(mut ptr: *mut IComponentType) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        unsafe { ComponentType_addRef(&mut ptr) };
        unsafe { ComponentType::from_raw(ptr) }
    }

    /// The session this component belongs to
    pub fn session(&self) -> Result<Session> {
        self.session
            .clone()
            .ok_or(Error::NullHandle("ComponentType_getSession"))
    }

    /// Program layout for the session target at `target_index`.
    ///
    /// The layout borrows this component type.
    pub fn layout(&self, target_index: usize) -> Result<ProgramLayout<'_>> {
        let mut diagnostics = ptr::null_mut();
        let layout = unsafe { ComponentType_getLayout(&mut self.as_raw(), target_index as SlangInt, &mut diagnostics) };
        let diagnostics = unsafe { Blob::from_raw(diagnostics) };
        match unsafe { ProgramLayout::from_raw(layout) } {
            Some(layout) => {
                check(SLANG_OK, diagnostics)?;
                Ok(layout)
            }
            None => Err(Error::Slang {
                result: SlangResult::FAIL,
                message: diagnostics.map(|d| d.to_string_lossy()).unwrap_or_default(),
            }),
        }
    }

    /// Number of unspecialized generic parameters
    pub fn specialization_param_count(&self) -> usize {
        unsafe { ComponentType_getSpecializationParamCount(&mut self.as_raw()) }.max(0) as usize
    }

    /// Compiled code for one entry point on one target.
    pub fn entry_point_code(&self, entry_point_index: usize, target_index: usize) -> Result<Blob> {
        let mut code = ptr::null_mut();
        let mut diagnostics = ptr::null_mut();
        let result = unsafe {
            ComponentType_getEntryPointCode(
                &mut self.as_raw(),
                entry_point_index as SlangInt,
                target_index as SlangInt,
                &mut code,
                &mut diagnostics,
            )
        };
        let code = unsafe { Blob::from_raw(code) };
        check(result, unsafe { Blob::from_raw(diagnostics) })?;
        code.ok_or(Error::NullHandle("ComponentType_getEntryPointCode"))
    }

    /// Compiled code for every entry point on one target.
    pub fn target_code(&self, target_index: usize) -> Result<Blob> {
        let mut code = ptr::null_mut();
        let mut diagnostics = ptr::null_mut();
        let result = unsafe {
            ComponentType_getTargetCode(&mut self.as_raw(), target_index as SlangInt, &mut code, &mut diagnostics)
        };
        let code = unsafe { Blob::from_raw(code) };
        check(result, unsafe { Blob::from_raw(diagnostics) })?;
        code.ok_or(Error::NullHandle("ComponentType_getTargetCode"))
    }

    /// Resolves cross-module references into a linked program.
    pub fn link(&self) -> Result<ComponentType> {
        let mut linked = ptr::null_mut();
        let mut diagnostics = ptr::null_mut();
        let result = unsafe { ComponentType_link(&mut self.as_raw(), &mut linked, &mut diagnostics) };
        check(result, unsafe { Blob::from_raw(diagnostics) })?;
        unsafe { ComponentType::from_raw(linked) }.ok_or(Error::NullHandle("ComponentType_link"))
    }

    /// Links with extra compiler options applied to the result.
    pub fn link_with_options(&self, options: &CompilerOptions) -> Result<ComponentType> {
        let mut entries = options.to_entries()?;
        let mut linked = ptr::null_mut();
        let mut diagnostics = ptr::null_mut();
        let result = unsafe {
            ComponentType_linkWithOptions(
                &mut self.as_raw(),
                &mut linked,
                entries.count(),
                entries.as_mut_ptr(),
                &mut diagnostics,
            )
        };
        check(result, unsafe { Blob::from_raw(diagnostics) })?;
        unsafe { ComponentType::from_raw(linked) }.ok_or(Error::NullHandle("ComponentType_linkWithOptions"))
    }

    pub(crate) fn as_raw(&self) -> *mut IComponentType {
        self.ptr
    }
}

impl Clone for ComponentType {
    fn clone(&self) -> Self {
        unsafe { ComponentType_addRef(&mut self.as_raw()) };
        ComponentType {
            ptr: self.ptr,
            session: self.session.clone(),
        }
    }
}

impl Drop for ComponentType {
    fn drop(&mut self) {
        unsafe {
            ComponentType_release(&mut self.ptr);
        }
    }
}

impl std::fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentType").field("ptr", &self.ptr).finish()
    }
}

/// Views a module or entry point as the component type it extends
pub trait Downcast {
    /// Returns the underlying component type.
    fn downcast(&self) -> &ComponentType;
}

impl Downcast for ComponentType {
    fn downcast(&self) -> &ComponentType {
        self
    }
}

/// RAII wrapper for IModule
///
/// A loaded translation unit. The session keeps every module it loads; this
/// handle holds one more reference.
#[derive(Clone, Debug)]
pub struct Module {
    inner: ComponentType,
}

impl Module {
    pub(crate) unsafe fn from_borrowed(ptr: *mut IModule) -> Option<Self> {
        unsafe { ComponentType::from_borrowed(upcast(ptr)) }.map(|inner| Module { inner })
    }

    fn as_module(&self) -> *mut IModule {
        self.inner.as_raw().cast()
    }

    /// Module name
    pub fn name(&self) -> &str {
        unsafe { c_str(Module_getName(&mut self.as_module())) }.unwrap_or_default()
    }

    /// Path the module was loaded from, if any
    pub fn file_path(&self) -> Option<&str> {
        unsafe { c_str(Module_getFilePath(&mut self.as_module())) }.filter(|p| !p.is_empty())
    }

    /// Number of entry points declared with `[shader(...)]`
    pub fn entry_point_count(&self) -> u32 {
        unsafe { Module_getDefinedEntryPointCount(&mut self.as_module()) }.max(0) as u32
    }

    /// The declared entry point at `index`.
    pub fn entry_point(&self, index: u32) -> Result<EntryPoint> {
        let mut out = ptr::null_mut();
        let result = unsafe { Module_getDefinedEntryPoint(&mut self.as_module(), index as SlangInt32, &mut out) };
        check(result, None)?;
        unsafe { EntryPoint::from_raw(out) }.ok_or(Error::NullHandle("Module_getDefinedEntryPoint"))
    }

    /// Iterates the declared entry points.
    pub fn entry_points(&self) -> EntryPoints<'_> {
        EntryPoints {
            module: self,
            index: 0,
            count: self.entry_point_count(),
        }
    }

    /// Looks up a declared entry point by name.
    pub fn find_entry_point_by_name(&self, name: &str) -> Result<EntryPoint> {
        let name_c = c_string("entry point name", name)?;
        let mut out = ptr::null_mut();
        let result = unsafe { Module_findEntryPointByName(&mut self.as_module(), name_c.as_ptr(), &mut out) };
        if SlangResult(result).is_error() {
            return Err(Error::Slang {
                result: SlangResult(result),
                message: format!("entry point '{name}' not found in module '{}'", self.name()),
            });
        }
        unsafe { EntryPoint::from_raw(out) }.ok_or(Error::NullHandle("Module_findEntryPointByName"))
    }

    /// Looks up `name` and checks it as an entry point for `stage`, even if
    /// it carries no `[shader(...)]` attribute.
    pub fn find_and_check_entry_point(&self, name: &str, stage: Stage) -> Result<EntryPoint> {
        let name_c = c_string("entry point name", name)?;
        let mut out = ptr::null_mut();
        let mut diagnostics = ptr::null_mut();
        let result = unsafe {
            Module_findAndCheckEntryPoint(
                &mut self.as_module(),
                name_c.as_ptr(),
                stage.raw(),
                &mut out,
                &mut diagnostics,
            )
        };
        check(result, unsafe { Blob::from_raw(diagnostics) })?;
        unsafe { EntryPoint::from_raw(out) }.ok_or(Error::NullHandle("Module_findAndCheckEntryPoint"))
    }
}

impl Deref for Module {
    type Target = ComponentType;

    fn deref(&self) -> &ComponentType {
        &self.inner
    }
}

impl Downcast for Module {
    fn downcast(&self) -> &ComponentType {
        &self.inner
    }
}

impl From<Module> for ComponentType {
    fn from(module: Module) -> Self {
        module.inner
    }
}

/// Iterator over a module's declared entry points
pub struct EntryPoints<'a> {
    module: &'a Module,
    index: u32,
    count: u32,
}

impl Iterator for EntryPoints<'_> {
    type Item = Result<EntryPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(self.module.entry_point(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EntryPoints<'_> {}

/// RAII wrapper for IEntryPoint
#[derive(Clone, Debug)]
pub struct EntryPoint {
    inner: ComponentType,
}

impl EntryPoint {
    pub(crate) unsafe fn from_raw(ptr: *mut IEntryPoint) -> Option<Self> {
        unsafe { ComponentType::from_raw(upcast(ptr)) }.map(|inner| EntryPoint { inner })
    }

    /// Reflection of the function behind this entry point
    pub fn function_reflection(&self) -> Option<FunctionReflection<'_>> {
        let mut this: *mut IEntryPoint = self.inner.as_raw().cast();
        unsafe { FunctionReflection::from_raw(EntryPoint_getFunctionReflection(&mut this)) }
    }

    /// Name of the entry point function
    pub fn name(&self) -> Option<&str> {
        self.function_reflection().and_then(|f| f.name())
    }
}

impl Deref for EntryPoint {
    type Target = ComponentType;

    fn deref(&self) -> &ComponentType {
        &self.inner
    }
}

impl Downcast for EntryPoint {
    fn downcast(&self) -> &ComponentType {
        &self.inner
    }
}

impl From<EntryPoint> for ComponentType {
    fn from(entry_point: EntryPoint) -> Self {
        entry_point.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use crate::{CompileTarget, OptimizationLevel};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_compute_entry_point() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        assert_eq!(module.entry_point_count(), 1);
        let entry = module.entry_point(0).unwrap();
        assert_eq!(entry.name(), Some("main"));
        assert_eq!(module.file_path(), Some("rs_compute.slang"));
        assert!(module.entry_point(1).is_err());
    }

    #[test]
    fn test_entry_points_iterator() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::LIGHTING).unwrap();
        let entries = module.entry_points();
        assert_eq!(entries.len(), 2);
        let names: Vec<String> = entries
            .map(|e| e.unwrap().name().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["vsMain".to_string(), "psMain".to_string()]);
    }

    #[test]
    fn test_find_entry_point_by_name() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::LIGHTING).unwrap();
        let entry = module.find_entry_point_by_name("psMain").unwrap();
        assert_eq!(entry.name(), Some("psMain"));

        let err = module.find_entry_point_by_name("csMain").unwrap_err();
        assert!(err.to_string().contains("entry point 'csMain' not found"), "{err}");
    }

    #[test]
    fn test_find_and_check_entry_point_stage() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::LIGHTING).unwrap();
        assert!(module.find_and_check_entry_point("vsMain", Stage::Vertex).is_ok());
        let err = module
            .find_and_check_entry_point("vsMain", Stage::Fragment)
            .unwrap_err();
        assert!(err.to_string().contains("is not a fragment shader"), "{err}");
    }

    #[test]
    fn test_compose_link_and_generate() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let entry = module.find_entry_point_by_name("main").unwrap();
        let program = session
            .create_composite_component_type(&[module.downcast(), entry.downcast()])
            .unwrap();
        let linked = program.link().unwrap();

        let code = linked.target_code(0).unwrap();
        assert_eq!(&code[..4], &0x0723_0203u32.to_le_bytes());
        assert!(linked.target_code(3).is_err());

        let entry_code = linked.entry_point_code(0, 0).unwrap();
        assert!(entry_code.len() >= 20);
        assert_eq!(linked.specialization_param_count(), 0);
    }

    #[test]
    fn test_link_with_options_reaches_codegen() {
        let session = testing::session(CompileTarget::Glsl);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let linked = module
            .link_with_options(&CompilerOptions::new().optimization(OptimizationLevel::High))
            .unwrap();
        let text = linked.target_code(0).unwrap();
        assert!(text.as_str().unwrap().contains("options 46"));
    }

    #[test]
    fn test_layout_out_of_range_target() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        assert!(module.layout(0).is_ok());
        assert!(matches!(module.layout(5), Err(Error::Slang { .. })));
    }

    #[test]
    fn test_component_reports_its_session() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        assert_eq!(module.session().unwrap().as_raw(), session.as_raw());
        let as_component: ComponentType = module.clone().into();
        assert_eq!(as_component.as_raw(), module.as_raw());
    }

    #[test]
    fn test_module_keeps_its_session_alive() {
        let (module, entry, original) = {
            let session = testing::session(CompileTarget::SpirV);
            let module = session.load_module(testing::COMPUTE).unwrap();
            let entry = module.find_entry_point_by_name("main").unwrap();
            (module, entry, session.as_raw())
        };

        // A fresh session must not reuse the one the module still holds
        let other = testing::session(CompileTarget::Hlsl);
        assert_ne!(other.as_raw(), original);
        assert_eq!(module.session().unwrap().as_raw(), original);
        assert_eq!(entry.session().unwrap().as_raw(), original);

        let layout = module.layout(0).unwrap();
        assert_eq!(layout.parameter_count(), 2);
        let code = module.link().unwrap().target_code(0).unwrap();
        assert_eq!(&code[..4], &0x0723_0203u32.to_le_bytes());
    }
}
