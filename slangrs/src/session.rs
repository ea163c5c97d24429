//! Sessions and their builders

use crate::component::{ComponentType, Module};
use crate::error::{c_string, check};
use crate::options::OptionEntries;
use crate::{
    Blob, CompileTarget, CompilerOptions, Error, FloatingPointMode, GlobalSession, LineDirectiveMode, MatrixLayout,
    Result, SlangResult, TargetFlags,
};
use slangshim::*;
use std::ffi::{CString, c_char};
use std::path::Path;
use std::ptr;

/// Builder for one code-generation target of a session
///
/// # Example
/// ```
/// use slangrs::{CompileTarget, TargetDescBuilder, TargetFlags};
///
/// let target = TargetDescBuilder::new(CompileTarget::SpirV)
///     .profile("spirv_1_5")
///     .flags(TargetFlags::GENERATE_SPIRV_DIRECTLY);
/// assert_eq!(target.format(), CompileTarget::SpirV);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDescBuilder {
    format: CompileTarget,
    profile: Option<String>,
    flags: TargetFlags,
    floating_point_mode: FloatingPointMode,
    line_directive_mode: LineDirectiveMode,
    force_glsl_scalar_layout: bool,
    options: CompilerOptions,
}

impl TargetDescBuilder {
    /// Creates a target for `format` with Slang's defaults.
    pub fn new(format: CompileTarget) -> Self {
        TargetDescBuilder {
            format,
            profile: None,
            flags: TargetFlags::default(),
            floating_point_mode: FloatingPointMode::Default,
            line_directive_mode: LineDirectiveMode::Default,
            force_glsl_scalar_layout: false,
            options: CompilerOptions::new(),
        }
    }

    /// Sets the profile by name; resolved when the session is created.
    pub fn profile(mut self, name: &str) -> Self {
        self.profile = Some(name.to_string());
        self
    }

    /// Sets the target flags (replaces the defaults).
    pub fn flags(mut self, flags: TargetFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the floating-point mode.
    pub fn floating_point_mode(mut self, mode: FloatingPointMode) -> Self {
        self.floating_point_mode = mode;
        self
    }

    /// Sets how `#line` directives are emitted.
    pub fn line_directive_mode(mut self, mode: LineDirectiveMode) -> Self {
        self.line_directive_mode = mode;
        self
    }

    /// Uses scalar layout for GLSL buffers.
    pub fn force_glsl_scalar_layout(mut self, enable: bool) -> Self {
        self.force_glsl_scalar_layout = enable;
        self
    }

    /// Sets target-specific compiler options.
    pub fn options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// The output format
    pub fn format(&self) -> CompileTarget {
        self.format
    }
}

/// Builder for [`Session`]
///
/// Strings are kept as Rust strings until [`GlobalSession::create_session`]
/// converts them; the converted copies live until that call returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionBuilder {
    targets: Vec<TargetDescBuilder>,
    search_paths: Vec<String>,
    macros: Vec<(String, String)>,
    matrix_layout: Option<MatrixLayout>,
    options: CompilerOptions,
}

impl SessionBuilder {
    /// Creates a builder with no targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a code-generation target. Target indices follow call order.
    pub fn target(mut self, target: TargetDescBuilder) -> Self {
        self.targets.push(target);
        self
    }

    /// Adds a module search path.
    pub fn search_path(mut self, path: &str) -> Self {
        self.search_paths.push(path.to_string());
        self
    }

    /// Adds a preprocessor macro visible to every module.
    pub fn define(mut self, name: &str, value: &str) -> Self {
        self.macros.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the default matrix layout (row-major unless set).
    pub fn matrix_layout(mut self, layout: MatrixLayout) -> Self {
        self.matrix_layout = Some(layout);
        self
    }

    /// Sets session-wide compiler options.
    pub fn options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of targets added so far
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub(crate) fn lower(&self, global: &GlobalSession) -> Result<LoweredSession> {
        let mut target_options = Vec::with_capacity(self.targets.len());
        let mut targets = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let profile = match &target.profile {
                Some(name) => global
                    .find_profile(name)
                    .ok_or_else(|| Error::InvalidParameter(format!("unknown profile: {name}")))?
                    .0,
                None => SLANG_UNKNOWN_PROFILE,
            };
            let mut options = target.options.to_entries()?;
            targets.push(TargetDesc {
                format: target.format.raw(),
                profile,
                flags: target.flags.bits(),
                floatingPointMode: target.floating_point_mode.raw(),
                lineDirectiveMode: target.line_directive_mode.raw(),
                forceGLSLScalarBufferLayout: target.force_glsl_scalar_layout,
                compilerOptionEntries: options.as_mut_ptr(),
                compilerOptionEntryCount: options.count(),
                ..Default::default()
            });
            target_options.push(options);
        }

        let search_paths = self
            .search_paths
            .iter()
            .map(|p| c_string("search path", p))
            .collect::<Result<Vec<_>>>()?;
        let search_path_ptrs: Vec<*const c_char> = search_paths.iter().map(|p| p.as_ptr()).collect();

        let macro_strings = self
            .macros
            .iter()
            .map(|(name, value)| Ok((c_string("macro name", name)?, c_string("macro value", value)?)))
            .collect::<Result<Vec<_>>>()?;
        let macros: Vec<PreprocessorMacroDesc> = macro_strings
            .iter()
            .map(|(name, value)| PreprocessorMacroDesc {
                name: name.as_ptr(),
                value: value.as_ptr(),
            })
            .collect();

        let mut options = self.options.to_entries()?;
        let mut desc = SessionDesc {
            targets: targets.as_ptr(),
            targetCount: targets.len() as SlangInt,
            searchPaths: search_path_ptrs.as_ptr(),
            searchPathCount: search_path_ptrs.len() as SlangInt,
            preprocessorMacros: macros.as_ptr(),
            preprocessorMacroCount: macros.len() as SlangInt,
            compilerOptionEntries: options.as_mut_ptr(),
            compilerOptionEntryCount: options.count(),
            ..Default::default()
        };
        if let Some(layout) = self.matrix_layout {
            desc.defaultMatrixLayoutMode = layout.raw();
        }

        Ok(LoweredSession {
            desc,
            _targets: targets,
            _target_options: target_options,
            _search_paths: (search_paths, search_path_ptrs),
            _macros: (macro_strings, macros),
            _options: options,
        })
    }
}

/// A `SessionDesc` together with everything it points into
pub(crate) struct LoweredSession {
    desc: SessionDesc,
    _targets: Vec<TargetDesc>,
    _target_options: Vec<OptionEntries>,
    _search_paths: (Vec<CString>, Vec<*const c_char>),
    _macros: (Vec<(CString, CString)>, Vec<PreprocessorMacroDesc>),
    _options: OptionEntries,
}

impl LoweredSession {
    pub(crate) fn as_ptr(&self) -> *const SessionDesc {
        &self.desc
    }
}

/// RAII wrapper for ISession
///
/// Loads modules against a fixed set of targets. Modules stay owned by the
/// session; the [`Module`] handles returned here hold an extra reference.
pub struct Session {
    ptr: *mut ISession,
}

impl Session {
    /// Takes over an owned reference.
    pub(crate) unsafe fn from_raw(ptr: *mut ISession) -> Option<Self> {
        if ptr.is_null() { None } else { Some(Session { ptr }) }
    }

    /// Wraps a borrowed reference, adding one of our own.
    pub(crate) unsafe fn from_borrowed(mut ptr: *mut ISession) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        unsafe { Session_addRef(&mut ptr) };
        Some(Session { ptr })
    }

    /// The global session this session was created from
    pub fn global_session(&self) -> Result<GlobalSession> {
        unsafe { GlobalSession::from_borrowed(Session_getGlobalSession(&mut self.as_raw())) }
            .ok_or(Error::NullHandle("Session_getGlobalSession"))
    }

    /// Loads a module by name through the session's search paths.
    ///
    /// Loading the same name twice returns the same module.
    pub fn load_module(&self, name: &str) -> Result<Module> {
        let name_c = c_string("module name", name)?;
        let mut diagnostics = ptr::null_mut();
        let module = unsafe { Session_loadModule(&mut self.as_raw(), name_c.as_ptr(), &mut diagnostics) };
        unsafe { self.finish_load(module, diagnostics) }
    }

    /// Loads a module from source text.
    ///
    /// `path` is used in diagnostics and for resolving relative imports.
    pub fn load_module_from_source(&self, name: &str, path: &str, source: &str) -> Result<Module> {
        let name_c = c_string("module name", name)?;
        let path_c = c_string("module path", path)?;
        let source_c = c_string("module source", source)?;
        let mut diagnostics = ptr::null_mut();
        let module = unsafe {
            Session_loadModuleFromSourceString(
                &mut self.as_raw(),
                name_c.as_ptr(),
                path_c.as_ptr(),
                source_c.as_ptr(),
                &mut diagnostics,
            )
        };
        unsafe { self.finish_load(module, diagnostics) }
    }

    /// Reads a `.slang` file and loads it, naming the module after the
    /// file stem.
    pub fn load_module_from_file(&self, path: &Path) -> Result<Module> {
        let source = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::InvalidParameter(format!("no module name in {}", path.display())))?;
        log::debug!("Loading module {name} from {}", path.display());
        self.load_module_from_source(name, &path.to_string_lossy(), &source)
    }

    unsafe fn finish_load(&self, module: *mut IModule, diagnostics: *mut ISlangBlob) -> Result<Module> {
        let diagnostics = unsafe { Blob::from_raw(diagnostics) };
        match unsafe { Module::from_borrowed(module) } {
            Some(module) => {
                check(SLANG_OK, diagnostics)?;
                Ok(module)
            }
            None => Err(Error::Slang {
                result: SlangResult::FAIL,
                message: diagnostics.map(|d| d.to_string_lossy()).unwrap_or_default(),
            }),
        }
    }

    /// Combines modules, entry points and other component types into one.
    pub fn create_composite_component_type(&self, components: &[&ComponentType]) -> Result<ComponentType> {
        let raw: Vec<*mut IComponentType> = components.iter().map(|c| c.as_raw()).collect();
        let mut out = ptr::null_mut();
        let mut diagnostics = ptr::null_mut();
        let result = unsafe {
            Session_createCompositeComponentType(
                &mut self.as_raw(),
                raw.as_ptr(),
                raw.len() as SlangInt,
                &mut out,
                &mut diagnostics,
            )
        };
        check(result, unsafe { Blob::from_raw(diagnostics) })?;
        unsafe { ComponentType::from_raw(out) }.ok_or(Error::NullHandle("Session_createCompositeComponentType"))
    }

    /// Number of modules loaded so far
    pub fn loaded_module_count(&self) -> usize {
        unsafe { Session_getLoadedModuleCount(&mut self.as_raw()) }.max(0) as usize
    }

    /// Iterates the modules loaded so far, in load order.
    pub fn loaded_modules(&self) -> LoadedModules<'_> {
        LoadedModules {
            session: self,
            index: 0,
            count: self.loaded_module_count(),
        }
    }

    pub(crate) fn as_raw(&self) -> *mut ISession {
        self.ptr
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        unsafe { Session_addRef(&mut self.as_raw()) };
        Session { ptr: self.ptr }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        unsafe {
            Session_release(&mut self.ptr);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("ptr", &self.ptr).finish()
    }
}

// Same threading rules as the global session
unsafe impl Send for Session {}

/// Iterator over a session's loaded modules
pub struct LoadedModules<'a> {
    session: &'a Session,
    index: usize,
    count: usize,
}

impl Iterator for LoadedModules<'_> {
    type Item = Module;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let index = self.index;
        self.index += 1;
        unsafe { Module::from_borrowed(Session_getLoadedModule(&mut self.session.as_raw(), index as SlangInt)) }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LoadedModules<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_profile_is_rejected() {
        let global = testing::global();
        let builder = SessionBuilder::new().target(TargetDescBuilder::new(CompileTarget::SpirV).profile("sm_9_9"));
        let err = global.create_session(&builder).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(ref m) if m.contains("sm_9_9")));
    }

    #[test]
    fn test_session_with_every_setting() {
        let global = testing::global();
        let builder = SessionBuilder::new()
            .target(TargetDescBuilder::new(CompileTarget::SpirV).profile("spirv_1_5"))
            .target(
                TargetDescBuilder::new(CompileTarget::Hlsl)
                    .profile("sm_6_5")
                    .line_directive_mode(LineDirectiveMode::None),
            )
            .search_path("shaders")
            .define("QUALITY", "2")
            .matrix_layout(MatrixLayout::ColumnMajor)
            .options(CompilerOptions::new().warnings_as_errors());
        assert_eq!(builder.target_count(), 2);
        let session = global.create_session(&builder).unwrap();
        let back = session.global_session().unwrap();
        assert_eq!(back.as_raw(), global.as_raw());
    }

    #[test]
    fn test_loaded_modules_are_listed_once() {
        let session = testing::session(CompileTarget::SpirV);
        let compute = session.load_module(testing::COMPUTE).unwrap();
        session.load_module(testing::COMPUTE).unwrap();
        session.load_module(testing::LIGHTING).unwrap();

        let names: Vec<String> = session.loaded_modules().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec![testing::COMPUTE.to_string(), testing::LIGHTING.to_string()]);
        assert_eq!(session.loaded_modules().len(), 2);
        assert_eq!(compute.name(), testing::COMPUTE);
    }

    #[test]
    fn test_missing_module_reports_diagnostics() {
        let session = testing::session(CompileTarget::SpirV);
        let err = session.load_module("rs_missing").unwrap_err();
        match err {
            Error::Slang { result, message } => {
                assert_eq!(result, SlangResult::FAIL);
                assert!(message.contains("cannot open file 'rs_missing.slang'"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_source_uses_module_name() {
        let session = testing::session(CompileTarget::Glsl);
        let module = session
            .load_module_from_source(testing::LIGHTING, "lighting.slang", "// source")
            .unwrap();
        assert_eq!(module.name(), testing::LIGHTING);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let session = testing::session(CompileTarget::SpirV);
        let err = session
            .load_module_from_file(Path::new("/nonexistent/dir/shader.slang"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_nul_in_module_name() {
        let session = testing::session(CompileTarget::SpirV);
        assert!(matches!(session.load_module("a\0b"), Err(Error::InvalidParameter(_))));
    }
}
