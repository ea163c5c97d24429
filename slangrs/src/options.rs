//! Compiler option entries for sessions, targets and linking

use crate::error::c_string;
use crate::target::slang_enum;
use crate::{FloatingPointMode, MatrixLayout, Result};
use slangshim::*;
use std::ffi::CString;
use std::ptr;

slang_enum! {
    /// Optimization level passed to the downstream compiler
    pub enum OptimizationLevel: i32, fallback Default {
        /// No optimization
        None = 0,
        /// Default optimization
        Default = 1,
        /// Aggressive optimization
        High = 2,
        /// Include optimizations that may increase code size
        Maximal = 3,
    }
}

slang_enum! {
    /// Amount of debug information to emit
    pub enum DebugInfoLevel: i32, fallback None {
        /// No debug information
        None = 0,
        /// Line numbers only
        Minimal = 1,
        /// Line numbers and variables
        Standard = 2,
        /// Everything, including unused declarations
        Maximal = 3,
    }
}

/// Capability identifier returned by `GlobalSession::find_capability`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityId(pub SlangCapabilityID);

/// A single compiler option
#[derive(Debug, Clone, PartialEq)]
pub enum CompilerOption {
    /// `-D name=value`
    MacroDefine { name: String, value: String },
    /// `-I path`
    Include(String),
    /// Default matrix storage; `MatrixLayout::Unknown` emits nothing
    MatrixLayout(MatrixLayout),
    /// `-O<level>`
    Optimization(OptimizationLevel),
    /// `-g<level>`
    DebugInformation(DebugInfoLevel),
    /// Warnings promoted to errors: `"all"` or a comma-separated list of ids
    WarningsAsErrors(String),
    /// Require a capability
    Capability(CapabilityId),
    /// Floating-point optimization mode
    FloatingPointMode(FloatingPointMode),
    /// Emit SPIR-V without going through GLSL
    EmitSpirvDirectly(bool),
}

/// Builder for a list of compiler options
///
/// # Example
/// ```
/// use slangrs::{CompilerOptions, OptimizationLevel};
///
/// let options = CompilerOptions::new()
///     .define("USE_FOG", "1")
///     .include_path("shaders/common")
///     .optimization(OptimizationLevel::High);
/// assert_eq!(options.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilerOptions {
    options: Vec<CompilerOption>,
}

impl CompilerOptions {
    /// Creates an empty option list
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pre-built option
    pub fn with(mut self, option: CompilerOption) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a preprocessor define.
    pub fn define(self, name: &str, value: &str) -> Self {
        self.with(CompilerOption::MacroDefine {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Adds an include search path.
    pub fn include_path(self, path: &str) -> Self {
        self.with(CompilerOption::Include(path.to_string()))
    }

    /// Sets the default matrix layout.
    pub fn matrix_layout(self, layout: MatrixLayout) -> Self {
        self.with(CompilerOption::MatrixLayout(layout))
    }

    /// Sets the optimization level.
    pub fn optimization(self, level: OptimizationLevel) -> Self {
        self.with(CompilerOption::Optimization(level))
    }

    /// Sets the amount of debug information.
    pub fn debug_information(self, level: DebugInfoLevel) -> Self {
        self.with(CompilerOption::DebugInformation(level))
    }

    /// Treats every warning as an error.
    pub fn warnings_as_errors(self) -> Self {
        self.with(CompilerOption::WarningsAsErrors("all".to_string()))
    }

    /// Requires a capability.
    pub fn capability(self, capability: CapabilityId) -> Self {
        self.with(CompilerOption::Capability(capability))
    }

    /// Sets the floating-point mode.
    pub fn floating_point_mode(self, mode: FloatingPointMode) -> Self {
        self.with(CompilerOption::FloatingPointMode(mode))
    }

    /// Emits SPIR-V directly.
    pub fn emit_spirv_directly(self, enable: bool) -> Self {
        self.with(CompilerOption::EmitSpirvDirectly(enable))
    }

    /// Number of options added so far
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if no options were added.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates the options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CompilerOption> {
        self.options.iter()
    }

    /// Lowers the options to Slang's entry array.
    pub(crate) fn to_entries(&self) -> Result<OptionEntries> {
        let mut raw = OptionEntries::default();
        for option in &self.options {
            match option {
                CompilerOption::MacroDefine { name, value } => {
                    let name = raw.keep(c_string("macro name", name)?);
                    let value = raw.keep(c_string("macro value", value)?);
                    raw.push_strings(COMPILER_OPTION_MACRO_DEFINE, name, value);
                }
                CompilerOption::Include(path) => {
                    let path = raw.keep(c_string("include path", path)?);
                    raw.push_strings(COMPILER_OPTION_INCLUDE, path, ptr::null());
                }
                CompilerOption::MatrixLayout(MatrixLayout::RowMajor) => {
                    raw.push_int(COMPILER_OPTION_MATRIX_LAYOUT_ROW, 1);
                }
                CompilerOption::MatrixLayout(MatrixLayout::ColumnMajor) => {
                    raw.push_int(COMPILER_OPTION_MATRIX_LAYOUT_COLUMN, 1);
                }
                CompilerOption::MatrixLayout(MatrixLayout::Unknown) => {}
                CompilerOption::Optimization(level) => raw.push_int(COMPILER_OPTION_OPTIMIZATION, level.raw()),
                CompilerOption::DebugInformation(level) => {
                    raw.push_int(COMPILER_OPTION_DEBUG_INFORMATION, level.raw())
                }
                CompilerOption::WarningsAsErrors(ids) => {
                    let ids = raw.keep(c_string("warning list", ids)?);
                    raw.push_strings(COMPILER_OPTION_WARNINGS_AS_ERRORS, ids, ptr::null());
                }
                CompilerOption::Capability(id) => raw.push_int(COMPILER_OPTION_CAPABILITY, id.0),
                CompilerOption::FloatingPointMode(mode) => {
                    raw.push_int(COMPILER_OPTION_FLOATING_POINT_MODE, mode.raw() as i32)
                }
                CompilerOption::EmitSpirvDirectly(enable) => {
                    raw.push_int(COMPILER_OPTION_EMIT_SPIRV_DIRECTLY, *enable as i32)
                }
            }
        }
        Ok(raw)
    }
}

/// Entry array plus the strings it points into
///
/// The pointers stay valid while this value lives: a `CString`'s buffer
/// does not move when the `CString` itself is moved.
#[derive(Default)]
pub(crate) struct OptionEntries {
    strings: Vec<CString>,
    entries: Vec<CompilerOptionEntry>,
}

impl OptionEntries {
    fn keep(&mut self, s: CString) -> *const std::ffi::c_char {
        let p = s.as_ptr();
        self.strings.push(s);
        p
    }

    fn push_int(&mut self, name: CompilerOptionName, value: i32) {
        self.entries.push(CompilerOptionEntry {
            name,
            value: CompilerOptionValue {
                kind: COMPILER_OPTION_VALUE_KIND_INT,
                intValue0: value,
                ..Default::default()
            },
        });
    }

    fn push_strings(
        &mut self,
        name: CompilerOptionName,
        first: *const std::ffi::c_char,
        second: *const std::ffi::c_char,
    ) {
        self.entries.push(CompilerOptionEntry {
            name,
            value: CompilerOptionValue {
                kind: COMPILER_OPTION_VALUE_KIND_STRING,
                stringValue0: first,
                stringValue1: second,
                ..Default::default()
            },
        });
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut CompilerOptionEntry {
        if self.entries.is_empty() {
            ptr::null_mut()
        } else {
            self.entries.as_mut_ptr()
        }
    }

    pub(crate) fn count(&self) -> u32 {
        self.entries.len() as u32
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[CompilerOptionEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_entries_follow_insertion_order() {
        let options = CompilerOptions::new()
            .optimization(OptimizationLevel::Maximal)
            .matrix_layout(MatrixLayout::ColumnMajor)
            .emit_spirv_directly(true);
        let raw = options.to_entries().unwrap();
        let names: Vec<_> = raw.entries().iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
                COMPILER_OPTION_OPTIMIZATION,
                COMPILER_OPTION_MATRIX_LAYOUT_COLUMN,
                COMPILER_OPTION_EMIT_SPIRV_DIRECTLY
            ]
        );
        assert_eq!(raw.entries()[0].value.intValue0, 3);
        assert_eq!(raw.count(), 3);
    }

    #[test]
    fn test_macro_strings_outlive_builder() {
        let raw = CompilerOptions::new().define("FOG", "2").to_entries().unwrap();
        let entry = raw.entries()[0];
        assert_eq!(entry.value.kind, COMPILER_OPTION_VALUE_KIND_STRING);
        let (name, value) = unsafe {
            (
                CStr::from_ptr(entry.value.stringValue0),
                CStr::from_ptr(entry.value.stringValue1),
            )
        };
        assert_eq!(name.to_str().unwrap(), "FOG");
        assert_eq!(value.to_str().unwrap(), "2");
    }

    #[test]
    fn test_unknown_matrix_layout_is_skipped() {
        let mut raw = CompilerOptions::new()
            .matrix_layout(MatrixLayout::Unknown)
            .to_entries()
            .unwrap();
        assert_eq!(raw.count(), 0);
        assert!(raw.as_mut_ptr().is_null());
    }

    #[test]
    fn test_interior_nul_fails() {
        assert!(CompilerOptions::new().include_path("a\0b").to_entries().is_err());
    }
}
