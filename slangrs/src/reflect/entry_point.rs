//! Entry point and function reflection

use super::{TypeLayout, VariableLayout, index_iter, reflection_view};
use crate::{Stage, c_str};
use slangshim::*;

reflection_view! {
    /// An entry point as laid out in a program
    EntryPointReflection(SlangReflectionEntryPoint)
}

impl<'a> EntryPointReflection<'a> {
    /// Function name of the entry point
    pub fn name(&self) -> Option<&'a str> {
        unsafe { c_str(EntryPointReflection_getName(&mut self.as_raw())) }
    }

    /// Pipeline stage
    pub fn stage(&self) -> Stage {
        Stage::from(unsafe { EntryPointReflection_getStage(&mut self.as_raw()) })
    }

    /// Number of entry point parameters (not globals)
    pub fn parameter_count(&self) -> u32 {
        unsafe { EntryPointReflection_getParameterCount(&mut self.as_raw()) }
    }

    /// Gets a parameter by index.
    pub fn parameter(&self, index: u32) -> Option<VariableLayout<'a>> {
        unsafe { VariableLayout::from_raw(EntryPointReflection_getParameterByIndex(&mut self.as_raw(), index)) }
    }

    /// Iterates the parameters.
    pub fn parameters(&self) -> EntryPointParameters<'a> {
        EntryPointParameters::new(*self, self.parameter_count())
    }

    /// Layout of all parameters viewed as one struct variable
    pub fn var_layout(&self) -> Option<VariableLayout<'a>> {
        unsafe { VariableLayout::from_raw(EntryPointReflection_getVarLayout(&mut self.as_raw())) }
    }

    /// Type layout of [`Self::var_layout`]
    pub fn type_layout(&self) -> Option<TypeLayout<'a>> {
        unsafe { TypeLayout::from_raw(EntryPointReflection_getTypeLayout(&mut self.as_raw())) }
    }

    /// Layout of the return value, if the function returns one
    pub fn result_var_layout(&self) -> Option<VariableLayout<'a>> {
        unsafe { VariableLayout::from_raw(EntryPointReflection_getResultVarLayout(&mut self.as_raw())) }
    }

    /// `[numthreads(x, y, z)]` of a compute entry point
    pub fn compute_thread_group_size(&self) -> [u64; 3] {
        let mut size: [SlangUInt; 3] = [0; 3];
        unsafe { EntryPointReflection_getComputeThreadGroupSize(&mut self.as_raw(), 3, size.as_mut_ptr()) };
        size.map(|axis| axis as u64)
    }
}

index_iter! {
    /// Iterator over an entry point's parameters
    EntryPointParameters: EntryPointReflection => VariableLayout, parameter
}

reflection_view! {
    /// A function declaration
    FunctionReflection(SlangReflectionFunction)
}

impl<'a> FunctionReflection<'a> {
    pub fn name(&self) -> Option<&'a str> {
        unsafe { c_str(FunctionReflection_getName(&mut self.as_raw())) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::ParameterCategory;
    use crate::{CompileTarget, testing};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compute_entry_point() {
        let session = testing::session(CompileTarget::SpirV);
        let module = session.load_module(testing::COMPUTE).unwrap();
        let main = module.find_entry_point_by_name("main").unwrap();
        let layout = main.layout(0).unwrap();
        let entry = layout.entry_point(0).unwrap();

        assert_eq!(entry.name(), Some("main"));
        assert_eq!(entry.stage(), Stage::Compute);
        assert_eq!(entry.compute_thread_group_size(), [8, 8, 1]);
        assert!(entry.result_var_layout().is_none());

        let names: Vec<_> = entry.parameters().map(|p| p.name().unwrap_or("?")).collect();
        assert_eq!(names, vec!["tid"]);
        let params = entry.type_layout().unwrap();
        assert_eq!(params.field_count(), 1);
        assert_eq!(params.size(ParameterCategory::Uniform), 12);
        assert!(entry.var_layout().is_some());
    }

    #[test]
    fn test_fragment_result_and_function_name() {
        let session = testing::session(CompileTarget::Hlsl);
        let module = session.load_module(testing::LIGHTING).unwrap();
        let ps = module.find_entry_point_by_name("psMain").unwrap();
        assert_eq!(ps.function_reflection().unwrap().name(), Some("psMain"));

        let layout = ps.layout(0).unwrap();
        let entry = layout.entry_point(0).unwrap();
        assert_eq!(entry.stage(), Stage::Fragment);
        assert_eq!(entry.parameter_count(), 0);
        let result = entry.result_var_layout().unwrap();
        assert_eq!(result.semantic_name(), Some("SV_Target"));
        assert_eq!(result.stage(), Stage::Fragment);
    }
}
