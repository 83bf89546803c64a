//! Combined `Module` + `ParameterInfo` trait for boxed modules.
//!
//! [`ModuleWithParams`] gives a `Box<dyn ...>` access to both the tick and
//! the knob introspection through a single vtable. A blanket impl covers
//! every type that implements both traits, which is what the registry's
//! factories hand out.

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::format;

use crate::module::Module;
use crate::param_info::{ParamDescriptor, ParameterInfo};

/// Parameter access through a boxed module.
pub trait ModuleWithParams: Module {
    /// Get the parameter count.
    fn module_param_count(&self) -> usize;

    /// Get parameter info by index.
    fn module_param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Get parameter value by index.
    fn module_get_param(&self, index: usize) -> f32;

    /// Set parameter value by index.
    fn module_set_param(&mut self, index: usize, value: f32);

    /// Find a parameter by name, short name or string id.
    fn module_find_param(&self, name: &str) -> Option<usize>;

    /// Format a parameter value with its unit suffix.
    ///
    /// Returns `None` if the index is out of range.
    fn module_format_value(&self, index: usize, value: f32) -> Option<String>;
}

impl<T: Module + ParameterInfo> ModuleWithParams for T {
    fn module_param_count(&self) -> usize {
        self.param_count()
    }

    fn module_param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.param_info(index)
    }

    fn module_get_param(&self, index: usize) -> f32 {
        self.get_param(index)
    }

    fn module_set_param(&mut self, index: usize, value: f32) {
        self.set_param(index, value)
    }

    fn module_find_param(&self, name: &str) -> Option<usize> {
        self.find_param_by_name(name)
    }

    fn module_format_value(&self, index: usize, value: f32) -> Option<String> {
        self.param_info(index).map(|desc| {
            if desc.is_stepped() {
                format!("{}{}", value as i32, desc.unit.suffix())
            } else {
                format!("{:.1}{}", value, desc.unit.suffix())
            }
        })
    }
}
