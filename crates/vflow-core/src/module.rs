use crate::values::{SourceLocation, ValueId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// IR model of one translation unit, as exported by the external frontend.
/// Only the shape the driver queries is carried: functions, parameter
/// values, and call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub functions: IndexMap<String, FunctionModel>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: IndexMap::new(),
        }
    }

    pub fn add_function(&mut self, function: FunctionModel) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn function(&self, name: &str) -> Option<&FunctionModel> {
        self.functions.get(name)
    }

    /// Every call site in the module, paired with its enclosing function,
    /// in module order.
    pub fn call_sites(&self) -> impl Iterator<Item = (&FunctionModel, &CallSite)> {
        self.functions
            .values()
            .flat_map(|f| f.call_sites.iter().map(move |c| (f, c)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionModel {
    pub name: String,
    pub params: Vec<ValueId>,
    pub call_sites: Vec<CallSite>,
}

impl FunctionModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            call_sites: Vec::new(),
        }
    }

    pub fn add_call(&mut self, call: CallSite) {
        self.call_sites.push(call);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSite {
    /// `None` when the callee is not statically known (indirect call through
    /// a pointer the frontend could not resolve).
    pub callee: Option<String>,
    pub args: Vec<ValueId>,
    pub location: Option<SourceLocation>,
}

impl CallSite {
    pub fn new(callee: Option<String>, args: Vec<ValueId>) -> Self {
        Self {
            callee,
            args,
            location: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.callee.is_some()
    }
}
