//! Call frames for the MiniC evaluator.

use std::collections::HashMap;

use crate::value::Value;

/// Local bindings for one function invocation. A frame is pushed when a
/// call enters its body and popped when the call completes.
#[derive(Debug, Default)]
pub struct Frame {
    locals: HashMap<String, Value>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.locals.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locals.contains_key(name)
    }

    pub fn set(&mut self, name: String, value: Value) {
        self.locals.insert(name, value);
    }
}
