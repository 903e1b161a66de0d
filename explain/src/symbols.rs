//! Function and class tables of the host, and snapshots of their names.
//!
//! Names are matched ASCII case-insensitively, as the engine does; the
//! declared spelling is kept for display.

use std::collections::{BTreeMap, BTreeSet};

use explain_ir::OpArray;

use crate::error::CompileError;

/// A user-defined routine. `op_array` is `None` for abstract methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub op_array: Option<OpArray>,
}

impl Function {
    pub fn new(name: impl Into<String>, op_array: Option<OpArray>) -> Self {
        Self {
            name: name.into(),
            op_array,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    methods: BTreeMap<String, Function>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: BTreeMap::new(),
        }
    }

    /// Add a method; a second method with the same name is rejected.
    pub fn add_method(&mut self, method: Function) -> Result<(), CompileError> {
        let key = method.name.to_ascii_lowercase();
        if self.methods.contains_key(&key) {
            return Err(CompileError::Redeclared {
                kind: "method",
                name: format!("{}::{}", self.name, method.name),
            });
        }
        self.methods.insert(key, method);
        Ok(())
    }

    pub fn method(&self, name: &str) -> Option<&Function> {
        self.methods.get(&name.to_ascii_lowercase())
    }

    pub fn methods(&self) -> impl Iterator<Item = &Function> {
        self.methods.values()
    }
}

/// The names present in a [`SymbolTable`] at some point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSnapshot {
    functions: BTreeSet<String>,
    classes: BTreeSet<String>,
}

impl SymbolSnapshot {
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains(&name.to_ascii_lowercase())
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(&name.to_ascii_lowercase())
    }
}

/// Host function and class tables.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    functions: BTreeMap<String, Function>,
    classes: BTreeMap<String, Class>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_ascii_lowercase())
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(&name.to_ascii_lowercase())
    }

    pub fn declare_function(&mut self, function: Function) -> Result<(), CompileError> {
        let key = function.name.to_ascii_lowercase();
        if self.functions.contains_key(&key) {
            return Err(CompileError::Redeclared {
                kind: "function",
                name: function.name,
            });
        }
        self.functions.insert(key, function);
        Ok(())
    }

    pub fn declare_class(&mut self, class: Class) -> Result<(), CompileError> {
        let key = class.name.to_ascii_lowercase();
        if self.classes.contains_key(&key) {
            return Err(CompileError::Redeclared {
                kind: "class",
                name: class.name,
            });
        }
        self.classes.insert(key, class);
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(&name.to_ascii_lowercase())
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.get(&name.to_ascii_lowercase())
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    pub fn snapshot(&self) -> SymbolSnapshot {
        SymbolSnapshot {
            functions: self.functions.keys().cloned().collect(),
            classes: self.classes.keys().cloned().collect(),
        }
    }

    /// Functions declared after `before` was taken.
    pub fn functions_since<'a>(
        &'a self,
        before: &'a SymbolSnapshot,
    ) -> impl Iterator<Item = &'a Function> + 'a {
        self.functions
            .iter()
            .filter(|(key, _)| !before.functions.contains(*key))
            .map(|(_, f)| f)
    }

    /// Classes declared after `before` was taken.
    pub fn classes_since<'a>(
        &'a self,
        before: &'a SymbolSnapshot,
    ) -> impl Iterator<Item = &'a Class> + 'a {
        self.classes
            .iter()
            .filter(|(key, _)| !before.classes.contains(*key))
            .map(|(_, c)| c)
    }
}
