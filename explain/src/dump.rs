//! Compiler front-end that loads pre-compiled opcode dumps.
//!
//! A dump is a YAML document describing one compilation unit:
//!
//! ```yaml
//! main:
//!   opcodes:
//!     - { opcode: ZEND_ECHO, first: { kind: IS_CONST, value: 0 }, lineno: 1 }
//!     - { opcode: ZEND_RETURN, first: { kind: IS_CONST, value: 1 }, lineno: 1 }
//!   literals: ["hi", 1]
//! functions:
//!   greet:
//!     opcodes: [...]
//! classes:
//!   Shape:
//!     methods:
//!       area: ~          # abstract, no body
//!       name: { opcodes: [...] }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use explain_ir::OpArray;
use serde::Deserialize;

use crate::compiler::{Compiler, SourceText};
use crate::error::CompileError;
use crate::symbols::{Class, Function, SymbolTable};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DumpUnit {
    main: OpArray,
    #[serde(default)]
    functions: BTreeMap<String, OpArray>,
    #[serde(default)]
    classes: BTreeMap<String, DumpClass>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DumpClass {
    #[serde(default)]
    methods: BTreeMap<String, Option<OpArray>>,
}

/// Reads YAML opcode dumps as if they were source code.
#[derive(Clone, Copy, Debug, Default)]
pub struct DumpCompiler;

impl DumpCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl Compiler for DumpCompiler {
    fn compile(
        &self,
        source: &SourceText,
        symbols: &mut SymbolTable,
    ) -> Result<OpArray, CompileError> {
        let unit: DumpUnit =
            serde_yaml::from_str(&source.text).map_err(|e| CompileError::Syntax {
                origin: source.origin.clone(),
                message: e.to_string(),
            })?;

        require_body("main", &unit.main)?;
        for (name, ops) in &unit.functions {
            require_body(name, ops)?;
        }
        for (class, dump) in &unit.classes {
            for (method, ops) in &dump.methods {
                if let Some(ops) = ops {
                    require_body(&format!("{class}::{method}"), ops)?;
                }
            }
        }

        // All names are checked before anything is declared.
        check_unique("function", unit.functions.keys(), |n| symbols.has_function(n))?;
        check_unique("class", unit.classes.keys(), |n| symbols.has_class(n))?;

        let mut classes = Vec::with_capacity(unit.classes.len());
        for (name, dump) in unit.classes {
            let mut class = Class::new(name);
            for (method, ops) in dump.methods {
                class.add_method(Function::new(method, ops))?;
            }
            classes.push(class);
        }

        for (name, ops) in unit.functions {
            symbols.declare_function(Function::new(name, Some(ops)))?;
        }
        for class in classes {
            symbols.declare_class(class)?;
        }

        log::debug!("loaded opcode dump from {}", source.origin);
        Ok(unit.main)
    }
}

fn require_body(name: &str, ops: &OpArray) -> Result<(), CompileError> {
    if ops.is_empty() {
        return Err(CompileError::EmptyBody(name.to_string()));
    }
    Ok(())
}

fn check_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a String>,
    declared: impl Fn(&str) -> bool,
) -> Result<(), CompileError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if declared(name) || !seen.insert(name.to_ascii_lowercase()) {
            return Err(CompileError::Redeclared {
                kind,
                name: name.clone(),
            });
        }
    }
    Ok(())
}
