//! Compile-and-disassemble requests.
//!
//! [`explain`] takes a file path or inline code, hands it to a
//! [`Compiler`], and returns the disassembly of the compiled unit. With
//! [`ExplainOptions::new_symbols`] set it also disassembles every function
//! and class method the unit declared.

pub mod compiler;
pub mod dump;
pub mod error;
pub mod mode;
pub mod symbols;

pub use compiler::{Compiler, SourceText};
pub use dump::DumpCompiler;
pub use error::{CompileError, Error, Result};
pub use mode::{CompileMode, Source};
pub use symbols::{Class, Function, SymbolSnapshot, SymbolTable};

use std::collections::BTreeMap;

use explain_ir::Disassembly;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExplainOptions {
    /// Also disassemble functions and classes declared by the request.
    pub new_symbols: bool,
}

/// Disassembly of one request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Explanation {
    /// The compiled unit's top-level code.
    pub main: Disassembly,
    /// Functions declared by the unit, keyed by declared name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub functions: BTreeMap<String, Disassembly>,
    /// Class methods declared by the unit, keyed by class then method.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub classes: BTreeMap<String, BTreeMap<String, Disassembly>>,
}

/// Compile `code` and disassemble the result.
///
/// `mode` must be exactly [`CompileMode::FILE`] or [`CompileMode::STRING`];
/// use [`CompileMode::from_bits_retain`] to pass raw caller bits.
pub fn explain(
    code: &str,
    mode: CompileMode,
    compiler: &dyn Compiler,
    symbols: &mut SymbolTable,
    options: ExplainOptions,
) -> Result<Explanation> {
    let source = Source::from_mode(code, mode.bits())?;
    let text = load_source(&source)?;

    let snapshot = symbols.snapshot();
    let main = match compiler.compile(&text, symbols) {
        Ok(main) => main,
        Err(err) => {
            drop(snapshot);
            log::warn!("explain was unable to compile code: {err}");
            return Err(err.into());
        }
    };

    let main = explain_disasm::disassemble(Some(&main)).map_err(|source| Error::Decode {
        routine: "main".to_string(),
        source,
    })?;

    let mut explanation = Explanation {
        main,
        functions: BTreeMap::new(),
        classes: BTreeMap::new(),
    };
    if options.new_symbols {
        let (functions, classes) = disassemble_new_symbols(symbols, &snapshot)?;
        explanation.functions = functions;
        explanation.classes = classes;
    }
    Ok(explanation)
}

/// Disassemble every function and class method declared since `before`.
#[allow(clippy::type_complexity)]
pub fn disassemble_new_symbols(
    symbols: &SymbolTable,
    before: &SymbolSnapshot,
) -> Result<(
    BTreeMap<String, Disassembly>,
    BTreeMap<String, BTreeMap<String, Disassembly>>,
)> {
    let mut functions = BTreeMap::new();
    for function in symbols.functions_since(before) {
        let listing = disassemble_routine(&function.name, function)?;
        functions.insert(function.name.clone(), listing);
    }

    let mut classes = BTreeMap::new();
    for class in symbols.classes_since(before) {
        let mut methods = BTreeMap::new();
        for method in class.methods() {
            let routine = format!("{}::{}", class.name, method.name);
            methods.insert(method.name.clone(), disassemble_routine(&routine, method)?);
        }
        classes.insert(class.name.clone(), methods);
    }

    log::debug!(
        "disassembled {} new functions and {} new classes",
        functions.len(),
        classes.len()
    );
    Ok((functions, classes))
}

fn disassemble_routine(routine: &str, function: &Function) -> Result<Disassembly> {
    explain_disasm::disassemble(function.op_array.as_ref()).map_err(|source| Error::Decode {
        routine: routine.to_string(),
        source,
    })
}

fn load_source(source: &Source) -> Result<SourceText> {
    match source {
        Source::Inline(text) => Ok(SourceText::inline(text.clone())),
        Source::File(path) => {
            let text = std::fs::read_to_string(path).map_err(|err| {
                log::warn!("explain could not open {}: {err}", path.display());
                Error::SourceUnavailable {
                    path: path.clone(),
                    source: err,
                }
            })?;
            Ok(SourceText {
                origin: path.display().to_string(),
                text,
            })
        }
    }
}
