use explain_isa::JumpEncoding;
use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;
use crate::literal::Literal;

/// A compiled routine body: instructions plus the tables their operands
/// index into.
///
/// Produced by a compiler front-end and only read by the disassembler.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpArray {
    pub opcodes: Vec<Instruction>,
    /// Literal pool, indexed by `IS_CONST` operands.
    #[serde(default)]
    pub literals: Vec<Literal>,
    /// Compiled-variable names, indexed by `IS_CV` operands.
    #[serde(default)]
    pub vars: Vec<String>,
    /// How jump operands in `opcodes` encode their targets.
    #[serde(default)]
    pub jump_encoding: JumpEncoding,
}

impl OpArray {
    pub fn new(opcodes: Vec<Instruction>) -> Self {
        Self {
            opcodes,
            ..Self::default()
        }
    }

    pub fn with_literals(mut self, literals: Vec<Literal>) -> Self {
        self.literals = literals;
        self
    }

    pub fn with_vars<S: Into<String>>(mut self, vars: impl IntoIterator<Item = S>) -> Self {
        self.vars = vars.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_jump_encoding(mut self, encoding: JumpEncoding) -> Self {
        self.jump_encoding = encoding;
        self
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    /// Name of the compiled variable at `slot`.
    pub fn var_name(&self, slot: i64) -> Option<&str> {
        usize::try_from(slot)
            .ok()
            .and_then(|i| self.vars.get(i))
            .map(String::as_str)
    }

    /// Literal at `index` of the pool.
    pub fn literal(&self, index: i64) -> Option<&Literal> {
        usize::try_from(index).ok().and_then(|i| self.literals.get(i))
    }
}
