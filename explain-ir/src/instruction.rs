use explain_isa::{Opcode, OperandType};
use serde::{Deserialize, Serialize};

/// One raw operand: a type tag and a value whose meaning the tag decides.
///
/// | tag          | value                                          |
/// |--------------|------------------------------------------------|
/// | `IS_UNUSED`  | ignored                                        |
/// | `IS_CV`      | slot in the op array's variable-name table     |
/// | `IS_TMP_VAR` | opaque slot token, stable within one op array  |
/// | `IS_VAR`     | opaque slot token, stable within one op array  |
/// | `IS_CONST`   | index into the op array's literal pool         |
///
/// Jump opcodes store a jump offset (or address) in the operand position
/// their decode shape designates, whatever the tag says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Operand {
    #[serde(default)]
    pub kind: OperandType,
    #[serde(default)]
    pub value: i64,
}

impl Operand {
    pub const fn new(kind: OperandType, value: i64) -> Self {
        Self { kind, value }
    }

    pub const fn unused() -> Self {
        Self::new(OperandType::UNUSED, 0)
    }

    /// Compiled variable at `slot` of the variable-name table.
    pub const fn cv(slot: u32) -> Self {
        Self::new(OperandType::CV, slot as i64)
    }

    /// Temporary slot identified by `token`.
    pub const fn tmp(token: i64) -> Self {
        Self::new(OperandType::TMP_VAR, token)
    }

    /// Working slot identified by `token`.
    pub const fn var(token: i64) -> Self {
        Self::new(OperandType::VAR, token)
    }

    /// Literal at `index` of the literal pool.
    pub const fn constant(index: u32) -> Self {
        Self::new(OperandType::CONST, index as i64)
    }

    /// Raw jump operand; the tag is irrelevant for control-target positions.
    pub const fn jump(raw: i64) -> Self {
        Self::new(OperandType::UNUSED, raw)
    }

    /// Add the result hint marking the value as never read.
    pub fn discarded(self) -> Self {
        Self::new(self.kind | OperandType::EXT_TYPE_UNUSED, self.value)
    }
}

/// A single instruction of an op array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    #[serde(default)]
    pub first: Operand,
    #[serde(default)]
    pub second: Operand,
    #[serde(default)]
    pub result: Operand,
    /// Opcode-specific auxiliary value; 0 when not applicable.
    #[serde(default)]
    pub extended_value: u32,
    /// Source line the instruction was compiled from.
    #[serde(default)]
    pub lineno: u32,
}

impl Instruction {
    /// An instruction with all operand positions unused.
    pub fn new(opcode: Opcode, lineno: u32) -> Self {
        Self {
            opcode,
            first: Operand::unused(),
            second: Operand::unused(),
            result: Operand::unused(),
            extended_value: 0,
            lineno,
        }
    }

    pub fn with_first(mut self, op: Operand) -> Self {
        self.first = op;
        self
    }

    pub fn with_second(mut self, op: Operand) -> Self {
        self.second = op;
        self
    }

    pub fn with_result(mut self, op: Operand) -> Self {
        self.result = op;
        self
    }

    pub fn with_extended_value(mut self, value: u32) -> Self {
        self.extended_value = value;
        self
    }
}
