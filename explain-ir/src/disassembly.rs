use explain_isa::{Opcode, OperandType, UNKNOWN};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::literal::Literal;

/// Resolved value of a decoded operand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Compiled-variable name.
    Name(String),
    /// Dense id of a temporary or working slot within one disassembly pass.
    Slot(u32),
    /// Copy of a literal-pool entry.
    Literal(Literal),
    /// Absolute index of a jump target instruction.
    Target(u32),
}

/// An operand position that is present in the disassembly.
///
/// `value` is `None` only when `kind` is a tag the disassembler does not
/// know how to resolve; the kind is still reported.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedOperand {
    pub kind: OperandType,
    pub value: Option<Value>,
}

impl DecodedOperand {
    pub fn new(kind: OperandType, value: Value) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }

    /// Control-target operand pointing at instruction `target`.
    pub fn target(target: u32) -> Self {
        Self::new(OperandType::OPLINE, Value::Target(target))
    }

    /// Jump target, if this is a control-target operand.
    pub fn as_target(&self) -> Option<u32> {
        match self.value {
            Some(Value::Target(t)) => Some(t),
            _ => None,
        }
    }

    /// Dense slot id, if this operand names a temporary or working slot.
    pub fn as_slot(&self) -> Option<u32> {
        match self.value {
            Some(Value::Slot(id)) => Some(id),
            _ => None,
        }
    }
}

/// One disassembled instruction.
///
/// Serializes as a flat map:
/// `{opline, opcode, first_type, first, second_type, second, result_type,
/// result, extended_value, lineno}` where absent operands and a zero
/// extended value are left out. An opcode or operand type missing from the
/// tables is named `unknown` and its raw value follows under `opcode_id` or
/// `<position>_type_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct DisassembledInstruction {
    /// Index of the instruction in its op array.
    pub opline: u32,
    pub opcode: Opcode,
    pub first: Option<DecodedOperand>,
    pub second: Option<DecodedOperand>,
    pub result: Option<DecodedOperand>,
    /// Auxiliary value; only present when nonzero.
    pub extended_value: Option<u32>,
    pub lineno: u32,
}

impl DisassembledInstruction {
    /// Operand positions that are present, with their field names.
    pub fn operands(&self) -> impl Iterator<Item = (&'static str, &DecodedOperand)> {
        [
            ("first", self.first.as_ref()),
            ("second", self.second.as_ref()),
            ("result", self.result.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, op)| op.map(|op| (name, op)))
    }

    /// Control target of a jump instruction.
    pub fn jump_target(&self) -> Option<u32> {
        self.operands().find_map(|(_, op)| op.as_target())
    }
}

impl Serialize for DisassembledInstruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("opline", &self.opline)?;
        map.serialize_entry("opcode", &self.opcode)?;
        if self.opcode.info().is_none() {
            map.serialize_entry("opcode_id", &self.opcode.raw())?;
        }
        for (type_key, id_key, value_key, op) in [
            ("first_type", "first_type_id", "first", &self.first),
            ("second_type", "second_type_id", "second", &self.second),
            ("result_type", "result_type_id", "result", &self.result),
        ] {
            let Some(op) = op else { continue };
            map.serialize_entry(type_key, &op.kind)?;
            if op.kind.name() == UNKNOWN {
                map.serialize_entry(id_key, &op.kind.bits())?;
            }
            if let Some(value) = &op.value {
                map.serialize_entry(value_key, value)?;
            }
        }
        if let Some(ext) = self.extended_value {
            map.serialize_entry("extended_value", &ext)?;
        }
        map.serialize_entry("lineno", &self.lineno)?;
        map.end()
    }
}

/// Result of disassembling one routine.
#[derive(Debug, Clone, PartialEq)]
pub enum Disassembly {
    /// The routine has no body (abstract or interface method). Serializes as
    /// `null`.
    NoBody,
    /// One entry per instruction, in op array order.
    Listing(Vec<DisassembledInstruction>),
}

impl Disassembly {
    pub fn instructions(&self) -> Option<&[DisassembledInstruction]> {
        match self {
            Disassembly::NoBody => None,
            Disassembly::Listing(insns) => Some(insns),
        }
    }

    pub fn is_no_body(&self) -> bool {
        matches!(self, Disassembly::NoBody)
    }
}

impl Serialize for Disassembly {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Disassembly::NoBody => serializer.serialize_none(),
            Disassembly::Listing(insns) => insns.serialize(serializer),
        }
    }
}
