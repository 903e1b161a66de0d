use explain_ir::{DecodedOperand, DisassembledInstruction, Instruction, OpArray};
use explain_isa::DecodeShape;

use crate::error::DecodeError;
use crate::resolve::resolve_operand;
use crate::slots::SlotTable;

/// Decode the instruction at `opline` of `ops`.
///
/// The opcode's [`DecodeShape`] decides which operand positions are data
/// (resolved through [`resolve_operand`]) and which hold a control target.
/// Data operands are resolved in `first`, `second`, `result` order, which
/// fixes the dense slot numbering.
pub fn decode_instruction(
    ops: &OpArray,
    insn: &Instruction,
    opline: u32,
    slots: &mut SlotTable,
) -> Result<DisassembledInstruction, DecodeError> {
    if insn.opcode.info().is_none() {
        log::warn!("opline {opline}: unknown opcode {}", insn.opcode.raw());
    }

    let mut data = |operand| resolve_operand(ops, operand, opline, slots);

    let (first, second, result) = match insn.opcode.shape() {
        DecodeShape::General => (data(insn.first)?, data(insn.second)?, data(insn.result)?),
        DecodeShape::Jump => (Some(jump_target(ops, insn.first.value, opline)?), None, None),
        // TODO: the true-branch target of a three-way branch lives in
        // extended_value as a relative offset; it is only listed raw for now.
        DecodeShape::Branch3 => (
            data(insn.first)?,
            Some(opline_target(ops, insn.second.value, opline)?),
            data(insn.result)?,
        ),
        DecodeShape::CondJump => (
            data(insn.first)?,
            Some(jump_target(ops, insn.second.value, opline)?),
            data(insn.result)?,
        ),
        DecodeShape::RecvInit => (None, None, data(insn.result)?),
    };

    Ok(DisassembledInstruction {
        opline,
        opcode: insn.opcode,
        first,
        second,
        result,
        extended_value: (insn.extended_value != 0).then_some(insn.extended_value),
        lineno: insn.lineno,
    })
}

/// Control target stored in the op array's jump encoding.
fn jump_target(ops: &OpArray, raw: i64, opline: u32) -> Result<DecodedOperand, DecodeError> {
    let target = ops.jump_encoding.target(raw, opline as usize);
    checked_target(ops, target, raw, opline)
}

/// Control target stored as a plain opline number.
fn opline_target(ops: &OpArray, raw: i64, opline: u32) -> Result<DecodedOperand, DecodeError> {
    checked_target(ops, Some(raw), raw, opline)
}

fn checked_target(
    ops: &OpArray,
    target: Option<i64>,
    raw: i64,
    opline: u32,
) -> Result<DecodedOperand, DecodeError> {
    target
        .and_then(|t| u32::try_from(t).ok())
        .filter(|&t| (t as usize) < ops.len())
        .map(DecodedOperand::target)
        .ok_or(DecodeError::InvalidJumpTarget {
            opline,
            raw,
            len: ops.len(),
        })
}
