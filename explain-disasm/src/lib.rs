//! Opcode-array disassembler.
//!
//! Walks an [`OpArray`] in index order and describes every instruction:
//! opcode, operands with their resolved values, absolute jump targets and
//! source lines. Temporary and working slots are renumbered densely in the
//! order they are first seen.

pub mod decode;
pub mod error;
pub mod resolve;
pub mod slots;

pub use decode::decode_instruction;
pub use error::DecodeError;
pub use resolve::resolve_operand;
pub use slots::SlotTable;

use explain_ir::{DisassembledInstruction, Disassembly, OpArray};

/// Disassemble a routine body.
///
/// `None` (a routine without a body, such as an abstract method) yields
/// [`Disassembly::NoBody`]; it is not an error.
pub fn disassemble(ops: Option<&OpArray>) -> Result<Disassembly, DecodeError> {
    match ops {
        Some(ops) => disassemble_op_array(ops).map(Disassembly::Listing),
        None => Ok(Disassembly::NoBody),
    }
}

/// Disassemble every instruction of `ops`, in index order.
///
/// Each call numbers slots with its own [`SlotTable`], so listings of
/// different op arrays never share slot ids.
pub fn disassemble_op_array(ops: &OpArray) -> Result<Vec<DisassembledInstruction>, DecodeError> {
    if ops.len() > u32::MAX as usize {
        return Err(DecodeError::TooManyInstructions(ops.len()));
    }

    let mut slots = SlotTable::new();
    let mut listing = Vec::with_capacity(ops.len());
    for (index, insn) in ops.opcodes.iter().enumerate() {
        listing.push(decode_instruction(ops, insn, index as u32, &mut slots)?);
    }

    log::debug!(
        "disassembled {} oplines ({} slots, {} literals)",
        listing.len(),
        slots.len(),
        ops.literals.len()
    );
    Ok(listing)
}
