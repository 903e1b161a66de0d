#![allow(dead_code)]

use explain_ir::{DisassembledInstruction, Disassembly, Instruction, Literal, OpArray};
use explain_isa::{INSTRUCTION_SIZE, Opcode};

pub fn insn(opcode: Opcode, lineno: u32) -> Instruction {
    Instruction::new(opcode, lineno)
}

/// `count` no-op instructions on consecutive lines starting at 1.
pub fn nops(count: usize) -> Vec<Instruction> {
    (0..count)
        .map(|i| Instruction::new(explain_isa::op::ZEND_NOP, i as u32 + 1))
        .collect()
}

/// Relative jump operand from `from` to `to`.
pub fn rel(from: usize, to: usize) -> i64 {
    (to as i64 - from as i64) * INSTRUCTION_SIZE
}

pub fn array(opcodes: Vec<Instruction>, literals: Vec<Literal>, vars: &[&str]) -> OpArray {
    OpArray::new(opcodes)
        .with_literals(literals)
        .with_vars(vars.iter().copied())
        .with_jump_encoding(explain_isa::JumpEncoding::Relative)
}

pub fn listing(ops: &OpArray) -> Vec<DisassembledInstruction> {
    match explain_disasm::disassemble(Some(ops)).unwrap() {
        Disassembly::Listing(insns) => insns,
        Disassembly::NoBody => panic!("expected a listing"),
    }
}
