//! Opcode-array data model shared by the disassembler and its front-ends.
//!
//! Input side: [`OpArray`] holding [`Instruction`]s, the literal pool and the
//! compiled-variable names. Output side: [`Disassembly`] holding one
//! [`DisassembledInstruction`] per input instruction.

pub mod disassembly;
pub mod instruction;
pub mod literal;
pub mod op_array;

pub use disassembly::{DecodedOperand, DisassembledInstruction, Disassembly, Value};
pub use instruction::{Instruction, Operand};
pub use literal::Literal;
pub use op_array::OpArray;
