use thiserror::Error;

/// Errors from [`disassemble`](crate::disassemble).
///
/// Each variant is a broken op-array invariant; the pass stops at the first
/// one and produces no partial listing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A compiled-variable operand names a slot past the variable table.
    #[error("opline {opline}: variable slot {slot} out of range ({len} variables)")]
    VarOutOfRange { opline: u32, slot: i64, len: usize },

    /// A constant operand indexes past the literal pool.
    #[error("opline {opline}: literal {index} out of range ({len} literals)")]
    LiteralOutOfRange { opline: u32, index: i64, len: usize },

    /// A jump does not land on an instruction of the same op array.
    #[error("opline {opline}: jump operand {raw} does not resolve to an opline in 0..{len}")]
    InvalidJumpTarget { opline: u32, raw: i64, len: usize },

    /// Too many instructions to number them with `u32` oplines.
    #[error("instruction count {0} exceeds opline capacity")]
    TooManyInstructions(usize),
}
