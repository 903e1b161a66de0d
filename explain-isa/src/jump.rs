use serde::{Deserialize, Serialize};

/// Size in bytes of one encoded instruction on a 64-bit engine.
///
/// Jump operands are byte distances (or byte addresses), so they are divided
/// by this to get instruction indices.
pub const INSTRUCTION_SIZE: i64 = 32;

/// How a jump operand encodes its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JumpEncoding {
    /// Byte offset relative to the jumping instruction.
    Relative,
    /// Absolute byte address; `base_address` is the address of instruction 0.
    Absolute { base_address: u64 },
}

impl JumpEncoding {
    /// The encoding used by this build's engine, selected by the
    /// `abs-jmp-addr` feature.
    pub const fn native() -> Self {
        if cfg!(feature = "abs-jmp-addr") {
            Self::Absolute { base_address: 0 }
        } else {
            Self::Relative
        }
    }

    /// Convert a raw jump operand of the instruction at `index` into an
    /// absolute instruction index.
    ///
    /// Returns `None` when the raw value is not a whole number of
    /// instructions away from the base, or the arithmetic overflows. The
    /// result is not range-checked against any array length.
    pub fn target(self, raw: i64, index: usize) -> Option<i64> {
        let distance = match self {
            Self::Relative => i128::from(raw),
            Self::Absolute { base_address } => i128::from(raw) - i128::from(base_address),
        };
        let size = i128::from(INSTRUCTION_SIZE);
        if distance % size != 0 {
            return None;
        }
        let target = match self {
            Self::Relative => distance / size + index as i128,
            Self::Absolute { .. } => distance / size,
        };
        i64::try_from(target).ok()
    }

    /// Inverse of [`target`](Self::target): the raw operand that makes the
    /// instruction at `index` jump to `target`.
    pub fn encode(self, target: usize, index: usize) -> i64 {
        match self {
            Self::Relative => (target as i64 - index as i64) * INSTRUCTION_SIZE,
            Self::Absolute { base_address } => {
                base_address as i64 + target as i64 * INSTRUCTION_SIZE
            }
        }
    }
}

impl Default for JumpEncoding {
    fn default() -> Self {
        Self::native()
    }
}
