//! Zend Engine opcode definitions, generated from `isa.yaml`.
//!
//! This crate provides the opcode name table, the per-opcode decode shape used
//! by the disassembler, the operand-type tags carried by each operand, and the
//! jump encoding strategies of the engine.
//!
//! ```
//! use explain_isa::{op, opcode_name, operand_type_name};
//!
//! assert_eq!(op::ZEND_RETURN.mnemonic(), "ZEND_RETURN");
//! assert_eq!(opcode_name(41), "unknown");
//! assert_eq!(operand_type_name(0x30), "IS_CV|EXT_TYPE_UNUSED");
//! ```

// The bitflags crate is used by the operand-type tags
pub use bitflags;

mod jump;
mod optype;

pub use jump::{INSTRUCTION_SIZE, JumpEncoding};
pub use optype::{OperandKind, OperandType, operand_type_name};

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

include!(concat!(env!("OUT_DIR"), "/generated.rs"));

/// Display name for any opcode or operand type missing from the tables.
pub const UNKNOWN: &str = "unknown";

/// How the disassembler reads the three operand positions of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecodeShape {
    /// `first`, `second` and `result` all go through the operand resolver.
    General,
    /// Unconditional jump: `first` is the control target, nothing else is read.
    Jump,
    /// Three-way branch: `second` is an absolute else-target opline number.
    Branch3,
    /// Conditional jump: `second` is the control target.
    CondJump,
    /// Parameter with default: only `result` carries data.
    RecvInit,
}

impl DecodeShape {
    /// Whether this shape carries a control-target operand.
    pub const fn is_jump(self) -> bool {
        matches!(self, Self::Jump | Self::Branch3 | Self::CondJump)
    }
}

/// A raw opcode id.
///
/// Any `u8` is a valid `Opcode`; ids missing from the table are reported as
/// [`UNKNOWN`] rather than rejected, so newer engines can still be listed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode(u8);

impl Opcode {
    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Table entry for this opcode, if the id is assigned.
    pub fn info(self) -> Option<&'static OpcodeInfo> {
        lookup(self.0)
    }

    /// Display name, or [`UNKNOWN`].
    pub fn mnemonic(self) -> &'static str {
        self.info().map_or(UNKNOWN, OpcodeInfo::mnemonic)
    }

    /// Decode shape; unassigned ids decode with the general rule.
    pub fn shape(self) -> DecodeShape {
        self.info().map_or(DecodeShape::General, OpcodeInfo::shape)
    }

    /// Look up an opcode by mnemonic. The `ZEND_` prefix is optional and the
    /// match ignores ASCII case.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        let bare = name
            .get(..5)
            .filter(|p| p.eq_ignore_ascii_case("ZEND_"))
            .map_or(name, |_| &name[5..]);
        OPCODE_TABLE
            .iter()
            .find(|info| info.mnemonic[5..].eq_ignore_ascii_case(bare))
            .map(|info| info.opcode)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opcode({}, {})", self.0, self.mnemonic())
    }
}

impl From<u8> for Opcode {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

/// Errors from parsing an [`Opcode`] or [`OperandType`] from text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown opcode mnemonic {0:?}")]
    UnknownOpcode(String),
    #[error("unknown operand type {0:?}")]
    UnknownOperandType(String),
    #[error("value {0} does not fit the tag width")]
    OutOfRange(u64),
}

impl FromStr for Opcode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(n) = parse_number(s) {
            return u8::try_from(n).map(Self).map_err(|_| ParseError::OutOfRange(n));
        }
        Self::from_mnemonic(s).ok_or_else(|| ParseError::UnknownOpcode(s.to_string()))
    }
}

impl Serialize for Opcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.mnemonic())
    }
}

impl<'de> Deserialize<'de> for Opcode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OpcodeVisitor;

        impl<'de> Visitor<'de> for OpcodeVisitor {
            type Value = Opcode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an opcode id or mnemonic")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Opcode, E> {
                u8::try_from(v)
                    .map(Opcode)
                    .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Opcode, E> {
                u8::try_from(v)
                    .map(Opcode)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Opcode, E> {
                v.parse()
                    .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(OpcodeVisitor)
    }
}

/// Metadata for one assigned opcode.
#[derive(Clone, Copy, Debug)]
pub struct OpcodeInfo {
    opcode: Opcode,
    mnemonic: &'static str,
    shape: DecodeShape,
}

impl OpcodeInfo {
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    pub fn shape(&self) -> DecodeShape {
        self.shape
    }
}

/// Look up the table entry for a raw opcode id.
pub fn lookup(raw: u8) -> Option<&'static OpcodeInfo> {
    OPCODE_TABLE.get(OPCODE_SLOTS[raw as usize] as usize)
}

/// Every assigned opcode, in ascending id order.
pub fn opcode_table() -> &'static [OpcodeInfo] {
    &OPCODE_TABLE
}

/// Number of assigned opcodes.
pub fn opcode_count() -> usize {
    OPCODE_TABLE.len()
}

/// Display name for a raw opcode id; [`UNKNOWN`] for ids outside the table.
pub fn opcode_name(raw: u32) -> &'static str {
    u8::try_from(raw).map_or(UNKNOWN, |id| Opcode(id).mnemonic())
}

/// Parse a decimal or `0x`-prefixed hexadecimal number.
pub fn parse_number(s: &str) -> Option<u64> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}
