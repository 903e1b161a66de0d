use std::fmt;
use std::str::FromStr;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ParseError, UNKNOWN, parse_number};

bitflags::bitflags! {
    /// Operand type tag, as stored next to each operand of an instruction.
    ///
    /// Exactly one base bit is set for a well-formed operand. The result
    /// operand may additionally carry [`EXT_TYPE_UNUSED`](Self::EXT_TYPE_UNUSED)
    /// when the produced value is discarded.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OperandType: u8 {
        /// Literal from the constant pool.
        const CONST = 0x01;
        /// Temporary slot.
        const TMP_VAR = 0x02;
        /// Working (var) slot.
        const VAR = 0x04;
        /// Operand position not used by the instruction.
        const UNUSED = 0x08;
        /// Compiled variable: a named local.
        const CV = 0x10;
        /// Result hint: the value is never read.
        const EXT_TYPE_UNUSED = 0x20;
    }
}

/// Base operand kind, with the result hint stripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandKind {
    Unused,
    Cv,
    TmpVar,
    Var,
    Const,
}

const NAMES: &[(u8, &str)] = &[
    (0x01, "IS_CONST"),
    (0x02, "IS_TMP_VAR"),
    (0x04, "IS_VAR"),
    (0x08, "IS_UNUSED"),
    (0x10, "IS_CV"),
    (0x11, "IS_OPLINE"),
    (0x22, "IS_TMP_VAR|EXT_TYPE_UNUSED"),
    (0x24, "IS_VAR|EXT_TYPE_UNUSED"),
    (0x28, "IS_UNUSED|EXT_TYPE_UNUSED"),
    (0x30, "IS_CV|EXT_TYPE_UNUSED"),
];

impl OperandType {
    /// Synthetic tag reported for control-target operands of jump opcodes.
    ///
    /// Never stored in an instruction; it only appears in disassembly output.
    pub const OPLINE: Self = Self::from_bits_retain(0x11);

    /// Base kind of this tag, or `None` for the control-target tag and for
    /// bit patterns with no single base kind.
    pub fn kind(self) -> Option<OperandKind> {
        match self.difference(Self::EXT_TYPE_UNUSED).bits() {
            0x01 => Some(OperandKind::Const),
            0x02 => Some(OperandKind::TmpVar),
            0x04 => Some(OperandKind::Var),
            0x08 => Some(OperandKind::Unused),
            0x10 => Some(OperandKind::Cv),
            _ => None,
        }
    }

    /// Whether the operand position is unused, with or without the result hint.
    pub fn is_unused(self) -> bool {
        self.kind() == Some(OperandKind::Unused)
    }

    /// Display name, including the `|EXT_TYPE_UNUSED` composite forms.
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(bits, _)| *bits == self.bits())
            .map_or(UNKNOWN, |&(_, name)| name)
    }

    /// Inverse of [`name`](Self::name).
    pub fn from_display_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(bits, _)| Self::from_bits_retain(*bits))
    }
}

impl Default for OperandType {
    fn default() -> Self {
        Self::UNUSED
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display name for a raw operand type value.
///
/// Values wider than the tag byte, and bit patterns not in the name table,
/// are reported as `"unknown"`.
pub fn operand_type_name(raw: u32) -> &'static str {
    u8::try_from(raw).map_or(UNKNOWN, |bits| OperandType::from_bits_retain(bits).name())
}

impl FromStr for OperandType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(n) = parse_number(s) {
            return u8::try_from(n)
                .map(Self::from_bits_retain)
                .map_err(|_| ParseError::OutOfRange(n));
        }
        Self::from_display_name(s.trim())
            .ok_or_else(|| ParseError::UnknownOperandType(s.to_string()))
    }
}

impl Serialize for OperandType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for OperandType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OperandTypeVisitor;

        impl<'de> Visitor<'de> for OperandTypeVisitor {
            type Value = OperandType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an operand type value or name")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<OperandType, E> {
                u8::try_from(v)
                    .map(OperandType::from_bits_retain)
                    .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<OperandType, E> {
                u8::try_from(v)
                    .map(OperandType::from_bits_retain)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<OperandType, E> {
                v.parse()
                    .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(OperandTypeVisitor)
    }
}
