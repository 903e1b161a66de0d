use explain_ir::{DecodedOperand, OpArray, Operand, Value};
use explain_isa::OperandKind;

use crate::error::DecodeError;
use crate::slots::SlotTable;

/// Resolve one data operand of the instruction at `opline`.
///
/// Returns `Ok(None)` for an unused position, which the caller leaves out of
/// the listing. Tags with no base kind are reported with no value. Jump
/// operands never come through here.
pub fn resolve_operand(
    ops: &OpArray,
    operand: Operand,
    opline: u32,
    slots: &mut SlotTable,
) -> Result<Option<DecodedOperand>, DecodeError> {
    let value = match operand.kind.kind() {
        Some(OperandKind::Unused) => return Ok(None),
        Some(OperandKind::Cv) => {
            let name = ops
                .var_name(operand.value)
                .ok_or(DecodeError::VarOutOfRange {
                    opline,
                    slot: operand.value,
                    len: ops.vars.len(),
                })?;
            Value::Name(name.to_string())
        }
        Some(OperandKind::TmpVar | OperandKind::Var) => Value::Slot(slots.name(operand.value)),
        Some(OperandKind::Const) => {
            let literal = ops
                .literal(operand.value)
                .ok_or(DecodeError::LiteralOutOfRange {
                    opline,
                    index: operand.value,
                    len: ops.literals.len(),
                })?;
            Value::Literal(literal.clone())
        }
        None => {
            log::warn!(
                "opline {opline}: unknown operand type {:#04x}",
                operand.kind.bits()
            );
            return Ok(Some(DecodedOperand {
                kind: operand.kind,
                value: None,
            }));
        }
    };
    Ok(Some(DecodedOperand::new(operand.kind, value)))
}
