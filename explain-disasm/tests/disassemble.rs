mod common;

use common::{array, insn, listing, nops, rel};
use explain_disasm::{DecodeError, disassemble};
use explain_ir::{DecodedOperand, Disassembly, Literal, OpArray, Operand, Value};
use explain_isa::{INSTRUCTION_SIZE, JumpEncoding, OperandType, op};

#[test]
fn return_constant() {
    let ops = array(
        vec![insn(op::ZEND_RETURN, 3).with_first(Operand::constant(0))],
        vec![Literal::Long(42)],
        &[],
    );
    let out = listing(&ops);
    assert_eq!(out.len(), 1);
    let ret = &out[0];
    assert_eq!(ret.opline, 0);
    assert_eq!(ret.opcode.mnemonic(), "ZEND_RETURN");
    assert_eq!(
        ret.first,
        Some(DecodedOperand::new(OperandType::CONST, Value::Literal(Literal::Long(42))))
    );
    assert_eq!(ret.second, None);
    assert_eq!(ret.result, None);
    assert_eq!(ret.extended_value, None);
    assert_eq!(ret.lineno, 3);
}

#[test]
fn no_body_is_not_an_error() {
    assert_eq!(disassemble(None).unwrap(), Disassembly::NoBody);
}

#[test]
fn empty_array_is_distinct_from_no_body() {
    let out = disassemble(Some(&OpArray::default())).unwrap();
    assert_eq!(out, Disassembly::Listing(Vec::new()));
}

#[test]
fn compiled_variables_resolve_to_names() {
    let ops = array(
        vec![
            insn(op::ZEND_ASSIGN, 2)
                .with_first(Operand::cv(1))
                .with_second(Operand::constant(0)),
            insn(op::ZEND_ECHO, 3).with_first(Operand::cv(0)),
        ],
        vec![Literal::from("hello")],
        &["greeting", "target"],
    );
    let out = listing(&ops);
    assert_eq!(out[0].first.as_ref().unwrap().value, Some(Value::Name("target".into())));
    assert_eq!(
        out[0].second.as_ref().unwrap().value,
        Some(Value::Literal(Literal::from("hello")))
    );
    assert_eq!(out[1].first.as_ref().unwrap().value, Some(Value::Name("greeting".into())));
}

#[test]
fn slots_are_numbered_in_first_seen_order() {
    // 16 then 24 are new; 16 again keeps its id.
    let ops = array(
        vec![
            insn(op::ZEND_ADD, 1)
                .with_first(Operand::cv(0))
                .with_second(Operand::constant(0))
                .with_result(Operand::tmp(16)),
            insn(op::ZEND_MUL, 1)
                .with_first(Operand::tmp(16))
                .with_second(Operand::constant(0))
                .with_result(Operand::var(24)),
            insn(op::ZEND_ECHO, 2).with_first(Operand::var(24)),
            insn(op::ZEND_FREE, 2).with_first(Operand::tmp(16)),
        ],
        vec![Literal::Long(2)],
        &["n"],
    );
    let out = listing(&ops);
    assert_eq!(out[0].result.as_ref().unwrap().as_slot(), Some(0));
    assert_eq!(out[1].first.as_ref().unwrap().as_slot(), Some(0));
    assert_eq!(out[1].result.as_ref().unwrap().as_slot(), Some(1));
    assert_eq!(out[2].first.as_ref().unwrap().as_slot(), Some(1));
    assert_eq!(out[3].first.as_ref().unwrap().as_slot(), Some(0));
    assert_eq!(out[1].result.as_ref().unwrap().kind, OperandType::VAR);
}

#[test]
fn slot_numbering_restarts_per_array() {
    let a = array(
        vec![insn(op::ZEND_ECHO, 1).with_first(Operand::tmp(96))],
        vec![],
        &[],
    );
    let b = array(
        vec![
            insn(op::ZEND_ECHO, 1).with_first(Operand::tmp(32)),
            insn(op::ZEND_ECHO, 1).with_first(Operand::tmp(96)),
        ],
        vec![],
        &[],
    );
    assert_eq!(listing(&a)[0].first.as_ref().unwrap().as_slot(), Some(0));
    let out = listing(&b);
    assert_eq!(out[0].first.as_ref().unwrap().as_slot(), Some(0));
    assert_eq!(out[1].first.as_ref().unwrap().as_slot(), Some(1));
    // Disassembling `a` again does not see `b`'s tokens.
    assert_eq!(listing(&a)[0].first.as_ref().unwrap().as_slot(), Some(0));
}

#[test]
fn result_hint_is_reported_in_kind() {
    let ops = array(
        vec![
            insn(op::ZEND_ASSIGN, 1)
                .with_first(Operand::cv(0))
                .with_second(Operand::constant(0))
                .with_result(Operand::var(8).discarded()),
        ],
        vec![Literal::Long(1)],
        &["x"],
    );
    let result = listing(&ops)[0].result.clone().unwrap();
    assert_eq!(result.kind.name(), "IS_VAR|EXT_TYPE_UNUSED");
    assert_eq!(result.value, Some(Value::Slot(0)));
}

#[test]
fn unused_with_result_hint_is_still_absent() {
    let ops = array(
        vec![insn(op::ZEND_NOP, 1).with_result(Operand::unused().discarded())],
        vec![],
        &[],
    );
    assert_eq!(listing(&ops)[0].result, None);
}

#[test]
fn extended_value_only_when_nonzero() {
    let ops = array(
        vec![
            insn(op::ZEND_CAST, 1)
                .with_first(Operand::cv(0))
                .with_result(Operand::tmp(0))
                .with_extended_value(4),
            insn(op::ZEND_CAST, 2)
                .with_first(Operand::cv(0))
                .with_result(Operand::tmp(32))
                .with_extended_value(0),
        ],
        vec![],
        &["v"],
    );
    let out = listing(&ops);
    assert_eq!(out[0].extended_value, Some(4));
    assert_eq!(out[1].extended_value, None);
}

#[test]
fn unknown_opcode_uses_general_rule() {
    let ops = array(
        vec![
            insn(explain_isa::Opcode::from_raw(41), 7)
                .with_first(Operand::cv(0))
                .with_result(Operand::tmp(0)),
        ],
        vec![],
        &["a"],
    );
    let out = listing(&ops);
    assert_eq!(out[0].opcode.mnemonic(), "unknown");
    assert_eq!(out[0].first.as_ref().unwrap().value, Some(Value::Name("a".into())));
    assert_eq!(out[0].result.as_ref().unwrap().as_slot(), Some(0));
}

#[test]
fn unknown_operand_type_is_listed_without_value() {
    let ops = array(
        vec![
            insn(op::ZEND_ECHO, 1)
                .with_first(Operand::new(OperandType::from_bits_retain(0x40), 3)),
        ],
        vec![],
        &[],
    );
    let first = listing(&ops)[0].first.clone().unwrap();
    assert_eq!(first.kind.name(), "unknown");
    assert_eq!(first.value, None);
}

#[test]
fn literals_are_copied_out_of_the_pool() {
    let ops = array(
        vec![insn(op::ZEND_ECHO, 1).with_first(Operand::constant(0))],
        vec![Literal::Array(vec![Literal::Long(1)])],
        &[],
    );
    let mut out = listing(&ops);
    if let Some(DecodedOperand {
        value: Some(Value::Literal(Literal::Array(items))),
        ..
    }) = out[0].first.as_mut()
    {
        items.push(Literal::Long(2));
    } else {
        panic!("expected an array literal");
    }
    assert_eq!(ops.literals[0], Literal::Array(vec![Literal::Long(1)]));
}

#[test]
fn var_out_of_range_fails_the_pass() {
    let ops = array(
        vec![
            insn(op::ZEND_NOP, 1),
            insn(op::ZEND_ECHO, 2).with_first(Operand::cv(3)),
        ],
        vec![],
        &["only"],
    );
    assert_eq!(
        disassemble(Some(&ops)).unwrap_err(),
        DecodeError::VarOutOfRange { opline: 1, slot: 3, len: 1 }
    );
}

#[test]
fn literal_out_of_range_fails_the_pass() {
    let ops = array(
        vec![insn(op::ZEND_RETURN, 1).with_first(Operand::constant(1))],
        vec![Literal::Null],
        &[],
    );
    assert_eq!(
        disassemble(Some(&ops)).unwrap_err(),
        DecodeError::LiteralOutOfRange { opline: 0, index: 1, len: 1 }
    );
}

#[test]
fn determinism() {
    let mut opcodes = nops(4);
    opcodes.push(insn(op::ZEND_JMP, 5).with_first(Operand::jump(rel(4, 1))));
    opcodes.push(
        insn(op::ZEND_ADD, 6)
            .with_first(Operand::tmp(8))
            .with_second(Operand::constant(0))
            .with_result(Operand::tmp(16)),
    );
    let ops = array(opcodes, vec![Literal::Double(0.5)], &[]);
    assert_eq!(listing(&ops), listing(&ops));
}

#[test]
fn abs_encoding_round_trips_through_op_array() {
    let enc = JumpEncoding::Absolute { base_address: 0x7f00_0000 };
    let mut opcodes = nops(3);
    opcodes.push(insn(op::ZEND_JMP, 4).with_first(Operand::jump(enc.encode(1, 3))));
    let ops = OpArray::new(opcodes).with_jump_encoding(enc);
    assert_eq!(listing(&ops)[3].jump_target(), Some(1));
    assert_eq!(enc.target(0x7f00_0000 + 2 * INSTRUCTION_SIZE, 3), Some(2));
}
