//! Systematic opcode_table() coverage tests.
//!
//! Validates metadata consistency for every opcode in the table.

use explain_isa::{
    DecodeShape, Opcode, UNKNOWN, lookup, op, opcode_count, opcode_name, opcode_table,
};

#[test]
fn opcode_count_matches_engine() {
    // 0..=172 minus the five unassigned ids.
    assert_eq!(opcode_count(), 168);
}

#[test]
fn lookup_roundtrip_for_all_opcodes() {
    for info in opcode_table() {
        let raw = info.opcode().raw();
        let found = lookup(raw)
            .unwrap_or_else(|| panic!("lookup({raw}) returned None for '{}'", info.mnemonic()));
        assert_eq!(found.mnemonic(), info.mnemonic(), "lookup({raw}) mnemonic mismatch");
    }
}

#[test]
fn table_is_sorted_by_id() {
    let ids: Vec<u8> = opcode_table().iter().map(|i| i.opcode().raw()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[test]
fn all_mnemonics_are_zend_names() {
    for info in opcode_table() {
        let m = info.mnemonic();
        assert!(m.starts_with("ZEND_"), "mnemonic '{m}' lacks ZEND_ prefix");
        assert!(
            m.bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'),
            "mnemonic '{m}' contains unexpected characters"
        );
    }
}

#[test]
fn well_known_ids() {
    assert_eq!(opcode_name(0), "ZEND_NOP");
    assert_eq!(opcode_name(38), "ZEND_ASSIGN");
    assert_eq!(opcode_name(42), "ZEND_JMP");
    assert_eq!(opcode_name(62), "ZEND_RETURN");
    assert_eq!(opcode_name(172), "ZEND_DECLARE_ANON_INHERITED_CLASS");
    assert_eq!(op::ZEND_RECV_INIT.raw(), 64);
}

#[test]
fn unassigned_ids_are_unknown() {
    for raw in [41, 49, 50, 51, 100, 173, 200, 255] {
        assert_eq!(opcode_name(raw), UNKNOWN, "id {raw}");
        assert!(lookup(raw as u8).is_none(), "id {raw}");
    }
}

#[test]
fn ids_wider_than_a_byte_are_unknown() {
    assert_eq!(opcode_name(256), UNKNOWN);
    assert_eq!(opcode_name(u32::MAX), UNKNOWN);
}

#[test]
fn unknown_opcode_decodes_with_general_shape() {
    assert_eq!(Opcode::from_raw(41).shape(), DecodeShape::General);
    assert_eq!(Opcode::from_raw(41).mnemonic(), UNKNOWN);
}

#[test]
fn jump_shapes() {
    assert_eq!(op::ZEND_JMP.shape(), DecodeShape::Jump);
    assert_eq!(op::ZEND_FAST_CALL.shape(), DecodeShape::Jump);
    assert_eq!(op::ZEND_JMPZNZ.shape(), DecodeShape::Branch3);
    for cond in [
        op::ZEND_JMPZ,
        op::ZEND_JMPNZ,
        op::ZEND_JMPZ_EX,
        op::ZEND_JMPNZ_EX,
        op::ZEND_JMP_SET,
        op::ZEND_COALESCE,
    ] {
        assert_eq!(cond.shape(), DecodeShape::CondJump, "{cond}");
    }
    assert_eq!(op::ZEND_RECV_INIT.shape(), DecodeShape::RecvInit);
}

#[test]
fn jump_shape_count() {
    let jumps = opcode_table().iter().filter(|i| i.shape().is_jump()).count();
    assert_eq!(jumps, 9);
    assert!(!DecodeShape::RecvInit.is_jump());
}

#[test]
fn everything_else_is_general() {
    assert_eq!(op::ZEND_ADD.shape(), DecodeShape::General);
    assert_eq!(op::ZEND_RETURN.shape(), DecodeShape::General);
    assert_eq!(op::ZEND_RECV.shape(), DecodeShape::General);
}

#[test]
fn parse_from_mnemonic_or_number() {
    assert_eq!("ZEND_RETURN".parse::<Opcode>().unwrap(), op::ZEND_RETURN);
    assert_eq!("return".parse::<Opcode>().unwrap(), op::ZEND_RETURN);
    assert_eq!("zend_jmpznz".parse::<Opcode>().unwrap(), op::ZEND_JMPZNZ);
    assert_eq!("62".parse::<Opcode>().unwrap(), op::ZEND_RETURN);
    assert_eq!("0x2a".parse::<Opcode>().unwrap(), op::ZEND_JMP);
    assert!("ZEND_NOT_AN_OPCODE".parse::<Opcode>().is_err());
    assert!("300".parse::<Opcode>().is_err());
}

#[test]
fn display_and_debug() {
    assert_eq!(op::ZEND_ECHO.to_string(), "ZEND_ECHO");
    assert_eq!(format!("{:?}", op::ZEND_ECHO), "Opcode(40, ZEND_ECHO)");
    assert_eq!(Opcode::from_raw(41).to_string(), "unknown");
}
