// Build script for explain-isa.
//
// Reads the opcode set from `isa.yaml` and writes `generated.rs` into
// OUT_DIR: the opcode table, a 256-entry id -> table slot index, and one
// named `Opcode` constant per entry in the `op` module.

use std::collections::HashSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Deserialize)]
struct IsaFile {
    opcodes: Vec<OpcodeDef>,
}

#[derive(Deserialize)]
struct OpcodeDef {
    id: u8,
    name: String,
    #[serde(default)]
    shape: Shape,
}

#[derive(Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum Shape {
    #[default]
    General,
    Jump,
    Branch3,
    CondJump,
    RecvInit,
}

impl Shape {
    fn variant(self) -> &'static str {
        match self {
            Shape::General => "General",
            Shape::Jump => "Jump",
            Shape::Branch3 => "Branch3",
            Shape::CondJump => "CondJump",
            Shape::RecvInit => "RecvInit",
        }
    }
}

fn main() {
    let manifest = env::var("CARGO_MANIFEST_DIR").unwrap();
    let out_dir = env::var("OUT_DIR").unwrap();

    let isa_yaml = format!("{manifest}/isa.yaml");
    let text = fs::read_to_string(&isa_yaml)
        .unwrap_or_else(|e| panic!("failed to read {isa_yaml}: {e}"));
    let isa: IsaFile =
        serde_yaml::from_str(&text).unwrap_or_else(|e| panic!("failed to parse {isa_yaml}: {e}"));

    validate(&isa.opcodes);

    let mut out = String::new();
    out.push_str("// @generated by build.rs from isa.yaml. Do not edit.\n\n");

    // Opcode table, in file order.
    let _ = writeln!(
        out,
        "static OPCODE_TABLE: [OpcodeInfo; {}] = [",
        isa.opcodes.len()
    );
    for def in &isa.opcodes {
        let _ = writeln!(
            out,
            "    OpcodeInfo {{ opcode: Opcode({}), mnemonic: {:?}, shape: DecodeShape::{} }},",
            def.id,
            def.name,
            def.shape.variant()
        );
    }
    out.push_str("];\n\n");

    // Raw id -> table slot, `u16::MAX` for unassigned ids.
    let mut slots = [u16::MAX; 256];
    for (slot, def) in isa.opcodes.iter().enumerate() {
        slots[def.id as usize] = slot as u16;
    }
    out.push_str("static OPCODE_SLOTS: [u16; 256] = [\n");
    for row in slots.chunks(16) {
        let cells: Vec<String> = row.iter().map(|s| s.to_string()).collect();
        let _ = writeln!(out, "    {},", cells.join(", "));
    }
    out.push_str("];\n\n");

    // Named constants.
    out.push_str("/// Named constants for every opcode in the table.\n");
    out.push_str("pub mod op {\n    use super::Opcode;\n\n");
    for def in &isa.opcodes {
        let _ = writeln!(out, "    /// `{}` ({}).", def.name, def.id);
        let _ = writeln!(
            out,
            "    pub const {}: Opcode = Opcode::from_raw({});",
            def.name, def.id
        );
    }
    out.push_str("}\n");

    let out_path = PathBuf::from(&out_dir).join("generated.rs");
    fs::write(&out_path, out).expect("failed to write generated.rs");

    println!("cargo:rerun-if-changed=isa.yaml");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Reject ids that are not strictly ascending, duplicate names and names that
/// cannot be used as Rust constant identifiers.
fn validate(defs: &[OpcodeDef]) {
    for pair in defs.windows(2) {
        assert!(
            pair[0].id < pair[1].id,
            "opcode id {} follows {} in isa.yaml; ids must be unique and ascending",
            pair[1].id,
            pair[0].id
        );
    }

    let mut names = HashSet::new();
    for def in defs {
        assert!(
            names.insert(def.name.as_str()),
            "duplicate opcode name {} in isa.yaml",
            def.name
        );
        assert!(
            def.name.starts_with("ZEND_")
                && def
                    .name
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'),
            "opcode name {:?} must match ZEND_[A-Z0-9_]+",
            def.name
        );
    }
}
