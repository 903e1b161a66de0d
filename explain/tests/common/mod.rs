#![allow(dead_code)]

use std::io::Write;

use explain::{CompileMode, DumpCompiler, ExplainOptions, Explanation, SymbolTable};
use explain_ir::{DisassembledInstruction, Disassembly};

/// `echo "hi"; return 1;`
pub const ECHO_UNIT: &str = r#"
main:
  opcodes:
    - { opcode: ZEND_ECHO, first: { kind: IS_CONST, value: 0 }, lineno: 1 }
    - { opcode: ZEND_RETURN, first: { kind: IS_CONST, value: 1 }, lineno: 1 }
  literals: ["hi", 1]
"#;

/// Declares `f` and class `Shape` with an abstract `area` and a concrete `name`.
pub const DECLARING_UNIT: &str = r#"
main:
  opcodes:
    - { opcode: ZEND_RETURN, first: { kind: IS_CONST, value: 0 }, lineno: 9 }
  literals: [1]
functions:
  f:
    opcodes:
      - { opcode: ZEND_RECV, result: { kind: IS_CV, value: 0 }, lineno: 2 }
      - { opcode: ZEND_RETURN, first: { kind: IS_CV, value: 0 }, lineno: 3 }
    vars: [x]
classes:
  Shape:
    methods:
      area: ~
      name:
        opcodes:
          - { opcode: ZEND_RETURN, first: { kind: IS_CONST, value: 0 }, lineno: 6 }
        literals: ["shape"]
"#;

pub fn inline(
    code: &str,
    symbols: &mut SymbolTable,
    new_symbols: bool,
) -> explain::Result<Explanation> {
    explain::explain(
        code,
        CompileMode::STRING,
        &DumpCompiler,
        symbols,
        ExplainOptions { new_symbols },
    )
}

pub fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

pub fn listing(d: &Disassembly) -> &[DisassembledInstruction] {
    d.instructions().expect("expected a listing")
}
