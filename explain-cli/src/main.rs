use clap::{Parser, Subcommand, ValueEnum};
use explain::{CompileMode, DumpCompiler, ExplainOptions, Explanation, SymbolTable};
use explain_ir::{DecodedOperand, Disassembly, Value};
use explain_isa::{
    Opcode, OperandKind, OperandType, ParseError, UNKNOWN, opcode_name, operand_type_name,
    parse_number,
};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "explain", about = "Zend Engine opcode disassembler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Disassemble a YAML opcode dump
    Disasm {
        /// Path to the dump, or the dump itself with --inline
        input: String,
        /// Treat INPUT as the dump text instead of a path
        #[arg(long)]
        inline: bool,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Also list functions and classes declared by the dump
        #[arg(long)]
        symbols: bool,
    },
    /// Look up an opcode by number or mnemonic
    Opcode {
        /// Decimal or 0x-prefixed number, or a name such as ZEND_ECHO or echo
        id: String,
    },
    /// Look up an operand type by bit value or name
    Optype {
        /// Bit value, or a name such as IS_CV
        kind: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Yaml,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Disasm {
            input,
            inline,
            format,
            symbols,
        } => cmd_disasm(&input, inline, format, symbols),
        Commands::Opcode { id } => cmd_opcode(&id),
        Commands::Optype { kind } => cmd_optype(&kind),
    }
}

fn cmd_disasm(input: &str, inline: bool, format: Format, new_symbols: bool) {
    let mode = if inline {
        CompileMode::STRING
    } else {
        CompileMode::FILE
    };
    let mut table = SymbolTable::new();
    let explanation = match explain::explain(
        input,
        mode,
        &DumpCompiler,
        &mut table,
        ExplainOptions { new_symbols },
    ) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match format {
        Format::Yaml => match serde_yaml::to_string(&explanation) {
            Ok(yaml) => print!("{yaml}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        Format::Text => print_text(input, inline, &explanation),
    }
}

fn print_text(input: &str, inline: bool, explanation: &Explanation) {
    let origin = if inline { "inline code" } else { input };
    println!("# Disassembly of {origin}");
    println!();

    print_routine("main", &explanation.main);
    for (name, listing) in &explanation.functions {
        print_routine(name, listing);
    }
    for (class, methods) in &explanation.classes {
        for (method, listing) in methods {
            print_routine(&format!("{class}::{method}"), listing);
        }
    }
}

fn print_routine(name: &str, listing: &Disassembly) {
    println!(".function {name} {{");
    match listing {
        Disassembly::NoBody => println!("    # (no body - abstract)"),
        Disassembly::Listing(insns) => {
            for insn in insns {
                let operands: Vec<String> = insn
                    .operands()
                    .filter(|(field, _)| *field != "result")
                    .map(|(_, op)| format_operand(op))
                    .collect();
                let mut line = format!("    {:>4}  {:<24}", insn.opline, insn.opcode.to_string());
                if !operands.is_empty() {
                    line.push_str(&operands.join(", "));
                }
                if let Some(result) = &insn.result {
                    line.push_str(&format!(" => {}", format_operand(result)));
                }
                if let Some(ext) = insn.extended_value {
                    line.push_str(&format!(" [ext {ext}]"));
                }
                println!("{}  ; line {}", line.trim_end(), insn.lineno);
            }
        }
    }
    println!("}}");
    println!();
}

fn format_operand(op: &DecodedOperand) -> String {
    let discarded = if op.kind.contains(OperandType::EXT_TYPE_UNUSED) {
        " (unused)"
    } else {
        ""
    };
    let text = match (&op.value, op.kind.kind()) {
        (Some(Value::Target(t)), _) => format!("-> {t}"),
        (Some(Value::Name(n)), _) => format!("${n}"),
        (Some(Value::Slot(id)), Some(OperandKind::TmpVar)) => format!("~{id}"),
        (Some(Value::Slot(id)), _) => format!("${id}"),
        (Some(Value::Literal(lit)), _) => lit.to_string(),
        (None, _) => format!("<{}>", op.kind),
    };
    format!("{text}{discarded}")
}

fn cmd_opcode(id: &str) {
    match describe_opcode(id) {
        Ok(line) => println!("{line}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_optype(kind: &str) {
    match describe_optype(kind) {
        Ok(line) => println!("{line}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Numeric ids never fail: ids outside the table are `unknown`.
fn describe_opcode(query: &str) -> Result<String, ParseError> {
    if let Some(n) = parse_number(query) {
        let name = u32::try_from(n).map_or(UNKNOWN, opcode_name);
        return Ok(format!("{n} {name}"));
    }
    let op = query.parse::<Opcode>()?;
    Ok(format!("{} {}", op.raw(), op.mnemonic()))
}

fn describe_optype(query: &str) -> Result<String, ParseError> {
    if let Some(n) = parse_number(query) {
        let name = u32::try_from(n).map_or(UNKNOWN, operand_type_name);
        return Ok(format!("{n:#04x} {name}"));
    }
    let ty = query.parse::<OperandType>()?;
    Ok(format!("{:#04x} {ty}", ty.bits()))
}
