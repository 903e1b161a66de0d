use std::path::PathBuf;

use explain_disasm::DecodeError;
use thiserror::Error;

/// Failures reported by a [`Compiler`](crate::Compiler).
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{origin}: {message}")]
    Syntax { origin: String, message: String },

    #[error("cannot redeclare {kind} {name}")]
    Redeclared { kind: &'static str, name: String },

    #[error("{0} has an empty body")]
    EmptyBody(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("file {} couldn't be opened", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to compile code: {0}")]
    Compile(#[from] CompileError),

    #[error("invalid compile mode {0:#x}")]
    InvalidMode(u32),

    #[error("unable to disassemble {routine}: {source}")]
    Decode {
        routine: String,
        #[source]
        source: DecodeError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
