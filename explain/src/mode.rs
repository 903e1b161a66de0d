//! Request mode flags.

use std::path::PathBuf;

use crate::error::{Error, Result};

bitflags::bitflags! {
    /// Where the code of a request comes from.
    ///
    /// Exactly one flag must be set.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CompileMode: u32 {
        /// The code argument is a path to read.
        const FILE = 0x01;
        /// The code argument is the source text itself.
        const STRING = 0x10;
    }
}

impl Default for CompileMode {
    fn default() -> Self {
        Self::FILE
    }
}

/// A validated request source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Inline(String),
}

impl Source {
    /// Interpret `code` according to raw mode bits.
    ///
    /// Unknown bits, no bits, or both bits at once are an invalid request.
    pub fn from_mode(code: &str, mode: u32) -> Result<Self> {
        match CompileMode::from_bits(mode) {
            Some(m) if m == CompileMode::FILE => Ok(Source::File(PathBuf::from(code))),
            Some(m) if m == CompileMode::STRING => Ok(Source::Inline(code.to_string())),
            _ => Err(Error::InvalidMode(mode)),
        }
    }
}
