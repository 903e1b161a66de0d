use explain_ir::OpArray;

use crate::error::CompileError;
use crate::symbols::SymbolTable;

/// Source text handed to a compiler, with a label for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceText {
    /// File path, or `"inline code"` for text passed directly.
    pub origin: String,
    pub text: String,
}

impl SourceText {
    pub const INLINE_ORIGIN: &'static str = "inline code";

    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            origin: Self::INLINE_ORIGIN.to_string(),
            text: text.into(),
        }
    }
}

/// A compiler front-end.
///
/// Compiling returns the unit's top-level op array and declares the
/// functions and classes the unit defines into `symbols`. On error nothing
/// is declared.
pub trait Compiler {
    fn compile(&self, source: &SourceText, symbols: &mut SymbolTable)
    -> Result<OpArray, CompileError>;
}
