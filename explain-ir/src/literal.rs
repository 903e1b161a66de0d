use std::fmt;

use serde::{Deserialize, Serialize};

/// A constant-pool entry.
///
/// Literals are owned values: cloning one yields an independent copy, so a
/// resolved operand never aliases the pool it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
    Array(Vec<Literal>),
}

impl Literal {
    /// Engine type name of the literal.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Bool(_) => "bool",
            Literal::Long(_) => "int",
            Literal::Double(_) => "float",
            Literal::String(_) => "string",
            Literal::Array(_) => "array",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Long(i) => write!(f, "{i}"),
            Literal::Double(d) if d.is_finite() && d.fract() == 0.0 => write!(f, "{d:.1}"),
            Literal::Double(d) => write!(f, "{d}"),
            Literal::String(s) => match s.char_indices().nth(64) {
                Some((cut, _)) => write!(f, "{:?}...", &s[..cut]),
                None => write!(f, "{s:?}"),
            },
            Literal::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Long(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Double(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}
