//! Value types stored in a preferences namespace.

use std::collections::BTreeSet;
use std::fmt;

/// A single preference value.
///
/// Sets use [`BTreeSet`] so their binary encoding does not depend on
/// insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum PrefValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    Long(i64),
    Text(String),
    TextSet(BTreeSet<String>),
    /// Encoded object text produced by [`codec::encode`](crate::codec::encode).
    Object(String),
}

impl PrefValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            PrefValue::Bool(_) => ValueKind::Bool,
            PrefValue::Int(_) => ValueKind::Int,
            PrefValue::Float(_) => ValueKind::Float,
            PrefValue::Long(_) => ValueKind::Long,
            PrefValue::Text(_) => ValueKind::Text,
            PrefValue::TextSet(_) => ValueKind::TextSet,
            PrefValue::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(v) => write!(f, "{}", v),
            PrefValue::Int(v) => write!(f, "{}", v),
            PrefValue::Float(v) => write!(f, "{}", v),
            PrefValue::Long(v) => write!(f, "{}", v),
            PrefValue::Text(v) => f.write_str(v),
            PrefValue::TextSet(set) => {
                f.write_str("{")?;
                for (i, entry) in set.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(entry)?;
                }
                f.write_str("}")
            }
            PrefValue::Object(text) => f.write_str(text),
        }
    }
}

/// Discriminant-only view of [`PrefValue`], used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Long,
    Text,
    TextSet,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Long => "long",
            ValueKind::Text => "text",
            ValueKind::TextSet => "text-set",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}
