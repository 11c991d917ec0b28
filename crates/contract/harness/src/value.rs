//! Opaque values for the erased (untyped) capability surfaces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type-erased item, key or value.
///
/// `Null` doubles as the unset slot of an erased copy buffer and as a
/// legitimately stored "no value".
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Opaque {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
    Seq(Vec<Opaque>),
}

impl Opaque {
    pub fn is_null(&self) -> bool {
        matches!(self, Opaque::Null)
    }

    /// Borrow the text payload, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Opaque::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opaque::Null => write!(f, "null"),
            Opaque::Bool(b) => write!(f, "{}", b),
            Opaque::Int(i) => write!(f, "{}", i),
            Opaque::Text(s) => write!(f, "{:?}", s),
            Opaque::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Opaque::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Opaque {
    fn from(value: bool) -> Self {
        Opaque::Bool(value)
    }
}

impl From<i64> for Opaque {
    fn from(value: i64) -> Self {
        Opaque::Int(value)
    }
}

impl From<i32> for Opaque {
    fn from(value: i32) -> Self {
        Opaque::Int(i64::from(value))
    }
}

impl From<u32> for Opaque {
    fn from(value: u32) -> Self {
        Opaque::Int(i64::from(value))
    }
}

impl From<&str> for Opaque {
    fn from(value: &str) -> Self {
        Opaque::Text(value.to_string())
    }
}

impl From<String> for Opaque {
    fn from(value: String) -> Self {
        Opaque::Text(value)
    }
}

impl From<Vec<u8>> for Opaque {
    fn from(value: Vec<u8>) -> Self {
        Opaque::Bytes(value)
    }
}

impl From<Vec<Opaque>> for Opaque {
    fn from(value: Vec<Opaque>) -> Self {
        Opaque::Seq(value)
    }
}

impl<T: Into<Opaque>> From<Option<T>> for Opaque {
    fn from(value: Option<T>) -> Self {
        value.map_or(Opaque::Null, Into::into)
    }
}
