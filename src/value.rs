//! Generic value tree for property-list documents.
//!
//! Entry files are property lists: dictionaries, arrays, strings, booleans,
//! integers, reals, and dates nested arbitrarily. The wire format itself is
//! handled by the `plist` crate. This module narrows its value type down to
//! the closed set of kinds the journal schema can hold, so the mapper in
//! [`crate::decode`] can match exhaustively on every field.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Seek};
use std::time::SystemTime;

use jiff::Timestamp;

/// A node in a decoded property-list document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Boolean(bool),
    SignedInteger(i64),
    UnsignedInteger(u64),
    Real(f64),
    Date(Timestamp),
    Array(Vec<Value>),
    Dictionary(BTreeMap<String, Value>),
}

/// The kind of a [`Value`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Boolean,
    SignedInteger,
    UnsignedInteger,
    /// Any integer width, signed or unsigned.
    Integer,
    Real,
    /// An integer or a real.
    Number,
    Date,
    Array,
    Dictionary,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::SignedInteger => "signed integer",
            Self::UnsignedInteger => "unsigned integer",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Number => "number",
            Self::Date => "date",
            Self::Array => "array",
            Self::Dictionary => "dictionary",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Returns the kind of this node.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::String(_) => Kind::String,
            Self::Boolean(_) => Kind::Boolean,
            Self::SignedInteger(_) => Kind::SignedInteger,
            Self::UnsignedInteger(_) => Kind::UnsignedInteger,
            Self::Real(_) => Kind::Real,
            Self::Date(_) => Kind::Date,
            Self::Array(_) => Kind::Array,
            Self::Dictionary(_) => Kind::Dictionary,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::SignedInteger(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::UnsignedInteger(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Real(n)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Self::Date(t)
    }
}

impl<V: Into<Value>> FromIterator<(String, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self::Dictionary(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// Errors converting a raw property list into a [`Value`].
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("property list error: {0}")]
    Plist(#[from] plist::Error),

    #[error("unsupported property list value: {0}")]
    Unsupported(&'static str),

    #[error("date out of range: {0}")]
    DateOutOfRange(#[from] jiff::Error),
}

impl TryFrom<plist::Value> for Value {
    type Error = ValueError;

    fn try_from(raw: plist::Value) -> Result<Self, ValueError> {
        let value = match raw {
            plist::Value::String(s) => Self::String(s),
            plist::Value::Boolean(b) => Self::Boolean(b),
            // Non-negative integers come back unsigned, so unsigned-only
            // fields accept whatever the encoder chose for them.
            plist::Value::Integer(n) => match (n.as_unsigned(), n.as_signed()) {
                (Some(u), _) => Self::UnsignedInteger(u),
                (None, Some(i)) => Self::SignedInteger(i),
                (None, None) => return Err(ValueError::Unsupported("integer")),
            },
            plist::Value::Real(r) => Self::Real(r),
            plist::Value::Date(d) => Self::Date(Timestamp::try_from(SystemTime::from(d))?),
            plist::Value::Array(items) => Self::Array(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            plist::Value::Dictionary(dict) => Self::Dictionary(
                dict.into_iter()
                    .map(|(k, v)| Ok((k, Self::try_from(v)?)))
                    .collect::<Result<_, ValueError>>()?,
            ),
            plist::Value::Data(_) => return Err(ValueError::Unsupported("data")),
            plist::Value::Uid(_) => return Err(ValueError::Unsupported("uid")),
            _ => return Err(ValueError::Unsupported("unknown")),
        };
        Ok(value)
    }
}

/// Parse a property-list document (XML or binary) from a reader.
///
/// # Errors
///
/// Returns [`ValueError`] if the bytes are not a property list or contain
/// values outside the supported kinds.
pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Value, ValueError> {
    let raw = plist::Value::from_reader(reader)?;
    Value::try_from(raw)
}
