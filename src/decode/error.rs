//! Errors from mapping a value tree onto the entry schema.

use crate::value::Kind;

/// A document whose shape does not fit the entry schema.
///
/// Paths are dotted from the root, e.g. `Location.Region.Center.Latitude`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed document: expected a dictionary at the root, found {found}")]
    MalformedDocument { found: Kind },

    #[error("{}: expected {expected}, found {found}", display_path(.path, .index))]
    TypeMismatch {
        path: String,
        /// Position within an array field.
        index: Option<usize>,
        expected: Kind,
        found: Kind,
    },

    #[error("{path}: value cannot be represented as {expected} without loss")]
    Unrepresentable { path: String, expected: Kind },

    #[error("unknown field: {path}")]
    UnknownField { path: String, key: String },
}

impl DecodeError {
    /// The dotted path of the offending field, if there is one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MalformedDocument { .. } => None,
            Self::TypeMismatch { path, .. }
            | Self::Unrepresentable { path, .. }
            | Self::UnknownField { path, .. } => Some(path),
        }
    }
}

#[allow(clippy::ref_option)]
fn display_path(path: &str, index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("{path}[{i}]"),
        None => path.to_string(),
    }
}
