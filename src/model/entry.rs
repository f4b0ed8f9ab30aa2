//! The top-level journal entry.

use jiff::Timestamp;
use serde::Serialize;

use crate::identity;

use super::{Creator, Location, Music, Weather};

/// Errors from checking an entry's structure before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing identity")]
    MissingIdentity,
}

/// A single journal entry.
///
/// The identity is fixed at construction: either freshly generated by
/// [`Entry::new`] or taken from a decoded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entry {
    #[serde(rename = "identity")]
    pub(crate) id: String,
    pub text: String,
    pub activity: String,
    pub step_count: u64,
    pub ignore_step_count: bool,
    pub starred: bool,
    pub publish_url: Option<String>,
    pub tags: Vec<String>,
    /// IANA time zone name, e.g. `America/Chicago`.
    pub time_zone: String,
    pub creation_date: Option<Timestamp>,
    pub creator: Option<Creator>,
    pub location: Option<Location>,
    pub weather: Option<Weather>,
    pub music: Option<Music>,
}

impl Entry {
    /// Creates an empty entry with a freshly generated identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: identity::generate_identity(),
            ..Self::default()
        }
    }

    /// The entry's identity: 32 uppercase hex characters for stored entries.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.id
    }

    /// Checks the structural invariants required before persisting.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingIdentity`] when the identity is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingIdentity);
        }
        Ok(())
    }
}
