//! Entry identities.
//!
//! Stored entries are named by a random 128-bit identifier rendered as
//! 32 uppercase hex characters with no separators, e.g.
//! `FF755C6D7D9B4A5FBC4E41C07D622C65`. The same string names the entry file
//! and the photo file.

use uuid::Uuid;

/// Number of characters in a rendered identity.
pub const IDENTITY_LEN: usize = 32;

/// Generate a fresh random identity.
#[must_use]
pub fn generate_identity() -> String {
    format!("{:X}", Uuid::new_v4().simple())
}

/// Whether `s` has the shape of a stored identity.
///
/// Lookups never require this; accessors treat identities as opaque keys.
#[must_use]
pub fn is_identity(s: &str) -> bool {
    s.len() == IDENTITY_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}
