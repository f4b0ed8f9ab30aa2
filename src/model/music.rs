//! What was playing when an entry was written.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Music {
    pub album: String,
    pub artist: String,
    pub track: String,
    /// Stored as text in the document, not as a number.
    pub album_year: String,
}
