//! Photo files: opaque blobs named by entry identity.

use std::fs;

use super::{Journal, Result, StorageError};

impl Journal {
    /// Returns filesystem metadata for the entry's photo.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the entry has no photo, or
    /// [`StorageError::Io`] if it cannot be inspected.
    pub fn photo_stat(&self, identity: &str) -> Result<fs::Metadata> {
        let path = self.photo_path(identity);
        fs::metadata(&path).map_err(|e| StorageError::from_io(&path, e))
    }

    /// Opens the entry's photo for reading.
    ///
    /// The handle is owned by the caller and closed when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the entry has no photo, or
    /// [`StorageError::Io`] if it cannot be opened.
    pub fn open_photo(&self, identity: &str) -> Result<fs::File> {
        let path = self.photo_path(identity);
        fs::File::open(&path).map_err(|e| StorageError::from_io(&path, e))
    }
}
