//! Read access to a journal store on disk.
//!
//! A store is a directory holding one property-list file per entry and an
//! optional photo per entry, both named by the entry's identity:
//!
//! ```text
//! <root>/
//!   entries/<IDENTITY>.doentry   # one property-list document per entry
//!   photos/<IDENTITY>.jpg        # optional photo
//! ```
//!
//! The store is never written to. Lookups treat identities as opaque keys
//! and perform no normalization.

mod entries;
mod photos;

pub use entries::Visit;

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

use crate::decode::{DecodeError, Decoder, UnknownFields};
use crate::value::ValueError;

/// Extension of entry files, matched case-insensitively when listing.
pub const ENTRY_EXTENSION: &str = "doentry";

/// Extension of photo files.
pub const PHOTO_EXTENSION: &str = "jpg";

/// Errors that can occur while reading a store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("not found: {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unreadable property list {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: ValueError,
    },

    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// An error raised by a traversal visitor, tagged with the file being visited.
    #[error("{source} (file: {file})")]
    Visitor {
        file: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Whether the requested entry, photo, or directory does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether a file was read but its contents did not decode.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::Decode { .. })
    }

    /// Reclassifies an I/O error on `path`, separating "does not exist".
    fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path, source }
        } else {
            Self::Io { path, source }
        }
    }
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// A journal store rooted at a directory.
#[derive(Debug, Clone)]
pub struct Journal {
    root: PathBuf,
    decoder: Decoder,
}

impl Journal {
    /// Opens the store at `root`. Nothing is read until an operation needs it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            decoder: Decoder::default(),
        }
    }

    /// Sets how entry documents with unmapped keys are treated.
    #[must_use]
    pub fn with_unknown_fields(mut self, policy: UnknownFields) -> Self {
        self.decoder = Decoder::new(policy);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entries_dir(&self) -> PathBuf {
        self.root.join("entries")
    }

    fn photos_dir(&self) -> PathBuf {
        self.root.join("photos")
    }

    fn entry_path(&self, identity: &str) -> PathBuf {
        self.entries_dir()
            .join(format!("{identity}.{ENTRY_EXTENSION}"))
    }

    fn photo_path(&self, identity: &str) -> PathBuf {
        self.photos_dir()
            .join(format!("{identity}.{PHOTO_EXTENSION}"))
    }
}
