//! Reader for Day One journal stores.
//!
//! A store is a directory of property-list entry files plus a photo
//! directory. [`Journal`] lists, reads, and traverses the entries, decoding
//! each document into a typed [`Entry`] through [`decode`].

pub mod config;
pub mod decode;
pub mod identity;
pub mod model;
pub mod storage;
pub mod value;

pub use decode::{DecodeError, Decoder, UnknownFields};
pub use identity::generate_identity;
pub use model::{Coordinate, Creator, Entry, Location, Music, Region, ValidationError, Weather};
pub use storage::{Journal, StorageError, Visit};
pub use value::{Kind, Value, ValueError};
