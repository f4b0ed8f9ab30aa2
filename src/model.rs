//! Journal data model.
//!
//! An [`Entry`] owns its nested records exclusively. Optional records are
//! `Option`s: an absent record is distinct from one that is present but empty.

mod creator;
mod entry;
mod location;
mod music;
mod weather;

pub use creator::Creator;
pub use entry::{Entry, ValidationError};
pub use location::{Coordinate, Location, Region};
pub use music::Music;
pub use weather::Weather;
