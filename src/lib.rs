#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]

//! Groups CD-box snoRNAs into families. Members of a family share the same
//! interaction region, the seed sequence directly 5' of the D-box that pairs
//! with the target RNA.
//!
//! Records come from a headerless 20 column table (see [`table::COLUMNS`]),
//! are validated into [`snorna::CdSnoRna`] and grouped by
//! [`family::group_families`].

pub mod error;
pub mod family;
pub mod snorna;
pub mod table;

pub use crate::error::{Error, RecordError};
pub use crate::family::{group_families, Families, GroupOptions, SnoType};
pub use crate::snorna::{CdSnoRna, DEFAULT_SEED_LENGTH};

/// Crate wide result with the fatal [`Error`]
pub type Result<T> = std::result::Result<T, crate::error::Error>;
