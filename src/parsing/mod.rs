//! Raw archive shapes and text repair.
//!
//! Types here mirror the exported JSON as closely as possible and carry no
//! validation beyond what serde enforces; the [loader](crate::loader) checks
//! the top-level fields and the [normalizer](crate::normalizer) checks each
//! record.

pub mod archive;

pub use archive::{RawFragment, RawRecord, repair_text};
