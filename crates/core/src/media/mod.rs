//! Media metadata produced by classification and consumed by path planning.
//!
//! A [`MediaInfo`] is created fresh for every file, optionally corrected once
//! against the metadata catalog, and discarded after the destination path is
//! planned. It is never persisted.

mod types;

pub use types::{Category, MediaInfo};
