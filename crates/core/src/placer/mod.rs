//! Placer module for materializing files in the library.
//!
//! A placement is one of two filesystem primitives: a hard link (the
//! download stays seedable) or a rename. There is no copy fallback, and an
//! existing destination is left alone.
//!
//! # Example
//!
//! ```ignore
//! use autoshelf_core::placer::{FsPlacer, Placer, PlacementMode, PlacementResult};
//!
//! let placer = FsPlacer::new();
//! match placer.place(&source, &destination, PlacementMode::HardLink).await {
//!     PlacementResult::Placed { destination, .. } => println!("placed {}", destination.display()),
//!     PlacementResult::SkippedExisting { .. } => println!("already there"),
//!     PlacementResult::Failed(e) => eprintln!("{e}"),
//! }
//! ```

mod error;
mod fs_placer;
mod traits;
mod types;

pub use error::PlacerError;
pub use fs_placer::FsPlacer;
pub use traits::Placer;
pub use types::{PlacementMode, PlacementResult};
