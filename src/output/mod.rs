//! Output Generation
//!
//! Debug/inspection snapshots of ensemble state.

pub mod snapshot;

pub use snapshot::{snapshot, BandSnapshot, NeedSnapshot, NeedsSnapshot};
