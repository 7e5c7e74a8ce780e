// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod stats;

pub use stats::*;
