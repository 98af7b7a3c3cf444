//! Traversal engine
//!
//! The walker enumerates each target depth-first, pre-order, pruning
//! excluded paths before descent, inspecting every surviving node, and
//! streaming records into the CSV sink one at a time.

mod config;
mod exclude;
mod utils;
mod walker;

pub use config::ScanConfig;
pub use exclude::ExcludeSet;
pub use utils::relativize;
pub use walker::{ScanOutcome, ScanSummary, Walker};
