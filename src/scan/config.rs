//! Configuration for a scan run

use std::path::PathBuf;
use std::time::Duration;

use crate::inspect::InspectOptions;

/// Already-validated configuration handed to the walker.
///
/// The CLI layer owns all validation (targets exist, relative base exists,
/// patterns parse); the core performs none.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Roots to walk, in argument order. Argument order is the only
    /// externally guaranteed ordering between targets.
    pub targets: Vec<PathBuf>,
    /// Base to rewrite stored paths against, for display only.
    pub relative_to: Option<PathBuf>,
    /// Fixed pause between node visits. Zero disables throttling.
    pub delay: Duration,
    /// Per-node inspection options (content hashing).
    pub inspect: InspectOptions,
}
