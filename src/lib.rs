//! lscsv - walks directory trees and records per-node metadata as CSV

pub mod error;
pub mod inspect;
pub mod interrupt;
pub mod output;
pub mod record;
pub mod scan;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::ScanError;
pub use inspect::{InspectOptions, inspect};
pub use interrupt::{StopFlag, install_handler};
pub use output::CsvSink;
pub use record::{COLUMNS, NodeKind, NodeRecord, format_size};
pub use scan::{ExcludeSet, ScanConfig, ScanOutcome, ScanSummary, Walker, relativize};
