//! Tree Walker - ordered, interruptible traversal
//!
//! Single-threaded and sequential by design: one node at a time bounds
//! filesystem load and gives the inter-node delay meaning. Records are
//! streamed to the sink in exactly visit order (pre-order depth-first per
//! target, targets in argument order).

use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;
use std::thread;

use tracing::{debug, info, warn};

use super::config::ScanConfig;
use super::exclude::ExcludeSet;
use super::utils::relativize;
use crate::error::ScanError;
use crate::inspect::inspect;
use crate::interrupt::StopFlag;
use crate::output::CsvSink;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every reachable node was visited.
    Completed,
    /// A stop was requested; remaining entries were abandoned after the
    /// in-flight record was written and the sink flushed.
    Interrupted,
}

/// Per-run counters, discarded when the run ends.
#[derive(Debug)]
pub struct ScanSummary {
    /// Nodes visited (rows written).
    pub visited: u64,
    /// Rows with a populated error column.
    pub node_errors: u64,
    pub outcome: ScanOutcome,
}

/// Orchestrates the recursive descent.
///
/// The walker exclusively owns the traversal cursor and the sink while
/// running; the stop flag is only ever read here, never written.
pub struct Walker {
    config: ScanConfig,
    excludes: ExcludeSet,
    stop: StopFlag,
}

impl Walker {
    pub fn new(config: ScanConfig, excludes: ExcludeSet, stop: StopFlag) -> Self {
        Self {
            config,
            excludes,
            stop,
        }
    }

    /// Walk all targets, streaming one record per visited node into `sink`.
    ///
    /// The sink is flushed on every exit path, including fatal errors, so
    /// output is never left with a truncated row.
    pub fn run<W: Write>(&self, sink: &mut CsvSink<W>) -> Result<ScanSummary, ScanError> {
        let mut summary = ScanSummary {
            visited: 0,
            node_errors: 0,
            outcome: ScanOutcome::Completed,
        };

        match self.walk_targets(sink, &mut summary) {
            Ok(()) => sink.flush()?,
            Err(err) => {
                // Keep whatever was already written well-formed.
                let _ = sink.flush();
                return Err(err);
            }
        }

        if self.stop.is_set() {
            summary.outcome = ScanOutcome::Interrupted;
        }
        info!(
            visited = summary.visited,
            node_errors = summary.node_errors,
            interrupted = matches!(summary.outcome, ScanOutcome::Interrupted),
            "scan finished"
        );
        Ok(summary)
    }

    fn walk_targets<W: Write>(
        &self,
        sink: &mut CsvSink<W>,
        summary: &mut ScanSummary,
    ) -> Result<(), ScanError> {
        for target in &self.config.targets {
            if self.stop.is_set() {
                break;
            }
            // A target that is gone entirely is fatal, unlike a child
            // that vanishes mid-scan.
            let meta = fs::symlink_metadata(target)
                .map_err(|_| ScanError::MissingTarget(target.clone()))?;
            if self.excludes.matches(target) {
                debug!(target = %target.display(), "target excluded, skipping");
                continue;
            }
            info!(target = %target.display(), "scanning target");
            let flow = if meta.is_dir() {
                // The target directory itself gets no row; its children do.
                self.walk_dir(target, sink, summary)?
            } else {
                self.visit(target, sink, summary)?
            };
            if flow.is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Depth-first, pre-order descent over one directory.
    ///
    /// Entries are visited in sorted name order. The listing is a snapshot:
    /// entries deleted afterwards become error rows, entries created
    /// afterwards are never discovered.
    fn walk_dir<W: Write>(
        &self,
        dir: &Path,
        sink: &mut CsvSink<W>,
        summary: &mut ScanSummary,
    ) -> Result<ControlFlow<()>, ScanError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                // The directory's own row was already written when it was
                // visited as an entry; an unlistable subtree is skipped,
                // not fatal.
                warn!(dir = %dir.display(), error = %err, "cannot list directory, skipping subtree");
                return Ok(ControlFlow::Continue(()));
            }
        };

        let mut entries: Vec<_> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    // No path is available for a row at this point; the
                    // loss still has to be visible somewhere.
                    warn!(dir = %dir.display(), error = %err, "skipping unreadable directory entry");
                    None
                }
            })
            .collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            if self.stop.is_set() {
                return Ok(ControlFlow::Break(()));
            }

            let path = entry.path();
            if self.excludes.matches(&path) {
                debug!(path = %path.display(), "excluded, pruning");
                continue;
            }

            // DirEntry::file_type does not follow symlinks, so a symlinked
            // directory is recorded but never descended into.
            let descend = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            if self.visit(&path, sink, summary)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
            if descend && self.walk_dir(&path, sink, summary)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Inspect one node, emit its record, throttle, poll the stop flag.
    fn visit<W: Write>(
        &self,
        path: &Path,
        sink: &mut CsvSink<W>,
        summary: &mut ScanSummary,
    ) -> Result<ControlFlow<()>, ScanError> {
        let display = relativize(path, self.config.relative_to.as_deref())
            .to_string_lossy()
            .into_owned();
        let record = inspect(path, display, self.config.inspect);
        if !record.error.is_empty() {
            summary.node_errors += 1;
        }
        sink.write(&record)?;
        summary.visited += 1;

        if !self.config.delay.is_zero() {
            thread::sleep(self.config.delay);
        }

        if self.stop.is_set() {
            Ok(ControlFlow::Break(()))
        } else {
            Ok(ControlFlow::Continue(()))
        }
    }
}
