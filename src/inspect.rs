//! Node Inspector - extracts metadata for a single filesystem path
//!
//! `inspect` never returns an error: any failure (permission denied, node
//! vanished between listing and stat, unreadable content) is folded into
//! the record's `error` column so a bad node costs one row, not the run.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing::warn;

use crate::record::{NodeKind, NodeRecord, format_size};

/// Buffer size for streaming file content through the hasher.
const HASH_BUF_SIZE: usize = 64 * 1024;

/// What the inspector should compute per node.
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectOptions {
    /// Compute a content digest for regular files. This reads every file
    /// in full, so it dominates scan latency when enabled.
    pub hash: bool,
}

/// Produce the record for a single node.
///
/// `display_path` is the already-relativized path stored in the row; the
/// filesystem is always queried through the absolute `path`.
pub fn inspect(path: &Path, display_path: String, opts: InspectOptions) -> NodeRecord {
    // Don't follow symlinks: a link is reported as its own node, kind
    // `other`, and never descended into.
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            let mut record = NodeRecord::empty(display_path, NodeKind::Other);
            record.push_error(format!("cannot stat: {}", err));
            warn!(path = %path.display(), error = %err, "failed to stat node");
            return record;
        }
    };

    let kind = if meta.is_dir() {
        NodeKind::Directory
    } else if meta.is_file() {
        NodeKind::File
    } else {
        NodeKind::Other
    };

    let mut record = NodeRecord::empty(display_path, kind);

    if kind == NodeKind::File {
        record.size_bytes = Some(meta.len());
        record.size_human = format_size(meta.len());
    }

    match meta.modified() {
        Ok(mtime) => {
            let (epoch, iso) = format_mtime(mtime);
            record.mtime_epoch = Some(epoch);
            record.mtime_iso = iso;
        }
        Err(err) => {
            record.push_error(format!("cannot read mtime: {}", err));
            warn!(path = %path.display(), error = %err, "failed to read mtime");
        }
    }

    if opts.hash && kind == NodeKind::File {
        match hash_file(path) {
            Ok(digest) => record.digest = digest,
            Err(err) => {
                record.push_error(format!("cannot hash content: {}", err));
                warn!(path = %path.display(), error = %err, "failed to hash file");
            }
        }
    }

    record
}

/// Epoch seconds plus a local-time ISO-8601 string. No timezone conversion
/// is attempted; the string reflects the filesystem's mtime as local time.
fn format_mtime(mtime: SystemTime) -> (i64, String) {
    let local: DateTime<Local> = mtime.into();
    let iso = local.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string();
    (local.timestamp(), iso)
}

/// Stream a file's bytes through blake3 and return the hex digest.
fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; HASH_BUF_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}
