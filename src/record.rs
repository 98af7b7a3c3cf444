//! Per-node output record and CSV column layout

use std::fmt;

use serde::Serialize;

/// Column names, in the exact order rows are serialized.
pub const COLUMNS: [&str; 8] = [
    "path",
    "kind",
    "size_bytes",
    "size_human",
    "mtime_epoch",
    "mtime_iso",
    "digest",
    "error",
];

/// What kind of filesystem object a node is.
///
/// Symlinks and special files (sockets, devices, ...) are all `Other`; the
/// walker never follows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
    Other,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Directory => write!(f, "directory"),
            NodeKind::Other => write!(f, "other"),
        }
    }
}

/// One CSV row.
///
/// Fields that do not apply (size of a directory, digest with hashing off,
/// metadata of a node that vanished mid-scan) serialize as empty strings,
/// never as omitted columns. A node whose inspection failed still produces
/// a record, with `error` populated and the metadata fields empty.
#[derive(Debug, Clone, Serialize)]
pub struct NodeRecord {
    pub path: String,
    pub kind: NodeKind,
    pub size_bytes: Option<u64>,
    pub size_human: String,
    pub mtime_epoch: Option<i64>,
    pub mtime_iso: String,
    pub digest: String,
    pub error: String,
}

impl NodeRecord {
    /// An empty record for `path`: all metadata fields at their sentinel
    /// values. The inspector fills in what it can.
    pub fn empty(path: String, kind: NodeKind) -> Self {
        Self {
            path,
            kind,
            size_bytes: None,
            size_human: String::new(),
            mtime_epoch: None,
            mtime_iso: String::new(),
            digest: String::new(),
            error: String::new(),
        }
    }

    /// Append a failure description, keeping earlier ones.
    pub fn push_error(&mut self, msg: impl AsRef<str>) {
        if !self.error.is_empty() {
            self.error.push_str("; ");
        }
        self.error.push_str(msg.as_ref());
    }
}

/// Format a byte count into binary units with one decimal (KiB, MiB, ...).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = UNITS[0];
    for candidate in UNITS {
        value /= 1024.0;
        unit = candidate;
        if value < 1024.0 {
            break;
        }
    }
    format!("{:.1} {}", value, unit)
}
