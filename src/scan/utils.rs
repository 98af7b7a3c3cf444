//! Shared path helpers for the traversal engine

use std::path::{Path, PathBuf};

/// Rewrite `path` relative to `base`, for display and storage only.
///
/// Fail-soft: if `path` is not a descendant of `base` the original path is
/// returned unchanged. A `None` base is the identity function.
pub fn relativize(path: &Path, base: Option<&Path>) -> PathBuf {
    match base {
        Some(base) => path
            .strip_prefix(base)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf()),
        None => path.to_path_buf(),
    }
}
