//! Exclusion matcher - glob patterns that prune traversal
//!
//! A matched path is skipped entirely: matched directories are pruned, so
//! their descendants are never listed, inspected, or recorded.

use std::path::Path;

use glob::Pattern;

use crate::error::ScanError;

/// Ordered set of shell-glob exclusion patterns.
///
/// Patterns containing a path separator match against the full path;
/// bare patterns match against the file name only. The running program's
/// own path and the output destination are appended unconditionally at
/// construction, so a run never records itself or its own output.
/// Immutable once built.
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    /// Build from user patterns plus paths the run must never report on
    /// (the binary itself, the output file, the log file).
    pub fn build(user_patterns: &[String], self_paths: &[&Path]) -> Result<Self, ScanError> {
        let mut patterns = Vec::with_capacity(user_patterns.len() + self_paths.len());

        for raw in user_patterns {
            let pattern = Pattern::new(raw).map_err(|source| ScanError::BadPattern {
                pattern: raw.clone(),
                source,
            })?;
            patterns.push(pattern);
        }

        for path in self_paths {
            // Escaped literal, so paths containing glob metacharacters
            // still self-exclude exactly.
            let escaped = Pattern::escape(&path.to_string_lossy());
            let pattern = Pattern::new(&escaped).map_err(|source| ScanError::BadPattern {
                pattern: escaped.clone(),
                source,
            })?;
            patterns.push(pattern);
        }

        Ok(Self { patterns })
    }

    /// Pure predicate: should this candidate be skipped?
    pub fn matches(&self, path: &Path) -> bool {
        let full = path.to_string_lossy();
        let name = path.file_name().map(|n| n.to_string_lossy());

        self.patterns.iter().any(|pattern| {
            if pattern.as_str().contains('/') {
                pattern.matches(&full)
            } else {
                name.as_deref().is_some_and(|n| pattern.matches(n))
            }
        })
    }

    /// Pattern strings, for the startup log.
    pub fn pattern_strings(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.as_str()).collect()
    }
}
