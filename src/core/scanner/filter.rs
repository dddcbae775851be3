//! Extension filter for frame files.

use std::collections::HashSet;
use std::path::Path;

/// Accepts files whose extension is in a configured set (case-insensitive)
pub struct FrameFilter {
    extensions: HashSet<String>,
}

impl FrameFilter {
    /// Frames are PNG by default
    pub fn new() -> Self {
        Self::with_extensions(["png"])
    }

    /// Accept the given extensions instead (leading dots are ignored)
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Check if a file should be treated as a frame
    pub fn should_include(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for FrameFilter {
    fn default() -> Self {
        Self::new()
    }
}
