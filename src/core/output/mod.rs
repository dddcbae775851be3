//! # Output Module
//!
//! Writes the range list as tab-separated lines:
//!
//! ```text
//! 000001.png	000120.png
//! 000121.png	000300.png	5
//! ```
//!
//! The third column is the noise level and is only present when one was
//! configured. Lines end with the platform's native line ending.
//!
//! The file is written next to its destination under a temporary name and
//! renamed into place, so a failed or interrupted run leaves either the old
//! file or no file at all.

use crate::core::segmenter::{Range, RangeList};
use crate::error::OutputError;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Native line ending
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Native line ending
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.start, self.end)?;
        if let Some(noise) = self.noise {
            write!(f, "\t{}", noise)?;
        }
        Ok(())
    }
}

impl RangeList {
    /// All ranges, one terminated line each. Empty list, empty string.
    pub fn render(&self) -> String {
        self.iter()
            .map(|range| format!("{}{}", range, LINE_ENDING))
            .collect()
    }
}

/// Writes range lists to disk
pub struct RangeWriter;

impl RangeWriter {
    /// Write `ranges` to `path`, replacing any existing file atomically
    pub fn write(ranges: &RangeList, path: &Path) -> Result<(), OutputError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| OutputError::CreateTemp {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::write_to(ranges, &mut temp)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| OutputError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;

        temp.persist(path).map_err(|e| OutputError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        debug!(path = %path.display(), ranges = ranges.len(), "wrote range list");
        Ok(())
    }

    /// Write the rendered lines to any writer
    pub fn write_to<W: Write>(ranges: &RangeList, mut writer: W) -> std::io::Result<()> {
        writer.write_all(ranges.render().as_bytes())?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::FrameId;
    use std::fs;
    use tempfile::TempDir;

    fn range(start: &str, end: &str) -> Range {
        Range::new(FrameId::from(start), FrameId::from(end))
    }

    #[test]
    fn range_without_noise_has_two_columns() {
        assert_eq!(range("a.png", "b.png").to_string(), "a.png\tb.png");
    }

    #[test]
    fn range_with_noise_has_three_columns() {
        let r = range("a.png", "b.png").with_noise(Some(5));
        assert_eq!(r.to_string(), "a.png\tb.png\t5");
    }

    #[test]
    fn noise_of_zero_is_still_written() {
        let r = range("a.png", "a.png").with_noise(Some(0));
        assert_eq!(r.to_string(), "a.png\ta.png\t0");
    }

    #[test]
    fn render_terminates_every_line() {
        let ranges = RangeList::from(vec![range("a.png", "b.png"), range("c.png", "c.png")]);
        assert_eq!(
            ranges.render(),
            format!("a.png\tb.png{eol}c.png\tc.png{eol}", eol = LINE_ENDING)
        );
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert_eq!(RangeList::default().render(), "");
    }

    #[test]
    fn write_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ranges.txt");
        fs::write(&path, "stale contents\n").unwrap();

        let ranges = RangeList::from(vec![range("a.png", "c.png")]);
        RangeWriter::write(&ranges, &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("a.png\tc.png{}", LINE_ENDING)
        );
        // Only the output file remains; the temporary was renamed.
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("ranges.txt");

        let result = RangeWriter::write(&RangeList::default(), &path);
        assert!(matches!(result, Err(OutputError::CreateTemp { .. })));
        assert!(!path.exists());
    }
}
