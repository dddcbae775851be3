//! # Scanner Module
//!
//! Enumerates the frames of a video that were dumped as still images into
//! a single directory.
//!
//! Frames are identified by file name. File names must sort lexically in
//! the same order as the frames appear in the video (`000001.png`,
//! `000002.png`, ...). Subdirectories are not searched.
//!
//! ## Example
//! ```rust,ignore
//! use range_gen::core::scanner::{FrameScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let frames = scanner.scan(Path::new("/tmp/frames"))?;
//! ```

mod filter;
mod walker;

pub use filter::FrameFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of one input frame.
///
/// Ordering is plain byte-wise string ordering, which is what ties frame
/// names to temporal order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameId(String);

impl FrameId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A discovered frame file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameFile {
    /// Frame identifier (the file name)
    pub id: FrameId,
    /// Full path used to load the image
    pub path: PathBuf,
}

/// Result of enumerating a frame directory
#[derive(Debug)]
pub struct ScanResult {
    /// Frames found, sorted by id
    pub frames: Vec<FrameFile>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for frame enumerators
pub trait FrameScanner: Send + Sync {
    /// Enumerate frames in `dir`
    fn scan(&self, dir: &Path) -> Result<ScanResult, ScanError>;

    /// Enumerate with progress reporting via events
    fn scan_with_events(&self, dir: &Path, events: &EventSender) -> Result<ScanResult, ScanError>;
}
