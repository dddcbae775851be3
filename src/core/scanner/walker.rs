//! Frame directory listing using walkdir.

use super::{filter::FrameFilter, FrameFile, FrameId, FrameScanner, ScanResult};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the frame scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links to frame files
    pub follow_symlinks: bool,
    /// Extensions to accept (None = PNG only)
    pub extensions: Option<Vec<String>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            extensions: None,
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: FrameFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = match config.extensions {
            Some(ref extensions) => FrameFilter::with_extensions(extensions),
            None => FrameFilter::new(),
        };

        Self { config, filter }
    }

    fn root_error(dir: &Path, err: walkdir::Error) -> ScanError {
        if err.io_error().map(|e| e.kind()) == Some(std::io::ErrorKind::PermissionDenied) {
            ScanError::PermissionDenied {
                path: dir.to_path_buf(),
            }
        } else {
            ScanError::ReadDirectory {
                path: dir.to_path_buf(),
                source: err.into(),
            }
        }
    }
}

impl FrameScanner for WalkDirScanner {
    fn scan(&self, dir: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(dir, &crate::events::null_sender())
    }

    fn scan_with_events(&self, dir: &Path, events: &EventSender) -> Result<ScanResult, ScanError> {
        if !dir.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            path: dir.to_path_buf(),
        }));

        let mut frames = Vec::new();
        let mut errors = Vec::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks);

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(Self::root_error(dir, e)),
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let error = ScanError::ReadDirectory {
                        path: path.clone(),
                        source: e.into(),
                    };
                    warn!(path = %path.display(), "skipping unreadable entry");
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    errors.push(error);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.filter.should_include(entry.path()) {
                continue;
            }

            match entry.file_name().to_str() {
                Some(name) => frames.push(FrameFile {
                    id: FrameId::new(name),
                    path: entry.path().to_path_buf(),
                }),
                None => {
                    let error = ScanError::InvalidFileName {
                        path: entry.path().to_path_buf(),
                    };
                    warn!("{}", error);
                    events.send(Event::Scan(ScanEvent::Error {
                        path: entry.path().to_path_buf(),
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        frames.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(dir = %dir.display(), frames = frames.len(), "enumerated frames");

        events.send(Event::Scan(ScanEvent::Completed {
            total_frames: frames.len(),
        }));

        Ok(ScanResult { frames, errors })
    }
}
