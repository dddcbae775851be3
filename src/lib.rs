//! # range-gen
//!
//! Creates a list of scene ranges from the frames of a video.
//!
//! Frames are still images in one directory whose names sort in playback
//! order. Each frame gets a perceptual digest; whenever the digest of a
//! frame is too far from the previous one, a new scene starts.
//!
//! ## Architecture
//! - `core` - Enumeration, hashing, segmentation and output
//! - `events` - Progress reporting over channels
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{RangeGenError, Result};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the binary.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// output when `verbose` is true. Logs go to stderr.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "range_gen=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
