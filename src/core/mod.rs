//! # Core Module
//!
//! The scene range engine, independent of any front end.
//!
//! ## Modules
//! - `scanner` - Lists frame files in the input directory
//! - `hasher` - Computes a perceptual digest per frame
//! - `table` - Collects digests from concurrent workers
//! - `pool` - Runs hashing on a bounded worker pool
//! - `segmenter` - Cuts the sorted digests into scene ranges
//! - `output` - Renders and writes the range list
//! - `pipeline` - Orchestrates the full workflow

pub mod hasher;
pub mod output;
pub mod pipeline;
pub mod pool;
pub mod scanner;
pub mod segmenter;
pub mod table;

// Re-export commonly used types
pub use hasher::{Digest, FrameHasher, HashAlgorithmKind};
pub use scanner::{FrameFile, FrameId};
pub use segmenter::{nibble_distance, Range, RangeList};
