//! # Pipeline Module
//!
//! Orchestrates a full run.
//!
//! ## Pipeline Stages
//! 1. **Scan** - List the frame files in the input directory
//! 2. **Hash** - Compute a digest per frame on a bounded worker pool
//! 3. **Segment** - Walk the digests in frame order and cut scenes
//! 4. **Write** - Atomically replace the output file (when configured)
//!
//! Hashing order is nondeterministic; everything after the hash barrier
//! is not, so the output only depends on the frames and the settings.

mod cancel;
mod executor;

pub use cancel::CancellationToken;
pub use executor::{default_jobs, Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
