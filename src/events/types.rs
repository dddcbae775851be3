//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the range generation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Frame enumeration events
    Scan(ScanEvent),
    /// Hashing phase events
    Hash(HashEvent),
    /// Segmentation phase events
    Segment(SegmentEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events while enumerating frames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Enumeration has started
    Started { path: PathBuf },
    /// An entry could not be read but enumeration continues
    Error { path: PathBuf, message: String },
    /// Enumeration completed
    Completed { total_frames: usize },
}

/// Events during the hashing phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// Hashing has started
    Started { total_frames: usize, jobs: usize },
    /// Progress update during hashing
    Progress(HashProgress),
    /// A frame failed to hash and is excluded from the ranges
    Error { frame: String, message: String },
    /// Hashing completed (all workers have finished)
    Completed { hashed: usize, failed: usize },
}

/// Progress information during hashing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    /// Number of frames finished so far (hashed or failed)
    pub completed: usize,
    /// Total number of frames to hash
    pub total: usize,
    /// Frame that just finished
    pub current_frame: String,
}

/// Events during segmentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SegmentEvent {
    /// Segmentation has started
    Started { total_frames: usize, threshold: u32 },
    /// Segmentation completed
    Completed { total_ranges: usize },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline was cancelled
    Cancelled,
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Hashing,
    Segmenting,
    Writing,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Frames found in the input directory
    pub total_frames: usize,
    /// Frames that produced a digest
    pub hashed_frames: usize,
    /// Frames that failed to hash
    pub failed_frames: usize,
    /// Number of scene ranges produced
    pub total_ranges: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Hashing => write!(f, "Hashing"),
            PipelinePhase::Segmenting => write!(f, "Segmenting"),
            PipelinePhase::Writing => write!(f, "Writing"),
        }
    }
}
