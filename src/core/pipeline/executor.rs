//! Pipeline execution implementation.

use super::CancellationToken;
use crate::core::hasher::{FrameHasher, HashAlgorithmKind, HasherConfig};
use crate::core::output::RangeWriter;
use crate::core::pool::{FrameFailure, HashWorkerPool};
use crate::core::scanner::{FrameScanner, ScanConfig, WalkDirScanner};
use crate::core::segmenter::{RangeList, Segmenter};
use crate::error::{ConfigError, RangeGenError};
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary,
    SegmentEvent,
};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// Scene ranges, in frame order
    pub ranges: RangeList,
    /// Frames found in the input directory
    pub total_frames: usize,
    /// Frames that produced a digest (and are covered by `ranges`)
    pub hashed_frames: usize,
    /// Frames that could not be hashed and are missing from `ranges`
    pub failures: Vec<FrameFailure>,
    /// Directory entries that could not be read (non-fatal)
    pub scan_errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            total_frames: self.total_frames,
            hashed_frames: self.hashed_frames,
            failed_frames: self.failures.len(),
            total_ranges: self.ranges.len(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Immutable run configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the frame images
    pub input_dir: PathBuf,
    /// Where to write the range list (None = don't write)
    pub output: Option<PathBuf>,
    /// Nibble distance at which a new scene starts
    pub threshold: u32,
    /// Maximum frames hashed at once
    pub jobs: NonZeroUsize,
    /// Noise level appended to every range
    pub noise: Option<u32>,
    /// Hash algorithm to use
    pub algorithm: HashAlgorithmKind,
    /// Hash grid size
    pub hash_size: u32,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output: None,
            threshold: 0,
            jobs: default_jobs(),
            noise: None,
            algorithm: HashAlgorithmKind::Blockhash,
            hash_size: 16,
            scan_config: ScanConfig::default(),
        }
    }
}

/// Host parallelism, or 1 if it can't be determined
pub fn default_jobs() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    hasher: Option<Box<dyn FrameHasher>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            hasher: None,
        }
    }

    /// Directory to read frames from
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    /// Write the range list to this file when the run completes
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = Some(path.into());
        self
    }

    /// Set the similarity threshold
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Limit concurrent hashing; 0 means host parallelism
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = NonZeroUsize::new(jobs).unwrap_or_else(default_jobs);
        self
    }

    /// Noise level for every range (None = omit the column)
    pub fn noise(mut self, noise: Option<u32>) -> Self {
        self.config.noise = noise;
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Set the hash grid size
    pub fn hash_size(mut self, size: u32) -> Self {
        self.config.hash_size = size;
        self
    }

    /// Accept these frame extensions instead of PNG
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.scan_config.extensions = Some(extensions);
        self
    }

    /// Use a custom hasher instead of one built from `algorithm`/`hash_size`
    pub fn hasher(mut self, hasher: Box<dyn FrameHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Validate and build the pipeline
    pub fn build(self) -> Result<Pipeline, RangeGenError> {
        if let Some(ref extensions) = self.config.scan_config.extensions {
            if extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
                return Err(ConfigError::NoExtensions.into());
            }
        }

        let hasher = match self.hasher {
            Some(hasher) => hasher,
            None => HasherConfig::new()
                .algorithm(self.config.algorithm)
                .hash_size(self.config.hash_size)
                .build()
                .map_err(ConfigError::Hasher)?,
        };

        Ok(Pipeline {
            config: self.config,
            hasher,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames in, scene ranges out
pub struct Pipeline {
    config: PipelineConfig,
    hasher: Box<dyn FrameHasher>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events or cancellation
    pub fn run(&self) -> Result<PipelineResult, RangeGenError> {
        self.run_with_events(&null_sender(), &CancellationToken::new())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(
        &self,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<PipelineResult, RangeGenError> {
        let result = self.execute(events, cancel);
        if let Err(RangeGenError::Cancelled) = result {
            events.send(Event::Pipeline(PipelineEvent::Cancelled));
        }
        result
    }

    fn execute(
        &self,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<PipelineResult, RangeGenError> {
        let start_time = Instant::now();
        let config = &self.config;

        // The pool is built first so a bad job count fails before any I/O.
        let pool = HashWorkerPool::new(config.jobs)?;

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = WalkDirScanner::new(config.scan_config.clone());
        let scan_result = scanner.scan_with_events(&config.input_dir, events)?;
        let scan_errors: Vec<String> = scan_result.errors.iter().map(|e| e.to_string()).collect();
        let frames = scan_result.frames;
        let total_frames = frames.len();

        // Phase 2: Hashing
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Hashing,
        }));

        let outcome = pool.hash_frames(&frames, self.hasher.as_ref(), events, cancel)?;

        if !outcome.failures.is_empty() {
            warn!(
                failed = outcome.failures.len(),
                "frames that failed to hash are left out of the ranges"
            );
        }

        // Phase 3: Segmenting
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Segmenting,
        }));
        events.send(Event::Segment(SegmentEvent::Started {
            total_frames: outcome.table.len(),
            threshold: config.threshold,
        }));

        let ranges = Segmenter::new(config.threshold)
            .with_noise(config.noise)
            .segment(&outcome.table);

        events.send(Event::Segment(SegmentEvent::Completed {
            total_ranges: ranges.len(),
        }));

        // Phase 4: Writing
        if let Some(ref output) = config.output {
            if cancel.is_cancelled() {
                return Err(RangeGenError::Cancelled);
            }
            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Writing,
            }));
            RangeWriter::write(&ranges, output)?;
        }

        let result = PipelineResult {
            hashed_frames: outcome.table.len(),
            ranges,
            total_frames,
            failures: outcome.failures,
            scan_errors,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            frames = result.total_frames,
            ranges = result.ranges.len(),
            duration_ms = result.duration_ms,
            "range generation finished"
        );

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: result.summary(),
        }));

        Ok(result)
    }
}
