//! # Segmenter Module
//!
//! Turns frame digests into scene ranges.
//!
//! ## How It Works
//! 1. Walk the frozen hash table in ascending frame order
//! 2. Measure the nibble distance between each frame and the one before it
//! 3. When the distance reaches the threshold, close the current range on
//!    the previous frame and open a new one
//! 4. Close the last range on the last frame
//!
//! The walk only trusts frame order, never the order in which hashes were
//! computed, so the same digests always give the same ranges.

mod distance;

pub use distance::nibble_distance;

use crate::core::hasher::Digest;
use crate::core::scanner::FrameId;
use crate::core::table::FrozenHashTable;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One scene: an inclusive run of consecutive frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: FrameId,
    pub end: FrameId,
    /// Noise level to apply to the whole scene, if configured
    pub noise: Option<u32>,
}

impl Range {
    pub fn new(start: FrameId, end: FrameId) -> Self {
        Self {
            start,
            end,
            noise: None,
        }
    }

    pub fn with_noise(mut self, noise: Option<u32>) -> Self {
        self.noise = noise;
        self
    }

    pub fn is_single_frame(&self) -> bool {
        self.start == self.end
    }
}

/// Scene ranges in frame order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeList {
    ranges: Vec<Range>,
}

impl RangeList {
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Range> {
        self.ranges.iter()
    }

    pub fn as_slice(&self) -> &[Range] {
        &self.ranges
    }
}

impl From<Vec<Range>> for RangeList {
    fn from(ranges: Vec<Range>) -> Self {
        Self { ranges }
    }
}

impl<'a> IntoIterator for &'a RangeList {
    type Item = &'a Range;
    type IntoIter = std::slice::Iter<'a, Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

/// Parse a similarity threshold given on the command line
pub fn parse_threshold(value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidThreshold {
            value: value.to_string(),
        })
}

/// Single-pass range builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    threshold: u32,
    noise: Option<u32>,
}

impl Segmenter {
    /// Cut wherever the distance to the previous frame is `>= threshold`
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            noise: None,
        }
    }

    /// Attach the same noise level to every range
    pub fn with_noise(mut self, noise: Option<u32>) -> Self {
        self.noise = noise;
        self
    }

    /// Build the ranges for a completed hash table.
    ///
    /// An empty table gives an empty list. The first frame has nothing to be
    /// compared with and never opens a range on its own, even at threshold 0.
    pub fn segment(&self, table: &FrozenHashTable) -> RangeList {
        let mut ranges = Vec::new();
        let mut range_start: Option<&FrameId> = None;
        let mut previous: Option<(&FrameId, &Digest)> = None;

        for (frame, digest) in table.iter() {
            let start = *range_start.get_or_insert(frame);

            if let Some((previous_frame, previous_digest)) = previous {
                let distance = nibble_distance(previous_digest.as_str(), digest.as_str());
                if distance >= self.threshold {
                    trace!(%frame, distance, "scene cut");
                    ranges.push(self.close(start, previous_frame));
                    range_start = Some(frame);
                }
            }

            previous = Some((frame, digest));
        }

        if let (Some(start), Some((last, _))) = (range_start, previous) {
            ranges.push(self.close(start, last));
        }

        debug!(
            frames = table.len(),
            ranges = ranges.len(),
            threshold = self.threshold,
            "segmented frames"
        );

        RangeList::from(ranges)
    }

    fn close(&self, start: &FrameId, end: &FrameId) -> Range {
        Range::new(start.clone(), end.clone()).with_noise(self.noise)
    }
}
