//! # Hash Table
//!
//! Accumulation point between the hash workers and the segmenter.
//!
//! Workers call [`HashTable::put`] concurrently. Once every worker has
//! finished, the owner calls [`HashTable::freeze`], which consumes the
//! table and yields a read-only view sorted by frame id. There is no way
//! to read a `HashTable` directly, so nothing can observe it half filled.

use crate::core::hasher::Digest;
use crate::core::scanner::FrameId;
use crate::error::HashError;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Mutex-guarded map from frame id to digest
#[derive(Debug, Default)]
pub struct HashTable {
    entries: Mutex<HashMap<FrameId, Digest>>,
}

impl HashTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for `capacity` frames
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Record the digest of a frame.
    ///
    /// Each frame may be written once; a second write is rejected and the
    /// first digest is kept.
    pub fn put(&self, frame: FrameId, digest: Digest) -> Result<(), HashError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&frame) {
            return Err(HashError::DuplicateFrame {
                frame: frame.to_string(),
            });
        }
        entries.insert(frame, digest);
        Ok(())
    }

    /// Finish writing and produce the sorted read-only view
    pub fn freeze(self) -> FrozenHashTable {
        let entries = self
            .entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut sorted: Vec<(FrameId, Digest)> = entries.into_iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        FrozenHashTable { entries: sorted }
    }
}

/// Read-only digests in ascending frame order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrozenHashTable {
    entries: Vec<(FrameId, Digest)>,
}

impl FrozenHashTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in ascending frame order
    pub fn iter(&self) -> impl Iterator<Item = (&FrameId, &Digest)> {
        self.entries.iter().map(|(frame, digest)| (frame, digest))
    }

    /// Digest of one frame
    pub fn get(&self, frame: &FrameId) -> Option<&Digest> {
        self.entries
            .binary_search_by(|(id, _)| id.cmp(frame))
            .ok()
            .map(|i| &self.entries[i].1)
    }
}

#[cfg(test)]
impl FromIterator<(FrameId, Digest)> for FrozenHashTable {
    fn from_iter<I: IntoIterator<Item = (FrameId, Digest)>>(iter: I) -> Self {
        let table = HashTable::new();
        for (frame, digest) in iter {
            if let Err(e) = table.put(frame, digest) {
                panic!("{}", e);
            }
        }
        table.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn digest(hex: &str) -> Digest {
        Digest::from_hex(hex).unwrap()
    }

    #[test]
    fn freeze_sorts_by_frame() {
        let table = HashTable::new();
        table.put("c.png".into(), digest("ff")).unwrap();
        table.put("a.png".into(), digest("00")).unwrap();
        table.put("b.png".into(), digest("0f")).unwrap();

        let frozen = table.freeze();
        let frames: Vec<_> = frozen.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(frames, ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn second_put_is_rejected() {
        let table = HashTable::new();
        table.put("a.png".into(), digest("00")).unwrap();

        let err = table.put("a.png".into(), digest("ff")).unwrap_err();
        assert!(matches!(err, HashError::DuplicateFrame { .. }));

        let frozen = table.freeze();
        assert_eq!(frozen.len(), 1);
        assert_eq!(frozen.get(&"a.png".into()), Some(&digest("00")));
    }

    #[test]
    fn concurrent_puts_all_land() {
        let table = Arc::new(HashTable::with_capacity(800));

        let writers: Vec<_> = (0..8)
            .map(|w| {
                let table = Arc::clone(&table);
                thread::spawn(move || {
                    for i in 0..100 {
                        let frame = FrameId::new(format!("{:06}.png", w * 100 + i));
                        table.put(frame, digest("abcd")).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let frozen = Arc::try_unwrap(table).unwrap().freeze();
        assert_eq!(frozen.len(), 800);
        assert!(frozen
            .iter()
            .zip(frozen.iter().skip(1))
            .all(|((a, _), (b, _))| a < b));
    }

    #[test]
    fn get_misses_unknown_frame() {
        let frozen: FrozenHashTable = vec![("a.png".into(), digest("00"))].into_iter().collect();
        assert!(frozen.get(&"b.png".into()).is_none());
    }

    #[test]
    #[should_panic(expected = "already hashed")]
    fn collecting_duplicate_frames_panics() {
        let _frozen: FrozenHashTable = vec![
            ("a.png".into(), digest("00")),
            ("a.png".into(), digest("ff")),
        ]
        .into_iter()
        .collect();
    }
}
