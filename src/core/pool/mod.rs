//! # Hash Worker Pool
//!
//! Hashes every frame on a dedicated rayon pool of `jobs` threads, so at
//! most `jobs` frames are decoded at once. Digests go into a shared
//! [`HashTable`]; the table is only frozen and handed back after every
//! frame has been processed.
//!
//! A frame that fails to load or hash is reported and left out. The other
//! frames carry on.

use crate::core::hasher::FrameHasher;
use crate::core::pipeline::CancellationToken;
use crate::core::scanner::{FrameFile, FrameId};
use crate::core::table::{FrozenHashTable, HashTable};
use crate::error::{ConfigError, HashError, RangeGenError};
use crate::events::{Event, EventSender, HashEvent, HashProgress};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// A frame that could not be hashed
#[derive(Debug)]
pub struct FrameFailure {
    pub frame: FrameId,
    pub path: PathBuf,
    pub error: HashError,
}

/// Everything the pool produced for one run
#[derive(Debug)]
pub struct HashOutcome {
    /// Digests of the frames that hashed successfully
    pub table: FrozenHashTable,
    /// Frames left out of the table, in frame order
    pub failures: Vec<FrameFailure>,
}

/// Bounded pool of hash workers
pub struct HashWorkerPool {
    jobs: NonZeroUsize,
    pool: ThreadPool,
}

impl HashWorkerPool {
    /// Start a pool of exactly `jobs` worker threads
    pub fn new(jobs: NonZeroUsize) -> Result<Self, ConfigError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs.get())
            .thread_name(|i| format!("range-gen-hash-{}", i))
            .build()
            .map_err(|e| ConfigError::WorkerPool {
                jobs: jobs.get(),
                reason: e.to_string(),
            })?;

        Ok(Self { jobs, pool })
    }

    pub fn jobs(&self) -> usize {
        self.jobs.get()
    }

    /// Hash `frames` and wait for all of them.
    ///
    /// Returns `RangeGenError::Cancelled` if `cancel` fired; frames not yet
    /// started at that point are skipped and no table is returned.
    pub fn hash_frames(
        &self,
        frames: &[FrameFile],
        hasher: &dyn FrameHasher,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<HashOutcome, RangeGenError> {
        let total = frames.len();
        info!(frames = total, jobs = self.jobs(), "hashing frames");
        events.send(Event::Hash(HashEvent::Started {
            total_frames: total,
            jobs: self.jobs(),
        }));

        let table = HashTable::with_capacity(total);
        let completed = AtomicUsize::new(0);

        // `install` returns only once every frame is done: this is the barrier.
        let failures: Vec<FrameFailure> = self.pool.install(|| {
            frames
                .par_iter()
                .filter_map(|frame| {
                    if cancel.is_cancelled() {
                        return None;
                    }

                    let result = hasher
                        .hash_file(&frame.path)
                        .and_then(|digest| table.put(frame.id.clone(), digest));

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    events.send(Event::Hash(HashEvent::Progress(HashProgress {
                        completed: done,
                        total,
                        current_frame: frame.id.to_string(),
                    })));

                    match result {
                        Ok(()) => None,
                        Err(error) => {
                            warn!(frame = %frame.id, "{}", error);
                            events.send(Event::Hash(HashEvent::Error {
                                frame: frame.id.to_string(),
                                message: error.to_string(),
                            }));
                            Some(FrameFailure {
                                frame: frame.id.clone(),
                                path: frame.path.clone(),
                                error,
                            })
                        }
                    }
                })
                .collect()
        });

        if cancel.is_cancelled() {
            debug!(
                finished = completed.load(Ordering::SeqCst),
                total, "hashing cancelled"
            );
            return Err(RangeGenError::Cancelled);
        }

        let table = table.freeze();
        events.send(Event::Hash(HashEvent::Completed {
            hashed: table.len(),
            failed: failures.len(),
        }));

        Ok(HashOutcome { table, failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::{Digest, HashAlgorithmKind};
    use crate::events::{null_sender, EventChannel};
    use image::DynamicImage;
    use std::collections::HashMap;
    use std::path::Path;
    use std::thread;
    use std::time::Duration;

    /// Looks digests up by file name and records how many calls overlap.
    struct ScriptedHasher {
        digests: HashMap<String, Digest>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
    }

    impl ScriptedHasher {
        fn new(frames: &[(&str, &str)]) -> Self {
            Self {
                digests: frames
                    .iter()
                    .map(|(f, d)| (f.to_string(), Digest::from_hex(d).unwrap()))
                    .collect(),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                delay: Duration::from_millis(2),
            }
        }
    }

    impl FrameHasher for ScriptedHasher {
        fn hash_image(&self, _image: &DynamicImage) -> Result<Digest, HashError> {
            unreachable!("frames are looked up by name")
        }

        fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            thread::sleep(self.delay);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            self.digests
                .get(name)
                .cloned()
                .ok_or_else(|| HashError::DecodeError {
                    path: path.to_path_buf(),
                    reason: "not a frame".to_string(),
                })
        }

        fn kind(&self) -> HashAlgorithmKind {
            HashAlgorithmKind::Blockhash
        }
    }

    fn frame_files(names: &[&str]) -> Vec<FrameFile> {
        names
            .iter()
            .map(|n| FrameFile {
                id: FrameId::from(*n),
                path: PathBuf::from("/frames").join(n),
            })
            .collect()
    }

    fn pool(jobs: usize) -> HashWorkerPool {
        HashWorkerPool::new(NonZeroUsize::new(jobs).unwrap()).unwrap()
    }

    fn script(count: usize) -> Vec<(String, String)> {
        (0..count)
            .map(|i| (format!("{:06}.png", i), format!("{:04x}", (i * 7919) % 65536)))
            .collect()
    }

    #[test]
    fn every_frame_lands_in_the_table() {
        let hasher = ScriptedHasher::new(&[("a.png", "00"), ("b.png", "0f"), ("c.png", "ff")]);
        let frames = frame_files(&["c.png", "a.png", "b.png"]);

        let outcome = pool(2)
            .hash_frames(&frames, &hasher, &null_sender(), &CancellationToken::new())
            .unwrap();

        assert!(outcome.failures.is_empty());
        let entries: Vec<_> = outcome
            .table
            .iter()
            .map(|(f, d)| (f.as_str(), d.as_str()))
            .collect();
        assert_eq!(entries, [("a.png", "00"), ("b.png", "0f"), ("c.png", "ff")]);
    }

    #[test]
    fn failing_frames_are_reported_and_left_out() {
        let hasher = ScriptedHasher::new(&[("a.png", "00"), ("c.png", "ff")]);
        let frames = frame_files(&["a.png", "broken.png", "c.png"]);

        let outcome = pool(3)
            .hash_frames(&frames, &hasher, &null_sender(), &CancellationToken::new())
            .unwrap();

        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].frame.as_str(), "broken.png");
        assert!(outcome.table.get(&FrameId::from("broken.png")).is_none());
    }

    #[test]
    fn never_exceeds_job_limit() {
        let script = script(64);
        let pairs: Vec<(&str, &str)> = script.iter().map(|(f, d)| (f.as_str(), d.as_str())).collect();
        let names: Vec<&str> = pairs.iter().map(|(f, _)| *f).collect();
        let hasher = ScriptedHasher::new(&pairs);

        pool(3)
            .hash_frames(&frame_files(&names), &hasher, &null_sender(), &CancellationToken::new())
            .unwrap();

        let max = hasher.max_in_flight.load(Ordering::SeqCst);
        assert!(max >= 1 && max <= 3, "saw {} concurrent hashes", max);
        assert_eq!(hasher.in_flight.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn job_count_does_not_change_the_table() {
        let script = script(200);
        let pairs: Vec<(&str, &str)> = script.iter().map(|(f, d)| (f.as_str(), d.as_str())).collect();
        let names: Vec<&str> = pairs.iter().map(|(f, _)| *f).collect();
        let frames = frame_files(&names);

        let run = |jobs| {
            let hasher = ScriptedHasher::new(&pairs);
            pool(jobs)
                .hash_frames(&frames, &hasher, &null_sender(), &CancellationToken::new())
                .unwrap()
                .table
        };

        assert_eq!(run(1), run(8));
    }

    #[test]
    fn cancelled_run_returns_no_table() {
        let hasher = ScriptedHasher::new(&[("a.png", "00")]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = pool(2).hash_frames(&frame_files(&["a.png"]), &hasher, &null_sender(), &cancel);

        assert!(matches!(result, Err(RangeGenError::Cancelled)));
        assert_eq!(hasher.max_in_flight.load(Ordering::SeqCst), 0);
    }

    /// Cancels the run from inside the first hash call.
    struct CancellingHasher {
        cancel: CancellationToken,
        calls: AtomicUsize,
    }

    impl FrameHasher for CancellingHasher {
        fn hash_image(&self, _image: &DynamicImage) -> Result<Digest, HashError> {
            unreachable!("frames are never decoded")
        }

        fn hash_file(&self, _path: &Path) -> Result<Digest, HashError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.cancel.cancel();
            Digest::from_hex("00")
        }

        fn kind(&self) -> HashAlgorithmKind {
            HashAlgorithmKind::Blockhash
        }
    }

    #[test]
    fn cancel_during_hashing_skips_remaining_frames() {
        let script = script(200);
        let names: Vec<&str> = script.iter().map(|(f, _)| f.as_str()).collect();
        let cancel = CancellationToken::new();
        let hasher = CancellingHasher {
            cancel: cancel.clone(),
            calls: AtomicUsize::new(0),
        };

        let result = pool(2).hash_frames(&frame_files(&names), &hasher, &null_sender(), &cancel);

        assert!(matches!(result, Err(RangeGenError::Cancelled)));
        // Only frames already started on one of the two workers may finish.
        let calls = hasher.calls.load(Ordering::SeqCst);
        assert!(calls >= 1 && calls <= 2, "hashed {} frames after cancel", calls);
    }

    #[test]
    fn progress_counts_every_frame() {
        let hasher = ScriptedHasher::new(&[("a.png", "00"), ("b.png", "11")]);
        let (sender, receiver) = EventChannel::new();

        pool(2)
            .hash_frames(
                &frame_files(&["a.png", "b.png", "x.png"]),
                &hasher,
                &sender,
                &CancellationToken::new(),
            )
            .unwrap();
        drop(sender);

        let mut progress = 0;
        let mut errors = 0;
        let mut completed = None;
        for event in receiver.iter() {
            match event {
                Event::Hash(HashEvent::Progress(_)) => progress += 1,
                Event::Hash(HashEvent::Error { .. }) => errors += 1,
                Event::Hash(HashEvent::Completed { hashed, failed }) => {
                    completed = Some((hashed, failed))
                }
                _ => {}
            }
        }
        assert_eq!(progress, 3);
        assert_eq!(errors, 1);
        assert_eq!(completed, Some((2, 1)));
    }
}
