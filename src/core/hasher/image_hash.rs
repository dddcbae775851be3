//! Frame hashing backed by the image_hasher crate.
//!
//! A 16x16 blockhash gives 256 bits, rendered as 64 hex digits. Frame
//! distances are measured per hex digit (see `segmenter::nibble_distance`),
//! so the useful threshold range for that size is 0-960.

use super::traits::{Digest, FrameHasher, HashAlgorithmKind};
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// `FrameHasher` for every algorithm image_hasher offers us
pub struct ImageHasher {
    kind: HashAlgorithmKind,
    hasher: image_hasher::Hasher,
}

impl ImageHasher {
    /// Create a hasher producing `hash_size * hash_size` bit digests
    pub fn new(kind: HashAlgorithmKind, hash_size: u32) -> Self {
        let alg = match kind {
            HashAlgorithmKind::Blockhash => HashAlg::Blockhash,
            HashAlgorithmKind::Mean => HashAlg::Mean,
            HashAlgorithmKind::Gradient => HashAlg::Gradient,
            HashAlgorithmKind::DoubleGradient => HashAlg::DoubleGradient,
        };

        let hasher = ImageHasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(alg)
            .to_hasher();

        Self { kind, hasher }
    }
}

impl FrameHasher for ImageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Digest, HashError> {
        let hash = self.hasher.hash_image(image);
        Ok(Digest::from_bytes(hash.as_bytes()))
    }

    fn kind(&self) -> HashAlgorithmKind {
        self.kind
    }
}
