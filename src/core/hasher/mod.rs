//! # Hasher Module
//!
//! Computes a perceptual digest for each frame.
//!
//! ## Supported Algorithms
//! - **Blockhash** - the default; range thresholds are tuned for it
//! - **Mean**, **Gradient**, **DoubleGradient** - alternatives from image_hasher
//!
//! ## Example
//! ```rust,ignore
//! use range_gen::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Blockhash)
//!     .hash_size(16)
//!     .build()?;
//!
//! let digest = hasher.hash_file(&path)?;
//! ```

pub mod fast_decode;
mod image_hash;
mod traits;

pub use image_hash::ImageHasher;
pub use traits::{Digest, FrameHasher, HashAlgorithmKind};

use crate::error::HashError;

/// Configuration builder for frame hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Hash size (bits per side)
    hash_size: u32,
    /// Algorithm to use
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    /// Blockhash with a 16x16 grid
    pub fn new() -> Self {
        Self {
            hash_size: 16,
            algorithm: HashAlgorithmKind::Blockhash,
        }
    }

    /// Set the hash size.
    ///
    /// The digest has `size * size` bits, i.e. `size * size / 4` hex digits.
    /// Blockhash needs a multiple of 4.
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Result<Box<dyn FrameHasher>, HashError> {
        let blockhash_misaligned =
            self.algorithm == HashAlgorithmKind::Blockhash && self.hash_size % 4 != 0;
        if !(2..=64).contains(&self.hash_size) || blockhash_misaligned {
            return Err(HashError::UnsupportedHashSize {
                size: self.hash_size,
            });
        }
        Ok(Box::new(ImageHasher::new(self.algorithm, self.hash_size)))
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_blockhash_16() {
        let config = HasherConfig::new();
        assert_eq!(config.algorithm, HashAlgorithmKind::Blockhash);
        assert_eq!(config.hash_size, 16);
    }

    #[test]
    fn config_builder_works() {
        let config = HasherConfig::new()
            .algorithm(HashAlgorithmKind::Mean)
            .hash_size(8);

        assert_eq!(config.algorithm, HashAlgorithmKind::Mean);
        assert_eq!(config.hash_size, 8);
    }

    #[test]
    fn build_creates_hasher() {
        let hasher = HasherConfig::new().build().unwrap();
        assert_eq!(hasher.kind(), HashAlgorithmKind::Blockhash);
    }

    #[test]
    fn build_rejects_degenerate_size() {
        let result = HasherConfig::new().hash_size(0).build();
        assert!(matches!(
            result,
            Err(HashError::UnsupportedHashSize { size: 0 })
        ));
    }

    #[test]
    fn blockhash_needs_multiple_of_four() {
        assert!(HasherConfig::new().hash_size(10).build().is_err());
        assert!(HasherConfig::new()
            .algorithm(HashAlgorithmKind::Gradient)
            .hash_size(10)
            .build()
            .is_ok());
    }
}
