//! Digest type and hashing trait.

use super::fast_decode::FastDecoder;
use crate::error::HashError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Hexadecimal perceptual fingerprint of one frame.
///
/// Always lowercase, always made of `0-9a-f`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(String);

impl Digest {
    /// Parse a hex string, normalising to lowercase
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HashError::InvalidDigest {
                digest: hex.to_string(),
            });
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// Render raw hash bytes as two hex digits per byte
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithmKind {
    /// Blockhash - thresholds are calibrated against this one
    Blockhash,
    /// Mean (average) hash
    Mean,
    /// Gradient (difference) hash
    Gradient,
    /// Horizontal and vertical gradients combined
    DoubleGradient,
}

impl fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithmKind::Blockhash => write!(f, "blockhash"),
            HashAlgorithmKind::Mean => write!(f, "mean"),
            HashAlgorithmKind::Gradient => write!(f, "gradient"),
            HashAlgorithmKind::DoubleGradient => write!(f, "double-gradient"),
        }
    }
}

/// Computes a digest for a frame.
///
/// Implementations must be pure: the same image always yields the same
/// digest, and no state is shared between calls.
pub trait FrameHasher: Send + Sync {
    /// Compute a digest from an already decoded image
    fn hash_image(&self, image: &DynamicImage) -> Result<Digest, HashError>;

    /// Decode the frame at `path` and hash it
    fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        let image = FastDecoder::decode(path)?;
        self.hash_image(&image)
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}
