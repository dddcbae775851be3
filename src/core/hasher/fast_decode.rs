//! Frame decoding with a fast path for JPEG.
//!
//! Uses zune-jpeg for JPEG frames (1.5-2x faster than the image crate),
//! falls back to the image crate for PNG and everything else.

use crate::error::HashError;
use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Frame formats with a dedicated decode path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Jpeg,
    Other,
}

impl FrameFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("jpg" | "jpeg") => Self::Jpeg,
            _ => Self::Other,
        }
    }
}

/// Decoder that picks the fastest path per format
pub struct FastDecoder;

impl FastDecoder {
    /// Decode a frame from disk.
    pub fn decode(path: &Path) -> Result<DynamicImage, HashError> {
        match FrameFormat::from_path(path) {
            FrameFormat::Jpeg => Self::decode_jpeg(path).or_else(|_| Self::decode_fallback(path)),
            FrameFormat::Other => Self::decode_fallback(path),
        }
    }

    fn decode_jpeg(path: &Path) -> Result<DynamicImage, HashError> {
        let file_bytes = fs::read(path).map_err(|e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder.decode().map_err(|e| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: "Failed to get image info".to_string(),
        })?;

        let width = info.width as u32;
        let height = info.height as u32;
        let buffer_error = |kind: &str| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("Failed to create {} buffer", kind),
        };

        let image = match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("RGB"))?;
                DynamicImage::ImageRgb8(buffer)
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("RGBA"))?;
                DynamicImage::ImageRgba8(buffer)
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("Luma"))?;
                DynamicImage::ImageLuma8(buffer)
            }
            _ => return Self::decode_fallback(path),
        };

        Ok(image)
    }

    fn decode_fallback(path: &Path) -> Result<DynamicImage, HashError> {
        let reader = image::ImageReader::open(path).map_err(|e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        reader
            .with_guessed_format()
            .map_err(|e| HashError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?
            .decode()
            .map_err(|e| HashError::DecodeError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn format_detection() {
        assert_eq!(FrameFormat::from_path(Path::new("f.jpg")), FrameFormat::Jpeg);
        assert_eq!(FrameFormat::from_path(Path::new("f.JPEG")), FrameFormat::Jpeg);
        assert_eq!(FrameFormat::from_path(Path::new("f.png")), FrameFormat::Other);
    }

    #[test]
    fn decodes_png_frame() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("000001.png");
        let img = ImageBuffer::from_fn(8, 4, |x, _| Rgb([x as u8 * 30, 0, 0]));
        img.save(&path).unwrap();

        let decoded = FastDecoder::decode(&path).unwrap();
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = FastDecoder::decode(Path::new("/nonexistent/000001.png"));
        assert!(matches!(result, Err(HashError::IoError { .. })));
    }

    #[test]
    fn garbage_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("000001.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let result = FastDecoder::decode(&path);
        assert!(matches!(result, Err(HashError::DecodeError { .. })));
    }
}
