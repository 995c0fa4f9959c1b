//! Image post-processor
//!
//! Recompresses generated image bytes to a bounded size before persistence.
//! Deterministic for identical input bytes and quality.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use std::io::Cursor;
use tracing::debug;

use crate::error::{ExportError, ExportResult};

/// Re-encode image bytes as JPEG at the given quality factor (0.0–1.0)
pub fn compress_jpeg(bytes: &[u8], quality: f32) -> ExportResult<Vec<u8>> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ExportError::Compression(format!("decode failed: {}", e)))?;

    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let quality = (quality.clamp(0.01, 1.0) * 100.0).round() as u8;

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ExportError::Compression(format!("encode failed: {}", e)))?;

    let out = out.into_inner();
    debug!(
        input = bytes.len(),
        output = out.len(),
        quality,
        "Image recompressed"
    );
    Ok(out)
}

/// Re-encode image bytes and return a `data:image/jpeg;base64,...` URL
pub fn compress(bytes: &[u8], quality: f32) -> ExportResult<String> {
    let jpeg = compress_jpeg(bytes, quality)?;
    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(jpeg)))
}

/// Like [`compress_jpeg`], but fail when the result exceeds `bound` bytes
pub fn compress_jpeg_bounded(bytes: &[u8], quality: f32, bound: usize) -> ExportResult<Vec<u8>> {
    let jpeg = compress_jpeg(bytes, quality)?;
    if jpeg.len() > bound {
        return Err(ExportError::TooLarge {
            actual: jpeg.len(),
            bound,
        });
    }
    Ok(jpeg)
}

/// Decode the payload of a `data:<type>;base64,` URL
pub fn decode_data_url(url: &str) -> ExportResult<Vec<u8>> {
    let payload = url
        .split_once("base64,")
        .map(|(_, p)| p)
        .ok_or_else(|| ExportError::Compression("not a base64 data URL".into()))?;
    BASE64
        .decode(payload)
        .map_err(|e| ExportError::Compression(format!("data URL payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png_fixture() -> Vec<u8> {
        let mut img = RgbImage::new(64, 64);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([(x * 4) as u8, (y * 4) as u8, 128]);
        }
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_compress_is_deterministic() {
        let input = png_fixture();
        let a = compress(&input, 0.7).unwrap();
        let b = compress(&input, 0.7).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_quality_affects_size() {
        let input = png_fixture();
        let high = compress_jpeg(&input, 0.95).unwrap();
        let low = compress_jpeg(&input, 0.1).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_corrupt_input_is_compression_error() {
        let err = compress(b"definitely not an image", 0.7).unwrap_err();
        assert!(matches!(err, ExportError::Compression(_)));
    }

    #[test]
    fn test_bounded_rejects_oversize() {
        let input = png_fixture();
        let err = compress_jpeg_bounded(&input, 0.9, 10).unwrap_err();
        assert!(matches!(err, ExportError::TooLarge { bound: 10, .. }));
    }

    #[test]
    fn test_data_url_roundtrip() {
        let input = png_fixture();
        let url = compress(&input, 0.7).unwrap();
        let jpeg = decode_data_url(&url).unwrap();
        assert_eq!(jpeg, compress_jpeg(&input, 0.7).unwrap());
        // the payload is a decodable JPEG
        assert!(image::load_from_memory(&jpeg).is_ok());
    }

    #[test]
    fn test_decode_data_url_rejects_plain_url() {
        assert!(decode_data_url("https://example.com/a.png").is_err());
    }
}
