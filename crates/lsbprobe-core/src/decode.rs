//! Image decoding into [`PixelBuffer`]s.
//!
//! Only PNG, BMP and JPEG containers are accepted. The format is sniffed from
//! the leading magic bytes rather than trusted from a file extension.

use std::path::Path;

use image::ImageFormat;

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};

const SUPPORTED: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Jpeg];

/// A decoded image and the container it came from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub pixels: PixelBuffer,
}

impl DecodedImage {
    pub fn format_name(&self) -> &'static str {
        format_name(self.format)
    }
}

pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Jpeg => "jpeg",
        _ => "unsupported",
    }
}

/// Sniff the container format of `bytes`, if it is one we decode.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes)
        .ok()
        .filter(|f| SUPPORTED.contains(f))
}

/// Decode in-memory image bytes to RGBA8. `label` is used in errors only.
pub fn decode_bytes(label: &str, bytes: &[u8]) -> Result<DecodedImage> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput {
            label: label.to_string(),
        });
    }
    let format = detect_format(bytes).ok_or_else(|| Error::UnsupportedFormat {
        label: label.to_string(),
    })?;
    let image =
        image::load_from_memory_with_format(bytes, format).map_err(|source| Error::Decode {
            label: label.to_string(),
            source,
        })?;
    log::trace!(
        "{label}: decoded {} {}x{}",
        format_name(format),
        image.width(),
        image.height()
    );
    Ok(DecodedImage {
        format,
        pixels: PixelBuffer::from_image(image.to_rgba8()),
    })
}

/// Read and decode a file. Returns the raw file bytes alongside the image so
/// callers can fingerprint exactly what was analyzed.
pub fn open_path(path: &Path) -> Result<(Vec<u8>, DecodedImage)> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = decode_bytes(&path.display().to_string(), &bytes)?;
    Ok((bytes, decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(img: &image::RgbaImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    fn sample() -> image::RgbaImage {
        image::RgbaImage::from_fn(4, 3, |x, y| image::Rgba([(x * 40 + y) as u8, 10, 20, 255]))
    }

    #[test]
    fn test_decode_png_preserves_pixels() {
        let img = sample();
        let decoded = decode_bytes("mem.png", &encode(&img, ImageFormat::Png)).unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.format_name(), "png");
        assert_eq!(decoded.pixels.width(), 4);
        assert_eq!(decoded.pixels.height(), 3);
        assert_eq!(decoded.pixels.as_bytes(), img.as_raw().as_slice());
    }

    #[test]
    fn test_decode_bmp() {
        let img = sample();
        let decoded = decode_bytes("mem.bmp", &encode(&img, ImageFormat::Bmp)).unwrap();
        assert_eq!(decoded.format, ImageFormat::Bmp);
        assert_eq!(decoded.pixels.pixel_count(), 12);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            decode_bytes("nothing", &[]),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let err = decode_bytes("notes.txt", b"hello, this is not an image").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("notes.txt"));
    }

    #[test]
    fn test_truncated_png_fails_to_decode() {
        let bytes = encode(&sample(), ImageFormat::Png);
        let err = decode_bytes("cut.png", &bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_path(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
