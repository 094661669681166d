//! User-selected source images
//!
//! Only content that decodes as an image is accepted; the media type is
//! detected from the bytes rather than trusted from the file name.

use crate::error::OcrError;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// In-memory handle to a user-provided image
#[derive(Debug, Clone)]
pub struct SelectedImage {
    name: String,
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl SelectedImage {
    /// Accept raw bytes as a selected image
    pub fn from_bytes(
        name: impl Into<String>,
        bytes: Vec<u8>,
        max_file_size: usize,
    ) -> Result<Self, OcrError> {
        let name = name.into();

        if bytes.len() > max_file_size {
            return Err(OcrError::ImageTooLarge {
                size: bytes.len(),
                max: max_file_size,
            });
        }

        let format = image::guess_format(&bytes)
            .map_err(|_| OcrError::UnsupportedFormat(format!("{} is not an image", name)))?;

        if !format.reading_enabled() {
            return Err(OcrError::UnsupportedFormat(format!(
                "{} ({})",
                name,
                format.to_mime_type()
            )));
        }

        Ok(Self {
            name,
            bytes,
            format,
        })
    }

    /// Read an image file from disk
    pub fn open(path: &Path, max_file_size: usize) -> Result<Self, OcrError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            OcrError::ProcessingError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        // Reject before reading the whole file into memory
        let size = metadata.len() as usize;
        if size > max_file_size {
            return Err(OcrError::ImageTooLarge {
                size,
                max: max_file_size,
            });
        }

        let bytes = std::fs::read(path).map_err(|e| {
            OcrError::ProcessingError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_bytes(name, bytes, max_file_size)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the image at its native dimensions
    ///
    /// EXIF orientation is applied, so rotated photos come out upright with
    /// width and height swapped accordingly.
    pub fn decode(&self) -> Result<DynamicImage, OcrError> {
        let mut decoder = ImageReader::with_format(Cursor::new(&self.bytes), self.format)
            .into_decoder()
            .map_err(load_error)?;

        // Unreadable metadata is not worth failing the image over
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

        let mut image = DynamicImage::from_decoder(decoder).map_err(load_error)?;
        if !matches!(orientation, Orientation::NoTransforms) {
            tracing::debug!("{}: applying EXIF orientation {:?}", self.name, orientation);
            image.apply_orientation(orientation);
        }
        Ok(image)
    }
}

fn load_error(e: ImageError) -> OcrError {
    OcrError::ProcessingError(format!("Failed to load image: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([200])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_accepts_png() {
        let selected = SelectedImage::from_bytes("page.png", png_bytes(), usize::MAX).unwrap();
        assert_eq!(selected.mime_type(), "image/png");
        assert_eq!(selected.name(), "page.png");
        assert!(!selected.is_empty());
    }

    #[test]
    fn test_detects_format_from_content_not_name() {
        let selected = SelectedImage::from_bytes("notes.txt", png_bytes(), usize::MAX).unwrap();
        assert_eq!(selected.mime_type(), "image/png");
    }

    #[test]
    fn test_rejects_non_image() {
        let result = SelectedImage::from_bytes("notes.txt", b"hello world".to_vec(), usize::MAX);
        assert!(matches!(result, Err(OcrError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let bytes = png_bytes();
        let max = bytes.len() - 1;
        let result = SelectedImage::from_bytes("page.png", bytes, max);
        assert!(matches!(result, Err(OcrError::ImageTooLarge { .. })));
    }

    #[test]
    fn test_open_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let selected = SelectedImage::open(&path, usize::MAX).unwrap();

        assert_eq!(selected.name(), "scan.png");
        assert_eq!(selected.decode().unwrap().width(), 8);
    }

    /// 40x20 JPEG carrying an EXIF Orientation=6 (rotate 90° clockwise) tag
    fn rotated_jpeg() -> Vec<u8> {
        let img = RgbImage::from_fn(40, 20, |x, _| Rgb([(x * 6) as u8, 0, 0]));
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();

        let app1: [u8; 36] = [
            0xFF, 0xE1, 0x00, 0x22, // APP1, length 34
            b'E', b'x', b'i', b'f', 0x00, 0x00, // Exif header
            b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, // big-endian TIFF, IFD at 8
            0x00, 0x01, // one entry
            0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, // Orientation, SHORT, count 1
            0x00, 0x06, 0x00, 0x00, // value 6
            0x00, 0x00, 0x00, 0x00, // no next IFD
        ];
        let mut with_exif = jpeg[..2].to_vec();
        with_exif.extend_from_slice(&app1);
        with_exif.extend_from_slice(&jpeg[2..]);
        with_exif
    }

    #[test]
    fn test_decode_applies_exif_orientation() {
        let selected = SelectedImage::from_bytes("phone.jpg", rotated_jpeg(), usize::MAX).unwrap();

        let decoded = selected.decode().unwrap();

        assert_eq!((decoded.width(), decoded.height()), (20, 40));
    }

    #[test]
    fn test_decode_without_exif_keeps_dimensions() {
        let img = RgbImage::new(40, 20);
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        let selected = SelectedImage::from_bytes("plain.jpg", jpeg, usize::MAX).unwrap();

        let decoded = selected.decode().unwrap();

        assert_eq!((decoded.width(), decoded.height()), (40, 20));
    }
}
