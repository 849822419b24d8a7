//! Metadata stripping by re-rasterization.
//!
//! The image is decoded to a pixel buffer and encoded again in its own
//! format. Nothing from the original container survives, so there is no
//! byte-level search for metadata segments.

use crate::ScrubError;
use crate::exif::{ExifTagReader, TagReader};
use crate::input::SelectedFile;
use crate::settings::Settings;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// The output of a successful strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubbedResult {
    /// The bytes of the new, cleaned file.
    pub bytes: Vec<u8>,
    /// Always the MIME type of the file it was derived from.
    pub mime: String,
    pub file_name: String,
    /// Number of tags the source carried.
    pub tags_removed: usize,
}

/// Re-encodes `file` in its own format at the configured quality.
pub fn scrub(file: &SelectedFile, settings: &Settings) -> Result<ScrubbedResult, ScrubError> {
    let format = ImageFormat::from_mime_type(&file.mime)
        .ok_or_else(|| ScrubError::UnsupportedFileType(file.mime.clone()))?;

    let decoded = image::load_from_memory_with_format(&file.bytes, format)
        .map_err(|e| ScrubError::Decode(e.to_string()))?;

    let tags_removed = ExifTagReader.read_tags(&file.bytes).map_or(0, |tags| tags.len());
    let orientation = ExifTagReader.orientation(&file.bytes).unwrap_or(1);
    let upright = apply_orientation(decoded, orientation);

    let bytes = encode(&upright, format, settings.jpeg_quality)?;
    log::debug!(
        "Re-encoded {} ({} -> {} bytes, orientation {})",
        file.name,
        file.bytes.len(),
        bytes.len(),
        orientation
    );

    Ok(ScrubbedResult {
        bytes,
        mime: file.mime.clone(),
        file_name: settings.output_name(file.extension.as_deref()),
        tags_removed,
    })
}

/// Pixel dimensions from the image header.
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32), ScrubError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| ScrubError::Decode(e.to_string()))
}

/// Bakes an EXIF orientation into the pixels, as a canvas draw would.
fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

fn encode(img: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>, ScrubError> {
    let mut buf = Vec::new();
    match format {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| ScrubError::Encode(e.to_string()))?;
        }
        ImageFormat::WebP => {
            DynamicImage::ImageRgba8(img.to_rgba8())
                .write_to(&mut Cursor::new(&mut buf), format)
                .map_err(|e| ScrubError::Encode(e.to_string()))?;
        }
        _ => {
            img.write_to(&mut Cursor::new(&mut buf), format)
                .map_err(|e| ScrubError::Encode(e.to_string()))?;
        }
    }
    Ok(buf)
}
