// File: crates/camophoto-core/src/png.rs

use crate::ScrubError;
use std::io::Cursor;

/// Re-encodes any decodable image as an 8-bit RGBA PNG.
///
/// The clipboard write path only reliably accepts `image/png`, so copies are
/// normalised here whatever the scrubbed file's own format is.
pub fn to_png(bytes: &[u8]) -> Result<Vec<u8>, ScrubError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| ScrubError::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut png_bytes = Vec::new();
    {
        // The writer borrows `png_bytes` until it is dropped at the end of this scope.
        let mut encoder = png::Encoder::new(Cursor::new(&mut png_bytes), width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| ScrubError::Encode(e.to_string()))?;

        writer
            .write_image_data(rgba.as_raw())
            .map_err(|e| ScrubError::Encode(e.to_string()))?;
    }

    Ok(png_bytes)
}
