//! In-memory image fixtures for the unit tests.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 40) as u8, (y * 40) as u8, 128, 255])
    });
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 40) as u8, (y * 40) as u8, 90]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

/// A TIFF entry for [`jpeg_with_exif`] and [`jpeg_with_gps`].
pub(crate) enum Field {
    Ascii(u16, &'static str),
    Short(u16, u16),
    Long(u16, u32),
    Byte(u16, u8),
    Rational(u16, &'static [(u32, u32)]),
    Undefined(u16, &'static [u8]),
}

impl Field {
    fn tag(&self) -> u16 {
        match self {
            Field::Ascii(tag, _)
            | Field::Short(tag, _)
            | Field::Long(tag, _)
            | Field::Byte(tag, _)
            | Field::Rational(tag, _)
            | Field::Undefined(tag, _) => *tag,
        }
    }

    /// TIFF type code, value count and big-endian payload.
    fn encoded(&self) -> (u16, u32, Vec<u8>) {
        match self {
            Field::Ascii(_, text) => {
                let mut bytes = text.as_bytes().to_vec();
                bytes.push(0);
                (2, bytes.len() as u32, bytes)
            }
            Field::Short(_, value) => (3, 1, value.to_be_bytes().to_vec()),
            Field::Long(_, value) => (4, 1, value.to_be_bytes().to_vec()),
            Field::Byte(_, value) => (1, 1, vec![*value]),
            Field::Rational(_, values) => {
                let bytes = values
                    .iter()
                    .flat_map(|(num, den)| num.to_be_bytes().into_iter().chain(den.to_be_bytes()))
                    .collect();
                (5, values.len() as u32, bytes)
            }
            Field::Undefined(_, bytes) => (7, bytes.len() as u32, bytes.to_vec()),
        }
    }
}

const GPS_IFD_POINTER: u16 = 0x8825;
const TIFF_HEADER_LEN: usize = 8;

/// A JPEG whose APP1 segment carries a big-endian TIFF block with `fields`
/// in IFD0.
pub(crate) fn jpeg_with_exif(width: u32, height: u32, fields: &[Field]) -> Vec<u8> {
    jpeg_with_gps(width, height, fields, &[])
}

/// Like [`jpeg_with_exif`], plus a GPS IFD holding `gps` linked from IFD0.
pub(crate) fn jpeg_with_gps(width: u32, height: u32, ifd0: &[Field], gps: &[Field]) -> Vec<u8> {
    let tiff = tiff_block(ifd0, gps);

    let mut app1 = vec![0xFF, 0xE1];
    app1.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&tiff);

    let plain = jpeg_bytes(width, height);
    let mut out = Vec::with_capacity(plain.len() + app1.len());
    out.extend_from_slice(&plain[..2]); // SOI
    out.extend_from_slice(&app1);
    out.extend_from_slice(&plain[2..]);
    out
}

fn tiff_block(ifd0: &[Field], gps: &[Field]) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2A");
    tiff.extend_from_slice(&(TIFF_HEADER_LEN as u32).to_be_bytes());

    if gps.is_empty() {
        tiff.extend_from_slice(&ifd(ifd0, None, TIFF_HEADER_LEN));
        return tiff;
    }

    // The pointer value does not change the IFD0 length.
    let ifd0_len = ifd(ifd0, Some(0), TIFF_HEADER_LEN).len();
    let gps_offset = TIFF_HEADER_LEN + ifd0_len;
    tiff.extend_from_slice(&ifd(ifd0, Some(gps_offset as u32), TIFF_HEADER_LEN));
    tiff.extend_from_slice(&ifd(gps, None, gps_offset));
    tiff
}

/// One IFD starting at `start` (relative to the TIFF header), followed by
/// the payloads that do not fit inline.
fn ifd(fields: &[Field], gps_pointer: Option<u32>, start: usize) -> Vec<u8> {
    let pointer = gps_pointer.map(|offset| Field::Long(GPS_IFD_POINTER, offset));
    let mut sorted: Vec<&Field> = fields.iter().chain(pointer.as_ref()).collect();
    sorted.sort_by_key(|f| f.tag());

    let data_start = start + 2 + 12 * sorted.len() + 4;
    let mut entries = Vec::new();
    let mut data = Vec::new();
    entries.extend_from_slice(&(sorted.len() as u16).to_be_bytes());

    for field in sorted {
        let (kind, count, mut payload) = field.encoded();
        entries.extend_from_slice(&field.tag().to_be_bytes());
        entries.extend_from_slice(&kind.to_be_bytes());
        entries.extend_from_slice(&count.to_be_bytes());
        if payload.len() <= 4 {
            payload.resize(4, 0);
            entries.extend_from_slice(&payload);
        } else {
            let offset = data_start + data.len();
            entries.extend_from_slice(&(offset as u32).to_be_bytes());
            data.extend_from_slice(&payload);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    }
    entries.extend_from_slice(&0u32.to_be_bytes());
    entries.extend_from_slice(&data);
    entries
}
