//! EXIF tag extraction.
//!
//! The metadata reader never talks to `nom-exif` directly: it consumes a flat
//! [`TagMap`] through the [`TagReader`] trait, keyed by the conventional EXIF
//! tag names (`FNumber`, `GPSLatitude`, `XPAuthor`, ...).

use crate::ScrubError;
use nom_exif::{EntryValue, ExifIter, MediaParser, MediaSource};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;

/// Tag name to value, as yielded by a [`TagReader`].
pub type TagMap = BTreeMap<String, TagValue>;

/// A decoded tag value. Rationals are already divided out.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Number(f64),
    Numbers(Vec<f64>),
    Bytes(Vec<u8>),
}

impl TagValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The scalar value, or the first element of a numeric array.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TagValue::Number(n) => Some(*n),
            TagValue::Numbers(values) => values.first().copied(),
            _ => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            TagValue::Numbers(values) => Some(values),
            TagValue::Number(n) => Some(std::slice::from_ref(n)),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(text) => f.write_str(text),
            TagValue::Number(n) => f.write_str(&format_number(*n)),
            TagValue::Numbers(values) => {
                let joined: Vec<String> = values.iter().map(|v| format_number(*v)).collect();
                f.write_str(&joined.join(", "))
            }
            TagValue::Bytes(bytes) => write!(f, "{} bytes", bytes.len()),
        }
    }
}

/// Shortest round-trip rendering: `2.0` prints as `2`, `0.008` as `0.008`.
pub(crate) fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Given image bytes, yields every EXIF tag found.
///
/// Formats without tag support and files without tags yield an empty map.
pub trait TagReader {
    fn read_tags(&self, bytes: &[u8]) -> Result<TagMap, ScrubError>;
}

/// [`TagReader`] backed by `nom-exif`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifTagReader;

impl ExifTagReader {
    /// EXIF orientation (1-8) of the primary image, if tagged.
    pub fn orientation(&self, bytes: &[u8]) -> Option<u32> {
        let tags = self.read_tags(bytes).ok()?;
        tags.get("Orientation")
            .and_then(TagValue::as_number)
            .map(|n| n as u32)
    }
}

impl TagReader for ExifTagReader {
    fn read_tags(&self, bytes: &[u8]) -> Result<TagMap, ScrubError> {
        let media_source = match MediaSource::seekable(Cursor::new(bytes)) {
            Ok(source) => source,
            Err(e) => {
                log::debug!("No EXIF container recognised: {:?}", e);
                return Ok(TagMap::new());
            }
        };

        if !media_source.has_exif() {
            return Ok(TagMap::new());
        }

        let mut parser = MediaParser::new();
        let exif_iter: ExifIter = parser
            .parse(media_source)
            .map_err(|e| ScrubError::ParsingError(format!("Failed to parse EXIF: {:?}", e)))?;

        let mut tags = TagMap::new();
        for entry in exif_iter {
            let code = entry.tag_code();
            let Some(value) = entry.get_value().and_then(|v| convert(code, v)) else {
                continue;
            };
            if code < GPS_CODE_LIMIT && !has_gps_shape(code, &value) {
                continue;
            }
            let name = tag_name(code)
                .map(str::to_string)
                .or_else(|| entry.tag().map(|tag| format!("{tag:?}")))
                .unwrap_or_else(|| format!("Tag0x{code:04X}"));
            // IFD0 comes before the thumbnail IFD; keep the primary image's value.
            tags.entry(name).or_insert(value);
        }
        Ok(tags)
    }
}

const GPS_CODE_LIMIT: u16 = 0x0020;
const USER_COMMENT: u16 = 0x9286;
const XP_TAGS: std::ops::RangeInclusive<u16> = 0x9c9b..=0x9c9f;
const DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Names for the tags the metadata reader looks up. Other tags are named by
/// `nom-exif`; it has no names for the Windows XP* tags.
fn tag_name(code: u16) -> Option<&'static str> {
    let name = match code {
        0x0001 => "GPSLatitudeRef",
        0x0002 => "GPSLatitude",
        0x0003 => "GPSLongitudeRef",
        0x0004 => "GPSLongitude",
        0x0005 => "GPSAltitudeRef",
        0x0006 => "GPSAltitude",
        0x010e => "ImageDescription",
        0x010f => "Make",
        0x0110 => "Model",
        0x0112 => "Orientation",
        0x0131 => "Software",
        0x0132 => "DateTime",
        0x013b => "Artist",
        0x8298 => "Copyright",
        0x829a => "ExposureTime",
        0x829d => "FNumber",
        0x8822 => "ExposureProgram",
        0x8827 => "ISOSpeedRatings",
        0x9003 => "DateTimeOriginal",
        0x9004 => "DateTimeDigitized",
        0x9204 => "ExposureBiasValue",
        0x9205 => "MaxApertureValue",
        0x9207 => "MeteringMode",
        0x9209 => "Flash",
        0x920a => "FocalLength",
        0x9286 => "UserComment",
        0x9c9b => "XPTitle",
        0x9c9c => "XPComment",
        0x9c9d => "XPAuthor",
        0x9c9e => "XPKeywords",
        0x9c9f => "XPSubject",
        0xa002 => "PixelXDimension",
        0xa003 => "PixelYDimension",
        0xa405 => "FocalLengthIn35mmFilm",
        _ => return None,
    };
    Some(name)
}

/// Interoperability entries share the low tag codes with GPS; only keep
/// values that look like the GPS tag they would be named after.
fn has_gps_shape(code: u16, value: &TagValue) -> bool {
    match code {
        0x0001 | 0x0003 => value.as_text().is_some_and(|r| r.trim().len() == 1),
        0x0002 | 0x0004 => matches!(value, TagValue::Numbers(_)),
        0x0005 | 0x0006 => value.as_number().is_some(),
        _ => true,
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    num / den
}

fn convert(code: u16, value: &EntryValue) -> Option<TagValue> {
    let converted = match value {
        EntryValue::Text(text) => TagValue::Text(text.trim_end_matches('\0').to_string()),
        EntryValue::URational(r) => TagValue::Number(ratio(r.0 as f64, r.1 as f64)),
        EntryValue::IRational(r) => TagValue::Number(ratio(r.0 as f64, r.1 as f64)),
        EntryValue::U8(v) => TagValue::Number(f64::from(*v)),
        EntryValue::U16(v) => TagValue::Number(f64::from(*v)),
        EntryValue::U32(v) => TagValue::Number(f64::from(*v)),
        EntryValue::I16(v) => TagValue::Number(f64::from(*v)),
        EntryValue::I32(v) => TagValue::Number(f64::from(*v)),
        EntryValue::F32(v) => TagValue::Number(f64::from(*v)),
        EntryValue::F64(v) => TagValue::Number(*v),
        EntryValue::Time(t) => TagValue::Text(t.format(DATE_FORMAT).to_string()),
        EntryValue::NaiveDateTime(t) => TagValue::Text(t.format(DATE_FORMAT).to_string()),
        EntryValue::URationalArray(values) => TagValue::Numbers(
            values
                .iter()
                .map(|r| ratio(r.0 as f64, r.1 as f64))
                .collect(),
        ),
        EntryValue::IRationalArray(values) => TagValue::Numbers(
            values
                .iter()
                .map(|r| ratio(r.0 as f64, r.1 as f64))
                .collect(),
        ),
        EntryValue::U16Array(values) => {
            TagValue::Numbers(values.iter().map(|v| f64::from(*v)).collect())
        }
        EntryValue::U32Array(values) => {
            TagValue::Numbers(values.iter().map(|v| f64::from(*v)).collect())
        }
        EntryValue::U8Array(bytes) | EntryValue::Undefined(bytes) => {
            if code == USER_COMMENT {
                TagValue::Text(decode_user_comment(bytes))
            } else if XP_TAGS.contains(&code) {
                TagValue::Text(decode_utf16le(bytes))
            } else {
                TagValue::Bytes(bytes.clone())
            }
        }
        other => TagValue::Text(format!("{:?}", other)),
    };
    Some(converted)
}

/// Windows XP* tags are NUL-terminated UTF-16LE.
fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|unit| *unit != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

/// UserComment carries an 8-byte character code before the text.
fn decode_user_comment(bytes: &[u8]) -> String {
    if bytes.len() < 8 {
        return String::from_utf8_lossy(bytes)
            .trim_end_matches('\0')
            .to_string();
    }
    let (code, text) = bytes.split_at(8);
    if code == b"UNICODE\0" {
        let big_endian = text.first() == Some(&0);
        let units: Vec<u16> = text
            .chunks_exact(2)
            .map(|pair| {
                if big_endian {
                    u16::from_be_bytes([pair[0], pair[1]])
                } else {
                    u16::from_le_bytes([pair[0], pair[1]])
                }
            })
            .take_while(|unit| *unit != 0)
            .collect();
        return String::from_utf16_lossy(&units);
    }
    String::from_utf8_lossy(text)
        .trim_end_matches('\0')
        .to_string()
}
