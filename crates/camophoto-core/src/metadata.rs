//! Turns an image's EXIF tags (or, lacking those, its basic file facts) into a
//! flat record of human-readable labels and display strings.

use crate::exif::{ExifTagReader, TagMap, TagReader, TagValue, format_number};
use crate::input::SelectedFile;
use crate::scrub::{self, ScrubbedResult};
use std::collections::BTreeMap;

/// The fixed label vocabulary of a [`MetadataRecord`].
pub mod labels {
    pub const FILE_NAME: &str = "File Name";
    pub const FILE_SIZE: &str = "File Size";
    pub const FILE_TYPE: &str = "File Type";
    pub const IMAGE_DIMENSIONS: &str = "Image Dimensions";
    pub const METADATA_STATUS: &str = "Metadata Status";
    pub const ERROR: &str = "Error";

    pub const DATE_TAKEN: &str = "Date Taken";
    pub const ORIGINAL_DATE: &str = "Original Date";
    pub const DIGITIZED_DATE: &str = "Digitized Date";

    pub const GPS_LATITUDE: &str = "GPS Latitude";
    pub const GPS_LONGITUDE: &str = "GPS Longitude";
    pub const GPS_ALTITUDE: &str = "GPS Altitude";
    pub const GPS_DATA: &str = "GPS Data";

    pub const ARTIST: &str = "Artist";
    pub const AUTHOR: &str = "Author";
    pub const COPYRIGHT: &str = "Copyright";

    pub const TITLE: &str = "Title";
    pub const SUBJECT: &str = "Subject";
    pub const KEYWORDS: &str = "Keywords";
    pub const COMMENT: &str = "Comment";
    pub const IMAGE_DESCRIPTION: &str = "Image Description";
    pub const USER_COMMENT: &str = "User Comment";

    pub const CAMERA_MAKE: &str = "Camera Make";
    pub const CAMERA_MODEL: &str = "Camera Model";
    pub const SOFTWARE: &str = "Software";

    pub const EXPOSURE_TIME: &str = "Exposure Time";
    pub const APERTURE: &str = "Aperture";
    pub const ISO: &str = "ISO";
    pub const EXPOSURE_PROGRAM: &str = "Exposure Program";
    pub const EXPOSURE_BIAS: &str = "Exposure Bias";
    pub const METERING_MODE: &str = "Metering Mode";
    pub const FLASH: &str = "Flash";
    pub const FOCAL_LENGTH: &str = "Focal Length";
    pub const MAX_APERTURE: &str = "Max Aperture";
    pub const FOCAL_LENGTH_35MM: &str = "35mm Equivalent";
}

use labels::*;

pub const STATUS_REMOVED: &str = "All metadata has been removed";
pub const STATUS_NONE_DETECTED: &str = "No EXIF metadata detected in this image format";
pub const GPS_UNPARSABLE: &str = "Present but could not be parsed";
pub const DIMENSIONS_UNAVAILABLE: &str = "Could not load image to get dimensions";

const EXPOSURE_PROGRAMS: [&str; 9] = [
    "Not defined",
    "Manual",
    "Normal program",
    "Aperture priority",
    "Shutter priority",
    "Creative program",
    "Action program",
    "Portrait mode",
    "Landscape mode",
];

const METERING_MODES: [&str; 8] = [
    "Unknown",
    "Average",
    "Center-weighted average",
    "Spot",
    "Multi-spot",
    "Pattern",
    "Partial",
    "Other",
];

/// Label to display value. Field order carries no meaning; the presenter
/// imposes its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRecord {
    fields: BTreeMap<&'static str, String>,
}

impl MetadataRecord {
    pub fn insert(&mut self, label: &'static str, value: impl Into<String>) {
        self.fields.insert(label, value.into());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.fields.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(label, value)| (*label, value.as_str()))
    }
}

/// Builds a [`MetadataRecord`] for the current file.
#[derive(Debug, Default, Clone)]
pub struct MetadataReader<R = ExifTagReader> {
    tags: R,
}

impl<R: TagReader> MetadataReader<R> {
    pub fn new(tags: R) -> Self {
        Self { tags }
    }

    /// Never fails: an undecodable image surfaces as an `Error` field.
    pub fn read(&self, file: &SelectedFile, scrubbed: Option<&ScrubbedResult>) -> MetadataRecord {
        let mut record = MetadataRecord::default();
        let name = scrubbed.map_or(file.name.as_str(), |result| result.file_name.as_str());
        record.insert(FILE_NAME, name);
        record.insert(FILE_SIZE, format!("{:.2} KB", file.size_kb()));
        record.insert(FILE_TYPE, file.mime.as_str());

        let tags = self.tags.read_tags(&file.bytes).unwrap_or_else(|e| {
            log::debug!("Tag extraction failed for {}: {}", file.name, e);
            TagMap::new()
        });

        if tags.is_empty() {
            let only_file_info = record.len() == 3;
            match scrub::dimensions(&file.bytes) {
                Ok((width, height)) => {
                    record.insert(IMAGE_DIMENSIONS, format!("{width} × {height} pixels"));
                    if scrubbed.is_some() {
                        record.insert(METADATA_STATUS, STATUS_REMOVED);
                    } else if only_file_info {
                        record.insert(METADATA_STATUS, STATUS_NONE_DETECTED);
                    }
                }
                Err(e) => {
                    log::debug!("Could not read dimensions of {}: {}", file.name, e);
                    record.insert(ERROR, DIMENSIONS_UNAVAILABLE);
                }
            }
            return record;
        }

        describe_tags(&tags, &mut record);

        // Inspects the file as it is now, not a diff against the original.
        if scrubbed.is_some() && tags.len() <= 1 {
            record.insert(METADATA_STATUS, STATUS_REMOVED);
        }
        record
    }
}

fn describe_tags(tags: &TagMap, record: &mut MetadataRecord) {
    if let (Some(x), Some(y)) = (tags.get("PixelXDimension"), tags.get("PixelYDimension")) {
        record.insert(IMAGE_DIMENSIONS, format!("{x} × {y} pixels"));
    }

    insert_text(record, CAMERA_MAKE, tags.get("Make"));
    insert_text(record, CAMERA_MODEL, tags.get("Model"));
    insert_text(record, SOFTWARE, tags.get("Software"));

    insert_text(record, DATE_TAKEN, tags.get("DateTime"));
    insert_text(record, ORIGINAL_DATE, tags.get("DateTimeOriginal"));
    insert_text(record, DIGITIZED_DATE, tags.get("DateTimeDigitized"));

    if let Some(value) = tags.get("ExposureTime") {
        record.insert(EXPOSURE_TIME, format!("{value} sec"));
    }
    if let Some(value) = tags.get("FNumber") {
        record.insert(APERTURE, format!("f/{value}"));
    }
    if let Some(value) = tags.get("ISOSpeedRatings") {
        record.insert(ISO, value.to_string());
    }
    if let Some(value) = tags.get("ExposureProgram") {
        record.insert(EXPOSURE_PROGRAM, lookup(&EXPOSURE_PROGRAMS, value));
    }
    if let Some(value) = tags.get("ExposureBiasValue") {
        record.insert(EXPOSURE_BIAS, format!("{value} EV"));
    }
    if let Some(value) = tags.get("MeteringMode") {
        record.insert(METERING_MODE, lookup(&METERING_MODES, value));
    }
    if let Some(value) = tags.get("Flash") {
        record.insert(FLASH, flash(value));
    }
    if let Some(value) = tags.get("FocalLength") {
        record.insert(FOCAL_LENGTH, format!("{value} mm"));
    }
    if let Some(apex) = tags.get("MaxApertureValue").and_then(TagValue::as_number) {
        record.insert(
            MAX_APERTURE,
            format!("f/{:.1}", std::f64::consts::SQRT_2.powf(apex)),
        );
    }
    if let Some(value) = tags.get("FocalLengthIn35mmFilm") {
        record.insert(FOCAL_LENGTH_35MM, format!("{value} mm"));
    }

    describe_gps(tags, record);

    insert_text(record, COPYRIGHT, tags.get("Copyright"));
    insert_text(record, ARTIST, tags.get("Artist"));
    insert_text(record, AUTHOR, tags.get("XPAuthor"));

    insert_text(record, IMAGE_DESCRIPTION, tags.get("ImageDescription"));
    insert_text(record, USER_COMMENT, tags.get("UserComment"));

    insert_text(record, TITLE, tags.get("XPTitle"));
    insert_text(record, COMMENT, tags.get("XPComment"));
    insert_text(record, SUBJECT, tags.get("XPSubject"));
    insert_text(record, KEYWORDS, tags.get("XPKeywords"));
}

fn insert_text(record: &mut MetadataRecord, label: &'static str, value: Option<&TagValue>) {
    let Some(value) = value else { return };
    let text = value.to_string();
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        record.insert(label, trimmed);
    }
}

/// Enumerated tags: index into `names`, falling back to `Unknown (<value>)`.
fn lookup(names: &[&str], value: &TagValue) -> String {
    value
        .as_number()
        .filter(|n| n.fract() == 0.0 && *n >= 0.0)
        .and_then(|n| names.get(n as usize))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Unknown ({value})"))
}

fn flash(value: &TagValue) -> &'static str {
    let raw = value.as_number().unwrap_or(0.0) as u32;
    if raw & 0x1 == 1 { "Fired" } else { "Did not fire" }
}

struct UnparsableGps;

fn describe_gps(tags: &TagMap, record: &mut MetadataRecord) {
    if !tags.contains_key("GPSLatitude") {
        return;
    }
    match gps_fields(tags) {
        Ok(fields) => {
            for (label, value) in fields {
                record.insert(label, value);
            }
        }
        Err(UnparsableGps) => record.insert(GPS_DATA, GPS_UNPARSABLE),
    }
}

fn gps_fields(tags: &TagMap) -> Result<Vec<(&'static str, String)>, UnparsableGps> {
    let mut fields = Vec::with_capacity(3);

    let latitude = tags.get("GPSLatitude").ok_or(UnparsableGps)?;
    fields.push((
        GPS_LATITUDE,
        format!(
            "{:.6}° {}",
            decimal_degrees(latitude)?,
            reference(tags, "GPSLatitudeRef", "N")
        ),
    ));

    if let Some(longitude) = tags.get("GPSLongitude") {
        fields.push((
            GPS_LONGITUDE,
            format!(
                "{:.6}° {}",
                decimal_degrees(longitude)?,
                reference(tags, "GPSLongitudeRef", "E")
            ),
        ));
    }

    if let Some(altitude) = tags.get("GPSAltitude") {
        let meters = altitude
            .as_number()
            .filter(|m| m.is_finite())
            .ok_or(UnparsableGps)?;
        let below_sea_level = tags.get("GPSAltitudeRef").is_some_and(is_truthy);
        fields.push((
            GPS_ALTITUDE,
            format!(
                "{}{} meters",
                if below_sea_level { "-" } else { "" },
                format_number(meters)
            ),
        ));
    }

    Ok(fields)
}

/// Degrees, minutes, seconds to decimal degrees.
fn decimal_degrees(value: &TagValue) -> Result<f64, UnparsableGps> {
    match value.as_numbers() {
        Some([deg, min, sec, ..]) if deg.is_finite() && min.is_finite() && sec.is_finite() => {
            Ok(deg + min / 60.0 + sec / 3600.0)
        }
        _ => Err(UnparsableGps),
    }
}

fn reference<'a>(tags: &'a TagMap, name: &str, default: &'a str) -> &'a str {
    tags.get(name)
        .and_then(TagValue::as_text)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(default)
}

fn is_truthy(value: &TagValue) -> bool {
    match value {
        TagValue::Bytes(bytes) => bytes.first().is_some_and(|b| *b != 0),
        TagValue::Text(text) => !text.is_empty(),
        other => other.as_number().is_some_and(|n| n != 0.0),
    }
}
