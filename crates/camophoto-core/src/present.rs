//! Groups a [`MetadataRecord`] into fixed, ordered categories for display.

use crate::metadata::MetadataRecord;
use crate::metadata::labels::*;
use std::fmt;

/// Display categories and their labels, in presentation order.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "File Information",
        &[FILE_NAME, FILE_TYPE, FILE_SIZE, IMAGE_DIMENSIONS, METADATA_STATUS, ERROR],
    ),
    ("Date and Time", &[DATE_TAKEN, ORIGINAL_DATE, DIGITIZED_DATE]),
    (
        "Location Data",
        &[GPS_LATITUDE, GPS_LONGITUDE, GPS_ALTITUDE, GPS_DATA],
    ),
    ("Author and Copyright", &[ARTIST, AUTHOR, COPYRIGHT]),
    (
        "Description",
        &[TITLE, SUBJECT, KEYWORDS, COMMENT, IMAGE_DESCRIPTION, USER_COMMENT],
    ),
    ("Camera Information", &[CAMERA_MAKE, CAMERA_MODEL, SOFTWARE]),
    (
        "Camera Settings",
        &[
            EXPOSURE_TIME,
            APERTURE,
            ISO,
            EXPOSURE_PROGRAM,
            EXPOSURE_BIAS,
            METERING_MODE,
            FLASH,
            FOCAL_LENGTH,
            MAX_APERTURE,
            FOCAL_LENGTH_35MM,
        ],
    ),
];

/// One rendered category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSection {
    pub title: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

impl fmt::Display for MetadataSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for (label, value) in &self.fields {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

/// Categories with at least one non-empty field, in fixed order.
pub fn group_metadata(record: &MetadataRecord) -> Vec<MetadataSection> {
    CATEGORIES
        .iter()
        .filter_map(|&(title, labels)| {
            let fields: Vec<(&'static str, String)> = labels
                .iter()
                .filter_map(|label| {
                    record
                        .get(label)
                        .filter(|value| !value.is_empty())
                        .map(|value| (*label, value.to_string()))
                })
                .collect();
            (!fields.is_empty()).then_some(MetadataSection { title, fields })
        })
        .collect()
}
