// crates/camophoto-core/src/lib.rs

pub mod clipboard;
pub mod controller;
pub mod delivery;
pub mod exif;
pub mod input;
pub mod metadata;
pub mod png;
pub mod present;
pub mod scrub;
pub mod session;
pub mod settings;
pub mod surface;

#[cfg(test)]
pub(crate) mod testutil;

pub use clipboard::{Clipboard, ClipboardError, ClipboardImage};
pub use controller::Controller;
pub use delivery::{BlobHost, Delivered, Delivery, DeviceClass, delivery_for};
pub use exif::{ExifTagReader, TagMap, TagReader, TagValue};
pub use input::{Candidate, InputSource, SelectedFile};
pub use metadata::{MetadataReader, MetadataRecord};
pub use present::{MetadataSection, group_metadata};
pub use scrub::{ScrubbedResult, scrub};
pub use session::{ActionFlags, SessionState};
pub use settings::Settings;
pub use surface::Surface;

use thiserror::Error;

/// A universal error type for all camophoto operations.
#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("Not an image: {0}")]
    NotAnImage(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("EXIF parsing failed: {0}")]
    ParsingError(String),

    #[error("Failed to load image: {0}")]
    Decode(String),

    #[error("Failed to create image blob: {0}")]
    Encode(String),

    #[error("Browser host error: {0}")]
    Host(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
