//! Input acquisition: every source (drop, picker, paste, clipboard read)
//! produces a [`Candidate`], and only image candidates become a [`SelectedFile`].

use crate::ScrubError;
use crate::clipboard::ClipboardImage;

/// Shown whenever a non-image candidate is rejected.
pub const INVALID_IMAGE_MESSAGE: &str =
    "Please select a valid image file (.png, .jpeg, .jpg, .heic, .webp)";

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Drop,
    Picker,
    Paste,
    ClipboardRead,
}

impl InputSource {
    /// Paste and clipboard reads have no visible gesture, so the drop zone
    /// pulses to confirm receipt.
    pub fn confirms_receipt(self) -> bool {
        matches!(self, InputSource::Paste | InputSource::ClipboardRead)
    }
}

/// A file-like object before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    /// Declared MIME type; empty when the source did not declare one.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Builds a candidate for sources that only report a file name.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name)
            .first_raw()
            .unwrap_or_default()
            .to_string();
        Self { name, mime, bytes }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

impl From<ClipboardImage> for Candidate {
    fn from(image: ClipboardImage) -> Self {
        let subtype = image
            .mime
            .split_once('/')
            .map(|(_, sub)| sub)
            .filter(|sub| !sub.is_empty())
            .unwrap_or("png");
        Candidate {
            name: format!("pasted-image.{subtype}"),
            mime: image.mime,
            bytes: image.bytes,
        }
    }
}

/// The active input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    /// Lowercased suffix of `name`, if it has one.
    pub extension: Option<String>,
}

impl SelectedFile {
    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }
}

/// Lowercased suffix after the last `.` of a file name.
pub fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}

/// Validates a candidate and turns it into the selected file.
pub fn select(candidate: Candidate) -> Result<SelectedFile, ScrubError> {
    if !candidate.is_image() {
        return Err(ScrubError::NotAnImage(if candidate.mime.is_empty() {
            candidate.name
        } else {
            candidate.mime
        }));
    }
    let extension = extension_of(&candidate.name);
    Ok(SelectedFile {
        name: candidate.name,
        mime: candidate.mime,
        bytes: candidate.bytes,
        extension,
    })
}

/// Picks the first pasted item that carries an image.
pub fn first_image(items: Vec<Candidate>) -> Option<Candidate> {
    items.into_iter().find(|item| item.mime.contains("image"))
}
