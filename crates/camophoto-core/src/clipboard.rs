use thiserror::Error;

/// Failures of the platform clipboard capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard API not supported in this browser")]
    Unsupported,

    #[error("Clipboard permission denied: {0}")]
    PermissionDenied(String),

    #[error("Clipboard operation failed: {0}")]
    Failed(String),
}

/// An image item read back from the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// The platform's asynchronous clipboard.
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    /// Writes a PNG-encoded image to the clipboard.
    async fn write_png(&self, png: Vec<u8>) -> Result<(), ClipboardError>;

    /// Reads the first image item from the clipboard, if there is one.
    async fn read_image(&self) -> Result<Option<ClipboardImage>, ClipboardError>;
}
