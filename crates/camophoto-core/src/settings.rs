use std::time::Duration;

/// Tunables shared by the scrubber, the delivery strategies and the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// File stem of every scrubbed output, e.g. `camophoto_output.jpg`.
    pub output_stem: String,
    /// Quality requested from the JPEG encoder (1-100).
    pub jpeg_quality: u8,
    /// How long a mobile object URL stays alive so the opened tab can load it.
    pub revoke_delay: Duration,
    /// Drop zone pulse shown when an image arrives without a drag gesture.
    pub pulse: Duration,
    /// Highlight on the download action after a failed clipboard copy.
    pub download_highlight: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_stem: "camophoto_output".to_string(),
            jpeg_quality: 100,
            revoke_delay: Duration::from_secs(60),
            pulse: Duration::from_millis(300),
            download_highlight: Duration::from_secs(3),
        }
    }
}

impl Settings {
    /// Output file name for an image whose original extension was `extension`.
    pub fn output_name(&self, extension: Option<&str>) -> String {
        match extension {
            Some(ext) => format!("{}.{}", self.output_stem, ext),
            None => self.output_stem.clone(),
        }
    }
}
