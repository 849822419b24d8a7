//! Output delivery strategies.
//!
//! The device class is probed once at startup and picks a [`Delivery`]; the
//! handlers never branch on the device themselves.

use crate::ScrubError;
use crate::scrub::ScrubbedResult;
use crate::settings::Settings;
use std::time::Duration;

/// Browser-held object URLs and the few window operations delivery needs.
pub trait BlobHost {
    /// Creates a transient URL referencing `bytes` typed as `mime`.
    fn create_url(&self, bytes: &[u8], mime: &str) -> Result<String, ScrubError>;
    fn revoke_url(&self, url: &str);
    fn revoke_url_later(&self, url: String, delay: Duration);
    /// Triggers a save-as of `url` under `file_name`.
    fn save_as(&self, url: &str, file_name: &str) -> Result<(), ScrubError>;
    /// Opens `url` in a new browsing context. `false` when blocked.
    fn open_tab(&self, url: &str) -> bool;
    /// Displays `url` inline as an image the user can long-press.
    fn show_inline(&self, url: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

const MOBILE_AGENTS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

impl DeviceClass {
    pub fn probe(user_agent: &str, max_touch_points: u32) -> Self {
        let agent = user_agent.to_lowercase();
        if MOBILE_AGENTS.iter().any(|m| agent.contains(m)) || max_touch_points > 2 {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// How a delivery concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivered {
    Saved,
    OpenedInTab,
    ShownInline,
}

impl Delivered {
    pub fn status(self) -> &'static str {
        match self {
            Delivered::Saved => "Image downloaded!",
            Delivered::OpenedInTab => {
                "Image opened in a new tab. Press and hold on the image to save it."
            }
            Delivered::ShownInline => {
                "Popup blocked. Output image displayed below, press and hold to save or copy:"
            }
        }
    }
}

pub trait Delivery {
    fn deliver(
        &self,
        result: &ScrubbedResult,
        host: &dyn BlobHost,
        settings: &Settings,
    ) -> Result<Delivered, ScrubError>;

    /// Whether the clipboard copy path is offered.
    fn supports_copy(&self) -> bool;

    /// Status shown when delivery fails.
    fn failure_status(&self) -> &'static str;
}

/// Named-file download; the URL is released as soon as the save is triggered.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopDelivery;

impl Delivery for DesktopDelivery {
    fn deliver(
        &self,
        result: &ScrubbedResult,
        host: &dyn BlobHost,
        _settings: &Settings,
    ) -> Result<Delivered, ScrubError> {
        let url = host.create_url(&result.bytes, &result.mime)?;
        let saved = host.save_as(&url, &result.file_name);
        host.revoke_url(&url);
        saved.map(|_| Delivered::Saved)
    }

    fn supports_copy(&self) -> bool {
        true
    }

    fn failure_status(&self) -> &'static str {
        "There was an error downloading the image. Please try again."
    }
}

/// New-tab view with an inline fallback. The URL outlives the call so the
/// opened view has time to load it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MobileDelivery;

impl Delivery for MobileDelivery {
    fn deliver(
        &self,
        result: &ScrubbedResult,
        host: &dyn BlobHost,
        settings: &Settings,
    ) -> Result<Delivered, ScrubError> {
        let url = host.create_url(&result.bytes, &result.mime)?;
        let outcome = if host.open_tab(&url) {
            Delivered::OpenedInTab
        } else {
            host.show_inline(&url);
            Delivered::ShownInline
        };
        host.revoke_url_later(url, settings.revoke_delay);
        Ok(outcome)
    }

    fn supports_copy(&self) -> bool {
        false
    }

    fn failure_status(&self) -> &'static str {
        "There was an error opening the image. Please try again."
    }
}

pub fn delivery_for(device: DeviceClass) -> Box<dyn Delivery> {
    match device {
        DeviceClass::Desktop => Box::new(DesktopDelivery),
        DeviceClass::Mobile => Box::new(MobileDelivery),
    }
}
