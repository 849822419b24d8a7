//! The controller owns the session state and runs every user action against
//! it, reporting results through the collaborators. It is the single place
//! where errors turn into plain-language status text.

use crate::clipboard::{Clipboard, ClipboardError};
use crate::delivery::{BlobHost, Delivery, DeviceClass, delivery_for};
use crate::input::{self, Candidate, INVALID_IMAGE_MESSAGE, InputSource};
use crate::metadata::MetadataReader;
use crate::present::group_metadata;
use crate::scrub;
use crate::session::{ActionFlags, SessionState};
use crate::settings::Settings;
use crate::surface::Surface;
use std::cell::{Cell, RefCell};

const PASTED: &str = "Image pasted successfully!";
const NO_PASTED_IMAGE: &str = "No image found in clipboard. Try copying an image first.";
const NO_CLIPBOARD_IMAGE: &str = "No image found in clipboard.";
const CLIPBOARD_READ_UNSUPPORTED: &str = "Clipboard access not supported in this browser.";
const CLIPBOARD_READ_DENIED: &str = "Could not access clipboard. You may need to grant permission.";
const READING_METADATA: &str = "Reading metadata...";
const PROCESSING: &str = "Processing...";
const STRIPPED: &str = "Metadata removed!";
const PREPARING_COPY: &str = "Preparing image for clipboard...";
const COPIED: &str = "Image copied to clipboard!";
const COPY_FALLBACK: &str = "Copying images to clipboard is not supported in this browser. \
                             Please use the Download button instead.";
const COPY_ON_MOBILE: &str = "Copying to clipboard is not supported on mobile devices. \
                              Please use the Download button instead.";

/// Runs the single-file session: select, inspect, strip, deliver, reset.
///
/// All methods take `&self`; state lives in cells and no borrow is held
/// across an `.await`, so handlers may interleave on one event loop. Each
/// selection or reset starts a new session generation, and work suspended
/// across that boundary is dropped instead of applied.
pub struct Controller<S, H, C> {
    surface: S,
    host: H,
    clipboard: C,
    delivery: Box<dyn Delivery>,
    reader: MetadataReader,
    settings: Settings,
    state: RefCell<SessionState>,
    strip_pending: Cell<bool>,
    generation: Cell<u64>,
}

impl<S: Surface, H: BlobHost, C: Clipboard> Controller<S, H, C> {
    pub fn new(surface: S, host: H, clipboard: C, device: DeviceClass, settings: Settings) -> Self {
        log::info!("Starting session on a {:?} device", device);
        let controller = Self {
            surface,
            host,
            clipboard,
            delivery: delivery_for(device),
            reader: MetadataReader::default(),
            settings,
            state: RefCell::new(SessionState::default()),
            strip_pending: Cell::new(false),
            generation: Cell::new(0),
        };
        controller.refresh_actions();
        controller
    }

    /// A copy of the current session state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether the copy action should be offered at all.
    pub fn supports_copy(&self) -> bool {
        self.delivery.supports_copy()
    }

    /// The single entry point for every input source. Returns whether the
    /// candidate became the selected file.
    pub fn accept(&self, candidate: Candidate, source: InputSource) -> bool {
        let file = match input::select(candidate) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Rejected {:?} input: {}", source, e);
                self.surface.show_status(INVALID_IMAGE_MESSAGE);
                return false;
            }
        };

        log::info!(
            "Selected {} ({}, {} bytes) from {:?}",
            file.name,
            file.mime,
            file.bytes.len(),
            source
        );
        self.surface.show_file_name(&file.name);
        self.surface.show_status("");
        self.strip_pending.set(false);
        self.next_generation();
        self.state.replace_with(|state| std::mem::take(state).select(file));
        self.refresh_actions();

        if source.confirms_receipt() {
            self.surface.pulse_drop_zone(self.settings.pulse);
            self.surface.show_status(PASTED);
        }
        true
    }

    /// Handles a paste event carrying clipboard items.
    pub fn paste_items(&self, items: Vec<Candidate>) {
        match input::first_image(items) {
            Some(candidate) => {
                self.accept(candidate, InputSource::Paste);
            }
            None => self.surface.show_status(NO_PASTED_IMAGE),
        }
    }

    /// Reads an image through the clipboard capability (the mobile paste action).
    pub async fn paste_from_clipboard(&self) {
        match self.clipboard.read_image().await {
            Ok(Some(image)) => {
                self.accept(Candidate::from(image), InputSource::ClipboardRead);
            }
            Ok(None) => self.surface.show_status(NO_CLIPBOARD_IMAGE),
            Err(ClipboardError::Unsupported) => {
                self.surface.show_status(CLIPBOARD_READ_UNSUPPORTED)
            }
            Err(e) => {
                log::error!("Clipboard access error: {}", e);
                self.surface.show_status(CLIPBOARD_READ_DENIED);
            }
        }
    }

    pub async fn view_metadata(&self) {
        if !self.state.borrow().has_file() {
            return;
        }

        self.surface.show_status(READING_METADATA);
        self.surface.repaint().await;

        let state = self.snapshot();
        let Some(file) = state.selected.as_ref() else {
            return;
        };
        let record = self.reader.read(file, state.scrubbed.as_ref());
        log::debug!("Read {} metadata fields for {}", record.len(), file.name);
        self.surface.render_metadata(&group_metadata(&record));
        self.surface.show_status("");
    }

    pub fn close_metadata(&self) {
        self.surface.close_metadata();
    }

    /// Strips metadata from the selected file. A failure leaves the
    /// selection intact and re-enables the action for a retry.
    pub async fn strip(&self) {
        if self.strip_pending.get() {
            return;
        }
        let file = {
            let state = self.state.borrow();
            match (&state.selected, &state.scrubbed) {
                (Some(file), None) => file.clone(),
                _ => return,
            }
        };

        let generation = self.generation.get();
        self.strip_pending.set(true);
        self.surface.show_status(PROCESSING);
        self.refresh_actions();
        self.surface.repaint().await;

        if self.generation.get() != generation {
            log::debug!("Dropping strip of {}: selection changed", file.name);
            return;
        }
        let outcome = scrub::scrub(&file, &self.settings);
        self.strip_pending.set(false);

        match outcome {
            Ok(result) => {
                log::info!(
                    "Stripped {} tags from {}; output {} ({} bytes)",
                    result.tags_removed,
                    file.name,
                    result.file_name,
                    result.bytes.len()
                );
                let new_name = result.file_name.clone();
                self.state
                    .replace_with(|state| std::mem::take(state).apply_scrub(result));
                self.surface.show_status(STRIPPED);
                self.surface.show_file_name(&new_name);
            }
            Err(e) => {
                log::warn!("Strip failed for {}: {}", file.name, e);
                self.surface
                    .show_status(&format!("Error: {e} (HEIC may not be supported in your browser)"));
            }
        }
        self.refresh_actions();
    }

    /// Hands the scrubbed result to the device's delivery strategy.
    pub fn download(&self) {
        let Some(result) = self.state.borrow().scrubbed.clone() else {
            return;
        };

        self.surface.show_status(PROCESSING);
        match self.delivery.deliver(&result, &self.host, &self.settings) {
            Ok(delivered) => {
                log::info!("Delivered {} ({:?})", result.file_name, delivered);
                self.surface.show_status(delivered.status());
            }
            Err(e) => {
                log::error!("Error delivering {}: {}", result.file_name, e);
                self.surface.show_status(self.delivery.failure_status());
            }
        }
    }

    /// Copies the scrubbed image to the clipboard as PNG. Never fails
    /// outward: any problem becomes a pointer to the download action.
    pub async fn copy(&self) {
        let Some(bytes) = self
            .state
            .borrow()
            .scrubbed
            .as_ref()
            .map(|result| result.bytes.clone())
        else {
            return;
        };

        if !self.delivery.supports_copy() {
            self.surface.show_status(COPY_ON_MOBILE);
            return;
        }

        self.surface.show_status(PREPARING_COPY);
        let written = match crate::png::to_png(&bytes) {
            Ok(png) => self
                .clipboard
                .write_png(png)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match written {
            Ok(()) => self.surface.show_status(COPIED),
            Err(e) => {
                log::error!("Copy to clipboard error: {}", e);
                self.surface.show_status(COPY_FALLBACK);
                self.surface
                    .highlight_download(self.settings.download_highlight);
            }
        }
    }

    /// Returns the session to its initial state.
    pub fn reset(&self) {
        self.state.replace(SessionState::default());
        self.strip_pending.set(false);
        self.next_generation();
        self.surface.show_file_name("");
        self.surface.show_status("");
        self.refresh_actions();
        self.surface.close_metadata();
        self.surface.clear_picker();
    }

    fn next_generation(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    fn refresh_actions(&self) {
        let flags = ActionFlags::for_state(&self.state.borrow(), self.strip_pending.get());
        self.surface.set_actions(flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardImage;
    use crate::delivery::fake::RecordingHost;
    use crate::present::MetadataSection;
    use crate::testutil;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Status(String),
        FileName(String),
        Actions(ActionFlags),
        Metadata(Vec<MetadataSection>),
        CloseMetadata,
        ClearPicker,
        Pulse(Duration),
        Highlight(Duration),
        Repaint,
    }

    #[derive(Default)]
    struct RecordingSurface {
        events: RefCell<Vec<Event>>,
    }

    impl RecordingSurface {
        fn push(&self, event: Event) {
            self.events.borrow_mut().push(event);
        }

        fn last_status(&self) -> Option<String> {
            self.events.borrow().iter().rev().find_map(|e| match e {
                Event::Status(s) => Some(s.clone()),
                _ => None,
            })
        }

        fn last_actions(&self) -> Option<ActionFlags> {
            self.events.borrow().iter().rev().find_map(|e| match e {
                Event::Actions(a) => Some(*a),
                _ => None,
            })
        }

        fn last_file_name(&self) -> Option<String> {
            self.events.borrow().iter().rev().find_map(|e| match e {
                Event::FileName(n) => Some(n.clone()),
                _ => None,
            })
        }

        fn saw(&self, event: &Event) -> bool {
            self.events.borrow().contains(event)
        }

        fn clear(&self) {
            self.events.borrow_mut().clear();
        }
    }

    impl Surface for RecordingSurface {
        fn show_status(&self, text: &str) {
            self.push(Event::Status(text.to_string()));
        }
        fn show_file_name(&self, name: &str) {
            self.push(Event::FileName(name.to_string()));
        }
        fn set_actions(&self, actions: ActionFlags) {
            self.push(Event::Actions(actions));
        }
        fn render_metadata(&self, sections: &[MetadataSection]) {
            self.push(Event::Metadata(sections.to_vec()));
        }
        fn close_metadata(&self) {
            self.push(Event::CloseMetadata);
        }
        fn clear_picker(&self) {
            self.push(Event::ClearPicker);
        }
        fn pulse_drop_zone(&self, duration: Duration) {
            self.push(Event::Pulse(duration));
        }
        fn highlight_download(&self, duration: Duration) {
            self.push(Event::Highlight(duration));
        }
        async fn repaint(&self) {
            self.push(Event::Repaint);
            tokio::task::yield_now().await;
        }
    }

    /// Clipboard with a scripted read and an optional write failure.
    #[derive(Default)]
    struct FakeClipboard {
        read: RefCell<Option<Result<Option<ClipboardImage>, ClipboardError>>>,
        write_error: Option<ClipboardError>,
        written: RefCell<Vec<Vec<u8>>>,
    }

    impl Clipboard for FakeClipboard {
        async fn write_png(&self, png: Vec<u8>) -> Result<(), ClipboardError> {
            if let Some(e) = &self.write_error {
                return Err(e.clone());
            }
            self.written.borrow_mut().push(png);
            Ok(())
        }

        async fn read_image(&self) -> Result<Option<ClipboardImage>, ClipboardError> {
            self.read.borrow_mut().take().unwrap_or(Ok(None))
        }
    }

    type TestController = Controller<RecordingSurface, RecordingHost, FakeClipboard>;

    fn controller(device: DeviceClass, clipboard: FakeClipboard) -> TestController {
        Controller::new(
            RecordingSurface::default(),
            RecordingHost::default(),
            clipboard,
            device,
            Settings::default(),
        )
    }

    fn desktop() -> TestController {
        controller(DeviceClass::Desktop, FakeClipboard::default())
    }

    fn png_candidate(name: &str) -> Candidate {
        Candidate::new(name, "image/png", testutil::png_bytes(4, 4))
    }

    const ALL_ON: ActionFlags = ActionFlags {
        strip: true,
        reset: true,
        view_metadata: true,
        output: false,
    };

    #[test]
    fn starts_with_everything_disabled() {
        let c = desktop();
        assert_eq!(c.surface().last_actions(), Some(ActionFlags::default()));
    }

    #[test]
    fn accepting_an_image_selects_it() {
        let c = desktop();
        assert!(c.accept(png_candidate("Beach.PNG"), InputSource::Drop));

        let state = c.snapshot();
        let selected = state.selected.unwrap();
        assert_eq!(selected.name, "Beach.PNG");
        assert_eq!(selected.extension.as_deref(), Some("png"));
        assert_eq!(state.original_extension.as_deref(), Some("png"));
        assert_eq!(c.surface().last_actions(), Some(ALL_ON));
        assert_eq!(c.surface().last_file_name().as_deref(), Some("Beach.PNG"));
        assert_eq!(c.surface().last_status().as_deref(), Some(""));
        assert!(!c.surface().saw(&Event::Pulse(Duration::from_millis(300))));
    }

    #[test]
    fn rejecting_a_non_image_changes_nothing() {
        let c = desktop();
        c.accept(png_candidate("first.png"), InputSource::Picker);
        c.surface().clear();

        let accepted = c.accept(
            Candidate::new("notes.txt", "text/plain", b"hi".to_vec()),
            InputSource::Drop,
        );

        assert!(!accepted);
        assert_eq!(c.snapshot().selected.unwrap().name, "first.png");
        assert_eq!(
            c.surface().last_status().as_deref(),
            Some(INVALID_IMAGE_MESSAGE)
        );
        assert_eq!(c.surface().last_actions(), None);
    }

    #[test]
    fn non_image_on_empty_session_keeps_strip_disabled() {
        let c = desktop();
        c.accept(Candidate::new("a.pdf", "application/pdf", vec![]), InputSource::Drop);
        assert!(c.snapshot().selected.is_none());
        assert_eq!(c.surface().last_actions(), Some(ActionFlags::default()));
    }

    #[test]
    fn paste_pulses_and_confirms() {
        let c = desktop();
        c.paste_items(vec![
            Candidate::new("", "text/plain", vec![]),
            png_candidate("image.png"),
        ]);
        assert!(c.surface().saw(&Event::Pulse(Duration::from_millis(300))));
        assert_eq!(c.surface().last_status().as_deref(), Some(PASTED));
        assert!(c.snapshot().selected.is_some());
    }

    #[test]
    fn paste_without_image_reports_it() {
        let c = desktop();
        c.paste_items(vec![Candidate::new("", "text/plain", vec![])]);
        assert_eq!(c.surface().last_status().as_deref(), Some(NO_PASTED_IMAGE));
        assert!(c.snapshot().selected.is_none());
    }

    #[tokio::test]
    async fn strip_renames_and_enables_output() {
        let c = desktop();
        c.accept(png_candidate("vacation.PNG"), InputSource::Picker);
        c.strip().await;

        let state = c.snapshot();
        let scrubbed = state.scrubbed.unwrap();
        assert_eq!(scrubbed.mime, "image/png");
        assert_eq!(scrubbed.file_name, "camophoto_output.png");
        let selected = state.selected.unwrap();
        assert_eq!(selected.name, "camophoto_output.png");
        assert_eq!(selected.bytes, scrubbed.bytes);

        assert_eq!(c.surface().last_status().as_deref(), Some(STRIPPED));
        assert_eq!(
            c.surface().last_file_name().as_deref(),
            Some("camophoto_output.png")
        );
        assert_eq!(
            c.surface().last_actions(),
            Some(ActionFlags {
                strip: false,
                reset: true,
                view_metadata: true,
                output: true,
            })
        );
    }

    #[tokio::test]
    async fn strip_shows_progress_before_working() {
        let c = desktop();
        c.accept(png_candidate("a.png"), InputSource::Picker);
        c.surface().clear();
        c.strip().await;

        let events = c.surface().events.borrow().clone();
        assert_eq!(events[0], Event::Status(PROCESSING.to_string()));
        assert_eq!(
            events[1],
            Event::Actions(ActionFlags {
                strip: false,
                ..ALL_ON
            })
        );
        assert_eq!(events[2], Event::Repaint);
        assert_eq!(events[3], Event::Status(STRIPPED.to_string()));
    }

    #[tokio::test]
    async fn second_strip_while_pending_is_ignored() {
        let c = desktop();
        c.accept(png_candidate("a.png"), InputSource::Picker);
        c.surface().clear();

        let first = c.strip();
        let second = async {
            // Runs while the first strip is suspended on the repaint.
            assert!(c.strip_pending.get());
            assert_eq!(c.surface().last_actions().map(|a| a.strip), Some(false));
            c.strip().await;
            assert!(c.snapshot().scrubbed.is_none());
        };
        tokio::join!(first, second);

        let events = c.surface().events.borrow().clone();
        let count = |wanted: &Event| events.iter().filter(|e| *e == wanted).count();
        assert_eq!(count(&Event::Status(PROCESSING.to_string())), 1);
        assert_eq!(count(&Event::Status(STRIPPED.to_string())), 1);
        assert_eq!(count(&Event::Repaint), 1);
        assert!(!c.strip_pending.get());
        assert_eq!(c.snapshot().selected.unwrap().name, "camophoto_output.png");
    }

    #[tokio::test]
    async fn reset_during_strip_discards_the_result() {
        let c = desktop();
        c.accept(png_candidate("a.png"), InputSource::Picker);

        let strip = c.strip();
        let reset = async { c.reset() };
        tokio::join!(strip, reset);

        assert_eq!(c.snapshot(), SessionState::default());
        assert_eq!(c.surface().last_actions(), Some(ActionFlags::default()));
        assert!(!c.surface().saw(&Event::Status(STRIPPED.to_string())));
    }

    #[tokio::test]
    async fn failed_strip_keeps_selection_and_allows_retry() {
        let c = desktop();
        c.accept(
            Candidate::new("IMG_0420.HEIC", "image/heic", vec![0, 0, 0, 0x18]),
            InputSource::Picker,
        );
        c.strip().await;

        let state = c.snapshot();
        assert!(state.scrubbed.is_none());
        assert_eq!(state.selected.unwrap().name, "IMG_0420.HEIC");
        let status = c.surface().last_status().unwrap();
        assert!(status.starts_with("Error: Unsupported file type: image/heic"), "{status}");
        assert!(status.ends_with("(HEIC may not be supported in your browser)"));
        assert_eq!(c.surface().last_actions(), Some(ALL_ON));
    }

    #[tokio::test]
    async fn new_selection_invalidates_scrubbed_result() {
        let c = desktop();
        c.accept(png_candidate("one.png"), InputSource::Picker);
        c.strip().await;
        c.accept(png_candidate("two.png"), InputSource::Drop);

        let state = c.snapshot();
        assert!(state.scrubbed.is_none());
        assert_eq!(state.selected.unwrap().name, "two.png");
        assert_eq!(c.surface().last_actions(), Some(ALL_ON));
    }

    #[tokio::test]
    async fn view_metadata_renders_sections() {
        let c = desktop();
        c.accept(png_candidate("plain.png"), InputSource::Picker);
        c.view_metadata().await;

        let rendered = c
            .surface()
            .events
            .borrow()
            .iter()
            .find_map(|e| match e {
                Event::Metadata(sections) => Some(sections.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].title, "File Information");
        assert!(c.surface().saw(&Event::Status(READING_METADATA.to_string())));
        assert_eq!(c.surface().last_status().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn metadata_after_strip_reports_removal() {
        let c = desktop();
        c.accept(png_candidate("plain.png"), InputSource::Picker);
        c.strip().await;
        c.view_metadata().await;

        let rendered = c
            .surface()
            .events
            .borrow()
            .iter()
            .rev()
            .find_map(|e| match e {
                Event::Metadata(sections) => Some(sections.clone()),
                _ => None,
            })
            .unwrap();
        let fields = &rendered[0].fields;
        assert!(fields.contains(&("File Name", "camophoto_output.png".to_string())));
        assert!(fields.contains(&(
            "Metadata Status",
            "All metadata has been removed".to_string()
        )));
    }

    #[tokio::test]
    async fn view_metadata_without_file_does_nothing() {
        let c = desktop();
        c.surface().clear();
        c.view_metadata().await;
        assert!(c.surface().events.borrow().is_empty());
    }

    #[tokio::test]
    async fn desktop_download_saves_named_file() {
        let c = desktop();
        c.accept(png_candidate("x.png"), InputSource::Picker);
        c.strip().await;
        c.download();

        assert_eq!(
            c.surface().last_status().as_deref(),
            Some("Image downloaded!")
        );
        assert!(
            c.host
                .calls()
                .contains(&"save blob:1 as camophoto_output.png".to_string())
        );
    }

    #[test]
    fn download_before_strip_does_nothing() {
        let c = desktop();
        c.accept(png_candidate("x.png"), InputSource::Picker);
        c.download();
        assert!(c.host.calls().is_empty());
    }

    #[tokio::test]
    async fn mobile_download_reports_failure() {
        let c = controller(DeviceClass::Mobile, FakeClipboard::default());
        c.accept(png_candidate("x.png"), InputSource::Picker);
        c.strip().await;
        c.host.fail_urls.set(true);
        c.download();
        assert_eq!(
            c.surface().last_status().as_deref(),
            Some("There was an error opening the image. Please try again.")
        );
    }

    #[tokio::test]
    async fn copy_writes_png() {
        let c = desktop();
        c.accept(
            Candidate::new("photo.jpg", "image/jpeg", testutil::jpeg_bytes(3, 3)),
            InputSource::Picker,
        );
        c.strip().await;
        c.copy().await;

        assert_eq!(c.surface().last_status().as_deref(), Some(COPIED));
        let written = c.clipboard.written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(&written[0][..4], &[137, 80, 78, 71]);
    }

    #[tokio::test]
    async fn copy_without_capability_falls_back_to_download() {
        let c = controller(
            DeviceClass::Desktop,
            FakeClipboard {
                write_error: Some(ClipboardError::Unsupported),
                ..FakeClipboard::default()
            },
        );
        c.accept(png_candidate("x.png"), InputSource::Picker);
        c.strip().await;
        c.copy().await;

        assert_eq!(c.surface().last_status().as_deref(), Some(COPY_FALLBACK));
        assert!(c.surface().saw(&Event::Highlight(Duration::from_secs(3))));
        assert!(c.snapshot().scrubbed.is_some());
    }

    #[tokio::test]
    async fn copy_on_mobile_is_refused() {
        let c = controller(DeviceClass::Mobile, FakeClipboard::default());
        assert!(!c.supports_copy());
        c.accept(png_candidate("x.png"), InputSource::Picker);
        c.strip().await;
        c.copy().await;

        assert_eq!(c.surface().last_status().as_deref(), Some(COPY_ON_MOBILE));
        assert!(c.clipboard.written.borrow().is_empty());
    }

    #[tokio::test]
    async fn clipboard_read_routes_through_acceptance() {
        let clipboard = FakeClipboard::default();
        clipboard.read.replace(Some(Ok(Some(ClipboardImage {
            mime: "image/png".into(),
            bytes: testutil::png_bytes(2, 2),
        }))));
        let c = controller(DeviceClass::Mobile, clipboard);
        c.paste_from_clipboard().await;

        let selected = c.snapshot().selected.unwrap();
        assert_eq!(selected.name, "pasted-image.png");
        assert_eq!(selected.extension.as_deref(), Some("png"));
        assert!(c.surface().saw(&Event::Pulse(Duration::from_millis(300))));
        assert_eq!(c.surface().last_status().as_deref(), Some(PASTED));
    }

    #[tokio::test]
    async fn clipboard_read_failures_leave_state_alone() {
        let cases = [
            (Ok(None), NO_CLIPBOARD_IMAGE),
            (Err(ClipboardError::Unsupported), CLIPBOARD_READ_UNSUPPORTED),
            (
                Err(ClipboardError::PermissionDenied("NotAllowedError".into())),
                CLIPBOARD_READ_DENIED,
            ),
        ];
        for (read, expected) in cases {
            let clipboard = FakeClipboard::default();
            clipboard.read.replace(Some(read));
            let c = controller(DeviceClass::Mobile, clipboard);
            c.paste_from_clipboard().await;

            assert!(c.snapshot().selected.is_none());
            assert_eq!(c.surface().last_status().as_deref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let c = desktop();
        c.accept(png_candidate("x.png"), InputSource::Picker);
        c.strip().await;
        c.surface().clear();
        c.reset();

        assert_eq!(c.snapshot(), SessionState::default());
        assert_eq!(c.surface().last_file_name().as_deref(), Some(""));
        assert_eq!(c.surface().last_status().as_deref(), Some(""));
        assert_eq!(c.surface().last_actions(), Some(ActionFlags::default()));
        assert!(c.surface().saw(&Event::CloseMetadata));
        assert!(c.surface().saw(&Event::ClearPicker));
    }
}
