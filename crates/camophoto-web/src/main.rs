mod browser;

use browser::{WebClipboard, WebHost, after, listen_for_paste, next_paint};
use camophoto_core::{
    ActionFlags, Candidate, Controller, DeviceClass, InputSource, MetadataSection, Settings,
    Surface,
};
use dioxus::html::HasFileData;
use dioxus::prelude::*;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;

type AppController = Controller<WebSurface, WebHost, WebClipboard>;

/// Signals the page renders from. The controller writes, the page reads.
#[derive(Clone, Copy)]
struct WebSurface {
    status: Signal<String>,
    file_name: Signal<String>,
    actions: Signal<ActionFlags>,
    metadata: Signal<Option<Vec<MetadataSection>>>,
    pulsing: Signal<bool>,
    download_highlighted: Signal<bool>,
}

impl Surface for WebSurface {
    fn show_status(&self, text: &str) {
        let mut status = self.status;
        status.set(text.to_string());
    }

    fn show_file_name(&self, name: &str) {
        let mut file_name = self.file_name;
        file_name.set(name.to_string());
    }

    fn set_actions(&self, flags: ActionFlags) {
        let mut actions = self.actions;
        actions.set(flags);
    }

    fn render_metadata(&self, sections: &[MetadataSection]) {
        let mut metadata = self.metadata;
        metadata.set(Some(sections.to_vec()));
    }

    fn close_metadata(&self) {
        let mut metadata = self.metadata;
        metadata.set(None);
    }

    fn clear_picker(&self) {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
            .and_then(|e| e.dyn_into::<web_sys::HtmlInputElement>().ok());
        if let Some(input) = input {
            input.set_value("");
        }
    }

    fn pulse_drop_zone(&self, duration: Duration) {
        let mut pulsing = self.pulsing;
        pulsing.set(true);
        after(duration, move || pulsing.set(false));
    }

    fn highlight_download(&self, duration: Duration) {
        let mut highlighted = self.download_highlighted;
        highlighted.set(true);
        after(duration, move || highlighted.set(false));
    }

    async fn repaint(&self) {
        next_paint().await;
    }
}

fn probe_device() -> DeviceClass {
    let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
        return DeviceClass::Desktop;
    };
    let agent = navigator.user_agent().unwrap_or_default();
    let touch_points = u32::try_from(navigator.max_touch_points()).unwrap_or(0);
    DeviceClass::probe(&agent, touch_points)
}

fn app() -> Element {
    let surface = WebSurface {
        status: use_signal(String::new),
        file_name: use_signal(String::new),
        actions: use_signal(ActionFlags::default),
        metadata: use_signal(|| None),
        pulsing: use_signal(|| false),
        download_highlighted: use_signal(|| false),
    };
    let host = WebHost {
        inline_url: use_signal(|| None),
    };
    let device = use_hook(probe_device);
    let mut dragging = use_signal(|| false);

    let controller: Rc<AppController> = use_hook(|| {
        let controller = Rc::new(Controller::new(
            surface,
            host,
            WebClipboard,
            device,
            Settings::default(),
        ));
        let on_paste = controller.clone();
        listen_for_paste(move |items| on_paste.paste_items(items));
        controller
    });

    let handle_file_upload = {
        let controller = controller.clone();
        move |evt: FormEvent| {
            let controller = controller.clone();
            async move {
                if let Some(file_engine) = &evt.files() {
                    let files = file_engine.files();
                    if let Some(file_name) = files.first() {
                        if let Some(bytes) = file_engine.read_file(file_name).await {
                            controller
                                .accept(Candidate::from_name(file_name, bytes), InputSource::Picker);
                        }
                    }
                }
            }
        }
    };

    let handle_drop = {
        let controller = controller.clone();
        move |evt: DragEvent| {
            dragging.set(false);
            let controller = controller.clone();
            async move {
                if let Some(file_engine) = &evt.files() {
                    let files = file_engine.files();
                    if let Some(file_name) = files.first() {
                        if let Some(bytes) = file_engine.read_file(file_name).await {
                            controller
                                .accept(Candidate::from_name(file_name, bytes), InputSource::Drop);
                        }
                    }
                }
            }
        }
    };

    let strip = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            let controller = controller.clone();
            async move { controller.strip().await }
        }
    };
    let view_metadata = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            let controller = controller.clone();
            async move { controller.view_metadata().await }
        }
    };
    let close_metadata = {
        let controller = controller.clone();
        move |_: MouseEvent| controller.close_metadata()
    };
    let close_from_backdrop = {
        let controller = controller.clone();
        move |_: MouseEvent| controller.close_metadata()
    };
    let download = {
        let controller = controller.clone();
        move |_: MouseEvent| controller.download()
    };
    let reset = {
        let controller = controller.clone();
        move |_: MouseEvent| controller.reset()
    };
    let copy = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            let controller = controller.clone();
            async move { controller.copy().await }
        }
    };
    let paste_from_clipboard = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            let controller = controller.clone();
            async move { controller.paste_from_clipboard().await }
        }
    };

    let actions = (surface.actions)();
    let show_copy = controller.supports_copy();
    let is_mobile = device == DeviceClass::Mobile;

    let drop_zone_class = if dragging() || (surface.pulsing)() {
        "drop-zone drop-zone-active"
    } else {
        "drop-zone"
    };
    let download_class = if (surface.download_highlighted)() {
        "button button-primary button-highlight"
    } else {
        "button button-primary"
    };

    rsx! {
        div {
            class: "min-h-screen bg-gray-100 flex items-center justify-center p-4",
            div {
                class: "max-w-2xl w-full bg-white rounded-lg shadow-xl p-8 space-y-6",
                // Header
                div {
                    class: "text-center",
                    h1 { class: "text-4xl font-bold text-gray-800", "CamoPhoto" }
                    p { class: "text-gray-500 mt-2", "View and remove image metadata, right in your browser." }
                }

                // Drop zone and file input
                div {
                    class: "{drop_zone_class}",
                    prevent_default: "ondragover ondrop",
                    ondragover: move |_| dragging.set(true),
                    ondragleave: move |_| dragging.set(false),
                    ondrop: handle_drop,
                    p { class: "text-gray-600 mb-4", "Drop an image here, paste one, or" }
                    label {
                        class: "file-input-button",
                        "Select File"
                        input {
                            id: "file-input",
                            r#type: "file",
                            class: "hidden",
                            accept: ".png, .jpeg, .jpg, .heic, .webp",
                            oninput: handle_file_upload,
                        }
                    }
                    if is_mobile {
                        button {
                            class: "button button-secondary mt-4",
                            onclick: paste_from_clipboard,
                            "Paste from Clipboard"
                        }
                    }
                    p { class: "font-mono text-sm mt-2", "{surface.file_name}" }
                }

                // Actions
                div {
                    class: "flex flex-wrap gap-2 justify-center",
                    button {
                        class: "button button-danger",
                        disabled: !actions.strip,
                        onclick: strip,
                        "Strip Metadata"
                    }
                    button {
                        class: "button button-secondary",
                        disabled: !actions.view_metadata,
                        onclick: view_metadata,
                        "View Metadata"
                    }
                    button {
                        class: "button button-secondary",
                        disabled: !actions.reset,
                        onclick: reset,
                        "Reset"
                    }
                }

                if actions.output {
                    div {
                        class: "flex gap-2 justify-center",
                        button {
                            class: "{download_class}",
                            onclick: download,
                            if is_mobile { "Open Image" } else { "Download" }
                        }
                        if show_copy {
                            button {
                                class: "button button-secondary",
                                onclick: copy,
                                "Copy to Clipboard"
                            }
                        }
                    }
                }

                p { class: "text-center text-gray-700", "{surface.status}" }

                match (host.inline_url)() {
                    Some(url) => rsx! {
                        img { class: "mx-auto max-w-full rounded-md", src: "{url}", alt: "Cleaned image" }
                    },
                    None => rsx! {},
                }

                // Metadata popup
                match (surface.metadata)() {
                    Some(sections) => rsx! {
                        div {
                            class: "fixed inset-0 bg-black/50 flex items-center justify-center p-4",
                            onclick: close_from_backdrop,
                            div {
                                class: "bg-white rounded-lg p-6 max-w-lg w-full max-h-[80vh] overflow-y-auto space-y-4",
                                onclick: move |evt: MouseEvent| evt.stop_propagation(),
                                h3 { class: "text-xl font-semibold text-gray-700", "Image Metadata" }
                                for section in sections {
                                    div {
                                        h4 { class: "font-semibold text-gray-600", "{section.title}" }
                                        ul {
                                            class: "list-disc list-inside bg-gray-50 p-4 rounded-md",
                                            for (label, value) in section.fields {
                                                li { class: "font-mono text-sm",
                                                    span { class: "font-semibold", "{label}: " }
                                                    "{value}"
                                                }
                                            }
                                        }
                                    }
                                }
                                button {
                                    class: "w-full button button-secondary",
                                    onclick: close_metadata,
                                    "Close"
                                }
                            }
                        }
                    },
                    None => rsx! {},
                }

                // Footer
                p {
                    class: "text-center text-xs text-gray-400 pt-4 border-t",
                    "All processing is done in your browser. Your images never leave your device."
                }
            }
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    launch(app);
}
