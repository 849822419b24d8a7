//! Browser adapters: object URLs, downloads, the async clipboard and the
//! document-wide paste listener.

use camophoto_core::{BlobHost, Candidate, Clipboard, ClipboardError, ClipboardImage, ScrubError};
use dioxus::prelude::*;
use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};

fn host_error(context: &str, e: JsValue) -> ScrubError {
    ScrubError::Host(format!("{context}: {e:?}"))
}

fn window() -> Result<web_sys::Window, ScrubError> {
    web_sys::window().ok_or_else(|| ScrubError::Host("no window".into()))
}

/// Runs `f` once after `delay` on the browser's timer queue.
pub fn after(delay: Duration, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
    {
        log::warn!("setTimeout failed: {:?}", e);
    }
}

/// Resolves after the next frame has painted: the animation frame callback
/// runs before paint, the zero timeout queued from it runs after.
pub async fn next_paint() {
    let promise = Promise::new(&mut |resolve, _reject| {
        let fallback = resolve.clone();
        let frame = Closure::once_into_js(move || {
            after(Duration::ZERO, move || {
                if let Err(e) = resolve.call0(&JsValue::UNDEFINED) {
                    log::warn!("Could not resume after paint: {:?}", e);
                }
            })
        });
        let requested = web_sys::window().map(|w| w.request_animation_frame(frame.unchecked_ref()));
        if !matches!(requested, Some(Ok(_))) {
            log::warn!("requestAnimationFrame unavailable; continuing without a paint");
            if let Err(e) = fallback.call0(&JsValue::UNDEFINED) {
                log::warn!("Could not resume: {:?}", e);
            }
        }
    });
    if let Err(e) = JsFuture::from(promise).await {
        log::warn!("Paint wait failed: {:?}", e);
    }
}

fn blob_from(bytes: &[u8], mime: &str) -> Result<web_sys::Blob, JsValue> {
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    web_sys::Blob::new_with_u8_array_sequence_and_options(
        &Array::of1(&Uint8Array::from(bytes).into()),
        &options,
    )
}

async fn read_blob(blob: &web_sys::Blob) -> Result<Vec<u8>, JsValue> {
    let buffer = JsFuture::from(blob.array_buffer()).await?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// Object URLs and window operations on the real DOM.
#[derive(Clone, Copy)]
pub struct WebHost {
    pub inline_url: Signal<Option<String>>,
}

impl BlobHost for WebHost {
    fn create_url(&self, bytes: &[u8], mime: &str) -> Result<String, ScrubError> {
        let blob = blob_from(bytes, mime).map_err(|e| host_error("Blob", e))?;
        web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|e| host_error("createObjectURL", e))
    }

    fn revoke_url(&self, url: &str) {
        if let Err(e) = web_sys::Url::revoke_object_url(url) {
            log::warn!("Could not revoke {}: {:?}", url, e);
        }
    }

    fn revoke_url_later(&self, url: String, delay: Duration) {
        let host = *self;
        after(delay, move || host.revoke_url(&url));
    }

    fn save_as(&self, url: &str, file_name: &str) -> Result<(), ScrubError> {
        let document = window()?
            .document()
            .ok_or_else(|| ScrubError::Host("no document".into()))?;
        let body = document
            .body()
            .ok_or_else(|| ScrubError::Host("no body".into()))?;

        let a = document
            .create_element("a")
            .map_err(|e| host_error("createElement", e))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|e| host_error("anchor", e.into()))?;

        a.set_href(url);
        a.set_download(file_name);
        body.append_child(&a)
            .map_err(|e| host_error("appendChild", e))?;
        a.click();
        body.remove_child(&a)
            .map_err(|e| host_error("removeChild", e))?;
        Ok(())
    }

    fn open_tab(&self, url: &str) -> bool {
        match web_sys::window().map(|w| w.open_with_url_and_target(url, "_blank")) {
            Some(Ok(Some(_))) => true,
            Some(Err(e)) => {
                log::warn!("window.open failed: {:?}", e);
                false
            }
            _ => false,
        }
    }

    fn show_inline(&self, url: &str) {
        let mut inline_url = self.inline_url;
        inline_url.set(Some(url.to_string()));
    }
}

/// `navigator.clipboard`, reached through reflection since it is not
/// available in every browser or context.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebClipboard;

impl WebClipboard {
    fn handle() -> Result<Object, ClipboardError> {
        let navigator = web_sys::window()
            .map(|w| w.navigator())
            .ok_or(ClipboardError::Unsupported)?;
        let clipboard = Reflect::get(&navigator, &"clipboard".into())
            .map_err(|_| ClipboardError::Unsupported)?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return Err(ClipboardError::Unsupported);
        }
        Ok(clipboard.unchecked_into())
    }

    fn method(target: &Object, name: &str) -> Result<Function, ClipboardError> {
        Reflect::get(target, &name.into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or(ClipboardError::Unsupported)
    }

    async fn call(
        target: &Object,
        name: &str,
        args: &Array,
    ) -> Result<JsValue, ClipboardError> {
        let promise = Self::method(target, name)?
            .apply(target, args)
            .map_err(classify)?
            .dyn_into::<Promise>()
            .map_err(|_| ClipboardError::Failed(format!("{name} did not return a promise")))?;
        JsFuture::from(promise).await.map_err(classify)
    }
}

fn classify(e: JsValue) -> ClipboardError {
    let name = Reflect::get(&e, &"name".into())
        .ok()
        .and_then(|n| n.as_string())
        .unwrap_or_default();
    match name.as_str() {
        "NotAllowedError" | "SecurityError" => ClipboardError::PermissionDenied(name),
        _ => ClipboardError::Failed(format!("{e:?}")),
    }
}

impl Clipboard for WebClipboard {
    async fn write_png(&self, png: Vec<u8>) -> Result<(), ClipboardError> {
        let clipboard = Self::handle()?;
        let constructor = Reflect::get(&js_sys::global(), &"ClipboardItem".into())
            .ok()
            .and_then(|c| c.dyn_into::<Function>().ok())
            .ok_or(ClipboardError::Unsupported)?;

        let blob = blob_from(&png, "image/png").map_err(classify)?;
        let data = Object::new();
        Reflect::set(&data, &"image/png".into(), &blob).map_err(classify)?;
        let item = Reflect::construct(&constructor, &Array::of1(&data)).map_err(classify)?;

        Self::call(&clipboard, "write", &Array::of1(&Array::of1(&item))).await?;
        Ok(())
    }

    async fn read_image(&self) -> Result<Option<ClipboardImage>, ClipboardError> {
        let clipboard = Self::handle()?;
        let items: Array = Self::call(&clipboard, "read", &Array::new())
            .await?
            .unchecked_into();

        for item in items.iter() {
            let item: Object = item.unchecked_into();
            let types: Array = Reflect::get(&item, &"types".into())
                .map_err(classify)?
                .unchecked_into();
            let Some(mime) = types
                .iter()
                .filter_map(|t| t.as_string())
                .find(|t| t.starts_with("image/"))
            else {
                continue;
            };

            let blob: web_sys::Blob = Self::call(&item, "getType", &Array::of1(&mime.as_str().into()))
                .await?
                .unchecked_into();
            let bytes = read_blob(&blob).await.map_err(classify)?;
            return Ok(Some(ClipboardImage { mime, bytes }));
        }
        Ok(None)
    }
}

/// Forwards every document paste to `on_paste` as a list of file candidates.
pub fn listen_for_paste(on_paste: impl Fn(Vec<Candidate>) + Clone + 'static) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let listener = Closure::<dyn FnMut(web_sys::ClipboardEvent)>::new(
        move |event: web_sys::ClipboardEvent| {
            let Some(data) = event.clipboard_data() else {
                return;
            };
            let items = data.items();
            let files: Vec<web_sys::File> = (0..items.length())
                .filter_map(|i| items.get(i))
                .filter(|item| item.kind() == "file")
                .filter_map(|item| item.get_as_file().ok().flatten())
                .collect();
            if files.iter().any(|f| f.type_().contains("image")) {
                event.prevent_default();
            }

            let on_paste = on_paste.clone();
            spawn_local(async move {
                let mut candidates = Vec::with_capacity(files.len());
                for file in files {
                    match read_blob(&file).await {
                        Ok(bytes) => candidates.push(Candidate::new(file.name(), file.type_(), bytes)),
                        Err(e) => log::warn!("Could not read pasted {}: {:?}", file.name(), e),
                    }
                }
                on_paste(candidates);
            });
        },
    );

    if let Err(e) =
        document.add_event_listener_with_callback("paste", listener.as_ref().unchecked_ref())
    {
        log::error!("Could not install paste listener: {:?}", e);
    }
    listener.forget();
}
