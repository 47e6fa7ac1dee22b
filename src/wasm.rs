//! Browser binding for the asset editor.
//!
//! Binds an [`AssetEditor`] to a container of `.assets__item` placeholders,
//! each holding an `img` preview, a file `input` and a remove `button`. DOM
//! events are forwarded to the grid and the placeholders are re-rendered from
//! grid state after every transition.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use folio_ui::{FileData, Payload, SlotId};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, Element, Event, FileReader, HtmlImageElement, HtmlInputElement, Url,
};

use crate::config::EditorConfig;
use crate::constants::{FILLED_CLASS, HOVER_CLASS, ITEM_SELECTOR};
use crate::crop::CropRequest;
use crate::editor::AssetEditor;
use crate::submission::ProjectRecord;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = EditorConfig::load_from_local_storage().unwrap_or_default();
    crate::logging::init(config.log_level);
    log::info!("folio WASM started");
}

/// Validate and persist editor settings for the next page load.
#[wasm_bindgen(js_name = saveConfig)]
pub fn save_config(json: &str) -> Result<(), JsValue> {
    EditorConfig::from_json(json)
        .and_then(|config| config.save_to_local_storage())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// DOM elements of one placeholder.
struct SlotElements {
    container: Element,
    image: HtmlImageElement,
    input: HtmlInputElement,
    /// Object URL created for a local preview, with the bytes it points at
    object_url: Option<(Arc<[u8]>, String)>,
}

impl SlotElements {
    fn bind(container: Element) -> Result<Self, JsValue> {
        let image = container
            .query_selector("img")?
            .ok_or_else(|| JsValue::from_str("asset placeholder has no img"))?
            .dyn_into::<HtmlImageElement>()?;
        let input = container
            .query_selector("input")?
            .ok_or_else(|| JsValue::from_str("asset placeholder has no input"))?
            .dyn_into::<HtmlInputElement>()?;
        Ok(Self {
            container,
            image,
            input,
            object_url: None,
        })
    }

    /// URL to show `data` as preview, reusing the previous object URL.
    fn object_url_for(&mut self, data: &FileData) -> Result<String, JsValue> {
        if let Some((bytes, url)) = &self.object_url {
            if Arc::ptr_eq(bytes, &data.bytes) {
                return Ok(url.clone());
            }
        }
        self.revoke_object_url();

        let array = js_sys::Uint8Array::from(&data.bytes[..]);
        let parts = js_sys::Array::of1(&array);
        let options = BlobPropertyBag::new();
        options.set_type(&data.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        self.object_url = Some((data.bytes.clone(), url.clone()));
        Ok(url)
    }

    fn revoke_object_url(&mut self) {
        if let Some((_, url)) = self.object_url.take() {
            let _ = Url::revoke_object_url(&url);
        }
    }
}

struct BindingState {
    editor: AssetEditor,
    elements: Vec<SlotElements>,
}

impl BindingState {
    /// Sync every placeholder with its slot.
    fn render(&mut self) {
        let slots = self.editor.grid().slots();
        for (slot, elements) in slots.iter().zip(self.elements.iter_mut()) {
            let class_list = elements.container.class_list();
            let _ = class_list.toggle_with_force(FILLED_CLASS, slot.is_filled());
            let _ = class_list.toggle_with_force(HOVER_CLASS, slot.is_hovered());

            elements.input.set_disabled(!slot.is_enabled());
            elements.image.set_draggable(slot.is_filled());

            let src = match slot.asset().map(|asset| asset.preview()) {
                Some(Payload::Remote(url)) => {
                    elements.revoke_object_url();
                    url.clone()
                }
                Some(Payload::Data(data)) => match elements.object_url_for(data) {
                    Ok(url) => url,
                    Err(e) => {
                        log::warn!("Failed to create preview for slot {}: {:?}", slot.id(), e);
                        String::new()
                    }
                },
                None => {
                    elements.revoke_object_url();
                    elements.input.set_value("");
                    String::new()
                }
            };
            if elements.image.get_attribute("src").as_deref() != Some(src.as_str()) {
                elements.image.set_src(&src);
            }
        }
    }
}

/// Attach `handler` to `event` on `target` for the lifetime of the page.
fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget(); // Leak the closure to keep it alive
    Ok(())
}

/// An asset grid bound to DOM placeholders.
#[wasm_bindgen]
pub struct GridBinding {
    state: Rc<RefCell<BindingState>>,
}

#[wasm_bindgen]
impl GridBinding {
    /// Bind to the `.assets__item` children of `container`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: Element) -> Result<GridBinding, JsValue> {
        let items = container.query_selector_all(ITEM_SELECTOR)?;
        let mut elements = Vec::new();
        for i in 0..items.length() {
            if let Some(node) = items.get(i) {
                elements.push(SlotElements::bind(node.dyn_into::<Element>()?)?);
            }
        }

        let mut config = EditorConfig::load_from_local_storage().unwrap_or_default();
        config.slot_count = elements.len();
        let mut editor = AssetEditor::new(&config);

        // Placeholders rendered with an existing asset start out filled
        let filled = editor.seed_from_previews(
            elements
                .iter()
                .filter_map(|slot| slot.image.get_attribute("src")),
        );
        if filled > 0 {
            log::debug!("{} placeholders were pre-filled", filled);
        }

        let state = Rc::new(RefCell::new(BindingState { editor, elements }));
        let count = state.borrow().elements.len();
        for index in 0..count {
            Self::bind_slot(&state, SlotId(index))?;
        }
        state.borrow_mut().render();
        log::info!("Asset grid bound to {} placeholders", count);

        Ok(GridBinding { state })
    }

    fn bind_slot(state: &Rc<RefCell<BindingState>>, slot: SlotId) -> Result<(), JsValue> {
        let (container, input, button) = {
            let guard = state.borrow();
            let elements = &guard.elements[slot.index()];
            let button = elements
                .container
                .query_selector("button")?
                .ok_or_else(|| JsValue::from_str("asset placeholder has no button"))?;
            (elements.container.clone(), elements.input.clone(), button)
        };

        // File input
        let on_change = state.clone();
        let picked = input.clone();
        listen(&input, "change", move |_event| {
            let Some(file) = picked.files().and_then(|files| files.get(0)) else {
                return;
            };
            let ticket = match on_change.borrow_mut().editor.begin_pick(slot) {
                Ok(ticket) => ticket,
                Err(e) => {
                    log::warn!("{}", e);
                    return;
                }
            };
            let reader = match FileReader::new() {
                Ok(reader) => reader,
                Err(e) => {
                    log::warn!("Failed to create FileReader: {:?}", e);
                    return;
                }
            };

            let on_load = on_change.clone();
            let name = file.name();
            let onload = Closure::wrap(Box::new(move |event: Event| {
                let Some(reader) = event
                    .target()
                    .and_then(|target| target.dyn_into::<FileReader>().ok())
                else {
                    return;
                };
                let Ok(result) = reader.result() else {
                    return;
                };
                let bytes = js_sys::Uint8Array::new(&result).to_vec();

                let mut guard = on_load.borrow_mut();
                match guard.editor.finish_pick(ticket, &name, bytes) {
                    Ok(true) => guard.render(),
                    Ok(false) => {}
                    Err(e) => log::warn!("{}", e),
                }
            }) as Box<dyn FnMut(Event)>);
            reader.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget(); // Leak the closure to keep it alive

            if let Err(e) = reader.read_as_array_buffer(&file) {
                log::warn!("Failed to read {}: {:?}", file.name(), e);
            }
        })?;

        // Remove button
        let on_click = state.clone();
        listen(&button, "click", move |_event| {
            let mut guard = on_click.borrow_mut();
            if guard.editor.clear_slot(slot) {
                guard.render();
            }
        })?;

        // Drag and drop
        let on_dragstart = state.clone();
        listen(&container, "dragstart", move |event| {
            if !on_dragstart.borrow_mut().editor.drag_start(slot) {
                event.prevent_default();
            }
        })?;

        let on_dragover = state.clone();
        listen(&container, "dragover", move |event| {
            let mut guard = on_dragover.borrow_mut();
            if guard.editor.drag_over(slot) {
                event.prevent_default();
            }
            guard.render();
        })?;

        let on_dragleave = state.clone();
        listen(&container, "dragleave", move |_event| {
            let mut guard = on_dragleave.borrow_mut();
            guard.editor.drag_leave(slot);
            guard.render();
        })?;

        let on_drop = state.clone();
        listen(&container, "drop", move |event| {
            event.prevent_default();
            let mut guard = on_drop.borrow_mut();
            guard.editor.drop(slot);
            guard.render();
        })?;

        let on_dragend = state.clone();
        listen(&container, "dragend", move |_event| {
            let mut guard = on_dragend.borrow_mut();
            guard.editor.drag_end();
            guard.render();
        })?;

        Ok(())
    }

    /// Empty the grid and forget the edited record.
    pub fn clear(&self) {
        let mut guard = self.state.borrow_mut();
        guard.editor.reset();
        guard.render();
    }

    /// Load existing asset URLs into the grid.
    #[wasm_bindgen(js_name = setImages)]
    pub fn set_images(&self, urls: Vec<String>) {
        let mut guard = self.state.borrow_mut();
        guard
            .editor
            .set_images(urls.into_iter().map(Payload::Remote));
        guard.render();
    }

    /// Start editing a record given as JSON.
    #[wasm_bindgen(js_name = loadProject)]
    pub fn load_project(&self, json: &str) -> Result<(), JsValue> {
        let record: ProjectRecord =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut guard = self.state.borrow_mut();
        guard.editor.load_project(record);
        guard.render();
        Ok(())
    }

    /// The next slot waiting for the crop dialog.
    #[wasm_bindgen(js_name = nextCrop)]
    pub fn next_crop(&self) -> Option<usize> {
        self.state.borrow().editor.next_crop().map(SlotId::index)
    }

    /// Apply the crop dialog result to `slot`.
    #[wasm_bindgen(js_name = applyCrop)]
    pub fn apply_crop(
        &self,
        slot: usize,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rotate_degrees: i32,
    ) -> Result<(), JsValue> {
        let request = CropRequest {
            x,
            y,
            width,
            height,
            rotate_degrees,
        };
        let mut guard = self.state.borrow_mut();
        guard
            .editor
            .apply_crop(SlotId(slot), &request)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        guard.render();
        Ok(())
    }

    /// Keep the picked image in `slot` uncropped.
    #[wasm_bindgen(js_name = skipCrop)]
    pub fn skip_crop(&self, slot: usize) -> bool {
        self.state.borrow_mut().editor.skip_crop(SlotId(slot))
    }

    /// Server URLs and local file names of the grid value, in order.
    pub fn value(&self) -> Vec<String> {
        self.state
            .borrow()
            .editor
            .grid()
            .value()
            .into_iter()
            .map(|payload| match payload {
                Payload::Remote(url) => url,
                Payload::Data(data) => data.name,
            })
            .collect()
    }

    /// Asset reconciliation for the edited record, as JSON.
    #[wasm_bindgen(js_name = changesJson)]
    pub fn changes_json(&self) -> Result<String, JsValue> {
        self.state
            .borrow()
            .editor
            .submission()
            .changes_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Multipart body with every new file under the configured field name.
    #[wasm_bindgen(js_name = formData)]
    pub fn form_data(&self) -> Result<web_sys::FormData, JsValue> {
        let form = web_sys::FormData::new()?;
        let submission = self.state.borrow().editor.submission();
        for part in &submission.uploads {
            let array = js_sys::Uint8Array::from(&part.file.bytes[..]);
            let parts = js_sys::Array::of1(&array);
            let options = BlobPropertyBag::new();
            options.set_type(&part.file.mime);
            let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
            form.append_with_blob_and_filename(&part.field, &blob, &part.file.name)?;
        }
        Ok(form)
    }
}
