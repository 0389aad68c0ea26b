//! Browser bindings for the DocuSeal field editor
//!
//! The page script owns the DOM: it draws whatever `render()` and
//! `overlaysJson()` describe, forwards pointer, keyboard and resize-observer
//! events, and calls `saveFields` when the user hits Save.

use field_editor::{
    Field, FieldEditor, FieldId, FieldKind, HttpTemplateStore, Key, KeyOutcome, KeyPress,
    PixelPoint, PixelRect, RenderCapability, Size, TemplateStore, Toolkit,
};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A size from a measurement that may be missing either side
fn measured(width: Option<f64>, height: Option<f64>) -> Option<Size> {
    Some(Size::new(width?, height?))
}

fn outcome_name(outcome: &KeyOutcome) -> &'static str {
    match outcome {
        KeyOutcome::Ignored => "ignored",
        KeyOutcome::Deselected => "deselected",
        KeyOutcome::Deleted(_) => "deleted",
        KeyOutcome::Nudged(_) => "nudged",
    }
}

#[wasm_bindgen]
pub struct WasmFieldEditor {
    editor: FieldEditor,
}

#[wasm_bindgen]
impl WasmFieldEditor {
    /// `pdf_bytes` enables the PDF renderer and drag/resize overlays. Without
    /// them, or if they do not parse, `src` is shown in a frame.
    #[wasm_bindgen(constructor)]
    pub fn new(src: Option<String>, pdf_bytes: Option<Vec<u8>>) -> Self {
        let toolkit = Toolkit::detect(src.as_deref(), pdf_bytes.as_deref());
        Self {
            editor: FieldEditor::new(toolkit),
        }
    }

    #[wasm_bindgen(js_name = isInteractive)]
    pub fn is_interactive(&self) -> bool {
        self.editor.toolkit().is_interactive()
    }

    /// "pdf" or "frame"
    pub fn capability(&self) -> String {
        match self.editor.toolkit().renderer().capability() {
            RenderCapability::Pdf => "pdf".to_string(),
            RenderCapability::Frame => "frame".to_string(),
        }
    }

    // Fields

    #[wasm_bindgen(js_name = addField)]
    pub fn add_field(&mut self, name: &str, kind: &str, page: u32) -> String {
        self.editor
            .add_field(name, FieldKind::from(kind), page)
            .to_string()
    }

    #[wasm_bindgen(js_name = fieldsJson)]
    pub fn fields_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.editor.fields()).map_err(to_js)
    }

    /// Replace the field list with a JSON array, e.g. from `fetchFields`
    #[wasm_bindgen(js_name = loadFieldsJson)]
    pub fn load_fields_json(&mut self, json: &str) -> Result<(), JsValue> {
        let fields: Vec<Field> = serde_json::from_str(json).map_err(to_js)?;
        self.editor.replace_fields(fields);
        Ok(())
    }

    #[wasm_bindgen(js_name = overlaysJson)]
    pub fn overlays_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.editor.overlays()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = customFieldsPayloadJson)]
    pub fn custom_fields_payload_json(&self) -> String {
        self.editor.custom_fields_payload().to_string()
    }

    // Selection and inspector

    #[wasm_bindgen(js_name = activeId)]
    pub fn active_id(&self) -> Option<String> {
        self.editor.active_id().map(FieldId::to_string)
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.editor.select(&FieldId::new(id))
    }

    #[wasm_bindgen(js_name = clickOutside)]
    pub fn click_outside(&mut self) {
        self.editor.click_outside();
    }

    /// `null` when no field is active
    #[wasm_bindgen(js_name = inspectorJson)]
    pub fn inspector_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.editor.inspector()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setInspectorName)]
    pub fn set_inspector_name(&mut self, name: &str) {
        self.editor.set_inspector_name(name);
    }

    #[wasm_bindgen(js_name = setInspectorKind)]
    pub fn set_inspector_kind(&mut self, kind: &str) {
        self.editor.set_inspector_kind(FieldKind::from(kind));
    }

    #[wasm_bindgen(js_name = saveInspector)]
    pub fn save_inspector(&mut self) -> bool {
        self.editor.save_inspector()
    }

    #[wasm_bindgen(js_name = closeInspector)]
    pub fn close_inspector(&mut self) {
        self.editor.close_inspector();
    }

    #[wasm_bindgen(js_name = deleteActive)]
    pub fn delete_active(&mut self) -> Option<String> {
        self.editor.delete_active().map(|id| id.to_string())
    }

    // Pointer and keyboard

    #[wasm_bindgen(js_name = dragStop)]
    pub fn drag_stop(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.editor
            .drag_stop(&FieldId::new(id), PixelPoint::new(x, y))
    }

    #[wasm_bindgen(js_name = resizeStop)]
    pub fn resize_stop(&mut self, id: &str, x: f64, y: f64, width: f64, height: f64) -> bool {
        self.editor
            .resize_stop(&FieldId::new(id), PixelRect::new(x, y, width, height))
    }

    /// `key` is `KeyboardEvent.key`. Returns "ignored", "deselected",
    /// "deleted" or "nudged"; the caller should `preventDefault()` on
    /// anything but "ignored".
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, shift: bool) -> String {
        let outcome = self.editor.key_down(KeyPress::new(Key::parse(key), shift));
        outcome_name(&outcome).to_string()
    }

    // Pages, zoom and layout

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> Option<u32> {
        self.editor.page_count()
    }

    #[wasm_bindgen(js_name = currentPage)]
    pub fn current_page(&self) -> u32 {
        self.editor.current_page()
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&mut self) -> bool {
        self.editor.next_page()
    }

    #[wasm_bindgen(js_name = prevPage)]
    pub fn prev_page(&mut self) -> bool {
        self.editor.prev_page()
    }

    #[wasm_bindgen(js_name = setPage)]
    pub fn set_page(&mut self, index: u32) -> bool {
        self.editor.set_page(index)
    }

    pub fn zoom(&self) -> f64 {
        self.editor.zoom()
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        self.editor.set_zoom(zoom)
    }

    /// Resize-observer hook. Pass `undefined` for a box that could not be
    /// measured.
    #[wasm_bindgen(js_name = observeLayout)]
    pub fn observe_layout(
        &mut self,
        container_width: Option<f64>,
        container_height: Option<f64>,
        page_width: Option<f64>,
        page_height: Option<f64>,
    ) -> bool {
        self.editor.observe_layout(
            measured(container_width, container_height),
            measured(page_width, page_height),
        )
    }

    /// The current page as a JSON `PageView`
    pub fn render(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.editor.render()).map_err(to_js)
    }

    // Persistence

    /// Save a snapshot of the current fields to the template. Resolves to
    /// the number of fields saved.
    #[wasm_bindgen(js_name = saveFields)]
    pub fn save_fields(&self, base_url: String, template_id: f64) -> Promise {
        let template_id = match template_id_from_js(template_id) {
            Ok(id) => id,
            Err(e) => return Promise::reject(&to_js(e)),
        };
        let fields = self.editor.snapshot();
        let store = HttpTemplateStore::new(base_url);
        future_to_promise(async move {
            store
                .save_fields(template_id, &fields)
                .await
                .map_err(to_js)?;
            Ok(JsValue::from(fields.len() as u32))
        })
    }
}

/// Load a template's saved fields. Resolves to a JSON array suitable for
/// `loadFieldsJson`.
#[wasm_bindgen(js_name = fetchFields)]
pub fn fetch_fields(base_url: String, template_id: f64) -> Promise {
    let template_id = match template_id_from_js(template_id) {
        Ok(id) => id,
        Err(e) => return Promise::reject(&to_js(e)),
    };
    future_to_promise(async move {
        let store = HttpTemplateStore::new(base_url);
        let fields = store
            .load_fields(template_id)
            .await
            .map_err(to_js)?;
        let json = serde_json::to_string(&fields).map_err(to_js)?;
        Ok(JsValue::from_str(&json))
    })
}

/// Largest integer a JS number holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Template ids arrive as JS numbers; anything but a non-negative safe
/// integer is refused rather than rounded
fn template_id_from_js(id: f64) -> Result<u64, String> {
    if id.is_finite() && id >= 0.0 && id.fract() == 0.0 && id <= MAX_SAFE_INTEGER {
        Ok(id as u64)
    } else {
        Err(format!("invalid template id: {}", id))
    }
}

// These exercise the bindings' logic on the host; nothing here crosses into JS
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn frame_editor() -> WasmFieldEditor {
        WasmFieldEditor::new(Some("https://example.com/doc.pdf".into()), None)
    }

    #[test]
    fn test_unparseable_bytes_fall_back_to_frame() {
        let editor =
            WasmFieldEditor::new(Some("doc.pdf".into()), Some(b"not a pdf".to_vec()));
        assert!(!editor.is_interactive());
        assert_eq!(editor.capability(), "frame");
        assert_eq!(editor.page_count(), None);
    }

    #[test]
    fn test_edit_cycle() {
        let mut editor = frame_editor();
        let id = editor.add_field("Signer", "signature", 1);

        assert!(editor.select(&id));
        assert_eq!(editor.active_id(), Some(id.clone()));
        let inspector: Value = serde_json::from_str(&editor.inspector_json().unwrap()).unwrap();
        assert_eq!(inspector, json!({ "name": "Signer", "type": "signature" }));

        assert_eq!(editor.key_down("ArrowRight", false), "nudged");
        assert_eq!(editor.key_down("a", false), "ignored");
        assert_eq!(editor.key_down("Escape", false), "deselected");
        assert_eq!(editor.inspector_json().unwrap(), "null");

        editor.select(&id);
        assert_eq!(editor.key_down("Backspace", false), "deleted");
        assert_eq!(editor.fields_json().unwrap(), "[]");
    }

    #[test]
    fn test_layout_and_overlays() {
        let mut editor = frame_editor();
        editor
            .load_fields_json(r#"[{ "id": "1", "name": "A", "type": "text", "page": 1, "x": 0.5, "y": 0.5, "w": 0.1, "h": 0.1 }]"#)
            .unwrap();

        // Half a measurement is no measurement
        assert!(!editor.observe_layout(Some(1000.0), None, None, None));
        assert!(editor.observe_layout(Some(1000.0), Some(720.0), None, None));

        let overlays: Value = serde_json::from_str(&editor.overlays_json().unwrap()).unwrap();
        assert_eq!(overlays[0]["rect"]["x"], 500.0);
        assert_eq!(overlays[0]["interactive"], false);

        let view: Value = serde_json::from_str(&editor.render().unwrap()).unwrap();
        assert_eq!(view["kind"], "frame");
    }

    #[test]
    fn test_payload_json() {
        let mut editor = frame_editor();
        editor.add_field("Date", "date", 2);
        let payload: Value = serde_json::from_str(&editor.custom_fields_payload_json()).unwrap();
        assert_eq!(payload["preferences"]["custom_fields"][0]["type"], "date");
        assert_eq!(payload["preferences"]["custom_fields"][0]["page"], 2);
    }

    #[test]
    fn test_template_ids_from_js_numbers() {
        assert_eq!(template_id_from_js(42.0), Ok(42));
        assert_eq!(template_id_from_js(5_000_000_000.0), Ok(5_000_000_000));
        assert_eq!(template_id_from_js(MAX_SAFE_INTEGER), Ok(9_007_199_254_740_991));
        for bad in [-1.0, 1.5, f64::NAN, f64::INFINITY, MAX_SAFE_INTEGER + 2.0] {
            assert!(template_id_from_js(bad).is_err(), "{} accepted", bad);
        }
    }
}
