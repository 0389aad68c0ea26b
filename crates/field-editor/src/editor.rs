//! Editor state: the field list, the active field and its inspector
//!
//! Selection has two states: nothing active, or one field active with the
//! inspector open on it. Clicking a field enters the second state; clicking
//! elsewhere, Escape, Delete/Backspace and the inspector's Save and Close
//! all return to the first.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::field::{Field, FieldId, FieldIdGenerator, FieldKind};
use crate::geometry::{PixelPoint, PixelRect, Size};
use crate::keyboard::{Key, KeyPress};
use crate::measure::Measurements;
use crate::render::{PageView, RenderRequest, Toolkit};
use crate::store::custom_fields_payload;

const DEFAULT_ZOOM: f64 = 1.0;

/// Unsaved name/type edits for the active field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectorDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

/// A field as drawn over the current page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub id: FieldId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub rect: PixelRect,
    pub active: bool,
    /// False when overlays are static and drags/resizes will be ignored
    pub interactive: bool,
}

/// What a key press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No active field, or a key the editor does not handle
    Ignored,
    Deselected,
    Deleted(FieldId),
    Nudged(FieldId),
}

pub struct FieldEditor {
    fields: Vec<Field>,
    active: Option<FieldId>,
    inspector: Option<InspectorDraft>,
    /// 0-based index of the page on screen
    page_index: u32,
    zoom: f64,
    measurements: Measurements,
    toolkit: Toolkit,
    ids: FieldIdGenerator,
}

impl FieldEditor {
    pub fn new(toolkit: Toolkit) -> Self {
        Self {
            fields: Vec::new(),
            active: None,
            inspector: None,
            page_index: 0,
            zoom: DEFAULT_ZOOM,
            measurements: Measurements::new(),
            toolkit,
            ids: FieldIdGenerator::new(),
        }
    }

    pub fn with_fields(toolkit: Toolkit, fields: Vec<Field>) -> Self {
        let mut editor = Self::new(toolkit);
        editor.replace_fields(fields);
        editor
    }

    // ------------------------------------------------------------------
    // Field list
    // ------------------------------------------------------------------

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Copy of the field list as it is right now, for saving while editing
    /// carries on
    pub fn snapshot(&self) -> Vec<Field> {
        self.fields.clone()
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    fn field_mut(&mut self, id: &FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| &f.id == id)
    }

    /// Swap in a new field list, e.g. one loaded from the template
    pub fn replace_fields(&mut self, fields: Vec<Field>) {
        for field in &fields {
            self.ids.observe(&field.id);
        }
        self.fields = fields;

        let active_gone = self
            .active
            .as_ref()
            .is_some_and(|id| !self.fields.iter().any(|f| &f.id == id));
        if active_gone {
            self.deselect();
        }
    }

    /// Create a field at the top-left of `page` (1-based) with the default size
    pub fn add_field(&mut self, name: impl Into<String>, kind: FieldKind, page: u32) -> FieldId {
        let id = self.ids.next_id();
        let page = page.max(1);
        self.fields.push(Field::new(id.clone(), name, kind, page));
        debug!("Added field {} on page {}", id, page);
        id
    }

    fn remove_field(&mut self, id: &FieldId) {
        self.fields.retain(|f| &f.id != id);
    }

    /// Custom fields body for the template update
    pub fn custom_fields_payload(&self) -> Value {
        custom_fields_payload(&self.fields)
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    /// Bounds currently used for every fraction/pixel conversion
    pub fn bounds(&self) -> Size {
        self.measurements.bounds()
    }

    /// Resize-observer hook: the container and, when present, the rendered
    /// page. Missing or degenerate readings keep the previous values.
    pub fn observe_layout(&mut self, container: Option<Size>, page: Option<Size>) -> bool {
        let container_changed = self.measurements.observe_container(container);
        let page_changed = self.measurements.observe_page(page);
        container_changed || page_changed
    }

    /// Render the current page. A laid out page also becomes the page
    /// measurement, so overlays follow zoom changes.
    pub fn render(&mut self) -> PageView {
        let request = RenderRequest {
            page_index: self.page_index,
            zoom: self.zoom,
            width: self.measurements.render_width(),
        };
        let view = self.toolkit.renderer().render(&request);
        if let PageView::Page { size, .. } = &view {
            self.measurements.observe_page(Some(*size));
        }
        view
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Change the zoom factor. Returns false for non-positive or non-finite
    /// values, which are ignored.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() || zoom <= 0.0 || zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        true
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// 1-based page number on screen
    pub fn current_page(&self) -> u32 {
        self.page_index + 1
    }

    pub fn page_count(&self) -> Option<u32> {
        self.toolkit.renderer().page_count()
    }

    /// Go to a 0-based page index. Bounded by the page count when the
    /// renderer knows it.
    pub fn set_page(&mut self, index: u32) -> bool {
        if let Some(count) = self.page_count() {
            if index >= count {
                return false;
            }
        }
        if index == self.page_index {
            return false;
        }
        self.page_index = index;
        true
    }

    pub fn next_page(&mut self) -> bool {
        match self.page_index.checked_add(1) {
            Some(index) => self.set_page(index),
            None => false,
        }
    }

    pub fn prev_page(&mut self) -> bool {
        match self.page_index.checked_sub(1) {
            Some(index) => self.set_page(index),
            None => false,
        }
    }

    /// Fields on the page currently shown
    pub fn visible_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        let page = self.current_page();
        self.fields.iter().filter(move |f| f.page == page)
    }

    pub fn overlays(&self) -> Vec<Overlay> {
        let bounds = self.bounds();
        let interactive = self.toolkit.is_interactive();
        self.visible_fields()
            .map(|f| Overlay {
                id: f.id.clone(),
                name: f.name.clone(),
                kind: f.kind.clone(),
                rect: f.rect().to_pixels(bounds),
                active: self.active.as_ref() == Some(&f.id),
                interactive,
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Selection and inspector
    // ------------------------------------------------------------------

    pub fn active_id(&self) -> Option<&FieldId> {
        self.active.as_ref()
    }

    pub fn active_field(&self) -> Option<&Field> {
        self.active.as_ref().and_then(|id| self.field(id))
    }

    pub fn inspector(&self) -> Option<&InspectorDraft> {
        self.inspector.as_ref()
    }

    /// Make `id` the active field and open the inspector on it
    pub fn select(&mut self, id: &FieldId) -> bool {
        let Some(field) = self.field(id) else {
            return false;
        };
        let draft = InspectorDraft {
            name: field.name.clone(),
            kind: field.kind.clone(),
        };
        self.inspector = Some(draft);
        self.active = Some(id.clone());
        true
    }

    /// A click that landed on no field
    pub fn click_outside(&mut self) {
        self.deselect();
    }

    fn deselect(&mut self) {
        self.active = None;
        self.inspector = None;
    }

    pub fn set_inspector_name(&mut self, name: impl Into<String>) {
        if let Some(draft) = self.inspector.as_mut() {
            draft.name = name.into();
        }
    }

    pub fn set_inspector_kind(&mut self, kind: FieldKind) {
        if let Some(draft) = self.inspector.as_mut() {
            draft.kind = kind;
        }
    }

    /// Commit the inspector draft to the active field and deselect
    pub fn save_inspector(&mut self) -> bool {
        let (Some(id), Some(draft)) = (self.active.clone(), self.inspector.take()) else {
            self.deselect();
            return false;
        };

        let saved = match self.field_mut(&id) {
            Some(field) => {
                field.name = draft.name;
                field.kind = draft.kind;
                true
            }
            None => false,
        };
        self.deselect();
        saved
    }

    /// Discard the inspector draft and deselect
    pub fn close_inspector(&mut self) {
        self.deselect();
    }

    /// Toolbar delete
    pub fn delete_active(&mut self) -> Option<FieldId> {
        let id = self.active.clone()?;
        self.remove_field(&id);
        self.deselect();
        info!("Deleted field {}", id);
        Some(id)
    }

    // ------------------------------------------------------------------
    // Pointer and keyboard
    // ------------------------------------------------------------------

    /// End of a drag: `position` is the field's new top-left in pixels
    pub fn drag_stop(&mut self, id: &FieldId, position: PixelPoint) -> bool {
        if !self.toolkit.is_interactive() {
            return false;
        }
        let bounds = self.bounds();
        let Some(field) = self.field_mut(id) else {
            return false;
        };
        field.x = position.x / bounds.width;
        field.y = position.y / bounds.height;
        true
    }

    /// End of a resize: `rect` is the field's new box in pixels
    pub fn resize_stop(&mut self, id: &FieldId, rect: PixelRect) -> bool {
        if !self.toolkit.is_interactive() {
            return false;
        }
        let bounds = self.bounds();
        let Some(field) = self.field_mut(id) else {
            return false;
        };
        field.set_rect(rect.normalized().to_fractions(bounds));
        true
    }

    pub fn key_down(&mut self, press: KeyPress) -> KeyOutcome {
        let Some(active) = self.active.clone() else {
            return KeyOutcome::Ignored;
        };

        if press.key == Key::Escape {
            self.deselect();
            return KeyOutcome::Deselected;
        }

        if press.is_delete() {
            self.remove_field(&active);
            self.deselect();
            return KeyOutcome::Deleted(active);
        }

        let Some((dx, dy)) = press.nudge() else {
            return KeyOutcome::Ignored;
        };
        let bounds = self.bounds();
        let Some(field) = self.field_mut(&active) else {
            return KeyOutcome::Ignored;
        };
        field.x = (field.x * bounds.width + dx) / bounds.width;
        field.y = (field.y * bounds.height + dy) / bounds.height;
        KeyOutcome::Nudged(active)
    }
}
