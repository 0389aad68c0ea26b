//! Field placement editor for DocuSeal templates
//!
//! Fields are rectangles stored as fractions of the rendered page, so they
//! stay aligned across zoom levels and container resizes. The editor converts
//! between that representation and pixels using the most recent page
//! measurement.
//!
//! Rendering is pluggable: a [`Toolkit`] bundles the page renderer and the
//! overlay interaction mode. [`Toolkit::detect`] tries the PDF renderer with
//! drag/resize overlays and quietly drops to an inline frame with static
//! overlays when the document cannot be parsed.

pub mod editor;
pub mod field;
pub mod geometry;
pub mod keyboard;
pub mod measure;
pub mod render;
pub mod store;

pub use editor::{FieldEditor, InspectorDraft, KeyOutcome, Overlay};
pub use field::{Field, FieldId, FieldIdGenerator, FieldKind};
pub use geometry::{FractionRect, PixelPoint, PixelRect, Size, DEFAULT_BOUNDS};
pub use keyboard::{Key, KeyPress, NUDGE_STEP, NUDGE_STEP_LARGE};
pub use measure::Measurements;
pub use render::{
    FrameRenderer, Interaction, PageRenderer, PageView, PdfPageRenderer, RenderCapability,
    RenderError, RenderRequest, Toolkit,
};
pub use store::{
    custom_fields_payload, fields_from_template, HttpTemplateStore, StoreError, TemplateStore,
};
