//! Page rendering strategies
//!
//! The editor never talks to a rendering backend directly. It is handed a
//! [`Toolkit`] once, at construction, and keeps it for its whole lifetime.

use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::geometry::Size;

/// US Letter in PDF points, used when a page carries no MediaBox at all
const LETTER_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Bound on `/Parent` hops, so a cyclic page tree cannot loop forever
const MAX_TREE_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("document has no pages")]
    NoPages,

    #[error("page {page}: {reason}")]
    MediaBox { page: u32, reason: String },
}

/// Which backend produced a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderCapability {
    /// Pages are laid out from the parsed PDF and can be measured
    Pdf,
    /// The document URL is embedded as-is in an inline frame
    Frame,
}

/// How field overlays respond to the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    DragResize,
    /// Overlays are drawn and can be selected, but not dragged or resized
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    /// 0-based page index
    pub page_index: u32,
    pub zoom: f64,
    /// Width in pixels to fit the page to before zooming
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageView {
    /// A laid out page of `size` pixels
    Page { page_number: u32, size: Size },
    /// The raw document shown in an inline frame
    Frame { src: String },
    /// Nothing to show
    Empty,
}

pub trait PageRenderer {
    fn capability(&self) -> RenderCapability;

    /// Number of pages, when the backend knows it
    fn page_count(&self) -> Option<u32>;

    fn render(&self, request: &RenderRequest) -> PageView;
}

/// Lays pages out from the document's MediaBox entries
#[derive(Debug, Clone)]
pub struct PdfPageRenderer {
    /// `[x, y, width, height]` per page, in PDF points
    media_boxes: Vec<[f64; 4]>,
}

impl PdfPageRenderer {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RenderError> {
        let doc = Document::load_mem(bytes)?;
        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(RenderError::NoPages);
        }

        let media_boxes = pages
            .iter()
            .map(|(&number, &id)| {
                media_box(&doc, id).map_err(|reason| RenderError::MediaBox {
                    page: number,
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Parsed PDF with {} pages", media_boxes.len());
        Ok(Self { media_boxes })
    }

    /// MediaBox of a 1-based page as `[x, y, width, height]`
    pub fn media_box(&self, page_number: u32) -> Option<[f64; 4]> {
        let index = page_number.checked_sub(1)? as usize;
        self.media_boxes.get(index).copied()
    }
}

impl PageRenderer for PdfPageRenderer {
    fn capability(&self) -> RenderCapability {
        RenderCapability::Pdf
    }

    fn page_count(&self) -> Option<u32> {
        Some(self.media_boxes.len() as u32)
    }

    fn render(&self, request: &RenderRequest) -> PageView {
        let page_number = request.page_index + 1;
        let Some([_, _, width, height]) = self.media_box(page_number) else {
            return PageView::Empty;
        };

        let scale = request.width / width;
        PageView::Page {
            page_number,
            size: Size::new(request.width * request.zoom, height * scale * request.zoom),
        }
    }
}

fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f64; 4], String> {
    let page = doc
        .get_object(page_id)
        .map_err(|e| format!("failed to get page object: {}", e))?;
    let page_dict = page.as_dict().map_err(|_| "page is not a dictionary")?;

    // MediaBox is inheritable from any ancestor in the page tree
    let mut dict = page_dict;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(rect) = dict.get(b"MediaBox") {
            return parse_rect(doc, rect);
        }
        match parent_dict(doc, dict) {
            Some(parent) => dict = parent,
            None => break,
        }
    }

    Ok(LETTER_MEDIA_BOX)
}

fn parent_dict<'a>(doc: &'a Document, dict: &Dictionary) -> Option<&'a Dictionary> {
    let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    doc.get_object(parent_id).ok()?.as_dict().ok()
}

/// `[x1, y1, x2, y2]` to `[x, y, width, height]`
fn parse_rect(doc: &Document, obj: &Object) -> Result<[f64; 4], String> {
    let arr = match obj {
        Object::Array(a) => a,
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| format!("failed to resolve MediaBox: {}", e))?
            .as_array()
            .map_err(|_| "MediaBox reference is not an array")?,
        _ => return Err("MediaBox is not an array".to_string()),
    };

    if arr.len() != 4 {
        return Err(format!("MediaBox has {} elements, expected 4", arr.len()));
    }

    let mut values = [0.0f64; 4];
    for (slot, obj) in values.iter_mut().zip(arr) {
        *slot = number(doc, obj)?;
    }

    let width = values[2] - values[0];
    let height = values[3] - values[1];
    if width <= 0.0 || height <= 0.0 {
        return Err(format!("MediaBox is empty: {:?}", values));
    }

    Ok([values[0], values[1], width, height])
}

fn number(doc: &Document, obj: &Object) -> Result<f64, String> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(r) => Ok(*r as f64),
        Object::Reference(id) => {
            let resolved = doc
                .get_object(*id)
                .map_err(|e| format!("failed to resolve number: {}", e))?;
            number(doc, resolved)
        }
        _ => Err("expected number in MediaBox".to_string()),
    }
}

/// Shows the document URL in an inline frame. Pixel alignment of overlays
/// is then only as good as the container measurement.
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    src: Option<String>,
}

impl FrameRenderer {
    pub fn new(src: Option<String>) -> Self {
        Self { src }
    }
}

impl PageRenderer for FrameRenderer {
    fn capability(&self) -> RenderCapability {
        RenderCapability::Frame
    }

    fn page_count(&self) -> Option<u32> {
        None
    }

    fn render(&self, _request: &RenderRequest) -> PageView {
        match &self.src {
            Some(src) => PageView::Frame { src: src.clone() },
            None => PageView::Empty,
        }
    }
}

/// The renderer and overlay interaction an editor works with
pub struct Toolkit {
    renderer: Box<dyn PageRenderer>,
    interaction: Interaction,
}

impl Toolkit {
    pub fn new(renderer: Box<dyn PageRenderer>, interaction: Interaction) -> Self {
        Self {
            renderer,
            interaction,
        }
    }

    /// Inline frame with static overlays
    pub fn frame(src: Option<String>) -> Self {
        Self::new(Box::new(FrameRenderer::new(src)), Interaction::Static)
    }

    /// Pick the richest toolkit the inputs allow.
    ///
    /// With document bytes that parse as a PDF this is the PDF renderer with
    /// drag/resize overlays; anything else degrades to [`Toolkit::frame`].
    /// Never fails.
    pub fn detect(src: Option<&str>, document: Option<&[u8]>) -> Self {
        let Some(src) = src else {
            return Self::frame(None);
        };

        let Some(bytes) = document else {
            warn!("No document bytes for {}, showing it in a frame", src);
            return Self::frame(Some(src.to_string()));
        };

        match PdfPageRenderer::from_bytes(bytes) {
            Ok(renderer) => Self::new(Box::new(renderer), Interaction::DragResize),
            Err(e) => {
                warn!("PDF renderer unavailable for {}: {}", src, e);
                Self::frame(Some(src.to_string()))
            }
        }
    }

    pub fn renderer(&self) -> &dyn PageRenderer {
        self.renderer.as_ref()
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn is_interactive(&self) -> bool {
        self.interaction == Interaction::DragResize
    }
}
