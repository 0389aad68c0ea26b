//! Cached layout measurements of the page and its container

use crate::geometry::{Size, DEFAULT_BOUNDS};

/// Width asked of the renderer before the container has been measured
pub const DEFAULT_PAGE_WIDTH: f64 = 800.0;

/// The renderer is never asked for a page narrower than this
pub const MIN_RENDER_WIDTH: f64 = 200.0;

/// Last good measurement of the rendered page and of the container holding
/// it. A failed measurement never overwrites a good one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    page: Option<Size>,
    container: Option<Size>,
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Option<Size> {
        self.page
    }

    pub fn container(&self) -> Option<Size> {
        self.container
    }

    /// Record the container box. Returns true when the cached value changed.
    pub fn observe_container(&mut self, size: Option<Size>) -> bool {
        Self::store(&mut self.container, size)
    }

    /// Record the rendered page box. Returns true when the cached value changed.
    pub fn observe_page(&mut self, size: Option<Size>) -> bool {
        Self::store(&mut self.page, size)
    }

    fn store(slot: &mut Option<Size>, size: Option<Size>) -> bool {
        match size {
            Some(size) if size.is_usable() && *slot != Some(size) => {
                *slot = Some(size);
                true
            }
            _ => false,
        }
    }

    /// Bounds for fraction/pixel conversion: the page, else the container,
    /// else [`DEFAULT_BOUNDS`]
    pub fn bounds(&self) -> Size {
        self.page.or(self.container).unwrap_or(DEFAULT_BOUNDS)
    }

    /// Width to render the page at: the container width rounded down, but
    /// not below [`MIN_RENDER_WIDTH`]
    pub fn render_width(&self) -> f64 {
        match self.container {
            Some(container) => container.width.floor().max(MIN_RENDER_WIDTH),
            None => DEFAULT_PAGE_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_priority() {
        let mut m = Measurements::new();
        assert_eq!(m.bounds(), DEFAULT_BOUNDS);

        m.observe_container(Some(Size::new(1024.0, 720.0)));
        assert_eq!(m.bounds(), Size::new(1024.0, 720.0));

        m.observe_page(Some(Size::new(612.0, 792.0)));
        assert_eq!(m.bounds(), Size::new(612.0, 792.0));
    }

    #[test]
    fn test_failed_measurement_keeps_cached_value() {
        let mut m = Measurements::new();
        m.observe_page(Some(Size::new(600.0, 800.0)));

        assert!(!m.observe_page(None));
        assert!(!m.observe_page(Some(Size::new(0.0, 0.0))));
        assert!(!m.observe_page(Some(Size::new(f64::NAN, 800.0))));
        assert_eq!(m.page(), Some(Size::new(600.0, 800.0)));
    }

    #[test]
    fn test_observe_reports_changes_only() {
        let mut m = Measurements::new();
        assert!(m.observe_container(Some(Size::new(500.0, 500.0))));
        assert!(!m.observe_container(Some(Size::new(500.0, 500.0))));
        assert!(m.observe_container(Some(Size::new(501.0, 500.0))));
    }

    #[test]
    fn test_render_width() {
        let mut m = Measurements::new();
        assert_eq!(m.render_width(), DEFAULT_PAGE_WIDTH);

        m.observe_container(Some(Size::new(950.7, 720.0)));
        assert_eq!(m.render_width(), 950.0);

        m.observe_container(Some(Size::new(120.0, 720.0)));
        assert_eq!(m.render_width(), MIN_RENDER_WIDTH);
    }
}
