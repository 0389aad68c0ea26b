//! Conversion between page fractions and overlay pixels
//!
//! Fraction space is what gets persisted: `0.0..=1.0` of the rendered page
//! on each axis, origin at the top-left. Pixel space is the overlay layer
//! drawn on top of the rendered page.

use serde::{Deserialize, Serialize};

/// Bounds used when neither the page nor its container has been measured
pub const DEFAULT_BOUNDS: Size = Size {
    width: 800.0,
    height: 1000.0,
};

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A measurement is only usable when both sides are finite and positive
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle in overlay pixels, origin at the top-left of the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Flip negative extents so the rectangle covers the same area with a
    /// positive width and height
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_fractions(&self, bounds: Size) -> FractionRect {
        FractionRect {
            x: self.x / bounds.width,
            y: self.y / bounds.height,
            w: self.width / bounds.width,
            h: self.height / bounds.height,
        }
    }
}

/// Rectangle in fractions of the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl FractionRect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn to_pixels(&self, bounds: Size) -> PixelRect {
        PixelRect {
            x: self.x * bounds.width,
            y: self.y * bounds.height,
            width: self.w * bounds.width,
            height: self.h * bounds.height,
        }
    }

    /// True when the rectangle lies entirely on the page
    pub fn is_within_page(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x + self.w <= 1.0 && self.y + self.h <= 1.0
    }
}
