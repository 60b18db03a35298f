use crate::foundation::error::{PixupError, PixupResult};

pub use kurbo::{Point, Rect};

/// Size of the rendered preview surface, in display pixels.
///
/// Crop coordinates are expressed against this surface, not against the
/// source image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> PixupResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(PixupError::validation(
                "DisplaySize width/height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn min_side(self) -> f64 {
        self.width.min(self.height)
    }

    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Pixel dimensions of the decoded source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    pub fn new(width: u32, height: u32) -> PixupResult<Self> {
        if width == 0 || height == 0 {
            return Err(PixupError::validation(
                "NaturalSize width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

/// Per-axis ratio between source pixels and display pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

pub fn scale_factors(natural: NaturalSize, display: DisplaySize) -> ScaleFactors {
    ScaleFactors {
        x: f64::from(natural.width) / display.width,
        y: f64::from(natural.height) / display.height,
    }
}

/// Uniform-scale fit of a source image into a bounding box.
///
/// Preserves aspect ratio and never upscales: an image smaller than the box
/// is displayed at its natural size.
pub fn fit_within(natural: NaturalSize, max: DisplaySize) -> DisplaySize {
    let w = f64::from(natural.width);
    let h = f64::from(natural.height);
    let scale = (max.width / w).min(max.height / h).min(1.0);
    DisplaySize {
        width: w * scale,
        height: h * scale,
    }
}
