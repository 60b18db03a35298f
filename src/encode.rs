use image::imageops::FilterType;

use crate::assets::natural_size;
use crate::crop::region::CropRegion;
use crate::foundation::error::{PixupError, PixupResult};
use crate::foundation::geom::{scale_factors, DisplaySize, NaturalSize, Rect};

/// Output settings for the rendered crop.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct EncodeSettings {
    /// Edge length of the square output, in pixels.
    pub output_size: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            output_size: 300,
            jpeg_quality: 90,
        }
    }
}

impl EncodeSettings {
    pub fn validate(&self) -> PixupResult<()> {
        if self.output_size == 0 {
            return Err(PixupError::validation("output size must be non-zero"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(PixupError::validation(
                "jpeg quality must be between 1 and 100",
            ));
        }
        Ok(())
    }

    pub fn with_output_size(mut self, output_size: u32) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn with_jpeg_quality(mut self, jpeg_quality: u8) -> Self {
        self.jpeg_quality = jpeg_quality;
        self
    }
}

/// Renders the selected region of `image` as a square JPEG.
///
/// The selection is mapped from display to source coordinates through the
/// per-axis scale factors, sampled, resized to `output_size`, and encoded.
/// The output size is fixed regardless of how large the selection was.
#[tracing::instrument(skip(image, region, display))]
pub fn render_crop(
    image: &image::DynamicImage,
    region: CropRegion,
    display: DisplaySize,
    settings: EncodeSettings,
) -> PixupResult<Vec<u8>> {
    settings.validate()?;
    // Re-validate so hand-built regions go through the same checks as
    // gesture-produced ones.
    let region = CropRegion::new(region.x, region.y, region.size, display)?;

    let natural = natural_size(image);
    let scale = scale_factors(natural, display);
    let (x, y, width, height) = snap_source_rect(region.source_rect(scale), natural);

    let cropped = image.crop_imm(x, y, width, height);
    let resized = cropped.resize_exact(
        settings.output_size,
        settings.output_size,
        FilterType::Triangle,
    );
    encode_jpeg(&resized, settings.jpeg_quality)
}

/// Serializes an image as baseline JPEG at the given quality.
pub fn encode_jpeg(image: &image::DynamicImage, quality: u8) -> PixupResult<Vec<u8>> {
    // JPEG has no alpha channel; flatten to RGB first.
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| PixupError::encoding(format!("encode jpeg: {e}")))?;
    Ok(buf)
}

/// Snaps a source-space rectangle to whole pixels inside the image.
///
/// Sub-pixel coordinates are rounded; the result is clamped to the image
/// and kept at least one pixel on each axis.
fn snap_source_rect(rect: Rect, natural: NaturalSize) -> (u32, u32, u32, u32) {
    let x = (rect.x0.round().max(0.0) as u32).min(natural.width.saturating_sub(1));
    let y = (rect.y0.round().max(0.0) as u32).min(natural.height.saturating_sub(1));
    let right = (rect.x1.round().max(0.0) as u32).min(natural.width);
    let bottom = (rect.y1.round().max(0.0) as u32).min(natural.height);
    let width = right.saturating_sub(x).max(1).min(natural.width - x);
    let height = bottom.saturating_sub(y).max(1).min(natural.height - y);
    (x, y, width, height)
}
