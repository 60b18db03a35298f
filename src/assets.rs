use std::path::Path;

use anyhow::Context as _;
use image::GenericImageView as _;

use crate::foundation::error::{PixupError, PixupResult};
use crate::foundation::geom::NaturalSize;

/// Decodes an image from raw bytes, sniffing the container format.
pub fn decode_image(bytes: &[u8]) -> PixupResult<image::DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| PixupError::encoding(format!("decode image: {e}")))
}

/// Reads and decodes an image file.
pub fn load_image(path: &Path) -> PixupResult<image::DynamicImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Pixel dimensions of a decoded image.
pub fn natural_size(image: &image::DynamicImage) -> NaturalSize {
    let (width, height) = image.dimensions();
    // Decoded images always have non-zero dimensions.
    NaturalSize { width, height }
}

/// Best-effort content sniff of an upload payload.
///
/// Image formats are detected from their magic bytes; PDF is the one
/// non-image type the document endpoints accept. Returns `None` for
/// anything unrecognized.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type());
    }
    if bytes.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    None
}
