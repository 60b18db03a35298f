//! Pixup turns an interactive square crop selection into a stored asset.
//!
//! # Pipeline overview
//!
//! 1. **Select**: a [`CropSession`] tracks a square [`CropRegion`] over the
//!    displayed preview, driven by drag and corner-resize gestures (pure
//!    geometry, no IO).
//! 2. **Render**: [`render_crop`] maps the selection into source pixels,
//!    samples it, and encodes a fixed-size JPEG ([`EncodeSettings`]).
//! 3. **Upload**: [`UploadClient`] posts the bytes as one multipart request
//!    and returns the durable [`AssetUrl`] parsed from the JSON response.
//!
//! [`Attachment`] drives the same prechecks and upload for files that skip
//! the crop step.
//!
//! The key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Gestures clamp, never reject**: every pointer position is accepted
//!   and the selection stays square, on the preview, and at least
//!   [`MIN_SIZE`] display pixels wide.
//! - **No hidden IO**: prechecks run before any request, one confirm maps
//!   to at most one POST, and nothing is retried behind the caller's back.
#![forbid(unsafe_code)]

mod assets;
mod attach;
mod config;
mod crop;
mod encode;
mod foundation;
mod pipeline;
mod upload;

pub use assets::{decode_image, load_image, natural_size, sniff_mime};
pub use attach::{AttachState, Attachment, SelectedFile};
pub use config::{DEFAULT_MAX_UPLOAD_MB, EnvConfig};
pub use crop::region::{effective_min_size, CropRegion, Handle, MIN_SIZE};
pub use crop::session::{CropSession, Interaction};
pub use encode::{encode_jpeg, render_crop, EncodeSettings};
pub use foundation::error::{PixupError, PixupResult};
pub use foundation::geom::{
    fit_within, scale_factors, DisplaySize, NaturalSize, Point, Rect, ScaleFactors,
};
pub use pipeline::crop_encode_upload;
pub use upload::{precheck, AssetUrl, UploadClient, UploadTarget, DEFAULT_MAX_BYTES};
