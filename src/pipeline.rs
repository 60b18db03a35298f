use crate::crop::session::CropSession;
use crate::encode::{render_crop, EncodeSettings};
use crate::foundation::error::PixupResult;
use crate::upload::{AssetUrl, UploadClient, UploadTarget};

/// Renders the session's selection and uploads the encoded JPEG in one
/// call, returning the stored asset URL.
///
/// This is the confirm action of the crop flow: encode failures surface
/// before any network activity, and the upload itself is a single POST.
pub fn crop_encode_upload(
    image: &image::DynamicImage,
    session: &CropSession,
    settings: EncodeSettings,
    client: &UploadClient,
    target: &UploadTarget,
) -> PixupResult<AssetUrl> {
    let jpeg = render_crop(image, session.region(), session.display(), settings)?;
    client.upload(&jpeg, "crop.jpg", target)
}
