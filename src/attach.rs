use crate::foundation::error::{PixupError, PixupResult};
use crate::upload::{precheck, AssetUrl, UploadClient, UploadTarget};

/// Lifecycle of a single attachment slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AttachState {
    #[default]
    Empty,
    Selected,
    Uploading,
    Uploaded,
    Failed,
}

/// A file staged for upload.
#[derive(Clone, Debug)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One attachment slot: holds at most one file and drives it through the
/// precheck-upload lifecycle.
///
/// `Empty -> Selected -> Uploading -> Uploaded | Failed`; both terminal
/// states return to `Empty` through [`remove`](Attachment::remove), and
/// `Failed` keeps the selection so a later confirm can retry. At most one
/// upload is in flight per slot; a confirm during `Uploading` does nothing.
#[derive(Debug, Default)]
pub struct Attachment {
    state: AttachState,
    file: Option<SelectedFile>,
    asset: Option<AssetUrl>,
    error: Option<String>,
}

impl Attachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AttachState {
        self.state
    }

    pub fn is_uploading(&self) -> bool {
        self.state == AttachState::Uploading
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Receipt of the last successful upload, if any.
    pub fn asset_url(&self) -> Option<&AssetUrl> {
        self.asset.as_ref()
    }

    /// Message of the last failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Stages a file after running the pre-upload checks.
    ///
    /// Browse and drag-and-drop both land here. On failure the slot is left
    /// exactly as it was, so a rejected pick never clobbers prior state.
    pub fn select(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
        target: &UploadTarget,
    ) -> PixupResult<()> {
        match self.state {
            AttachState::Uploading => {
                return Err(PixupError::validation(
                    "cannot replace the file while an upload is in flight",
                ));
            }
            AttachState::Uploaded => {
                return Err(PixupError::validation(
                    "remove the uploaded file before selecting a new one",
                ));
            }
            AttachState::Empty | AttachState::Selected | AttachState::Failed => {}
        }

        precheck(&bytes, target)?;
        self.state = AttachState::Selected;
        self.file = Some(SelectedFile {
            name: name.into(),
            bytes,
        });
        self.asset = None;
        self.error = None;
        Ok(())
    }

    /// Sends the staged file through the client.
    ///
    /// Returns the receipt exactly once per successful upload. A confirm
    /// while an upload is already in flight is a no-op reporting no
    /// receipt. On failure the slot moves to `Failed` with the selection
    /// intact and the error is both recorded and returned.
    #[tracing::instrument(skip(self, client, target))]
    pub fn confirm(
        &mut self,
        client: &UploadClient,
        target: &UploadTarget,
    ) -> PixupResult<Option<AssetUrl>> {
        match self.state {
            AttachState::Uploading => return Ok(None),
            AttachState::Selected | AttachState::Failed => {}
            AttachState::Empty | AttachState::Uploaded => {
                return Err(PixupError::validation("no staged file to upload"));
            }
        }
        let Some(file) = self.file.take() else {
            return Err(PixupError::validation("no staged file to upload"));
        };

        self.state = AttachState::Uploading;
        self.error = None;

        let result = client.upload(&file.bytes, &file.name, target);
        // The selection survives the attempt either way.
        self.file = Some(file);

        match result {
            Ok(url) => {
                self.state = AttachState::Uploaded;
                self.asset = Some(url.clone());
                Ok(Some(url))
            }
            Err(err) => {
                self.state = AttachState::Failed;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Clears the slot back to `Empty`, dropping the file, receipt and
    /// error. Idempotent.
    pub fn remove(&mut self) {
        self.state = AttachState::Empty;
        self.file = None;
        self.asset = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn unroutable_target() -> UploadTarget {
        // Port 1 on loopback: nothing listens there, so any attempted
        // request fails fast instead of hanging.
        UploadTarget::image("http://127.0.0.1:1", "upload/logo")
    }

    #[test]
    fn select_stages_a_valid_file() {
        let mut att = Attachment::new();
        att.select("logo.png", png_bytes(), &unroutable_target()).unwrap();
        assert_eq!(att.state(), AttachState::Selected);
        assert_eq!(att.file().unwrap().name, "logo.png");
        assert!(att.asset_url().is_none());
        assert!(att.error().is_none());
    }

    #[test]
    fn select_precheck_failure_leaves_the_slot_untouched() {
        let mut att = Attachment::new();
        let err = att
            .select("notes.txt", b"plain text".to_vec(), &unroutable_target())
            .unwrap_err();
        assert!(err.is_precheck());
        assert_eq!(att.state(), AttachState::Empty);
        assert!(att.file().is_none());

        // Same with an oversized file against a staged slot.
        att.select("logo.png", png_bytes(), &unroutable_target()).unwrap();
        let tiny = unroutable_target().with_max_bytes(1);
        let err = att.select("big.png", png_bytes(), &tiny).unwrap_err();
        assert!(matches!(err, PixupError::FileTooLarge { .. }));
        assert_eq!(att.state(), AttachState::Selected);
        assert_eq!(att.file().unwrap().name, "logo.png");
    }

    #[test]
    fn confirm_without_a_selection_is_an_error() {
        let mut att = Attachment::new();
        let err = att
            .confirm(&UploadClient::new(), &unroutable_target())
            .unwrap_err();
        assert!(matches!(err, PixupError::Validation(_)), "{err}");
        assert_eq!(att.state(), AttachState::Empty);
    }

    #[test]
    fn confirm_while_uploading_is_a_noop() {
        let mut att = Attachment::new();
        att.select("logo.png", png_bytes(), &unroutable_target()).unwrap();
        att.state = AttachState::Uploading;

        // The guard must answer before any request is attempted; against
        // this target a real attempt would surface an upload error.
        let receipt = att
            .confirm(&UploadClient::new(), &unroutable_target())
            .unwrap();
        assert!(receipt.is_none());
        assert_eq!(att.state(), AttachState::Uploading);
        assert!(att.file().is_some());
    }

    #[test]
    fn failed_upload_keeps_the_selection_for_retry() {
        let mut att = Attachment::new();
        let target = unroutable_target();
        att.select("logo.png", png_bytes(), &target).unwrap();

        let err = att.confirm(&UploadClient::new(), &target).unwrap_err();
        assert_eq!(err.upload_status(), None);
        assert_eq!(att.state(), AttachState::Failed);
        assert!(att.error().unwrap().contains("upload error"));
        assert_eq!(att.file().unwrap().name, "logo.png");
        assert!(att.asset_url().is_none());
    }

    #[test]
    fn select_is_blocked_while_uploading_or_uploaded() {
        let mut att = Attachment::new();
        att.select("logo.png", png_bytes(), &unroutable_target()).unwrap();

        att.state = AttachState::Uploading;
        assert!(
            att.select("other.png", png_bytes(), &unroutable_target())
                .is_err()
        );

        att.state = AttachState::Uploaded;
        assert!(
            att.select("other.png", png_bytes(), &unroutable_target())
                .is_err()
        );
    }

    #[test]
    fn remove_resets_from_any_state() {
        let mut att = Attachment::new();
        att.select("logo.png", png_bytes(), &unroutable_target()).unwrap();
        att.state = AttachState::Failed;
        att.error = Some("boom".to_string());

        att.remove();
        assert_eq!(att.state(), AttachState::Empty);
        assert!(att.file().is_none());
        assert!(att.error().is_none());

        // Idempotent.
        att.remove();
        assert_eq!(att.state(), AttachState::Empty);
    }
}
