pub type PixupResult<T> = Result<T, PixupError>;

#[derive(thiserror::Error, Debug)]
pub enum PixupError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("file too large: {actual_bytes} bytes exceeds the {limit_bytes} byte limit")]
    FileTooLarge { actual_bytes: u64, limit_bytes: u64 },

    #[error("invalid file type: {detected}")]
    InvalidFileType { detected: String },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("upload error: {reason}")]
    Upload { status: Option<u16>, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixupError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn file_too_large(actual_bytes: u64, limit_bytes: u64) -> Self {
        Self::FileTooLarge {
            actual_bytes,
            limit_bytes,
        }
    }

    pub fn invalid_file_type(detected: impl Into<String>) -> Self {
        Self::InvalidFileType {
            detected: detected.into(),
        }
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn upload(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Upload {
            status,
            reason: reason.into(),
        }
    }

    /// HTTP status attached to an upload failure, if the server answered at all.
    pub fn upload_status(&self) -> Option<u16> {
        match self {
            Self::Upload { status, .. } => *status,
            _ => None,
        }
    }

    /// True for failures detected before any network or encoding work starts.
    pub fn is_precheck(&self) -> bool {
        matches!(self, Self::FileTooLarge { .. } | Self::InvalidFileType { .. })
    }
}
