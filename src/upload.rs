use std::time::Duration;

use reqwest::blocking::{multipart, Client};

use crate::assets::sniff_mime;
use crate::foundation::error::{PixupError, PixupResult};

/// Default upload ceiling: 5 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Durable URL of a stored asset, as returned by the upload endpoint.
///
/// Once handed out, the asset has no further lifecycle here; callers own
/// the URL.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetUrl(pub String);

impl AssetUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where and how an upload is sent.
///
/// The multipart field name and the response URL field are part of the
/// server contract and therefore configuration, not constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UploadTarget {
    pub base_url: String,
    pub path: String,
    #[serde(default = "default_field_name")]
    pub field_name: String,
    #[serde(default = "default_url_field")]
    pub url_field: String,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    #[serde(default = "default_accept")]
    pub accept: Vec<String>,
}

fn default_field_name() -> String {
    "file".to_string()
}

fn default_url_field() -> String {
    "cloudinaryUrl".to_string()
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

fn default_accept() -> Vec<String> {
    vec!["image/*".to_string()]
}

impl UploadTarget {
    /// Target for the image endpoints (logos, profile photos, crops).
    pub fn image(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            field_name: default_field_name(),
            url_field: default_url_field(),
            max_bytes: default_max_bytes(),
            accept: default_accept(),
        }
    }

    /// Target for the document endpoints, which also take PDFs.
    pub fn document(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        let mut target = Self::image(base_url, path);
        target.accept.push("application/pdf".to_string());
        target
    }

    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn with_url_field(mut self, url_field: impl Into<String>) -> Self {
        self.url_field = url_field.into();
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_accept(mut self, accept: Vec<String>) -> Self {
        self.accept = accept;
        self
    }

    pub fn validate(&self) -> PixupResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(PixupError::validation("upload base_url must not be empty"));
        }
        if self.path.trim().is_empty() {
            return Err(PixupError::validation("upload path must not be empty"));
        }
        if self.field_name.is_empty() {
            return Err(PixupError::validation("upload field_name must not be empty"));
        }
        if self.url_field.is_empty() {
            return Err(PixupError::validation("upload url_field must not be empty"));
        }
        if self.max_bytes == 0 {
            return Err(PixupError::validation("upload max_bytes must be > 0"));
        }
        if self.accept.is_empty() {
            return Err(PixupError::validation("upload accept list must not be empty"));
        }
        Ok(())
    }

    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    pub fn accepts(&self, mime: &str) -> bool {
        self.accept.iter().any(|pattern| mime_matches(pattern, mime))
    }
}

fn mime_matches(pattern: &str, mime: &str) -> bool {
    if pattern == "*/*" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return mime
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'));
    }
    pattern.eq_ignore_ascii_case(mime)
}

/// Validates a payload against the target before any network activity.
///
/// Checks the size ceiling first, then sniffs the content type against the
/// accept list. Returns the sniffed MIME type on success.
pub fn precheck(bytes: &[u8], target: &UploadTarget) -> PixupResult<&'static str> {
    let actual_bytes = bytes.len() as u64;
    if actual_bytes > target.max_bytes {
        return Err(PixupError::file_too_large(actual_bytes, target.max_bytes));
    }
    let Some(mime) = sniff_mime(bytes) else {
        return Err(PixupError::invalid_file_type("unknown"));
    };
    if !target.accepts(mime) {
        return Err(PixupError::invalid_file_type(mime));
    }
    Ok(mime)
}

/// One-shot multipart upload client.
///
/// Exactly one POST per call, no retries, no caching. Failures carry the
/// HTTP status when the server answered and `None` for transport errors.
pub struct UploadClient {
    http: Client,
}

impl UploadClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Prechecks, posts the payload as the target's multipart field, and
    /// extracts the asset URL from the JSON response.
    #[tracing::instrument(skip(self, bytes, target))]
    pub fn upload(
        &self,
        bytes: &[u8],
        filename: &str,
        target: &UploadTarget,
    ) -> PixupResult<AssetUrl> {
        target.validate()?;
        let mime = precheck(bytes, target)?;

        let part = multipart::Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|e| PixupError::validation(format!("invalid part mime '{mime}': {e}")))?;
        let form = multipart::Form::new().part(target.field_name.clone(), part);

        let response = self
            .http
            .post(target.endpoint_url())
            .multipart(form)
            .send()
            .map_err(|e| PixupError::upload(None, format!("send upload request: {e}")))?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            PixupError::upload(Some(status.as_u16()), format!("read response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(PixupError::upload(Some(status.as_u16()), body_snippet(&body)));
        }

        parse_asset_url(&body, &target.url_field, status.as_u16())
    }
}

impl Default for UploadClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated extraction of the asset URL from a 2xx response body.
///
/// The body must be JSON carrying a non-empty string under `url_field`;
/// anything else is a contract violation surfaced as an upload error.
fn parse_asset_url(body: &str, url_field: &str, status: u16) -> PixupResult<AssetUrl> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        PixupError::upload(Some(status), format!("response is not JSON: {e}"))
    })?;
    match value.get(url_field) {
        Some(serde_json::Value::String(url)) if !url.is_empty() => Ok(AssetUrl(url.clone())),
        Some(serde_json::Value::String(_)) => Err(PixupError::upload(
            Some(status),
            format!("response field '{url_field}' is empty"),
        )),
        Some(_) => Err(PixupError::upload(
            Some(status),
            format!("response field '{url_field}' is not a string"),
        )),
        None => Err(PixupError::upload(
            Some(status),
            format!("response is missing field '{url_field}'"),
        )),
    }
}

fn body_snippet(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    let mut snippet: String = trimmed.chars().take(MAX_CHARS).collect();
    if trimmed.chars().count() > MAX_CHARS {
        snippet.push_str("...");
    }
    snippet
}
