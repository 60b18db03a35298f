use crate::foundation::error::{PixupError, PixupResult};
use crate::upload::UploadTarget;

/// Default upload ceiling in megabytes when `PIXUP_UPLOAD_MAX_MB` is unset.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 5;

/// Upload settings sourced from the environment.
///
/// Recognized variables:
/// - `PIXUP_API_BASE_URL`: base URL the endpoint paths are joined onto.
/// - `PIXUP_UPLOAD_MAX_MB`: size ceiling in megabytes (default 5).
/// - `PIXUP_UPLOAD_FIELD`: multipart field name (default "file").
/// - `PIXUP_UPLOAD_URL_FIELD`: JSON response field holding the asset URL
///   (default "cloudinaryUrl").
#[derive(Clone, Debug, PartialEq)]
pub struct EnvConfig {
    pub base_url: Option<String>,
    pub max_upload_mb: u64,
    pub field_name: String,
    pub url_field: String,
}

impl EnvConfig {
    pub fn from_env() -> PixupResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable
    /// lookup, so tests do not have to touch process-global state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PixupResult<Self> {
        let base_url = lookup("PIXUP_API_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let max_upload_mb = match lookup("PIXUP_UPLOAD_MAX_MB") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                PixupError::validation(format!(
                    "PIXUP_UPLOAD_MAX_MB must be a positive integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };
        if max_upload_mb == 0 {
            return Err(PixupError::validation("PIXUP_UPLOAD_MAX_MB must be > 0"));
        }

        let field_name = lookup("PIXUP_UPLOAD_FIELD")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "file".to_string());
        let url_field = lookup("PIXUP_UPLOAD_URL_FIELD")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "cloudinaryUrl".to_string());

        Ok(Self {
            base_url,
            max_upload_mb,
            field_name,
            url_field,
        })
    }

    pub fn require_base_url(&self) -> PixupResult<&str> {
        self.base_url
            .as_deref()
            .ok_or_else(|| PixupError::validation("PIXUP_API_BASE_URL is not set"))
    }

    /// Builds an image-endpoint target for `path` from this configuration.
    pub fn image_target(&self, path: &str) -> PixupResult<UploadTarget> {
        Ok(self.apply(UploadTarget::image(self.require_base_url()?, path)))
    }

    /// Builds a document-endpoint target for `path` from this configuration.
    pub fn document_target(&self, path: &str) -> PixupResult<UploadTarget> {
        Ok(self.apply(UploadTarget::document(self.require_base_url()?, path)))
    }

    fn apply(&self, target: UploadTarget) -> UploadTarget {
        target
            .with_field_name(&self.field_name)
            .with_url_field(&self.url_field)
            .with_max_bytes(self.max_upload_mb.saturating_mul(1024 * 1024))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = EnvConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, None);
        assert_eq!(config.max_upload_mb, DEFAULT_MAX_UPLOAD_MB);
        assert_eq!(config.field_name, "file");
        assert_eq!(config.url_field, "cloudinaryUrl");
    }

    #[test]
    fn variables_override_defaults() {
        let config = EnvConfig::from_lookup(lookup_from(&[
            ("PIXUP_API_BASE_URL", "http://api.test/"),
            ("PIXUP_UPLOAD_MAX_MB", "12"),
            ("PIXUP_UPLOAD_FIELD", "attachment"),
            ("PIXUP_UPLOAD_URL_FIELD", "url"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://api.test/"));
        assert_eq!(config.max_upload_mb, 12);
        assert_eq!(config.field_name, "attachment");
        assert_eq!(config.url_field, "url");
    }

    #[test]
    fn blank_base_url_counts_as_unset() {
        let config =
            EnvConfig::from_lookup(lookup_from(&[("PIXUP_API_BASE_URL", "   ")])).unwrap();
        assert_eq!(config.base_url, None);
        assert!(config.require_base_url().is_err());
    }

    #[test]
    fn bad_size_values_are_rejected() {
        assert!(
            EnvConfig::from_lookup(lookup_from(&[("PIXUP_UPLOAD_MAX_MB", "five")])).is_err()
        );
        assert!(EnvConfig::from_lookup(lookup_from(&[("PIXUP_UPLOAD_MAX_MB", "0")])).is_err());
        assert!(EnvConfig::from_lookup(lookup_from(&[("PIXUP_UPLOAD_MAX_MB", "-1")])).is_err());
    }

    #[test]
    fn targets_are_composed_from_the_config() {
        let config = EnvConfig::from_lookup(lookup_from(&[
            ("PIXUP_API_BASE_URL", "http://api.test"),
            ("PIXUP_UPLOAD_MAX_MB", "2"),
            ("PIXUP_UPLOAD_URL_FIELD", "url"),
        ]))
        .unwrap();

        let target = config.image_target("upload/logo").unwrap();
        assert_eq!(target.endpoint_url(), "http://api.test/upload/logo");
        assert_eq!(target.max_bytes, 2 * 1024 * 1024);
        assert_eq!(target.url_field, "url");
        assert!(!target.accepts("application/pdf"));

        let document = config.document_target("upload/document").unwrap();
        assert!(document.accepts("application/pdf"));
        assert!(document.accepts("image/png"));
    }

    #[test]
    fn image_target_requires_a_base_url() {
        let config = EnvConfig::from_lookup(|_| None).unwrap();
        assert!(config.image_target("upload/logo").is_err());
    }
}
