//! Storage client configuration
//!
//! [`StorageConfig`] is an explicit value object: it is built once by the
//! caller and handed to the client at construction. Nothing here reads or
//! writes process-wide state except the opt-in [`StorageConfig::from_env`].

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{StorageError, StorageResult};

/// Smallest part size the service accepts for every part but the last.
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Service limit on the number of parts in one multipart upload.
pub const MAX_UPLOAD_PARTS: u64 = 10_000;

/// Static credentials plus addressing for an S3-compatible service.
///
/// The secret key and session token are read when deserializing but never
/// written out; a serialized config has to be given its secret again.
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub region: String,
    pub access_key_id: String,
    #[serde(default, skip_serializing)]
    pub secret_access_key: String,
    #[serde(default, skip_serializing)]
    pub session_token: String,
    /// Custom endpoint (MinIO, LocalStack, ...). `None` targets AWS.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
    #[serde(default = "default_part_size")]
    pub part_size_bytes: u64,
}

fn default_part_size() -> u64 {
    MIN_PART_SIZE
}

impl StorageConfig {
    pub fn new(
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
            endpoint_url: None,
            force_path_style: false,
            part_size_bytes: MIN_PART_SIZE,
        }
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn with_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    pub fn with_part_size(mut self, part_size_bytes: u64) -> Self {
        self.part_size_bytes = part_size_bytes;
        self
    }

    /// Load configuration from environment variables, reading `.env` first if present
    pub fn from_env() -> StorageResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Missing required values are left empty so that [`StorageConfig::validate`]
    /// reports them with the same messages as direct construction.
    pub fn from_lookup<F>(lookup: F) -> StorageResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let force_path_style = match lookup("STORAGE_FORCE_PATH_STYLE") {
            Some(value) => value.trim().parse::<bool>().map_err(|_| {
                StorageError::configuration(format!(
                    "Invalid STORAGE_FORCE_PATH_STYLE: {value}"
                ))
            })?,
            None => false,
        };

        let part_size_bytes = match lookup("STORAGE_UPLOAD_PART_SIZE") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                StorageError::configuration(format!(
                    "Invalid STORAGE_UPLOAD_PART_SIZE: {value}"
                ))
            })?,
            None => MIN_PART_SIZE,
        };

        Ok(Self {
            region: lookup("STORAGE_REGION").unwrap_or_default(),
            access_key_id: lookup("STORAGE_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: lookup("STORAGE_SECRET_ACCESS_KEY").unwrap_or_default(),
            session_token: lookup("STORAGE_SESSION_TOKEN").unwrap_or_default(),
            endpoint_url: lookup("STORAGE_ENDPOINT_URL").filter(|url| !url.trim().is_empty()),
            force_path_style,
            part_size_bytes,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> StorageResult<()> {
        if self.region.trim().is_empty() {
            return Err(StorageError::configuration("region cannot be empty"));
        }
        if self.access_key_id.trim().is_empty() {
            return Err(StorageError::configuration("access key cannot be empty"));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(StorageError::configuration("secret key cannot be empty"));
        }
        if !self
            .region
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(StorageError::configuration(format!(
                "invalid region: {}",
                self.region
            )));
        }
        if let Some(endpoint) = &self.endpoint_url {
            let parsed = Url::parse(endpoint).map_err(|e| {
                StorageError::configuration(format!("invalid endpoint url {endpoint}: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
                return Err(StorageError::configuration(format!(
                    "endpoint url must be an absolute http(s) url: {endpoint}"
                )));
            }
        }
        if self.part_size_bytes < MIN_PART_SIZE {
            return Err(StorageError::configuration(format!(
                "part size {} is below the minimum of {} bytes",
                self.part_size_bytes, MIN_PART_SIZE
            )));
        }
        Ok(())
    }

    /// Session token, or `None` when it was left empty
    pub fn session_token(&self) -> Option<String> {
        let token = self.session_token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &if self.session_token.is_empty() {
                    "<none>"
                } else {
                    "** redacted **"
                },
            )
            .field("endpoint_url", &self.endpoint_url)
            .field("force_path_style", &self.force_path_style)
            .field("part_size_bytes", &self.part_size_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn valid_config() -> StorageConfig {
        StorageConfig::new("us-east-2", "AKIAEXAMPLE", "secret", "")
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_required_fields_rejected() {
        let cases = [
            StorageConfig::new("", "AKIAEXAMPLE", "secret", "token"),
            StorageConfig::new("us-east-2", "", "secret", "token"),
            StorageConfig::new("us-east-2", "AKIAEXAMPLE", "", "token"),
            StorageConfig::new("   ", "AKIAEXAMPLE", "secret", "token"),
        ];
        for config in cases {
            let err = config.validate().unwrap_err();
            assert!(err.is_configuration(), "unexpected error: {err}");
        }
    }

    #[test]
    fn test_empty_session_token_is_none() {
        assert_eq!(valid_config().session_token(), None);
        let config = StorageConfig::new("us-east-2", "AKIAEXAMPLE", "secret", "token");
        assert_eq!(config.session_token(), Some("token".to_string()));
    }

    #[test]
    fn test_invalid_region_rejected() {
        let config = StorageConfig::new("us east/2", "AKIAEXAMPLE", "secret", "");
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: invalid region: us east/2");
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(valid_config()
            .with_endpoint("http://localhost:9000")
            .validate()
            .is_ok());
        assert!(valid_config()
            .with_endpoint("localhost:9000")
            .validate()
            .is_err());
        assert!(valid_config()
            .with_endpoint("ftp://storage.local")
            .validate()
            .is_err());
    }

    #[test]
    fn test_part_size_minimum() {
        let err = valid_config().with_part_size(1024).validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(valid_config()
            .with_part_size(8 * 1024 * 1024)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let config = StorageConfig::from_lookup(lookup_from(&[
            ("STORAGE_REGION", "eu-west-1"),
            ("STORAGE_ACCESS_KEY_ID", "minioadmin"),
            ("STORAGE_SECRET_ACCESS_KEY", "minioadmin"),
            ("STORAGE_ENDPOINT_URL", "http://localhost:9000"),
            ("STORAGE_FORCE_PATH_STYLE", "true"),
        ]))
        .unwrap();

        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert!(config.force_path_style);
        assert_eq!(config.part_size_bytes, MIN_PART_SIZE);
        assert_eq!(config.session_token(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_missing_values_fail_validation() {
        let config = StorageConfig::from_lookup(lookup_from(&[("STORAGE_REGION", "eu-west-1")]))
            .unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: access key cannot be empty");
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = StorageConfig::from_lookup(lookup_from(&[("STORAGE_FORCE_PATH_STYLE", "yes")]))
            .unwrap_err();
        assert!(err.is_configuration());

        let err = StorageConfig::from_lookup(lookup_from(&[("STORAGE_UPLOAD_PART_SIZE", "5MB")]))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: StorageConfig = serde_json::from_str(
            r#"{"region":"us-east-2","access_key_id":"AKIAEXAMPLE","secret_access_key":"secret"}"#,
        )
        .unwrap();

        assert_eq!(config.session_token, "");
        assert_eq!(config.endpoint_url, None);
        assert!(!config.force_path_style);
        assert_eq!(config.part_size_bytes, MIN_PART_SIZE);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = StorageConfig::new("us-east-2", "AKIAEXAMPLE", "topsecret", "sessiontoken");
        let debug = format!("{config:?}");
        assert!(debug.contains("AKIAEXAMPLE"));
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("sessiontoken"));
    }

    #[test]
    fn test_serialize_omits_secrets() {
        let config = StorageConfig::new("us-east-2", "AKIAEXAMPLE", "topsecret", "sessiontoken")
            .with_endpoint("http://localhost:9000");
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["access_key_id"], "AKIAEXAMPLE");
        assert_eq!(json["endpoint_url"], "http://localhost:9000");
        assert!(json.get("secret_access_key").is_none());
        assert!(json.get("session_token").is_none());

        let restored: StorageConfig = serde_json::from_value(json).unwrap();
        assert_eq!(restored.secret_access_key, "");
        assert!(restored.validate().unwrap_err().is_configuration());
    }
}
