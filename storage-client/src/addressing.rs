//! Object URL and copy-source construction

use aws_sdk_s3::config::endpoint::{DefaultResolver, Params, ResolveEndpoint};

use crate::error::{StorageError, StorageResult};

/// Percent-encode an object key, keeping `/` as the segment separator.
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// `CopySource` value for an object: `"{bucket}/{key}"`, both escaped.
pub fn copy_source(bucket: &str, key: &str) -> String {
    format!("{}/{}", urlencoding::encode(bucket), encode_key(key))
}

/// How objects are addressed on the configured service.
///
/// Object URLs come from the SDK's own endpoint rules, so they match the
/// host and path the requests are sent to (path style for IP endpoints and
/// for bucket names that are not valid host labels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAddressing {
    region: String,
    endpoint_url: Option<String>,
    force_path_style: bool,
}

impl ObjectAddressing {
    pub fn new(region: impl Into<String>, endpoint_url: Option<String>, force_path_style: bool) -> Self {
        Self {
            region: region.into(),
            endpoint_url,
            force_path_style,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Public URL of an object, as resolved by the SDK endpoint rules
    pub async fn object_url(&self, bucket: &str, key: &str) -> StorageResult<String> {
        let params = Params::builder()
            .bucket(bucket)
            .region(self.region.clone())
            .set_endpoint(self.endpoint_url.clone())
            .force_path_style(self.force_path_style)
            .build()
            .map_err(|e| StorageError::configuration(format!("Invalid endpoint parameters: {e}")))?;

        let endpoint = DefaultResolver::new()
            .resolve_endpoint(&params)
            .await
            .map_err(|e| {
                StorageError::configuration(format!("Cannot resolve endpoint for bucket {bucket}: {e}"))
            })?;

        Ok(format!(
            "{}/{}",
            endpoint.url().trim_end_matches('/'),
            encode_key(key)
        ))
    }
}
