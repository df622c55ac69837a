//! Managed object upload
//!
//! Payloads that fit in one part go out as a single `PutObject`. Larger
//! payloads are split into parts and sent sequentially through the
//! multipart API; any failure after the upload was created aborts it so no
//! orphaned parts are left behind.

use aws_sdk_s3::types::CompletedPart;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::addressing::ObjectAddressing;
use crate::api::{ObjectStorageApi, PutObjectRequest};
use crate::config::MAX_UPLOAD_PARTS;
use crate::error::{StorageError, StorageResult};

/// Result of a managed upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutput {
    /// Object URL from the SDK endpoint rules, the same on both upload paths
    pub location: String,
    pub bucket: String,
    pub key: String,
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
    /// Set only when the multipart path was taken
    pub upload_id: Option<String>,
}

/// Part size actually used for a payload of `total` bytes.
///
/// Grows past the configured size when the payload would otherwise need
/// more than [`MAX_UPLOAD_PARTS`] parts.
pub fn effective_part_size(total: u64, part_size: u64) -> u64 {
    total.div_ceil(MAX_UPLOAD_PARTS).max(part_size)
}

pub struct Uploader<'a, A: ?Sized> {
    api: &'a A,
    addressing: &'a ObjectAddressing,
    part_size: u64,
}

impl<'a, A> Uploader<'a, A>
where
    A: ObjectStorageApi + ?Sized,
{
    pub fn new(api: &'a A, addressing: &'a ObjectAddressing, part_size: u64) -> Self {
        Self {
            api,
            addressing,
            part_size,
        }
    }

    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<String>,
        cache_control: Option<String>,
    ) -> StorageResult<UploadOutput> {
        // Resolved before anything is sent; a bucket the endpoint rules
        // reject never reaches the service.
        let location = self.addressing.object_url(bucket, key).await?;

        let total = body.len() as u64;
        if total <= self.part_size {
            return self
                .put_single(bucket, key, body, content_type, cache_control, location)
                .await;
        }

        let part_size = effective_part_size(total, self.part_size);
        debug!(
            bucket = %bucket,
            key = %key,
            bytes = total,
            part_size,
            "Starting multipart upload"
        );

        let created = self
            .api
            .create_multipart_upload(bucket, key, content_type, cache_control)
            .await?;
        // An empty id is rejected by the first UploadPart call.
        let upload_id = created.upload_id.unwrap_or_default();

        let mut parts = Vec::new();
        let mut offset = 0u64;
        let mut part_number = 1i32;
        while offset < total {
            let end = (offset + part_size).min(total);
            let chunk = body.slice(offset as usize..end as usize);

            match self
                .api
                .upload_part(bucket, key, &upload_id, part_number, chunk)
                .await
            {
                Ok(output) => {
                    debug!(key = %key, part_number, bytes = end - offset, "Uploaded part");
                    parts.push(
                        CompletedPart::builder()
                            .set_e_tag(output.e_tag)
                            .part_number(part_number)
                            .build(),
                    );
                }
                Err(err) => return Err(self.abort(bucket, key, &upload_id, err).await),
            }

            offset = end;
            part_number += 1;
        }

        let part_count = parts.len();
        let completed = match self
            .api
            .complete_multipart_upload(bucket, key, &upload_id, parts)
            .await
        {
            Ok(output) => output,
            Err(err) => return Err(self.abort(bucket, key, &upload_id, err).await),
        };

        info!(
            bucket = %bucket,
            key = %key,
            bytes = total,
            parts = part_count,
            "Multipart upload completed"
        );

        Ok(UploadOutput {
            location,
            bucket: bucket.to_string(),
            key: completed.key.unwrap_or_else(|| key.to_string()),
            e_tag: completed.e_tag,
            version_id: completed.version_id,
            upload_id: Some(upload_id),
        })
    }

    async fn put_single(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<String>,
        cache_control: Option<String>,
        location: String,
    ) -> StorageResult<UploadOutput> {
        let bytes = body.len();
        let output = self
            .api
            .put_object(PutObjectRequest {
                bucket: bucket.to_string(),
                key: key.to_string(),
                body,
                content_type,
                cache_control,
            })
            .await?;

        info!(bucket = %bucket, key = %key, bytes, "Object uploaded");

        Ok(UploadOutput {
            location,
            bucket: bucket.to_string(),
            key: key.to_string(),
            e_tag: output.e_tag,
            version_id: output.version_id,
            upload_id: None,
        })
    }

    /// Abort the upload and hand back the error that caused it.
    async fn abort(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        cause: StorageError,
    ) -> StorageError {
        if let Err(abort_err) = self.api.abort_multipart_upload(bucket, key, upload_id).await {
            warn!(
                bucket = %bucket,
                key = %key,
                upload_id = %upload_id,
                error = %abort_err,
                "Failed to abort multipart upload"
            );
        }
        cause
    }
}
