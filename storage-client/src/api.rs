//! Capability interface over the object-storage service
//!
//! [`ObjectStorageApi`] is the narrow set of remote calls the client needs.
//! The production implementation forwards to [`aws_sdk_s3::Client`]; tests
//! substitute the generated `MockObjectStorageApi`.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::operation::abort_multipart_upload::AbortMultipartUploadOutput;
use aws_sdk_s3::operation::complete_multipart_upload::CompleteMultipartUploadOutput;
use aws_sdk_s3::operation::copy_object::CopyObjectOutput;
use aws_sdk_s3::operation::create_bucket::CreateBucketOutput;
use aws_sdk_s3::operation::create_multipart_upload::CreateMultipartUploadOutput;
use aws_sdk_s3::operation::delete_bucket::DeleteBucketOutput;
use aws_sdk_s3::operation::delete_object::DeleteObjectOutput;
use aws_sdk_s3::operation::list_buckets::ListBucketsOutput;
use aws_sdk_s3::operation::list_objects::ListObjectsOutput;
use aws_sdk_s3::operation::put_object::PutObjectOutput;
use aws_sdk_s3::operation::upload_part::UploadPartOutput;
use aws_sdk_s3::types::{BucketLocationConstraint, CompletedPart};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;

/// Single-request object upload
#[derive(Debug, Clone, PartialEq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
}

/// Presigned request produced by the service's signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUrl {
    pub url: String,
    pub method: String,
    /// Headers the caller must send along with the request
    pub headers: Vec<(String, String)>,
    #[serde(with = "duration_secs")]
    pub expires_in: Duration,
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorageApi: Send + Sync {
    async fn create_bucket(
        &self,
        bucket: &str,
        location_constraint: Option<BucketLocationConstraint>,
    ) -> StorageResult<CreateBucketOutput>;

    async fn delete_bucket(&self, bucket: &str) -> StorageResult<DeleteBucketOutput>;

    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<PutObjectOutput>;

    async fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
        cache_control: Option<String>,
    ) -> StorageResult<CreateMultipartUploadOutput>;

    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> StorageResult<UploadPartOutput>;

    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> StorageResult<CompleteMultipartUploadOutput>;

    async fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> StorageResult<AbortMultipartUploadOutput>;

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<DeleteObjectOutput>;

    /// `copy_source` is the already escaped `"{bucket}/{key}"` of the source object.
    async fn copy_object(
        &self,
        bucket: &str,
        copy_source: &str,
        key: &str,
    ) -> StorageResult<CopyObjectOutput>;

    async fn presign_get_object(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl>;

    async fn list_buckets(&self) -> StorageResult<ListBucketsOutput>;

    async fn list_objects(&self, bucket: &str) -> StorageResult<ListObjectsOutput>;
}
