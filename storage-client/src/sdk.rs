//! [`ObjectStorageApi`] backed by the AWS SDK client

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
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CompletedMultipartUpload, CompletedPart, CreateBucketConfiguration,
};
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::api::{ObjectStorageApi, PresignedUrl, PutObjectRequest};
use crate::error::{StorageError, StorageResult};

// Inherent `Client` methods shadow the trait methods of the same name, so
// every `self.<op>()` below returns the SDK's fluent builder.
#[async_trait]
impl ObjectStorageApi for Client {
    async fn create_bucket(
        &self,
        bucket: &str,
        location_constraint: Option<BucketLocationConstraint>,
    ) -> StorageResult<CreateBucketOutput> {
        let configuration = location_constraint.map(|constraint| {
            CreateBucketConfiguration::builder()
                .location_constraint(constraint)
                .build()
        });

        self.create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(configuration)
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn delete_bucket(&self, bucket: &str) -> StorageResult<DeleteBucketOutput> {
        self.delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<PutObjectOutput> {
        self.put_object()
            .bucket(request.bucket)
            .key(request.key)
            .body(ByteStream::from(request.body))
            .set_content_type(request.content_type)
            .set_cache_control(request.cache_control)
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
        cache_control: Option<String>,
    ) -> StorageResult<CreateMultipartUploadOutput> {
        self.create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .set_content_type(content_type)
            .set_cache_control(cache_control)
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> StorageResult<UploadPartOutput> {
        self.upload_part()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> StorageResult<CompleteMultipartUploadOutput> {
        let multipart = CompletedMultipartUpload::builder()
            .set_parts(Some(parts))
            .build();

        self.complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(multipart)
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> StorageResult<AbortMultipartUploadOutput> {
        self.abort_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<DeleteObjectOutput> {
        self.delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn copy_object(
        &self,
        bucket: &str,
        copy_source: &str,
        key: &str,
    ) -> StorageResult<CopyObjectOutput> {
        self.copy_object()
            .bucket(bucket)
            .copy_source(copy_source)
            .key(key)
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn presign_get_object(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl> {
        let presigning_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::configuration(format!("Invalid presign duration: {e}")))?;

        let presigned = self
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(StorageError::service)?;

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            headers: presigned
                .headers()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            expires_in,
        })
    }

    async fn list_buckets(&self) -> StorageResult<ListBucketsOutput> {
        self.list_buckets()
            .send()
            .await
            .map_err(StorageError::service)
    }

    async fn list_objects(&self, bucket: &str) -> StorageResult<ListObjectsOutput> {
        self.list_objects()
            .bucket(bucket)
            .send()
            .await
            .map_err(StorageError::service)
    }
}
