//! Object-storage client façade
//!
//! [`StorageClient`] holds one service handle and forwards every call to it.
//! Errors from the service are returned unchanged; nothing is retried.

use std::time::Duration;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::operation::copy_object::CopyObjectOutput;
use aws_sdk_s3::operation::create_bucket::CreateBucketOutput;
use aws_sdk_s3::operation::delete_bucket::DeleteBucketOutput;
use aws_sdk_s3::operation::delete_object::DeleteObjectOutput;
use aws_sdk_s3::operation::list_buckets::ListBucketsOutput;
use aws_sdk_s3::operation::list_objects::ListObjectsOutput;
use aws_sdk_s3::types::BucketLocationConstraint;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::{debug, info};

use crate::addressing::{self, ObjectAddressing};
use crate::api::{ObjectStorageApi, PresignedUrl};
use crate::config::StorageConfig;
use crate::error::StorageResult;
use crate::upload::{UploadOutput, Uploader};

/// Lifetime of presigned GET URLs
pub const PRESIGN_EXPIRY: Duration = Duration::from_secs(15 * 60);

/// Region in which buckets are created without a location constraint
const DEFAULT_BUCKET_REGION: &str = "us-east-1";

const CREDENTIALS_PROVIDER: &str = "storage-client-static";

/// Client for bucket and object operations
#[derive(Clone)]
pub struct StorageClient<A = Client> {
    api: A,
    addressing: ObjectAddressing,
    part_size: u64,
}

impl StorageClient<Client> {
    /// Create a client from static credentials.
    ///
    /// `session_token` may be empty. No request is sent and no environment
    /// or shared config file is read.
    pub fn new(
        region: &str,
        access_key: &str,
        secret_key: &str,
        session_token: &str,
    ) -> StorageResult<Self> {
        Self::from_config(StorageConfig::new(
            region,
            access_key,
            secret_key,
            session_token,
        ))
    }

    /// Create a client from a prepared configuration
    pub fn from_config(config: StorageConfig) -> StorageResult<Self> {
        config.validate()?;

        let api = Client::from_conf(sdk_config(&config).build());
        let endpoint = config.endpoint_url.clone();
        let client = Self::assemble(config, api);

        info!(
            region = %client.region(),
            endpoint = ?endpoint,
            "Storage client initialized"
        );
        Ok(client)
    }
}

/// SDK configuration for a validated [`StorageConfig`]: static credentials,
/// no ambient lookup.
pub(crate) fn sdk_config(config: &StorageConfig) -> aws_sdk_s3::config::Builder {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        config.session_token(),
        None,
        CREDENTIALS_PROVIDER,
    );

    let mut builder = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .force_path_style(config.force_path_style);
    if let Some(endpoint) = &config.endpoint_url {
        builder = builder.endpoint_url(endpoint);
    }
    builder
}

impl<A> StorageClient<A>
where
    A: ObjectStorageApi,
{
    /// Wrap an existing [`ObjectStorageApi`] implementation.
    ///
    /// The configuration is validated exactly as in [`StorageClient::from_config`];
    /// only its addressing and upload settings are used.
    pub fn with_api(config: StorageConfig, api: A) -> StorageResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, api))
    }

    /// Expects `config` to be validated already.
    fn assemble(config: StorageConfig, api: A) -> Self {
        Self {
            api,
            addressing: ObjectAddressing::new(
                config.region,
                config.endpoint_url,
                config.force_path_style,
            ),
            part_size: config.part_size_bytes,
        }
    }

    /// Underlying service handle, for calls this client does not wrap
    pub fn inner(&self) -> &A {
        &self.api
    }

    pub fn region(&self) -> &str {
        self.addressing.region()
    }

    pub async fn create_bucket(&self, bucket: &str) -> StorageResult<CreateBucketOutput> {
        debug!("Creating bucket: {}", bucket);
        self.api
            .create_bucket(bucket, self.location_constraint())
            .await
    }

    pub async fn delete_bucket(&self, bucket: &str) -> StorageResult<DeleteBucketOutput> {
        debug!("Deleting bucket: {}", bucket);
        self.api.delete_bucket(bucket).await
    }

    /// Upload an object, switching to a multipart upload for large bodies.
    ///
    /// Empty `content_type` or `cache_control` values are not sent.
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        content_type: &str,
        cache_control: &str,
    ) -> StorageResult<UploadOutput> {
        let body = body.into();
        debug!("Uploading object: {}/{} ({} bytes)", bucket, key, body.len());

        Uploader::new(&self.api, &self.addressing, self.part_size)
            .upload(
                bucket,
                key,
                body,
                non_empty(content_type),
                non_empty(cache_control),
            )
            .await
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<DeleteObjectOutput> {
        debug!("Deleting object: {}/{}", bucket, key);
        self.api.delete_object(bucket, key).await
    }

    /// Copy `key` from `source_bucket` into `destination_bucket` under the same key
    pub async fn copy_object(
        &self,
        source_bucket: &str,
        key: &str,
        destination_bucket: &str,
    ) -> StorageResult<CopyObjectOutput> {
        let copy_source = addressing::copy_source(source_bucket, key);
        debug!(
            "Copying object: {} -> {}/{}",
            copy_source, destination_bucket, key
        );
        self.api
            .copy_object(destination_bucket, &copy_source, key)
            .await
    }

    /// Presigned GET request valid for [`PRESIGN_EXPIRY`]
    pub async fn presign_get_object(&self, bucket: &str, key: &str) -> StorageResult<PresignedUrl> {
        debug!("Presigning GET for object: {}/{}", bucket, key);
        self.api
            .presign_get_object(bucket, key, PRESIGN_EXPIRY)
            .await
    }

    /// Buckets owned by the caller (first page only)
    pub async fn list_buckets(&self) -> StorageResult<ListBucketsOutput> {
        debug!("Listing buckets");
        self.api.list_buckets().await
    }

    /// Objects in `bucket` (first page only)
    pub async fn list_objects(&self, bucket: &str) -> StorageResult<ListObjectsOutput> {
        debug!("Listing objects in bucket: {}", bucket);
        self.api.list_objects(bucket).await
    }

    fn location_constraint(&self) -> Option<BucketLocationConstraint> {
        let region = self.addressing.region();
        (region != DEFAULT_BUCKET_REGION).then(|| BucketLocationConstraint::from(region))
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
