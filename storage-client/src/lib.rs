//! Thin client over S3-compatible object storage
//!
//! [`StorageClient`] exposes bucket and object operations (create/delete
//! bucket, upload, delete, copy, presigned GET, listing) over one SDK handle.
//! Every call is forwarded to the service as-is: no retries, no pagination,
//! no caching. Service failures come back unchanged in
//! [`StorageError::Service`].
//!
//! ```no_run
//! use storage_client::StorageClient;
//!
//! # async fn run() -> Result<(), storage_client::StorageError> {
//! let client = StorageClient::new("us-east-2", "AKIA...", "secret", "")?;
//! let uploaded = client
//!     .upload_object("test", "test.txt", "test", "text/plain", "public, max-age=14400")
//!     .await?;
//! let presigned = client.presign_get_object("test", &uploaded.key).await?;
//! println!("{}", presigned.url);
//! # Ok(())
//! # }
//! ```

pub mod addressing;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
mod sdk;
pub mod upload;

pub use api::{ObjectStorageApi, PresignedUrl, PutObjectRequest};
pub use client::{StorageClient, PRESIGN_EXPIRY};
pub use config::{StorageConfig, MAX_UPLOAD_PARTS, MIN_PART_SIZE};
pub use error::{StorageError, StorageResult};
pub use upload::UploadOutput;

/// Re-export of the wrapped SDK, for callers using [`StorageClient::inner`]
pub use aws_sdk_s3;
