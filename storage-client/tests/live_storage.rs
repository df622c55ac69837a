//! End-to-end run against a real S3-compatible endpoint.
//!
//! Ignored by default. Configure through `STORAGE_*` variables (or a `.env`
//! file) and pick the bucket with `STORAGE_TEST_BUCKET`, then run
//! `cargo test -p storage-client --test live_storage -- --ignored`.

use anyhow::{Context, Result};
use shared::observability::init_test_logging;
use storage_client::{StorageClient, StorageConfig};

fn live_client() -> Result<(StorageClient, String)> {
    init_test_logging();

    let config = StorageConfig::from_env().context("Failed to load storage config")?;
    let client = StorageClient::from_config(config).context("Failed to build storage client")?;
    let bucket = std::env::var("STORAGE_TEST_BUCKET").unwrap_or_else(|_| "test".to_string());
    Ok((client, bucket))
}

fn object_keys(output: &storage_client::aws_sdk_s3::operation::list_objects::ListObjectsOutput) -> Vec<&str> {
    output.contents().iter().filter_map(|object| object.key()).collect()
}

#[tokio::test]
#[ignore = "requires a live object storage endpoint"]
async fn upload_presign_list_delete_round() -> Result<()> {
    let (client, bucket) = live_client()?;
    let key = "test.txt";

    let uploaded = client
        .upload_object(&bucket, key, "test", "text/plain", "public, max-age=14400")
        .await
        .context("upload failed")?;
    assert_eq!(uploaded.key, key);
    tracing::info!(location = %uploaded.location, "Uploaded test object");

    let presigned = client
        .presign_get_object(&bucket, &uploaded.key)
        .await
        .context("presign failed")?;
    assert!(presigned.url.contains(&bucket));
    assert!(presigned.url.contains(key));

    let buckets = client.list_buckets().await.context("list buckets failed")?;
    assert!(buckets.buckets().iter().any(|b| b.name() == Some(bucket.as_str())));

    let listed = client.list_objects(&bucket).await.context("list objects failed")?;
    assert!(object_keys(&listed).contains(&key));

    client
        .delete_object(&bucket, key)
        .await
        .context("delete failed")?;

    let listed = client.list_objects(&bucket).await.context("list objects failed")?;
    assert!(!object_keys(&listed).contains(&key));

    Ok(())
}

#[tokio::test]
#[ignore = "requires a live object storage endpoint"]
async fn copy_between_buckets() -> Result<()> {
    let (client, bucket) = live_client()?;
    let destination = format!("{bucket}-copy");
    let key = "copy-source.txt";

    client.create_bucket(&destination).await.context("create bucket failed")?;
    client
        .upload_object(&bucket, key, "copy me", "text/plain", "")
        .await
        .context("upload failed")?;

    client
        .copy_object(&bucket, key, &destination)
        .await
        .context("copy failed")?;

    let listed = client.list_objects(&destination).await.context("list objects failed")?;
    assert!(object_keys(&listed).contains(&key));

    client.delete_object(&destination, key).await?;
    client.delete_object(&bucket, key).await?;
    client.delete_bucket(&destination).await.context("delete bucket failed")?;

    Ok(())
}
