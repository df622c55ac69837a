//! Error types for the storage client

use thiserror::Error;

/// Storage client errors
///
/// Configuration problems are detected locally before any request is sent.
/// Everything the remote service reports is carried unchanged in
/// [`StorageError::Service`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Service error: {0}")]
    Service(#[source] Box<aws_sdk_s3::Error>),
}

impl StorageError {
    pub fn configuration(message: impl Into<String>) -> Self {
        StorageError::Configuration(message.into())
    }

    /// Wrap any SDK operation error, keeping the service's own classification.
    pub fn service<E>(err: E) -> Self
    where
        aws_sdk_s3::Error: From<E>,
    {
        StorageError::Service(Box::new(aws_sdk_s3::Error::from(err)))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, StorageError::Configuration(_))
    }

    /// The service error, if the failure came from the remote call
    pub fn service_error(&self) -> Option<&aws_sdk_s3::Error> {
        match self {
            StorageError::Service(err) => Some(err),
            StorageError::Configuration(_) => None,
        }
    }
}

impl From<aws_sdk_s3::Error> for StorageError {
    fn from(err: aws_sdk_s3::Error) -> Self {
        StorageError::Service(Box::new(err))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::types::error::NoSuchBucket;

    #[test]
    fn test_configuration_error() {
        let err = StorageError::configuration("region cannot be empty");
        assert!(err.is_configuration());
        assert!(err.service_error().is_none());
        assert_eq!(err.to_string(), "Configuration error: region cannot be empty");
    }

    #[test]
    fn test_service_error_is_kept_verbatim() {
        let sdk_err = aws_sdk_s3::Error::NoSuchBucket(
            NoSuchBucket::builder().message("bucket does not exist").build(),
        );
        let err = StorageError::from(sdk_err);

        assert!(!err.is_configuration());
        assert!(matches!(
            err.service_error(),
            Some(aws_sdk_s3::Error::NoSuchBucket(_))
        ));
    }
}
