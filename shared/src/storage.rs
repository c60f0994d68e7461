use std::future::Future;

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};

use crate::error::StorageError;

/// An object fetched from storage. The body is released when this is dropped.
#[derive(Debug)]
pub struct StoredObject {
    pub body: ByteStream,
    pub cache_control: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

impl StoredObject {
    pub fn new(body: impl Into<ByteStream>) -> Self {
        Self {
            body: body.into(),
            cache_control: None,
            last_modified: None,
            etag: None,
        }
    }

    /// Drain the body into memory, consuming the stream
    pub async fn into_bytes(self) -> Result<(Vec<u8>, ObjectMetadata), StorageError> {
        let metadata = ObjectMetadata {
            cache_control: self.cache_control,
            last_modified: self.last_modified,
            etag: self.etag,
        };
        let bytes = self
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to read object body: {}", e)))?
            .into_bytes();
        Ok((bytes.to_vec(), metadata))
    }
}

/// Caching headers carried over from the source object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub cache_control: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

/// Read-only access to the image bucket
pub trait ObjectStore: Send + Sync {
    fn get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<StoredObject, StorageError>> + Send;
}

/// [`ObjectStore`] backed by S3
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(S3Client::new(config))
    }
}

impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify_get_error(e, bucket, key))?;

        Ok(StoredObject {
            cache_control: output.cache_control().map(str::to_string),
            last_modified: output.last_modified().and_then(to_chrono),
            etag: output.e_tag().map(str::to_string),
            body: output.body,
        })
    }
}

fn classify_get_error(err: SdkError<GetObjectError>, bucket: &str, key: &str) -> StorageError {
    let no_such_key = err
        .as_service_error()
        .map(GetObjectError::is_no_such_key)
        .unwrap_or(false);

    if no_such_key || is_not_found_code(err.code()) {
        return StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
    }

    StorageError::Backend(format!(
        "Failed to get object from S3: {}",
        DisplayErrorContext(&err)
    ))
}

/// S3 error codes that mean the object does not exist
pub fn is_not_found_code(code: Option<&str>) -> bool {
    matches!(code, Some("NoSuchKey") | Some("NoSuchBucket"))
}

fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}
