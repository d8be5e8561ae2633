//! S3-based object storage implementation
//!
//! Targets AWS S3 or S3-compatible services (MinIO, R2) via an optional
//! custom endpoint with path-style addressing.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use super::error::ObjectStorageError;
use super::ObjectStorage;

/// S3-based object storage
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3 storage against the given bucket.
    pub async fn new(
        bucket: String,
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Result<Self, ObjectStorageError> {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = region {
            config_loader = config_loader.region(aws_sdk_s3::config::Region::new(region));
        }

        let config = config_loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&config);
        if let Some(endpoint_url) = endpoint {
            // Path-style addressing is required for most S3-compatible services
            s3_config = s3_config.endpoint_url(endpoint_url).force_path_style(true);
        }

        let client = Client::from_conf(s3_config.build());

        tracing::debug!(bucket = %bucket, "S3 storage initialized");

        Ok(Self { client, bucket })
    }

    /// Bucket this storage writes to
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), ObjectStorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| ObjectStorageError::Backend(format!("S3 put_object error: {}", e)))?;

        tracing::debug!(
            path = %path,
            size = data.len(),
            content_type,
            "Object stored in S3"
        );

        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, ObjectStorageError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    ObjectStorageError::NotFound {
                        path: path.to_string(),
                    }
                } else {
                    ObjectStorageError::Backend(format!("S3 get_object error: {}", service_err))
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| ObjectStorageError::Backend(format!("S3 body read error: {}", e)))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn exists(&self, path: &str) -> Result<bool, ObjectStorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(ObjectStorageError::Backend(format!(
                        "S3 head_object error: {}",
                        service_err
                    )))
                }
            }
        }
    }
}
