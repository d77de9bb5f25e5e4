use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client as S3Client;

use super::{Disposition, ObjectStore};
use crate::error::{AtomError, AtomResult};

/// S3 bucket accessed through presigned requests.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

fn presigning(ttl: Duration) -> AtomResult<PresigningConfig> {
    PresigningConfig::expires_in(ttl).map_err(|e| AtomError::storage(format!("Invalid presign expiry: {}", e)))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presign_upload(&self, key: &str, content_type: &str, ttl: Duration) -> AtomResult<String> {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning(ttl)?)
            .await
            .map_err(|e| AtomError::storage(format!("S3 presign put error: {}", e)))?;

        tracing::debug!(key, "🔏 presigned upload");
        Ok(request.uri().to_string())
    }

    async fn presign_download(&self, key: &str, ttl: Duration, disposition: &Disposition) -> AtomResult<String> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition(disposition.header_value())
            .presigned(presigning(ttl)?)
            .await
            .map_err(|e| AtomError::storage(format!("S3 presign get error: {}", e)))?;

        Ok(request.uri().to_string())
    }

    async fn object_exists(&self, key: &str) -> AtomResult<bool> {
        match self.client.head_object().bucket(&self.bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().map(|se| se.is_not_found()).unwrap_or(false) => Ok(false),
            Err(e) => Err(AtomError::storage(format!("S3 head_object error: {}", e))),
        }
    }

    async fn delete_object(&self, key: &str) -> AtomResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AtomError::storage(format!("S3 delete_object error: {}", e)))?;
        tracing::info!(key, "🗑️ object deleted");
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)
    }
}
