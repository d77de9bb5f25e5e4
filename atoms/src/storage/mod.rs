//! Object storage behind short-lived signed URLs.
//!
//! File bytes never pass through the API: callers get a URL scoped to one
//! object key and one method, and talk to the store directly.

pub mod memory;
pub mod s3;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AtomResult;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

/// Lifetimes of the URLs handed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlPolicy {
    pub upload_ttl: Duration,
    pub download_ttl: Duration,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            upload_ttl: Duration::from_secs(900),
            download_ttl: Duration::from_secs(300),
        }
    }
}

/// How a signed GET URL asks the browser to treat the object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment { file_name: String },
}

impl Disposition {
    pub fn header_value(&self) -> String {
        match self {
            Disposition::Inline => "inline".to_string(),
            Disposition::Attachment { file_name } => {
                format!("attachment; filename=\"{}\"", file_name.replace('"', ""))
            }
        }
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Signed PUT URL for `key`, only valid with the given `Content-Type`.
    async fn presign_upload(&self, key: &str, content_type: &str, ttl: Duration) -> AtomResult<String>;

    /// Signed GET URL for `key`.
    async fn presign_download(&self, key: &str, ttl: Duration, disposition: &Disposition) -> AtomResult<String>;

    /// Whether bytes have been stored under `key`.
    async fn object_exists(&self, key: &str) -> AtomResult<bool>;

    async fn delete_object(&self, key: &str) -> AtomResult<()>;

    /// Stable unsigned locator of the object. Not usable without a signature.
    fn object_url(&self, key: &str) -> String;
}
