//! In-process object store issuing HMAC-signed `memory://` URLs.
//!
//! URLs look like `memory://{bucket}/{key}?method=PUT&expires=..&ct=..&sig=..`.
//! The signature covers method, key, expiry, content type and disposition,
//! so a URL can only be used the way it was issued.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{Disposition, ObjectStore};
use crate::error::{AtomError, AtomResult};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct MemoryObjectStore {
    bucket: String,
    secret: Vec<u8>,
    objects: RwLock<HashMap<String, StoredObject>>,
}

/// Components of a signed URL.
#[derive(Debug, Default, PartialEq, Eq)]
struct SignedUrl {
    key: String,
    method: String,
    expires: i64,
    content_type: String,
    disposition: String,
    signature: String,
}

impl SignedUrl {
    fn payload(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}",
            self.method, self.key, self.expires, self.content_type, self.disposition
        )
    }
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self::with_secret(bucket, uuid::Uuid::new_v4().as_bytes().to_vec())
    }

    pub fn with_secret(bucket: impl Into<String>, secret: Vec<u8>) -> Self {
        Self {
            bucket: bucket.into(),
            secret,
            objects: RwLock::new(HashMap::new()),
        }
    }

    fn mac(&self) -> AtomResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret).map_err(AtomError::storage)
    }

    fn sign(&self, mut url: SignedUrl, ttl: Duration) -> AtomResult<String> {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        url.expires = Utc::now().timestamp().saturating_add(ttl);

        let mut mac = self.mac()?;
        mac.update(url.payload().as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!(
            "memory://{}/{}?method={}&expires={}&ct={}&cd={}&sig={}",
            self.bucket,
            url.key,
            url.method,
            url.expires,
            URL_SAFE_NO_PAD.encode(url.content_type.as_bytes()),
            URL_SAFE_NO_PAD.encode(url.disposition.as_bytes()),
            signature
        ))
    }

    fn parse(&self, raw: &str) -> AtomResult<SignedUrl> {
        let invalid = || AtomError::storage("malformed signed URL");
        let decode = |value: &str| -> AtomResult<String> {
            let bytes = URL_SAFE_NO_PAD.decode(value).map_err(|_| invalid())?;
            String::from_utf8(bytes).map_err(|_| invalid())
        };

        let rest = raw.strip_prefix("memory://").ok_or_else(invalid)?;
        let (location, query) = rest.split_once('?').ok_or_else(invalid)?;
        let (bucket, key) = location.split_once('/').ok_or_else(invalid)?;
        if bucket != self.bucket {
            return Err(AtomError::storage(format!("unknown bucket {}", bucket)));
        }

        let mut url = SignedUrl {
            key: key.to_string(),
            ..SignedUrl::default()
        };
        for pair in query.split('&') {
            let (name, value) = pair.split_once('=').ok_or_else(invalid)?;
            match name {
                "method" => url.method = value.to_string(),
                "expires" => url.expires = value.parse().map_err(|_| invalid())?,
                "ct" => url.content_type = decode(value)?,
                "cd" => url.disposition = decode(value)?,
                "sig" => url.signature = value.to_string(),
                _ => return Err(invalid()),
            }
        }
        Ok(url)
    }

    /// Checks signature, method and expiry of a URL.
    fn verify(&self, raw: &str, method: &str) -> AtomResult<SignedUrl> {
        let url = self.parse(raw)?;

        let signature = URL_SAFE_NO_PAD
            .decode(&url.signature)
            .map_err(|_| AtomError::storage("malformed signature"))?;
        let mut mac = self.mac()?;
        mac.update(url.payload().as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AtomError::storage("signature mismatch"))?;

        if url.method != method {
            return Err(AtomError::storage(format!("URL was signed for {}", url.method)));
        }
        if Utc::now().timestamp() >= url.expires {
            return Err(AtomError::storage("signed URL expired"));
        }
        Ok(url)
    }

    /// Uploads through a signed PUT URL, the way a browser would.
    pub fn put(&self, url: &str, content_type: &str, bytes: Vec<u8>) -> AtomResult<()> {
        let url = self.verify(url, "PUT")?;
        if url.content_type != content_type {
            return Err(AtomError::storage(format!(
                "content type {} does not match signed {}",
                content_type, url.content_type
            )));
        }

        let mut objects = self.objects.write().map_err(|_| AtomError::storage("object store poisoned"))?;
        objects.insert(
            url.key,
            StoredObject {
                content_type: url.content_type,
                bytes,
            },
        );
        Ok(())
    }

    /// Downloads through a signed GET URL. Returns the content type and bytes.
    pub fn get(&self, url: &str) -> AtomResult<(String, Vec<u8>)> {
        let url = self.verify(url, "GET")?;
        let objects = self.objects.read().map_err(|_| AtomError::storage("object store poisoned"))?;
        objects
            .get(&url.key)
            .map(|o| (o.content_type.clone(), o.bytes.clone()))
            .ok_or_else(|| AtomError::storage(format!("no object at {}", url.key)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.read().map(|o| o.contains_key(key)).unwrap_or(false)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn presign_upload(&self, key: &str, content_type: &str, ttl: Duration) -> AtomResult<String> {
        self.sign(
            SignedUrl {
                key: key.to_string(),
                method: "PUT".to_string(),
                content_type: content_type.to_string(),
                ..SignedUrl::default()
            },
            ttl,
        )
    }

    async fn presign_download(&self, key: &str, ttl: Duration, disposition: &Disposition) -> AtomResult<String> {
        self.sign(
            SignedUrl {
                key: key.to_string(),
                method: "GET".to_string(),
                disposition: disposition.header_value(),
                ..SignedUrl::default()
            },
            ttl,
        )
    }

    async fn object_exists(&self, key: &str) -> AtomResult<bool> {
        let objects = self.objects.read().map_err(|_| AtomError::storage("object store poisoned"))?;
        Ok(objects.contains_key(key))
    }

    async fn delete_object(&self, key: &str) -> AtomResult<()> {
        let mut objects = self.objects.write().map_err(|_| AtomError::storage("object store poisoned"))?;
        objects.remove(key);
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("memory://{}/{}", self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "documents/u1/LICENSE/r1/license.pdf";

    fn store() -> MemoryObjectStore {
        MemoryObjectStore::with_secret("test-bucket", b"secret".to_vec())
    }

    fn minute() -> Duration {
        Duration::from_secs(60)
    }

    #[tokio::test]
    async fn put_then_get_returns_same_bytes() {
        let store = store();
        let put = store.presign_upload(KEY, "application/pdf", minute()).await.unwrap();
        store.put(&put, "application/pdf", b"%PDF-1.7".to_vec()).unwrap();

        let get = store.presign_download(KEY, minute(), &Disposition::Inline).await.unwrap();
        assert_eq!(
            store.get(&get).unwrap(),
            ("application/pdf".to_string(), b"%PDF-1.7".to_vec())
        );
    }

    #[tokio::test]
    async fn upload_url_is_bound_to_content_type() {
        let store = store();
        let put = store.presign_upload(KEY, "application/pdf", minute()).await.unwrap();
        let err = store.put(&put, "image/png", vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, AtomError::Storage(_)));
        assert!(!store.contains(KEY));
    }

    #[tokio::test]
    async fn urls_are_method_scoped() {
        let store = store();
        let put = store.presign_upload(KEY, "image/png", minute()).await.unwrap();
        store.put(&put, "image/png", vec![7]).unwrap();
        assert!(store.get(&put).is_err());

        let get = store.presign_download(KEY, minute(), &Disposition::Inline).await.unwrap();
        assert!(store.put(&get, "", vec![8]).is_err());
    }

    #[tokio::test]
    async fn tampered_key_is_rejected() {
        let store = store();
        let put = store.presign_upload(KEY, "image/png", minute()).await.unwrap();
        let forged = put.replace("/u1/", "/u2/");
        assert_eq!(
            store.put(&forged, "image/png", vec![1]).unwrap_err(),
            AtomError::storage("signature mismatch")
        );
    }

    #[tokio::test]
    async fn expired_url_is_rejected() {
        let store = store();
        let put = store.presign_upload(KEY, "image/png", Duration::ZERO).await.unwrap();
        assert_eq!(
            store.put(&put, "image/png", vec![1]).unwrap_err(),
            AtomError::storage("signed URL expired")
        );
    }

    #[tokio::test]
    async fn other_store_cannot_verify() {
        let put = store().presign_upload(KEY, "image/png", minute()).await.unwrap();
        let other = MemoryObjectStore::with_secret("test-bucket", b"different".to_vec());
        assert!(other.put(&put, "image/png", vec![1]).is_err());
    }

    #[tokio::test]
    async fn delete_removes_object() {
        let store = store();
        let put = store.presign_upload(KEY, "image/png", minute()).await.unwrap();
        store.put(&put, "image/png", vec![1]).unwrap();
        assert!(store.object_exists(KEY).await.unwrap());
        store.delete_object(KEY).await.unwrap();
        assert!(!store.contains(KEY));
        assert!(!store.object_exists(KEY).await.unwrap());
    }
}
