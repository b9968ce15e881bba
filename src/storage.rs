//! Object storage boundary: S3 in production, in-memory for tests and
//! dry runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use sha2::{Digest, Sha256};

use crate::error::{ExtractError, Result};

/// Acknowledgment of a successful write.
#[derive(Debug, Clone)]
pub struct PutReceipt {
    /// Content-derived checksum reported by the store (S3 ETag or
    /// equivalent digest). Used to derive the deterministic document id.
    pub checksum: String,
}

/// Durable key-value object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the full body of an object.
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;

    /// Write an object and return the store's content checksum.
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> Result<PutReceipt>;

    /// Stable URL of an object under this store.
    fn object_url(&self, key: &str) -> String;
}

/// S3-backed store. The bucket is fixed at construction; keys are paths
/// within it.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let obj = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| ExtractError::Fetch {
                key: key.to_string(),
                reason: format!("{}", DisplayErrorContext(e)),
            })?;
        let data = obj.body.collect().await.map_err(|e| ExtractError::Fetch {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(data.into_bytes().to_vec())
    }

    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> Result<PutReceipt> {
        let length = body.len() as i64;
        let ack = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .content_length(length)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| ExtractError::StorageWrite {
                key: key.to_string(),
                reason: format!("{}", DisplayErrorContext(e)),
            })?;
        let checksum = ack
            .e_tag()
            .map(str::to_string)
            .ok_or_else(|| ExtractError::StorageWrite {
                key: key.to_string(),
                reason: "write acknowledgment carried no checksum".into(),
            })?;
        Ok(PutReceipt { checksum })
    }

    fn object_url(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

/// In-memory store. Answers a SHA-256 hex digest as its checksum, so
/// identical content yields identical receipts just like S3 ETags do.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, StoredObject>>,
}

struct StoredObject {
    body: Bytes,
    content_type: String,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing the trait. Used to stage the
    /// raw incoming message in tests.
    pub fn insert(&self, key: &str, body: impl Into<Bytes>, content_type: &str) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body: body.into(),
                content_type: content_type.to_string(),
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.body.to_vec())
            .ok_or_else(|| ExtractError::Fetch {
                key: key.to_string(),
                reason: "object not found".into(),
            })
    }

    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> Result<PutReceipt> {
        let mut hasher = Sha256::new();
        hasher.update(&body);
        let checksum = format!("{:x}", hasher.finalize());
        self.insert(key, body, content_type);
        Ok(PutReceipt { checksum })
    }

    fn object_url(&self, key: &str) -> String {
        format!("mem://{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_put_then_get_roundtrips() {
        let store = MemoryObjectStore::new();
        store
            .put_object("a/b.txt", Bytes::from_static(b"hello"), "text/plain")
            .await
            .unwrap();
        let body = store.get_object("a/b.txt").await.unwrap();
        assert_eq!(body, b"hello");
        assert_eq!(
            store.content_type_of("a/b.txt").as_deref(),
            Some("text/plain")
        );
    }

    #[tokio::test]
    async fn memory_checksum_tracks_content_only() {
        let store = MemoryObjectStore::new();
        let first = store
            .put_object("x", Bytes::from_static(b"same bytes"), "text/plain")
            .await
            .unwrap();
        let second = store
            .put_object("y", Bytes::from_static(b"same bytes"), "application/pdf")
            .await
            .unwrap();
        let other = store
            .put_object("z", Bytes::from_static(b"different"), "text/plain")
            .await
            .unwrap();
        assert_eq!(first.checksum, second.checksum);
        assert_ne!(first.checksum, other.checksum);
    }

    #[tokio::test]
    async fn memory_get_missing_is_fetch_error() {
        let store = MemoryObjectStore::new();
        let err = store.get_object("nope").await.unwrap_err();
        assert!(matches!(err, ExtractError::Fetch { .. }));
    }

    #[tokio::test]
    async fn memory_overwrite_replaces_body() {
        let store = MemoryObjectStore::new();
        store
            .put_object("k", Bytes::from_static(b"one"), "text/plain")
            .await
            .unwrap();
        store
            .put_object("k", Bytes::from_static(b"two"), "text/plain")
            .await
            .unwrap();
        assert_eq!(store.get_object("k").await.unwrap(), b"two");
        assert_eq!(store.object_count(), 1);
    }

    #[test]
    fn memory_url_scheme() {
        let store = MemoryObjectStore::new();
        assert_eq!(store.object_url("a/b"), "mem://a/b");
    }
}
