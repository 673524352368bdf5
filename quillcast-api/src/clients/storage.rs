//! Object storage client.
//!
//! The storage contract is a single operation: persist a blob under a
//! destination path and hand back its public URL. The production
//! implementation talks to an HTTP blob store (uploads are `PUT
//! <endpoint>/<path>` authenticated with an access-key header; objects are
//! then served from a public CDN base URL). Tests use [`MemoryStorage`].

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Error type for object storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Upload request failed to complete
    #[error("Upload failed: {0}")]
    Request(String),

    /// Store answered with a non-success status
    #[error("Upload rejected with status {0}")]
    Rejected(u16),
}

/// Object storage: `store(blob, destination_path) -> url`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` under `path` and returns the public URL of the stored
    /// object.
    async fn store(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError>;
}

/// HTTP blob store client.
pub struct HttpBlobStorage {
    client: Client,
    endpoint: String,
    access_key: String,
    public_url: String,
}

impl HttpBlobStorage {
    /// Creates a storage client for the given endpoint.
    ///
    /// `endpoint` receives uploads; `public_url` is the base under which
    /// uploaded objects are served. Trailing slashes on either are
    /// tolerated.
    pub fn new(client: Client, endpoint: &str, access_key: &str, public_url: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpBlobStorage {
    async fn store(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        let upload_url = format!("{}/{}", self.endpoint, path);
        debug!(path, size = bytes.len(), "Uploading object");

        let response = self
            .client
            .put(&upload_url)
            .header("AccessKey", &self.access_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Rejected(response.status().as_u16()));
        }

        Ok(format!("{}/{}", self.public_url, path))
    }
}

/// In-memory storage for tests: remembers every stored object and returns
/// deterministic URLs.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, (String, Bytes)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects stored so far.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the stored bytes for `path`, if any.
    pub fn get(&self, path: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(_, bytes)| bytes.clone())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn store(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (content_type.to_string(), bytes));
        Ok(format!("memory://{path}"))
    }
}

/// Builds an object key for an uploaded file: the field-name namespace, a
/// timestamp, and the sanitized original filename.
pub fn object_key(folder: &str, file_name: &str, timestamp_millis: i64) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("courses/class/{folder}/{timestamp_millis}_{sanitized}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_storage_returns_a_url_and_keeps_the_bytes() {
        let storage = MemoryStorage::new();
        let url = storage
            .store("courses/class/documentUrl/1_a.pdf", "application/pdf", Bytes::from_static(b"%PDF"))
            .await
            .unwrap();

        assert_eq!(url, "memory://courses/class/documentUrl/1_a.pdf");
        assert_eq!(storage.len(), 1);
        assert_eq!(
            storage.get("courses/class/documentUrl/1_a.pdf").unwrap(),
            Bytes::from_static(b"%PDF")
        );
    }

    #[test]
    fn object_key_namespaces_by_field_and_sanitizes_the_name() {
        let key = object_key("documentUrl", "my draft (v2).pdf", 1700000000000);
        assert_eq!(
            key,
            "courses/class/documentUrl/1700000000000_my_draft__v2_.pdf"
        );
    }

    #[test]
    fn object_key_keeps_safe_characters() {
        let key = object_key("profileUrl", "photo-1_final.png", 42);
        assert_eq!(key, "courses/class/profileUrl/42_photo-1_final.png");
    }
}
