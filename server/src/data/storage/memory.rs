//! In-memory object storage
//!
//! Backs archive tests without touching a real object store; also records
//! the content type of each upload so tests can assert on it.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::ObjectStorageError;
use super::ObjectStorage;

/// In-memory object storage backend
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Content type recorded for a stored object
    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), ObjectStorageError> {
        self.objects.lock().unwrap().insert(
            path.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, ObjectStorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|o| o.data.clone())
            .ok_or_else(|| ObjectStorageError::NotFound {
                path: path.to_string(),
            })
    }

    async fn exists(&self, path: &str) -> Result<bool, ObjectStorageError> {
        Ok(self.objects.lock().unwrap().contains_key(path))
    }
}
