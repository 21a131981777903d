// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock object store for deterministic testing.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use ndira_core::{NdiraError, ObjectStore};

/// One captured upload.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub size: usize,
    pub content_type: String,
}

/// In-memory object store capturing uploads for assertion.
pub struct MockObjectStore {
    objects: Mutex<Vec<StoredObject>>,
    fail_uploads: AtomicBool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    /// Make every subsequent upload fail with an upload error.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// All captured uploads, in call order.
    pub async fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().await.clone()
    }

    /// Count of captured uploads.
    pub async fn object_count(&self) -> usize {
        self.objects.lock().await.len()
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), NdiraError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(NdiraError::Upload {
                message: "scripted upload failure".into(),
                source: None,
            });
        }
        self.objects.lock().await.push(StoredObject {
            key: key.to_string(),
            size: bytes.len(),
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }
}
