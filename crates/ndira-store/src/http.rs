// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP object-store client.
//!
//! Uploads objects with a single PUT against the configured storage
//! endpoint and derives public URLs by the base-URL + key convention (no
//! read-back call).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use ndira_config::model::StorageConfig;
use ndira_core::{NdiraError, ObjectStore};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Object store speaking plain authenticated HTTP PUT.
pub struct HttpObjectStore {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    public_base_url: String,
    api_token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(config: &StorageConfig) -> Result<Self, NdiraError> {
        let http = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| {
                NdiraError::Config(format!("failed to build storage HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), NdiraError> {
        let url = format!("{}/{}/{key}", self.endpoint, self.bucket);
        let mut request = self
            .http
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(|e| NdiraError::Upload {
            message: format!("storage upload request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(NdiraError::Upload {
                message: format!("storage returned {status} for {key}: {body}"),
                source: None,
            });
        }

        debug!(key, "object uploaded");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}
