// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object-storage trait: the interface boundary to the receipts bucket.

use async_trait::async_trait;

use crate::error::NdiraError;

/// Write-only object storage with publicly resolvable URLs.
///
/// The bucket itself is external; Ndira only ever uploads and derives the
/// public URL by convention (no read-back call).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads an object under the given key.
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), NdiraError>;

    /// Derives the publicly resolvable URL for a key.
    fn public_url(&self, key: &str) -> String;
}
