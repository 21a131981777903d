// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockTransport` implements [`Transport`] with a scripted set of
//! registered numbers, optional per-send latency (for overlap assertions),
//! and failure injection counters for the retry paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use ndira_core::{ChatHandle, NdiraError, Transport};

/// What kind of send a record captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendKind {
    Text,
    Media,
}

/// One successful send observed by the mock.
#[derive(Debug, Clone)]
pub struct SendRecord {
    pub kind: SendKind,
    pub handle: String,
    /// Message body for text sends, caption for media sends.
    pub content: String,
    pub media_url: Option<String>,
    pub file_name: Option<String>,
    pub started_at: Instant,
    pub finished_at: Instant,
}

/// A mock messaging transport for testing.
///
/// Numbers registered via `register()` resolve during lookup; everything
/// else looks unregistered. Sends are captured with entry/exit instants so
/// tests can assert the dispatch lane never overlaps two sends.
pub struct MockTransport {
    send_delay: Duration,
    registered: Mutex<HashSet<String>>,
    sends: Mutex<Vec<SendRecord>>,
    lookups: Mutex<Vec<String>>,
    text_failures: AtomicU32,
    media_failures: AtomicU32,
    text_attempts: AtomicU32,
    media_attempts: AtomicU32,
}

impl MockTransport {
    /// Create a mock with no registered numbers and no send latency.
    pub fn new() -> Self {
        Self {
            send_delay: Duration::ZERO,
            registered: Mutex::new(HashSet::new()),
            sends: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
            text_failures: AtomicU32::new(0),
            media_failures: AtomicU32::new(0),
            text_attempts: AtomicU32::new(0),
            media_attempts: AtomicU32::new(0),
        }
    }

    /// Builder-style: make every send take `delay` before completing.
    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = delay;
        self
    }

    /// Mark a normalized number as registered on the network.
    pub async fn register(&self, number: &str) {
        self.registered.lock().await.insert(number.to_string());
    }

    /// Fail the next `n` text sends with a transient transport error.
    pub fn fail_next_text_sends(&self, n: u32) {
        self.text_failures.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` media sends with a transient transport error.
    pub fn fail_next_media_sends(&self, n: u32) {
        self.media_failures.store(n, Ordering::SeqCst);
    }

    /// All successful sends, in completion order.
    pub async fn sent(&self) -> Vec<SendRecord> {
        self.sends.lock().await.clone()
    }

    /// Count of successful sends.
    pub async fn sent_count(&self) -> usize {
        self.sends.lock().await.len()
    }

    /// Numbers submitted to lookup, in call order.
    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.lock().await.clone()
    }

    /// Total text send attempts, including failed ones.
    pub fn text_attempts(&self) -> u32 {
        self.text_attempts.load(Ordering::SeqCst)
    }

    /// Total media send attempts, including failed ones.
    pub fn media_attempts(&self) -> u32 {
        self.media_attempts.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn transient() -> NdiraError {
        NdiraError::Transport {
            message: "scripted transient failure".into(),
            source: None,
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_text(&self, handle: &ChatHandle, body: &str) -> Result<(), NdiraError> {
        self.text_attempts.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.text_failures) {
            return Err(Self::transient());
        }

        let started_at = Instant::now();
        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }
        self.sends.lock().await.push(SendRecord {
            kind: SendKind::Text,
            handle: handle.0.clone(),
            content: body.to_string(),
            media_url: None,
            file_name: None,
            started_at,
            finished_at: Instant::now(),
        });
        Ok(())
    }

    async fn send_media(
        &self,
        handle: &ChatHandle,
        media_url: &str,
        caption: &str,
        file_name: &str,
    ) -> Result<(), NdiraError> {
        self.media_attempts.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.media_failures) {
            return Err(Self::transient());
        }

        let started_at = Instant::now();
        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }
        self.sends.lock().await.push(SendRecord {
            kind: SendKind::Media,
            handle: handle.0.clone(),
            content: caption.to_string(),
            media_url: Some(media_url.to_string()),
            file_name: Some(file_name.to_string()),
            started_at,
            finished_at: Instant::now(),
        });
        Ok(())
    }

    async fn lookup_number(&self, number: &str) -> Result<Option<ChatHandle>, NdiraError> {
        self.lookups.lock().await.push(number.to_string());
        Ok(self
            .registered
            .lock()
            .await
            .contains(number)
            .then(|| ChatHandle(format!("{number}@c.us"))))
    }
}
