//! In-memory store used to exercise the lister without a network.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{ListRequest, ObjectEntry, ObjectStore, Page};
use crate::error::ListError;

/// A bucket-less key space with S3 `ListObjects` marker semantics.
///
/// Keys are kept sorted; each call returns up to `page_size` keys that start
/// with the prefix and sort strictly after the marker.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, u64>,
    latency: Option<Duration>,
    failure: Option<(usize, ListError)>,
    requests: Mutex<Vec<ListRequest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, key: impl Into<String>, size: u64) -> Self {
        self.objects.insert(key.into(), size);
        self
    }

    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.objects
            .extend(keys.into_iter().map(|key| (key.into(), 0)));
        self
    }

    /// Sleep this long (on the tokio clock) before answering each request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail the request with this zero-based index, and every one after it.
    pub fn fail_from(mut self, request_index: usize, message: impl Into<String>) -> Self {
        self.failure = Some((request_index, ListError::new(message)));
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    fn record(&self, request: &ListRequest) -> usize {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        requests.push(request.clone());
        requests.len() - 1
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_page(&self, request: &ListRequest) -> Result<Page, ListError> {
        let index = self.record(request);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some((fail_at, err)) = &self.failure {
            if index >= *fail_at {
                return Err(err.clone());
            }
        }

        let marker = request.marker.as_deref().unwrap_or("");
        let mut matching = self
            .objects
            .iter()
            .filter(|(key, _)| key.as_str() > marker && key.starts_with(&request.prefix));

        let entries: Vec<ObjectEntry> = matching
            .by_ref()
            .take(usize::from(request.page_size))
            .map(|(key, size)| ObjectEntry::new(key.clone(), *size))
            .collect();
        let truncated = matching.next().is_some();

        Ok(Page::new(entries).with_truncated(truncated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pages_follow_the_marker() {
        let store = MemoryStore::new().with_keys(["b", "a", "c", "other/d"]);

        let request = ListRequest::new("bucket", "", 2);
        let page = store.list_page(&request).await.unwrap();
        let keys: Vec<_> = page.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(page.truncated, Some(true));

        let page = store
            .list_page(&request.clone().with_marker("b"))
            .await
            .unwrap();
        let keys: Vec<_> = page.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["c", "other/d"]);
        assert_eq!(page.truncated, Some(false));

        assert_eq!(store.request_count(), 2);
    }

    #[tokio::test]
    async fn prefix_filters_keys() {
        let store = MemoryStore::new()
            .with_keys(["2023/z", "2024/a", "2024/b"])
            .with_object("2025/a", 42);

        let page = store
            .list_page(&ListRequest::new("bucket", "2024/", 10))
            .await
            .unwrap();
        let keys: Vec<_> = page.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["2024/a", "2024/b"]);

        let page = store
            .list_page(&ListRequest::new("bucket", "2025/", 10))
            .await
            .unwrap();
        assert_eq!(page.entries, vec![ObjectEntry::new("2025/a", 42)]);
    }

    #[tokio::test]
    async fn injected_failure_applies_from_index() {
        let store = MemoryStore::new()
            .with_keys(["a", "b"])
            .fail_from(1, "SlowDown");
        let request = ListRequest::new("bucket", "", 1);

        assert!(store.list_page(&request).await.is_ok());
        let err = store.list_page(&request).await.unwrap_err();
        assert_eq!(err.message(), "SlowDown");
    }

    #[tokio::test]
    async fn poisoned_request_log_keeps_counting() {
        let store = MemoryStore::new()
            .with_keys(["a", "b", "c"])
            .fail_from(1, "InternalError");
        let request = ListRequest::new("bucket", "", 1);

        assert!(store.list_page(&request).await.is_ok());

        let poisoned = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = store.requests.lock().unwrap();
                    panic!("poison the request log");
                })
                .join()
        });
        assert!(poisoned.is_err());
        assert!(store.requests.is_poisoned());

        let err = store.list_page(&request).await.unwrap_err();
        assert_eq!(err.message(), "InternalError");
        assert_eq!(store.request_count(), 2);
    }
}
