//! The single capability the lister needs from an object store: fetch one
//! page of keys after a marker.

use async_trait::async_trait;

use crate::error::ListError;

mod memory;
mod s3;

pub use memory::MemoryStore;
pub use s3::{S3Config, S3Store};

/// Largest page size a ListObjects call accepts.
pub const MAX_PAGE_SIZE: u16 = 1000;

/// Parameters of one list call.
///
/// Bucket, prefix and page size are fixed for a run; only the marker moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub bucket: String,
    pub prefix: String,
    pub page_size: u16,
    pub marker: Option<String>,
}

impl ListRequest {
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>, page_size: u16) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            page_size,
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn set_marker(&mut self, marker: impl Into<String>) {
        self.marker = Some(marker.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
}

impl ObjectEntry {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

/// One batch of listing results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub entries: Vec<ObjectEntry>,

    /// Whether the store says more results follow. `None` when the store
    /// does not report it.
    pub truncated: Option<bool>,
}

impl Page {
    pub fn new(entries: Vec<ObjectEntry>) -> Self {
        Self {
            entries,
            truncated: None,
        }
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = Some(truncated);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Key to continue from on the next request.
    pub fn last_key(&self) -> Option<&str> {
        self.entries.last().map(|e| e.key.as_str())
    }
}

/// Something that can list a bucket one page at a time.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_page(&self, request: &ListRequest) -> Result<Page, ListError>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    async fn list_page(&self, request: &ListRequest) -> Result<Page, ListError> {
        (**self).list_page(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_starts_without_marker() {
        let mut request = ListRequest::new("logs", "2024/", 2);
        assert_eq!(request.marker, None);

        request.set_marker("2024/b");
        assert_eq!(request.marker.as_deref(), Some("2024/b"));
        assert_eq!(request.bucket, "logs");
        assert_eq!(request.prefix, "2024/");
        assert_eq!(request.page_size, 2);
    }

    #[test]
    fn page_last_key() {
        let page = Page::new(vec![ObjectEntry::new("a", 1), ObjectEntry::new("b", 2)]);
        assert_eq!(page.len(), 2);
        assert_eq!(page.last_key(), Some("b"));
        assert!(Page::default().last_key().is_none());
        assert!(Page::default().is_empty());
    }
}
