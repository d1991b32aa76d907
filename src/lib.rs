//! Benchmark paginated S3 `ListObjects` calls.
//!
//! [`Lister`] walks every key under a prefix through any [`ObjectStore`],
//! timing each page. [`S3Store`] talks to a real endpoint; [`MemoryStore`]
//! stands in for one in tests.

pub mod error;
pub mod lister;
pub mod store;

pub use error::{ListError, RunError};
pub use lister::{measure, ExitStatus, Lister, RunStats};
pub use store::{
    ListRequest, MemoryStore, ObjectEntry, ObjectStore, Page, S3Config, S3Store, MAX_PAGE_SIZE,
};
