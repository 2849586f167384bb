//! Content sources: where chapter payloads come from

mod mock;

pub use mock::{MockSource, PAGES_PER_CHAPTER, TEXT_REPEAT};

use crate::error::FetchError;
use crate::types::{ContentUnit, WorkRef};
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Provider of chapter content keyed by work and chapter number.
///
/// A call resolves exactly once, either with the chapter or with an error.
/// Implementations may retry internally; the session never re-invokes a
/// fetch on its own.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch one chapter of a work
    async fn fetch(&self, work: &WorkRef, chapter_number: u32) -> FetchResult<ContentUnit>;
}

#[async_trait]
impl<S: ContentSource + ?Sized> ContentSource for Arc<S> {
    async fn fetch(&self, work: &WorkRef, chapter_number: u32) -> FetchResult<ContentUnit> {
        (**self).fetch(work, chapter_number).await
    }
}
