//! Synthetic content source backed by a [`Catalog`]

use super::{ContentSource, FetchResult};
use crate::catalog::Catalog;
use crate::error::FetchError;
use crate::types::{ContentUnit, WorkKind, WorkRef};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Pages generated for every manga chapter (even, so double layout pairs up)
pub const PAGES_PER_CHAPTER: usize = 14;

/// How many times the sample text block is repeated in a novel chapter
pub const TEXT_REPEAT: usize = 3;

const SAMPLE_CHAPTER: &str = include_str!("sample_chapter.html");

const DEFAULT_MANGA_LATENCY: Duration = Duration::from_millis(600);
const DEFAULT_NOVEL_LATENCY: Duration = Duration::from_millis(1500);

/// Content source that fabricates chapters after a simulated network delay.
///
/// Chapters exist for every work in the catalog from 1 up to its
/// `total_chapters`; anything else is `NotFound`. The source can be taken
/// offline to simulate transient failures.
pub struct MockSource {
    catalog: Catalog,
    manga_latency: Duration,
    novel_latency: Duration,
    online: AtomicBool,
}

impl MockSource {
    /// Create a source over `catalog` with the reader's default latencies
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            manga_latency: DEFAULT_MANGA_LATENCY,
            novel_latency: DEFAULT_NOVEL_LATENCY,
            online: AtomicBool::new(true),
        }
    }

    /// Use the same latency for every fetch
    pub fn with_latency(self, latency: Duration) -> Self {
        self.with_latencies(latency, latency)
    }

    pub fn with_latencies(mut self, manga: Duration, novel: Duration) -> Self {
        self.manga_latency = manga;
        self.novel_latency = novel;
        self
    }

    /// Toggle simulated connectivity; while offline every fetch fails
    /// with [`FetchError::Transient`]
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Placeholder image URL for a page (0-based index)
    pub fn page_url(chapter_number: u32, index: usize) -> String {
        let seed = u64::from(chapter_number) * 20 + index as u64;
        format!("https://picsum.photos/seed/{}/800/1200", seed)
    }

    fn latency_for(&self, kind: WorkKind) -> Duration {
        match kind {
            WorkKind::Manga => self.manga_latency,
            WorkKind::Novel => self.novel_latency,
        }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn fetch(&self, work: &WorkRef, chapter_number: u32) -> FetchResult<ContentUnit> {
        let latency = self.latency_for(work.kind);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if !self.online.load(Ordering::SeqCst) {
            tracing::debug!(work = %work.work_id, chapter_number, "mock source offline");
            return Err(FetchError::transient("mock source is offline"));
        }

        let exists = self
            .catalog
            .find(work)
            .is_some_and(|entry| entry.has_chapter(chapter_number));
        if !exists {
            return Err(FetchError::NotFound {
                work_id: work.work_id.clone(),
                chapter: chapter_number,
            });
        }

        let content = match work.kind {
            WorkKind::Manga => ContentUnit::pages(
                (0..PAGES_PER_CHAPTER).map(|i| Self::page_url(chapter_number, i)),
            ),
            WorkKind::Novel => ContentUnit::Text(SAMPLE_CHAPTER.repeat(TEXT_REPEAT)),
        };
        tracing::debug!(
            work = %work.work_id,
            chapter_number,
            units = content.len(),
            "mock chapter generated"
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_source() -> MockSource {
        MockSource::default().with_latency(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_manga_pages() {
        let source = instant_source();
        let content = source.fetch(&WorkRef::manga("m1"), 3).await.unwrap();
        let pages = content.as_pages().unwrap();
        assert_eq!(pages.len(), PAGES_PER_CHAPTER);
        assert_eq!(pages[0].url, "https://picsum.photos/seed/60/800/1200");
        assert_eq!(pages[13].url, "https://picsum.photos/seed/73/800/1200");
    }

    #[tokio::test]
    async fn test_novel_text() {
        let source = instant_source();
        let content = source.fetch(&WorkRef::novel("n1"), 1).await.unwrap();
        assert_eq!(content.paragraphs().len(), 10 * TEXT_REPEAT);
    }

    #[tokio::test]
    async fn test_not_found() {
        let source = instant_source();
        let err = source.fetch(&WorkRef::manga("m1"), 190).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::NotFound {
                work_id: "m1".to_string(),
                chapter: 190
            }
        );
        let err = source.fetch(&WorkRef::manga("zz"), 1).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_offline_is_transient() {
        let source = instant_source();
        source.set_online(false);
        let err = source.fetch(&WorkRef::manga("m1"), 1).await.unwrap_err();
        assert!(matches!(err, FetchError::Transient { .. }));
        source.set_online(true);
        assert!(source.fetch(&WorkRef::manga("m1"), 1).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_applies() {
        let source = MockSource::default();
        let start = tokio::time::Instant::now();
        source.fetch(&WorkRef::manga("m1"), 1).await.unwrap();
        assert!(start.elapsed() >= DEFAULT_MANGA_LATENCY);
    }
}
