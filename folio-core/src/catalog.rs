//! Catalog of readable works
//!
//! The catalog is plain data: it answers "which works exist and how many
//! chapters do they have". It backs [`MockSource`](crate::source::MockSource)
//! and the CLI listing.

use crate::types::{WorkKind, WorkRef};
use serde::{Deserialize, Serialize};

/// Publication status of a work
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[default]
    Ongoing,
    Completed,
    Hiatus,
}

/// A single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkEntry {
    pub id: String,
    pub kind: WorkKind,
    pub title: String,
    pub author: String,
    pub tags: Vec<String>,
    pub status: WorkStatus,
    pub rating: f32,
    pub views: String,

    /// Highest chapter number available
    pub total_chapters: u32,

    /// Approximate word count label (novels only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<String>,
}

impl WorkEntry {
    /// Create an entry with the required fields
    pub fn new(
        id: impl Into<String>,
        kind: WorkKind,
        title: impl Into<String>,
        total_chapters: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            author: String::new(),
            tags: Vec::new(),
            status: WorkStatus::Ongoing,
            rating: 0.0,
            views: String::new(),
            total_chapters,
            word_count: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_rating(mut self, rating: f32, views: impl Into<String>) -> Self {
        self.rating = rating;
        self.views = views.into();
        self
    }

    pub fn with_word_count(mut self, word_count: impl Into<String>) -> Self {
        self.word_count = Some(word_count.into());
        self
    }

    pub fn work_ref(&self) -> WorkRef {
        WorkRef::new(self.id.clone(), self.kind)
    }

    pub fn has_chapter(&self, chapter_number: u32) -> bool {
        (1..=self.total_chapters).contains(&chapter_number)
    }
}

/// An ordered collection of works
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub works: Vec<WorkEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The works shipped with the reader
    pub fn builtin() -> Self {
        let works = vec![
            WorkEntry::new("m1", WorkKind::Manga, "Solo Leveling: Reawakened", 189)
                .with_author("Chugong")
                .with_tags(["Action", "Fantasy", "System"])
                .with_rating(4.9, "120M"),
            WorkEntry::new("m2", WorkKind::Manga, "The Beginning After The End", 175)
                .with_author("TurtleMe")
                .with_tags(["Isekai", "Magic", "Adventure"])
                .with_rating(4.8, "85M"),
            WorkEntry::new("m3", WorkKind::Manga, "Omniscient Reader", 210)
                .with_author("SingNsong")
                .with_tags(["Apocalypse", "Psychological", "Action"])
                .with_rating(4.9, "92M"),
            WorkEntry::new("n1", WorkKind::Novel, "Shadow Slave", 1450)
                .with_author("GuiltyThree")
                .with_tags(["Dark Fantasy", "Survival", "Weak to Strong"])
                .with_rating(4.9, "45M")
                .with_word_count("2.4M"),
            WorkEntry::new("n2", WorkKind::Novel, "Lord of the Mysteries", 1432)
                .with_author("Cuttlefish")
                .with_tags(["Steampunk", "Mystery", "Supernatural"])
                .with_status(WorkStatus::Completed)
                .with_rating(5.0, "32M")
                .with_word_count("3.1M"),
            WorkEntry::new("n3", WorkKind::Novel, "Reverend Insanity", 2334)
                .with_author("Gu Zhen Ren")
                .with_tags(["Villain MC", "Cultivation", "Strategy"])
                .with_status(WorkStatus::Hiatus)
                .with_rating(4.7, "60M")
                .with_word_count("5.2M"),
        ];
        Self { works }
    }

    /// Add or replace an entry (matched by id)
    pub fn insert(&mut self, entry: WorkEntry) {
        match self.works.iter_mut().find(|w| w.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.works.push(entry),
        }
    }

    pub fn with_work(mut self, entry: WorkEntry) -> Self {
        self.insert(entry);
        self
    }

    pub fn get(&self, id: &str) -> Option<&WorkEntry> {
        self.works.iter().find(|w| w.id == id)
    }

    /// Look up a work by reference; the kind must match too
    pub fn find(&self, work: &WorkRef) -> Option<&WorkEntry> {
        self.get(&work.work_id).filter(|w| w.kind == work.kind)
    }

    pub fn of_kind(&self, kind: WorkKind) -> impl Iterator<Item = &WorkEntry> {
        self.works.iter().filter(move |w| w.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.works.len()
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }
}
