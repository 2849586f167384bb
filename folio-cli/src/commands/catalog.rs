//! Catalog command implementation

use super::parse_kind;
use anyhow::Result;
use folio_core::{Catalog, WorkEntry, WorkStatus};

/// List the built-in works
pub fn catalog(kind: Option<&str>, json: bool) -> Result<()> {
    let kind = kind.map(parse_kind).transpose()?;
    let catalog = Catalog::builtin();
    let works: Vec<&WorkEntry> = match kind {
        Some(kind) => catalog.of_kind(kind).collect(),
        None => catalog.works.iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&works)?);
        return Ok(());
    }

    for work in &works {
        let status = match work.status {
            WorkStatus::Ongoing => "ongoing",
            WorkStatus::Completed => "completed",
            WorkStatus::Hiatus => "hiatus",
        };
        println!(
            "{:<4} {:<6} {:<32} {:>5} ch  {:<10} {}",
            work.id, work.kind, work.title, work.total_chapters, status, work.author
        );
        if !work.tags.is_empty() {
            println!("{:<12}{}", "", work.tags.join(", "));
        }
    }
    println!("{} works", works.len());

    Ok(())
}
