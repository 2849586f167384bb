//! Plain-text rendering of frames and snapshots

use folio_core::render::style;
use folio_core::session::AmbientPlayer;
use folio_core::{ContentUnit, Frame, ReaderSettings, SessionSnapshot};
use serde::Serialize;

/// Serialized name of a unit-like enum value (`Quality::Low` -> "low")
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => "?".to_string(),
    }
}

pub fn settings_line(settings: &ReaderSettings) -> String {
    match settings {
        ReaderSettings::Manga(m) => format!(
            "quality {}, zoom {}%, {} layout",
            label(&m.quality),
            m.zoom,
            label(&m.layout)
        ),
        ReaderSettings::Novel(n) => format!(
            "{}px {} on {}, line height {:.1}",
            n.font_size,
            label(&n.font_family),
            label(&n.theme),
            n.line_height
        ),
    }
}

fn player_line(player: &AmbientPlayer) -> String {
    let track = player
        .current_track()
        .map(|t| t.title.as_str())
        .unwrap_or("-");
    let state = if player.is_playing() { "playing" } else { "paused" };
    format!("{} ({}, volume {})", track, state, player.volume())
}

/// Print the open chapter the way a terminal reader would show it
pub fn print_frame(title: &str, frame: &Frame) {
    println!("{}, chapter {}", title, frame.chapter.chapter_number);
    println!("Settings:    {}", settings_line(&frame.settings));

    match (&*frame.content, &frame.settings) {
        (ContentUnit::Pages(pages), ReaderSettings::Manga(m)) => {
            let width = style::page_width(m);
            match width.max_width_rem {
                Some(max) => println!("Page width:  {}% (max {}rem)", width.percent, max),
                None => println!("Page width:  {}%", width.percent),
            }
            for spread in style::spreads(pages, m.layout) {
                let numbers: Vec<String> = spread.iter().map(|p| p.number.to_string()).collect();
                println!("[{}]", numbers.join("|"));
                for page in spread {
                    println!("  {}", style::proxy_url(&page.url, m.quality));
                }
            }
        }
        (ContentUnit::Text(_), ReaderSettings::Novel(n)) => {
            let palette = style::palette(n.theme);
            println!(
                "Colors:      {} on {}",
                palette.foreground, palette.background
            );
            println!("Font:        {}", style::font_stack(n.font_family));
            println!();
            for paragraph in frame.content.paragraphs() {
                println!("{}", paragraph);
                println!();
            }
        }
        (content, _) => println!("{} units", content.len()),
    }
}

pub fn print_snapshot(snapshot: &SessionSnapshot) {
    println!("Session:     {}", snapshot.session_id);
    println!("Work:        {} {}", snapshot.work.kind, snapshot.work.work_id);
    match &snapshot.chapter {
        Some(chapter) => println!(
            "Chapter:     {} ({})",
            chapter.chapter_number,
            label(&snapshot.phase)
        ),
        None => println!("Chapter:     - ({})", label(&snapshot.phase)),
    }
    if let Some(error) = &snapshot.error {
        println!("Error:       {}", error);
    }
    if let Some(units) = snapshot.units {
        println!("Units:       {}", units);
    }
    println!("Progress:    {:.1}%", snapshot.progress);
    println!("Settings:    {}", settings_line(&snapshot.settings));
    println!("Auto-scroll: {}", snapshot.auto_scroll_speed);
    match snapshot.sleep_minutes_remaining {
        Some(minutes) => println!("Sleep timer: {} min left", minutes),
        None => println!("Sleep timer: off"),
    }
    println!("Ambient:     {}", player_line(&snapshot.player));
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::types::{Quality, Theme};

    #[test]
    fn test_label_uses_serde_names() {
        assert_eq!(label(&Quality::Medium), "medium");
        assert_eq!(label(&Theme::Midnight), "midnight");
    }

    #[test]
    fn test_settings_line() {
        let manga = ReaderSettings::defaults_for(folio_core::WorkKind::Manga);
        assert_eq!(settings_line(&manga), "quality high, zoom 100%, single layout");

        let novel = ReaderSettings::defaults_for(folio_core::WorkKind::Novel);
        assert_eq!(settings_line(&novel), "18px serif on light, line height 1.8");
    }
}
