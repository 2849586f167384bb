//! Pure presentation rules shared by renderers

use crate::types::{FontFamily, Layout, MangaSettings, PageRef, Quality, Theme};
use serde::Serialize;
use std::time::Duration;

/// Image proxy used for manga pages
pub const PROXY_BASE_URL: &str = "https://images.weserv.nl/";

/// Maximum page column width in single layout without zoom, in rem
pub const SINGLE_PAGE_MAX_WIDTH_REM: f32 = 48.0;

/// Build the proxied URL for a page image.
///
/// Pages are always converted to progressive WebP without enlargement;
/// quality controls compression and the resize width.
pub fn proxy_url(source_url: &str, quality: Quality) -> String {
    let mut params: Vec<(&str, &str)> = vec![
        ("url", source_url),
        ("output", "webp"),
        ("we", "1"),
        ("il", "1"),
        ("n", "-1"),
    ];
    match quality {
        Quality::Low => params.extend([("q", "50"), ("w", "800")]),
        Quality::Medium => params.extend([("q", "75"), ("w", "1200")]),
        Quality::High => params.push(("q", "90")),
    }

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", PROXY_BASE_URL, query)
}

/// Horizontal sizing of the page column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageWidth {
    /// Width as a percentage of the viewport
    pub percent: u16,

    /// Cap in rem, or `None` when the column may grow freely
    pub max_width_rem: Option<f32>,
}

/// Column width for the given manga settings. Double layout and zoom above
/// 100% lift the single-page width cap.
pub fn page_width(settings: &MangaSettings) -> PageWidth {
    let uncapped = settings.layout == Layout::Double || settings.zoom > 100;
    PageWidth {
        percent: settings.zoom,
        max_width_rem: if uncapped {
            None
        } else {
            Some(SINGLE_PAGE_MAX_WIDTH_REM)
        },
    }
}

/// Group pages into what is shown side by side
pub fn spreads(pages: &[PageRef], layout: Layout) -> Vec<&[PageRef]> {
    let per_spread = match layout {
        Layout::Single => 1,
        Layout::Double => 2,
    };
    pages.chunks(per_spread).collect()
}

/// Background and text colors of a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: "#ffffff",
            foreground: "#1f2937",
        },
        Theme::Dark => Palette {
            background: "#111827",
            foreground: "#d1d5db",
        },
        Theme::Sepia => Palette {
            background: "#f4ecd8",
            foreground: "#5b4636",
        },
        Theme::Midnight => Palette {
            background: "#0f172a",
            foreground: "#94a3b8",
        },
    }
}

pub fn font_stack(family: FontFamily) -> &'static str {
    match family {
        FontFamily::Serif => "Georgia, Cambria, \"Times New Roman\", serif",
        FontFamily::Sans => "ui-sans-serif, system-ui, sans-serif",
        FontFamily::Mono => "ui-monospace, Menlo, Consolas, monospace",
    }
}

/// Period between auto-scroll ticks; `None` when auto-scroll is off.
/// Speed 1 ticks every 46 ms, speed 10 every 10 ms.
pub fn auto_scroll_interval(speed: u8) -> Option<Duration> {
    match speed {
        0 => None,
        s => {
            let ms = 50u64.saturating_sub(u64::from(s.min(10)) * 4);
            Some(Duration::from_millis(ms))
        }
    }
}

/// Convert a scroll offset into a progress percentage.
///
/// Returns `None` when the content fits in the viewport and there is nothing
/// to scroll.
pub fn progress_from_scroll(scroll_y: f64, content_height: f64, viewport_height: f64) -> Option<f64> {
    let scrollable = content_height - viewport_height;
    if scrollable <= 0.0 || !scrollable.is_finite() {
        return None;
    }
    Some((scroll_y / scrollable * 100.0).clamp(0.0, 100.0))
}

/// Scroll offset that puts the viewport at `percent`
pub fn scroll_offset(percent: f64, content_height: f64, viewport_height: f64) -> f64 {
    let scrollable = (content_height - viewport_height).max(0.0);
    percent.clamp(0.0, 100.0) / 100.0 * scrollable
}
