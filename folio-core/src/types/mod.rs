//! Core value types shared by sessions, sources and renderers

mod content;
mod settings;
mod work;

pub use content::{ContentUnit, PageRef};
pub use settings::{
    clamp_auto_scroll, clamp_font_size, clamp_line_height, clamp_zoom, FontFamily, Layout,
    MangaSettings, NovelSettings, Quality, ReaderSettings, SettingsPatch, Theme,
    AUTO_SCROLL_MAX, FONT_SIZE_MAX, FONT_SIZE_MIN, FONT_SIZE_STEP, LINE_HEIGHT_MAX,
    LINE_HEIGHT_MIN, ZOOM_MAX, ZOOM_MIN,
};
pub use work::{ChapterRef, Direction, WorkKind, WorkRef};
