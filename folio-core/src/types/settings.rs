//! Display settings for the manga and novel readers
//!
//! Settings are only changed by explicit commands. Every field has a fixed
//! domain and out-of-range input is clamped into it, so a settings value is
//! always valid.

use super::WorkKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ZOOM_MIN: u16 = 50;
pub const ZOOM_MAX: u16 = 200;
pub const FONT_SIZE_MIN: u8 = 14;
pub const FONT_SIZE_MAX: u8 = 30;
/// Increment used by the font size buttons
pub const FONT_SIZE_STEP: u8 = 2;
pub const LINE_HEIGHT_MIN: f32 = 1.0;
pub const LINE_HEIGHT_MAX: f32 = 3.0;
pub const AUTO_SCROLL_MAX: u8 = 10;

/// Image quality requested from the proxy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Low,
    Medium,
    #[default]
    High,
}

/// Manga page layout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    #[default]
    Serif,
    Sans,
    Mono,
}

/// Novel reader color theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
    Midnight,
}

macro_rules! impl_from_str {
    ($ty:ident { $($name:literal => $variant:ident),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!(
                        "'{}' is not a valid {} ({})",
                        other,
                        stringify!($ty).to_lowercase(),
                        [$($name),+].join(", ")
                    )),
                }
            }
        }
    };
}

impl_from_str!(Quality { "low" => Low, "medium" => Medium, "high" => High });
impl_from_str!(Layout { "single" => Single, "double" => Double });
impl_from_str!(FontFamily { "serif" => Serif, "sans" => Sans, "mono" => Mono });
impl_from_str!(Theme { "light" => Light, "dark" => Dark, "sepia" => Sepia, "midnight" => Midnight });

/// Manga reader settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MangaSettings {
    pub quality: Quality,

    /// Page width as a percentage, 50..=200
    pub zoom: u16,

    pub layout: Layout,
}

impl Default for MangaSettings {
    fn default() -> Self {
        Self {
            quality: Quality::High,
            zoom: 100,
            layout: Layout::Single,
        }
    }
}

impl MangaSettings {
    pub fn normalized(mut self) -> Self {
        self.zoom = clamp_zoom(i64::from(self.zoom));
        self
    }
}

/// Novel reader settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NovelSettings {
    /// Font size in pixels, 14..=30
    pub font_size: u8,

    pub line_height: f32,

    pub font_family: FontFamily,

    pub theme: Theme,

    /// 0 means auto-scroll is off, 1..=10 is the speed
    pub auto_scroll_speed: u8,
}

impl Default for NovelSettings {
    fn default() -> Self {
        Self {
            font_size: 18,
            line_height: 1.8,
            font_family: FontFamily::Serif,
            theme: Theme::Light,
            auto_scroll_speed: 0,
        }
    }
}

impl NovelSettings {
    pub fn normalized(mut self) -> Self {
        self.font_size = clamp_font_size(i64::from(self.font_size));
        self.line_height = clamp_line_height(f64::from(self.line_height));
        self.auto_scroll_speed = clamp_auto_scroll(i64::from(self.auto_scroll_speed));
        self
    }
}

/// Settings for whichever reader a session uses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReaderSettings {
    Manga(MangaSettings),
    Novel(NovelSettings),
}

impl ReaderSettings {
    /// Default settings for a kind of work
    pub fn defaults_for(kind: WorkKind) -> Self {
        match kind {
            WorkKind::Manga => ReaderSettings::Manga(MangaSettings::default()),
            WorkKind::Novel => ReaderSettings::Novel(NovelSettings::default()),
        }
    }

    pub fn kind(&self) -> WorkKind {
        match self {
            ReaderSettings::Manga(_) => WorkKind::Manga,
            ReaderSettings::Novel(_) => WorkKind::Novel,
        }
    }

    pub fn as_manga(&self) -> Option<&MangaSettings> {
        match self {
            ReaderSettings::Manga(m) => Some(m),
            ReaderSettings::Novel(_) => None,
        }
    }

    pub fn as_novel(&self) -> Option<&NovelSettings> {
        match self {
            ReaderSettings::Novel(n) => Some(n),
            ReaderSettings::Manga(_) => None,
        }
    }

    /// Merge a patch into these settings, clamping every value into range.
    ///
    /// Fields that belong to the other reader kind are ignored, and so is
    /// `auto_scroll_speed`, which the session drives through its own
    /// scheduler. Returns whether anything changed.
    pub fn apply(&mut self, patch: &SettingsPatch) -> bool {
        let before = *self;
        match self {
            ReaderSettings::Manga(m) => {
                if let Some(quality) = patch.quality {
                    m.quality = quality;
                }
                if let Some(zoom) = patch.zoom {
                    m.zoom = clamp_zoom(zoom);
                }
                if let Some(layout) = patch.layout {
                    m.layout = layout;
                }
            }
            ReaderSettings::Novel(n) => {
                if let Some(size) = patch.font_size {
                    n.font_size = clamp_font_size(size);
                }
                if let Some(line_height) = patch.line_height {
                    n.line_height = clamp_line_height(line_height);
                }
                if let Some(family) = patch.font_family {
                    n.font_family = family;
                }
                if let Some(theme) = patch.theme {
                    n.theme = theme;
                }
            }
        }
        *self != before
    }

    /// Record the auto-scroll speed on novel settings; no-op for manga
    pub(crate) fn set_auto_scroll_speed(&mut self, speed: u8) {
        if let ReaderSettings::Novel(n) = self {
            n.auto_scroll_speed = speed.min(AUTO_SCROLL_MAX);
        }
    }

    /// Clamp every field into its domain (used for settings loaded from config)
    pub fn normalized(self) -> Self {
        match self {
            ReaderSettings::Manga(m) => ReaderSettings::Manga(m.normalized()),
            ReaderSettings::Novel(n) => ReaderSettings::Novel(n.normalized()),
        }
    }
}

/// A partial settings update. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scroll_speed: Option<i64>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_zoom(mut self, zoom: i64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_font_size(mut self, font_size: i64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }

    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = Some(family);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_auto_scroll_speed(mut self, speed: i64) -> Self {
        self.auto_scroll_speed = Some(speed);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set one field from a `key=value` pair such as `zoom=150` or
    /// `theme=sepia`. Keys accept `snake_case` or `kebab-case`.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        let int = || {
            value
                .parse::<i64>()
                .map_err(|_| format!("'{}' is not a whole number", value))
        };
        match key.trim().replace('-', "_").as_str() {
            "quality" => self.quality = Some(value.parse()?),
            "zoom" => self.zoom = Some(int()?),
            "layout" => self.layout = Some(value.parse()?),
            "font_size" => self.font_size = Some(int()?),
            "line_height" => {
                self.line_height = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("'{}' is not a number", value))?,
                )
            }
            "font_family" | "font" => self.font_family = Some(value.parse()?),
            "theme" => self.theme = Some(value.parse()?),
            "auto_scroll_speed" | "auto_scroll" => self.auto_scroll_speed = Some(int()?),
            other => return Err(format!("Unknown setting: {}", other)),
        }
        Ok(())
    }
}

pub fn clamp_zoom(zoom: i64) -> u16 {
    zoom.clamp(i64::from(ZOOM_MIN), i64::from(ZOOM_MAX)) as u16
}

pub fn clamp_font_size(size: i64) -> u8 {
    size.clamp(i64::from(FONT_SIZE_MIN), i64::from(FONT_SIZE_MAX)) as u8
}

pub fn clamp_line_height(line_height: f64) -> f32 {
    if line_height.is_nan() {
        return NovelSettings::default().line_height;
    }
    line_height.clamp(f64::from(LINE_HEIGHT_MIN), f64::from(LINE_HEIGHT_MAX)) as f32
}

pub fn clamp_auto_scroll(speed: i64) -> u8 {
    speed.clamp(0, i64::from(AUTO_SCROLL_MAX)) as u8
}
