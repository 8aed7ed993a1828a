use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 72;
pub const MIN_TAB_WIDTH: u32 = 1;
pub const MAX_TAB_WIDTH: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Dark,
    Light,
    System,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
            ThemeMode::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<ThemeMode> {
        match s.trim() {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            "system" => Some(ThemeMode::System),
            _ => None,
        }
    }

    /// Whether the effective theme is dark. `System` defers to the caller's
    /// platform check.
    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::System => system_prefers_dark,
        }
    }
}

/// Display preferences persisted across sessions.
///
/// Stored as a flat JSON record. Every field has its own default so a record
/// written by an older build, or missing keys, still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSettings {
    #[serde(default = "default_theme")]
    pub theme: ThemeMode,

    #[serde(default = "default_font_size")]
    pub font_size_pt: u32,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_line_numbers")]
    pub show_line_numbers: bool,

    #[serde(default)]
    pub word_wrap: bool,

    #[serde(default = "default_minimap")]
    pub show_minimap: bool,

    #[serde(default = "default_tab_width")]
    pub tab_width: u32,
}

fn default_theme() -> ThemeMode {
    ThemeMode::Dark
}

fn default_font_size() -> u32 {
    14
}

fn default_font_family() -> String {
    "'Fira Code', monospace".to_string()
}

fn default_line_numbers() -> bool {
    true
}

fn default_minimap() -> bool {
    true
}

fn default_tab_width() -> u32 {
    4
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            font_size_pt: default_font_size(),
            font_family: default_font_family(),
            show_line_numbers: default_line_numbers(),
            word_wrap: false,
            show_minimap: default_minimap(),
            tab_width: default_tab_width(),
        }
    }
}

impl ViewerSettings {
    /// Clamp numeric fields into their supported ranges and replace an empty
    /// font family with the default one.
    pub fn sanitized(mut self) -> Self {
        self.font_size_pt = self.font_size_pt.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.tab_width = self.tab_width.clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH);
        if self.font_family.trim().is_empty() {
            self.font_family = default_font_family();
        }
        self
    }
}

/// Zoom level in percent: 50..=200 in steps of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom(u32);

impl Zoom {
    pub const MIN: u32 = 50;
    pub const MAX: u32 = 200;
    pub const STEP: u32 = 10;
    pub const DEFAULT: u32 = 100;

    /// Clamp into range and snap to the nearest step.
    pub fn new(percent: u32) -> Self {
        let clamped = percent.clamp(Self::MIN, Self::MAX);
        let snapped = (clamped + Self::STEP / 2) / Self::STEP * Self::STEP;
        Zoom(snapped.min(Self::MAX))
    }

    pub fn percent(&self) -> u32 {
        self.0
    }

    pub fn zoomed_in(&self) -> Self {
        Zoom::new(self.0 + Self::STEP)
    }

    pub fn zoomed_out(&self) -> Self {
        Zoom::new(self.0.saturating_sub(Self::STEP))
    }

    /// Font size after applying this zoom to `base_pt`.
    pub fn scale(&self, base_pt: u32) -> f32 {
        base_pt as f32 * self.0 as f32 / 100.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Zoom(Self::DEFAULT)
    }
}
