use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

pub const DEFAULT_WIDTH: u32 = 560;
pub const DEFAULT_HEIGHT: u32 = 315;

/// Tag the widget realizes into.
pub const EMBED_TAG: &str = "iframe";
/// Class appended to every realized embed.
pub const REALIZED_CLASS: &str = "lazytube__iframe";

pub const AUTOPLAY_PARAM: &str = "autoplay";
pub const AUTOPLAY_ON: &str = "1";

pub const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";
pub const THUMBNAIL_FILE: &str = "maxresdefault.jpg";

pub const EMBED_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// Boolean-style attribute on the widget element.
pub const DISABLE_LAZY_ATTR: &str = "disable-native-lazy-loading";
/// Marker the placeholder image carries for a peer lazy loader.
pub const DISABLE_LAZY_MARKER: &str = "data-disable-native-lazy-loading";

/// Elements accepted as the nested fallback block.
pub const FALLBACK_BLOCKS: [&str; 2] = ["template", "noscript"];

/// Canonical provider embed URL. Group 1 is the video id.
pub static SOURCE_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://www\.youtube\.com/embed/([A-Za-z0-9_]+)(?:[?#].*)?$")
        .expect("source grammar is a valid regex")
});

/// Per-host widget settings, usually read from the `[widget]` table of a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetOptions {
    pub tag_name: String,
    pub play_label: String,
    pub placeholder_alt: String,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            tag_name: "lazy-youtube".to_string(),
            play_label: "Play video".to_string(),
            placeholder_alt: "Video thumbnail".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    widget: WidgetOptions,
}

impl WidgetOptions {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(input)?;
        file.widget.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if !is_valid_custom_element_name(&self.tag_name) {
            return Err(ConfigError::InvalidTagName(self.tag_name));
        }
        Ok(self)
    }
}

/// Custom element names start with a lowercase ASCII letter, contain a hyphen, and are
/// otherwise lowercase alphanumerics, `-`, `.` or `_`.
pub fn is_valid_custom_element_name(name: &str) -> bool {
    const RESERVED: [&str; 8] = [
        "annotation-xml",
        "color-profile",
        "font-face",
        "font-face-src",
        "font-face-uri",
        "font-face-format",
        "font-face-name",
        "missing-glyph",
    ];
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.contains('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
        && !RESERVED.contains(&name)
}
