//! Profile and link data model

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// 新建 profile 的默认简介
pub const DEFAULT_TAGLINE: &str = "Welcome to my bio link page!";

/// 未上传头像时使用的占位图
pub const DEFAULT_AVATAR_REF: &str = "/static/default-avatar.svg";

/// Link accent color, drawn from a fixed palette.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AccentColor {
    #[default]
    Purple,
    Blue,
    Red,
    Pink,
    Gray,
    Green,
}

impl AccentColor {
    /// Resolve a raw tag; absent or unrecognised tags fall back to purple.
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.trim().parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Symbolic icon keys understood by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconGlyph {
    Telegram,
    Github,
    Youtube,
    Instagram,
    Twitter,
    Linkedin,
    Music,
    Mail,
    Globe,
    Link,
    /// Unknown key, kept verbatim; renders with the default glyph.
    Other(String),
}

impl IconGlyph {
    pub fn from_key(key: &str) -> Self {
        match key.to_ascii_lowercase().as_str() {
            "telegram" => Self::Telegram,
            "github" => Self::Github,
            "youtube" => Self::Youtube,
            "instagram" => Self::Instagram,
            "twitter" => Self::Twitter,
            "linkedin" => Self::Linkedin,
            "music" => Self::Music,
            "mail" => Self::Mail,
            "globe" => Self::Globe,
            "link" => Self::Link,
            _ => Self::Other(key.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Telegram => "telegram",
            Self::Github => "github",
            Self::Youtube => "youtube",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
            Self::Music => "music",
            Self::Mail => "mail",
            Self::Globe => "globe",
            Self::Link => "link",
            Self::Other(key) => key,
        }
    }
}

/// A link icon: either a symbolic glyph or an external image reference.
///
/// Raw strings are resolved once, here: anything starting with `http` or `/`
/// is an image URI, everything else is a glyph key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Icon {
    Symbolic(IconGlyph),
    External(String),
}

impl Icon {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.starts_with("http") || raw.starts_with('/') {
            Some(Icon::External(raw.to_string()))
        } else {
            Some(Icon::Symbolic(IconGlyph::from_key(raw)))
        }
    }

    pub fn default_glyph() -> Self {
        Icon::Symbolic(IconGlyph::Link)
    }

    pub fn as_raw(&self) -> &str {
        match self {
            Icon::Symbolic(glyph) => glyph.key(),
            Icon::External(uri) => uri,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Icon::External(_))
    }
}

impl From<String> for Icon {
    fn from(raw: String) -> Self {
        Icon::parse(&raw).unwrap_or_else(Icon::default_glyph)
    }
}

impl From<Icon> for String {
    fn from(icon: Icon) -> Self {
        icon.as_raw().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub accent_color: AccentColor,
    #[serde(default)]
    pub sort_index: u32,
}

/// Profile metadata, everything except the link list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMeta {
    pub handle: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub avatar_ref: String,
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
    #[serde(default)]
    pub share_count: u32,
    #[serde(default)]
    pub unlocked: bool,
}

fn default_dark_mode() -> bool {
    true
}

impl ProfileMeta {
    /// Metadata for a freshly created profile.
    pub fn new(handle: &str) -> Self {
        let handle = normalize_handle(handle);
        Self {
            display_name: handle.clone(),
            handle,
            tagline: DEFAULT_TAGLINE.to_string(),
            avatar_ref: DEFAULT_AVATAR_REF.to_string(),
            dark_mode: true,
            share_count: 0,
            unlocked: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(flatten)]
    pub meta: ProfileMeta,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

impl ProfileRecord {
    pub fn new(meta: ProfileMeta, links: Vec<LinkEntry>) -> Self {
        Self { meta, links }
    }

    pub fn handle(&self) -> &str {
        &self.meta.handle
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.links.iter().position(|link| link.id == id)
    }

    /// Reassign `sort_index` from list positions.
    ///
    /// Returns the positions whose index actually changed, ascending.
    pub fn renumber(&mut self) -> Vec<usize> {
        let mut changed = Vec::new();
        for (position, link) in self.links.iter_mut().enumerate() {
            let index = position as u32;
            if link.sort_index != index {
                link.sort_index = index;
                changed.push(position);
            }
        }
        changed
    }

    /// `true` when the indices are exactly `0..n` in list order.
    pub fn is_densely_ordered(&self) -> bool {
        self.links
            .iter()
            .enumerate()
            .all(|(position, link)| link.sort_index as usize == position)
    }
}

/// Handles are stored lower-cased; all lookups go through this.
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: &str, sort_index: u32) -> LinkEntry {
        LinkEntry {
            id: id.to_string(),
            title: id.to_uppercase(),
            url: format!("https://{}.example.com", id),
            icon: None,
            accent_color: AccentColor::Purple,
            sort_index,
        }
    }

    #[test]
    fn test_icon_prefix_resolution() {
        assert_eq!(
            Icon::parse("https://cdn.example.com/a.png"),
            Some(Icon::External("https://cdn.example.com/a.png".to_string()))
        );
        assert_eq!(
            Icon::parse("/assets/logo.jpg"),
            Some(Icon::External("/assets/logo.jpg".to_string()))
        );
        assert_eq!(
            Icon::parse("telegram"),
            Some(Icon::Symbolic(IconGlyph::Telegram))
        );
        assert_eq!(Icon::parse("   "), None);
    }

    #[test]
    fn test_unknown_glyph_is_preserved() {
        let icon = Icon::parse("mastodon").unwrap();
        assert_eq!(icon, Icon::Symbolic(IconGlyph::Other("mastodon".to_string())));
        assert_eq!(icon.as_raw(), "mastodon");
    }

    #[test]
    fn test_icon_serde_uses_raw_string() {
        let json = serde_json::to_string(&Icon::Symbolic(IconGlyph::Github)).unwrap();
        assert_eq!(json, "\"github\"");
        let icon: Icon = serde_json::from_str("\"/img/x.png\"").unwrap();
        assert!(icon.is_external());
    }

    #[test]
    fn test_accent_color_fallback() {
        assert_eq!(AccentColor::from_tag(Some("blue")), AccentColor::Blue);
        assert_eq!(AccentColor::from_tag(Some("GREEN")), AccentColor::Green);
        assert_eq!(AccentColor::from_tag(Some("orange")), AccentColor::Purple);
        assert_eq!(AccentColor::from_tag(None), AccentColor::Purple);
        assert_eq!(AccentColor::Gray.to_string(), "gray");
    }

    #[test]
    fn test_renumber_reports_changed_positions() {
        let mut record = ProfileRecord::new(
            ProfileMeta::new("alice"),
            vec![link("a", 0), link("c", 2), link("d", 3)],
        );
        assert!(!record.is_densely_ordered());

        let changed = record.renumber();
        assert_eq!(changed, vec![1, 2]);
        assert!(record.is_densely_ordered());
        assert!(record.renumber().is_empty());
    }

    #[test]
    fn test_new_meta_normalizes_handle() {
        let meta = ProfileMeta::new("  Alice_01 ");
        assert_eq!(meta.handle, "alice_01");
        assert_eq!(meta.tagline, DEFAULT_TAGLINE);
        assert!(meta.dark_mode);
        assert!(!meta.unlocked);
    }
}
