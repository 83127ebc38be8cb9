//! JSON import/export document
//!
//! ```json
//! {
//!   "handle": "alice",
//!   "displayName": "Alice",
//!   "tagline": "...",
//!   "avatarRef": "/uploads/alice.png",
//!   "themePreference": true,
//!   "shareCount": 2,
//!   "unlocked": true,
//!   "links": [{ "id": "...", "title": "...", "url": "...", "iconGlyph": "github", "accentColor": "blue", "sortIndex": 0 }]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::gating::SHARES_TO_UNLOCK;
use crate::errors::{BiolinkError, Result};
use crate::storage::{AccentColor, Icon, LinkEntry, ProfileMeta, ProfileRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub tagline: String,
    pub avatar_ref: String,
    pub theme_preference: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked: Option<bool>,
    pub links: Vec<SnapshotLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_glyph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<u32>,
}

impl From<&ProfileRecord> for ProfileSnapshot {
    fn from(record: &ProfileRecord) -> Self {
        let meta = &record.meta;
        Self {
            handle: meta.handle.clone(),
            display_name: Some(meta.display_name.clone()),
            tagline: meta.tagline.clone(),
            avatar_ref: meta.avatar_ref.clone(),
            theme_preference: meta.dark_mode,
            share_count: Some(meta.share_count),
            unlocked: Some(meta.unlocked),
            links: record
                .links
                .iter()
                .map(|link| SnapshotLink {
                    id: Some(link.id.clone()),
                    title: link.title.clone(),
                    url: link.url.clone(),
                    icon_glyph: link.icon.as_ref().map(|icon| icon.as_raw().to_string()),
                    accent_color: Some(link.accent_color.to_string()),
                    sort_index: Some(link.sort_index),
                })
                .collect(),
        }
    }
}

pub fn encode(record: &ProfileRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ProfileSnapshot::from(record))?)
}

/// Parse and validate a document. Syntax or shape errors are `Parse`,
/// content errors are `Validation`.
pub fn decode(json: &str) -> Result<ProfileSnapshot> {
    let snapshot: ProfileSnapshot = serde_json::from_str(json)
        .map_err(|e| BiolinkError::parse(format!("Invalid profile document: {}", e)))?;

    let mut seen = HashSet::new();
    for (position, link) in snapshot.links.iter().enumerate() {
        if link.title.trim().is_empty() || link.url.trim().is_empty() {
            return Err(BiolinkError::validation(format!(
                "Link #{} needs both a title and a url",
                position + 1
            )));
        }
        if let Some(id) = &link.id
            && !seen.insert(id.as_str())
        {
            return Err(BiolinkError::validation(format!(
                "Duplicate link id '{}'",
                id
            )));
        }
    }

    Ok(snapshot)
}

/// Build the record that results from importing `snapshot` over `current`.
///
/// The handle of `current` is kept; share counters only move forward.
/// Link ids are kept only when they already belong to `current`, since
/// ids are unique across all profiles; any other link gets a fresh id.
pub fn merge(current: &ProfileRecord, snapshot: ProfileSnapshot) -> ProfileRecord {
    let current_meta = &current.meta;
    let owned_ids: HashSet<&str> = current.links.iter().map(|link| link.id.as_str()).collect();
    if !snapshot.handle.eq_ignore_ascii_case(&current_meta.handle) {
        warn!(
            "Imported document belongs to '{}', keeping handle '{}'",
            snapshot.handle, current_meta.handle
        );
    }

    let share_count = current_meta
        .share_count
        .max(snapshot.share_count.unwrap_or(0));
    let meta = ProfileMeta {
        handle: current_meta.handle.clone(),
        display_name: snapshot
            .display_name
            .unwrap_or_else(|| current_meta.display_name.clone()),
        tagline: snapshot.tagline,
        avatar_ref: snapshot.avatar_ref,
        dark_mode: snapshot.theme_preference,
        share_count,
        unlocked: current_meta.unlocked
            || snapshot.unlocked.unwrap_or(false)
            || share_count >= SHARES_TO_UNLOCK,
    };

    let mut links = snapshot.links;
    // sort_by_key 是稳定排序，缺省 sortIndex 的条目保持文档顺序
    links.sort_by_key(|link| link.sort_index.unwrap_or(u32::MAX));

    let links = links
        .into_iter()
        .enumerate()
        .map(|(position, link)| LinkEntry {
            id: link
                .id
                .filter(|id| owned_ids.contains(id.as_str()))
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: link.title,
            url: link.url,
            icon: link.icon_glyph.as_deref().and_then(Icon::parse),
            accent_color: AccentColor::from_tag(link.accent_color.as_deref()),
            sort_index: position as u32,
        })
        .collect();

    ProfileRecord::new(meta, links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::IconGlyph;

    fn sample() -> ProfileRecord {
        let mut meta = ProfileMeta::new("alice");
        meta.display_name = "Alice".to_string();
        meta.share_count = 1;
        ProfileRecord::new(
            meta,
            vec![
                LinkEntry {
                    id: "a".to_string(),
                    title: "GitHub".to_string(),
                    url: "https://github.com/alice".to_string(),
                    icon: Some(Icon::Symbolic(IconGlyph::Github)),
                    accent_color: AccentColor::Gray,
                    sort_index: 0,
                },
                LinkEntry {
                    id: "b".to_string(),
                    title: "Blog".to_string(),
                    url: "https://alice.dev".to_string(),
                    icon: Some(Icon::External("/img/blog.png".to_string())),
                    accent_color: AccentColor::Green,
                    sort_index: 1,
                },
            ],
        )
    }

    #[test]
    fn test_export_uses_camel_case_fields() {
        let json = encode(&sample()).unwrap();
        assert!(json.contains("\"avatarRef\""));
        assert!(json.contains("\"themePreference\": true"));
        assert!(json.contains("\"iconGlyph\": \"github\""));
        assert!(json.contains("\"sortIndex\": 1"));
    }

    #[test]
    fn test_merge_of_export_reproduces_record() {
        let record = sample();
        let snapshot = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(merge(&record, snapshot), record);
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        for doc in [
            "not json",
            "[]",
            r#"{"handle": "x"}"#,
            r#"{"handle": "x", "tagline": "", "avatarRef": "", "themePreference": "dark", "links": []}"#,
        ] {
            assert!(matches!(decode(doc), Err(BiolinkError::Parse(_))), "{}", doc);
        }
    }

    #[test]
    fn test_content_errors_are_validation() {
        let empty_title = r#"{"handle":"x","tagline":"","avatarRef":"","themePreference":true,
            "links":[{"title":"  ","url":"https://x"}]}"#;
        let duplicate = r#"{"handle":"x","tagline":"","avatarRef":"","themePreference":true,
            "links":[{"id":"1","title":"a","url":"u"},{"id":"1","title":"b","url":"v"}]}"#;

        assert!(matches!(decode(empty_title), Err(BiolinkError::Validation(_))));
        assert!(matches!(decode(duplicate), Err(BiolinkError::Validation(_))));
    }

    #[test]
    fn test_merge_orders_assigns_ids_and_keeps_counters_monotonic() {
        let mut current = sample();
        current.meta.share_count = 5;
        current.meta.unlocked = true;

        let doc = r#"{"handle":"bob","tagline":"t","avatarRef":"/a.png","themePreference":false,
            "shareCount":1,"unlocked":false,
            "links":[
                {"title":"third","url":"u3"},
                {"id":"x","title":"second","url":"u2","sortIndex":7},
                {"id":"y","title":"first","url":"u1","sortIndex":2,"accentColor":"teal"}
            ]}"#;
        let merged = merge(&current, decode(doc).unwrap());

        assert_eq!(merged.meta.handle, "alice");
        assert_eq!(merged.meta.share_count, 5);
        assert!(merged.meta.unlocked);
        assert!(!merged.meta.dark_mode);

        let titles: Vec<_> = merged.links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert!(merged.is_densely_ordered());
        assert_eq!(merged.links[0].accent_color, AccentColor::Purple);
        // "x" / "y" belong to no link of alice
        assert!(merged.links.iter().all(|l| l.id != "x" && l.id != "y"));
        assert!(!merged.links[2].id.is_empty());
        assert_eq!(merged.links[2].icon, None);
    }

    #[test]
    fn test_imported_share_count_over_threshold_unlocks() {
        let current = sample();
        assert!(!current.meta.unlocked);

        let doc = r#"{"handle":"alice","tagline":"t","avatarRef":"/a.png","themePreference":false,
            "shareCount":5,"unlocked":false,"links":[]}"#;
        let merged = merge(&current, decode(doc).unwrap());

        assert_eq!(merged.meta.share_count, 5);
        assert!(merged.meta.unlocked);
    }
}
