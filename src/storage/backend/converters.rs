use chrono::Utc;

use crate::errors::{BiolinkError, Result};
use crate::storage::models::{AccentColor, Icon, LinkEntry, ProfileMeta, normalize_handle};
use migration::entities::{bio_link, bio_profile};

/// 将 profile Model 转换为 ProfileMeta
pub fn model_to_meta(model: bio_profile::Model) -> ProfileMeta {
    ProfileMeta {
        handle: model.handle,
        display_name: model.display_name,
        tagline: model.tagline,
        avatar_ref: model.avatar_ref,
        dark_mode: model.dark_mode,
        share_count: model.share_count.clamp(0, u32::MAX as i64) as u32,
        unlocked: model.links_unlocked,
    }
}

pub fn meta_to_active_model(meta: &ProfileMeta) -> bio_profile::ActiveModel {
    use sea_orm::ActiveValue::*;

    bio_profile::ActiveModel {
        handle: Set(normalize_handle(&meta.handle)),
        display_name: Set(meta.display_name.clone()),
        tagline: Set(meta.tagline.clone()),
        avatar_ref: Set(meta.avatar_ref.clone()),
        dark_mode: Set(meta.dark_mode),
        share_count: Set(meta.share_count as i64),
        links_unlocked: Set(meta.unlocked),
        updated_at: Set(Utc::now()),
    }
}

/// 将 link Model 转换为 LinkEntry
pub fn model_to_link(model: bio_link::Model) -> LinkEntry {
    LinkEntry {
        id: model.id,
        title: model.title,
        url: model.url,
        icon: model.icon.as_deref().and_then(Icon::parse),
        accent_color: AccentColor::from_tag(Some(&model.color)),
        sort_index: model.sort_order.max(0) as u32,
    }
}

/// `sort_order` 列为 i32，超出范围的位置拒绝写入
pub fn link_to_active_model(handle: &str, link: &LinkEntry) -> Result<bio_link::ActiveModel> {
    use sea_orm::ActiveValue::*;

    let sort_order = i32::try_from(link.sort_index).map_err(|_| {
        BiolinkError::validation(format!(
            "Link '{}' position {} is out of range",
            link.id, link.sort_index
        ))
    })?;

    Ok(bio_link::ActiveModel {
        id: Set(link.id.clone()),
        profile_handle: Set(normalize_handle(handle)),
        title: Set(link.title.clone()),
        url: Set(link.url.clone()),
        icon: Set(link.icon.as_ref().map(|icon| icon.as_raw().to_string())),
        color: Set(link.accent_color.to_string()),
        sort_order: Set(sort_order),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{BiolinkError, Result};
use crate::storage::models::IconGlyph;
    use sea_orm::ActiveValue;

    fn create_test_link_model() -> bio_link::Model {
        bio_link::Model {
            id: "l1".to_string(),
            profile_handle: "alice".to_string(),
            title: "GitHub".to_string(),
            url: "https://github.com/alice".to_string(),
            icon: Some("github".to_string()),
            color: "gray".to_string(),
            sort_order: 3,
        }
    }

    #[test]
    fn test_model_to_link_resolves_icon_and_color() {
        let link = model_to_link(create_test_link_model());

        assert_eq!(link.icon, Some(Icon::Symbolic(IconGlyph::Github)));
        assert_eq!(link.accent_color, AccentColor::Gray);
        assert_eq!(link.sort_index, 3);
    }

    #[test]
    fn test_model_to_link_unknown_color_and_negative_order() {
        let mut model = create_test_link_model();
        model.color = "chartreuse".to_string();
        model.sort_order = -4;
        model.icon = None;

        let link = model_to_link(model);
        assert_eq!(link.accent_color, AccentColor::Purple);
        assert_eq!(link.sort_index, 0);
        assert!(link.icon.is_none());
    }

    #[test]
    fn test_link_to_active_model_lowercases_handle() {
        let link = model_to_link(create_test_link_model());
        let active_model = link_to_active_model("Alice", &link).unwrap();

        assert!(matches!(active_model.profile_handle, ActiveValue::Set(ref h) if h == "alice"));
        assert!(matches!(active_model.icon, ActiveValue::Set(Some(ref i)) if i == "github"));
        assert!(matches!(active_model.color, ActiveValue::Set(ref c) if c == "gray"));
    }

    #[test]
    fn test_link_position_beyond_i32_is_rejected() {
        let mut link = model_to_link(create_test_link_model());
        link.sort_index = u32::MAX;

        assert!(matches!(
            link_to_active_model("alice", &link),
            Err(BiolinkError::Validation(_))
        ));
    }

    #[test]
    fn test_meta_conversion_clamps_share_count() {
        let model = bio_profile::Model {
            handle: "bob".to_string(),
            display_name: "Bob".to_string(),
            tagline: "hi".to_string(),
            avatar_ref: "/a.png".to_string(),
            dark_mode: false,
            share_count: -1,
            links_unlocked: true,
            updated_at: Utc::now(),
        };

        let meta = model_to_meta(model);
        assert_eq!(meta.share_count, 0);
        assert!(meta.unlocked);
        assert!(!meta.dark_mode);
    }
}
