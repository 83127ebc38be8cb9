//! Free-tier link limit and share-to-unlock
//!
//! Advisory only: nothing outside this process enforces it.

use serde::Serialize;

use crate::storage::{ProfileMeta, ProfileRecord};

/// Links a locked profile may hold.
pub const FREE_LINK_LIMIT: usize = 2;

/// Shares needed to lift the limit for good.
pub const SHARES_TO_UNLOCK: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareOutcome {
    pub share_count: u32,
    pub unlocked: bool,
    /// `true` only for the share that flipped the latch.
    pub just_unlocked: bool,
    /// Shares still missing, 0 once unlocked.
    pub remaining: u32,
}

pub fn can_add_link(profile: &ProfileRecord) -> bool {
    profile.meta.unlocked || profile.links.len() < FREE_LINK_LIMIT
}

/// Count one share on `meta`. The unlock latch never goes back to `false`.
pub fn apply_share(meta: &mut ProfileMeta) -> ShareOutcome {
    let was_unlocked = meta.unlocked;
    meta.share_count = meta.share_count.saturating_add(1);
    if meta.share_count >= SHARES_TO_UNLOCK {
        meta.unlocked = true;
    }

    ShareOutcome {
        share_count: meta.share_count,
        unlocked: meta.unlocked,
        just_unlocked: meta.unlocked && !was_unlocked,
        remaining: if meta.unlocked {
            0
        } else {
            SHARES_TO_UNLOCK - meta.share_count
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{AccentColor, LinkEntry};

    fn profile_with(links: usize, unlocked: bool) -> ProfileRecord {
        let mut meta = ProfileMeta::new("gate");
        meta.unlocked = unlocked;
        let links = (0..links)
            .map(|i| LinkEntry {
                id: format!("l{}", i),
                title: format!("Link {}", i),
                url: "https://example.com".to_string(),
                icon: None,
                accent_color: AccentColor::Purple,
                sort_index: i as u32,
            })
            .collect();
        ProfileRecord::new(meta, links)
    }

    #[test]
    fn test_can_add_link_truth_table() {
        for links in 0..5 {
            for unlocked in [false, true] {
                let expected = !(!unlocked && links >= FREE_LINK_LIMIT);
                assert_eq!(
                    can_add_link(&profile_with(links, unlocked)),
                    expected,
                    "links={} unlocked={}",
                    links,
                    unlocked
                );
            }
        }
    }

    #[test]
    fn test_second_share_unlocks_once() {
        let mut meta = ProfileMeta::new("gate");

        let first = apply_share(&mut meta);
        assert_eq!(first.share_count, 1);
        assert!(!first.unlocked);
        assert_eq!(first.remaining, 1);

        let second = apply_share(&mut meta);
        assert!(second.unlocked);
        assert!(second.just_unlocked);
        assert_eq!(second.remaining, 0);

        let third = apply_share(&mut meta);
        assert!(third.unlocked);
        assert!(!third.just_unlocked);
        assert_eq!(third.share_count, 3);
    }

    #[test]
    fn test_unlock_survives_link_removal() {
        let mut profile = profile_with(4, false);
        apply_share(&mut profile.meta);
        apply_share(&mut profile.meta);
        profile.links.clear();
        assert!(profile.meta.unlocked);
        profile.links = profile_with(5, false).links;
        assert!(can_add_link(&profile));
    }
}
