//! Public profile address and the WhatsApp share link built from it

use serde::Serialize;

/// Text placed in front of the profile URL in the share message.
pub const SHARE_MESSAGE: &str = "Check out my bio page!";

const WHATSAPP_SHARE_BASE: &str = "https://wa.me/?text=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinks {
    /// `{base}/u/{handle}`
    pub profile_url: String,
    /// WhatsApp deep link carrying the message and `profile_url`.
    pub share_link: String,
}

/// An empty base yields a root-relative `/u/{handle}`.
pub fn profile_url(public_base_url: &str, handle: &str) -> String {
    format!(
        "{}/u/{}",
        public_base_url.trim_end_matches('/'),
        urlencoding::encode(handle)
    )
}

pub fn share_links(public_base_url: &str, handle: &str) -> ShareLinks {
    let profile_url = profile_url(public_base_url, handle);
    let message = format!("{} {}", SHARE_MESSAGE, profile_url);
    let share_link = format!("{}{}", WHATSAPP_SHARE_BASE, urlencoding::encode(&message));

    ShareLinks {
        profile_url,
        share_link,
    }
}
