//! Link management commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{LinkDraft, LinkPatch, ProfileLinkStore};
use crate::storage::LinkEntry;

fn print_link(link: &LinkEntry) {
    let icon = link
        .icon
        .as_ref()
        .map(|icon| icon.as_raw().to_string())
        .unwrap_or_else(|| "link".to_string());
    println!(
        "  {} {} -> {} {}",
        format!("[{}]", link.sort_index).dimmed(),
        link.title.cyan(),
        link.url.blue().underline(),
        format!("({}, {}, id {})", icon, link.accent_color, link.id).dimmed()
    );
}

pub(super) fn print_links(links: &[LinkEntry]) {
    if links.is_empty() {
        println!("  {}", "No links yet".dimmed());
    }
    for link in links {
        print_link(link);
    }
}

pub async fn add_link(
    store: &ProfileLinkStore,
    handle: &str,
    draft: LinkDraft,
) -> Result<(), CliError> {
    let mut profile = store.load(handle).await?;
    let link = store.add_link(&mut profile, draft).await?;

    println!("{} Added link to {}:", "✓".bold().green(), profile.handle().magenta());
    print_link(&link);
    Ok(())
}

pub async fn update_link(
    store: &ProfileLinkStore,
    handle: &str,
    id: &str,
    patch: LinkPatch,
) -> Result<(), CliError> {
    let mut profile = store.load(handle).await?;
    let link = store.update_link(&mut profile, id, patch).await?;

    println!("{} Updated link:", "✓".bold().green());
    print_link(&link);
    Ok(())
}

pub async fn remove_link(store: &ProfileLinkStore, handle: &str, id: &str) -> Result<(), CliError> {
    let mut profile = store.load(handle).await?;
    let existed = profile.position_of(id).is_some();
    store.delete_link(&mut profile, id).await?;

    if existed {
        println!("{} Removed link {}", "✓".bold().green(), id.cyan());
    } else {
        println!("{} No link {} in {}", "ℹ".bold().blue(), id.cyan(), handle);
    }
    Ok(())
}

pub async fn move_link(
    store: &ProfileLinkStore,
    handle: &str,
    from: usize,
    to: usize,
) -> Result<(), CliError> {
    let mut profile = store.load(handle).await?;
    let len = profile.links.len();
    if from >= len || to >= len {
        return Err(CliError::CommandError(format!(
            "Positions must be below {} (profile has {} links)",
            len, len
        )));
    }

    let profile = store.reorder(&mut profile, from, Some(to)).await?;

    println!("{} New order:", "✓".bold().green());
    print_links(&profile.links);
    Ok(())
}
