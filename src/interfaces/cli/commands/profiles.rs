//! Profile commands

use std::path::Path;

use colored::Colorize;

use super::links::print_links;
use crate::interfaces::cli::CliError;
use crate::services::{ProfileLinkStore, ProfilePatch, SHARES_TO_UNLOCK};
use crate::storage::ProfileRecord;

fn print_profile(store: &ProfileLinkStore, profile: &ProfileRecord) {
    let meta = &profile.meta;
    println!("{} {}", meta.display_name.bold(), format!("@{}", meta.handle).magenta());
    println!("  {}", meta.tagline.italic());
    println!(
        "  {} {}",
        "page:".dimmed(),
        store.share_links(profile).profile_url.blue().underline()
    );
    println!("  {} {}", "avatar:".dimmed(), meta.avatar_ref);
    println!(
        "  {} {}",
        "theme:".dimmed(),
        if meta.dark_mode { "dark" } else { "light" }
    );
    let limit = if meta.unlocked {
        "unlimited links".green().to_string()
    } else {
        format!(
            "{}/{} shares to unlock more links",
            meta.share_count, SHARES_TO_UNLOCK
        )
        .yellow()
        .to_string()
    };
    println!("  {} {}", "gating:".dimmed(), limit);
    println!();
    print_links(&profile.links);
}

pub async fn create_profile(store: &ProfileLinkStore, handle: &str) -> Result<(), CliError> {
    let profile = store.create_profile(handle).await?;
    println!("{} Created profile {}", "✓".bold().green(), profile.handle().magenta());
    Ok(())
}

pub async fn show_profile(
    store: &ProfileLinkStore,
    handle: &str,
    json: bool,
) -> Result<(), CliError> {
    let profile = store.load(handle).await?;
    if json {
        println!("{}", store.export_snapshot(&profile)?);
    } else {
        print_profile(store, &profile);
    }
    Ok(())
}

pub async fn record_share(store: &ProfileLinkStore, handle: &str) -> Result<(), CliError> {
    let mut profile = store.load(handle).await?;
    let outcome = store.record_share(&mut profile).await?;

    if outcome.just_unlocked {
        println!("{} Unlimited links unlocked!", "🎉".bold());
    } else if outcome.unlocked {
        println!("{} Share recorded ({} total)", "✓".bold().green(), outcome.share_count);
    } else {
        println!(
            "{} Share recorded, {} more to unlock unlimited links",
            "✓".bold().green(),
            outcome.remaining.to_string().yellow()
        );
    }

    let links = store.share_links(&profile);
    println!("  {} {}", "page:".dimmed(), links.profile_url.blue().underline());
    println!("  {} {}", "WhatsApp:".dimmed(), links.share_link.blue().underline());
    Ok(())
}

/// Plain output so it can be piped into a clipboard tool.
pub async fn profile_url(store: &ProfileLinkStore, handle: &str) -> Result<(), CliError> {
    let profile = store.load(handle).await?;
    println!("{}", store.share_links(&profile).profile_url);
    Ok(())
}

pub async fn edit_profile(
    store: &ProfileLinkStore,
    handle: &str,
    patch: ProfilePatch,
) -> Result<(), CliError> {
    if patch.is_empty() {
        return Err(CliError::CommandError(
            "Nothing to change; pass --name, --tagline, --avatar-ref or --dark".to_string(),
        ));
    }

    let mut profile = store.load(handle).await?;
    store.update_profile(&mut profile, patch).await?;

    println!("{} Profile updated", "✓".bold().green());
    print_profile(store, &profile);
    Ok(())
}

pub async fn toggle_theme(store: &ProfileLinkStore, handle: &str) -> Result<(), CliError> {
    let mut profile = store.load(handle).await?;
    let dark = store.toggle_theme(&mut profile).await?;
    println!(
        "{} Theme is now {}",
        "✓".bold().green(),
        if dark { "dark" } else { "light" }.cyan()
    );
    Ok(())
}

pub async fn upload_avatar(
    store: &ProfileLinkStore,
    handle: &str,
    file_path: &Path,
) -> Result<(), CliError> {
    let bytes = tokio::fs::read(file_path).await.map_err(|e| {
        CliError::CommandError(format!("Cannot read {}: {}", file_path.display(), e))
    })?;
    let file_name = file_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("avatar");

    let mut profile = store.load(handle).await?;
    let url = store.upload_avatar(&mut profile, file_name, &bytes).await?;

    println!("{} Avatar uploaded: {}", "✓".bold().green(), url.blue().underline());
    Ok(())
}
