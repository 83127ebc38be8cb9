//! Import / export commands

use std::path::Path;

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::ProfileLinkStore;

pub async fn export_profile(
    store: &ProfileLinkStore,
    handle: &str,
    file_path: Option<&Path>,
) -> Result<(), CliError> {
    let profile = store.load(handle).await?;
    let json = store.export_snapshot(&profile)?;

    match file_path {
        Some(path) => {
            tokio::fs::write(path, json).await.map_err(|e| {
                CliError::CommandError(format!("Cannot write {}: {}", path.display(), e))
            })?;
            eprintln!(
                "{} Exported {} links to {}",
                "✓".bold().green(),
                profile.links.len(),
                path.display().to_string().blue()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub async fn import_profile(
    store: &ProfileLinkStore,
    handle: &str,
    file_path: &Path,
) -> Result<(), CliError> {
    let json = tokio::fs::read_to_string(file_path).await.map_err(|e| {
        CliError::CommandError(format!("Cannot read {}: {}", file_path.display(), e))
    })?;

    let mut profile = store.load(handle).await?;
    let imported = store.import_snapshot(&mut profile, &json).await?;

    println!(
        "{} Imported {} links into {}",
        "✓".bold().green(),
        imported.links.len(),
        imported.handle().magenta()
    );
    Ok(())
}
