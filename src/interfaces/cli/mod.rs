//! CLI interface module
//!
//! Every editing command opens an edit session first and only runs once
//! the admin secret has been accepted.

pub mod commands;

use std::fmt;

use crate::auth::EditSession;
use crate::cli::{Commands, ConfigCommands};
use crate::errors::BiolinkError;
use crate::services::{LinkDraft, LinkPatch, ProfileLinkStore, ProfilePatch};

#[derive(Debug)]
pub enum CliError {
    /// Rejected by the profile store or one of its collaborators
    Domain(BiolinkError),
    /// Admin secret missing or wrong
    AccessDenied(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::Domain(err) => err.format_simple(),
            CliError::AccessDenied(msg) => format!("Access denied: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::Domain(err) => err.format_colored(),
            CliError::AccessDenied(msg) => {
                format!("{} {}", "Access denied:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }

    /// Process exit code
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::AccessDenied(_) => 3,
            CliError::Domain(BiolinkError::NotFound(_)) => 4,
            CliError::Domain(_) => 1,
            CliError::CommandError(_) => 2,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<BiolinkError> for CliError {
    fn from(err: BiolinkError) -> Self {
        CliError::Domain(err)
    }
}

/// Resolve the admin secret: `--secret` / `BL_ADMIN_SECRET` first, then an interactive prompt.
fn read_secret(secret: Option<String>) -> Result<String, CliError> {
    match secret {
        Some(secret) => Ok(secret),
        None => rpassword::prompt_password("Admin secret: ").map_err(|e| {
            CliError::AccessDenied(format!(
                "No secret given and the prompt failed ({}); use --secret or BL_ADMIN_SECRET",
                e
            ))
        }),
    }
}

/// Walk the edit session to `Editor` or fail with the rejection message.
pub fn unlock_editing(
    store: &ProfileLinkStore,
    secret: Option<String>,
) -> Result<EditSession, CliError> {
    let mut session = EditSession::new(store.authenticator());
    session.open_login_dialog();
    session.submit(&read_secret(secret)?);

    if session.can_edit() {
        Ok(session)
    } else {
        let reason = session.last_error().unwrap_or("edit mode is locked").to_string();
        session.cancel();
        Err(CliError::AccessDenied(reason))
    }
}

/// Run one profile command against `store`.
///
/// `Serve` and `Config` are handled by the caller and rejected here.
pub async fn execute(
    store: &ProfileLinkStore,
    command: Commands,
    secret: Option<String>,
) -> Result<(), CliError> {
    let mut session = if command.is_mutating() {
        Some(unlock_editing(store, secret)?)
    } else {
        None
    };

    let result = match command {
        Commands::Create { handle } => commands::create_profile(store, &handle).await,
        Commands::Show { handle, json } => commands::show_profile(store, &handle, json).await,
        Commands::Add {
            handle,
            title,
            url,
            icon,
            color,
        } => {
            let draft = LinkDraft {
                title,
                url,
                icon,
                accent_color: color,
            };
            commands::add_link(store, &handle, draft).await
        }
        Commands::Update {
            handle,
            id,
            title,
            url,
            icon,
            color,
        } => {
            let patch = LinkPatch {
                title,
                url,
                icon,
                accent_color: color,
            };
            commands::update_link(store, &handle, &id, patch).await
        }
        Commands::Remove { handle, id } => commands::remove_link(store, &handle, &id).await,
        Commands::Move { handle, from, to } => {
            commands::move_link(store, &handle, from, to).await
        }
        Commands::Share { handle } => commands::record_share(store, &handle).await,
        Commands::Url { handle } => commands::profile_url(store, &handle).await,
        Commands::Profile {
            handle,
            name,
            tagline,
            avatar_ref,
            dark,
        } => {
            let patch = ProfilePatch {
                display_name: name,
                tagline,
                avatar_ref,
                dark_mode: dark,
            };
            commands::edit_profile(store, &handle, patch).await
        }
        Commands::Theme { handle } => commands::toggle_theme(store, &handle).await,
        Commands::Avatar { handle, file_path } => {
            commands::upload_avatar(store, &handle, &file_path).await
        }
        Commands::Export { handle, file_path } => {
            commands::export_profile(store, &handle, file_path.as_deref()).await
        }
        Commands::Import { handle, file_path } => {
            commands::import_profile(store, &handle, &file_path).await
        }
        Commands::Serve | Commands::Config { .. } => Err(CliError::CommandError(
            "command is not a profile operation".to_string(),
        )),
    };

    if let Some(session) = session.as_mut() {
        session.logout();
    }
    result
}

/// Run commands that need no storage.
pub async fn run_config_command(action: ConfigCommands) -> Result<(), CliError> {
    match action {
        ConfigCommands::Generate { output_path, force } => {
            commands::config_generate(output_path, force).await
        }
    }
}
