//! Command-line interface definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// biolink - a link-in-bio profile service
#[derive(Parser)]
#[command(name = "biolink")]
#[command(version)]
#[command(about = "A link-in-bio profile service", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Admin secret for editing commands (falls back to BL_ADMIN_SECRET, then a prompt)
    #[arg(long, global = true, env = "BL_ADMIN_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Create an empty profile
    Create {
        /// 3-20 characters: letters, digits, '_' or '-'
        handle: String,
    },

    /// Show a profile and its links
    Show {
        handle: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a link
    Add {
        handle: String,
        title: String,
        url: String,

        /// Glyph key (github, telegram, ...) or image URL
        #[arg(long)]
        icon: Option<String>,

        /// purple, blue, red, pink, gray or green
        #[arg(long)]
        color: Option<String>,
    },

    /// Update a link
    Update {
        handle: String,
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Remove a link
    Remove { handle: String, id: String },

    /// Move a link from one position to another (zero-based)
    Move {
        handle: String,
        from: usize,
        to: usize,
    },

    /// Record a share of the profile page and print the share link
    Share { handle: String },

    /// Print the public profile URL
    Url { handle: String },

    /// Edit profile metadata
    Profile {
        handle: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        tagline: Option<String>,

        /// Avatar URL (use `avatar` to upload a file)
        #[arg(long)]
        avatar_ref: Option<String>,

        /// Dark mode on or off
        #[arg(long)]
        dark: Option<bool>,
    },

    /// Toggle dark / light theme
    Theme { handle: String },

    /// Upload an avatar image
    Avatar { handle: String, file_path: PathBuf },

    /// Export a profile to JSON
    Export {
        handle: String,

        /// Output file path (default: stdout)
        file_path: Option<PathBuf>,
    },

    /// Replace a profile from a JSON export
    Import { handle: String, file_path: PathBuf },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Commands that need an unlocked edit session.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Commands::Create { .. }
                | Commands::Add { .. }
                | Commands::Update { .. }
                | Commands::Remove { .. }
                | Commands::Move { .. }
                | Commands::Share { .. }
                | Commands::Profile { .. }
                | Commands::Theme { .. }
                | Commands::Avatar { .. }
                | Commands::Import { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_options() {
        let cli = Cli::try_parse_from([
            "biolink", "add", "alice", "GitHub", "https://github.com/alice", "--icon", "github",
            "--color", "gray",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Add {
                handle,
                icon,
                color,
                ..
            }) => {
                assert_eq!(handle, "alice");
                assert_eq!(icon.as_deref(), Some("github"));
                assert_eq!(color.as_deref(), Some("gray"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "biolink", "move", "alice", "0", "2", "--secret", "pw", "-c", "x.toml",
        ])
        .unwrap();
        assert_eq!(cli.secret.as_deref(), Some("pw"));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(cli.command.unwrap().is_mutating());
    }

    #[test]
    fn test_read_only_commands() {
        let cli = Cli::try_parse_from(["biolink", "export", "alice"]).unwrap();
        assert!(!cli.command.unwrap().is_mutating());
        let cli = Cli::try_parse_from(["biolink", "url", "alice"]).unwrap();
        assert!(!cli.command.unwrap().is_mutating());
    }
}
