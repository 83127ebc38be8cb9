//! Generate config command

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

/// Write a sample configuration file
pub async fn config_generate(output_path: Option<PathBuf>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| PathBuf::from("config.example.toml"));

    // 文件已存在时，非 --force 模式下交互确认
    if !force && path.exists() {
        print!(
            "{} {} {}",
            "File already exists:".yellow(),
            path.display().to_string().blue(),
            "Overwrite? [y/N] ".yellow()
        );
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;

        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", "Aborted.".red());
            return Ok(());
        }
    }

    StaticConfig::default().save_to_file(&path).map_err(|e| {
        CliError::CommandError(format!("Unable to write configuration file: {}", e))
    })?;

    println!(
        "{} {}",
        "Configuration file generated:".green(),
        path.display().to_string().blue()
    );
    println!(
        "  {}",
        "Set admin.secret before using editing commands".yellow()
    );
    Ok(())
}
