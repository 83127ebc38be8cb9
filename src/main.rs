use clap::Parser;

use biolink::cli::{Cli, Commands};
use biolink::runtime::modes;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.config.as_deref() {
        Some(path) => {
            if let Err(e) = biolink::config::init_config_from(path) {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        }
        None => biolink::config::init_config(),
    }

    let config = biolink::config::get_config();
    let _log_guard = match biolink::system::logging::init_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    match cli.command {
        None | Some(Commands::Serve) => {
            if let Err(e) = modes::run_server().await {
                eprintln!("Server error: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(command) => {
            if let Err(e) = modes::run_cli(command, cli.secret).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(e.exit_code());
            }
        }
    }
}
