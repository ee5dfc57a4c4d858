//! mobsvc CLI binary entry point.

use clap::Parser;
use mobile_services::cli::auth::{handle_login, handle_providers, resolve_config};
use mobile_services::cli::{Cli, Commands, LoginArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login(ref args) => run_login(&cli, args).await,
        Commands::Providers => {
            handle_providers();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_login(cli: &Cli, args: &LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(cli.url.as_deref(), cli.application_key.as_deref())?;
    handle_login(config, &args.provider, args.token.as_deref()).await
}
