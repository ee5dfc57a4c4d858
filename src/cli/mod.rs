//! CLI entry point for mobile-services.

pub mod auth;

use clap::{Parser, Subcommand};

/// Mobile services login CLI
#[derive(Parser, Debug)]
#[command(name = "mobsvc", version, about = "Log in to a mobile service app")]
pub struct Cli {
    /// Application URI (defaults to MOBILE_SERVICE_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Application key (defaults to MOBILE_SERVICE_APPLICATION_KEY)
    #[arg(long, global = true)]
    pub application_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with an identity provider
    Login(LoginArgs),
    /// List supported identity providers
    Providers,
}

/// Arguments for `mobsvc login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Provider to log in with (microsoftaccount, google, twitter, facebook,
    /// windowsazureactivedirectory)
    pub provider: String,

    /// Provider-issued token as JSON; skips the browser flow
    #[arg(long)]
    pub token: Option<String>,
}
