//! CLI login handlers with a terminal-hosted redirect flow.

use std::io::Write;
use std::sync::Arc;

use strum::IntoEnumIterator;
use url::Url;

use crate::auth::{
    AuthenticationProvider, CompletionHandle, LoginOutcome, RedirectRequest, WebAuthenticator,
};
use crate::client::MobileServiceClient;
use crate::config::ClientConfig;
use crate::error::{MobileServiceError, Result};
use crate::present::{
    BarButtonHandle, ControllerHandle, LoginAnchor, LoginPresenter, Rect, SurfaceHandle, ViewHandle,
};

const TERMINAL: ControllerHandle = ControllerHandle(0);

/// Redirect flow driven by the user's own browser: print the start URI, then
/// read back the URL the browser ended on.
pub struct TerminalAuthenticator;

impl WebAuthenticator for TerminalAuthenticator {
    fn start(
        &self,
        request: RedirectRequest,
        completion: CompletionHandle,
    ) -> Result<SurfaceHandle> {
        println!("🔗 Visit: {}", request.start_uri);
        println!("📋 After signing in, paste the URL your browser ended on.");
        println!("   An empty line cancels.");

        tokio::task::spawn_blocking(move || {
            print!("> ");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            if let Err(e) = std::io::stdin().read_line(&mut line) {
                completion.fail(MobileServiceError::authenticator_with_source(
                    "Failed to read callback URL",
                    e,
                ));
                return;
            }
            let line = line.trim();
            if line.is_empty() {
                completion.cancel();
                return;
            }
            let url = match Url::parse(line) {
                Ok(url) => url,
                Err(e) => {
                    completion.fail(MobileServiceError::InvalidUri(e));
                    return;
                }
            };
            match request.match_redirect(&url) {
                Some(event) => completion.send(event),
                None => completion.fail_with_message(format!(
                    "{url} is not the login completion URL {}",
                    request.end_uri
                )),
            }
        });

        Ok(SurfaceHandle(0))
    }

    fn clear_cookies(&self) {}
}

/// Nothing to draw in a terminal; presentation calls only log.
pub struct TerminalPresenter;

impl LoginPresenter for TerminalPresenter {
    fn present_modal(&self, _parent: ControllerHandle, surface: SurfaceHandle) -> Result<()> {
        tracing::debug!(surface = surface.0, "terminal login started");
        Ok(())
    }

    fn present_popover_from_rect(
        &self,
        _view: ViewHandle,
        _rect: Rect,
        surface: SurfaceHandle,
    ) -> Result<()> {
        self.present_modal(TERMINAL, surface)
    }

    fn present_popover_from_bar_button(
        &self,
        _item: BarButtonHandle,
        surface: SurfaceHandle,
    ) -> Result<()> {
        self.present_modal(TERMINAL, surface)
    }

    fn dismiss_modal(&self, _parent: ControllerHandle) {
        tracing::debug!("terminal login finished");
    }

    fn dismiss_popover(&self, _surface: SurfaceHandle) {
        self.dismiss_modal(TERMINAL);
    }
}

/// Resolve the client config from flags, falling back to the environment.
pub fn resolve_config(url: Option<&str>, application_key: Option<&str>) -> Result<ClientConfig> {
    let mut config = match url {
        Some(url) => ClientConfig::from_env_with_uri(Url::parse(url)?)?,
        None => ClientConfig::from_env()?,
    };
    if let Some(key) = application_key {
        config.application_key = Some(key.to_string());
    }
    Ok(config)
}

/// Handle `mobsvc login <provider> [--token <json>]`.
pub async fn handle_login(
    config: ClientConfig,
    provider: &str,
    token: Option<&str>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let token: Option<serde_json::Value> = token.map(serde_json::from_str).transpose()?;
    let client = MobileServiceClient::new(
        config,
        Arc::new(TerminalAuthenticator),
        Arc::new(TerminalPresenter),
    )?;

    match client
        .login_with_provider_name(LoginAnchor::Controller(TERMINAL), provider, token)
        .await?
    {
        LoginOutcome::Success(user) => {
            println!("✅ Logged in as {}", user.user_id);
            if let Some(token) = user.authentication_token {
                println!("   Authentication token: {token}");
            }
            Ok(())
        }
        LoginOutcome::Canceled => {
            eprintln!("❌ Login canceled");
            std::process::exit(1);
        }
        LoginOutcome::Failed(err) => Err(err.into()),
    }
}

/// Handle `mobsvc providers`.
pub fn handle_providers() {
    for provider in AuthenticationProvider::iter() {
        println!("  {provider}");
    }
}
