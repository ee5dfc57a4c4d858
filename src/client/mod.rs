//! Login coordinator for a mobile service application.

pub mod request;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::redirect::completion_channel;
use crate::auth::{
    AuthenticationProvider, AuthenticatorEvent, LoginGuard, LoginOutcome, MobileServiceUser,
    RedirectRequest, SessionState, WebAuthenticator,
};
use crate::config::ClientConfig;
use crate::error::{MobileServiceError, Result};
use crate::present::{LoginAnchor, LoginPresenter, Presentation};

/// Which way a login obtains its session token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LoginFlow {
    /// Web view through the server-side OAuth dance, shown from the anchor.
    Redirect(LoginAnchor),
    /// Trade a token the provider's own SDK issued; no UI involved.
    TokenExchange(Value),
}

impl LoginFlow {
    fn kind(&self) -> &'static str {
        match self {
            Self::Redirect(_) => "redirect",
            Self::TokenExchange(_) => "token_exchange",
        }
    }
}

/// Client for logging users into a mobile service.
///
/// One login may be in flight at a time; a second call fails with
/// [`MobileServiceError::LoginInProgress`] instead of queueing.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use mobile_services::auth::{AuthenticationProvider, WebAuthenticator};
/// use mobile_services::client::MobileServiceClient;
/// use mobile_services::config::ClientConfig;
/// use mobile_services::present::{ControllerHandle, LoginAnchor, LoginPresenter};
///
/// # async fn example(
/// #     authenticator: Arc<dyn WebAuthenticator>,
/// #     presenter: Arc<dyn LoginPresenter>,
/// # ) -> mobile_services::error::Result<()> {
/// let config = ClientConfig::from_env()?;
/// let client = MobileServiceClient::new(config, authenticator, presenter)?;
/// let user = client
///     .login(LoginAnchor::Controller(ControllerHandle(1)), AuthenticationProvider::Google)
///     .await?
///     .into_result()?;
/// println!("logged in as {}", user.user_id);
/// # Ok(())
/// # }
/// ```
pub struct MobileServiceClient {
    config: ClientConfig,
    http: reqwest::Client,
    session: SessionState,
    authenticator: Arc<dyn WebAuthenticator>,
    presenter: Arc<dyn LoginPresenter>,
}

impl fmt::Debug for MobileServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MobileServiceClient")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl MobileServiceClient {
    pub fn new(
        config: ClientConfig,
        authenticator: Arc<dyn WebAuthenticator>,
        presenter: Arc<dyn LoginPresenter>,
    ) -> Result<Self> {
        let http = request::build_http_client(&config)?;
        Ok(Self {
            config,
            http,
            session: SessionState::new(),
            authenticator,
            presenter,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn current_user(&self) -> Option<MobileServiceUser> {
        self.session.current_user()
    }

    /// Install a user whose session token was obtained elsewhere.
    pub fn set_current_user(&self, user: Option<MobileServiceUser>) {
        self.session.set_current_user(user);
    }

    pub fn login_in_progress(&self) -> bool {
        self.session.login_in_progress()
    }

    /// Log in through the provider's web login, presented from `anchor`.
    pub async fn login(
        &self,
        anchor: LoginAnchor,
        provider: AuthenticationProvider,
    ) -> Result<LoginOutcome> {
        self.send_login(LoginFlow::Redirect(anchor), || Ok(provider)).await
    }

    /// Log in by exchanging a token issued by the provider's own SDK, e.g.
    /// `{"access_token": "..."}`.
    pub async fn login_with_token(
        &self,
        provider: AuthenticationProvider,
        token: Value,
    ) -> Result<LoginOutcome> {
        self.send_login(LoginFlow::TokenExchange(token), || Ok(provider)).await
    }

    /// Log in with a provider given by name; a token selects the exchange
    /// flow, otherwise the redirect flow is shown from `anchor`.
    pub async fn login_with_provider_name(
        &self,
        anchor: LoginAnchor,
        provider: &str,
        token: Option<Value>,
    ) -> Result<LoginOutcome> {
        let flow = match token {
            Some(token) => LoginFlow::TokenExchange(token),
            None => LoginFlow::Redirect(anchor),
        };
        self.send_login(flow, || AuthenticationProvider::parse(provider)).await
    }

    /// Run `flow` for the resolved provider.
    ///
    /// `Err` means a precondition failed and nothing was shown or sent; every
    /// other ending is reported through [`LoginOutcome`].
    pub(crate) async fn send_login(
        &self,
        flow: LoginFlow,
        provider: impl FnOnce() -> Result<AuthenticationProvider>,
    ) -> Result<LoginOutcome> {
        let (_guard, provider) = self.begin_login(provider)?;
        debug!(provider = %provider, flow = flow.kind(), "login started");

        let outcome = match flow {
            LoginFlow::TokenExchange(token) => self.exchange_token(provider, &token).await,
            LoginFlow::Redirect(anchor) => self.redirect_login(anchor, provider).await,
        };

        match &outcome {
            LoginOutcome::Success(user) => {
                self.session.set_current_user(Some(user.clone()));
                debug!(provider = %provider, user_id = %user.user_id, "login succeeded");
            }
            LoginOutcome::Canceled => debug!(provider = %provider, "login canceled"),
            LoginOutcome::Failed(err) => warn!(provider = %provider, error = %err, "login failed"),
        }
        Ok(outcome)
    }

    /// Forget the current user and the redirect flow's cookies.
    pub fn logout(&self) {
        self.session.set_current_user(None);
        self.authenticator.clear_cookies();
        debug!("logged out");
    }

    fn begin_login(
        &self,
        provider: impl FnOnce() -> Result<AuthenticationProvider>,
    ) -> Result<(LoginGuard<'_>, AuthenticationProvider)> {
        if self.session.login_in_progress() {
            return Err(MobileServiceError::LoginInProgress);
        }
        let provider = provider()?;
        let guard = self.session.begin_login()?;
        Ok((guard, provider))
    }

    async fn exchange_token(
        &self,
        provider: AuthenticationProvider,
        token: &Value,
    ) -> LoginOutcome {
        let auth_token = self.session.authentication_token();
        match request::exchange_provider_token(
            &self.http,
            &self.config,
            auth_token.as_deref(),
            provider,
            token,
        )
        .await
        {
            Ok(user) => LoginOutcome::Success(user),
            Err(err) => LoginOutcome::Failed(err),
        }
    }

    async fn redirect_login(
        &self,
        anchor: LoginAnchor,
        provider: AuthenticationProvider,
    ) -> LoginOutcome {
        match self.try_redirect_login(anchor, provider).await {
            Ok(outcome) => outcome,
            Err(err) => LoginOutcome::Failed(err),
        }
    }

    async fn try_redirect_login(
        &self,
        anchor: LoginAnchor,
        provider: AuthenticationProvider,
    ) -> Result<LoginOutcome> {
        let request = RedirectRequest::new(
            self.config.login_uri(provider)?,
            self.config.login_done_uri()?,
        );
        let (completion, receiver) = completion_channel();
        let surface = self.authenticator.start(request, completion)?;

        let presentation = Presentation::from(anchor);
        debug!(
            presentation = presentation.kind(),
            "presenting login surface"
        );
        let presented = presentation.present(self.presenter.as_ref(), surface)?;

        let event = receiver.wait().await;
        presented.dismiss();

        Ok(match event {
            AuthenticatorEvent::Completed(payload) => LoginOutcome::Success(payload.user()?),
            AuthenticatorEvent::Canceled => LoginOutcome::Canceled,
            AuthenticatorEvent::Error(err) => LoginOutcome::Failed(err),
        })
    }
}
