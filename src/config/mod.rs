//! Client configuration (code > env).

use std::fmt;
use std::time::Duration;

use bon::Builder;
use url::Url;

use crate::auth::AuthenticationProvider;
use crate::error::{MobileServiceError, Result};

/// Relative path of the login endpoints.
pub const LOGIN_PATH: &str = "login";

/// Relative path the redirect flow finishes on.
pub const LOGIN_DONE_PATH: &str = "login/done";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_URL: &str = "MOBILE_SERVICE_URL";
const ENV_APPLICATION_KEY: &str = "MOBILE_SERVICE_APPLICATION_KEY";
const ENV_TIMEOUT_SECS: &str = "MOBILE_SERVICE_TIMEOUT_SECS";

/// Connection settings for a mobile service application.
///
/// # Example
/// ```
/// use mobile_services::config::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .application_uri("https://todo.azure-mobile.net".parse().unwrap())
///     .application_key("secret".to_string())
///     .build();
/// assert_eq!(
///     config.login_done_uri().unwrap().as_str(),
///     "https://todo.azure-mobile.net/login/done"
/// );
/// ```
#[derive(Clone, Builder)]
pub struct ClientConfig {
    pub application_uri: Url,
    pub application_key: Option<String>,
    #[builder(default = uuid::Uuid::new_v4().to_string())]
    pub installation_id: String,
    #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))]
    pub request_timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("application_uri", &self.application_uri.as_str())
            .field("application_key", &self.application_key.as_ref().map(|_| ".."))
            .field("installation_id", &self.installation_id)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Config for `application_uri` with every other setting defaulted.
    pub fn new(application_uri: Url) -> Self {
        Self::builder().application_uri(application_uri).build()
    }

    /// Load from environment variables (`MOBILE_SERVICE_URL`, etc.).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let raw_uri = std::env::var(ENV_URL).map_err(|_| {
            MobileServiceError::Configuration(format!("Environment variable {ENV_URL} not set"))
        })?;
        Self::new(Url::parse(&raw_uri)?).with_env_overrides()
    }

    /// Like [`ClientConfig::from_env`], but for an application URI the caller
    /// already has. `MOBILE_SERVICE_URL` is not read.
    pub fn from_env_with_uri(application_uri: Url) -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::new(application_uri).with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(key) = std::env::var(ENV_APPLICATION_KEY) {
            if !key.trim().is_empty() {
                self.application_key = Some(key);
            }
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                MobileServiceError::Configuration(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            self.request_timeout = Duration::from_secs(secs);
        }

        Ok(self)
    }

    /// Application URI with a trailing slash so relative joins keep its path.
    pub fn base_uri(&self) -> Url {
        let mut base = self.application_uri.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base
    }

    /// `<application_uri>/login/<provider>`, used both as the token exchange
    /// endpoint and as the redirect flow start URI.
    pub fn login_uri(&self, provider: AuthenticationProvider) -> Result<Url> {
        Ok(self
            .base_uri()
            .join(&format!("{LOGIN_PATH}/{}", provider.as_str()))?)
    }

    /// `<application_uri>/login/done`.
    pub fn login_done_uri(&self) -> Result<Url> {
        Ok(self.base_uri().join(LOGIN_DONE_PATH)?)
    }
}
