//! The login endpoint's HTTP exchange.

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::auth::{AuthenticationProvider, MobileServiceUser};
use crate::config::ClientConfig;
use crate::error::{MobileServiceError, Result};

pub const APPLICATION_KEY_HEADER: &str = "x-zumo-application";
pub const AUTHENTICATION_HEADER: &str = "x-zumo-auth";
pub const INSTALLATION_ID_HEADER: &str = "x-zumo-installation-id";

pub(crate) fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?)
}

fn login_headers(config: &ClientConfig, auth_token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        INSTALLATION_ID_HEADER,
        header_value(INSTALLATION_ID_HEADER, &config.installation_id)?,
    );
    if let Some(ref key) = config.application_key {
        let value = header_value(APPLICATION_KEY_HEADER, key)?;
        headers.insert(APPLICATION_KEY_HEADER, value);
    }
    if let Some(token) = auth_token {
        let value = header_value(AUTHENTICATION_HEADER, token)?;
        headers.insert(AUTHENTICATION_HEADER, value);
    }
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        MobileServiceError::Configuration(format!("Value for {name} is not a valid header"))
    })
}

/// `POST <base>/login/<provider>` with the provider token; returns the
/// user described by the response.
pub(crate) async fn exchange_provider_token(
    http: &reqwest::Client,
    config: &ClientConfig,
    auth_token: Option<&str>,
    provider: AuthenticationProvider,
    token: &Value,
) -> Result<MobileServiceUser> {
    let url = config.login_uri(provider)?;
    debug!(url = %url, provider = %provider, "exchanging provider token");

    let response = http
        .post(url)
        .headers(login_headers(config, auth_token)?)
        .json(token)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MobileServiceError::from_status(status, &body));
    }

    let body: Value = response.json().await?;
    MobileServiceUser::from_login_response(body)
}
