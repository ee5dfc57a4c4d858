//! Server-redirect OAuth flow: the authenticator seam and callback parsing.

use std::collections::HashMap;

use tokio::sync::oneshot;
use url::Url;

use crate::error::{MobileServiceError, Result};
use crate::present::SurfaceHandle;

use super::user::MobileServiceUser;

/// Callback parameter carrying the serialized login response.
pub const TOKEN_PARAM: &str = "token";

const ERROR_PARAM: &str = "error";
const ERROR_DESCRIPTION_PARAM: &str = "error_description";

/// Where a redirect flow starts and where the service sends the browser when
/// it is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRequest {
    pub start_uri: Url,
    pub end_uri: Url,
    /// Whether the authenticator should wipe its cookie jar before loading
    /// `start_uri`. Off for logins.
    pub clear_cookies_before_login: bool,
}

impl RedirectRequest {
    pub fn new(start_uri: Url, end_uri: Url) -> Self {
        Self {
            start_uri,
            end_uri,
            clear_cookies_before_login: false,
        }
    }

    /// Check a URL the web view navigated to against the end URI.
    ///
    /// Returns `None` while the flow is still on provider pages.
    pub fn match_redirect(&self, url: &Url) -> Option<AuthenticatorEvent> {
        if !same_endpoint(url, &self.end_uri) {
            return None;
        }
        let payload = CallbackPayload::from_url(url);
        if let Some(error) = payload.get(ERROR_PARAM) {
            let message = payload
                .get(ERROR_DESCRIPTION_PARAM)
                .unwrap_or(error)
                .to_string();
            return Some(AuthenticatorEvent::Error(MobileServiceError::authenticator(message)));
        }
        Some(AuthenticatorEvent::Completed(payload))
    }
}

fn same_endpoint(url: &Url, end_uri: &Url) -> bool {
    url.scheme() == end_uri.scheme()
        && url.host_str() == end_uri.host_str()
        && url.port_or_known_default() == end_uri.port_or_known_default()
        && url.path().trim_end_matches('/') == end_uri.path().trim_end_matches('/')
}

/// Parameters the service appended to the end URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackPayload {
    properties: HashMap<String, String>,
}

impl CallbackPayload {
    pub fn new(properties: HashMap<String, String>) -> Self {
        Self { properties }
    }

    /// Collect query and fragment parameters; fragment values win.
    pub fn from_url(url: &Url) -> Self {
        let mut properties: HashMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if let Some(fragment) = url.fragment() {
            properties.extend(
                url::form_urlencoded::parse(fragment.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned())),
            );
        }
        Self { properties }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Parse the `token` parameter into the user it describes.
    pub fn user(&self) -> Result<MobileServiceUser> {
        let raw = self.get(TOKEN_PARAM).ok_or_else(|| {
            MobileServiceError::InvalidResponse(format!(
                "Login callback is missing the '{TOKEN_PARAM}' parameter"
            ))
        })?;
        let value: serde_json::Value = serde_json::from_str(raw)?;
        MobileServiceUser::from_login_response(value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CallbackPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// How the web authenticator finished.
#[derive(Debug)]
pub enum AuthenticatorEvent {
    /// The browser reached the end URI.
    Completed(CallbackPayload),
    /// The user closed the login UI.
    Canceled,
    Error(MobileServiceError),
}

/// Sending half of a redirect flow's completion signal.
///
/// Handed to the [`WebAuthenticator`]; consuming methods make a second
/// signal impossible. Dropping it unsent reads as a cancellation.
#[derive(Debug)]
pub struct CompletionHandle {
    tx: oneshot::Sender<AuthenticatorEvent>,
}

impl CompletionHandle {
    pub fn complete(self, payload: CallbackPayload) {
        self.send(AuthenticatorEvent::Completed(payload));
    }

    pub fn cancel(self) {
        self.send(AuthenticatorEvent::Canceled);
    }

    pub fn fail(self, error: MobileServiceError) {
        self.send(AuthenticatorEvent::Error(error));
    }

    /// Fail with only a message; wrapped as a generic authenticator error.
    pub fn fail_with_message(self, message: impl Into<String>) {
        self.fail(MobileServiceError::authenticator(message));
    }

    pub fn send(self, event: AuthenticatorEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("login completion dropped, nobody is waiting");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of a redirect flow's completion signal.
#[derive(Debug)]
pub struct CompletionReceiver {
    rx: oneshot::Receiver<AuthenticatorEvent>,
}

impl CompletionReceiver {
    pub async fn wait(self) -> AuthenticatorEvent {
        self.rx.await.unwrap_or(AuthenticatorEvent::Canceled)
    }
}

/// Create a linked completion handle/receiver pair.
pub fn completion_channel() -> (CompletionHandle, CompletionReceiver) {
    let (tx, rx) = oneshot::channel();
    (CompletionHandle { tx }, CompletionReceiver { rx })
}

/// Web view component that drives a redirect flow.
///
/// Implemented by the host: it loads `start_uri`, watches navigations (see
/// [`RedirectRequest::match_redirect`]) and reports the result through the
/// [`CompletionHandle`].
pub trait WebAuthenticator: Send + Sync {
    /// Prepare the login UI and return the surface to present.
    fn start(
        &self,
        request: RedirectRequest,
        completion: CompletionHandle,
    ) -> Result<SurfaceHandle>;

    /// Drop cookies left behind by earlier redirect flows.
    fn clear_cookies(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RedirectRequest {
        RedirectRequest::new(
            Url::parse("https://app.example.com/login/google").unwrap(),
            Url::parse("https://app.example.com/login/done").unwrap(),
        )
    }

    #[test]
    fn provider_pages_do_not_match() {
        let url = Url::parse("https://accounts.google.com/o/oauth2/auth?x=1").unwrap();
        assert!(request().match_redirect(&url).is_none());
        let url = Url::parse("https://app.example.com/login/google").unwrap();
        assert!(request().match_redirect(&url).is_none());
    }

    #[test]
    fn fragment_token_is_collected() {
        let url = Url::parse(
            "https://app.example.com/login/done#token=%7B%22user%22%3A%7B%22userId%22%3A%22Google%3A1%22%7D%2C%22authenticationToken%22%3A%22abc%22%7D",
        )
        .unwrap();
        let event = request()
            .match_redirect(&url)
            .expect("end uri should match");
        let payload = match event {
            AuthenticatorEvent::Completed(payload) => payload,
            other => panic!("expected completion, got {other:?}"),
        };
        let user = payload.user().unwrap();
        assert_eq!(user.user_id, "Google:1");
        assert_eq!(user.authentication_token.as_deref(), Some("abc"));
    }

    #[test]
    fn fragment_overrides_query() {
        let url = Url::parse("https://app.example.com/login/done?a=query&b=1#a=fragment").unwrap();
        let payload = CallbackPayload::from_url(&url);
        assert_eq!(payload.get("a"), Some("fragment"));
        assert_eq!(payload.get("b"), Some("1"));
    }

    #[test]
    fn error_parameter_becomes_error_event() {
        let url = Url::parse(
            "https://app.example.com/login/done#error=access_denied&error_description=User+declined",
        )
        .unwrap();
        match request().match_redirect(&url) {
            Some(AuthenticatorEvent::Error(MobileServiceError::Authenticator { message, .. })) => {
                assert_eq!(message, "User declined");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn payload_without_token_is_invalid_response() {
        let payload: CallbackPayload = [("state", "x")].into_iter().collect();
        assert!(matches!(
            payload.user(),
            Err(MobileServiceError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn dropped_handle_reads_as_cancel() {
        let (handle, receiver) = completion_channel();
        drop(handle);
        assert!(matches!(receiver.wait().await, AuthenticatorEvent::Canceled));
    }

    #[tokio::test]
    async fn handle_delivers_event() {
        let (handle, receiver) = completion_channel();
        handle.fail_with_message("web view crashed");
        match receiver.wait().await {
            AuthenticatorEvent::Error(err) => {
                assert_eq!(err.to_string(), "Authenticator error: web view crashed")
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
