#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mobile_services::auth::{
    AuthenticatorEvent, CallbackPayload, CompletionHandle, RedirectRequest, WebAuthenticator,
};
use mobile_services::client::MobileServiceClient;
use mobile_services::config::ClientConfig;
use mobile_services::error::{MobileServiceError, Result};
use mobile_services::present::{
    BarButtonHandle, ControllerHandle, LoginPresenter, Rect, SurfaceHandle, ViewHandle,
};
use serde_json::json;

pub const SURFACE: SurfaceHandle = SurfaceHandle(77);

/// What the fake does once a redirect flow starts.
pub enum Script {
    /// Keep the completion handle until the test calls `finish`.
    Hold,
    /// Report this event straight away.
    Immediately(AuthenticatorEvent),
    /// Refuse to build the login UI.
    FailToStart,
    /// Drop the completion handle without reporting anything.
    DropCompletion,
}

pub struct FakeAuthenticator {
    script: Mutex<Option<Script>>,
    requests: Mutex<Vec<RedirectRequest>>,
    pending: Mutex<Option<CompletionHandle>>,
    cookie_clears: AtomicUsize,
}

impl FakeAuthenticator {
    pub fn new(script: Script) -> Self {
        Self {
            script: Mutex::new(Some(script)),
            requests: Mutex::new(Vec::new()),
            pending: Mutex::new(None),
            cookie_clears: AtomicUsize::new(0),
        }
    }

    pub fn holding() -> Self {
        Self::new(Script::Hold)
    }

    pub fn silent() -> Self {
        Self::new(Script::DropCompletion)
    }

    pub fn completing_with(user_id: &str, token: &str) -> Self {
        Self::new(Script::Immediately(AuthenticatorEvent::Completed(
            callback_payload(user_id, token),
        )))
    }

    pub fn requests(&self) -> Vec<RedirectRequest> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .clone()
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .expect("pending lock poisoned")
            .is_some()
    }

    pub fn finish(&self, event: AuthenticatorEvent) {
        let handle = self
            .pending
            .lock()
            .expect("pending lock poisoned")
            .take()
            .expect("no redirect flow is waiting");
        handle.send(event);
    }

    pub fn cookie_clears(&self) -> usize {
        self.cookie_clears.load(Ordering::SeqCst)
    }
}

impl WebAuthenticator for FakeAuthenticator {
    fn start(
        &self,
        request: RedirectRequest,
        completion: CompletionHandle,
    ) -> Result<SurfaceHandle> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request);
        let script = self
            .script
            .lock()
            .expect("script lock poisoned")
            .take()
            .unwrap_or(Script::Hold);
        match script {
            Script::Hold => {
                *self.pending.lock().expect("pending lock poisoned") = Some(completion);
            }
            Script::Immediately(event) => completion.send(event),
            Script::FailToStart => {
                return Err(MobileServiceError::authenticator("web view unavailable"));
            }
            Script::DropCompletion => drop(completion),
        }
        Ok(SURFACE)
    }

    fn clear_cookies(&self) {
        self.cookie_clears.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Modal(ControllerHandle, SurfaceHandle),
    PopoverFromRect(ViewHandle, Rect, SurfaceHandle),
    PopoverFromBarButton(BarButtonHandle, SurfaceHandle),
    DismissModal(ControllerHandle),
    DismissPopover(SurfaceHandle),
}

#[derive(Default)]
pub struct RecordingPresenter {
    calls: Mutex<Vec<PresenterCall>>,
    refusal: Option<String>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records each attempt to show the surface, then refuses it.
    pub fn failing(message: &str) -> Self {
        Self {
            refusal: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    fn record(&self, call: PresenterCall) {
        self.calls.lock().expect("calls lock poisoned").push(call);
    }

    fn show(&self, call: PresenterCall) -> Result<()> {
        self.record(call);
        match &self.refusal {
            Some(message) => Err(MobileServiceError::Presentation(message.clone())),
            None => Ok(()),
        }
    }
}

impl LoginPresenter for RecordingPresenter {
    fn present_modal(&self, parent: ControllerHandle, surface: SurfaceHandle) -> Result<()> {
        self.show(PresenterCall::Modal(parent, surface))
    }

    fn present_popover_from_rect(
        &self,
        view: ViewHandle,
        rect: Rect,
        surface: SurfaceHandle,
    ) -> Result<()> {
        self.show(PresenterCall::PopoverFromRect(view, rect, surface))
    }

    fn present_popover_from_bar_button(
        &self,
        item: BarButtonHandle,
        surface: SurfaceHandle,
    ) -> Result<()> {
        self.show(PresenterCall::PopoverFromBarButton(item, surface))
    }

    fn dismiss_modal(&self, parent: ControllerHandle) {
        self.record(PresenterCall::DismissModal(parent));
    }

    fn dismiss_popover(&self, surface: SurfaceHandle) {
        self.record(PresenterCall::DismissPopover(surface));
    }
}

pub fn callback_payload(user_id: &str, token: &str) -> CallbackPayload {
    let body = json!({
        "user": { "userId": user_id },
        "authenticationToken": token,
    });
    [("token", body.to_string())].into_iter().collect()
}

pub fn config_for(uri: &str) -> ClientConfig {
    ClientConfig::builder()
        .application_uri(uri.parse().expect("valid uri"))
        .application_key("app-key".to_string())
        .installation_id("install-1".to_string())
        .build()
}

pub fn client(
    uri: &str,
    authenticator: Arc<FakeAuthenticator>,
    presenter: Arc<RecordingPresenter>,
) -> MobileServiceClient {
    MobileServiceClient::new(config_for(uri), authenticator, presenter).expect("client")
}
