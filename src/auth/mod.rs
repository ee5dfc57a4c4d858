//! Provider login flows and the session they establish.

pub mod outcome;
pub mod provider;
pub mod redirect;
pub mod session;
pub mod user;

pub use outcome::LoginOutcome;
pub use provider::AuthenticationProvider;
pub use redirect::{
    completion_channel, AuthenticatorEvent, CallbackPayload, CompletionHandle, CompletionReceiver,
    RedirectRequest, WebAuthenticator,
};
pub use session::{LoginGuard, SessionState};
pub use user::MobileServiceUser;
