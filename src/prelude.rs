//! Convenience re-exports for common use.

pub use crate::auth::{
    AuthenticationProvider, CompletionHandle, LoginOutcome, MobileServiceUser, RedirectRequest,
    WebAuthenticator,
};
pub use crate::client::MobileServiceClient;
pub use crate::config::ClientConfig;
pub use crate::error::{MobileServiceError, Result};
pub use crate::present::{
    BarButtonHandle, ControllerHandle, LoginAnchor, LoginPresenter, Rect, SurfaceHandle, ViewHandle,
};
