//! mobile-services: login for mobile backend applications
//!
//! Establishes a user session against a mobile service, either through the
//! server-side OAuth redirect flow shown in a web view or by exchanging a token
//! issued by the identity provider's own SDK.
//!
//! The host application supplies the UI pieces: a
//! [`WebAuthenticator`](auth::WebAuthenticator) that hosts the web view and a
//! [`LoginPresenter`](present::LoginPresenter) that puts it on screen relative
//! to a [`LoginAnchor`](present::LoginAnchor).
//!
//! # Quick Start
//!
//! ```no_run
//! use mobile_services::prelude::*;
//! use serde_json::json;
//!
//! # async fn example(client: MobileServiceClient) -> mobile_services::error::Result<()> {
//! let outcome = client
//!     .login_with_token(AuthenticationProvider::Facebook, json!({ "access_token": "..." }))
//!     .await?;
//! if let LoginOutcome::Success(user) = outcome {
//!     println!("{}", user.user_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod present;

#[cfg(feature = "cli")]
pub mod cli;
