//! The logged-in user and the login response it is parsed from.

use serde::{Deserialize, Serialize};

use crate::error::{MobileServiceError, Result};

/// An authenticated user of a mobile service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileServiceUser {
    pub user_id: String,
    #[serde(rename = "mobileServiceAuthenticationToken")]
    pub authentication_token: Option<String>,
}

impl std::fmt::Debug for MobileServiceUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MobileServiceUser")
            .field("user_id", &self.user_id)
            .field(
                "authentication_token",
                &self.authentication_token.as_ref().map(|_| ".."),
            )
            .finish()
    }
}

impl MobileServiceUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            authentication_token: None,
        }
    }

    pub fn with_authentication_token(mut self, token: impl Into<String>) -> Self {
        self.authentication_token = Some(token.into());
        self
    }

    /// Build a user from a login response body.
    ///
    /// Expects `{ "user": { "userId": .. }, "authenticationToken": .. }`.
    pub fn from_login_response(value: serde_json::Value) -> Result<Self> {
        let response: LoginResponse = serde_json::from_value(value).map_err(|e| {
            MobileServiceError::InvalidResponse(format!("Malformed login response: {e}"))
        })?;
        Ok(Self {
            user_id: response.user.user_id,
            authentication_token: Some(response.authentication_token),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: LoginResponseUser,
    #[serde(rename = "authenticationToken")]
    authentication_token: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponseUser {
    #[serde(rename = "userId")]
    user_id: String,
}
