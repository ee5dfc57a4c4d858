//! How a login attempt ended.

use crate::error::{MobileServiceError, Result};

use super::user::MobileServiceUser;

/// Terminal result of a login flow that got past its preconditions.
#[derive(Debug)]
pub enum LoginOutcome {
    /// The service issued a session token for this user.
    Success(MobileServiceUser),
    /// The user dismissed the login UI, or the exchange was aborted.
    Canceled,
    /// The exchange or the authenticator failed.
    Failed(MobileServiceError),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    pub fn user(&self) -> Option<&MobileServiceUser> {
        match self {
            Self::Success(user) => Some(user),
            _ => None,
        }
    }

    /// Collapse into a `Result`, reporting cancellation as
    /// [`MobileServiceError::LoginCanceled`].
    pub fn into_result(self) -> Result<MobileServiceUser> {
        match self {
            Self::Success(user) => Ok(user),
            Self::Canceled => Err(MobileServiceError::LoginCanceled),
            Self::Failed(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_result_maps_each_case() {
        let user = MobileServiceUser::new("Google:1").with_authentication_token("t");
        assert_eq!(
            LoginOutcome::Success(user.clone()).into_result().unwrap(),
            user
        );
        assert!(matches!(
            LoginOutcome::Canceled.into_result(),
            Err(MobileServiceError::LoginCanceled)
        ));
        assert!(matches!(
            LoginOutcome::Failed(MobileServiceError::authenticator("x")).into_result(),
            Err(MobileServiceError::Authenticator { .. })
        ));
    }
}
