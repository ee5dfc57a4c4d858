//! Identity providers a mobile service can log users in with.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::MobileServiceError;

/// Identity vendors a mobile service can federate login with.
///
/// The discriminants match the numeric values hosts persist or pass across
/// FFI boundaries; [`TryFrom<i32>`] rejects anything else.
///
/// # Example
/// ```
/// use mobile_services::auth::AuthenticationProvider;
///
/// let provider = AuthenticationProvider::parse("Google")?;
/// assert_eq!(provider.as_str(), "google");
/// assert!(AuthenticationProvider::try_from(42).is_err());
/// # Ok::<(), mobile_services::error::MobileServiceError>(())
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AuthenticationProvider {
    MicrosoftAccount = 0,
    Google = 1,
    Twitter = 2,
    Facebook = 3,
    WindowsAzureActiveDirectory = 4,
}

impl AuthenticationProvider {
    /// Name used in the login endpoint path.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Parse a provider name, mapping failures onto the crate error.
    pub fn parse(name: &str) -> Result<Self, MobileServiceError> {
        match Self::from_str(name.trim()) {
            Ok(provider) => Ok(provider),
            Err(_) => Err(MobileServiceError::InvalidProvider(name.to_string())),
        }
    }
}

impl TryFrom<i32> for AuthenticationProvider {
    type Error = MobileServiceError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::MicrosoftAccount),
            1 => Ok(Self::Google),
            2 => Ok(Self::Twitter),
            3 => Ok(Self::Facebook),
            4 => Ok(Self::WindowsAzureActiveDirectory),
            other => Err(MobileServiceError::InvalidProvider(other.to_string())),
        }
    }
}
