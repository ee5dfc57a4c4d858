use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{MobileServiceError, Result};

use super::user::MobileServiceUser;

/// Login state owned by one client instance.
///
/// At most one login may be outstanding; the flag is taken with a
/// compare-and-swap and handed back by [`LoginGuard`] when it drops.
#[derive(Debug, Default)]
pub struct SessionState {
    login_in_progress: AtomicBool,
    current_user: RwLock<Option<MobileServiceUser>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login_in_progress(&self) -> bool {
        self.login_in_progress.load(Ordering::Acquire)
    }

    /// Mark a login as started. Fails without touching state if one already is.
    pub fn begin_login(&self) -> Result<LoginGuard<'_>> {
        self.login_in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| MobileServiceError::LoginInProgress)?;
        Ok(LoginGuard { state: self })
    }

    pub fn current_user(&self) -> Option<MobileServiceUser> {
        self.current_user
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_current_user(&self, user: Option<MobileServiceUser>) {
        *self
            .current_user
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = user;
    }

    /// Session token of the current user, if any.
    pub fn authentication_token(&self) -> Option<String> {
        self.current_user().and_then(|user| user.authentication_token)
    }
}

/// Clears the in-progress flag on drop, whichever way the login ends.
#[derive(Debug)]
#[must_use = "dropping the guard ends the login immediately"]
pub struct LoginGuard<'a> {
    state: &'a SessionState,
}

impl Drop for LoginGuard<'_> {
    fn drop(&mut self) {
        self.state.login_in_progress.store(false, Ordering::Release);
    }
}
