//! In-process session state: signed-in identity and guest id storage.

use std::sync::{Mutex, PoisonError, RwLock};

use crate::application::capture::{GuestIdStore, IdentityProvider};

/// Identity of the current session, switchable on sign-in and sign-out.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user_id: RwLock<Option<String>>,
}

impl SessionIdentity {
    /// A session with nobody signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session signed in as `user_id`.
    #[must_use]
    pub fn signed_in(user_id: &str) -> Self {
        Self {
            user_id: RwLock::new(Some(user_id.to_owned())),
        }
    }

    /// Signs `user_id` in.
    pub fn sign_in(&self, user_id: &str) {
        *self.user_id.write().unwrap_or_else(PoisonError::into_inner) = Some(user_id.to_owned());
    }

    /// Signs the current user out.
    pub fn sign_out(&self) {
        *self.user_id.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Guest id held for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryGuestIdStore {
    guest_id: Mutex<Option<String>>,
}

impl GuestIdStore for InMemoryGuestIdStore {
    fn load(&self) -> Option<String> {
        self.guest_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, guest_id: &str) {
        *self.guest_id.lock().unwrap_or_else(PoisonError::into_inner) = Some(guest_id.to_owned());
    }
}
