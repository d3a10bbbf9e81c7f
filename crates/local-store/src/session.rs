//! Auth session keys

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::store::LocalStore;
use crate::StoreError;

pub const TOKEN_KEY: &str = "dermalyze_token";
pub const USER_KEY: &str = "dermalyze_user";

impl LocalStore {
    /// Persist token and user after login/register
    pub fn save_session<U: Serialize>(&self, token: &str, user: &U) -> Result<(), StoreError> {
        self.set_item(TOKEN_KEY, token)?;
        self.set_json(USER_KEY, user)?;
        debug!("Session saved");
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.get_item(TOKEN_KEY).ok().flatten().filter(|t| !t.is_empty())
    }

    /// Stored user; unreadable data reads as logged out
    pub fn user<U: DeserializeOwned>(&self) -> Option<U> {
        match self.get_json(USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                warn!("Stored user is unreadable: {}", e);
                None
            }
        }
    }

    /// Replace the stored user, keeping the token
    pub fn update_user<U: Serialize>(&self, user: &U) -> Result<(), StoreError> {
        self.set_json(USER_KEY, user)
    }

    /// Token and user both present
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
            && self
                .get_item(USER_KEY)
                .ok()
                .flatten()
                .is_some_and(|u| u != "null")
    }

    /// Logout: drop token, user and every cache
    pub fn clear_session(&self) -> Result<(), StoreError> {
        self.remove_item(TOKEN_KEY)?;
        self.remove_item(USER_KEY)?;
        self.clear_cache(None)
    }
}
