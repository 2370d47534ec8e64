use super::validation::{TokenStatus, token_status};
use super::{EMAIL_KEY, TOKEN_KEY};
use crate::errors::StorageError;
use crate::models::Credential;
use crate::storage::KeyValueStore;
use crate::transport::Transport;

impl<T: Transport, S: KeyValueStore> super::MagicLinkClient<T, S> {
    /// Returns the stored credential if it is present and not known to be
    /// expired. Malformed or expired credentials are cleared from storage.
    pub fn get_auth(&self) -> Option<Credential> {
        self.get_auth_at(chrono::Utc::now().timestamp_millis())
    }

    pub(in crate::auth) fn get_auth_at(&self, now_millis: i64) -> Option<Credential> {
        let token = match self.store.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("No credential found in storage");
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read credential from storage: {:?}", e);
                return None;
            }
        };

        let email = match self.store.get(EMAIL_KEY) {
            Ok(Some(email)) => email,
            Ok(None) => {
                tracing::warn!("Stored credential has no email, discarding it");
                self.clear_credential();
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read credential email from storage: {:?}", e);
                return None;
            }
        };

        match token_status(&token, now_millis) {
            TokenStatus::Valid => Some(Credential::new(token, email)),
            TokenStatus::Expired => {
                tracing::info!("Stored credential has expired, logging out");
                self.clear_credential();
                None
            }
            TokenStatus::Malformed(reason) => {
                tracing::info!("Stored credential is malformed ({}), logging out", reason);
                self.clear_credential();
                None
            }
        }
    }

    /// Whether a valid credential is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.get_auth().is_some()
    }

    /// Clears the stored credential. Never fails; storage errors are logged.
    pub fn logout(&self) {
        self.clear_credential();
        tracing::info!("Logged out");
    }

    /// Saves the credential, overwriting any previous one. If the email
    /// cannot be written the token write is undone so the two keys never
    /// describe different sessions.
    pub(in crate::auth) fn save_credential(
        &self,
        token: &str,
        email: &str,
    ) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, token)?;

        if let Err(e) = self.store.set(EMAIL_KEY, email) {
            tracing::warn!("Failed to save credential email, rolling back token: {:?}", e);
            if let Err(rollback) = self.store.remove(TOKEN_KEY) {
                tracing::warn!("Failed to roll back credential token: {:?}", rollback);
            }
            return Err(e);
        }

        tracing::info!("Credential saved for {}", email);
        Ok(())
    }

    fn clear_credential(&self) {
        for key in [TOKEN_KEY, EMAIL_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to remove {} from storage: {:?}", key, e);
            }
        }
    }
}
