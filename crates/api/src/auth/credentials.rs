//! The login credential check.
//!
//! Kept apart from the user CRUD handlers: the only question answered here
//! is whether an email/password pair belongs to an active user.

use std::sync::Arc;

use yard_db::models::user::User;
use yard_db::store::{StoreError, YardStore};

use crate::auth::password::verify_password;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    /// No user with that email, or the user is deactivated.
    #[error("User not found or inactive")]
    UnknownUser,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Password hash error: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Verifies login credentials against the users in the store.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn YardStore>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn YardStore>) -> Self {
        Self { store }
    }

    /// Return the active user owning `email` if `password` matches.
    pub async fn verify_credentials(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, AuthError> {
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        let password = password.filter(|p| !p.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(AuthError::MissingCredentials);
        };

        let user = match self.store.find_user_by_email(email).await? {
            Some(user) if user.is_active => user,
            _ => {
                tracing::info!(email, "Login for unknown or inactive user");
                return Err(AuthError::UnknownUser);
            }
        };

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        if !matches {
            tracing::warn!(user_id = user.id, "Login with wrong password");
            return Err(AuthError::InvalidPassword);
        }

        tracing::info!(user_id = user.id, "Login successful");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use yard_db::models::user::CreateUser;
    use yard_db::store::MemoryStore;

    use super::*;
    use crate::auth::password::hash_password;

    async fn verifier_with_user(active: bool) -> CredentialVerifier {
        let store = MemoryStore::new();
        let role = store.add_role("OPERARIO").await;
        let level = store.add_access_level("Operativo").await;
        store
            .add_user(CreateUser {
                name: "Operario Uno".into(),
                email: "op@puerto.test".into(),
                password_hash: hash_password("operario123").unwrap(),
                phone: None,
                company: None,
                role_id: role,
                access_level_id: level,
                is_active: Some(active),
            })
            .await;
        CredentialVerifier::new(Arc::new(store))
    }

    #[tokio::test]
    async fn correct_password_returns_user() {
        let verifier = verifier_with_user(true).await;
        let user = verifier
            .verify_credentials(Some("op@puerto.test"), Some("operario123"))
            .await
            .unwrap();
        assert_eq!(user.email, "op@puerto.test");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_lookup() {
        let verifier = verifier_with_user(true).await;
        assert_matches!(
            verifier.verify_credentials(None, Some("x")).await,
            Err(AuthError::MissingCredentials)
        );
        assert_matches!(
            verifier.verify_credentials(Some("op@puerto.test"), Some("")).await,
            Err(AuthError::MissingCredentials)
        );
    }

    #[tokio::test]
    async fn inactive_user_is_treated_as_unknown() {
        let verifier = verifier_with_user(false).await;
        assert_matches!(
            verifier
                .verify_credentials(Some("op@puerto.test"), Some("operario123"))
                .await,
            Err(AuthError::UnknownUser)
        );
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let verifier = verifier_with_user(true).await;
        assert_matches!(
            verifier
                .verify_credentials(Some("op@puerto.test"), Some("incorrecta"))
                .await,
            Err(AuthError::InvalidPassword)
        );
    }
}
