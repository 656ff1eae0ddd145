use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::models::Session;

use super::AuthError;

/// Session state as published by an identity provider.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// The provider has not reported yet.
    Initializing,
    SignedOut,
    SignedIn(Session),
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FederatedProvider {
    Google,
    Facebook,
}

impl FederatedProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "google",
            FederatedProvider::Facebook => "facebook",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "Google",
            FederatedProvider::Facebook => "Facebook",
        }
    }
}

/// External authentication service.
///
/// Session changes are observed through a `watch` channel; every sign-in or
/// sign-out publishes the new [`AuthState`] to all subscribers.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    fn current(&self) -> AuthState {
        self.subscribe().borrow().clone()
    }

    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError>;

    async fn sign_in_with_federated(
        &self,
        provider: FederatedProvider,
    ) -> Result<Session, AuthError>;

    async fn create_account(&self, email: &str, password: &str) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;
}
