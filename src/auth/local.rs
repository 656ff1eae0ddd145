use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::db::{Account, Database};
use crate::models::Session;

use super::password::{hash_password, is_strong_enough, is_valid_email, verify_password};
use super::{AuthError, AuthState, FederatedProvider, IdentityProvider};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const MAX_FAILED_ATTEMPTS: u32 = 5;
const LOCKOUT_MINUTES: i64 = 5;
const FEDERATED_UNSUPPORTED: &str = "auth/operation-not-supported-in-this-environment";

/// Identity provider backed by the local SQLite store.
///
/// Stands in for a managed identity service: accounts live in `accounts`,
/// the signed-in account survives restarts through `active_session`.
/// Federated sign-in needs a browser pop-up and is refused.
pub struct LocalIdentityProvider {
    db: Database,
    state: watch::Sender<AuthState>,
    min_password_len: usize,
}

fn session_from(account: &Account, signed_in_at: DateTime<Utc>) -> Session {
    Session {
        uid: account.uid.clone(),
        email: Some(account.email.clone()),
        display_name: account.display_name.clone(),
        signed_in_at,
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl LocalIdentityProvider {
    pub async fn open(db: Database, min_password_len: usize) -> anyhow::Result<Self> {
        let initial = match db.load_active_session().await? {
            Some((account, signed_in_at)) if !account.disabled => {
                AuthState::SignedIn(session_from(&account, signed_in_at))
            }
            Some((account, _)) => {
                log_warn!("stored session for disabled account {}; signing out", account.uid);
                db.clear_active_session().await?;
                AuthState::SignedOut
            }
            None => AuthState::SignedOut,
        };

        let (state, _) = watch::channel(initial);
        Ok(Self {
            db,
            state,
            min_password_len,
        })
    }

    fn publish(&self, next: AuthState) {
        self.state.send_replace(next);
    }

    async fn find_account(&self, email: &str) -> Result<Account, AuthError> {
        self.db
            .find_account_by_email(email)
            .await
            .map_err(AuthError::internal)?
            .ok_or(AuthError::UserNotFound)
    }

    async fn register_failure(&self, account: &Account, now: DateTime<Utc>) -> Result<(), AuthError> {
        let bumped = self
            .db
            .bump_failed_sign_ins(
                &account.uid,
                now,
                MAX_FAILED_ATTEMPTS,
                Duration::minutes(LOCKOUT_MINUTES),
            )
            .await
            .map_err(AuthError::internal)?;
        if bumped.locked_until.is_some() {
            log_warn!(
                "locking sign-in for {} after {} failures",
                account.uid,
                bumped.attempts
            );
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }

        let account = self.find_account(&email).await?;
        if account.disabled {
            return Err(AuthError::UserDisabled);
        }

        let now = Utc::now();
        if account.locked_until.is_some_and(|until| until > now) {
            return Err(AuthError::TooManyRequests);
        }

        let hash = account.password_hash.clone();
        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|err| AuthError::internal(anyhow!(err)))?
            .map_err(|err| AuthError::internal(anyhow!("stored hash unreadable: {err}")))?;

        if !matches {
            self.register_failure(&account, now).await?;
            return Err(AuthError::WrongPassword);
        }

        if account.failed_attempts > 0 || account.locked_until.is_some() {
            self.db
                .clear_failed_sign_ins(&account.uid)
                .await
                .map_err(AuthError::internal)?;
        }

        self.db
            .save_active_session(&account.uid, now)
            .await
            .map_err(AuthError::internal)?;

        let session = session_from(&account, now);
        log_info!("signed in {}", account.uid);
        self.publish(AuthState::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_in_with_federated(
        &self,
        provider: FederatedProvider,
    ) -> Result<Session, AuthError> {
        log_warn!("{} sign-in requested but unavailable locally", provider.as_str());
        Err(AuthError::from_code(FEDERATED_UNSUPPORTED))
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if !is_strong_enough(password, self.min_password_len) {
            return Err(AuthError::WeakPassword);
        }

        let existing = self
            .db
            .find_account_by_email(&email)
            .await
            .map_err(AuthError::internal)?;
        if existing.is_some() {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let plain = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&plain))
            .await
            .map_err(|err| AuthError::internal(anyhow!(err)))?
            .map_err(|err| AuthError::internal(anyhow!("failed to hash password: {err}")))?;

        let now = Utc::now();
        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email,
            display_name: None,
            password_hash,
            disabled: false,
            failed_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
        };

        self.db
            .insert_account(&account)
            .await
            .map_err(AuthError::internal)?;
        log_info!("created account {}", account.uid);
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.db
            .clear_active_session()
            .await
            .map_err(AuthError::internal)?;
        self.publish(AuthState::SignedOut);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }

        let account = self.find_account(&email).await?;
        let reset_id = self
            .db
            .insert_password_reset(&account.uid)
            .await
            .map_err(AuthError::internal)?;
        log_info!("password reset {reset_id} requested for {}", account.uid);
        Ok(())
    }
}
