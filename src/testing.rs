//! In-memory stand-ins for the external collaborators, shared by unit tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use crate::auth::{AuthError, AuthState, FederatedProvider, IdentityProvider};
use crate::catalog::CatalogTransport;
use crate::models::{BookRecord, Session, ShelfEntry};
use crate::shelf::DocumentStore;

pub(crate) fn session_for(uid: &str) -> Session {
    Session {
        uid: uid.to_string(),
        email: Some(format!("{uid}@example.com")),
        display_name: None,
        signed_in_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    }
}

#[derive(Default)]
pub(crate) struct FakeDocumentStore {
    entries: Mutex<Vec<(String, ShelfEntry)>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FakeDocumentStore {
    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn list(&self, owner_uid: &str) -> Result<Vec<ShelfEntry>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("permission-denied"));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| owner == owner_uid)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn append(&self, owner_uid: &str, book: &BookRecord) -> Result<ShelfEntry> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("unavailable"));
        }
        let entry = ShelfEntry {
            id: Uuid::new_v4().to_string(),
            book: book.clone(),
            added_at: Utc::now(),
        };
        self.entries
            .lock()
            .unwrap()
            .push((owner_uid.to_string(), entry.clone()));
        Ok(entry)
    }

    async fn delete(&self, owner_uid: &str, entry_id: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("unavailable"));
        }
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|(owner, entry)| !(owner == owner_uid && entry.id == entry_id));
        if entries.len() == before {
            return Err(anyhow!("not-found"));
        }
        Ok(())
    }
}

/// Identity provider whose state tests drive directly.
///
/// Credential sign-in succeeds for any address unless an error was queued
/// with [`fail_next`](Self::fail_next).
pub(crate) struct FakeIdentity {
    state: watch::Sender<AuthState>,
    next_error: Mutex<Option<AuthError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeIdentity {
    pub(crate) fn new(initial: AuthState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            next_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set(&self, state: AuthState) {
        self.state.send_replace(state);
    }

    pub(crate) fn fail_next(&self, err: AuthError) {
        *self.next_error.lock().unwrap() = Some(err);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), AuthError> {
        self.calls.lock().unwrap().push(call);
        match self.next_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    async fn sign_in_with_credentials(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<Session, AuthError> {
        self.record(format!("sign_in:{email}"))?;
        let local = email.split('@').next().unwrap_or(email);
        let session = session_for(local);
        self.set(AuthState::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_in_with_federated(
        &self,
        provider: FederatedProvider,
    ) -> Result<Session, AuthError> {
        self.record(format!("federated:{}", provider.as_str()))?;
        let session = session_for(provider.as_str());
        self.set(AuthState::SignedIn(session.clone()));
        Ok(session)
    }

    async fn create_account(&self, email: &str, _password: &str) -> Result<(), AuthError> {
        self.record(format!("create:{email}"))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.record("sign_out".to_string())?;
        self.set(AuthState::SignedOut);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.record(format!("reset:{email}"))
    }
}

type Query = Vec<(String, String)>;

/// Catalog transport answering from canned JSON keyed by path. Unknown paths
/// fail like an unreachable host.
#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: HashMap<String, Value>,
    requests: Mutex<Vec<(String, Query)>>,
}

impl FakeTransport {
    pub(crate) fn with_response(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    pub(crate) fn requests(&self) -> Vec<(String, Query)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogTransport for FakeTransport {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.requests.lock().unwrap().push((
            path.to_string(),
            query
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        ));
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("connection refused: {path}"))
    }
}
