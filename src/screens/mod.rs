//! View models for the four routes. They hold screen state and talk to the
//! injected services; rendering is left to whatever shell drives them.

pub mod explore;
pub mod games;
pub mod login;
pub mod signup;

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::auth::IdentityProvider;
use crate::catalog::CatalogAdapter;
use crate::notify::Notifier;
use crate::session::{Navigator, Route};
use crate::shelf::{DocumentStore, ShelfStore};
use crate::summary::SummaryService;

pub use explore::{BookDetail, ExploreScreen};
pub use games::{GameView, GamesScreen};
pub use login::LoginScreen;
pub use signup::SignupScreen;

pub const FILL_ALL_FIELDS_MESSAGE: &str = "Please fill in all fields.";

/// Inline banner under a form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "kind", content = "text")]
pub enum ScreenMessage {
    Error(String),
    Success(String),
}

/// Services every screen is built from.
#[derive(Clone)]
pub struct ScreenContext {
    pub identity: Arc<dyn IdentityProvider>,
    pub navigator: Arc<dyn Navigator>,
    pub catalog: CatalogAdapter,
    pub summaries: SummaryService,
    pub documents: Arc<dyn DocumentStore>,
    pub notifier: Notifier,
    pub covers_base_url: String,
    pub min_password_len: usize,
}

impl ScreenContext {
    pub fn shelf(&self) -> ShelfStore {
        ShelfStore::new(self.documents.clone(), self.notifier.clone())
    }
}

/// Navigation scheduled after a short banner. Dropping it cancels the jump.
#[derive(Default)]
struct DelayedRedirect {
    handle: Option<JoinHandle<()>>,
}

impl DelayedRedirect {
    fn schedule(&mut self, navigator: Arc<dyn Navigator>, route: Route, delay: Duration) {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(route);
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for DelayedRedirect {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn fields_filled(email: &str, password: &str) -> bool {
    !email.trim().is_empty() && !password.is_empty()
}
