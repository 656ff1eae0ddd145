use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::auth::{AuthState, IdentityProvider};
use crate::models::Session;

use super::navigator::{Navigator, Route};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// What a gated screen may show.
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    /// No session event yet; render nothing.
    Pending,
    Open(Session),
    /// No session; the visitor was sent to the entry screen.
    Redirected,
}

/// Gates one screen visit on the identity provider's session state.
///
/// Mounting subscribes once to the provider. The value current at mount time
/// counts as the first notification, so an already known signed-out state
/// redirects before `mount` returns. Later changes are followed by a
/// background task; losing the session mid-visit redirects again. Dropping
/// the guard (or calling [`unmount`](Self::unmount)) releases the
/// subscription, after which no further redirects fire.
pub struct SessionGuard {
    gate: watch::Receiver<GateState>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SessionGuard {
    pub fn mount(identity: &dyn IdentityProvider, navigator: Arc<dyn Navigator>) -> Self {
        let mut sessions = identity.subscribe();
        let (gate_tx, gate_rx) = watch::channel(GateState::Pending);

        let initial = sessions.borrow_and_update().clone();
        apply(&initial, &gate_tx, navigator.as_ref());

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(follow_sessions(
            sessions,
            gate_tx,
            navigator,
            cancel_token.clone(),
        ));

        Self {
            gate: gate_rx,
            cancel_token,
            handle: Some(handle),
        }
    }

    pub fn state(&self) -> GateState {
        self.gate.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        match &*self.gate.borrow() {
            GateState::Open(session) => Some(session.clone()),
            _ => None,
        }
    }

    pub fn watch(&self) -> watch::Receiver<GateState> {
        self.gate.clone()
    }

    /// Waits for the first session event. `None` means the visitor was redirected.
    pub async fn ready(&mut self) -> Option<Session> {
        let state = self
            .gate
            .wait_for(|state| *state != GateState::Pending)
            .await
            .ok()?
            .clone();

        match state {
            GateState::Open(session) => Some(session),
            _ => None,
        }
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        log_debug!("session guard released");
    }
}

fn apply(state: &AuthState, gate: &watch::Sender<GateState>, navigator: &dyn Navigator) {
    match state {
        AuthState::Initializing => {}
        AuthState::SignedIn(session) => {
            gate.send_replace(GateState::Open(session.clone()));
        }
        AuthState::SignedOut => {
            let previous = gate.send_replace(GateState::Redirected);
            if previous != GateState::Redirected {
                log_info!("no session; redirecting to {}", Route::Entry.path());
                navigator.navigate(Route::Entry);
            }
        }
    }
}

async fn follow_sessions(
    mut sessions: watch::Receiver<AuthState>,
    gate: watch::Sender<GateState>,
    navigator: Arc<dyn Navigator>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            changed = sessions.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = sessions.borrow_and_update().clone();
                if cancel_token.is_cancelled() {
                    break;
                }
                apply(&state, &gate, navigator.as_ref());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ChannelNavigator;
    use crate::testing::{session_for, FakeIdentity};
    use tokio::sync::mpsc::error::TryRecvError;

    fn navigator() -> (Arc<ChannelNavigator>, tokio::sync::mpsc::UnboundedReceiver<Route>) {
        let (navigator, routes) = ChannelNavigator::new();
        (Arc::new(navigator), routes)
    }

    #[tokio::test]
    async fn signed_in_visitor_sees_content() {
        let identity = FakeIdentity::new(AuthState::SignedIn(session_for("uid-1")));
        let (nav, mut routes) = navigator();

        let mut guard = SessionGuard::mount(&identity, nav);
        assert_eq!(guard.ready().await.map(|s| s.uid), Some("uid-1".to_string()));
        assert_eq!(routes.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn signed_out_visitor_is_redirected_during_mount() {
        let identity = FakeIdentity::new(AuthState::SignedOut);
        let (nav, mut routes) = navigator();

        let guard = SessionGuard::mount(&identity, nav);
        assert_eq!(guard.state(), GateState::Redirected);
        assert_eq!(guard.session(), None);
        assert_eq!(routes.try_recv(), Ok(Route::Entry));
    }

    #[tokio::test]
    async fn content_stays_blocked_until_first_event() {
        let identity = FakeIdentity::new(AuthState::Initializing);
        let (nav, mut routes) = navigator();

        let mut guard = SessionGuard::mount(&identity, nav);
        assert_eq!(guard.state(), GateState::Pending);

        identity.set(AuthState::SignedOut);
        assert_eq!(guard.ready().await, None);
        assert_eq!(routes.recv().await, Some(Route::Entry));
    }

    #[tokio::test]
    async fn losing_the_session_mid_visit_redirects_again() {
        let identity = FakeIdentity::new(AuthState::SignedIn(session_for("uid-1")));
        let (nav, mut routes) = navigator();
        let guard = SessionGuard::mount(&identity, nav);
        let mut gate = guard.watch();

        identity.set(AuthState::SignedOut);
        gate.wait_for(|s| *s == GateState::Redirected).await.unwrap();
        assert_eq!(routes.recv().await, Some(Route::Entry));

        identity.set(AuthState::SignedIn(session_for("uid-1")));
        gate.wait_for(|s| matches!(s, GateState::Open(_))).await.unwrap();
        identity.set(AuthState::SignedOut);
        gate.wait_for(|s| *s == GateState::Redirected).await.unwrap();
        assert_eq!(routes.recv().await, Some(Route::Entry));
    }

    #[tokio::test]
    async fn released_guard_never_fires() {
        let identity = FakeIdentity::new(AuthState::SignedIn(session_for("uid-1")));
        let (nav, mut routes) = navigator();

        let guard = SessionGuard::mount(&identity, nav);
        guard.unmount();

        identity.set(AuthState::SignedOut);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(routes.try_recv().is_err(), "released guard must not navigate");
    }
}
