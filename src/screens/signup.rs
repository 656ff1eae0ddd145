use std::{sync::Arc, time::Duration};

use crate::auth::{message_for, AuthFlow, AuthState, IdentityProvider};
use crate::session::{Navigator, Route};

use super::{fields_filled, DelayedRedirect, ScreenContext, ScreenMessage, FILL_ALL_FIELDS_MESSAGE};

pub const ACCOUNT_CREATED_MESSAGE: &str = "Account created successfully! Redirecting to login...";

const REDIRECT_DELAY: Duration = Duration::from_secs(2);

pub struct SignupScreen {
    identity: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    min_password_len: usize,
    pub email: String,
    pub password: String,
    message: Option<ScreenMessage>,
    redirect: DelayedRedirect,
}

impl SignupScreen {
    pub fn mount(ctx: &ScreenContext) -> Self {
        if matches!(ctx.identity.current(), AuthState::SignedIn(_)) {
            ctx.navigator.navigate(Route::Explore);
        }

        Self {
            identity: ctx.identity.clone(),
            navigator: ctx.navigator.clone(),
            min_password_len: ctx.min_password_len,
            email: String::new(),
            password: String::new(),
            message: None,
            redirect: DelayedRedirect::default(),
        }
    }

    pub fn message(&self) -> Option<&ScreenMessage> {
        self.message.as_ref()
    }

    /// Creates the account, then sends the visitor to the entry screen.
    pub async fn submit(&mut self) -> bool {
        self.message = None;
        if !fields_filled(&self.email, &self.password) {
            self.message = Some(ScreenMessage::Error(FILL_ALL_FIELDS_MESSAGE.to_string()));
            return false;
        }

        match self.identity.create_account(&self.email, &self.password).await {
            Ok(()) => {
                self.message = Some(ScreenMessage::Success(ACCOUNT_CREATED_MESSAGE.to_string()));
                self.redirect
                    .schedule(self.navigator.clone(), Route::Entry, REDIRECT_DELAY);
                true
            }
            Err(err) => {
                let flow = AuthFlow::SignUp {
                    min_password_len: self.min_password_len,
                };
                self.message = Some(ScreenMessage::Error(message_for(flow, &err)));
                false
            }
        }
    }

    pub fn go_to_login(&self) {
        self.navigator.navigate(Route::Entry);
    }
}
