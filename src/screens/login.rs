use std::{sync::Arc, time::Duration};

use crate::auth::{message_for, AuthFlow, AuthState, FederatedProvider, IdentityProvider};
use crate::session::{Navigator, Route};

use super::{fields_filled, DelayedRedirect, ScreenContext, ScreenMessage, FILL_ALL_FIELDS_MESSAGE};

const ENABLE_LOGS: bool = true;

use crate::log_info;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful! Redirecting...";
pub const RESET_NEEDS_EMAIL_MESSAGE: &str =
    "Please enter your email address first to reset your password.";
pub const RESET_SENT_MESSAGE: &str = "Password reset email sent! Please check your inbox.";

const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Entry screen: credential, federated and password-reset flows.
pub struct LoginScreen {
    identity: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    pub email: String,
    pub password: String,
    message: Option<ScreenMessage>,
    redirect: DelayedRedirect,
}

impl LoginScreen {
    /// Visitors who are already signed in go straight to Explore.
    pub fn mount(ctx: &ScreenContext) -> Self {
        if matches!(ctx.identity.current(), AuthState::SignedIn(_)) {
            ctx.navigator.navigate(Route::Explore);
        }

        Self {
            identity: ctx.identity.clone(),
            navigator: ctx.navigator.clone(),
            email: String::new(),
            password: String::new(),
            message: None,
            redirect: DelayedRedirect::default(),
        }
    }

    pub fn message(&self) -> Option<&ScreenMessage> {
        self.message.as_ref()
    }

    pub async fn submit(&mut self) -> bool {
        self.message = None;
        if !fields_filled(&self.email, &self.password) {
            self.message = Some(ScreenMessage::Error(FILL_ALL_FIELDS_MESSAGE.to_string()));
            return false;
        }

        match self
            .identity
            .sign_in_with_credentials(&self.email, &self.password)
            .await
        {
            Ok(session) => {
                log_info!("signed in {}", session.uid);
                self.signed_in();
                true
            }
            Err(err) => {
                self.message = Some(ScreenMessage::Error(message_for(AuthFlow::SignIn, &err)));
                false
            }
        }
    }

    pub async fn sign_in_with(&mut self, provider: FederatedProvider) -> bool {
        self.message = None;
        match self.identity.sign_in_with_federated(provider).await {
            Ok(_) => {
                self.signed_in();
                true
            }
            Err(err) => {
                self.message = Some(ScreenMessage::Error(message_for(
                    AuthFlow::Federated(provider),
                    &err,
                )));
                false
            }
        }
    }

    pub async fn forgot_password(&mut self) -> bool {
        self.message = None;
        if self.email.trim().is_empty() {
            self.message = Some(ScreenMessage::Error(RESET_NEEDS_EMAIL_MESSAGE.to_string()));
            return false;
        }

        match self.identity.send_password_reset(&self.email).await {
            Ok(()) => {
                self.message = Some(ScreenMessage::Success(RESET_SENT_MESSAGE.to_string()));
                true
            }
            Err(err) => {
                self.message = Some(ScreenMessage::Error(message_for(
                    AuthFlow::PasswordReset,
                    &err,
                )));
                false
            }
        }
    }

    pub fn go_to_signup(&self) {
        self.navigator.navigate(Route::Signup);
    }

    fn signed_in(&mut self) {
        self.message = Some(ScreenMessage::Success(LOGIN_SUCCESS_MESSAGE.to_string()));
        self.redirect
            .schedule(self.navigator.clone(), Route::Explore, REDIRECT_DELAY);
    }
}
