//! Identity-provider failures and the text shown for them.
//!
//! Providers report failures as string codes (`auth/invalid-email`, ...).
//! [`AuthError`] keeps the known ones as variants so each flow can pick its
//! own wording, and carries any other code through untouched so the flow's
//! generic message still applies.

use thiserror::Error;

use super::provider::FederatedProvider;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("auth/invalid-email")]
    InvalidEmail,
    #[error("auth/user-disabled")]
    UserDisabled,
    #[error("auth/user-not-found")]
    UserNotFound,
    #[error("auth/wrong-password")]
    WrongPassword,
    #[error("auth/invalid-credential")]
    InvalidCredential,
    #[error("auth/too-many-requests")]
    TooManyRequests,
    #[error("auth/network-request-failed")]
    NetworkRequestFailed,
    #[error("auth/popup-closed-by-user")]
    PopupClosedByUser,
    #[error("auth/cancelled-popup-request")]
    CancelledPopupRequest,
    #[error("auth/popup-blocked")]
    PopupBlocked,
    #[error("auth/account-exists-with-different-credential")]
    AccountExistsWithDifferentCredential,
    #[error("auth/email-already-in-use")]
    EmailAlreadyInUse,
    #[error("auth/weak-password")]
    WeakPassword,
    #[error("{0}")]
    Other(String),
}

impl AuthError {
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/user-disabled" => Self::UserDisabled,
            "auth/user-not-found" => Self::UserNotFound,
            "auth/wrong-password" => Self::WrongPassword,
            "auth/invalid-credential" => Self::InvalidCredential,
            "auth/too-many-requests" => Self::TooManyRequests,
            "auth/network-request-failed" => Self::NetworkRequestFailed,
            "auth/popup-closed-by-user" => Self::PopupClosedByUser,
            "auth/cancelled-popup-request" => Self::CancelledPopupRequest,
            "auth/popup-blocked" => Self::PopupBlocked,
            "auth/account-exists-with-different-credential" => {
                Self::AccountExistsWithDifferentCredential
            }
            "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "auth/weak-password" => Self::WeakPassword,
            other => Self::Other(other.to_string()),
        }
    }

    /// Provider code, e.g. `auth/invalid-email`.
    pub fn code(&self) -> String {
        self.to_string()
    }

    /// Wraps an internal failure (storage, hashing) as an unknown code so it
    /// lands on the flow's generic message.
    pub fn internal(err: anyhow::Error) -> Self {
        Self::Other(format!("auth/internal-error: {err:#}"))
    }
}

/// The user-facing operation a failure happened in; wording differs per flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    SignIn,
    Federated(FederatedProvider),
    PasswordReset,
    SignUp { min_password_len: usize },
}

pub fn message_for(flow: AuthFlow, err: &AuthError) -> String {
    match flow {
        AuthFlow::SignIn => sign_in_message(err).to_string(),
        AuthFlow::Federated(provider) => federated_message(provider, err),
        AuthFlow::PasswordReset => password_reset_message(err).to_string(),
        AuthFlow::SignUp { min_password_len } => sign_up_message(err, min_password_len),
    }
}

fn sign_in_message(err: &AuthError) -> &'static str {
    match err {
        AuthError::InvalidEmail => "Invalid email format. Please check your email address.",
        AuthError::UserDisabled => "Your account has been disabled.",
        AuthError::UserNotFound | AuthError::WrongPassword | AuthError::InvalidCredential => {
            "Invalid email or password. Please try again."
        }
        AuthError::TooManyRequests => "Too many login attempts. Please try again later.",
        AuthError::NetworkRequestFailed => "Network error. Please check your connection.",
        _ => "An unexpected error occurred. Please try again.",
    }
}

fn federated_message(provider: FederatedProvider, err: &AuthError) -> String {
    let name = provider.label();
    match err {
        AuthError::PopupClosedByUser => format!("{name} sign-in was cancelled."),
        AuthError::CancelledPopupRequest => format!(
            "Another {} sign-in is already in progress.",
            provider.as_str()
        ),
        AuthError::AccountExistsWithDifferentCredential => {
            "An account with this email already exists using a different sign-in method."
                .to_string()
        }
        AuthError::PopupBlocked => "Pop-up blocked. Please allow pop-ups and try again.".to_string(),
        AuthError::NetworkRequestFailed => "Network error. Please check your connection.".to_string(),
        _ => format!("{name} sign-in failed. Please try again."),
    }
}

fn password_reset_message(err: &AuthError) -> &'static str {
    match err {
        AuthError::InvalidEmail => "Invalid email format.",
        AuthError::UserNotFound => "No user found with this email address.",
        AuthError::NetworkRequestFailed => "Network error. Please check your connection.",
        _ => "Failed to send password reset email. Please try again.",
    }
}

fn sign_up_message(err: &AuthError, min_password_len: usize) -> String {
    match err {
        AuthError::EmailAlreadyInUse => "This email is already in use.".to_string(),
        AuthError::InvalidEmail => "Invalid email format.".to_string(),
        AuthError::WeakPassword => {
            format!("Password should be at least {min_password_len} characters.")
        }
        AuthError::NetworkRequestFailed => "Network error. Please check your connection.".to_string(),
        _ => "An unexpected error occurred. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_variants() {
        for code in [
            "auth/invalid-email",
            "auth/user-disabled",
            "auth/user-not-found",
            "auth/wrong-password",
            "auth/invalid-credential",
            "auth/too-many-requests",
            "auth/network-request-failed",
            "auth/popup-closed-by-user",
            "auth/cancelled-popup-request",
            "auth/popup-blocked",
            "auth/account-exists-with-different-credential",
            "auth/email-already-in-use",
            "auth/weak-password",
        ] {
            let err = AuthError::from_code(code);
            assert!(!matches!(err, AuthError::Other(_)), "{code} should be known");
            assert_eq!(err.code(), code);
        }
        assert_eq!(
            AuthError::from_code("auth/quota-exceeded"),
            AuthError::Other("auth/quota-exceeded".into())
        );
    }

    #[test]
    fn credential_failures_share_one_sign_in_message() {
        let expected = "Invalid email or password. Please try again.";
        for err in [
            AuthError::UserNotFound,
            AuthError::WrongPassword,
            AuthError::InvalidCredential,
        ] {
            assert_eq!(message_for(AuthFlow::SignIn, &err), expected);
        }
    }

    #[test]
    fn unknown_codes_fall_back_per_flow() {
        let err = AuthError::from_code("auth/something-new");
        assert_eq!(
            message_for(AuthFlow::SignIn, &err),
            "An unexpected error occurred. Please try again."
        );
        assert_eq!(
            message_for(AuthFlow::Federated(FederatedProvider::Google), &err),
            "Google sign-in failed. Please try again."
        );
        assert_eq!(
            message_for(AuthFlow::PasswordReset, &err),
            "Failed to send password reset email. Please try again."
        );
    }

    #[test]
    fn federated_messages_name_the_provider() {
        let facebook = AuthFlow::Federated(FederatedProvider::Facebook);
        assert_eq!(
            message_for(facebook, &AuthError::PopupClosedByUser),
            "Facebook sign-in was cancelled."
        );
        assert_eq!(
            message_for(facebook, &AuthError::CancelledPopupRequest),
            "Another facebook sign-in is already in progress."
        );
        assert_eq!(
            message_for(facebook, &AuthError::PopupBlocked),
            "Pop-up blocked. Please allow pop-ups and try again."
        );
    }

    #[test]
    fn weak_password_message_uses_configured_minimum() {
        let flow = AuthFlow::SignUp { min_password_len: 8 };
        assert_eq!(
            message_for(flow, &AuthError::WeakPassword),
            "Password should be at least 8 characters."
        );
        assert_eq!(
            message_for(flow, &AuthError::EmailAlreadyInUse),
            "This email is already in use."
        );
    }
}
