pub mod errors;
pub mod local;
pub mod password;
pub mod provider;

pub use errors::{message_for, AuthError, AuthFlow};
pub use local::LocalIdentityProvider;
pub use provider::{AuthState, FederatedProvider, IdentityProvider};
