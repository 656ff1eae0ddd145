pub mod guard;
pub mod navigator;

pub use guard::{GateState, SessionGuard};
pub use navigator::{ChannelNavigator, Navigator, Route};
