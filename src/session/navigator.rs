use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Route {
    /// Sign-in screen; unauthenticated visitors land here.
    Entry,
    Signup,
    Explore,
    Games,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Entry => "/",
            Route::Signup => "/signup",
            Route::Explore => "/explore",
            Route::Games => "/games",
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that queues route requests for the shell to act on.
pub struct ChannelNavigator {
    sender: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        let _ = self.sender.send(route);
    }
}
