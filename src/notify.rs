use serde::Serialize;
use tokio::sync::broadcast;

const TOAST_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ToastKind {
    Success,
    Error,
}

/// Short user-visible notification.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

/// Fan-out of toasts to whatever view is showing them.
///
/// Publishing never fails: with no subscriber the toast is simply dropped.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Toast>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(TOAST_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(message.into(), ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(message.into(), ToastKind::Error);
    }

    fn publish(&self, message: String, kind: ToastKind) {
        let _ = self.sender.send(Toast { message, kind });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
