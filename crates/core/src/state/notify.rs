//! Delivery of [`WrapperEvent`]s to an optional observer.

use mcb_protocol::ipc::WrapperEvent;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use tracing::debug;

/// Sends wrapper notifications without ever blocking the sender.
///
/// The read loop must keep draining the server's output even when nobody
/// consumes notifications, so a full channel drops the event instead of
/// waiting.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    events_tx: Option<Sender<WrapperEvent>>,
}

impl Notifier {
    pub fn new(events_tx: Option<Sender<WrapperEvent>>) -> Self {
        Self { events_tx }
    }

    pub fn publish(&self, event: WrapperEvent) {
        let Some(tx) = &self.events_tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!(?event, "event channel full, dropping notification");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}
