//! Fan-out message bus

use std::sync::{Arc, Mutex, MutexGuard};

use lectern_api::{NotificationEvent, ScormMessage};
use lectern_util::SessionId;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::{IpcError, IpcResult};

type Listeners = Arc<Mutex<Vec<mpsc::UnboundedSender<Value>>>>;

fn lock(listeners: &Listeners) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<Value>>> {
    listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The host page's message target.
///
/// Content frames post through a [`ContentPort`]; the host registers
/// [`HostListener`]s. Raw JSON values travel on the bus so that unrelated
/// cross-frame traffic shares the channel with SCORM notifications.
///
/// Each listener owns an unbounded queue, so a host that drains late still
/// sees every message posted after it registered.
pub struct MessageBus {
    listeners: Listeners,
}

impl MessageBus {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sending half handed to a content frame
    pub fn port(&self) -> ContentPort {
        ContentPort {
            listeners: self.listeners.clone(),
        }
    }

    /// Register a listener. It receives only messages sent after this call.
    pub fn listen(&self) -> HostListener {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut listeners = lock(&self.listeners);
        listeners.retain(|sender| !sender.is_closed());
        listeners.push(tx);
        debug!(listeners = listeners.len(), "Host listener registered");
        HostListener { rx }
    }

    pub fn listener_count(&self) -> usize {
        let mut listeners = lock(&self.listeners);
        listeners.retain(|sender| !sender.is_closed());
        listeners.len()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Content-side sending half of the bus
#[derive(Clone)]
pub struct ContentPort {
    listeners: Listeners,
}

impl ContentPort {
    /// Post a raw message. Never blocks and never reports delivery.
    pub fn post(&self, message: Value) {
        let mut listeners = lock(&self.listeners);
        listeners.retain(|sender| sender.send(message.clone()).is_ok());
        if listeners.is_empty() {
            trace!("No host listener registered, message dropped");
        }
    }

    /// Post a SCORM notification in its wire envelope
    pub fn post_event(&self, event: &NotificationEvent, session_id: Option<SessionId>) {
        let mut message = ScormMessage::from_event(event);
        message.session_id = session_id;

        match message.to_value() {
            Ok(value) => {
                trace!(event_type = %message.event_type, "Posting notification");
                self.post(value);
            }
            Err(e) => {
                warn!(event_type = %message.event_type, error = %e, "Failed to encode notification");
            }
        }
    }
}

/// Host-side receiving half. Dropping it deregisters the listener.
pub struct HostListener {
    rx: mpsc::UnboundedReceiver<Value>,
}

impl HostListener {
    /// Wait for the next message.
    ///
    /// Returns [`IpcError::ChannelClosed`] once the bus and every port are
    /// gone and the queue is drained.
    pub async fn recv(&mut self) -> IpcResult<Value> {
        self.rx.recv().await.ok_or(IpcError::ChannelClosed)
    }

    /// Take the next queued message without waiting
    pub fn try_recv(&mut self) -> IpcResult<Option<Value>> {
        match self.rx.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(IpcError::ChannelClosed),
        }
    }

    /// Drain everything currently buffered
    pub fn drain(&mut self) -> IpcResult<Vec<Value>> {
        let mut messages = Vec::new();
        while let Some(value) = self.try_recv()? {
            messages.push(value);
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_without_listener_is_lost() {
        let bus = MessageBus::new();
        let port = bus.port();

        port.post(json!({ "type": "scorm-event", "eventType": "initialize" }));

        let mut listener = bus.listen();
        assert!(listener.try_recv().unwrap().is_none());
    }

    #[test]
    fn delivers_in_send_order_to_all_listeners() {
        let bus = MessageBus::new();
        let port = bus.port();
        let mut first = bus.listen();
        let mut second = bus.listen();

        for i in 0..3 {
            port.post(json!({ "seq": i }));
        }

        for listener in [&mut first, &mut second] {
            let seqs: Vec<_> = listener
                .drain()
                .unwrap()
                .iter()
                .map(|v| v["seq"].as_i64().unwrap())
                .collect();
            assert_eq!(seqs, vec![0, 1, 2]);
        }
    }

    #[test]
    fn dropping_listener_deregisters() {
        let bus = MessageBus::new();
        let listener = bus.listen();
        assert_eq!(bus.listener_count(), 1);

        drop(listener);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn dropped_listener_is_pruned_on_post() {
        let bus = MessageBus::new();
        let port = bus.port();
        let mut kept = bus.listen();
        drop(bus.listen());

        port.post(json!({ "n": 1 }));

        assert_eq!(bus.listener_count(), 1);
        assert_eq!(kept.drain().unwrap(), vec![json!({ "n": 1 })]);
    }

    #[test]
    fn late_drain_loses_nothing() {
        let bus = MessageBus::new();
        let port = bus.port();
        let mut listener = bus.listen();

        for i in 0..1000 {
            port.post(json!({ "seq": i }));
        }

        let seqs: Vec<_> = listener
            .drain()
            .unwrap()
            .iter()
            .map(|v| v["seq"].as_i64().unwrap())
            .collect();
        assert_eq!(seqs, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn post_event_wraps_in_envelope() {
        let bus = MessageBus::new();
        let mut listener = bus.listen();
        let session_id = SessionId::new();

        bus.port().post_event(
            &NotificationEvent::DataChange {
                element: "cmi.core.lesson_location".into(),
                value: "slide-3".into(),
            },
            Some(session_id),
        );

        let value = listener.try_recv().unwrap().unwrap();
        let message = ScormMessage::from_value(&value).unwrap();
        assert_eq!(message.data.value.as_deref(), Some("slide-3"));
        assert_eq!(message.session_id, Some(session_id));
    }

    #[tokio::test]
    async fn recv_reports_closed_channel() {
        let bus = MessageBus::new();
        let port = bus.port();
        let mut listener = bus.listen();

        port.post(json!({ "n": 1 }));
        drop(port);
        drop(bus);

        assert_eq!(listener.recv().await.unwrap(), json!({ "n": 1 }));
        assert!(matches!(listener.recv().await, Err(IpcError::ChannelClosed)));
    }
}
