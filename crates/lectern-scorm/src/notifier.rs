//! Notification sinks

use lectern_api::NotificationEvent;
use lectern_ipc::ContentPort;
use lectern_util::SessionId;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives notifications synchronously from inside an API call.
///
/// Implementations must not block and must not call back into the session.
pub trait Notifier {
    fn notify(&self, session_id: SessionId, event: NotificationEvent);
}

impl Notifier for ContentPort {
    fn notify(&self, session_id: SessionId, event: NotificationEvent) {
        self.post_event(&event, Some(session_id));
    }
}

/// Keeps every notification in memory, in emission order
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Rc<RefCell<Vec<NotificationEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.borrow().clone()
    }

    /// Take and clear the recorded notifications
    pub fn take(&self) -> Vec<NotificationEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, _session_id: SessionId, event: NotificationEvent) {
        self.events.borrow_mut().push(event);
    }
}
