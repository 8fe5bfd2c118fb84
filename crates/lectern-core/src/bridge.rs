//! Host-side SCORM bridge
//!
//! Listens on the transport, drops anything that is not a SCORM
//! notification, and classifies the rest with [`classify`].

use lectern_api::{EventData, EventKind, MessageError, ScormMessage, cmi};
use lectern_ipc::{HostListener, IpcResult, MessageBus};
use lectern_util::SessionId;
use serde_json::Value;
use tracing::{debug, info, trace};

use crate::{Completion, classify};

/// Application callbacks driven by the bridge
pub trait BridgeCallbacks {
    /// Every recognized notification, whatever its kind
    fn on_progress(&mut self, payload: &EventData);

    /// Notifications that signal completion. May fire more than once per
    /// lesson; deduplication is the caller's concern.
    fn on_complete(&mut self);
}

/// A recognized notification with its classification
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedMessage {
    pub kind: EventKind,
    pub payload: EventData,
    pub session_id: Option<SessionId>,
    pub completion: Completion,
}

/// Read and classify a raw transport message.
///
/// Returns `None` for messages that are not SCORM notifications or cannot be
/// read; those are never surfaced as errors.
pub fn classify_message(raw: &Value) -> Option<ClassifiedMessage> {
    let message = match ScormMessage::from_value(raw) {
        Ok(message) => message,
        Err(MessageError::NotScorm) => {
            trace!("Ignoring non-SCORM message");
            return None;
        }
        Err(MessageError::Malformed(e)) => {
            debug!(error = %e, "Ignoring malformed SCORM message");
            return None;
        }
    };

    let completion = classify(&message.event_type, &message.data);
    trace_event(&message, completion);

    Some(ClassifiedMessage {
        kind: message.event_type,
        payload: message.data,
        session_id: message.session_id,
        completion,
    })
}

fn trace_event(message: &ScormMessage, completion: Completion) {
    let data = &message.data;
    match &message.event_type {
        EventKind::Initialize => {
            debug!(timestamp = ?data.timestamp, "SCORM session initialized");
        }
        EventKind::Commit => {
            debug!(
                session_time = ?data.session_time,
                elements = data.data.as_ref().map_or(0, |d| d.len()),
                "SCORM data committed"
            );
        }
        EventKind::Finish => {
            debug!(
                lesson_status = ?data.lesson_status,
                score = ?data.score,
                session_time = ?data.session_time,
                "SCORM session finished"
            );
        }
        EventKind::Complete => {
            info!(
                lesson_status = ?data.lesson_status,
                score = ?data.score,
                "SCORM lesson reported complete"
            );
        }
        EventKind::DataChange => match data.element.as_deref() {
            Some(cmi::SCORE_RAW) => debug!(score = ?data.value, "Score updated"),
            Some(cmi::LESSON_LOCATION) => debug!(location = ?data.value, "Bookmark updated"),
            Some(cmi::SUSPEND_DATA) => debug!(suspend_data = ?data.value, "Suspend data updated"),
            Some(cmi::LESSON_STATUS) => debug!(lesson_status = ?data.value, "Lesson status updated"),
            element => trace!(element = ?element, value = ?data.value, "Data model changed"),
        },
        EventKind::Other(kind) => {
            debug!(event_type = %kind, "Unrecognized SCORM event kind");
        }
    }

    if completion.is_complete() {
        debug!(event_type = %message.event_type, "Notification signals completion");
    }
}

/// Host end of the bridge. Dropping it deregisters the listener.
pub struct ScormBridge {
    listener: HostListener,
}

impl ScormBridge {
    /// Register a listener on the bus.
    ///
    /// Only messages posted after this call are seen, so attach before the
    /// content can initialize.
    pub fn attach(bus: &MessageBus) -> Self {
        Self {
            listener: bus.listen(),
        }
    }

    /// Invoke callbacks for one raw message
    pub fn dispatch(raw: &Value, callbacks: &mut impl BridgeCallbacks) -> Option<Completion> {
        let message = classify_message(raw)?;
        callbacks.on_progress(&message.payload);
        if message.completion.is_complete() {
            callbacks.on_complete();
        }
        Some(message.completion)
    }

    /// Next recognized message already buffered, without waiting
    pub fn poll(&mut self) -> IpcResult<Option<ClassifiedMessage>> {
        while let Some(raw) = self.listener.try_recv()? {
            if let Some(message) = classify_message(&raw) {
                return Ok(Some(message));
            }
        }
        Ok(None)
    }

    /// Wait for the next recognized message
    pub async fn next_message(&mut self) -> IpcResult<ClassifiedMessage> {
        loop {
            let raw = self.listener.recv().await?;
            if let Some(message) = classify_message(&raw) {
                return Ok(message);
            }
        }
    }

    /// Dispatch everything currently buffered; returns the number of
    /// recognized messages
    pub fn pump(&mut self, callbacks: &mut impl BridgeCallbacks) -> IpcResult<usize> {
        let mut count = 0;
        for raw in self.listener.drain()? {
            if Self::dispatch(&raw, callbacks).is_some() {
                count += 1;
            }
        }
        Ok(count)
    }
}
