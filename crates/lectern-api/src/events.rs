//! Notification types for content -> host streaming

use chrono::{DateTime, SecondsFormat, Utc};
use lectern_util::SessionId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::SCORM_EVENT_DISCRIMINATOR;

/// Kind of a notification, carried as the `eventType` string.
///
/// Unrecognized kinds are preserved rather than rejected so that the host
/// can still report them as progress. A non-string `eventType` is kept as
/// its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum EventKind {
    Initialize,
    Commit,
    Finish,
    Complete,
    DataChange,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Initialize => "initialize",
            EventKind::Commit => "commit",
            EventKind::Finish => "finish",
            EventKind::Complete => "complete",
            EventKind::DataChange => "datachange",
            EventKind::Other(kind) => kind,
        }
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "initialize" => EventKind::Initialize,
            "commit" => EventKind::Commit,
            "finish" => EventKind::Finish,
            "complete" => EventKind::Complete,
            "datachange" => EventKind::DataChange,
            _ => EventKind::Other(s),
        }
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        EventKind::from(s.to_string())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => EventKind::from(s),
            other => EventKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification payload as seen by the host.
///
/// Every field is optional: which ones are present depends on the event kind.
/// Scalar values that arrive as numbers or booleans are read as their string
/// form; keys outside the known set are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub lesson_status: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub suspend_data: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub session_time: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Full data model snapshot (commit only)
    #[serde(default, deserialize_with = "lenient_map", skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_string))
}

fn lenient_map<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(
            map.into_iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|v| (k, v)))
                .collect(),
        ),
        _ => None,
    })
}

fn data_or_default<'de, D>(deserializer: D) -> Result<EventData, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<EventData>::deserialize(deserializer)?.unwrap_or_default())
}

/// Typed notification produced by the content-side runtime.
///
/// One state-changing API call produces exactly the notifications listed for
/// it; nothing is retained after sending.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// Session entered Active
    Initialize { timestamp: DateTime<Utc> },

    /// Snapshot of the full data model
    Commit {
        data: BTreeMap<String, String>,
        session_time: String,
    },

    /// Session terminated
    Finish {
        session_time: String,
        lesson_status: String,
        score: String,
        suspend_data: String,
    },

    /// Lesson status was set to completed or passed
    Complete {
        lesson_status: String,
        score: String,
        suspend_data: String,
        session_time: String,
    },

    /// Any successful write
    DataChange { element: String, value: String },
}

impl NotificationEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            NotificationEvent::Initialize { .. } => EventKind::Initialize,
            NotificationEvent::Commit { .. } => EventKind::Commit,
            NotificationEvent::Finish { .. } => EventKind::Finish,
            NotificationEvent::Complete { .. } => EventKind::Complete,
            NotificationEvent::DataChange { .. } => EventKind::DataChange,
        }
    }

    /// Payload in the host-facing shape
    pub fn payload(&self) -> EventData {
        match self.clone() {
            NotificationEvent::Initialize { timestamp } => EventData {
                timestamp: Some(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
                ..Default::default()
            },
            NotificationEvent::Commit { data, session_time } => EventData {
                data: Some(data),
                session_time: Some(session_time),
                ..Default::default()
            },
            NotificationEvent::Finish {
                session_time,
                lesson_status,
                score,
                suspend_data,
            }
            | NotificationEvent::Complete {
                lesson_status,
                score,
                suspend_data,
                session_time,
            } => EventData {
                session_time: Some(session_time),
                lesson_status: Some(lesson_status),
                score: Some(score),
                suspend_data: Some(suspend_data),
                ..Default::default()
            },
            NotificationEvent::DataChange { element, value } => EventData {
                element: Some(element),
                value: Some(value),
                ..Default::default()
            },
        }
    }
}

/// Errors reading a message off the transport
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Not a SCORM notification")]
    NotScorm,

    #[error("Malformed SCORM notification: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Envelope sent across the frame boundary:
/// `{ "type": "scorm-event", "eventType": ..., "data": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScormMessage {
    #[serde(rename = "type")]
    pub discriminator: String,

    #[serde(rename = "eventType")]
    pub event_type: EventKind,

    #[serde(default, deserialize_with = "data_or_default")]
    pub data: EventData,

    /// Originating content session, when known
    #[serde(rename = "sessionId", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl ScormMessage {
    pub fn new(event_type: EventKind, data: EventData) -> Self {
        Self {
            discriminator: SCORM_EVENT_DISCRIMINATOR.to_string(),
            event_type,
            data,
            session_id: None,
        }
    }

    pub fn from_event(event: &NotificationEvent) -> Self {
        Self::new(event.kind(), event.payload())
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Read a raw cross-frame message.
    ///
    /// Messages without the SCORM discriminator yield [`MessageError::NotScorm`]
    /// before any further parsing is attempted.
    pub fn from_value(value: &Value) -> Result<Self, MessageError> {
        let discriminator = value.get("type").and_then(Value::as_str);
        if discriminator != Some(SCORM_EVENT_DISCRIMINATOR) {
            return Err(MessageError::NotScorm);
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}
