//! Completion policy

use lectern_api::{EventData, EventKind, cmi};

/// Outcome of classifying one recognized notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Report progress only
    ProgressOnly,
    /// Report progress and signal lesson completion
    Complete,
}

impl Completion {
    pub fn is_complete(self) -> bool {
        self == Completion::Complete
    }
}

/// Decide whether a notification signals lesson completion.
///
/// `complete` always does, since the content side only emits it once the
/// status is already completed or passed. `datachange` and `finish` carry
/// unrelated updates too, so completion is derived from their payload. No
/// deduplication happens here; guarding repeated signals is up to the
/// consumer.
pub fn classify(kind: &EventKind, data: &EventData) -> Completion {
    let complete = match kind {
        EventKind::Complete => true,
        EventKind::DataChange => {
            data.element.as_deref() == Some(cmi::LESSON_STATUS)
                && data.value.as_deref().is_some_and(cmi::is_completion_status)
        }
        EventKind::Finish => data
            .lesson_status
            .as_deref()
            .is_some_and(cmi::is_completion_status),
        EventKind::Initialize | EventKind::Commit | EventKind::Other(_) => false,
    };

    if complete {
        Completion::Complete
    } else {
        Completion::ProgressOnly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn datachange(element: &str, value: &str) -> EventData {
        EventData {
            element: Some(element.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    fn finish(status: &str) -> EventData {
        EventData {
            lesson_status: Some(status.into()),
            session_time: Some("00:01:10".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_initialize_and_commit_never_complete() {
        let commit = EventData {
            data: Some(BTreeMap::from([(
                cmi::LESSON_STATUS.to_string(),
                "completed".to_string(),
            )])),
            ..Default::default()
        };

        assert_eq!(
            classify(&EventKind::Initialize, &EventData::default()),
            Completion::ProgressOnly
        );
        assert_eq!(classify(&EventKind::Commit, &commit), Completion::ProgressOnly);
    }

    #[test]
    fn test_complete_always_completes() {
        assert_eq!(
            classify(&EventKind::Complete, &EventData::default()),
            Completion::Complete
        );
        assert_eq!(
            classify(&EventKind::Complete, &finish("incomplete")),
            Completion::Complete
        );
    }

    #[test]
    fn test_datachange() {
        assert!(classify(&EventKind::DataChange, &datachange(cmi::LESSON_STATUS, "completed")).is_complete());
        assert!(classify(&EventKind::DataChange, &datachange(cmi::LESSON_STATUS, "passed")).is_complete());

        assert!(!classify(&EventKind::DataChange, &datachange(cmi::LESSON_STATUS, "incomplete")).is_complete());
        assert!(!classify(&EventKind::DataChange, &datachange(cmi::LESSON_STATUS, "failed")).is_complete());
        assert!(!classify(&EventKind::DataChange, &datachange(cmi::SCORE_RAW, "85")).is_complete());
        // Completion values on other elements do not count
        assert!(!classify(&EventKind::DataChange, &datachange(cmi::SUSPEND_DATA, "completed")).is_complete());
        assert!(!classify(&EventKind::DataChange, &EventData::default()).is_complete());
    }

    #[test]
    fn test_finish() {
        assert!(classify(&EventKind::Finish, &finish("completed")).is_complete());
        assert!(classify(&EventKind::Finish, &finish("passed")).is_complete());
        assert!(!classify(&EventKind::Finish, &finish("incomplete")).is_complete());
        assert!(!classify(&EventKind::Finish, &finish("failed")).is_complete());
        assert!(!classify(&EventKind::Finish, &EventData::default()).is_complete());
    }

    #[test]
    fn test_unrecognized_kind_never_completes() {
        let kind = EventKind::Other("suspend".into());
        assert_eq!(
            classify(&kind, &datachange(cmi::LESSON_STATUS, "completed")),
            Completion::ProgressOnly
        );
    }
}
