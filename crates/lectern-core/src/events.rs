//! Events emitted by the course player

use lectern_api::{EventData, EventKind};
use lectern_util::{CourseId, LessonId};
use std::time::Duration;

/// Events emitted by the course player
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A recognized notification arrived for the active lesson
    Progress { kind: EventKind, payload: EventData },

    /// First completion signal for the active lesson was handled
    LessonCompleted {
        lesson_id: LessonId,
        /// False when the lesson was already in the progress store
        newly_recorded: bool,
    },

    /// Advance to the next lesson will happen once the delay has passed
    AdvanceScheduled {
        from: LessonId,
        to: LessonId,
        delay: Duration,
    },

    /// Active lesson pointer moved
    LessonChanged {
        previous: Option<LessonId>,
        lesson_id: LessonId,
    },

    /// Progress for the course was reset
    ProgressCleared { course_id: CourseId },
}
