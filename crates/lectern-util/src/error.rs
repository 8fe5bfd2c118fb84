//! Error types for lectern

use thiserror::Error;

use crate::{CourseId, LessonId};

/// Core error type for lectern host-side operations
#[derive(Debug, Error)]
pub enum LecternError {
    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    #[error("Lesson not found: {0}")]
    LessonNotFound(LessonId),

    #[error("Lesson is locked until the previous lesson is complete: {0}")]
    LessonLocked(LessonId),

    #[error("Lesson is not SCORM content: {0}")]
    NotScormContent(LessonId),

    #[error("No active lesson")]
    NoActiveLesson,
}

pub type Result<T> = std::result::Result<T, LecternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_id() {
        assert_eq!(
            LecternError::LessonLocked(LessonId::new("final")).to_string(),
            "Lesson is locked until the previous lesson is complete: final"
        );
        assert_eq!(
            LecternError::CourseNotFound(CourseId::new("pwp-101")).to_string(),
            "Course not found: pwp-101"
        );
    }
}
