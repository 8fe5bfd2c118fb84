//! Catalog validation

use crate::schema::{RawConfig, RawCourse, RawLesson};
use lectern_api::LessonKind;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Course '{course_id}': {message}")]
    CourseError { course_id: String, message: String },

    #[error("Course '{course_id}', lesson '{lesson_id}': {message}")]
    LessonError {
        course_id: String,
        lesson_id: String,
        message: String,
    },

    #[error("Duplicate course ID: {0}")]
    DuplicateCourseId(String),

    #[error("Duplicate lesson ID '{lesson_id}' in course '{course_id}'")]
    DuplicateLessonId { course_id: String, lesson_id: String },

    #[error("Invalid lesson kind '{0}': expected \"video\" or \"scorm\"")]
    InvalidLessonKind(String),

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration, collecting every error found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut seen_ids = HashSet::new();
    for course in &config.courses {
        if !seen_ids.insert(&course.id) {
            errors.push(ValidationError::DuplicateCourseId(course.id.clone()));
        }
    }

    if let Some(learner_id) = &config.player.learner.student_id
        && learner_id.trim().is_empty()
    {
        errors.push(ValidationError::GlobalError(
            "learner.student_id cannot be empty".into(),
        ));
    }

    for course in &config.courses {
        errors.extend(validate_course(course));
    }

    errors
}

fn validate_course(course: &RawCourse) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let course_error = |message: &str| ValidationError::CourseError {
        course_id: course.id.clone(),
        message: message.into(),
    };

    if course.id.trim().is_empty() {
        errors.push(course_error("id cannot be empty"));
    }
    if course.title.trim().is_empty() {
        errors.push(course_error("title cannot be empty"));
    }
    if course.description.trim().is_empty() {
        errors.push(course_error("description cannot be empty"));
    }
    if course.lessons.is_empty() {
        errors.push(course_error("course must have at least one lesson"));
    }

    let mut seen_lessons = HashSet::new();
    for lesson in &course.lessons {
        if !seen_lessons.insert(&lesson.id) {
            errors.push(ValidationError::DuplicateLessonId {
                course_id: course.id.clone(),
                lesson_id: lesson.id.clone(),
            });
        }
        errors.extend(validate_lesson(&course.id, lesson));
    }

    errors
}

fn validate_lesson(course_id: &str, lesson: &RawLesson) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let lesson_error = |message: &str| ValidationError::LessonError {
        course_id: course_id.to_string(),
        lesson_id: lesson.id.clone(),
        message: message.into(),
    };

    if lesson.id.trim().is_empty() {
        errors.push(lesson_error("id cannot be empty"));
    }
    if lesson.title.trim().is_empty() {
        errors.push(lesson_error("title cannot be empty"));
    }

    if lesson.src.is_empty() {
        errors.push(lesson_error("src cannot be empty"));
    } else if !lesson.src.starts_with('/') {
        errors.push(lesson_error("src must be an absolute path starting with '/'"));
    }

    match parse_lesson_kind(&lesson.kind) {
        Ok(LessonKind::Video) => {
            if !lesson.src.ends_with(".mp4") {
                errors.push(lesson_error("video src must end in .mp4"));
            }
        }
        Ok(LessonKind::Scorm) => {
            if !lesson.src.ends_with(".html") {
                errors.push(lesson_error("scorm src must end in .html"));
            }
        }
        Err(e) => errors.push(e),
    }

    errors
}

/// Parse a lesson kind string
pub fn parse_lesson_kind(s: &str) -> Result<LessonKind, ValidationError> {
    match s.to_lowercase().as_str() {
        "video" => Ok(LessonKind::Video),
        "scorm" => Ok(LessonKind::Scorm),
        _ => Err(ValidationError::InvalidLessonKind(s.to_string())),
    }
}
