//! Shared types for lesson navigation

use lectern_util::LessonId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a lesson is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    /// Video element; its "ended" signal completes the lesson
    Video,
    /// Legacy SCORM package run in a sandboxed content frame
    Scorm,
}

impl LessonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LessonKind::Video => "video",
            LessonKind::Scorm => "scorm",
        }
    }
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// View of a lesson for the navigation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonView {
    pub lesson_id: LessonId,
    pub title: String,
    pub kind: LessonKind,
    /// Zero-based position in the course
    pub index: usize,
    pub complete: bool,
    /// Lesson 0 is always selectable; lesson i needs lesson i-1 complete
    pub selectable: bool,
    pub active: bool,
}

/// Where a learner stands in a course as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl CourseStatus {
    /// Status for `completed` of `total` lessons. An empty course has not
    /// been started.
    pub fn from_counts(completed: usize, total: usize) -> Self {
        if completed == 0 || total == 0 {
            CourseStatus::NotStarted
        } else if completed >= total {
            CourseStatus::Complete
        } else {
            CourseStatus::InProgress
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CourseStatus::NotStarted => "Not started",
            CourseStatus::InProgress => "In progress",
            CourseStatus::Complete => "Complete",
        }
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
