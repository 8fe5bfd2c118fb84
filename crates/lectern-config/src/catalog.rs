//! Validated catalog structures

use crate::schema::{RawConfig, RawCourse, RawLearner, RawLesson, RawPlayerConfig};
use crate::validation::parse_lesson_kind;
use lectern_api::LessonKind;
use lectern_util::{CourseId, LessonId};
use std::path::PathBuf;
use std::time::Duration;

/// Default pause between completing a lesson and advancing to the next
pub const DEFAULT_AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(2000);

pub const DEFAULT_STUDENT_ID: &str = "student_001";
pub const DEFAULT_STUDENT_NAME: &str = "Student";

/// Validated catalog ready for use by the player
#[derive(Debug, Clone)]
pub struct Catalog {
    pub player: PlayerConfig,
    pub courses: Vec<Course>,
}

impl Catalog {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            player: PlayerConfig::from_raw(raw.player),
            courses: raw.courses.into_iter().map(Course::from_raw).collect(),
        }
    }

    /// Get course by ID
    pub fn get_course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| &c.id == id)
    }
}

/// Player configuration
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub data_dir: PathBuf,
    pub auto_advance_delay: Duration,
    pub auto_initialize: bool,
    pub learner: Learner,
}

impl PlayerConfig {
    fn from_raw(raw: RawPlayerConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(lectern_util::default_data_dir),
            auto_advance_delay: raw
                .auto_advance_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_AUTO_ADVANCE_DELAY),
            auto_initialize: raw.auto_initialize,
            learner: Learner::from_raw(raw.learner),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            data_dir: lectern_util::default_data_dir(),
            auto_advance_delay: DEFAULT_AUTO_ADVANCE_DELAY,
            auto_initialize: false,
            learner: Learner::default(),
        }
    }
}

/// Learner identity seeded into the content data model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Learner {
    pub student_id: String,
    pub student_name: String,
}

impl Learner {
    fn from_raw(raw: RawLearner) -> Self {
        Self {
            student_id: raw
                .student_id
                .unwrap_or_else(|| DEFAULT_STUDENT_ID.to_string()),
            student_name: raw
                .student_name
                .unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_string()),
        }
    }
}

impl Default for Learner {
    fn default() -> Self {
        Self {
            student_id: DEFAULT_STUDENT_ID.to_string(),
            student_name: DEFAULT_STUDENT_NAME.to_string(),
        }
    }
}

/// Validated course
#[derive(Debug, Clone)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    /// Lessons in presentation order
    pub lessons: Vec<Lesson>,
}

impl Course {
    fn from_raw(raw: RawCourse) -> Self {
        Self {
            id: CourseId::new(raw.id),
            title: raw.title,
            description: raw.description,
            lessons: raw.lessons.into_iter().map(Lesson::from_raw).collect(),
        }
    }

    pub fn lesson_index(&self, id: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|l| &l.id == id)
    }

    pub fn get_lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| &l.id == id)
    }

    /// The lesson after `id` in sequence, if any
    pub fn next_lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lesson_index(id).and_then(|i| self.lessons.get(i + 1))
    }
}

/// Validated lesson
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub kind: LessonKind,
    pub src: String,
}

impl Lesson {
    pub fn new(
        id: impl Into<LessonId>,
        title: impl Into<String>,
        kind: LessonKind,
        src: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            src: src.into(),
        }
    }

    fn from_raw(raw: RawLesson) -> Self {
        // Kind was checked during validation; scorm is the only other option
        let kind = parse_lesson_kind(&raw.kind).unwrap_or(LessonKind::Scorm);
        Self {
            id: LessonId::new(raw.id),
            title: raw.title,
            kind,
            src: raw.src,
        }
    }
}
