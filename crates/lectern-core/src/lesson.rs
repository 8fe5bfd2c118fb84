//! Active lesson pointer

use lectern_util::LessonId;

/// Transient pointer to the lesson currently displayed.
///
/// Not persisted; a new player starts on the first lesson.
#[derive(Debug, Clone, Default)]
pub struct LessonState {
    active: Option<LessonId>,
}

impl LessonState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&LessonId> {
        self.active.as_ref()
    }

    pub fn is_active(&self, lesson_id: &LessonId) -> bool {
        self.active.as_ref() == Some(lesson_id)
    }

    /// Point at a lesson, returning the previously active one
    pub fn activate(&mut self, lesson_id: LessonId) -> Option<LessonId> {
        self.active.replace(lesson_id)
    }

    pub fn clear(&mut self) -> Option<LessonId> {
        self.active.take()
    }
}
