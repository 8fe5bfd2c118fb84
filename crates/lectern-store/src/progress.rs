//! Per-course lesson completion tracking
//!
//! The completed set lives in memory and is written through to the store on
//! every mutation. Store failures are logged and swallowed, so the in-memory
//! set stays authoritative for the lifetime of the tracker.

use lectern_util::{CourseId, LessonId};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::Store;

const STORAGE_KEY_PREFIX: &str = "lms_progress_";

/// Completed-lesson set for one course
pub struct ProgressTracker {
    course_id: CourseId,
    completed: Vec<LessonId>,
    store: Arc<dyn Store>,
}

impl ProgressTracker {
    /// Store key holding a course's completed lessons
    pub fn storage_key(course_id: &CourseId) -> String {
        format!("{}{}", STORAGE_KEY_PREFIX, course_id)
    }

    /// Load progress for a course.
    ///
    /// Missing, unreadable, or corrupted values (not JSON, not an array of
    /// strings) all load as an empty set.
    pub fn load(course_id: CourseId, store: Arc<dyn Store>) -> Self {
        let key = Self::storage_key(&course_id);

        let completed = match store.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => {
                    let mut completed: Vec<LessonId> = Vec::with_capacity(ids.len());
                    for id in ids.into_iter().map(LessonId::new) {
                        if id.is_valid() && !completed.contains(&id) {
                            completed.push(id);
                        }
                    }
                    completed
                }
                Err(e) => {
                    warn!(course_id = %course_id, error = %e, "Stored progress is corrupted, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(course_id = %course_id, error = %e, "Failed to load progress");
                Vec::new()
            }
        };

        debug!(course_id = %course_id, completed = completed.len(), "Progress loaded");

        Self {
            course_id,
            completed,
            store,
        }
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    /// Record a lesson as complete.
    ///
    /// Returns `true` if the lesson was newly added. Adding a lesson that is
    /// already complete is a no-op; invalid identifiers are ignored.
    pub fn mark_complete(&mut self, lesson_id: &LessonId) -> bool {
        if !lesson_id.is_valid() {
            warn!(lesson_id = %lesson_id, "Invalid lesson id passed to mark_complete");
            return false;
        }

        if self.completed.contains(lesson_id) {
            return false;
        }

        self.completed.push(lesson_id.clone());
        info!(course_id = %self.course_id, lesson_id = %lesson_id, "Lesson marked complete");
        self.persist();
        true
    }

    pub fn is_complete(&self, lesson_id: &LessonId) -> bool {
        lesson_id.is_valid() && self.completed.contains(lesson_id)
    }

    /// Completed lessons in the order they were completed
    pub fn completed_lessons(&self) -> &[LessonId] {
        &self.completed
    }

    /// Explicit reset: forget every completed lesson and remove the stored key
    pub fn clear(&mut self) {
        self.completed.clear();
        let key = Self::storage_key(&self.course_id);
        if let Err(e) = self.store.remove(&key) {
            warn!(course_id = %self.course_id, error = %e, "Failed to clear stored progress");
        }
        info!(course_id = %self.course_id, "Progress cleared");
    }

    fn persist(&self) {
        let key = Self::storage_key(&self.course_id);
        let ids: Vec<&str> = self.completed.iter().map(LessonId::as_str).collect();

        let result = serde_json::to_string(&ids)
            .map_err(crate::StoreError::from)
            .and_then(|json| self.store.set(&key, &json));

        if let Err(e) = result {
            warn!(course_id = %self.course_id, error = %e, "Failed to save progress");
        }
    }
}
