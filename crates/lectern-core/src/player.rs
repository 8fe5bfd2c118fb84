//! Course player
//!
//! Owns the active lesson pointer and the course's progress, and turns
//! completion signals into progress writes and delayed auto-advance.

use lectern_api::{CourseStatus, LessonView};
use lectern_config::{Course, Lesson};
use lectern_store::{ProgressTracker, Store};
use lectern_util::{LecternError, LessonId, MonotonicInstant, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::{ClassifiedMessage, LessonState, PlayerEvent, classify_message};

/// Advance waiting for its delay to pass
#[derive(Debug, Clone)]
struct PendingAdvance {
    from: LessonId,
    to: LessonId,
    due: MonotonicInstant,
}

/// Player for one course
pub struct CoursePlayer {
    course: Course,
    progress: ProgressTracker,
    lessons: LessonState,

    /// Set once the active lesson's first completion has been handled.
    /// Cleared whenever the active lesson changes.
    completion_handled: bool,

    pending_advance: Option<PendingAdvance>,
    advance_delay: Duration,
}

impl CoursePlayer {
    /// Create a player, loading persisted progress. The first lesson starts
    /// active.
    pub fn new(course: Course, store: Arc<dyn Store>, advance_delay: Duration) -> Self {
        let progress = ProgressTracker::load(course.id.clone(), store);
        let mut lessons = LessonState::new();
        if let Some(first) = course.lessons.first() {
            lessons.activate(first.id.clone());
        }

        info!(
            course_id = %course.id,
            lessons = course.lessons.len(),
            completed = progress.completed_lessons().len(),
            "Course player ready"
        );

        Self {
            course,
            progress,
            lessons,
            completion_handled: false,
            pending_advance: None,
            advance_delay,
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn active_lesson(&self) -> Option<&Lesson> {
        self.lessons
            .active()
            .and_then(|id| self.course.get_lesson(id))
    }

    pub fn is_complete(&self, lesson_id: &LessonId) -> bool {
        self.progress.is_complete(lesson_id)
    }

    /// Number of this course's lessons recorded complete. Stored ids that
    /// no longer name a lesson in the course are not counted.
    pub fn completed_count(&self) -> usize {
        self.course
            .lessons
            .iter()
            .filter(|lesson| self.progress.is_complete(&lesson.id))
            .count()
    }

    /// Completed share of the course, rounded to a whole percent. Zero for
    /// an empty course.
    pub fn progress_percent(&self) -> u8 {
        let total = self.course.lessons.len();
        if total == 0 {
            return 0;
        }
        let percent = (self.completed_count() * 100 + total / 2) / total;
        u8::try_from(percent).unwrap_or(100)
    }

    pub fn status(&self) -> CourseStatus {
        CourseStatus::from_counts(self.completed_count(), self.course.lessons.len())
    }

    /// Sequential gating: the first lesson is always allowed, every other
    /// lesson needs its predecessor complete
    pub fn is_lesson_allowed(&self, index: usize) -> bool {
        match index {
            0 => !self.course.lessons.is_empty(),
            i => match (self.course.lessons.get(i), self.course.lessons.get(i - 1)) {
                (Some(_), Some(prev)) => self.progress.is_complete(&prev.id),
                _ => false,
            },
        }
    }

    pub fn lesson_views(&self) -> Vec<LessonView> {
        self.course
            .lessons
            .iter()
            .enumerate()
            .map(|(index, lesson)| LessonView {
                lesson_id: lesson.id.clone(),
                title: lesson.title.clone(),
                kind: lesson.kind,
                index,
                complete: self.progress.is_complete(&lesson.id),
                selectable: self.is_lesson_allowed(index),
                active: self.lessons.is_active(&lesson.id),
            })
            .collect()
    }

    /// Make a lesson active, subject to gating
    pub fn select_lesson(&mut self, lesson_id: &LessonId) -> Result<Option<PlayerEvent>> {
        let index = self
            .course
            .lesson_index(lesson_id)
            .ok_or_else(|| LecternError::LessonNotFound(lesson_id.clone()))?;

        if !self.is_lesson_allowed(index) {
            return Err(LecternError::LessonLocked(lesson_id.clone()));
        }

        Ok(self.activate(lesson_id.clone()))
    }

    /// Step forward one lesson. Gated like [`select_lesson`](Self::select_lesson).
    pub fn next(&mut self) -> Result<Option<PlayerEvent>> {
        let index = self.active_index()?;
        match self.course.lessons.get(index + 1) {
            Some(lesson) => {
                let id = lesson.id.clone();
                self.select_lesson(&id)
            }
            None => Ok(None),
        }
    }

    /// Step back one lesson. Earlier lessons are always reachable.
    pub fn previous(&mut self) -> Result<Option<PlayerEvent>> {
        let index = self.active_index()?;
        match index.checked_sub(1).and_then(|i| self.course.lessons.get(i)) {
            Some(lesson) => {
                let id = lesson.id.clone();
                Ok(self.activate(id))
            }
            None => Ok(None),
        }
    }

    /// Handle a completion signal for the active lesson.
    ///
    /// Only the first signal per displayed lesson has any effect: the lesson
    /// is recorded complete and, when a next lesson exists, an advance is
    /// scheduled for `now + delay`.
    pub fn on_lesson_complete(&mut self, now_mono: MonotonicInstant) -> Vec<PlayerEvent> {
        let mut events = Vec::new();

        let Some(lesson_id) = self.lessons.active().cloned() else {
            debug!("Completion signal with no active lesson");
            return events;
        };

        if self.completion_handled {
            debug!(lesson_id = %lesson_id, "Completion already handled for this lesson");
            return events;
        }
        self.completion_handled = true;

        let newly_recorded = self.progress.mark_complete(&lesson_id);
        info!(lesson_id = %lesson_id, newly_recorded, "Lesson completed");
        events.push(PlayerEvent::LessonCompleted {
            lesson_id: lesson_id.clone(),
            newly_recorded,
        });

        if let Some(next) = self.course.next_lesson(&lesson_id) {
            let due = now_mono + self.advance_delay;
            debug!(
                from = %lesson_id,
                to = %next.id,
                delay_ms = self.advance_delay.as_millis() as u64,
                "Auto-advance scheduled"
            );
            events.push(PlayerEvent::AdvanceScheduled {
                from: lesson_id.clone(),
                to: next.id.clone(),
                delay: self.advance_delay,
            });
            self.pending_advance = Some(PendingAdvance {
                from: lesson_id,
                to: next.id.clone(),
                due,
            });
        }

        events
    }

    /// A video lesson finished playing
    pub fn on_media_ended(&mut self, now_mono: MonotonicInstant) -> Vec<PlayerEvent> {
        self.on_lesson_complete(now_mono)
    }

    /// Feed one raw transport message through the shared classification
    pub fn handle_message(&mut self, raw: &Value, now_mono: MonotonicInstant) -> Vec<PlayerEvent> {
        match classify_message(raw) {
            Some(message) => self.handle_classified(message, now_mono),
            None => Vec::new(),
        }
    }

    pub fn handle_classified(
        &mut self,
        message: ClassifiedMessage,
        now_mono: MonotonicInstant,
    ) -> Vec<PlayerEvent> {
        let complete = message.completion.is_complete();
        let mut events = vec![PlayerEvent::Progress {
            kind: message.kind,
            payload: message.payload,
        }];

        if complete {
            events.extend(self.on_lesson_complete(now_mono));
        }
        events
    }

    /// Fire a pending advance once its delay has passed
    pub fn tick(&mut self, now_mono: MonotonicInstant) -> Vec<PlayerEvent> {
        let mut events = Vec::new();

        let Some(pending) = self.pending_advance.as_ref() else {
            return events;
        };
        if now_mono < pending.due {
            return events;
        }

        let Some(pending) = self.pending_advance.take() else {
            return events;
        };
        if !self.lessons.is_active(&pending.from) {
            debug!(from = %pending.from, "Active lesson changed before advance, dropping");
            return events;
        }

        info!(from = %pending.from, to = %pending.to, "Auto-advancing");
        events.extend(self.activate(pending.to));
        events
    }

    /// Time left until the pending advance fires, if one is scheduled
    pub fn time_until_advance(&self, now_mono: MonotonicInstant) -> Option<Duration> {
        self.pending_advance
            .as_ref()
            .map(|p| p.due.saturating_duration_until(now_mono))
    }

    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    /// Forget all progress for this course, in memory and in the store
    pub fn reset_progress(&mut self) -> PlayerEvent {
        self.progress.clear();
        self.completion_handled = false;
        self.pending_advance = None;
        PlayerEvent::ProgressCleared {
            course_id: self.course.id.clone(),
        }
    }

    fn active_index(&self) -> Result<usize> {
        self.lessons
            .active()
            .and_then(|id| self.course.lesson_index(id))
            .ok_or(LecternError::NoActiveLesson)
    }

    fn activate(&mut self, lesson_id: LessonId) -> Option<PlayerEvent> {
        if self.lessons.is_active(&lesson_id) {
            return None;
        }

        let previous = self.lessons.activate(lesson_id.clone());
        self.completion_handled = false;
        self.pending_advance = None;

        info!(lesson_id = %lesson_id, previous = ?previous, "Lesson changed");
        Some(PlayerEvent::LessonChanged {
            previous,
            lesson_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_api::{EventKind, LessonKind};
    use lectern_store::MemoryStore;
    use lectern_util::CourseId;
    use serde_json::json;

    const DELAY: Duration = Duration::from_millis(2000);

    fn make_course() -> Course {
        Course {
            id: CourseId::new("pwp-101"),
            title: "Working with Power Tools".into(),
            description: "Safety basics".into(),
            lessons: vec![
                Lesson::new("intro", "Introduction", LessonKind::Video, "/media/intro.mp4"),
                Lesson::new("practice", "Practice", LessonKind::Scorm, "/content/practice.html"),
                Lesson::new("quiz", "Quiz", LessonKind::Scorm, "/content/quiz.html"),
            ],
        }
    }

    fn make_player() -> (CoursePlayer, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let player = CoursePlayer::new(make_course(), store.clone(), DELAY);
        (player, store)
    }

    fn lesson(id: &str) -> LessonId {
        LessonId::new(id)
    }

    fn complete_message() -> Value {
        json!({"type": "scorm-event", "eventType": "complete", "data": {"lessonStatus": "completed"}})
    }

    #[test]
    fn test_first_lesson_active_on_start() {
        let (player, _) = make_player();
        assert_eq!(player.active_lesson().map(|l| l.id.clone()), Some(lesson("intro")));

        let views = player.lesson_views();
        assert_eq!(views.len(), 3);
        assert!(views[0].active && views[0].selectable && !views[0].complete);
        assert!(!views[1].selectable);
        assert!(!views[2].selectable);
    }

    #[test]
    fn test_empty_course_has_no_active_lesson() {
        let mut course = make_course();
        course.lessons.clear();
        let mut player = CoursePlayer::new(course, Arc::new(MemoryStore::new()), DELAY);

        assert!(player.active_lesson().is_none());
        assert!(!player.is_lesson_allowed(0));
        assert!(matches!(player.next(), Err(LecternError::NoActiveLesson)));
        assert!(player.on_lesson_complete(MonotonicInstant::now()).is_empty());
    }

    #[test]
    fn test_progress_percent() {
        let (mut player, _) = make_player();
        assert_eq!(player.progress_percent(), 0);
        assert_eq!(player.status(), CourseStatus::NotStarted);

        let now = MonotonicInstant::now();
        player.on_lesson_complete(now);
        assert_eq!(player.completed_count(), 1);
        assert_eq!(player.progress_percent(), 33);
        assert_eq!(player.status(), CourseStatus::InProgress);

        player.tick(now + DELAY);
        player.on_lesson_complete(now + DELAY);
        assert_eq!(player.progress_percent(), 67);

        player.tick(now + DELAY * 2);
        player.on_lesson_complete(now + DELAY * 2);
        assert_eq!(player.progress_percent(), 100);
        assert_eq!(player.status(), CourseStatus::Complete);
    }

    #[test]
    fn test_progress_ignores_lessons_outside_course() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                &ProgressTracker::storage_key(&CourseId::new("pwp-101")),
                r#"["retired", "old-quiz", "intro"]"#,
            )
            .unwrap();
        let player = CoursePlayer::new(make_course(), store, DELAY);

        assert_eq!(player.completed_count(), 1);
        assert_eq!(player.progress_percent(), 33);
    }

    #[test]
    fn test_empty_course_progress_is_zero() {
        let mut course = make_course();
        course.lessons.clear();
        let player = CoursePlayer::new(course, Arc::new(MemoryStore::new()), DELAY);

        assert_eq!(player.progress_percent(), 0);
        assert_eq!(player.status(), CourseStatus::NotStarted);
    }

    #[test]
    fn test_select_lesson_gating() {
        let (mut player, _) = make_player();

        assert!(matches!(
            player.select_lesson(&lesson("practice")),
            Err(LecternError::LessonLocked(_))
        ));
        assert!(matches!(
            player.select_lesson(&lesson("missing")),
            Err(LecternError::LessonNotFound(_))
        ));
        assert!(matches!(player.next(), Err(LecternError::LessonLocked(_))));

        player.on_media_ended(MonotonicInstant::now());
        assert!(player.is_lesson_allowed(1));

        let event = player.select_lesson(&lesson("practice")).unwrap();
        assert_eq!(
            event,
            Some(PlayerEvent::LessonChanged {
                previous: Some(lesson("intro")),
                lesson_id: lesson("practice"),
            })
        );
        // Selecting the active lesson again is a no-op
        assert_eq!(player.select_lesson(&lesson("practice")).unwrap(), None);
    }

    #[test]
    fn test_previous() {
        let (mut player, _) = make_player();
        assert_eq!(player.previous().unwrap(), None);

        player.on_media_ended(MonotonicInstant::now());
        player.next().unwrap();
        assert_eq!(player.active_lesson().unwrap().id, lesson("practice"));

        player.previous().unwrap();
        assert_eq!(player.active_lesson().unwrap().id, lesson("intro"));
    }

    #[test]
    fn test_completion_schedules_advance() {
        let (mut player, _) = make_player();
        let start = MonotonicInstant::now();

        let events = player.on_media_ended(start);
        assert_eq!(
            events,
            vec![
                PlayerEvent::LessonCompleted {
                    lesson_id: lesson("intro"),
                    newly_recorded: true,
                },
                PlayerEvent::AdvanceScheduled {
                    from: lesson("intro"),
                    to: lesson("practice"),
                    delay: DELAY,
                },
            ]
        );
        assert!(player.is_complete(&lesson("intro")));
        assert_eq!(player.time_until_advance(start), Some(DELAY));

        // Not yet due
        assert!(player.tick(start + Duration::from_millis(1999)).is_empty());
        assert_eq!(player.active_lesson().unwrap().id, lesson("intro"));

        let events = player.tick(start + DELAY);
        assert_eq!(
            events,
            vec![PlayerEvent::LessonChanged {
                previous: Some(lesson("intro")),
                lesson_id: lesson("practice"),
            }]
        );
        assert!(!player.has_pending_advance());
        assert!(player.tick(start + DELAY * 2).is_empty());
    }

    #[test]
    fn test_guard_ignores_repeated_completion() {
        let (mut player, store) = make_player();
        let now = MonotonicInstant::now();

        let first = player.handle_message(&complete_message(), now);
        assert_eq!(first.len(), 3);

        let second = player.handle_message(&complete_message(), now);
        assert_eq!(second.len(), 1);
        assert!(matches!(second[0], PlayerEvent::Progress { kind: EventKind::Complete, .. }));

        let key = ProgressTracker::storage_key(&CourseId::new("pwp-101"));
        assert_eq!(store.get(&key).unwrap(), Some(r#"["intro"]"#.to_string()));
    }

    #[test]
    fn test_guard_resets_on_lesson_change() {
        let (mut player, _) = make_player();
        let now = MonotonicInstant::now();

        player.on_lesson_complete(now);
        player.tick(now + DELAY);
        assert_eq!(player.active_lesson().unwrap().id, lesson("practice"));

        let events = player.on_lesson_complete(now + DELAY);
        assert!(events.contains(&PlayerEvent::LessonCompleted {
            lesson_id: lesson("practice"),
            newly_recorded: true,
        }));
    }

    #[test]
    fn test_last_lesson_does_not_advance() {
        let (mut player, _) = make_player();
        let now = MonotonicInstant::now();

        for _ in 0..2 {
            player.on_lesson_complete(now);
            player.tick(now + DELAY);
        }
        assert_eq!(player.active_lesson().unwrap().id, lesson("quiz"));

        let events = player.on_lesson_complete(now);
        assert_eq!(events.len(), 1);
        assert!(!player.has_pending_advance());
        assert!(player.lesson_views().iter().all(|v| v.complete && v.selectable));
    }

    #[test]
    fn test_manual_navigation_cancels_pending_advance() {
        let (mut player, _) = make_player();
        let now = MonotonicInstant::now();

        player.on_lesson_complete(now);
        player.tick(now + DELAY);
        // Go back while the advance out of practice is still pending
        player.on_lesson_complete(now);
        assert!(player.has_pending_advance());
        player.previous().unwrap();

        assert!(!player.has_pending_advance());
        assert!(player.tick(now + DELAY * 3).is_empty());
    }

    #[test]
    fn test_already_complete_lesson() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                &ProgressTracker::storage_key(&CourseId::new("pwp-101")),
                r#"["intro"]"#,
            )
            .unwrap();
        let mut player = CoursePlayer::new(make_course(), store, DELAY);

        assert!(player.is_lesson_allowed(1));
        let events = player.on_media_ended(MonotonicInstant::now());
        assert_eq!(
            events[0],
            PlayerEvent::LessonCompleted {
                lesson_id: lesson("intro"),
                newly_recorded: false,
            }
        );
    }

    #[test]
    fn test_progress_only_messages() {
        let (mut player, _) = make_player();
        let raw = json!({
            "type": "scorm-event",
            "eventType": "datachange",
            "data": {"element": "cmi.core.lesson_status", "value": "incomplete"}
        });

        let events = player.handle_message(&raw, MonotonicInstant::now());
        assert_eq!(events.len(), 1);
        assert!(!player.is_complete(&lesson("intro")));

        assert!(player.handle_message(&json!({"type": "noise"}), MonotonicInstant::now()).is_empty());
    }

    #[test]
    fn test_reset_progress() {
        let (mut player, store) = make_player();
        let now = MonotonicInstant::now();
        player.on_lesson_complete(now);

        let event = player.reset_progress();
        assert_eq!(
            event,
            PlayerEvent::ProgressCleared {
                course_id: CourseId::new("pwp-101"),
            }
        );
        assert!(!player.is_complete(&lesson("intro")));
        assert!(!player.is_lesson_allowed(1));
        assert!(!player.has_pending_advance());

        let key = ProgressTracker::storage_key(&CourseId::new("pwp-101"));
        assert_eq!(store.get(&key).unwrap(), None);

        // Guard was cleared, so the active lesson can complete again
        assert_eq!(player.on_lesson_complete(now).len(), 2);
    }
}
