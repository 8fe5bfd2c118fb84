//! Lesson-scoped execution context for content
//!
//! Each launched SCORM lesson gets its own context holding a fresh session.
//! The API object is published under both well-known global names and torn
//! down with the context, so no state leaks from one lesson to the next.

use std::collections::HashMap;

use lectern_api::LessonKind;
use lectern_config::{Learner, Lesson, PlayerConfig};
use lectern_util::{LecternError, LessonId, Result, SessionId};
use tracing::{info, warn};

use crate::{Notifier, ScormApi, ScormSession, SessionState};

/// Global name used by SCORM 1.2 content
pub const API_1_2_GLOBAL: &str = "API";

/// Global name used by SCORM 2004 content
pub const API_2004_GLOBAL: &str = "API_1484_11";

/// Options applied when launching content
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub learner: Learner,

    /// Call initialize on launch instead of waiting for the content to
    pub auto_initialize: bool,
}

impl LaunchOptions {
    pub fn from_player(config: &PlayerConfig) -> Self {
        Self {
            learner: config.learner.clone(),
            auto_initialize: config.auto_initialize,
        }
    }
}

pub struct ContentContext {
    lesson_id: LessonId,
    session_id: SessionId,
    globals: HashMap<&'static str, ScormApi>,
}

impl ContentContext {
    /// Launch a SCORM lesson. Video lessons have no content context.
    pub fn launch(
        lesson: &Lesson,
        notifier: impl Notifier + 'static,
        options: &LaunchOptions,
    ) -> Result<Self> {
        if lesson.kind != LessonKind::Scorm {
            return Err(LecternError::NotScormContent(lesson.id.clone()));
        }

        let session = ScormSession::new(&options.learner, notifier);
        let session_id = session.session_id();
        let api = ScormApi::new(session);

        let mut globals = HashMap::new();
        globals.insert(API_1_2_GLOBAL, api.clone());
        globals.insert(API_2004_GLOBAL, api.clone());

        info!(lesson_id = %lesson.id, session_id = %session_id, src = %lesson.src, "Content launched");

        if options.auto_initialize && api.lms_initialize(Some("")) != "true" {
            warn!(lesson_id = %lesson.id, "Auto-initialize failed");
        }

        Ok(Self {
            lesson_id: lesson.id.clone(),
            session_id,
            globals,
        })
    }

    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Resolve a global name the way content would look it up
    pub fn api(&self, global: &str) -> Option<&ScormApi> {
        self.globals.get(global)
    }

    pub fn session_state(&self) -> Option<SessionState> {
        self.api(API_1_2_GLOBAL).map(|api| api.with_session(|s| s.state()))
    }

    /// Unpublish the API object. Further lookups find nothing.
    pub fn teardown(&mut self) {
        if self.globals.is_empty() {
            return;
        }

        let state = self.session_state();
        self.globals.clear();
        info!(
            lesson_id = %self.lesson_id,
            session_id = %self.session_id,
            state = ?state,
            "Content context torn down"
        );
    }
}

impl Drop for ContentContext {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingNotifier;
    use lectern_api::{EventKind, cmi};

    fn scorm_lesson() -> Lesson {
        Lesson::new("practice", "Practice", LessonKind::Scorm, "/content/practice.html")
    }

    #[test]
    fn test_both_globals_alias_one_session() {
        let ctx = ContentContext::launch(
            &scorm_lesson(),
            RecordingNotifier::new(),
            &LaunchOptions::default(),
        )
        .unwrap();

        let legacy = ctx.api(API_1_2_GLOBAL).unwrap();
        let modern = ctx.api(API_2004_GLOBAL).unwrap();
        assert!(legacy.same_session(modern));

        assert_eq!(legacy.call("LMSInitialize", &[""]), "true");
        assert_eq!(modern.call("Initialize", &[""]), "false");
        assert_eq!(modern.call("GetLastError", &[]), "101");
    }

    #[test]
    fn test_video_lesson_rejected() {
        let lesson = Lesson::new("intro", "Intro", LessonKind::Video, "/media/intro.mp4");
        let result =
            ContentContext::launch(&lesson, RecordingNotifier::new(), &LaunchOptions::default());
        assert!(matches!(result, Err(LecternError::NotScormContent(_))));
    }

    #[test]
    fn test_auto_initialize() {
        let notifier = RecordingNotifier::new();
        let options = LaunchOptions {
            learner: Learner::default(),
            auto_initialize: true,
        };
        let ctx = ContentContext::launch(&scorm_lesson(), notifier.clone(), &options).unwrap();

        assert_eq!(ctx.session_state(), Some(SessionState::Active));
        let kinds: Vec<_> = notifier.events().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![EventKind::Initialize]);
    }

    #[test]
    fn test_each_launch_gets_fresh_session() {
        let options = LaunchOptions::default();
        let first =
            ContentContext::launch(&scorm_lesson(), RecordingNotifier::new(), &options).unwrap();
        let api = first.api(API_1_2_GLOBAL).unwrap();
        api.lms_initialize(Some(""));
        api.lms_set_value(Some(cmi::LESSON_LOCATION), Some("page-3"));
        drop(first);

        let second =
            ContentContext::launch(&scorm_lesson(), RecordingNotifier::new(), &options).unwrap();
        assert_eq!(second.session_state(), Some(SessionState::Uninitialized));
        let api = second.api(API_1_2_GLOBAL).unwrap();
        api.lms_initialize(Some(""));
        assert_eq!(api.lms_get_value(Some(cmi::LESSON_LOCATION)), "");
    }

    #[test]
    fn test_teardown_unpublishes() {
        let mut ctx = ContentContext::launch(
            &scorm_lesson(),
            RecordingNotifier::new(),
            &LaunchOptions::default(),
        )
        .unwrap();

        ctx.teardown();
        assert!(ctx.api(API_1_2_GLOBAL).is_none());
        assert!(ctx.api(API_2004_GLOBAL).is_none());
        assert_eq!(ctx.session_state(), None);
    }

    #[test]
    fn test_content_port_delivers_to_listener() {
        let bus = lectern_ipc::MessageBus::new();
        let mut listener = bus.listen();
        let ctx =
            ContentContext::launch(&scorm_lesson(), bus.port(), &LaunchOptions::default()).unwrap();

        ctx.api(API_1_2_GLOBAL).unwrap().lms_initialize(Some(""));

        let messages = listener.drain().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["type"], "scorm-event");
        assert_eq!(messages[0]["eventType"], "initialize");
        assert_eq!(
            messages[0]["sessionId"],
            serde_json::json!(ctx.session_id().to_string())
        );
    }
}
