//! Session state machine

use chrono::{DateTime, Utc};
use lectern_api::{NotificationEvent, ScormErrorCode, cmi, error_string};
use lectern_config::Learner;
use lectern_util::{MonotonicInstant, SessionId, ZERO_SESSION_TIME, format_session_time};
use tracing::{debug, info};

use crate::{DataModel, Notifier, ScormResult};

/// Lifecycle of one content session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Active,
    Terminated,
}

/// One attempt at a content package.
///
/// Never reused after termination; a new attempt needs a new session.
pub struct ScormSession {
    session_id: SessionId,
    state: SessionState,
    model: DataModel,
    last_error: ScormErrorCode,

    /// Wall-clock start (for the initialize notification)
    started_at: Option<DateTime<Utc>>,

    /// Monotonic start (for elapsed session time)
    started_at_mono: Option<MonotonicInstant>,

    notifier: Box<dyn Notifier>,
}

impl ScormSession {
    pub fn new(learner: &Learner, notifier: impl Notifier + 'static) -> Self {
        Self {
            session_id: SessionId::new(),
            state: SessionState::Uninitialized,
            model: DataModel::for_learner(learner),
            last_error: ScormErrorCode::NoError,
            started_at: None,
            started_at_mono: None,
            notifier: Box::new(notifier),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn model(&self) -> &DataModel {
        &self.model
    }

    pub fn last_error(&self) -> ScormErrorCode {
        self.last_error
    }

    /// Elapsed time since initialize as `HH:MM:SS`
    pub fn session_time(&self) -> String {
        match self.started_at_mono {
            Some(start) => format_session_time(MonotonicInstant::now().duration_since(start)),
            None => ZERO_SESSION_TIME.to_string(),
        }
    }

    /// Begin the session. Valid only once, from Uninitialized.
    pub fn initialize(&mut self, arg: Option<&str>) -> ScormResult<()> {
        let result = self.do_initialize(arg);
        self.record(result)
    }

    fn do_initialize(&mut self, arg: Option<&str>) -> ScormResult<()> {
        check_empty_argument(arg)?;

        if self.state != SessionState::Uninitialized {
            return Err(ScormErrorCode::GeneralException);
        }

        let now = lectern_util::now();
        self.state = SessionState::Active;
        self.started_at = Some(now);
        self.started_at_mono = Some(MonotonicInstant::now());

        info!(session_id = %self.session_id, "Content session initialized");
        self.emit(NotificationEvent::Initialize { timestamp: now });
        Ok(())
    }

    /// Read an element. Session time is computed, not stored.
    pub fn get_value(&mut self, path: Option<&str>) -> ScormResult<String> {
        let result = self.do_get_value(path);
        self.record(result)
    }

    fn do_get_value(&self, path: Option<&str>) -> ScormResult<String> {
        self.require_active()?;
        let path = path.ok_or(ScormErrorCode::InvalidArgument)?;

        if path == cmi::SESSION_TIME {
            return Ok(self.session_time());
        }

        self.model
            .get(path)
            .map(str::to_string)
            .ok_or(ScormErrorCode::GeneralException)
    }

    /// Write an element.
    ///
    /// Every successful write emits a data change notification. Setting the
    /// lesson status to completed or passed first emits a complete
    /// notification as well.
    pub fn set_value(&mut self, path: Option<&str>, value: Option<&str>) -> ScormResult<()> {
        let result = self.do_set_value(path, value);
        self.record(result)
    }

    fn do_set_value(&mut self, path: Option<&str>, value: Option<&str>) -> ScormResult<()> {
        self.require_active()?;
        let (Some(path), Some(value)) = (path, value) else {
            return Err(ScormErrorCode::InvalidArgument);
        };

        self.model.set(path, value)?;

        if path == cmi::LESSON_STATUS && cmi::is_completion_status(value) {
            info!(session_id = %self.session_id, status = %value, "Lesson status reached completion");
            self.emit(NotificationEvent::Complete {
                lesson_status: value.to_string(),
                score: self.stored(cmi::SCORE_RAW),
                suspend_data: self.stored(cmi::SUSPEND_DATA),
                session_time: self.session_time(),
            });
        }

        self.emit(NotificationEvent::DataChange {
            element: path.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// Ask the host to persist; carries a snapshot of the whole model
    pub fn commit(&mut self, arg: Option<&str>) -> ScormResult<()> {
        let result = self.do_commit(arg);
        self.record(result)
    }

    fn do_commit(&mut self, arg: Option<&str>) -> ScormResult<()> {
        check_empty_argument(arg)?;
        self.require_active()?;

        debug!(session_id = %self.session_id, "Data committed");
        self.emit(NotificationEvent::Commit {
            data: self.model.snapshot(),
            session_time: self.session_time(),
        });
        Ok(())
    }

    /// End the session, storing the final session time
    pub fn terminate(&mut self, arg: Option<&str>) -> ScormResult<()> {
        let result = self.do_terminate(arg);
        self.record(result)
    }

    fn do_terminate(&mut self, arg: Option<&str>) -> ScormResult<()> {
        check_empty_argument(arg)?;
        self.require_active()?;

        let session_time = self.session_time();
        self.model.set(cmi::SESSION_TIME, &session_time)?;
        self.state = SessionState::Terminated;

        info!(
            session_id = %self.session_id,
            session_time = %session_time,
            lesson_status = %self.stored(cmi::LESSON_STATUS),
            "Content session finished"
        );
        self.emit(NotificationEvent::Finish {
            session_time,
            lesson_status: self.stored(cmi::LESSON_STATUS),
            score: self.stored(cmi::SCORE_RAW),
            suspend_data: self.stored(cmi::SUSPEND_DATA),
        });
        Ok(())
    }

    /// Message for an error code; never fails
    pub fn error_string(&self, code: &str) -> &'static str {
        error_string(code)
    }

    /// Diagnostic text for an error code; same as the error string
    pub fn diagnostic(&self, code: &str) -> &'static str {
        error_string(code)
    }

    fn require_active(&self) -> ScormResult<()> {
        if self.state == SessionState::Active {
            Ok(())
        } else {
            Err(ScormErrorCode::NotInitialized)
        }
    }

    fn stored(&self, path: &str) -> String {
        self.model.get(path).unwrap_or_default().to_string()
    }

    fn emit(&self, event: NotificationEvent) {
        debug!(session_id = %self.session_id, event_type = %event.kind(), "Notification emitted");
        self.notifier.notify(self.session_id, event);
    }

    /// Record a failure raised outside the session's own operations
    pub(crate) fn record_error(&mut self, code: ScormErrorCode) {
        self.last_error = code;
    }

    fn record<T>(&mut self, result: ScormResult<T>) -> ScormResult<T> {
        self.last_error = match &result {
            Ok(_) => ScormErrorCode::NoError,
            Err(code) => *code,
        };
        result
    }
}

/// Initialize, terminate and commit take an empty-string argument
fn check_empty_argument(arg: Option<&str>) -> ScormResult<()> {
    match arg {
        None | Some("") => Ok(()),
        Some(_) => Err(ScormErrorCode::InvalidArgument),
    }
}
