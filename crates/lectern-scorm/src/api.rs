//! Legacy string-typed API object
//!
//! Content calls these by name and expects strings back: `"true"`/`"false"`
//! for lifecycle and write calls, the value or `""` for reads, and error codes
//! as decimal strings.

use std::cell::RefCell;
use std::rc::Rc;

use lectern_api::ScormErrorCode;
use tracing::trace;

use crate::{ScormResult, ScormSession};

const TRUE: &str = "true";
const FALSE: &str = "false";

/// Handle to a session, shared by every global name it is published under
#[derive(Clone)]
pub struct ScormApi {
    session: Rc<RefCell<ScormSession>>,
}

impl ScormApi {
    pub fn new(session: ScormSession) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
        }
    }

    /// True when both handles refer to the same session
    pub fn same_session(&self, other: &ScormApi) -> bool {
        Rc::ptr_eq(&self.session, &other.session)
    }

    /// Run a closure against the underlying session
    pub fn with_session<R>(&self, f: impl FnOnce(&ScormSession) -> R) -> R {
        f(&*self.session.borrow())
    }

    pub fn lms_initialize(&self, arg: Option<&str>) -> String {
        flag(self.session.borrow_mut().initialize(arg))
    }

    pub fn lms_finish(&self, arg: Option<&str>) -> String {
        flag(self.session.borrow_mut().terminate(arg))
    }

    pub fn lms_get_value(&self, path: Option<&str>) -> String {
        self.session
            .borrow_mut()
            .get_value(path)
            .unwrap_or_default()
    }

    pub fn lms_set_value(&self, path: Option<&str>, value: Option<&str>) -> String {
        flag(self.session.borrow_mut().set_value(path, value))
    }

    pub fn lms_commit(&self, arg: Option<&str>) -> String {
        flag(self.session.borrow_mut().commit(arg))
    }

    pub fn lms_get_last_error(&self) -> String {
        self.session.borrow().last_error().code().to_string()
    }

    pub fn lms_get_error_string(&self, code: Option<&str>) -> String {
        self.session
            .borrow()
            .error_string(code.unwrap_or_default())
            .to_string()
    }

    pub fn lms_get_diagnostic(&self, code: Option<&str>) -> String {
        self.session
            .borrow()
            .diagnostic(code.unwrap_or_default())
            .to_string()
    }

    /// Invoke an API function by name.
    ///
    /// Accepts both the SCORM 1.2 names (`LMSInitialize`, ...) and the
    /// 2004-style names (`Initialize`, `Terminate`, ...). Missing arguments
    /// are passed through as absent. An unknown name records a general
    /// exception and returns `"false"`.
    pub fn call(&self, name: &str, args: &[&str]) -> String {
        let arg = |i: usize| args.get(i).copied();
        trace!(function = %name, ?args, "API call");

        match name {
            "LMSInitialize" | "Initialize" => self.lms_initialize(arg(0)),
            "LMSFinish" | "Terminate" => self.lms_finish(arg(0)),
            "LMSGetValue" | "GetValue" => self.lms_get_value(arg(0)),
            "LMSSetValue" | "SetValue" => self.lms_set_value(arg(0), arg(1)),
            "LMSCommit" | "Commit" => self.lms_commit(arg(0)),
            "LMSGetLastError" | "GetLastError" => self.lms_get_last_error(),
            "LMSGetErrorString" | "GetErrorString" => self.lms_get_error_string(arg(0)),
            "LMSGetDiagnostic" | "GetDiagnostic" => self.lms_get_diagnostic(arg(0)),
            _ => {
                self.session
                    .borrow_mut()
                    .record_error(ScormErrorCode::GeneralException);
                FALSE.to_string()
            }
        }
    }
}

fn flag(result: ScormResult<()>) -> String {
    let flag = if result.is_ok() { TRUE } else { FALSE };
    flag.to_string()
}
