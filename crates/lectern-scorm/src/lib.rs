//! Content-side SCORM 1.2 runtime for lectern
//!
//! Runs on the content side of the frame boundary:
//! - Fixed data model schema with access rules
//! - Session state machine (Uninitialized -> Active -> Terminated)
//! - Legacy string-typed API object, reachable under both global names
//! - Lesson-scoped content context that owns the API for one frame
//!
//! Every state-changing call produces its notifications synchronously and
//! hands them to a [`Notifier`]; delivery to the host is the notifier's job.

mod api;
mod context;
mod model;
mod notifier;
pub mod schema;
mod session;

pub use api::*;
pub use context::*;
pub use model::*;
pub use notifier::*;
pub use session::*;

/// Result of a data model operation; the error is the code recorded as last error
pub type ScormResult<T> = Result<T, lectern_api::ScormErrorCode>;
