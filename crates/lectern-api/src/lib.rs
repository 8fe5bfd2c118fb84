//! Protocol types for lectern
//!
//! This crate defines the stable contract between the content-side SCORM
//! runtime and the host page:
//! - Notification envelope and per-kind payloads (content -> host)
//! - SCORM 1.2 error code taxonomy and shared element paths
//! - Lesson view types for navigation

pub mod cmi;
mod error_codes;
mod events;
mod types;

pub use error_codes::*;
pub use events::*;
pub use types::*;

/// Discriminator carried by every SCORM notification, distinguishing it from
/// unrelated cross-frame messages
pub const SCORM_EVENT_DISCRIMINATOR: &str = "scorm-event";
