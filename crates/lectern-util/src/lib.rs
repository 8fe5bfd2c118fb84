//! Shared utilities for lectern
//!
//! This crate provides:
//! - ID types (CourseId, LessonId, SessionId)
//! - Time utilities (wall clock, monotonic session clock, SCORM time formatting)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
