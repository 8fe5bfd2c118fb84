//! Fixed SCORM 1.2 data model schema
//!
//! The set of paths never changes at runtime. Values here are the defaults a
//! fresh session starts from.

use lectern_api::cmi;

/// Access mode of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    ReadOnly,
}

/// One slot in the data model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpec {
    pub path: &'static str,
    pub default: &'static str,
    pub access: Access,
}

impl ElementSpec {
    pub fn is_read_only(&self) -> bool {
        self.access == Access::ReadOnly
    }
}

const fn rw(path: &'static str, default: &'static str) -> ElementSpec {
    ElementSpec {
        path,
        default,
        access: Access::ReadWrite,
    }
}

const fn ro(path: &'static str, default: &'static str) -> ElementSpec {
    ElementSpec {
        path,
        default,
        access: Access::ReadOnly,
    }
}

pub static SCHEMA: &[ElementSpec] = &[
    ro(
        "cmi.core._children",
        "student_id,student_name,lesson_location,credit,lesson_status,entry,score,total_time,lesson_mode,exit,session_time",
    ),
    ro(cmi::STUDENT_ID, "student_001"),
    ro(cmi::STUDENT_NAME, "Student"),
    rw(cmi::LESSON_LOCATION, ""),
    ro("cmi.core.credit", "credit"),
    rw(cmi::LESSON_STATUS, "not attempted"),
    ro("cmi.core.entry", "ab-initio"),
    ro("cmi.core.score._children", "raw,max,min"),
    rw(cmi::SCORE_RAW, ""),
    rw("cmi.core.score.max", "100"),
    rw("cmi.core.score.min", "0"),
    rw("cmi.core.total_time", "00:00:00"),
    ro("cmi.core.lesson_mode", "normal"),
    rw("cmi.core.exit", ""),
    rw(cmi::SESSION_TIME, "00:00:00"),
    rw(cmi::SUSPEND_DATA, ""),
    rw("cmi.launch_data", ""),
    rw("cmi.comments", ""),
    rw("cmi.comments_from_lms", ""),
    rw("cmi.objectives._count", "0"),
    ro(
        "cmi.student_data._children",
        "mastery_score,max_time_allowed,time_limit_action",
    ),
    rw("cmi.student_data.mastery_score", ""),
    rw("cmi.student_data.max_time_allowed", ""),
    rw("cmi.student_data.time_limit_action", ""),
    ro("cmi.student_preference._children", "audio,language,speed,text"),
    rw("cmi.student_preference.audio", "0"),
    rw("cmi.student_preference.language", ""),
    rw("cmi.student_preference.speed", "0"),
    rw("cmi.student_preference.text", "0"),
    rw("cmi.interactions._count", "0"),
];

/// Look up an element by path
pub fn lookup(path: &str) -> Option<&'static ElementSpec> {
    SCHEMA.iter().find(|e| e.path == path)
}
