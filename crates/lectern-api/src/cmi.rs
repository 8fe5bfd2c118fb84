//! SCORM 1.2 element paths referenced by both sides of the bridge

pub const LESSON_STATUS: &str = "cmi.core.lesson_status";
pub const LESSON_LOCATION: &str = "cmi.core.lesson_location";
pub const SCORE_RAW: &str = "cmi.core.score.raw";
pub const SESSION_TIME: &str = "cmi.core.session_time";
pub const SUSPEND_DATA: &str = "cmi.suspend_data";
pub const STUDENT_ID: &str = "cmi.core.student_id";
pub const STUDENT_NAME: &str = "cmi.core.student_name";

/// Lesson status values that count as finishing the lesson
pub const COMPLETION_STATUSES: [&str; 2] = ["completed", "passed"];

pub fn is_completion_status(status: &str) -> bool {
    COMPLETION_STATUSES.contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_statuses() {
        assert!(is_completion_status("completed"));
        assert!(is_completion_status("passed"));
        assert!(!is_completion_status("incomplete"));
        assert!(!is_completion_status("failed"));
        assert!(!is_completion_status("Completed"));
        assert!(!is_completion_status(""));
    }
}
