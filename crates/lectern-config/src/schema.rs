//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Player settings
    #[serde(default)]
    pub player: RawPlayerConfig,

    /// Course catalog
    #[serde(default)]
    pub courses: Vec<RawCourse>,
}

/// Player-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPlayerConfig {
    /// Data directory for the progress store
    pub data_dir: Option<PathBuf>,

    /// Delay between a lesson completing and advancing to the next one
    pub auto_advance_delay_ms: Option<u64>,

    /// Initialize the content session on launch instead of waiting for the
    /// content package to do it
    #[serde(default)]
    pub auto_initialize: bool,

    /// Learner identity exposed through the read-only data model elements
    #[serde(default)]
    pub learner: RawLearner,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLearner {
    pub student_id: Option<String>,
    pub student_name: Option<String>,
}

/// Raw course definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawCourse {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<RawLesson>,
}

/// Raw lesson definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawLesson {
    pub id: String,
    pub title: String,
    /// "video" or "scorm"
    pub kind: String,
    /// Content path, e.g. `/pwp/Intro/index_lms.html`
    pub src: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_player_settings() {
        let toml_str = r#"
            config_version = 1

            [player]
            data_dir = "/var/lib/lectern"
            auto_advance_delay_ms = 500
            auto_initialize = true

            [player.learner]
            student_id = "s-42"
            student_name = "Ada"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.player.auto_advance_delay_ms, Some(500));
        assert!(config.player.auto_initialize);
        assert_eq!(config.player.learner.student_id.as_deref(), Some("s-42"));
        assert!(config.courses.is_empty());
    }

    #[test]
    fn parse_lessons_in_order() {
        let toml_str = r#"
            config_version = 1

            [[courses]]
            id = "tm-201"
            title = "Advanced Time Management"

            [[courses.lessons]]
            id = "a"
            title = "First"
            kind = "video"
            src = "/tm/a.mp4"

            [[courses.lessons]]
            id = "b"
            title = "Second"
            kind = "scorm"
            src = "/tm/b/index.html"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        let ids: Vec<_> = config.courses[0].lessons.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(config.courses[0].description.is_empty());
    }
}
