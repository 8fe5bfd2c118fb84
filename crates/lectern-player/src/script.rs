//! Scripted content playback
//!
//! A script stands in for a content package: a JSON array of legacy API calls
//! made in order against the published API object.
//!
//! ```json
//! [
//!   { "call": "LMSInitialize", "args": [""] },
//!   { "call": "LMSSetValue", "args": ["cmi.core.lesson_status", "completed"] },
//!   { "call": "Terminate", "args": [""], "global": "API_1484_11" }
//! ]
//! ```

use anyhow::{Context, Result};
use lectern_scorm::{API_1_2_GLOBAL, ContentContext};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// One legacy API call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptStep {
    /// Function name, 1.2 or 2004 style
    pub call: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Global the content looks the API up under
    #[serde(default)]
    pub global: Option<String>,
}

/// Result of running one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: ScriptStep,
    /// Returned string, or `None` if the global was not published
    pub result: Option<String>,
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>> {
    serde_json::from_str(json).context("Script must be a JSON array of calls")
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {:?}", path))?;
    parse_script(&json).with_context(|| format!("Invalid script {:?}", path))
}

/// Run every step against the context's globals
pub fn run_script(context: &ContentContext, steps: &[ScriptStep]) -> Vec<StepOutcome> {
    steps
        .iter()
        .map(|step| {
            let global = step.global.as_deref().unwrap_or(API_1_2_GLOBAL);
            let args: Vec<&str> = step.args.iter().map(String::as_str).collect();
            let result = context.api(global).map(|api| api.call(&step.call, &args));
            debug!(global, call = %step.call, ?args, ?result, "Script step");

            StepOutcome {
                step: step.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_api::LessonKind;
    use lectern_config::Lesson;
    use lectern_scorm::{LaunchOptions, RecordingNotifier};

    #[test]
    fn test_parse_script() {
        let steps = parse_script(
            r#"[
                {"call": "LMSInitialize", "args": [""]},
                {"call": "GetLastError", "global": "API_1484_11"}
            ]"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].args, vec![String::new()]);
        assert!(steps[1].args.is_empty());
        assert_eq!(steps[1].global.as_deref(), Some("API_1484_11"));
    }

    #[test]
    fn test_parse_script_rejects_objects() {
        assert!(parse_script(r#"{"call": "LMSInitialize"}"#).is_err());
    }

    #[test]
    fn test_run_script() {
        let lesson = Lesson::new("practice", "Practice", LessonKind::Scorm, "/content/practice.html");
        let context =
            ContentContext::launch(&lesson, RecordingNotifier::new(), &LaunchOptions::default())
                .unwrap();
        let steps = parse_script(
            r#"[
                {"call": "LMSInitialize", "args": [""]},
                {"call": "GetValue", "args": ["cmi.core.student_id"], "global": "API_1484_11"},
                {"call": "LMSInitialize", "args": [""], "global": "window.API"}
            ]"#,
        )
        .unwrap();

        let outcomes = run_script(&context, &steps);
        let results: Vec<_> = outcomes.iter().map(|o| o.result.as_deref()).collect();
        assert_eq!(results, vec![Some("true"), Some("student_001"), None]);
    }
}
