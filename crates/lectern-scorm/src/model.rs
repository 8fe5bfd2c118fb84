//! Data model storage and access checks

use lectern_api::{ScormErrorCode, cmi};
use lectern_config::Learner;
use std::collections::BTreeMap;
use tracing::debug;

use crate::ScormResult;
use crate::schema::{self, SCHEMA};

/// Values for every schema element of one session
#[derive(Debug, Clone)]
pub struct DataModel {
    values: BTreeMap<&'static str, String>,
}

impl DataModel {
    /// Fresh model with schema defaults
    pub fn new() -> Self {
        Self {
            values: SCHEMA
                .iter()
                .map(|e| (e.path, e.default.to_string()))
                .collect(),
        }
    }

    /// Fresh model with the learner identity seeded into the read-only fields
    pub fn for_learner(learner: &Learner) -> Self {
        let mut model = Self::new();
        model.values.insert(cmi::STUDENT_ID, learner.student_id.clone());
        model
            .values
            .insert(cmi::STUDENT_NAME, learner.student_name.clone());
        model
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.values.get(path).map(String::as_str)
    }

    /// Write a value subject to the schema and access rules.
    ///
    /// Unknown paths are a general exception; read-only paths are rejected.
    /// On failure the model is unchanged.
    pub fn set(&mut self, path: &str, value: &str) -> ScormResult<()> {
        let element = schema::lookup(path).ok_or(ScormErrorCode::GeneralException)?;

        if element.is_read_only() {
            return Err(ScormErrorCode::ElementIsReadOnly);
        }

        debug!(element = %path, value = %value, "Data model write");
        self.values.insert(element.path, value.to_string());
        Ok(())
    }

    /// Owned copy of every element, for commit notifications
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for DataModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let model = DataModel::new();
        assert_eq!(model.len(), SCHEMA.len());
        assert_eq!(model.get(cmi::STUDENT_ID), Some("student_001"));
        assert_eq!(model.get("cmi.core.score.max"), Some("100"));
        assert_eq!(model.get("cmi.nope"), None);
    }

    #[test]
    fn test_learner_identity() {
        let learner = Learner {
            student_id: "s-42".into(),
            student_name: "Ada".into(),
        };
        let model = DataModel::for_learner(&learner);
        assert_eq!(model.get(cmi::STUDENT_ID), Some("s-42"));
        assert_eq!(model.get(cmi::STUDENT_NAME), Some("Ada"));
    }

    #[test]
    fn test_unknown_path_leaves_model_unchanged() {
        let mut model = DataModel::new();
        let before = model.snapshot();

        assert_eq!(
            model.set("cmi.core.favourite_colour", "blue"),
            Err(ScormErrorCode::GeneralException)
        );
        assert_eq!(model.snapshot(), before);
    }

    #[test]
    fn test_read_only_rejected() {
        let mut model = DataModel::new();
        assert_eq!(
            model.set("cmi.core.credit", "no-credit"),
            Err(ScormErrorCode::ElementIsReadOnly)
        );
        assert_eq!(model.get("cmi.core.credit"), Some("credit"));
    }

    #[test]
    fn test_write() {
        let mut model = DataModel::new();
        model.set(cmi::SCORE_RAW, "85").unwrap();
        assert_eq!(model.get(cmi::SCORE_RAW), Some("85"));
        assert_eq!(model.snapshot().get(cmi::SCORE_RAW).map(String::as_str), Some("85"));
    }
}
