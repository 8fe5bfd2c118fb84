//! SCORM 1.2 error code taxonomy
//!
//! Codes travel as strings on the legacy surface and are never raised as
//! exceptions; callers poll the last error after a `"false"` result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message returned for codes outside the taxonomy
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScormErrorCode {
    NoError,
    GeneralException,
    InvalidArgument,
    ElementCannotHaveChildren,
    ElementNotAnArray,
    NotInitialized,
    NotImplemented,
    InvalidSetValue,
    ElementIsReadOnly,
    ElementIsWriteOnly,
    IncorrectDataType,
}

impl ScormErrorCode {
    pub const ALL: [ScormErrorCode; 11] = [
        ScormErrorCode::NoError,
        ScormErrorCode::GeneralException,
        ScormErrorCode::InvalidArgument,
        ScormErrorCode::ElementCannotHaveChildren,
        ScormErrorCode::ElementNotAnArray,
        ScormErrorCode::NotInitialized,
        ScormErrorCode::NotImplemented,
        ScormErrorCode::InvalidSetValue,
        ScormErrorCode::ElementIsReadOnly,
        ScormErrorCode::ElementIsWriteOnly,
        ScormErrorCode::IncorrectDataType,
    ];

    /// Wire code, e.g. `"301"`
    pub fn code(self) -> &'static str {
        match self {
            ScormErrorCode::NoError => "0",
            ScormErrorCode::GeneralException => "101",
            ScormErrorCode::InvalidArgument => "201",
            ScormErrorCode::ElementCannotHaveChildren => "202",
            ScormErrorCode::ElementNotAnArray => "203",
            ScormErrorCode::NotInitialized => "301",
            ScormErrorCode::NotImplemented => "401",
            ScormErrorCode::InvalidSetValue => "402",
            ScormErrorCode::ElementIsReadOnly => "403",
            ScormErrorCode::ElementIsWriteOnly => "404",
            ScormErrorCode::IncorrectDataType => "405",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScormErrorCode::NoError => "No error",
            ScormErrorCode::GeneralException => "General exception",
            ScormErrorCode::InvalidArgument => "Invalid argument error",
            ScormErrorCode::ElementCannotHaveChildren => "Element cannot have children",
            ScormErrorCode::ElementNotAnArray => "Element not an array",
            ScormErrorCode::NotInitialized => "Not initialized",
            ScormErrorCode::NotImplemented => "Not implemented error",
            ScormErrorCode::InvalidSetValue => "Invalid set value",
            ScormErrorCode::ElementIsReadOnly => "Element is read only",
            ScormErrorCode::ElementIsWriteOnly => "Element is write only",
            ScormErrorCode::IncorrectDataType => "Incorrect data type",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for ScormErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

/// Message for a wire code, or [`UNKNOWN_ERROR_MESSAGE`]
pub fn error_string(code: &str) -> &'static str {
    ScormErrorCode::from_code(code)
        .map(ScormErrorCode::message)
        .unwrap_or(UNKNOWN_ERROR_MESSAGE)
}
