//! Request shape checks.
//!
//! Handlers describe the fields they expect and get back either the typed
//! values or a [`ValidationError`] listing every field that failed, which
//! the error layer renders as a 422 with structured detail.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("validation failed for {} field(s)", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

/// Collects issues while fields are checked one by one.
#[derive(Debug, Default)]
pub struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            path: path.to_string(),
            message: message.into(),
        });
    }

    /// A path or header value that must be a UUID.
    pub fn uuid(&mut self, path: &str, raw: &str) -> Option<Uuid> {
        match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                self.issue(path, "Invalid uuid");
                None
            }
        }
    }

    /// Borrow the body as a JSON object.
    pub fn object<'v>(&mut self, body: &'v Value) -> Option<&'v Map<String, Value>> {
        let object = body.as_object();
        if object.is_none() {
            self.issue("body", format!("Expected object, received {}", kind(body)));
        }
        object
    }

    pub fn required_string(&mut self, body: &Map<String, Value>, key: &str) -> Option<String> {
        match body.get(key) {
            None | Some(Value::Null) => {
                self.issue(key, "Required");
                None
            }
            Some(value) => self.non_empty_string(key, value),
        }
    }

    pub fn optional_string(&mut self, body: &Map<String, Value>, key: &str) -> Option<String> {
        match body.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.issue(key, format!("Expected string, received {}", kind(other)));
                None
            }
        }
    }

    /// Like [`Validator::optional_string`] but an empty string is rejected.
    pub fn optional_name(&mut self, body: &Map<String, Value>, key: &str) -> Option<String> {
        match body.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.non_empty_string(key, value),
        }
    }

    pub fn required_bool(&mut self, body: &Map<String, Value>, key: &str) -> Option<bool> {
        match body.get(key) {
            None | Some(Value::Null) => {
                self.issue(key, "Required");
                None
            }
            Some(value) => self.boolean(key, value),
        }
    }

    pub fn optional_bool(&mut self, body: &Map<String, Value>, key: &str) -> Option<bool> {
        match body.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.boolean(key, value),
        }
    }

    /// An RFC 3339 timestamp, normalised to UTC.
    pub fn optional_timestamp(
        &mut self,
        body: &Map<String, Value>,
        key: &str,
    ) -> Option<DateTime<Utc>> {
        match body.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => match DateTime::parse_from_rfc3339(s) {
                Ok(at) => Some(at.with_timezone(&Utc)),
                Err(e) => {
                    self.issue(key, format!("Invalid date: {e}"));
                    None
                }
            },
            Some(other) => {
                self.issue(key, format!("Expected date string, received {}", kind(other)));
                None
            }
        }
    }

    /// Finish validation. Fails if any issue was recorded.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }

    /// Finish validation and hand back the required values collected along the way.
    pub fn finish_with<T>(mut self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(value) if self.issues.is_empty() => Ok(value),
            _ => {
                if self.issues.is_empty() {
                    self.issue("body", "Required");
                }
                Err(ValidationError {
                    issues: self.issues,
                })
            }
        }
    }

    fn non_empty_string(&mut self, key: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) if s.trim().is_empty() => {
                self.issue(key, "String must contain at least 1 character(s)");
                None
            }
            Value::String(s) => Some(s.clone()),
            other => {
                self.issue(key, format!("Expected string, received {}", kind(other)));
                None
            }
        }
    }

    fn boolean(&mut self, key: &str, value: &Value) -> Option<bool> {
        if let Value::Bool(b) = value {
            Some(*b)
        } else {
            self.issue(key, format!("Expected boolean, received {}", kind(value)));
            None
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
