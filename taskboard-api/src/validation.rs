/// Field validators shared by the request types
///
/// Task requests validate by hand instead of with the derive: a field that is
/// present with `null` must be told apart from a missing one, and enum and
/// date fields arrive as strings so a bad value becomes a field error rather
/// than a body parse failure.

use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use taskboard_shared::models::task::{parse_due_date, TaskPriority, TaskStatus};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

/// Builds a field error with a client-facing message
pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Deserializes a string with surrounding whitespace removed
///
/// Lets `length(min = 1)` reject blank input in derived validators.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()).unwrap_or_default())
}

/// Deserializes a field so that `null` becomes `Some(None)`
///
/// Combined with `#[serde(default)]`, a missing field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Collects field errors while parsing a request
#[derive(Debug)]
pub struct FieldErrors {
    errors: ValidationErrors,
}

impl Default for FieldErrors {
    fn default() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, code: &'static str, message: impl Into<Cow<'static, str>>) {
        self.errors.add(field, field_error(code, message));
    }

    /// Required non-blank text; returns the trimmed value
    pub fn required_text(&mut self, field: &'static str, label: &str, value: Option<&str>) -> Option<String> {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => Some(text.to_string()),
            _ => {
                self.add(field, "required", format!("{} is required", label));
                None
            }
        }
    }

    pub fn uuid(&mut self, field: &'static str, label: &str, value: Option<&str>) -> Option<Uuid> {
        match value {
            None => {
                self.add(field, "required", format!("{} is required", label));
                None
            }
            Some(raw) => match Uuid::parse_str(raw.trim()) {
                Ok(id) => Some(id),
                Err(_) => {
                    self.add(field, "invalid", format!("Invalid {}", label));
                    None
                }
            },
        }
    }

    pub fn status(&mut self, value: &str) -> Option<TaskStatus> {
        match value.parse::<TaskStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                self.add("status", "invalid_enum", e.to_string());
                None
            }
        }
    }

    pub fn priority(&mut self, value: &str) -> Option<TaskPriority> {
        match value.parse::<TaskPriority>() {
            Ok(priority) => Some(priority),
            Err(e) => {
                self.add("priority", "invalid_enum", e.to_string());
                None
            }
        }
    }

    pub fn due_date(&mut self, value: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        match parse_due_date(value) {
            Ok(date) => Some(date),
            Err(e) => {
                self.add("dueDate", "invalid_date", e.to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    /// `Ok` when nothing was recorded
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
