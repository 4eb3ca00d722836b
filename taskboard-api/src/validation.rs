/// Request validation
///
/// Validation runs in two phases that share one [`Violations`] collector, so
/// a single 422 response lists every field that failed:
///
/// 1. Structural rules declared with `#[derive(Validate)]` on the request
///    types (required, length, email, confirmation).
/// 2. Rules that need parsing or the store: enum membership, date format and
///    bounds, referenced rows existing.
///
/// String fields are trimmed on the way in and blank strings become absent,
/// so `required` also rejects `""` and `"   "`.
///
/// # Example
///
/// ```
/// use taskboard_api::validation::Violations;
/// use taskboard_shared::models::task::TaskPriority;
///
/// let mut violations = Violations::new();
/// let priority: Option<TaskPriority> = violations.parse_enum("priority", Some("urgent"));
///
/// assert!(priority.is_none());
/// assert!(violations.into_result().is_err());
/// ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use validator::Validate;

use crate::error::{ApiError, ApiResult, ValidationErrorDetail};

/// Maximum length of descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Accumulated field-level validation failures
#[derive(Debug, Default)]
pub struct Violations {
    details: Vec<ValidationErrorDetail>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the request's declared rules and collects their failures
    pub fn of<T: Validate>(request: &T) -> Self {
        let mut violations = Self::new();

        if let Err(errors) = request.validate() {
            let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
            fields.sort_by_key(|(field, _)| field.to_string());

            for (field, field_errors) in fields {
                for error in field_errors.iter() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid.", field));
                    violations.add(field.to_string(), message);
                }
            }
        }

        violations
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.details.push(ValidationErrorDetail::new(field, message));
    }

    /// Records `message` against `field` unless `ok` holds
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Whether a field already failed (later rules on it are skipped)
    pub fn has(&self, field: &str) -> bool {
        self.details.iter().any(|d| d.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Parses an optional closed-set value
    ///
    /// Returns None both when absent and when invalid; invalid values are
    /// recorded.
    pub fn parse_enum<T: FromStr>(&mut self, field: &str, value: Option<&str>) -> Option<T> {
        let raw = value?;
        match raw.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.add(field, format!("The selected {} is invalid.", field));
                None
            }
        }
    }

    /// Parses an optional `YYYY-MM-DD` date
    pub fn parse_date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        let raw = value?;
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.add(
                    field,
                    format!("The {} field must be a valid date (YYYY-MM-DD).", field),
                );
                None
            }
        }
    }

    /// Rejects dates before today (UTC)
    pub fn not_before_today(&mut self, field: &str, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.check(
                date >= today(),
                field,
                format!("The {} field must be a date after or equal to today.", field),
            );
        }
    }

    /// Enforces a maximum character count on an optional text value
    pub fn max_chars(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.check(
                value.chars().count() <= max,
                field,
                format!("The {} field must not be greater than {} characters.", field, max),
            );
        }
    }

    /// Records a failed existence check for a referenced row
    pub fn exists(&mut self, field: &str, found: bool) {
        self.check(found, field, format!("The selected {} is invalid.", field));
    }

    pub fn into_result(self) -> ApiResult<()> {
        if self.details.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ValidationError(self.details))
        }
    }
}

/// Current calendar date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Deserializes an optional string, trimming it and mapping blank to None
///
/// Use with `#[serde(default, deserialize_with = "trimmed")]`.
pub fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(normalize))
}

/// Distinguishes an absent field (None) from an explicit null (Some(None))
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`. Strings are
/// trimmed and blank strings count as null.
pub fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<String>::deserialize(deserializer)?.and_then(normalize)))
}

/// Like [`nullable`] for non-string values, without any normalization
pub fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}
