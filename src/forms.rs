//! Required-field validation shared by every form.
//!
//! Errors are keyed by field name so each input can show its own message and
//! block submission until fixed.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("please fix: {}", .0.keys().copied().collect::<Vec<_>>().join(", "))]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Record "<label> is required" when `value` is blank.
    pub fn require(&mut self, field: &'static str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", label));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(value)` when no field failed.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// Trimmed value, `None` when blank.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_blank_values() {
        let mut errors = FieldErrors::new();
        errors.require("email", "Email", "   ");
        errors.require("name", "Name", "Sam");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("name"), None);
        assert_eq!(errors.to_string(), "please fix: email");
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.require("email", "Email", "");
        errors.add("email", "Email must contain @");
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(|| 5), Ok(5));

        let mut errors = FieldErrors::new();
        errors.add("time", "Time is required");
        assert!(errors.into_result(|| 5).is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  Own BCD "), Some("Own BCD".to_string()));
        assert_eq!(non_blank("  "), None);
    }
}
