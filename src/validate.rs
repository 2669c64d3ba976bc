//! Declarative field validators
//!
//! Validators look at the raw cell value (not the display text) and report a
//! message naming the field when they fail. Apart from [`Validator::required`],
//! every validator accepts an empty cell.

use crate::error::Result;
use crate::types::CellValue;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

type Check = Arc<dyn Fn(&CellValue) -> bool + Send + Sync>;

/// A predicate over a cell value plus the message reported when it fails
///
/// `{field}` in the message is replaced with the field name; for
/// [`Validator::pattern`], `{pattern}` is replaced with the regex.
#[derive(Clone)]
pub struct Validator {
    message: String,
    pattern: Option<String>,
    check: Check,
}

impl Validator {
    /// Fails on empty cells and whitespace-only strings
    pub fn required() -> Self {
        Validator::custom("The {field} field is required.", |value| !value.is_blank())
    }

    /// Text length at most `max` characters
    pub fn max_length(max: usize) -> Self {
        Validator::custom(
            format!(
                "The field {{field}} must be a string with a maximum length of {}.",
                max
            ),
            move |value| value.is_empty() || value.as_string().chars().count() <= max,
        )
    }

    /// Text length at least `min` characters
    pub fn min_length(min: usize) -> Self {
        Validator::custom(
            format!(
                "The field {{field}} must be a string with a minimum length of {}.",
                min
            ),
            move |value| value.is_empty() || value.as_string().chars().count() >= min,
        )
    }

    /// Numeric value within `[min, max]`; non-numeric values fail
    pub fn range(min: f64, max: f64) -> Self {
        Validator::custom(
            format!("The field {{field}} must be between {} and {}.", min, max),
            move |value| {
                if value.is_blank() {
                    return true;
                }
                value
                    .as_f64()
                    .map(|v| v >= min && v <= max)
                    .unwrap_or(false)
            },
        )
    }

    /// Whole text must match `pattern`
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        let mut validator = Validator::custom(
            "The field {field} must match the regular expression '{pattern}'.",
            move |value| {
                let text = value.as_string();
                text.is_empty() || regex.is_match(&text)
            },
        );
        validator.pattern = Some(pattern.to_string());
        Ok(validator)
    }

    /// Arbitrary predicate with its own message
    pub fn custom<F>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&CellValue) -> bool + Send + Sync + 'static,
    {
        Validator {
            message: message.into(),
            pattern: None,
            check: Arc::new(check),
        }
    }

    /// Replace the failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_valid(&self, value: &CellValue) -> bool {
        (self.check)(value)
    }

    /// Failure message for `field`
    pub fn format_message(&self, field: &str) -> String {
        // substitute the regex last so its text is never rescanned
        let message = self.message.replace("{field}", field);
        match &self.pattern {
            Some(pattern) => message.replace("{pattern}", pattern),
            None => message,
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("message", &self.message)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        let v = Validator::required();
        assert!(!v.is_valid(&CellValue::Empty));
        assert!(!v.is_valid(&CellValue::from("  ")));
        assert!(v.is_valid(&CellValue::Int(0)));
        assert_eq!(v.format_message("Name"), "The Name field is required.");
    }

    #[test]
    fn test_lengths() {
        let max = Validator::max_length(3);
        assert!(max.is_valid(&CellValue::Empty));
        assert!(max.is_valid(&CellValue::from("abc")));
        assert!(!max.is_valid(&CellValue::from("abcd")));

        let min = Validator::min_length(2);
        assert!(min.is_valid(&CellValue::Empty));
        assert!(!min.is_valid(&CellValue::from("a")));
        assert_eq!(
            min.format_message("Code"),
            "The field Code must be a string with a minimum length of 2."
        );
    }

    #[test]
    fn test_range() {
        let v = Validator::range(0.0, 150.0);
        assert!(v.is_valid(&CellValue::Empty));
        assert!(v.is_valid(&CellValue::Int(30)));
        assert!(v.is_valid(&CellValue::from("42")));
        assert!(!v.is_valid(&CellValue::Float(150.5)));
        assert!(!v.is_valid(&CellValue::from("old")));
    }

    #[test]
    fn test_pattern_matches_whole_text() {
        let v = Validator::pattern(r"[A-Z]{2}\d+").unwrap();
        assert!(v.is_valid(&CellValue::from("AB12")));
        assert!(!v.is_valid(&CellValue::from("xAB12")));
        assert!(v.is_valid(&CellValue::Empty));
        assert!(Validator::pattern("(").is_err());
    }

    #[test]
    fn test_pattern_message_keeps_regex_text() {
        // verbose-mode comment carrying a literal {field}
        let v = Validator::pattern("(?x) abc  # {field}\n").unwrap();
        assert_eq!(
            v.format_message("Code"),
            "The field Code must match the regular expression '(?x) abc  # {field}\n'."
        );
        assert!(v.is_valid(&CellValue::from("abc")));
        assert!(!v.is_valid(&CellValue::from("abc # Code")));

        let v = Validator::pattern("[a-z]+").unwrap().with_message("{field}: {pattern}");
        assert_eq!(v.format_message("Slug"), "Slug: [a-z]+");
    }

    #[test]
    fn test_custom_with_message() {
        let v = Validator::custom("odd", |value| value.as_i64().map_or(true, |i| i % 2 == 0))
            .with_message("{field} must be even");
        assert!(!v.is_valid(&CellValue::Int(3)));
        assert_eq!(v.format_message("Count"), "Count must be even");
    }
}
