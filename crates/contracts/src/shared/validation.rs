//! Required-field checks for entity kinds

use chrono::NaiveDate;

use super::errors::ValidationError;

/// Collects violated field names while an entity is checked.
///
/// ```
/// use contracts::shared::validation::RequiredFields;
/// let result = RequiredFields::new().text("title", " ").finish();
/// assert_eq!(result.unwrap_err().fields, vec!["title".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text must be non-blank after trimming.
    pub fn text(self, name: &str, value: &str) -> Self {
        self.check(name, !value.trim().is_empty())
    }

    pub fn present<T>(self, name: &str, value: &Option<T>) -> Self {
        self.check(name, value.is_some())
    }

    /// Numbers must be finite and not negative.
    pub fn non_negative(self, name: &str, value: f64) -> Self {
        self.check(name, value.is_finite() && value >= 0.0)
    }

    /// `end` may not precede `start`; missing dates are reported by [`present`](Self::present).
    pub fn date_range(
        self,
        end_name: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => self.check(end_name, end >= start),
            _ => self,
        }
    }

    pub fn check(mut self, name: &str, ok: bool) -> Self {
        if !ok && !self.missing.iter().any(|f| f == name) {
            self.missing.push(name.to_string());
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                fields: self.missing,
            })
        }
    }
}
