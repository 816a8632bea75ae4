use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("valid email pattern"));

pub fn required_message(title: &str) -> String {
    format!("{title} field is required.")
}

pub fn email_message(title: &str) -> String {
    format!("{title} is not a valid e-mail address.")
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// Turns a snake_case property name into the title shown to users.
pub fn property_title(property: &str) -> String {
    match property {
        "email" => "E-mail".into(),
        "id" => "Id".into(),
        other => {
            let words = other.replace('_', " ");
            let mut chars = words.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Empty for errors about the whole model.
    pub field: String,
    pub message: String,
}

/// Field errors collected while validating one submitted view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModelState {
    errors: Vec<FieldError>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_owned(),
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn errors_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|error| error.field == field)
            .map(|error| error.message.as_str())
            .collect()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    /// Records a required-field error when `value` is missing or blank.
    pub fn required(&mut self, field: &str, value: Option<&str>) -> bool {
        if value.is_some_and(|v| !v.trim().is_empty()) {
            return true;
        }
        self.add_error(field, required_message(&property_title(field)));
        false
    }

    /// Records an e-mail error for a non-blank value that is not an address.
    /// Blank values are left to `required`.
    pub fn email(&mut self, field: &str, value: Option<&str>) -> bool {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() && !is_valid_email(v) => {
                self.add_error(field, email_message(&property_title(field)));
                false
            }
            _ => true,
        }
    }

    pub fn max_length(&mut self, field: &str, value: Option<&str>, max: usize) -> bool {
        if value.is_some_and(|v| v.chars().count() > max) {
            self.add_error(
                field,
                format!(
                    "{} can not exceed {max} characters.",
                    property_title(field)
                ),
            );
            return false;
        }
        true
    }
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join(" "))
    }
}
