//! Explicit payload validators.
//!
//! Each entity implements [`Validate`], which returns every failing field at once
//! instead of stopping at the first problem.

use regex::Regex;
use serde::Serialize;
use std::{fmt, sync::LazyLock};
use url::Url;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"#,
    )
    .expect("email pattern is valid")
});

/// A single failing field and the reason it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// The structured result of a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a result with exactly one failing field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Records an error unless `value` is an absolute `http`/`https` URL with a host.
    pub fn check_url(&mut self, field: &str, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };

        match Url::parse(value) {
            Ok(url) if !matches!(url.scheme(), "http" | "https") => {
                self.add(field, "URL scheme should be 'http' or 'https'")
            }
            Ok(url) if url.host_str().is_none_or(str::is_empty) => {
                self.add(field, "URL must include a host")
            }
            Ok(_) => {}
            Err(e) => self.add(field, format!("invalid URL: {e}")),
        }
    }

    /// Records an error unless `value` is a syntactically valid email address.
    pub fn check_email(&mut self, field: &str, value: &str) {
        if !EMAIL.is_match(value) {
            self.add(field, "value is not a valid email address");
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by every payload accepted by the API.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}
