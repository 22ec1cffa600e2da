//! Contact-form schema: shape checks only, no sanitization.
//!
//! `name`, `email` and `message` are required and must be non-blank after trimming.
//! `email` must look like `local@domain.tld`, so a bare host such as `a@x` is rejected.
//! A blank `subject` is treated as absent.

use serde::Deserialize;

use crate::models::contact::NewContact;

/// Raw contact-form body as posted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

fn required(field: &'static str, value: &str, errors: &mut Vec<FieldError>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError {
            field,
            reason: "is required",
        });
    }
    trimmed.to_string()
}

pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Checks every field and returns all violations at once.
pub fn validate_contact(req: ContactRequest) -> Result<NewContact, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = required("name", &req.name, &mut errors);
    let email = required("email", &req.email, &mut errors);
    if !email.is_empty() && !is_plausible_email(&email) {
        errors.push(FieldError {
            field: "email",
            reason: "must be a valid email address",
        });
    }
    let message = required("message", &req.message, &mut errors);
    let subject = req
        .subject
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if errors.is_empty() {
        Ok(NewContact {
            name,
            email,
            subject,
            message,
        })
    } else {
        Err(errors)
    }
}
