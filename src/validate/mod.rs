//! Client-side form validation for registration and login.
//!
//! Violations are field-scoped so a screen can render them next to the
//! offending input, and a form with any violation is never submitted — no
//! network call is made. The checks are a UX convenience only; the server
//! re-validates everything and its rejections surface through the normal
//! error path.

use crate::types::RegisterRequest;

/// Name length bounds, matching the backend schema.
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;
/// Password length bounds, matching the backend schema.
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 20;

/// One violation, tied to the input field that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The form field that failed.
    pub field: &'static str,
    /// The message to render next to it.
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Minimal email shape check: one `@` with a non-empty local part and a
/// domain containing a dot, no whitespace. The server does the real
/// validation.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn check_name(errors: &mut Vec<FieldError>, field: &'static str, value: &str, label: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", label)));
    } else if trimmed.chars().count() < NAME_MIN {
        errors.push(FieldError::new(field, "Too Short!"));
    } else if trimmed.chars().count() > NAME_MAX {
        errors.push(FieldError::new(field, "Too Long!"));
    }
}

// ============= Registration =============

/// Registration form input, validated before submission.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Returns every violation, one per failing field. Empty means the
    /// form may be submitted.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        check_name(&mut errors, "first_name", &self.first_name, "First name");
        check_name(&mut errors, "last_name", &self.last_name, "Last name");

        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !is_valid_email(self.email.trim()) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else if self.password.chars().count() < PASSWORD_MIN {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters",
            ));
        } else if self.password.chars().count() > PASSWORD_MAX {
            errors.push(FieldError::new(
                "password",
                "Password must be less than 20 characters",
            ));
        }

        if self.confirm_password.is_empty() {
            errors.push(FieldError::new(
                "confirm_password",
                "Confirm password is required",
            ));
        } else if self.confirm_password != self.password {
            errors.push(FieldError::new("confirm_password", "Passwords must match"));
        }

        errors
    }

    /// Converts a validated form into the wire payload. Names and email
    /// are trimmed the way the backend expects them.
    pub fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            confirm_password: self.confirm_password,
        }
    }
}

// ============= Login =============

/// Login form input, validated before submission.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Returns every violation, one per failing field.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !is_valid_email(self.email.trim()) {
            errors.push(FieldError::new("email", "Invalid email"));
        }

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }

        errors
    }
}
