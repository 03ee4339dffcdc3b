//! Auth form payloads and their validation rules.
//!
//! Validation runs before any provider call; a form that fails it is
//! re-rendered with per-field messages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 8;

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// A validation failure on one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the field errors when the email is malformed or the password is empty.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if !is_valid_email(&self.email) {
            errors.push("email", "Please enter a valid email address");
        }
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns the field errors; a password mismatch is reported on
    /// `confirmPassword`.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.full_name.trim().chars().count() < MIN_NAME_CHARS {
            errors.push("fullName", "Name must be at least 2 characters");
        }
        if !is_valid_email(&self.email) {
            errors.push("email", "Invalid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.push("password", "Password must be at least 8 characters");
        }
        if self.password != self.confirm_password {
            errors.push("confirmPassword", "Passwords don't match");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

impl ForgotPasswordForm {
    /// # Errors
    ///
    /// Returns the field errors when the email is malformed.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if !is_valid_email(&self.email) {
            errors.push("email", "Please enter a valid email address");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("staff.member@filxconnect.io"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_login_requires_password() {
        let form = LoginForm {
            email: "a@b.com".to_string(),
            password: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert_eq!(errors.get("email"), None);

        let ok = LoginForm {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_signup_rules() {
        let form = SignupForm {
            full_name: "A".to_string(),
            email: "bad".to_string(),
            password: "short".to_string(),
            confirm_password: "other".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("fullName").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
        assert_eq!(errors.get("confirmPassword"), Some("Passwords don't match"));
    }

    #[test]
    fn test_signup_valid() {
        let form = SignupForm {
            full_name: "Ada".to_string(),
            email: "ada@filxconnect.com".to_string(),
            password: "longenough".to_string(),
            confirm_password: "longenough".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
