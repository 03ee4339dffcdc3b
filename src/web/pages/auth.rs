//! Login, admin signup and password-reset pages.
//!
//! Passwords are never echoed back into a re-rendered form.

use maud::{html, Markup, Render};

use crate::auth::FieldErrors;
use crate::components::{Alert, AuthForm, AuthLayout, Button, Field, Toast};

/// What a re-rendered auth form shows: the values typed so far, per-field
/// validation messages and a form-level notice.
#[derive(Debug, Clone, Default)]
pub struct AuthFormState {
    pub email: String,
    pub full_name: String,
    pub errors: FieldErrors,
    /// Provider failure shown above the form
    pub error: Option<String>,
    /// Success notice shown above the form
    pub notice: Option<String>,
}

impl AuthFormState {
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    #[must_use]
    pub fn notice(mut self, message: impl Into<String>) -> Self {
        self.notice = Some(message.into());
        self
    }

    fn banner(&self, error_title: &'static str) -> Markup {
        html! {
            @if let Some(error) = &self.error {
                (Alert::error(error).with_title(error_title))
            }
            @if let Some(notice) = &self.notice {
                (Alert::success(notice))
            }
        }
    }
}

fn email_field(state: &AuthFormState) -> Field<'_> {
    Field::email("Email", "email")
        .value(&state.email)
        .placeholder("admin@filxconnect.com")
        .autocomplete("email")
        .error(state.errors.get("email"))
}

fn password_field<'a>(
    label: &'a str,
    name: &'a str,
    autocomplete: &'a str,
    errors: &'a FieldErrors,
) -> Field<'a> {
    Field::password(label, name)
        .autocomplete(autocomplete)
        .error(errors.get(name))
}

#[must_use]
pub fn render_login_page(state: &AuthFormState, toast: Option<Toast<'_>>) -> Markup {
    let fields = html! {
        (email_field(state))
        (password_field("Password", "password", "current-password", &state.errors))
        (Button::primary("Sign In").full_width())
    };
    let content = html! {
        (state.banner("Login failed"))
        (AuthForm::new("/auth/login", fields))
        p class="auth-links" {
            a href="/auth/forgot-password" { "Forgot password?" }
        }
    };
    AuthLayout::new("Sign In").with_toast(toast).render(content)
}

#[must_use]
pub fn render_signup_page(state: &AuthFormState, toast: Option<Toast<'_>>) -> Markup {
    let fields = html! {
        (Field::text("Full Name", "fullName")
            .value(&state.full_name)
            .autocomplete("name")
            .error(state.errors.get("fullName")))
        (email_field(state))
        (password_field("Password", "password", "new-password", &state.errors)
            .help("At least 8 characters"))
        (password_field("Confirm Password", "confirmPassword", "new-password", &state.errors))
        (Button::primary("Create Admin").full_width())
    };
    let content = html! {
        (state.banner("Signup failed"))
        (AuthForm::new("/auth/signup", fields))
        p class="auth-links" {
            "Already have an account? " a href="/auth/login" { "Sign in" }
        }
    };
    AuthLayout::new("Add Admin").with_toast(toast).render(content)
}

#[must_use]
pub fn render_forgot_password_page(state: &AuthFormState) -> Markup {
    let fields = html! {
        (email_field(state))
        (Button::primary("Send Reset Link").full_width())
    };
    let content = html! {
        p class="muted" { "Enter your email address and we will send you a link to reset your password." }
        (state.banner("Reset failed"))
        (AuthForm::new("/auth/forgot-password", fields))
        p class="auth-links" {
            a href="/auth/login" { "Back to sign in" }
        }
    };
    AuthLayout::new("Reset Password").render(content)
}
