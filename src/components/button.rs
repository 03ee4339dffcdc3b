//! Buttons and the one-button POST forms behind every row action.
//!
//! Nothing on the dashboard needs client-side script beyond the browser's
//! own `confirm()` prompt, so a button is either a link (opening a details
//! dialog, switching pages) or a submit control inside a form.

use maud::{html, Markup, Render};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonStyle {
    #[default]
    Primary,
    Outline,
    Danger,
    Success,
    Warning,
}

impl ButtonStyle {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Primary => "button",
            Self::Outline => "button button-outline",
            Self::Danger => "button button-danger",
            Self::Success => "button button-success",
            Self::Warning => "button button-warning",
        }
    }
}

/// A link styled as a button, or the submit button of the enclosing form.
///
/// ```ignore
/// let view = Button::outline("View Details").href("/users?view=12");
/// let submit = Button::primary("Sign In").full_width();
/// ```
#[derive(Debug, Clone)]
pub struct Button<'a> {
    label: &'a str,
    style: ButtonStyle,
    href: Option<&'a str>,
    full_width: bool,
}

impl<'a> Button<'a> {
    #[must_use]
    pub const fn primary(label: &'a str) -> Self {
        Self {
            label,
            style: ButtonStyle::Primary,
            href: None,
            full_width: false,
        }
    }

    #[must_use]
    pub const fn outline(label: &'a str) -> Self {
        Self {
            style: ButtonStyle::Outline,
            ..Self::primary(label)
        }
    }

    /// Turns the button into a link.
    #[must_use]
    pub const fn href(mut self, href: &'a str) -> Self {
        self.href = Some(href);
        self
    }

    /// Stretches the button across its container, as on the sign-in cards.
    #[must_use]
    pub const fn full_width(mut self) -> Self {
        self.full_width = true;
        self
    }
}

impl Render for Button<'_> {
    fn render(&self) -> Markup {
        let class = if self.full_width {
            format!("{} button-block", self.style.class())
        } else {
            self.style.class().to_string()
        };
        match self.href {
            Some(href) => html! { a class=(class) href=(href) { (self.label) } },
            None => html! { button class=(class) type="submit" { (self.label) } },
        }
    }
}

/// A moderation action: a POST form holding a single submit button.
///
/// The listing the action was taken from travels in a hidden `return_to`
/// field so the handler can send the admin back to the same filter, sort
/// and page.
#[derive(Debug, Clone)]
pub struct ActionButton<'a> {
    label: &'a str,
    action: String,
    style: ButtonStyle,
    return_to: Option<&'a str>,
    confirm: Option<String>,
}

impl<'a> ActionButton<'a> {
    #[must_use]
    pub fn new(label: &'a str, action: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            label,
            action: action.into(),
            style,
            return_to: None,
            confirm: None,
        }
    }

    #[must_use]
    pub fn return_to(mut self, path: &'a str) -> Self {
        self.return_to = Some(path);
        self
    }

    /// Ask the browser to confirm before submitting.
    #[must_use]
    pub fn confirm(mut self, prompt: impl Into<String>) -> Self {
        self.confirm = Some(prompt.into());
        self
    }

    fn onsubmit(&self) -> Option<String> {
        let prompt = self.confirm.as_deref()?;
        let literal = prompt.replace('\\', "\\\\").replace('\'', "\\'");
        Some(format!("return confirm('{literal}')"))
    }
}

impl Render for ActionButton<'_> {
    fn render(&self) -> Markup {
        html! {
            form class="inline-form" method="post" action=(self.action) onsubmit=[self.onsubmit()] {
                @if let Some(path) = self.return_to {
                    input type="hidden" name="return_to" value=(path);
                }
                button class=(self.style.class()) type="submit" { (self.label) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_button() {
        let html = Button::primary("Sign In").full_width().render().into_string();
        assert_eq!(
            html,
            "<button class=\"button button-block\" type=\"submit\">Sign In</button>"
        );
    }

    #[test]
    fn test_link_button() {
        let html = Button::outline("View Details")
            .href("/users?view=3")
            .render()
            .into_string();
        assert_eq!(
            html,
            "<a class=\"button button-outline\" href=\"/users?view=3\">View Details</a>"
        );
    }

    #[test]
    fn test_action_button_form() {
        let html = ActionButton::new("Approve User", "/users/4/approve", ButtonStyle::Success)
            .return_to("/users?page=2")
            .render()
            .into_string();
        assert!(html.contains("method=\"post\" action=\"/users/4/approve\""));
        assert!(html.contains("name=\"return_to\" value=\"/users?page=2\""));
        assert!(html.contains("class=\"button button-success\" type=\"submit\""));
        assert!(!html.contains("onsubmit"));
    }

    #[test]
    fn test_confirm_prompt_is_a_safe_js_literal() {
        let html = ActionButton::new("Delete", "/posts/1/delete", ButtonStyle::Danger)
            .confirm("Delete ana's post?")
            .render()
            .into_string();
        assert!(html.contains("onsubmit=\"return confirm('Delete ana\\'s post?')\""));
    }

    #[test]
    fn test_confirm_prompt_quotes_are_attribute_escaped() {
        let html = ActionButton::new("Reject", "/posts/2/reject", ButtonStyle::Danger)
            .confirm("Reject \"Hello\"?")
            .render()
            .into_string();
        assert!(html.contains("confirm('Reject &quot;Hello&quot;?')"));
    }
}
