//! Feedback messages: inline alerts on forms, one-shot toasts after a
//! redirect, and boxed errors for sections whose data failed to load.

use maud::{html, Markup, Render};

/// Whether a message reports an outcome that worked or one that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

impl Tone {
    const fn modifier(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Error => "alert-error",
        }
    }

    /// Failures are announced immediately; confirmations wait their turn.
    const fn aria_role(self) -> &'static str {
        match self {
            Self::Success => "status",
            Self::Error => "alert",
        }
    }
}

/// Message shown above a form, e.g. a rejected sign-in.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    tone: Tone,
    heading: Option<&'a str>,
    text: &'a str,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn success(text: &'a str) -> Self {
        Self {
            tone: Tone::Success,
            heading: None,
            text,
        }
    }

    #[must_use]
    pub const fn error(text: &'a str) -> Self {
        Self {
            tone: Tone::Error,
            heading: None,
            text,
        }
    }

    #[must_use]
    pub const fn with_title(mut self, heading: &'a str) -> Self {
        self.heading = Some(heading);
        self
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        html! {
            div class={ "alert " (self.tone.modifier()) } role=(self.tone.aria_role()) {
                @if let Some(heading) = self.heading {
                    strong { (heading) } " "
                }
                (self.text)
            }
        }
    }
}

/// Outcome of the last row action or sign-in, pinned to the corner of the
/// shell until the stylesheet fades it out.
#[derive(Debug, Clone)]
pub struct Toast<'a> {
    tone: Tone,
    text: &'a str,
}

impl<'a> Toast<'a> {
    #[must_use]
    pub const fn new(tone: Tone, text: &'a str) -> Self {
        Self { tone, text }
    }
}

impl Render for Toast<'_> {
    fn render(&self) -> Markup {
        html! {
            div class={ "toast alert " (self.tone.modifier()) } role=(self.tone.aria_role()) {
                (self.text)
            }
        }
    }
}

/// Replaces a table or a dialog body whose fetch failed.
#[derive(Debug, Clone)]
pub struct StatusBox<'a> {
    heading: &'a str,
    detail: &'a str,
}

impl<'a> StatusBox<'a> {
    #[must_use]
    pub const fn error(heading: &'a str, detail: &'a str) -> Self {
        Self { heading, detail }
    }
}

impl Render for StatusBox<'_> {
    fn render(&self) -> Markup {
        html! {
            div.status-box.status-box-error role="alert" {
                strong { (self.heading) }
                p { (self.detail) }
            }
        }
    }
}
