//! Status badges for accounts, posts and reports.

use maud::{html, Markup, Render};

use crate::models::{AccountStatus, PostStatus, ReportStatus, TargetType};

/// Colour family of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Danger,
    Warning,
    Neutral,
}

impl BadgeTone {
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "badge badge-success",
            Self::Danger => "badge badge-danger",
            Self::Warning => "badge badge-warning",
            Self::Neutral => "badge badge-neutral",
        }
    }
}

/// A coloured status pill.
#[derive(Debug, Clone)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

impl Badge {
    #[must_use]
    pub fn new(label: impl Into<String>, tone: BadgeTone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }

    #[must_use]
    pub fn account(status: AccountStatus) -> Self {
        let tone = match status {
            AccountStatus::Active => BadgeTone::Success,
            AccountStatus::Blocked => BadgeTone::Danger,
            AccountStatus::Pending => BadgeTone::Warning,
        };
        Self::new(status.label(), tone)
    }

    #[must_use]
    pub fn post(status: &PostStatus) -> Self {
        let tone = match status {
            PostStatus::Approved => BadgeTone::Success,
            PostStatus::Rejected => BadgeTone::Danger,
            PostStatus::Pending => BadgeTone::Warning,
            PostStatus::Other(_) => BadgeTone::Neutral,
        };
        Self::new(status.label(), tone)
    }

    /// Missing statuses render as a neutral "No status".
    #[must_use]
    pub fn report(status: Option<&ReportStatus>) -> Self {
        let Some(status) = status else {
            return Self::new("No status", BadgeTone::Neutral);
        };
        let tone = match status {
            ReportStatus::Pending | ReportStatus::Warning(_) => BadgeTone::Warning,
            ReportStatus::Resolved => BadgeTone::Success,
            ReportStatus::Blocked => BadgeTone::Danger,
            ReportStatus::Dismissed | ReportStatus::Other(_) => BadgeTone::Neutral,
        };
        Self::new(status.label(), tone)
    }

    #[must_use]
    pub fn target(target: TargetType) -> Self {
        Self::new(target.label(), BadgeTone::Neutral)
    }
}

impl Render for Badge {
    fn render(&self) -> Markup {
        html! {
            span class=(self.tone.css_class()) { (self.label) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_badges() {
        let html = Badge::account(AccountStatus::Active).render().into_string();
        assert_eq!(html, "<span class=\"badge badge-success\">Active</span>");

        let html = Badge::account(AccountStatus::Blocked).render().into_string();
        assert!(html.contains("badge-danger"));
    }

    #[test]
    fn test_post_badge_unknown_code() {
        let badge = Badge::post(&PostStatus::from_code("7"));
        assert_eq!(badge.tone, BadgeTone::Neutral);
        assert_eq!(badge.label, "7");
    }

    #[test]
    fn test_report_badges() {
        let badge = Badge::report(Some(&ReportStatus::parse("WARNING_2")));
        assert_eq!(badge.tone, BadgeTone::Warning);
        assert_eq!(badge.label, "Warning_2");

        let badge = Badge::report(None);
        assert_eq!(badge.label, "No status");
    }
}
