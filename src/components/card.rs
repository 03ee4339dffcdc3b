//! Cards for the dashboard: headline figures and the notification feed.

use maud::{html, Markup, Render};

/// A headline figure with an optional caption underneath.
///
/// # Example
///
/// ```ignore
/// use crate::components::card::StatsCard;
///
/// let card = StatsCard::new("Active Users", "42").caption("37.5% of total users");
/// ```
#[derive(Debug, Clone)]
pub struct StatsCard<'a> {
    pub title: &'a str,
    pub value: String,
    pub caption: Option<String>,
    /// Decorative glyph shown beside the title
    pub icon: Option<&'a str>,
}

impl<'a> StatsCard<'a> {
    #[must_use]
    pub fn new(title: &'a str, value: impl ToString) -> Self {
        Self {
            title,
            value: value.to_string(),
            caption: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: &'a str) -> Self {
        self.icon = Some(icon);
        self
    }
}

impl Render for StatsCard<'_> {
    fn render(&self) -> Markup {
        html! {
            article class="stats-card" {
                header class="stats-card-header" {
                    h3 { (self.title) }
                    @if let Some(icon) = self.icon {
                        span class="stats-card-icon" aria-hidden="true" { (icon) }
                    }
                }
                p class="stats-card-value" { (self.value) }
                @if let Some(caption) = &self.caption {
                    p class="stats-card-caption" { (caption) }
                }
            }
        }
    }
}

/// Responsive grid of [`StatsCard`]s.
#[derive(Debug, Clone, Default)]
pub struct StatsCardGrid<'a> {
    pub cards: Vec<StatsCard<'a>>,
}

impl<'a> StatsCardGrid<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn card(mut self, card: StatsCard<'a>) -> Self {
        self.cards.push(card);
        self
    }
}

impl Render for StatsCardGrid<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="stats-grid" {
                @for card in &self.cards {
                    (card)
                }
            }
        }
    }
}

/// A titled panel with arbitrary content.
#[derive(Debug)]
pub struct Panel<'a> {
    pub title: &'a str,
    pub content: Markup,
}

impl<'a> Panel<'a> {
    #[must_use]
    pub fn new(title: &'a str, content: Markup) -> Self {
        Self { title, content }
    }
}

impl Render for Panel<'_> {
    fn render(&self) -> Markup {
        html! {
            section class="panel" {
                h2 class="panel-title" { (self.title) }
                (self.content)
            }
        }
    }
}

/// Shown in place of a list that has nothing to display.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_card() {
        let html = StatsCard::new("Active Users", 3)
            .caption("37.5% of total users")
            .render()
            .into_string();
        assert!(html.contains("<h3>Active Users</h3>"));
        assert!(html.contains("<p class=\"stats-card-value\">3</p>"));
        assert!(html.contains("37.5% of total users"));
        assert!(!html.contains("stats-card-icon"));
    }

    #[test]
    fn test_grid_renders_all_cards() {
        let html = StatsCardGrid::new()
            .card(StatsCard::new("Total Users", 8))
            .card(StatsCard::new("Reported Users", 1).icon("!"))
            .render()
            .into_string();
        assert_eq!(html.matches("class=\"stats-card\"").count(), 2);
        assert!(html.contains("aria-hidden=\"true\">!</span>"));
    }

    #[test]
    fn test_panel_and_empty_state() {
        let html = Panel::new("Recent Notifications", EmptyState::new("No notifications").render())
            .render()
            .into_string();
        assert!(html.contains("<h2 class=\"panel-title\">Recent Notifications</h2>"));
        assert!(html.contains("<p class=\"empty-state\">No notifications</p>"));
    }
}
