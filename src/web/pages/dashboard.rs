use maud::{html, Markup, Render};

use super::{refresh_button, Shell};
use crate::collection::Snapshot;
use crate::components::{Avatar, EmptyState, KeyValueTable, Panel, StatsCard, StatsCardGrid, StatusBox};
use crate::models::Notification;
use crate::views::format::{clock_time, media_url};
use crate::views::DashboardMetrics;

const BASE: &str = "/dashboard";

/// Dashboard with the last loaded figures. Before the first successful
/// load every figure reads zero.
#[must_use]
pub fn render_dashboard_page(shell: &Shell<'_>, snapshot: &Snapshot<DashboardMetrics>) -> Markup {
    let empty = DashboardMetrics::default();
    let metrics = snapshot.value.as_ref().unwrap_or(&empty);

    let cards = StatsCardGrid::new()
        .card(StatsCard::new("Total Users", metrics.total_users).icon("\u{1f465}"))
        .card(
            StatsCard::new("Active Users", metrics.active_users)
                .caption(metrics.active_user_share())
                .icon("\u{2714}"),
        )
        .card(
            StatsCard::new("Active Posts", metrics.active_posts)
                .caption("Active posts")
                .icon("\u{1f4dd}"),
        )
        .card(
            StatsCard::new("Reported Users", metrics.reported_users)
                .caption(metrics.reported_user_share())
                .icon("\u{26a0}"),
        );

    let quick_stats = KeyValueTable::new()
        .item("Total Posts", &metrics.total_posts.to_string())
        .item("Active Users", &metrics.active_users.to_string());

    let content = html! {
        div class="page-header" {
            h2 { "Dashboard" }
            (refresh_button("dashboard", BASE))
        }
        @if let Some(error) = &snapshot.last_error {
            @let title = if snapshot.is_loaded() {
                "Showing the last loaded figures; refresh failed"
            } else {
                "Could not load dashboard figures"
            };
            (StatusBox::error(title, error))
        }
        (cards)
        div class="panel-grid" {
            (Panel::new("Recent Activity", recent_activity(shell, metrics.recent_notifications())))
            (Panel::new("Quick Stats", quick_stats.render()))
        }
    };

    shell
        .layout("Dashboard", BASE, snapshot.fetched_at, false)
        .render(content)
}

fn recent_activity(shell: &Shell<'_>, notifications: &[Notification]) -> Markup {
    if notifications.is_empty() {
        return EmptyState::new("No recent activity").render();
    }
    html! {
        ul class="activity-list" {
            @for note in notifications {
                @let avatar = media_url(note.sender_pic.as_deref(), shell.media_base, shell.default_avatar);
                li class="activity-item" {
                    (Avatar::new(&avatar, &note.sender))
                    p class="activity-text" {
                        strong { (note.sender) } " " (note.message)
                    }
                    time class="activity-time" datetime=[note.created_at.as_deref()] {
                        (clock_time(note.created_at.as_deref()))
                    }
                }
            }
        }
    }
}
