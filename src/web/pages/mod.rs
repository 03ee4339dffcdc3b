//! Maud-based page templates for the web UI.
//!
//! Each page module exports a render function that produces the complete
//! HTML document from data the route handler has already loaded.

pub mod auth;
pub mod dashboard;
pub mod posts;
pub mod reports;
pub mod users;

use chrono::{DateTime, Utc};
use maud::{html, Markup};

use crate::auth::ShellUser;
use crate::collection::TableView;
use crate::components::{with_query, BaseLayout, StatusBox, Toast};
use crate::table::TableQuery;

pub use auth::{render_forgot_password_page, render_login_page, render_signup_page, AuthFormState};
pub use dashboard::render_dashboard_page;
pub use posts::{render_posts_page, PostsPageParams};
pub use reports::{render_reports_page, ReportsPageParams};
pub use users::{render_users_page, UsersPageParams};

/// What every signed-in page needs besides its own data.
#[derive(Debug, Clone)]
pub struct Shell<'a> {
    pub user: &'a ShellUser,
    pub toast: Option<Toast<'a>>,
    pub refresh_secs: u64,
    /// Image host for relative avatar and media paths
    pub media_base: &'a str,
    pub default_avatar: &'a str,
}

impl<'a> Shell<'a> {
    /// Layout for a page. The browser only reloads on its own while no
    /// dialog is open.
    pub(crate) fn layout(
        &self,
        title: &'a str,
        active_path: &'a str,
        fetched_at: Option<DateTime<Utc>>,
        dialog_open: bool,
    ) -> BaseLayout<'a> {
        let mut layout = BaseLayout::new(title, self.user, active_path)
            .with_toast(self.toast.clone())
            .with_updated_at(fetched_at.map(|t| t.format("%H:%M:%S").to_string()));
        if !dialog_open {
            layout = layout.with_auto_refresh(self.refresh_secs);
        }
        layout
    }
}

/// URL of a listing page reproducing its filter, sort and page.
#[must_use]
pub fn list_url(base: &str, extra: &[(&'static str, String)], query: &TableQuery) -> String {
    let mut params = extra.to_vec();
    params.extend(query.to_params());
    with_query(base, &params)
}

/// Same listing URL with a detail dialog open on `id`.
#[must_use]
pub fn dialog_url(base: &str, extra: &[(&'static str, String)], query: &TableQuery, id: &str) -> String {
    let mut params = extra.to_vec();
    params.extend(query.to_params());
    params.push(("view", id.to_string()));
    with_query(base, &params)
}

/// Banner shown above a table whose last refresh failed.
pub(crate) fn load_status<T>(table: &TableView<T>, what: &str) -> Markup {
    html! {
        @if let Some(error) = &table.last_error {
            @let title = if table.loaded {
                format!("Showing the last loaded {what}; refresh failed")
            } else {
                format!("Could not load {what}")
            };
            (StatusBox::error(&title, error))
        }
    }
}

/// Manual refresh button for a page's data.
pub(crate) fn refresh_button(page: &str, return_to: &str) -> Markup {
    html! {
        form class="inline-form" method="post" action="/refresh" {
            input type="hidden" name="page" value=(page);
            input type="hidden" name="return_to" value=(return_to);
            button class="button button-outline" type="submit" { "Refresh" }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Shell;
    use crate::auth::ShellUser;

    pub fn user() -> ShellUser {
        ShellUser {
            name: "Ana Admin".to_string(),
            email: "ana@filxconnect.com".to_string(),
        }
    }

    pub fn shell(user: &ShellUser) -> Shell<'_> {
        Shell {
            user,
            toast: None,
            refresh_secs: 30,
            media_base: "https://cdn.example/",
            default_avatar: "https://cdn.example/default.png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_dialog_urls() {
        let query = TableQuery::from_params(Some("an"), None, None, Some(1));
        assert_eq!(list_url("/users", &[], &query), "/users?q=an&page=1");
        assert_eq!(
            dialog_url("/posts", &[("tab", "all".to_string())], &query, "9"),
            "/posts?tab=all&q=an&page=1&view=9"
        );
    }
}
