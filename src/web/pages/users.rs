use maud::{html, Markup, Render};

use super::{dialog_url, list_url, load_status, refresh_button, Shell};
use crate::collection::TableView;
use crate::components::{
    ActionButton, Avatar, Badge, Button, ButtonStyle, FilterBox, KeyValueTable, Modal,
    Pagination, SortHeader, StatusBox, Table, TableRow,
};
use crate::dialog::Dialog;
use crate::models::{User, UserDetails};
use crate::table::TableQuery;
use crate::views::format::media_url;

const BASE: &str = "/users";

pub struct UsersPageParams<'a> {
    pub table: &'a TableView<User>,
    pub query: &'a TableQuery,
    /// Details of the selected user, or why they could not be loaded
    pub dialog: Dialog<Result<UserDetails, String>>,
}

#[must_use]
pub fn render_users_page(shell: &Shell<'_>, params: &UsersPageParams<'_>) -> Markup {
    let query = params.query;
    let return_to = list_url(BASE, &[], query);
    let page = &params.table.page;

    let headers = vec![
        SortHeader::new("Username", "username", query, BASE).render(),
        html! { "Email" },
        html! { "Status" },
        html! { "Reports" },
        html! { "Actions" },
    ];
    let rows = page
        .rows
        .iter()
        .map(|user| user_row(user, query, &return_to))
        .collect();

    let content = html! {
        div class="page-header" {
            h2 { "Users" }
            (refresh_button("users", &return_to))
        }
        (load_status(params.table, "users"))
        (FilterBox::new(BASE, "Filter users...", &query.filter).keep(query.to_params()))
        (Table::new(headers, rows))
        (Pagination::new(page.page, page.total_pages, BASE).with_params(query.to_params()))
        @if let Dialog::Open(details) = &params.dialog {
            (details_dialog(shell, details, &return_to))
        }
    };

    shell
        .layout("Users", BASE, params.table.fetched_at, params.dialog.is_open())
        .render(content)
}

fn user_row(user: &User, query: &TableQuery, return_to: &str) -> Markup {
    let view_href = dialog_url(BASE, &[], query, &user.id);
    let actions = html! {
        div class="row-actions" {
            (Button::outline("View Details").href(&view_href))
            (ActionButton::new("Approve User", format!("{BASE}/{}/approve", user.id), ButtonStyle::Success)
                .return_to(return_to))
            (ActionButton::new("Block User", format!("{BASE}/{}/block", user.id), ButtonStyle::Danger)
                .return_to(return_to))
        }
    };
    TableRow::new()
        .text(&user.username)
        .text(&user.email)
        .markup(Badge::account(user.status).render())
        .text(&user.reports.unwrap_or(0).to_string())
        .markup(actions)
        .render()
}

fn details_dialog(shell: &Shell<'_>, details: &Result<UserDetails, String>, close: &str) -> Markup {
    let body = match details {
        Ok(user) => user_details_body(shell, user),
        Err(error) => StatusBox::error("Failed to fetch user details", error).render(),
    };
    Modal::new("User Details", close, body).render()
}

/// Avatar, username and bio of a user.
pub(super) fn user_details_body(shell: &Shell<'_>, user: &UserDetails) -> Markup {
    let avatar = media_url(
        user.profile_picture.as_deref(),
        shell.media_base,
        shell.default_avatar,
    );
    let bio = user
        .bio
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or("No bio available!");
    html! {
        div class="profile" {
            (Avatar::new(&avatar, &user.username).large())
            (KeyValueTable::new().item("Username", &user.username).item("Bio", bio))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TablePage;
    use crate::web::pages::test_support::{shell, user};
    use serde_json::json;

    fn table(users: Vec<User>) -> TableView<User> {
        let total_rows = users.len();
        TableView {
            page: TablePage {
                rows: users,
                page: 0,
                total_pages: 1,
                total_rows,
            },
            loaded: true,
            last_error: None,
            fetched_at: None,
        }
    }

    fn row(id: u32, status: i64) -> User {
        serde_json::from_value(json!({
            "id": id, "username": format!("user{id}"), "email": format!("u{id}@x.io"), "status": status
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_show_status_labels() {
        let admin = user();
        let table = table(vec![row(1, 1), row(2, 0), row(3, 7)]);
        let query = TableQuery::default();
        let html = render_users_page(
            &shell(&admin),
            &UsersPageParams {
                table: &table,
                query: &query,
                dialog: Dialog::Closed,
            },
        )
        .into_string();

        assert!(html.contains(">Active</span>"));
        assert!(html.contains(">Blocked</span>"));
        assert!(html.contains(">Pending</span>"));
        assert!(html.contains("action=\"/users/2/approve\""));
        assert!(html.contains("href=\"/users?view=3\""));
        assert!(!html.contains("role=\"dialog\""));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_details_dialog_without_bio() {
        let admin = user();
        let table = table(vec![]);
        let query = TableQuery::default();
        let details = UserDetails {
            username: "ana".to_string(),
            profile_picture: Some("p/ana.png".to_string()),
            bio: None,
        };
        let html = render_users_page(
            &shell(&admin),
            &UsersPageParams {
                table: &table,
                query: &query,
                dialog: Dialog::open(Ok(details)),
            },
        )
        .into_string();

        assert!(html.contains("No results."));
        assert!(html.contains("User Details"));
        assert!(html.contains("No bio available!"));
        assert!(html.contains("src=\"https://cdn.example/p/ana.png\""));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }
}
