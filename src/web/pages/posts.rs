use chrono::Utc;
use maud::{html, Markup, Render};

use super::{dialog_url, list_url, load_status, refresh_button, Shell};
use crate::collection::TableView;
use crate::components::{
    ActionButton, Avatar, Badge, Button, ButtonStyle, FilterBox, KeyValueTable, MediaGallery, Modal,
    Pagination, SortHeader, StatusBox, TabGroup, Table, TableRow,
};
use crate::constants::{POST_PREVIEW_CHARS, UNKNOWN_USER};
use crate::dialog::Dialog;
use crate::models::Post;
use crate::table::TableQuery;
use crate::views::format::{media_url, time_ago, truncate};
use crate::views::{PostDetails, PostTab};

const BASE: &str = "/posts";

pub struct PostsPageParams<'a> {
    pub table: &'a TableView<Post>,
    pub query: &'a TableQuery,
    pub tab: PostTab,
    pub dialog: Dialog<Result<PostDetails, String>>,
}

#[must_use]
pub fn render_posts_page(shell: &Shell<'_>, params: &PostsPageParams<'_>) -> Markup {
    let query = params.query;
    let tab_param = [("tab", params.tab.as_str().to_string())];
    let return_to = list_url(BASE, &tab_param, query);
    let page = &params.table.page;

    let tabs = PostTab::ALL.into_iter().fold(TabGroup::new("Post status"), |group, tab| {
        group.tab(tab.label(), format!("{BASE}?tab={}", tab.as_str()), tab == params.tab)
    });

    let mut keep = tab_param.to_vec();
    keep.extend(query.to_params());

    let headers = vec![
        SortHeader::new("Content", "content", query, BASE)
            .keep("tab", params.tab.as_str())
            .render(),
        html! { "Author" },
        html! { "Created" },
        html! { "Actions" },
    ];
    let now = Utc::now();
    let rows = page
        .rows
        .iter()
        .map(|post| post_row(post, query, &tab_param, &return_to, now))
        .collect();

    let content = html! {
        div class="page-header" {
            h2 { "Posts" }
            (refresh_button("posts", &return_to))
        }
        (tabs)
        (load_status(params.table, "posts"))
        (FilterBox::new(BASE, "Filter posts...", &query.filter).keep(keep.clone()))
        (Table::new(headers, rows).when_empty("No posts in this tab."))
        (Pagination::new(page.page, page.total_pages, BASE).with_params(keep))
        @if let Dialog::Open(details) = &params.dialog {
            (details_dialog(shell, details, &return_to))
        }
    };

    shell
        .layout("Posts", BASE, params.table.fetched_at, params.dialog.is_open())
        .render(content)
}

fn subject(post: &Post) -> &str {
    post.title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&post.content)
}

fn post_row(
    post: &Post,
    query: &TableQuery,
    tab_param: &[(&'static str, String)],
    return_to: &str,
    now: chrono::DateTime<Utc>,
) -> Markup {
    let view_href = dialog_url(BASE, tab_param, query, &post.id);
    let subject = subject(post);
    let content = if post.content.trim().is_empty() {
        html! { span class="muted" { "No content" } }
    } else {
        html! { span title=(post.content) { (truncate(&post.content, POST_PREVIEW_CHARS)) } }
    };

    let actions = html! {
        div class="row-actions" {
            @if post.status.is_pending() {
                (ActionButton::new("Approve", format!("{BASE}/{}/approve", post.id), ButtonStyle::Success)
                    .return_to(return_to)
                    .confirm(format!("Are you sure you want to approve \"{subject}\"?")))
                (ActionButton::new("Reject", format!("{BASE}/{}/reject", post.id), ButtonStyle::Danger)
                    .return_to(return_to)
                    .confirm(format!(
                        "Are you sure you want to reject \"{subject}\"? This action cannot be undone."
                    )))
            }
            details class="row-menu" {
                summary aria-label="More actions" { "\u{22ef}" }
                div class="row-menu-items" {
                    (Button::outline("View Details").href(&view_href))
                    (ActionButton::new("Delete", format!("{BASE}/{}/delete", post.id), ButtonStyle::Danger)
                        .return_to(return_to)
                        .confirm(format!(
                            "Are you sure you want to delete \"{subject}\"? This action cannot be undone."
                        )))
                }
            }
        }
    };

    TableRow::new()
        .markup(content)
        .text(post.author_name().unwrap_or(UNKNOWN_USER))
        .text(&time_ago(post.created_at.as_deref(), now))
        .markup(actions)
        .render()
}

fn details_dialog(shell: &Shell<'_>, details: &Result<PostDetails, String>, close: &str) -> Markup {
    let body = match details {
        Ok(details) => post_details_body(shell, details),
        Err(error) => StatusBox::error("Failed to fetch post details", error).render(),
    };
    Modal::new("Post Details", close, body).render()
}

/// Author, content and media of a post.
pub(super) fn post_details_body(shell: &Shell<'_>, details: &PostDetails) -> Markup {
    let post = &details.post;
    let author = post.author_name().unwrap_or(UNKNOWN_USER);
    let avatar = media_url(
        post.user.as_ref().and_then(|u| u.avatar.as_deref()),
        shell.media_base,
        shell.default_avatar,
    );
    let content = if post.content.is_empty() {
        "No content"
    } else {
        post.content.as_str()
    };
    html! {
        div class="post-author" {
            (Avatar::new(&avatar, author))
            div {
                strong { (author) }
                div class="muted" { (time_ago(post.created_at.as_deref(), Utc::now())) }
            }
        }
        (KeyValueTable::new()
            .item_markup("Status", Badge::post(&post.status).render())
            .item("Content", content))
        h3 { "Media" }
        (MediaGallery::new(&details.media, shell.media_base))
    }
}
