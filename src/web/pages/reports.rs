use maud::{html, Markup, Render};

use super::posts::post_details_body;
use super::users::user_details_body;
use super::{dialog_url, list_url, load_status, refresh_button, Shell};
use crate::collection::TableView;
use crate::components::{
    ActionButton, Badge, Button, ButtonStyle, FilterBox, Modal, Pagination, SortHeader,
    StatusBox, Table, TableRow,
};
use crate::dialog::Dialog;
use crate::table::TableQuery;
use crate::views::{ReportDetails, ReportRow};

const BASE: &str = "/reports";

pub struct ReportsPageParams<'a> {
    pub table: &'a TableView<ReportRow>,
    pub query: &'a TableQuery,
    /// Details of the reported post or user
    pub dialog: Dialog<Result<ReportDetails, String>>,
}

#[must_use]
pub fn render_reports_page(shell: &Shell<'_>, params: &ReportsPageParams<'_>) -> Markup {
    let query = params.query;
    let return_to = list_url(BASE, &[], query);
    let page = &params.table.page;

    let headers = vec![
        html! { "Type" },
        html! { "Target" },
        SortHeader::new("Reason", "reason", query, BASE).render(),
        html! { "Reported By" },
        html! { "Status" },
        html! { "Actions" },
    ];
    let rows = page
        .rows
        .iter()
        .map(|row| report_row(row, query, &return_to))
        .collect();

    let content = html! {
        div class="page-header" {
            h2 { "Reports" }
            (refresh_button("reports", &return_to))
        }
        (load_status(params.table, "reports"))
        (FilterBox::new(BASE, "Filter reports...", &query.filter).keep(query.to_params()))
        (Table::new(headers, rows).when_empty("No reports."))
        (Pagination::new(page.page, page.total_pages, BASE).with_params(query.to_params()))
        @if let Dialog::Open(details) = &params.dialog {
            (details_dialog(shell, details, &return_to))
        }
    };

    shell
        .layout("Reports", BASE, params.table.fetched_at, params.dialog.is_open())
        .render(content)
}

fn report_row(row: &ReportRow, query: &TableQuery, return_to: &str) -> Markup {
    let id = row.id();
    let view_href = dialog_url(BASE, &[], query, id);
    let action = |name: &str| format!("{BASE}/{id}/{name}");
    let target = &row.target_name;

    let actions = html! {
        div class="row-actions" {
            @if row.allows_user_actions() {
                (ActionButton::new("Warn", action("warn"), ButtonStyle::Warning)
                    .return_to(return_to)
                    .confirm(format!(
                        "Are you sure you want to send a warning to user \"{target}\"? They will be notified about this action."
                    )))
                (ActionButton::new("Block", action("block"), ButtonStyle::Danger)
                    .return_to(return_to)
                    .confirm(format!(
                        "Are you sure you want to block user \"{target}\"? This action cannot be undone."
                    )))
            }
            @if row.allows_post_delete() {
                (ActionButton::new("Delete Post", action("delete-post"), ButtonStyle::Danger)
                    .return_to(return_to)
                    .confirm("Are you sure you want to delete the reported post? This action cannot be undone."))
            }
            details class="row-menu" {
                summary aria-label="More actions" { "\u{22ef}" }
                div class="row-menu-items" {
                    (Button::outline("View Details").href(&view_href))
                    @if row.allows_decision() {
                        (ActionButton::new("Mark as Resolved", action("resolve"), ButtonStyle::Success)
                            .return_to(return_to))
                        (ActionButton::new("Dismiss Report", action("dismiss"), ButtonStyle::Outline)
                            .return_to(return_to))
                    }
                }
            }
        }
    };

    TableRow::new()
        .markup(Badge::target(row.target_type).render())
        .text(target)
        .text(&row.report.reason)
        .text(&row.reporter_name)
        .markup(Badge::report(row.report.report_status.as_ref()).render())
        .markup(actions)
        .render()
}

fn details_dialog(
    shell: &Shell<'_>,
    details: &Result<ReportDetails, String>,
    close: &str,
) -> Markup {
    match details {
        Ok(ReportDetails::Post(post)) => {
            Modal::new("Post Details", close, post_details_body(shell, post)).render()
        }
        Ok(ReportDetails::User(user)) => {
            Modal::new("User Details", close, user_details_body(shell, user)).render()
        }
        Err(error) => Modal::new(
            "Report Details",
            close,
            StatusBox::error("Failed to fetch report details", error).render(),
        )
        .render(),
    }
}
