use std::future::Future;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::warn;

use super::auth::LOGIN_PATH;
use super::flash::{redirect_with_flash, Flash, IncomingFlash};
use super::pages::{self, Shell};
use super::AppState;
use crate::auth::{BrowserSession, RequireSession, ShellUser};
use crate::backend::ReportDecision;
use crate::collection::RefreshOutcome;
use crate::dialog::Dialog;
use crate::table::TableQuery;
use crate::views::{ActionError, PostTab};

/// Create the router with all dashboard routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health))
        .route("/dashboard", get(dashboard))
        .route("/refresh", post(refresh))
        .route("/users", get(users))
        .route("/users/:id/approve", post(approve_user))
        .route("/users/:id/block", post(block_user))
        .route("/posts", get(posts))
        .route("/posts/:id/approve", post(approve_post))
        .route("/posts/:id/reject", post(reject_post))
        .route("/posts/:id/delete", post(delete_post))
        .route("/reports", get(reports))
        .route("/reports/:id/warn", post(warn_report_target))
        .route("/reports/:id/block", post(block_report_target))
        .route("/reports/:id/delete-post", post(delete_reported_post))
        .route("/reports/:id/resolve", post(resolve_report))
        .route("/reports/:id/dismiss", post(dismiss_report))
}

/// Query parameters shared by the listing pages.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    q: Option<String>,
    sort: Option<String>,
    dir: Option<String>,
    page: Option<usize>,
    /// Entity whose detail dialog is open
    view: Option<String>,
    tab: Option<String>,
}

impl ListParams {
    fn table_query(&self) -> TableQuery {
        TableQuery::from_params(
            self.q.as_deref(),
            self.sort.as_deref(),
            self.dir.as_deref(),
            self.page,
        )
    }
}

/// Body of every row action form.
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    #[serde(default)]
    return_to: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshForm {
    page: String,
    #[serde(default)]
    return_to: String,
}

/// Only same-site paths that fit in a `Location` header are accepted as
/// redirect targets.
fn safe_return_to(return_to: &str, fallback: &str) -> String {
    let same_site = return_to.starts_with('/')
        && !return_to.starts_with("//")
        && !return_to.starts_with("/\\");
    let header_safe =
        !return_to.contains(char::is_control) && HeaderValue::from_str(return_to).is_ok();
    if same_site && header_safe {
        return_to.to_string()
    } else {
        fallback.to_string()
    }
}

fn shell<'a>(state: &'a AppState, user: &'a ShellUser, flash: &'a IncomingFlash) -> Shell<'a> {
    Shell {
        user,
        toast: flash.toast(),
        refresh_secs: state.config.refresh_interval.as_secs(),
        media_base: &state.config.media_base_url,
        default_avatar: &state.config.default_avatar_url,
    }
}

/// Header identity of a session, or the login redirect when it was signed
/// out while this request was in flight.
fn shell_user(session: &BrowserSession) -> Result<ShellUser, Response> {
    session
        .shell_user()
        .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())
}

/// Run a row action and redirect back with its outcome as a toast.
async fn run_action(
    name: &'static str,
    id: &str,
    return_to: &str,
    fallback: &str,
    action: impl Future<Output = Result<String, ActionError>>,
) -> Response {
    let to = safe_return_to(return_to, fallback);
    match action.await {
        Ok(message) => redirect_with_flash(&to, &Flash::success(message)),
        Err(e) => {
            warn!(action = name, id, error = %e, "Row action failed");
            redirect_with_flash(&to, &Flash::error(e.to_string()))
        }
    }
}

// ========== Pages ==========

async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

async fn health() -> &'static str {
    "OK"
}

async fn dashboard(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    flash: IncomingFlash,
) -> Response {
    let user = match shell_user(&session) {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };
    let remote = state.views.dashboard.remote();
    remote.activate(state.config.refresh_interval).await;

    let html = pages::render_dashboard_page(&shell(&state, &user, &flash), &remote.snapshot());
    flash.consume(Html(html.into_string()).into_response())
}

async fn users(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    flash: IncomingFlash,
    Query(params): Query<ListParams>,
) -> Response {
    let user = match shell_user(&session) {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };
    let view = &state.views.users;
    view.collection().activate(state.config.refresh_interval).await;

    let query = params.table_query();
    let table = view.collection().view(&query);
    let dialog = match params.view.as_deref() {
        Some(id) => Dialog::open(view.details(id).await.map_err(|e| {
            warn!(user_id = id, error = %e, "Failed to fetch user details");
            e.to_string()
        })),
        None => Dialog::Closed,
    };

    let html = pages::render_users_page(
        &shell(&state, &user, &flash),
        &pages::UsersPageParams {
            table: &table,
            query: &query,
            dialog,
        },
    );
    flash.consume(Html(html.into_string()).into_response())
}

async fn posts(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    flash: IncomingFlash,
    Query(params): Query<ListParams>,
) -> Response {
    let user = match shell_user(&session) {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };
    let view = &state.views.posts;
    view.collection().activate(state.config.refresh_interval).await;

    let tab = params
        .tab
        .as_deref()
        .and_then(PostTab::parse)
        .unwrap_or_default();
    view.select_tab(tab).await;

    let query = params.table_query();
    let table = view.view(tab, &query);
    let dialog = match params.view.as_deref() {
        Some(id) => Dialog::open(view.details(id).await.map_err(|e| {
            warn!(post_id = id, error = %e, "Failed to fetch post details");
            e.to_string()
        })),
        None => Dialog::Closed,
    };

    let html = pages::render_posts_page(
        &shell(&state, &user, &flash),
        &pages::PostsPageParams {
            table: &table,
            query: &query,
            tab,
            dialog,
        },
    );
    flash.consume(Html(html.into_string()).into_response())
}

async fn reports(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    flash: IncomingFlash,
    Query(params): Query<ListParams>,
) -> Response {
    let user = match shell_user(&session) {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };
    let view = &state.views.reports;
    view.collection().activate(state.config.refresh_interval).await;

    let query = params.table_query();
    let table = view.collection().view(&query);
    let dialog = match params.view.as_deref() {
        Some(id) => Dialog::open(view.details(id).await.map_err(|e| {
            warn!(report_id = id, error = %e, "Failed to fetch report details");
            e.to_string()
        })),
        None => Dialog::Closed,
    };

    let html = pages::render_reports_page(
        &shell(&state, &user, &flash),
        &pages::ReportsPageParams {
            table: &table,
            query: &query,
            dialog,
        },
    );
    flash.consume(Html(html.into_string()).into_response())
}

/// POST /refresh - re-fetch one page's data now.
async fn refresh(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Form(form): Form<RefreshForm>,
) -> Response {
    let views = &state.views;
    let (result, fallback) = match form.page.as_str() {
        "dashboard" => (views.dashboard.remote().refresh().await, "/dashboard"),
        "users" => (views.users.collection().refresh().await, "/users"),
        "posts" => (views.posts.collection().refresh().await, "/posts"),
        "reports" => (views.reports.collection().refresh().await, "/reports"),
        _ => return (StatusCode::BAD_REQUEST, "Unknown page").into_response(),
    };

    let to = safe_return_to(&form.return_to, fallback);
    match result {
        Ok(RefreshOutcome::Applied | RefreshOutcome::Stale) => Redirect::to(&to).into_response(),
        Err(e) => {
            warn!(page = %form.page, error = %e, "Manual refresh failed");
            redirect_with_flash(&to, &Flash::error(format!("Refresh failed: {e}")))
        }
    }
}

// ========== User actions ==========

async fn approve_user(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.users;
    run_action("approve_user", &id, &form.return_to, "/users", view.approve(&id)).await
}

async fn block_user(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.users;
    run_action("block_user", &id, &form.return_to, "/users", view.block(&id)).await
}

// ========== Post actions ==========

async fn approve_post(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.posts;
    run_action("approve_post", &id, &form.return_to, "/posts", view.approve(&id)).await
}

async fn reject_post(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.posts;
    run_action("reject_post", &id, &form.return_to, "/posts", view.reject(&id)).await
}

async fn delete_post(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.posts;
    run_action("delete_post", &id, &form.return_to, "/posts", view.delete(&id)).await
}

// ========== Report actions ==========
// Report actions look the report up in the loaded rows, so the view is
// activated first.

async fn warn_report_target(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.reports;
    view.collection().activate(state.config.refresh_interval).await;
    run_action("warn_report_target", &id, &form.return_to, "/reports", view.warn_target(&id)).await
}

async fn block_report_target(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.reports;
    view.collection().activate(state.config.refresh_interval).await;
    run_action("block_report_target", &id, &form.return_to, "/reports", view.block_target(&id)).await
}

async fn delete_reported_post(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.reports;
    view.collection().activate(state.config.refresh_interval).await;
    run_action(
        "delete_reported_post",
        &id,
        &form.return_to,
        "/reports",
        view.delete_reported_post(&id),
    )
    .await
}

async fn resolve_report(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.reports;
    view.collection().activate(state.config.refresh_interval).await;
    run_action(
        "resolve_report",
        &id,
        &form.return_to,
        "/reports",
        view.decide(&id, ReportDecision::Resolved),
    )
    .await
}

async fn dismiss_report(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let view = &state.views.reports;
    view.collection().activate(state.config.refresh_interval).await;
    run_action(
        "dismiss_report",
        &id,
        &form.return_to,
        "/reports",
        view.decide(&id, ReportDecision::Dismissed),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_to_must_be_local() {
        assert_eq!(safe_return_to("/users?page=2", "/users"), "/users?page=2");
        assert_eq!(safe_return_to("//evil.example/x", "/users"), "/users");
        assert_eq!(safe_return_to("https://evil.example", "/posts"), "/posts");
        assert_eq!(safe_return_to("", "/reports"), "/reports");
        assert_eq!(safe_return_to("/\\evil.example", "/users"), "/users");
    }

    #[test]
    fn test_return_to_must_be_a_valid_header() {
        assert_eq!(safe_return_to("/users\nx", "/users"), "/users");
        assert_eq!(safe_return_to("/posts\r\nSet-Cookie: a=b", "/posts"), "/posts");
        assert_eq!(safe_return_to("/users\tq", "/users"), "/users");
        assert_eq!(safe_return_to("/users?q=caf\u{e9}", "/users"), "/users");
    }

    #[test]
    fn test_list_params_to_query() {
        let params = ListParams {
            q: Some("spam".to_string()),
            sort: Some("reason".to_string()),
            dir: Some("desc".to_string()),
            page: Some(2),
            ..ListParams::default()
        };
        let query = params.table_query();
        assert_eq!(query.filter, "spam");
        assert_eq!(query.page, 2);
        assert!(query.sort.is_some());
    }
}
