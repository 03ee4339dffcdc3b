use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{info, warn};

use super::flash::{redirect_with_flash, Flash, IncomingFlash};
use super::{pages, AppState};
use crate::auth::{
    AdminProfile, AuthError, ForgotPasswordForm, LoginForm, MaybeSession, SessionContext,
    SignupForm,
};
use crate::constants::{SESSION_COOKIE, SESSION_MAX_AGE_SECS};
use crate::models::NewAdminRecord;
use pages::AuthFormState;

pub(crate) const LOGIN_PATH: &str = "/auth/login";
const HOME_PATH: &str = "/dashboard";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login_post))
        .route("/auth/signup", get(signup_page).post(signup_post))
        .route(
            "/auth/forgot-password",
            get(forgot_password_page).post(forgot_password_post),
        )
        .route("/auth/logout", post(logout))
}

fn session_cookie(state: &AppState, token: &str) -> String {
    let secure = if state.config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={SESSION_MAX_AGE_SECS}{secure}"
    )
}

fn clear_session_cookie(state: &AppState) -> String {
    let secure = if state.config.cookie_secure { "; Secure" } else { "" };
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{secure}")
}

/// GET /auth/login
async fn login_page(MaybeSession(session): MaybeSession, flash: IncomingFlash) -> Response {
    if session.is_some() {
        return Redirect::to(HOME_PATH).into_response();
    }
    let html = pages::render_login_page(&AuthFormState::default(), flash.toast());
    flash.consume(Html(html.into_string()).into_response())
}

/// POST /auth/login
async fn login_post(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if let Err(errors) = form.validate() {
        let page = AuthFormState::with_email(&form.email).errors(errors);
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(pages::render_login_page(&page, None).into_string()),
        )
            .into_response();
    }

    match state.sessions.sign_in(form.email.trim(), &form.password).await {
        Ok(session) => (
            AppendHeaders([
                (header::SET_COOKIE, session_cookie(&state, session.token())),
                (header::SET_COOKIE, Flash::success("Login successful").set_cookie()),
            ]),
            Redirect::to(HOME_PATH),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Login failed");
            let page = AuthFormState::with_email(&form.email).error(e.to_string());
            (
                StatusCode::UNAUTHORIZED,
                Html(pages::render_login_page(&page, None).into_string()),
            )
                .into_response()
        }
    }
}

/// GET /auth/signup
async fn signup_page(flash: IncomingFlash) -> Response {
    let html = pages::render_signup_page(&AuthFormState::default(), flash.toast());
    flash.consume(Html(html.into_string()).into_response())
}

/// POST /auth/signup
///
/// Creates the provider account, writes the admin profile record and then
/// registers the admin with the backend. A failing step leaves the earlier
/// ones in place.
async fn signup_post(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    let page = AuthFormState {
        email: form.email.clone(),
        full_name: form.full_name.clone(),
        ..AuthFormState::default()
    };
    if let Err(errors) = form.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(pages::render_signup_page(&page.errors(errors), None).into_string()),
        )
            .into_response();
    }

    match create_admin(&state, &form).await {
        Ok(()) => {
            info!(email = %form.email, "Admin signed up");
            redirect_with_flash(LOGIN_PATH, &Flash::success("Admin signed up successfully!"))
        }
        Err(message) => {
            warn!(email = %form.email, error = %message, "Admin signup failed");
            let page = page.error(format!("Signup error: {message}"));
            (
                StatusCode::BAD_REQUEST,
                Html(pages::render_signup_page(&page, None).into_string()),
            )
                .into_response()
        }
    }
}

async fn create_admin(state: &AppState, form: &SignupForm) -> Result<(), String> {
    let provider = state.sessions.provider();
    let email = form.email.trim();
    let full_name = form.full_name.trim();

    let identity = provider
        .sign_up(email, &form.password)
        .await
        .map_err(|e: AuthError| e.to_string())?;
    provider
        .save_profile(&identity, &AdminProfile::new_admin(&identity, full_name))
        .await
        .map_err(|e| e.to_string())?;

    let record = NewAdminRecord {
        aname: full_name.to_string(),
        aemail: email.to_string(),
        apass: form.password.clone(),
        aprofilepic: state.config.default_avatar_url.clone(),
    };
    state
        .api
        .create_admin(&record)
        .await
        .map_err(|e| e.to_string())
}

/// GET /auth/forgot-password
async fn forgot_password_page() -> Response {
    Html(pages::render_forgot_password_page(&AuthFormState::default()).into_string())
        .into_response()
}

/// POST /auth/forgot-password
async fn forgot_password_post(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        let page = AuthFormState::with_email(&form.email).errors(errors);
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(pages::render_forgot_password_page(&page).into_string()),
        )
            .into_response();
    }

    let page = match state
        .sessions
        .provider()
        .send_password_reset(form.email.trim())
        .await
    {
        Ok(()) => {
            info!("Password reset email requested");
            AuthFormState::default().notice("Check your email for the reset link.")
        }
        Err(e) => {
            warn!(error = %e, "Password reset request failed");
            AuthFormState::with_email(&form.email).error(e.to_string())
        }
    };
    Html(pages::render_forgot_password_page(&page).into_string()).into_response()
}

/// POST /auth/logout
///
/// Signing out the last open session also stops every page's refresh timer.
async fn logout(State(state): State<AppState>, MaybeSession(session): MaybeSession) -> Response {
    if let Some(session) = session {
        if let Err(e) = session.sign_out().await {
            warn!(error = %e, "Provider sign-out failed");
        }
        if session.store_is_empty() {
            state.views.deactivate_all().await;
        }
    }

    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(&state))]),
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}
