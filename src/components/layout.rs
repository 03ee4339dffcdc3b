//! Page layouts: the signed-in shell and the centred auth layout.

use maud::{html, Markup, Render, DOCTYPE};

use super::alert::Toast;
use crate::auth::ShellUser;

const BRAND: &str = "FILxCONNECT";

/// Sidebar entries: route, icon, label.
pub const NAV_ITEMS: [(&str, &str, &str); 4] = [
    ("/dashboard", "\u{25A6}", "Dashboard"),
    ("/users", "\u{263A}", "Users"),
    ("/posts", "\u{270E}", "Posts"),
    ("/reports", "\u{2691}", "Reports"),
];

fn head(title: &str, refresh_secs: Option<u64>) -> Markup {
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            meta name="robots" content="noindex";
            @if let Some(secs) = refresh_secs {
                meta http-equiv="refresh" content=(secs);
            }
            title { (title) " - " (BRAND) " Admin" }
            link rel="stylesheet" href="/static/css/style.css";
        }
    }
}

/// The signed-in shell: sidebar, header and main content.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let page = BaseLayout::new("Users", &user, "/users").render(html! { h1 { "Users" } });
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    user: &'a ShellUser,
    active_path: &'a str,
    toast: Option<Toast<'a>>,
    refresh_secs: Option<u64>,
    updated_at: Option<String>,
}

impl<'a> BaseLayout<'a> {
    #[must_use]
    pub fn new(title: &'a str, user: &'a ShellUser, active_path: &'a str) -> Self {
        Self {
            title,
            user,
            active_path,
            toast: None,
            refresh_secs: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn with_toast(mut self, toast: Option<Toast<'a>>) -> Self {
        self.toast = toast;
        self
    }

    /// Reload the page in the browser every `secs` seconds.
    #[must_use]
    pub fn with_auto_refresh(mut self, secs: u64) -> Self {
        self.refresh_secs = Some(secs);
        self
    }

    /// Time of the last successful fetch, shown next to the refresh indicator.
    #[must_use]
    pub fn with_updated_at(mut self, updated_at: Option<String>) -> Self {
        self.updated_at = updated_at;
        self
    }

    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                (head(self.title, self.refresh_secs))
                body class="shell" {
                    (self.render_sidebar())
                    div class="shell-main" {
                        (self.render_header())
                        main class="content" {
                            (content)
                        }
                    }
                    @if let Some(toast) = &self.toast {
                        (toast)
                    }
                }
            }
        }
    }

    fn render_sidebar(&self) -> Markup {
        html! {
            aside class="sidebar" {
                a class="brand" href="/dashboard" { strong { (BRAND) } }
                nav aria-label="Main" {
                    ul {
                        @for (href, icon, label) in NAV_ITEMS {
                            @let active = self.active_path == href;
                            li {
                                a href=(href)
                                    class=[active.then_some("active")]
                                    aria-current=[active.then_some("page")]
                                {
                                    span class="nav-icon" aria-hidden="true" { (icon) }
                                    " " (label)
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        html! {
            header class="topbar" {
                h1 class="topbar-title" { "Admin Dashboard" }
                div class="topbar-actions" {
                    @if let Some(secs) = self.refresh_secs {
                        span class="refresh-indicator" title="Data refreshes automatically" {
                            "\u{27F3} every " (secs) "s"
                            @if let Some(updated) = &self.updated_at {
                                " \u{00B7} updated " (updated)
                            }
                        }
                    }
                    a class="button button-outline" href="/auth/signup" { "Add Admin" }
                    div class="identity" {
                        span class="identity-name" { (self.user.name) }
                        span class="identity-email" { (self.user.email) }
                    }
                    form class="inline-form" method="post" action="/auth/logout" {
                        button class="button button-danger" type="submit" { "Sign Out" }
                    }
                }
            }
        }
    }
}

/// Centred card used by the login, signup and password-reset pages.
#[derive(Debug, Clone)]
pub struct AuthLayout<'a> {
    title: &'a str,
    toast: Option<Toast<'a>>,
}

impl<'a> AuthLayout<'a> {
    #[must_use]
    pub const fn new(title: &'a str) -> Self {
        Self { title, toast: None }
    }

    #[must_use]
    pub fn with_toast(mut self, toast: Option<Toast<'a>>) -> Self {
        self.toast = toast;
        self
    }

    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                (head(self.title, None))
                body class="auth" {
                    main class="auth-card" {
                        p class="brand" { strong { (BRAND) } }
                        h1 { (self.title) }
                        (content)
                    }
                    @if let Some(toast) = &self.toast {
                        (toast)
                    }
                }
            }
        }
    }
}
