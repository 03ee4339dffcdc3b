//! Modal rendering of an open [`Dialog`](crate::dialog::Dialog).

use maud::{html, Markup, Render};

/// A modal over the page. Closing is a plain link back to the page
/// without the `view` parameter.
#[derive(Debug)]
pub struct Modal<'a> {
    pub title: &'a str,
    pub close_href: String,
    pub content: Markup,
}

impl<'a> Modal<'a> {
    #[must_use]
    pub fn new(title: &'a str, close_href: impl Into<String>, content: Markup) -> Self {
        Self {
            title,
            close_href: close_href.into(),
            content,
        }
    }
}

impl Render for Modal<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="modal-backdrop" {
                div class="modal" role="dialog" aria-modal="true" aria-labelledby="modal-title" {
                    header class="modal-header" {
                        h2 id="modal-title" { (self.title) }
                        a class="modal-close" href=(self.close_href) aria-label="Close" { "\u{00D7}" }
                    }
                    div class="modal-body" {
                        (self.content)
                    }
                    footer class="modal-footer" {
                        a class="button button-outline" href=(self.close_href) { "Close" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal() {
        let html = Modal::new("User Details", "/users?page=1", html! { p { "bio" } })
            .render()
            .into_string();
        assert!(html.contains("role=\"dialog\""));
        assert!(html.contains("<h2 id=\"modal-title\">User Details</h2>"));
        assert!(html.contains("href=\"/users?page=1\" aria-label=\"Close\""));
        assert!(html.contains("<a class=\"button button-outline\" href=\"/users?page=1\">Close</a>"));
    }
}
