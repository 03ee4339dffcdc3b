//! Link tabs, used for the post status filter.

use maud::{html, Markup, Render};

#[derive(Debug, Clone)]
struct Tab {
    label: &'static str,
    href: String,
    current: bool,
}

/// A row of link tabs. Exactly one is expected to be current; it is
/// marked with `aria-current="page"`.
#[derive(Debug, Clone)]
pub struct TabGroup<'a> {
    aria_label: &'a str,
    tabs: Vec<Tab>,
}

impl<'a> TabGroup<'a> {
    #[must_use]
    pub const fn new(aria_label: &'a str) -> Self {
        Self {
            aria_label,
            tabs: Vec::new(),
        }
    }

    #[must_use]
    pub fn tab(mut self, label: &'static str, href: String, current: bool) -> Self {
        self.tabs.push(Tab {
            label,
            href,
            current,
        });
        self
    }
}

impl Render for TabGroup<'_> {
    fn render(&self) -> Markup {
        html! {
            nav class="tabs" aria-label=(self.aria_label) {
                @for tab in &self.tabs {
                    a.tab.active[tab.current]
                        href=(tab.href)
                        aria-current=[tab.current.then_some("page")]
                    { (tab.label) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_tab_marked() {
        let html = TabGroup::new("Post status")
            .tab("Pending", "/posts?tab=pending".to_string(), true)
            .tab("All Posts", "/posts?tab=all".to_string(), false)
            .render()
            .into_string();

        assert!(html.contains("aria-label=\"Post status\""));
        assert!(html.contains(
            "class=\"tab active\" href=\"/posts?tab=pending\" aria-current=\"page\""
        ));
        assert!(html.contains("class=\"tab\" href=\"/posts?tab=all\">All Posts</a>"));
    }
}
