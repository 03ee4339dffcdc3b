//! Sign-in form fields and the filter box shown above each table.

use maud::{html, Markup, Render};

/// A POST form on one of the auth cards.
///
/// Browser validation is switched off so the server's field messages are
/// the only ones shown.
#[derive(Debug)]
pub struct AuthForm<'a> {
    action: &'a str,
    fields: Markup,
}

impl<'a> AuthForm<'a> {
    #[must_use]
    pub fn new(action: &'a str, fields: Markup) -> Self {
        Self { action, fields }
    }
}

impl Render for AuthForm<'_> {
    fn render(&self) -> Markup {
        html! {
            form action=(self.action) method="post" novalidate {
                (self.fields)
            }
        }
    }
}

/// Label, input and validation message for one form value.
///
/// The field name doubles as the element id.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    label: &'a str,
    name: &'a str,
    kind: &'static str,
    value: Option<&'a str>,
    placeholder: Option<&'a str>,
    autocomplete: Option<&'a str>,
    help: Option<&'a str>,
    error: Option<&'a str>,
}

impl<'a> Field<'a> {
    const fn of_kind(kind: &'static str, label: &'a str, name: &'a str) -> Self {
        Self {
            label,
            name,
            kind,
            value: None,
            placeholder: None,
            autocomplete: None,
            help: None,
            error: None,
        }
    }

    #[must_use]
    pub const fn text(label: &'a str, name: &'a str) -> Self {
        Self::of_kind("text", label, name)
    }

    #[must_use]
    pub const fn email(label: &'a str, name: &'a str) -> Self {
        Self::of_kind("email", label, name)
    }

    /// Password values are never echoed back into the page.
    #[must_use]
    pub const fn password(label: &'a str, name: &'a str) -> Self {
        Self::of_kind("password", label, name)
    }

    #[must_use]
    pub const fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub const fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub const fn autocomplete(mut self, token: &'a str) -> Self {
        self.autocomplete = Some(token);
        self
    }

    #[must_use]
    pub const fn help(mut self, help: &'a str) -> Self {
        self.help = Some(help);
        self
    }

    #[must_use]
    pub const fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Render for Field<'_> {
    fn render(&self) -> Markup {
        let invalid = self.error.is_some();
        html! {
            div.form-group.has-error[invalid] {
                label for=(self.name) { (self.label) }
                input
                    type=(self.kind)
                    name=(self.name)
                    id=(self.name)
                    value=[self.value]
                    placeholder=[self.placeholder]
                    autocomplete=[self.autocomplete]
                    aria-invalid=[invalid.then_some("true")]
                    required;
                @if let Some(help) = self.help {
                    small class="form-help" { (help) }
                }
                @if let Some(error) = self.error {
                    small class="field-error" { (error) }
                }
            }
        }
    }
}

/// GET form with a single filter box above a table.
///
/// Sort and tab parameters are carried as hidden fields. The page number
/// is dropped so a new filter starts from the first page.
#[derive(Debug)]
pub struct FilterBox<'a> {
    action: &'a str,
    placeholder: &'a str,
    value: &'a str,
    carried: Vec<(&'static str, String)>,
}

impl<'a> FilterBox<'a> {
    #[must_use]
    pub const fn new(action: &'a str, placeholder: &'a str, value: &'a str) -> Self {
        Self {
            action,
            placeholder,
            value,
            carried: Vec::new(),
        }
    }

    #[must_use]
    pub fn keep(mut self, params: Vec<(&'static str, String)>) -> Self {
        self.carried = params
            .into_iter()
            .filter(|(name, _)| !matches!(*name, "page" | "q"))
            .collect();
        self
    }
}

impl Render for FilterBox<'_> {
    fn render(&self) -> Markup {
        html! {
            form class="filter-box" action=(self.action) method="get" role="search" {
                @for (name, value) in &self.carried {
                    input type="hidden" name=(name) value=(value);
                }
                input
                    type="search"
                    name="q"
                    value=(self.value)
                    placeholder=(self.placeholder)
                    aria-label=(self.placeholder)
                    autocomplete="off";
                button class="button button-outline" type="submit" { "Filter" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_form_skips_browser_validation() {
        let html = AuthForm::new("/auth/login", html! { "x" })
            .render()
            .into_string();
        assert!(html.contains("action=\"/auth/login\" method=\"post\" novalidate"));
    }

    #[test]
    fn test_field_attributes() {
        let html = Field::email("Email", "email")
            .value("a@b.co")
            .error(Some("Please enter a valid email address"))
            .render()
            .into_string();
        assert!(html.contains("form-group has-error"));
        assert!(html.contains("<label for=\"email\">Email</label>"));
        assert!(html.contains("type=\"email\" name=\"email\" id=\"email\" value=\"a@b.co\""));
        assert!(html.contains("aria-invalid=\"true\""));
        assert!(html.contains("<small class=\"field-error\">Please enter a valid email address</small>"));
    }

    #[test]
    fn test_valid_field_has_no_error_markup() {
        let html = Field::password("Password", "password")
            .help("At least 8 characters")
            .render()
            .into_string();
        assert!(html.contains("class=\"form-group\""));
        assert!(!html.contains("field-error"));
        assert!(!html.contains("aria-invalid"));
        assert!(html.contains("At least 8 characters"));
    }

    #[test]
    fn test_filter_box_keeps_sort_not_page() {
        let html = FilterBox::new("/users", "Filter users...", "an")
            .keep(vec![
                ("sort", "username".to_string()),
                ("page", "2".to_string()),
                ("q", "old".to_string()),
            ])
            .render()
            .into_string();
        assert!(html.contains("name=\"sort\" value=\"username\""));
        assert!(!html.contains("name=\"page\""));
        assert!(html.contains("name=\"q\" value=\"an\""));
        assert!(!html.contains("value=\"old\""));
    }
}
