//! Listing tables, their sortable headers and the label/value table used
//! inside detail dialogs.

use maud::{html, Markup, Render};

use super::pagination::with_query;
use crate::table::{SortDirection, TableQuery};

/// One page of a listing. An empty page keeps its header and shows a
/// single full-width row with `when_empty`'s message.
#[derive(Debug)]
pub struct Table<'a> {
    headers: Vec<Markup>,
    rows: Vec<Markup>,
    when_empty: &'a str,
}

impl<'a> Table<'a> {
    #[must_use]
    pub fn new(headers: Vec<Markup>, rows: Vec<Markup>) -> Self {
        Self {
            headers,
            rows,
            when_empty: "No results.",
        }
    }

    #[must_use]
    pub fn when_empty(mut self, message: &'a str) -> Self {
        self.when_empty = message;
        self
    }
}

impl Render for Table<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="table-wrapper" {
                table class="data-table" {
                    thead {
                        tr {
                            @for header in &self.headers { th { (header) } }
                        }
                    }
                    tbody {
                        @for row in &self.rows { (row) }
                        @if self.rows.is_empty() {
                            tr class="empty-row" {
                                td colspan=(self.headers.len().max(1)) { (self.when_empty) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct TableRow {
    cells: Vec<Markup>,
}

impl TableRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(self, value: &str) -> Self {
        self.markup(html! { (value) })
    }

    #[must_use]
    pub fn markup(mut self, value: Markup) -> Self {
        self.cells.push(value);
        self
    }
}

impl Render for TableRow {
    fn render(&self) -> Markup {
        html! {
            tr {
                @for cell in &self.cells { td { (cell) } }
            }
        }
    }
}

/// Column header linking to the same listing sorted by its column.
///
/// Clicking the active column flips the direction; any other column starts
/// ascending. The link always lands on the first page.
#[derive(Debug)]
pub struct SortHeader<'a> {
    label: &'a str,
    column: &'a str,
    query: &'a TableQuery,
    base_url: &'a str,
    page_params: Vec<(&'static str, String)>,
}

impl<'a> SortHeader<'a> {
    #[must_use]
    pub const fn new(
        label: &'a str,
        column: &'a str,
        query: &'a TableQuery,
        base_url: &'a str,
    ) -> Self {
        Self {
            label,
            column,
            query,
            base_url,
            page_params: Vec::new(),
        }
    }

    /// Carry a page-level parameter, such as the posts tab, into the link.
    #[must_use]
    pub fn keep(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.page_params.push((name, value.into()));
        self
    }

    fn href(&self) -> String {
        let sorted = self.query.with_sort(self.query.toggled_sort(self.column));
        let params: Vec<_> = self
            .page_params
            .iter()
            .cloned()
            .chain(sorted.to_params())
            .collect();
        with_query(self.base_url, &params)
    }
}

impl Render for SortHeader<'_> {
    fn render(&self) -> Markup {
        let (arrow, aria_sort) = match self.query.direction_of(self.column) {
            Some(SortDirection::Ascending) => ("\u{2191}", "ascending"),
            Some(SortDirection::Descending) => ("\u{2193}", "descending"),
            None => ("\u{2195}", "none"),
        };
        html! {
            a class="sort-link" href=(self.href()) aria-sort=(aria_sort) {
                (self.label) " " span class="sort-indicator" { (arrow) }
            }
        }
    }
}

/// Label/value pairs for a details dialog.
#[derive(Debug, Default)]
pub struct KeyValueTable<'a> {
    pairs: Vec<(&'a str, Markup)>,
}

impl<'a> KeyValueTable<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn item(self, label: &'a str, value: &str) -> Self {
        self.item_markup(label, html! { (value) })
    }

    #[must_use]
    pub fn item_markup(mut self, label: &'a str, value: Markup) -> Self {
        self.pairs.push((label, value));
        self
    }
}

impl Render for KeyValueTable<'_> {
    fn render(&self) -> Markup {
        html! {
            table class="kv-table" {
                tbody {
                    @for (label, value) in &self.pairs {
                        tr {
                            th scope="row" { (label) }
                            td { (value) }
                        }
                    }
                }
            }
        }
    }
}
