//! Filter, sort and paginate an in-memory row collection.
//!
//! Listing pages keep the whole collection in memory and derive the visible
//! page from a [`TableQuery`] parsed out of the page URL.

use std::cmp::Ordering;

/// Sort direction of the active sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Filter text, sort key and page cursor for one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub filter: String,
    pub sort: Option<SortState>,
    /// Zero-based page index.
    pub page: usize,
}

impl TableQuery {
    /// Build a query from raw URL parameters. A `dir` without a `sort`
    /// column is ignored; a `sort` without a valid `dir` sorts ascending.
    #[must_use]
    pub fn from_params(
        filter: Option<&str>,
        sort: Option<&str>,
        dir: Option<&str>,
        page: Option<usize>,
    ) -> Self {
        let sort = sort.filter(|s| !s.is_empty()).map(|column| SortState {
            column: column.to_string(),
            direction: dir
                .and_then(SortDirection::parse)
                .unwrap_or(SortDirection::Ascending),
        });
        Self {
            filter: filter.unwrap_or_default().to_string(),
            sort,
            page: page.unwrap_or(0),
        }
    }

    /// Sort state after clicking the header of `column`.
    ///
    /// Unsorted or sorted by another column goes to ascending; ascending
    /// goes to descending; descending goes back to ascending.
    #[must_use]
    pub fn toggled_sort(&self, column: &str) -> SortState {
        let direction = match &self.sort {
            Some(current) if current.column == column => match current.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            },
            _ => SortDirection::Ascending,
        };
        SortState {
            column: column.to_string(),
            direction,
        }
    }

    /// Direction of `column` if it is the active sort key.
    #[must_use]
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.sort
            .as_ref()
            .filter(|s| s.column == column)
            .map(|s| s.direction)
    }

    /// Query parameters reproducing this query. The page is omitted when it
    /// is the first one.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.filter.is_empty() {
            params.push(("q", self.filter.clone()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.column.clone()));
            params.push(("dir", sort.direction.as_str().to_string()));
        }
        if self.page > 0 {
            params.push(("page", self.page.to_string()));
        }
        params
    }

    /// Same query with a new sort, back on the first page.
    #[must_use]
    pub fn with_sort(&self, sort: SortState) -> Self {
        Self {
            filter: self.filter.clone(),
            sort: Some(sort),
            page: 0,
        }
    }
}

/// Comparator for a sortable column.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Predicate matching a row against the filter text.
pub type FilterFn<T> = fn(&T, &str) -> bool;

#[derive(Clone, Copy)]
pub struct SortColumn<T> {
    pub key: &'static str,
    pub compare: Comparator<T>,
}

/// The per-page parameters of the table pipeline.
pub struct TableSpec<T> {
    pub filter: FilterFn<T>,
    pub sort_columns: Vec<SortColumn<T>>,
    pub page_size: usize,
}

impl<T> TableSpec<T> {
    #[must_use]
    pub fn new(filter: FilterFn<T>, page_size: usize) -> Self {
        Self {
            filter,
            sort_columns: Vec::new(),
            page_size,
        }
    }

    #[must_use]
    pub fn sortable(mut self, key: &'static str, compare: Comparator<T>) -> Self {
        self.sort_columns.push(SortColumn { key, compare });
        self
    }

    /// Filter, sort and slice `rows` according to `query`.
    ///
    /// Sorting is stable in both directions. An unknown sort key leaves the
    /// order untouched, and a page past the end clamps to the last page.
    #[must_use]
    pub fn apply(&self, mut rows: Vec<T>, query: &TableQuery) -> TablePage<T> {
        if !query.filter.is_empty() {
            rows.retain(|row| (self.filter)(row, &query.filter));
        }

        if let Some(sort) = &query.sort {
            if let Some(column) = self.sort_columns.iter().find(|c| c.key == sort.column) {
                let compare = column.compare;
                match sort.direction {
                    SortDirection::Ascending => rows.sort_by(compare),
                    SortDirection::Descending => rows.sort_by(|a, b| compare(b, a)),
                }
            }
        }

        let page_size = self.page_size.max(1);
        let total_rows = rows.len();
        let total_pages = total_rows.div_ceil(page_size).max(1);
        let page = query.page.min(total_pages - 1);

        let rows = rows
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .collect();

        TablePage {
            rows,
            page,
            total_pages,
            total_rows,
        }
    }
}

/// One page of filtered and sorted rows.
#[derive(Debug, Clone)]
pub struct TablePage<T> {
    pub rows: Vec<T>,
    /// Zero-based index of this page after clamping.
    pub page: usize,
    pub total_pages: usize,
    /// Rows matching the filter, across all pages.
    pub total_rows: usize,
}

impl<T> TablePage<T> {
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Case-sensitive substring match; an empty needle matches everything.
#[must_use]
pub fn contains_text(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.contains(needle)
}

/// Case-insensitive lexicographic comparison.
#[must_use]
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        id: u32,
    }

    fn spec(page_size: usize) -> TableSpec<Row> {
        TableSpec::new(|row: &Row, q: &str| contains_text(row.name, q), page_size)
            .sortable("name", |a: &Row, b: &Row| compare_text(a.name, b.name))
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "carol", id: 1 },
            Row { name: "Alice", id: 2 },
            Row { name: "bob", id: 3 },
            Row { name: "alice", id: 4 },
        ]
    }

    fn names(page: &TablePage<Row>) -> Vec<u32> {
        page.rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_sort_toggle_cycle() {
        let query = TableQuery::default();
        let first = query.toggled_sort("name");
        assert_eq!(first.direction, SortDirection::Ascending);

        let query = query.with_sort(first);
        let second = query.toggled_sort("name");
        assert_eq!(second.direction, SortDirection::Descending);

        let query = query.with_sort(second);
        assert_eq!(query.toggled_sort("name").direction, SortDirection::Ascending);
        assert_eq!(query.toggled_sort("other").direction, SortDirection::Ascending);
    }

    #[test]
    fn test_case_insensitive_stable_sort() {
        let query = TableQuery::from_params(None, Some("name"), Some("asc"), None);
        let page = spec(10).apply(rows(), &query);
        assert_eq!(names(&page), vec![2, 4, 3, 1]);

        let query = TableQuery::from_params(None, Some("name"), Some("desc"), None);
        let page = spec(10).apply(rows(), &query);
        assert_eq!(names(&page), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let query = TableQuery::from_params(Some("ali"), None, None, None);
        let page = spec(10).apply(rows(), &query);
        assert_eq!(names(&page), vec![4]);
        assert_eq!(page.total_rows, 1);
    }

    #[test]
    fn test_unknown_sort_key_keeps_order() {
        let query = TableQuery::from_params(None, Some("email"), Some("desc"), None);
        let page = spec(10).apply(rows(), &query);
        assert_eq!(names(&page), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_pagination_and_clamping() {
        let query = TableQuery::from_params(None, None, None, Some(0));
        let page = spec(3).apply(rows(), &query);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.rows.len(), 3);

        let query = TableQuery::from_params(None, None, None, Some(9));
        let page = spec(3).apply(rows(), &query);
        assert_eq!(page.page, 1);
        assert_eq!(names(&page), vec![4]);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let page = spec(10).apply(Vec::new(), &TableQuery::default());
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_params_round_trip_fields() {
        let query = TableQuery::from_params(Some("x"), Some("name"), Some("desc"), Some(2));
        assert_eq!(
            query.to_params(),
            vec![
                ("q", "x".to_string()),
                ("sort", "name".to_string()),
                ("dir", "desc".to_string()),
                ("page", "2".to_string()),
            ]
        );
        assert!(TableQuery::default().to_params().is_empty());
    }
}
