//! Search, pagination, and slug helpers for the subject directory.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the API/repository layer and any future CLI or worker tooling.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of subjects per list page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of subjects per list page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default number of autocomplete suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: i64 = 10;

/// Maximum number of autocomplete suggestions.
pub const MAX_SUGGESTION_LIMIT: i64 = 25;

/// Default number of related subjects.
pub const DEFAULT_RELATED_LIMIT: i64 = 5;

/// Maximum number of related subjects.
pub const MAX_RELATED_LIMIT: i64 = 25;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Columns the list endpoint may sort by. Anything else falls back to
/// the default, so user input never reaches the SQL text.
pub const SORTABLE_COLUMNS: &[&str] = &["name", "code", "credits", "created_at", "updated_at"];

/// Default sort for subject listings.
pub const DEFAULT_SORT: (&str, &str) = ("created_at", "DESC");

/// Resolve user-supplied sort parameters against the whitelist.
///
/// Returns `(column, direction)` safe for interpolation into SQL.
pub fn resolve_sort(sort_by: Option<&str>, sort_order: Option<&str>) -> (&'static str, &'static str) {
    let column = sort_by
        .and_then(|c| SORTABLE_COLUMNS.iter().find(|&&s| s == c))
        .copied()
        .unwrap_or(DEFAULT_SORT.0);
    let direction = match sort_order.map(str::to_ascii_lowercase).as_deref() {
        Some("asc") => "ASC",
        Some("desc") => "DESC",
        _ => {
            if sort_by.is_some() {
                "ASC"
            } else {
                DEFAULT_SORT.1
            }
        }
    };
    (column, direction)
}

// ---------------------------------------------------------------------------
// tsquery builders
// ---------------------------------------------------------------------------

/// Sanitize user input into a list of terms suitable for tsquery construction.
///
/// - Splits on whitespace.
/// - Strips non-alphanumeric characters (except `_`) from each term.
/// - Drops empty terms.
///
/// Returns `None` if the input yields no usable terms.
fn sanitize_terms(query: &str) -> Option<Vec<&str>> {
    let terms: Vec<&str> = query
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '_'))
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

/// Sanitize and convert user input into a PostgreSQL `tsquery` string.
///
/// - Whitespace-separated terms are joined with `&` (AND).
/// - Empty or whitespace-only input returns `None`.
/// - Special characters that could break tsquery parsing are stripped.
pub fn build_tsquery(query: &str) -> Option<String> {
    sanitize_terms(query).map(|terms| terms.join(" & "))
}

/// Build a prefix tsquery for autocomplete / search-as-you-type.
///
/// Appends `:*` to the last term for prefix matching.
pub fn build_prefix_tsquery(query: &str) -> Option<String> {
    let terms = sanitize_terms(query)?;

    if terms.len() == 1 {
        return Some(format!("{}:*", terms[0]));
    }

    // All terms except last are exact, last term gets prefix match.
    let exact = &terms[..terms.len() - 1];
    let prefix = terms[terms.len() - 1];
    Some(format!("{} & {}:*", exact.join(" & "), prefix))
}

// ---------------------------------------------------------------------------
// Limit / page clamps
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided 1-based page number.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

// ---------------------------------------------------------------------------
// Pagination envelope
// ---------------------------------------------------------------------------

/// Pagination metadata returned alongside subject listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Build metadata for a page of a `total`-row result set.
    pub fn for_page(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// The SQL OFFSET for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Derive a URL-safe slug from a subject name.
///
/// Lowercases, keeps alphanumeric runs, and joins them with `-`.
/// Returns `None` when the name contains no usable characters.
pub fn slugify(name: &str) -> Option<String> {
    let slug: Vec<String> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect();

    if slug.is_empty() {
        None
    } else {
        Some(slug.join("-"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
