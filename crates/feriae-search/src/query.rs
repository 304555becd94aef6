//! Query normalization.
//!
//! Turns untrusted query parameters (`q`, `sort`, `fields`) into a
//! [`NormalizedQuery`] that is always valid against a [`FieldCatalog`].
//! Normalization is total: malformed input degrades to defaults and never
//! produces an error.
//!
//! | Parameter | Meaning | Fallback |
//! |-----------|---------|----------|
//! | `q` | free-text term, passed through as-is | `""` |
//! | `sort` | catalog field, `-` prefix for descending | primary key, ascending |
//! | `fields` | repeatable projection list | `*` (all fields) |
//!
//! The projection policy is subset-or-reject: one unknown field makes the
//! whole list fall back to the wildcard.

use std::collections::BTreeMap;
use std::fmt;

use feriae_core::FieldCatalog;

/// Free-text term parameter.
pub const PARAM_TERM: &str = "q";
/// Sort parameter.
pub const PARAM_SORT: &str = "sort";
/// Projection parameter (repeatable).
pub const PARAM_FIELDS: &str = "fields";
/// Projection wildcard meaning "all fields".
pub const WILDCARD: &str = "*";

/// Query parameters as received at the boundary.
///
/// Each name maps to every value supplied for it, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQueryParams {
    params: BTreeMap<String, Vec<String>>,
}

impl RawQueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.entry(name.into()).or_default().push(value.into());
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Last value supplied for `name`.
    pub fn last(&self, name: &str) -> Option<&str> {
        self.params.get(name)?.last().map(String::as_str)
    }

    /// Every value supplied for `name`.
    pub fn all(&self, name: &str) -> &[String] {
        self.params.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawQueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Backend spelling: `asc` or `desc`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A validated sort specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Catalog field to sort on.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// The fallback sort: primary key, ascending.
    pub fn default_for(catalog: &FieldCatalog) -> Self {
        Self {
            field: catalog.primary_key().to_string(),
            direction: SortDirection::Ascending,
        }
    }

    /// Parse a raw `sort` value against `catalog`.
    ///
    /// A single leading `-` selects descending order. Anything that does not
    /// name a catalog field after stripping it yields [`default_for`](Self::default_for).
    pub fn parse(raw: Option<&str>, catalog: &FieldCatalog) -> Self {
        let raw = raw.unwrap_or_default();
        let (field, direction) = match raw.strip_prefix('-') {
            Some(bare) => (bare, SortDirection::Descending),
            None => (raw, SortDirection::Ascending),
        };

        if catalog.contains(field) {
            Self {
                field: field.to_string(),
                direction,
            }
        } else {
            Self::default_for(catalog)
        }
    }

    /// Raw parameter form, the inverse of [`parse`](Self::parse).
    pub fn to_param(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.field.clone(),
            SortDirection::Descending => format!("-{}", self.field),
        }
    }
}

impl fmt::Display for SortSpec {
    /// Backend form: `<field>:<asc|desc>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

/// Fields requested back from the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Projection {
    /// All fields.
    #[default]
    Wildcard,
    /// A non-empty, duplicate-free subset of the catalog.
    Fields(Vec<String>),
}

impl Projection {
    /// Resolve raw `fields` values against `catalog`.
    ///
    /// Values are deduplicated keeping first occurrence. The result is
    /// [`Projection::Fields`] only when that list is non-empty and every
    /// member is in the catalog.
    pub fn resolve(values: &[String], catalog: &FieldCatalog) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.contains(value) {
                unique.push(value.clone());
            }
        }

        if !unique.is_empty() && unique.iter().all(|f| catalog.contains(f)) {
            Self::Fields(unique)
        } else {
            Self::Wildcard
        }
    }

    /// Backend attribute list: `["*"]` or the explicit fields.
    pub fn attributes(&self) -> Vec<String> {
        match self {
            Self::Wildcard => vec![WILDCARD.to_string()],
            Self::Fields(fields) => fields.clone(),
        }
    }

    /// Whether this is the wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// Free-text term, possibly empty.
    pub term: String,
    /// Sort specification; its field is always a catalog member.
    pub sort: SortSpec,
    /// Projection.
    pub projection: Projection,
}

impl NormalizedQuery {
    /// Render back into raw parameters.
    ///
    /// Normalizing the result yields `self` again.
    pub fn to_raw(&self) -> RawQueryParams {
        let mut raw = RawQueryParams::new()
            .with(PARAM_TERM, self.term.clone())
            .with(PARAM_SORT, self.sort.to_param());
        if let Projection::Fields(fields) = &self.projection {
            for field in fields {
                raw.push(PARAM_FIELDS, field.clone());
            }
        }
        raw
    }
}

/// Normalize raw query parameters against `catalog`.
pub fn normalize(params: &RawQueryParams, catalog: &FieldCatalog) -> NormalizedQuery {
    NormalizedQuery {
        term: params.last(PARAM_TERM).unwrap_or_default().to_string(),
        sort: SortSpec::parse(params.last(PARAM_SORT), catalog),
        projection: Projection::resolve(params.all(PARAM_FIELDS), catalog),
    }
}

// ============================================================================
// Tests
// ============================================================================
