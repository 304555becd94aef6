//! Field catalog: the ordered set of queryable and sortable field names.

use std::sync::LazyLock;

use crate::holiday::PublicHoliday;

static HOLIDAY_CATALOG: LazyLock<FieldCatalog> =
    LazyLock::new(|| FieldCatalog::new(PublicHoliday::FIELDS.iter().copied()));

/// Ordered, immutable list of field names.
///
/// The first field is the primary key and is used as the default sort field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    fields: Vec<String>,
}

impl FieldCatalog {
    /// Build a catalog from field names in declaration order.
    ///
    /// Repeated names keep their first position. An empty input yields a
    /// catalog whose primary key is `"id"`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !out.contains(&field) {
                out.push(field);
            }
        }
        if out.is_empty() {
            out.push("id".to_string());
        }
        Self { fields: out }
    }

    /// The catalog for [`PublicHoliday`] records, built once per process.
    pub fn holidays() -> &'static FieldCatalog {
        &HOLIDAY_CATALOG
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Name of the primary key field.
    pub fn primary_key(&self) -> &str {
        &self.fields[0]
    }

    /// Whether `name` is a catalog member.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false; a catalog has at least its primary key.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
