//! Catalog query shapes.

use std::fmt;

/// The three privilege catalogs consulted on every instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    /// Instance-wide privileges, one row per grantee.
    Global,
    /// Per-schema privileges, one row per grantee and schema.
    Schema,
    /// Per-table privileges, one row per grantee and table.
    Table,
}

impl CatalogQuery {
    /// All catalogs, in load order.
    pub const ALL: [CatalogQuery; 3] = [CatalogQuery::Global, CatalogQuery::Schema, CatalogQuery::Table];

    /// Fully qualified catalog table.
    pub fn table_name(&self) -> &'static str {
        match self {
            CatalogQuery::Global => "mysql.user",
            CatalogQuery::Schema => "mysql.db",
            CatalogQuery::Table => "mysql.tables_priv",
        }
    }

    fn projection(&self) -> &'static str {
        match self {
            CatalogQuery::Global | CatalogQuery::Schema => "*",
            CatalogQuery::Table => "User, Host, Db, Table_name, Table_priv",
        }
    }

    /// Render the query restricted to the given `(user, host)` tuples.
    ///
    /// `predicate` must be non-empty; an empty `IN ()` list is not valid SQL.
    pub fn render(&self, predicate: &str) -> String {
        debug_assert!(!predicate.is_empty());
        format!(
            "SELECT {} FROM {} WHERE (user, host) IN ({})",
            self.projection(),
            self.table_name(),
            predicate
        )
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
