//! Query execution and metadata collaborators.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;

use super::result_set::ResultSet;
use crate::error::{AuthorityError, AuthorityResult};

/// A physical database instance that can run catalog queries.
pub trait DataSource: Send + Sync {
    /// Identifier of the physical instance (e.g. `host:port`).
    ///
    /// Two handles with the same identifier point at the same catalogs.
    fn instance_id(&self) -> &str;

    /// Execute a read-only query and return its full result.
    fn execute_query(&self, sql: &str) -> AuthorityResult<ResultSet>;
}

/// Metadata of one logical database: the physical data sources behind it.
#[derive(Clone)]
pub struct DatabaseMetaData {
    name: String,
    data_sources: Vec<Arc<dyn DataSource>>,
}

impl DatabaseMetaData {
    /// Create metadata for a logical database.
    pub fn new(name: impl Into<String>, data_sources: Vec<Arc<dyn DataSource>>) -> Self {
        Self {
            name: name.into(),
            data_sources,
        }
    }

    /// Logical database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every physical data source backing this database.
    pub fn data_sources(&self) -> &[Arc<dyn DataSource>] {
        &self.data_sources
    }
}

impl fmt::Debug for DatabaseMetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instances: Vec<&str> = self.data_sources.iter().map(|d| d.instance_id()).collect();
        f.debug_struct("DatabaseMetaData")
            .field("name", &self.name)
            .field("instances", &instances)
            .finish()
    }
}

/// In-memory data source serving fixed catalog tables.
///
/// Queries are answered by the table named after `FROM`; the `WHERE` clause
/// is not evaluated. Unknown tables yield an empty result. Every executed
/// statement is recorded.
#[derive(Debug, Default, Deserialize)]
pub struct StaticDataSource {
    instance: String,
    #[serde(default)]
    tables: HashMap<String, ResultSet>,
    #[serde(skip)]
    failing: AtomicBool,
    #[serde(skip)]
    executed: Mutex<Vec<String>>,
}

impl StaticDataSource {
    /// Create an empty data source for an instance.
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            ..Self::default()
        }
    }

    /// Serve `result` for queries against `table`.
    pub fn with_table(mut self, table: impl Into<String>, result: ResultSet) -> Self {
        self.tables.insert(table.into(), result);
        self
    }

    /// Make every subsequent query fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Statements executed so far, oldest first.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }

    fn target_table(sql: &str) -> Option<&str> {
        let upper = sql.to_ascii_uppercase();
        let start = upper.find(" FROM ")? + " FROM ".len();
        sql[start..].split_whitespace().next()
    }
}

impl DataSource for StaticDataSource {
    fn instance_id(&self) -> &str {
        &self.instance
    }

    fn execute_query(&self, sql: &str) -> AuthorityResult<ResultSet> {
        self.executed.lock().push(sql.to_string());

        if self.failing.load(Ordering::SeqCst) {
            return Err(AuthorityError::data_access(
                &self.instance,
                "instance unavailable",
            ));
        }

        let table = Self::target_table(sql).ok_or_else(|| {
            AuthorityError::data_access(&self.instance, format!("no FROM clause in: {}", sql))
        })?;

        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }
}
