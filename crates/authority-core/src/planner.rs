//! Instance query planning.
//!
//! Works out which physical instances a load pass has to visit and which
//! `(user, host)` pairs the catalog queries are restricted to.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::model::{AuthorityUser, Grantee};
use crate::source::{DataSource, DatabaseMetaData};

/// The `(user, host)` pairs a load pass asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopingPredicate {
    grantees: Vec<Grantee>,
}

impl ScopingPredicate {
    /// Build from the configured users, dropping duplicates.
    pub fn from_users(users: &[AuthorityUser]) -> Self {
        let mut seen = HashSet::new();
        let grantees = users
            .iter()
            .map(|u| u.grantee().clone())
            .filter(|g| seen.insert(g.clone()))
            .collect();
        Self { grantees }
    }

    /// Requested grantees, in configuration order.
    pub fn grantees(&self) -> &[Grantee] {
        &self.grantees
    }

    /// Whether `grantee` was requested.
    pub fn contains(&self, grantee: &Grantee) -> bool {
        self.grantees.contains(grantee)
    }

    /// True if no user is requested.
    pub fn is_empty(&self) -> bool {
        self.grantees.is_empty()
    }

    /// Render as `('user', 'host'), ('user2', 'host2')`.
    pub fn render(&self) -> String {
        self.grantees
            .iter()
            .map(|g| {
                format!(
                    "('{}', '{}')",
                    escape_literal(g.username()),
                    escape_literal(g.hostname())
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn escape_literal(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "''")
}

/// What a load pass has to query.
#[derive(Clone)]
pub struct InstancePlan {
    data_sources: Vec<Arc<dyn DataSource>>,
    predicate: ScopingPredicate,
}

impl InstancePlan {
    /// Plan a load over every data source of every logical database.
    ///
    /// Databases are visited in name order. A physical instance reachable
    /// through several handles is queried once, through the first handle
    /// seen.
    pub fn build(databases: &HashMap<String, DatabaseMetaData>, users: &[AuthorityUser]) -> Self {
        let mut names: Vec<&String> = databases.keys().collect();
        names.sort();

        let mut seen = HashSet::new();
        let mut data_sources = Vec::new();
        for name in names {
            for source in databases[name].data_sources() {
                if seen.insert(source.instance_id().to_string()) {
                    data_sources.push(Arc::clone(source));
                } else {
                    tracing::debug!(
                        database = %name,
                        instance = source.instance_id(),
                        "instance already planned"
                    );
                }
            }
        }

        Self {
            data_sources,
            predicate: ScopingPredicate::from_users(users),
        }
    }

    /// Data sources to query, one per physical instance.
    pub fn data_sources(&self) -> &[Arc<dyn DataSource>] {
        &self.data_sources
    }

    /// Grantees the queries are restricted to.
    pub fn predicate(&self) -> &ScopingPredicate {
        &self.predicate
    }

    /// Instance identifiers in query order.
    pub fn instance_ids(&self) -> Vec<&str> {
        self.data_sources.iter().map(|d| d.instance_id()).collect()
    }
}
