//! Privilege loading across instances.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info};

use crate::catalog::{decode, CatalogQuery};
use crate::error::AuthorityResult;
use crate::model::{Grantee, Privileges};
use crate::planner::InstancePlan;

/// Grantee to privileges, as produced by one load pass.
pub type PrivilegeMap = HashMap<Grantee, Privileges>;

/// Runs the catalog queries of a plan and merges the results.
///
/// Merging is a union: a privilege seen on any instance or in any row is
/// granted. Rows for grantees outside the plan's predicate are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrivilegeLoader;

impl PrivilegeLoader {
    /// Create a loader.
    pub fn new() -> Self {
        Self
    }

    /// Execute the plan.
    ///
    /// With no instance to query, every requested grantee maps to an empty
    /// aggregate. Any query or decode failure aborts the whole pass.
    pub fn load(&self, plan: &InstancePlan) -> AuthorityResult<PrivilegeMap> {
        let predicate = plan.predicate();
        let mut result = PrivilegeMap::new();

        if plan.data_sources().is_empty() {
            for grantee in predicate.grantees() {
                result.insert(grantee.clone(), Privileges::new());
            }
            return Ok(result);
        }

        if predicate.is_empty() {
            debug!("no users configured, skipping catalog queries");
            return Ok(result);
        }

        let rendered = predicate.render();
        for source in plan.data_sources() {
            let started = Instant::now();
            let mut rows = 0usize;

            for query in CatalogQuery::ALL {
                let sql = query.render(&rendered);
                let result_set = source.execute_query(&sql)?;
                for decoded in decode(query, &result_set)? {
                    rows += 1;
                    if !predicate.contains(&decoded.grantee) {
                        debug!(
                            instance = source.instance_id(),
                            catalog = %query,
                            grantee = %decoded.grantee,
                            "discarding row for unconfigured grantee"
                        );
                        continue;
                    }
                    result
                        .entry(decoded.grantee)
                        .or_default()
                        .merge(decoded.privileges);
                }
            }

            debug!(
                instance = source.instance_id(),
                rows,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "instance privileges loaded"
            );
        }

        info!(
            instances = plan.data_sources().len(),
            grantees = result.len(),
            "privilege load complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GLOBAL_PRIVILEGE_COLUMNS;
    use crate::model::{AuthorityUser, PrivilegeType};
    use crate::source::{DataSource, DatabaseMetaData, ResultSet, StaticDataSource, Value};
    use std::sync::Arc;

    fn users() -> Vec<AuthorityUser> {
        vec![AuthorityUser::from_parts("root", "", "localhost").unwrap()]
    }

    fn root() -> Grantee {
        Grantee::new("root", "localhost").unwrap()
    }

    fn global(user: &str, granted: &[PrivilegeType]) -> ResultSet {
        let mut columns = vec!["user", "host"];
        columns.extend(GLOBAL_PRIVILEGE_COLUMNS.iter().map(|(c, _)| *c));
        let mut row: Vec<Value> = vec![user.into(), "localhost".into()];
        for (_, p) in GLOBAL_PRIVILEGE_COLUMNS {
            row.push(Value::Bool(granted.contains(p)));
        }
        ResultSet::new(columns).with_row(row)
    }

    fn plan_for(sources: Vec<Arc<StaticDataSource>>) -> InstancePlan {
        let sources: Vec<Arc<dyn DataSource>> = sources
            .into_iter()
            .map(|s| s as Arc<dyn DataSource>)
            .collect();
        let mut databases = HashMap::new();
        databases.insert("db0".to_string(), DatabaseMetaData::new("db0", sources));
        InstancePlan::build(&databases, &users())
    }

    #[test]
    fn test_union_across_instances() {
        let a = Arc::new(
            StaticDataSource::new("a:3306")
                .with_table("mysql.user", global("root", &[PrivilegeType::Select])),
        );
        let b = Arc::new(
            StaticDataSource::new("b:3306")
                .with_table("mysql.user", global("root", &[PrivilegeType::Insert])),
        );

        let map = PrivilegeLoader::new().load(&plan_for(vec![a, b])).unwrap();
        let p = &map[&root()];
        assert!(p.has_privileges(&[PrivilegeType::Select, PrivilegeType::Insert]));
    }

    #[test]
    fn test_issues_three_scoped_queries_per_instance() {
        let a = Arc::new(StaticDataSource::new("a:3306"));
        PrivilegeLoader::new().load(&plan_for(vec![a.clone()])).unwrap();

        let executed = a.executed();
        assert_eq!(executed.len(), 3);
        for sql in &executed {
            assert!(sql.ends_with("WHERE (user, host) IN (('root', 'localhost'))"));
        }
        assert!(executed[0].contains("mysql.user"));
        assert!(executed[1].contains("mysql.db"));
        assert!(executed[2].contains("mysql.tables_priv"));
    }

    #[test]
    fn test_unconfigured_grantees_discarded() {
        let a = Arc::new(
            StaticDataSource::new("a:3306")
                .with_table("mysql.user", global("mysql.sys", &[PrivilegeType::Super])),
        );
        let map = PrivilegeLoader::new().load(&plan_for(vec![a])).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_no_instances_yields_empty_aggregates() {
        let map = PrivilegeLoader::new().load(&plan_for(vec![])).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map[&root()].is_empty());
    }

    #[test]
    fn test_no_users_issues_no_query() {
        let a = Arc::new(StaticDataSource::new("a:3306"));
        let mut databases = HashMap::new();
        databases.insert(
            "db0".to_string(),
            DatabaseMetaData::new("db0", vec![a.clone() as Arc<dyn DataSource>]),
        );
        let plan = InstancePlan::build(&databases, &[]);

        let map = PrivilegeLoader::new().load(&plan).unwrap();
        assert!(map.is_empty());
        assert!(a.executed().is_empty());
    }

    #[test]
    fn test_failure_aborts_pass() {
        let a = Arc::new(
            StaticDataSource::new("a:3306")
                .with_table("mysql.user", global("root", &[PrivilegeType::Select])),
        );
        let b = Arc::new(StaticDataSource::new("b:3306"));
        b.set_failing(true);

        assert!(PrivilegeLoader::new().load(&plan_for(vec![a, b])).is_err());
    }
}
