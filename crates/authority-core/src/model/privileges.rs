//! Per-grantee privilege aggregate.

use std::collections::{BTreeMap, BTreeSet};

use super::privilege_type::PrivilegeType;

/// Set of privilege types held at one scope.
pub type PrivilegeSet = BTreeSet<PrivilegeType>;

/// Privileges held by one grantee at global, schema and table scope.
///
/// Built by the loader through the `add_*` methods, then published read-only
/// in a cache snapshot. A privilege held at a broader scope is not repeated
/// at narrower ones; the scoped checks consult every enclosing scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Privileges {
    global: PrivilegeSet,
    schema: BTreeMap<String, PrivilegeSet>,
    table: BTreeMap<(String, String), PrivilegeSet>,
}

impl Privileges {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate holding every privilege type globally.
    pub fn all_permitted() -> Self {
        Self {
            global: PrivilegeType::all().iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Grant a privilege instance-wide.
    pub fn add_global(&mut self, privilege: PrivilegeType) {
        self.global.insert(privilege);
    }

    /// Grant a privilege on every object of a schema.
    pub fn add_schema(&mut self, schema: impl Into<String>, privilege: PrivilegeType) {
        self.schema
            .entry(schema.into())
            .or_default()
            .insert(privilege);
    }

    /// Grant a privilege on one table.
    pub fn add_table(
        &mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
        privilege: PrivilegeType,
    ) {
        self.table
            .entry((schema.into(), table.into()))
            .or_default()
            .insert(privilege);
    }

    /// Union another aggregate into this one.
    ///
    /// Nothing already granted is ever removed.
    pub fn merge(&mut self, other: Privileges) {
        self.global.extend(other.global);
        for (schema, set) in other.schema {
            self.schema.entry(schema).or_default().extend(set);
        }
        for (key, set) in other.table {
            self.table.entry(key).or_default().extend(set);
        }
    }

    /// True iff every required privilege is held globally.
    pub fn has_privileges(&self, required: &[PrivilegeType]) -> bool {
        required.iter().all(|p| self.global.contains(p))
    }

    /// True iff every required privilege is held globally or on `schema`.
    pub fn has_schema_privileges(&self, schema: &str, required: &[PrivilegeType]) -> bool {
        let scoped = self.schema.get(schema);
        required
            .iter()
            .all(|p| self.global.contains(p) || scoped.is_some_and(|s| s.contains(p)))
    }

    /// True iff every required privilege is held globally, on `schema`, or
    /// on `schema`.`table`.
    pub fn has_table_privileges(
        &self,
        schema: &str,
        table: &str,
        required: &[PrivilegeType],
    ) -> bool {
        let in_schema = self.schema.get(schema);
        let in_table = self.table.get(&(schema.to_string(), table.to_string()));
        required.iter().all(|p| {
            self.global.contains(p)
                || in_schema.is_some_and(|s| s.contains(p))
                || in_table.is_some_and(|s| s.contains(p))
        })
    }

    /// Whether anything at all is held on `schema`, directly or through a
    /// broader or narrower grant.
    pub fn can_access_schema(&self, schema: &str) -> bool {
        !self.global.is_empty()
            || self.schema.get(schema).is_some_and(|s| !s.is_empty())
            || self
                .table
                .iter()
                .any(|((db, _), set)| db == schema && !set.is_empty())
    }

    /// Privileges held instance-wide.
    pub fn global(&self) -> &PrivilegeSet {
        &self.global
    }

    /// Privileges held on `schema` itself.
    pub fn schema(&self, schema: &str) -> Option<&PrivilegeSet> {
        self.schema.get(schema)
    }

    /// Privileges held on one table itself.
    pub fn table(&self, schema: &str, table: &str) -> Option<&PrivilegeSet> {
        self.table.get(&(schema.to_string(), table.to_string()))
    }

    /// All schema-scoped grants.
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &PrivilegeSet)> {
        self.schema.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All table-scoped grants as `(schema, table, set)`.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &str, &PrivilegeSet)> {
        self.table
            .iter()
            .map(|((db, table), v)| (db.as_str(), table.as_str(), v))
    }

    /// True if nothing is granted at any scope.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
            && self.schema.values().all(|s| s.is_empty())
            && self.table.values().all(|s| s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrivilegeType::*;

    #[test]
    fn test_empty_aggregate() {
        let p = Privileges::new();
        assert!(p.is_empty());
        assert!(p.has_privileges(&[]));
        assert!(!p.has_privileges(&[Super]));
    }

    #[test]
    fn test_has_privileges_requires_all() {
        let mut p = Privileges::new();
        for t in [Super, Select, Insert, Update, Reload, Shutdown] {
            p.add_global(t);
        }
        assert!(p.has_privileges(&[Super, Select, Insert, Update, Reload, Shutdown]));
        assert!(!p.has_privileges(&[Drop]));
        assert!(!p.has_privileges(&[Super, Drop]));
    }

    #[test]
    fn test_schema_grant_does_not_count_globally() {
        let mut p = Privileges::new();
        p.add_schema("sys", Trigger);
        assert!(!p.has_privileges(&[Trigger]));
        assert!(p.has_schema_privileges("sys", &[Trigger]));
        assert!(!p.has_schema_privileges("other", &[Trigger]));
    }

    #[test]
    fn test_scoped_checks_consult_enclosing_scopes() {
        let mut p = Privileges::new();
        p.add_global(Select);
        p.add_schema("shop", Insert);
        p.add_table("shop", "orders", Update);

        assert!(p.has_schema_privileges("shop", &[Select, Insert]));
        assert!(!p.has_schema_privileges("shop", &[Update]));
        assert!(p.has_table_privileges("shop", "orders", &[Select, Insert, Update]));
        assert!(!p.has_table_privileges("shop", "items", &[Update]));
        assert!(p.has_table_privileges("other", "t", &[Select]));
    }

    #[test]
    fn test_can_access_schema() {
        let mut p = Privileges::new();
        assert!(!p.can_access_schema("sys"));
        p.add_table("sys", "sys_config", Select);
        assert!(p.can_access_schema("sys"));
        assert!(!p.can_access_schema("shop"));

        let admin = Privileges::all_permitted();
        assert!(admin.can_access_schema("anything"));
    }

    #[test]
    fn test_merge_is_union() {
        let mut a = Privileges::new();
        a.add_global(Select);
        a.add_schema("sys", Trigger);

        let mut b = Privileges::new();
        b.add_global(Insert);
        b.add_schema("sys", Select);
        b.add_table("sys", "sys_config", Select);

        a.merge(b);
        assert!(a.has_privileges(&[Select, Insert]));
        assert_eq!(a.schema("sys").unwrap().len(), 2);
        assert!(a.table("sys", "sys_config").unwrap().contains(&Select));
    }

    #[test]
    fn test_all_permitted() {
        let p = Privileges::all_permitted();
        assert!(p.has_privileges(PrivilegeType::all()));
        assert_eq!(p.global().len(), PrivilegeType::all().len());
    }
}
