//! Individually grantable privilege kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthorityError;

/// A single grantable capability.
///
/// The administrative variants only make sense instance-wide. The data and
/// DDL variants may be granted globally, per schema or per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivilegeType {
    // Administrative
    Super,
    Reload,
    Shutdown,
    Process,
    File,
    ShowDatabases,
    ReplicationSlave,
    ReplicationClient,
    CreateUser,
    CreateTablespace,
    Grant,

    // Data and DDL
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Alter,
    Drop,
    Index,
    References,
    CreateTemporaryTables,
    LockTables,
    Execute,
    CreateView,
    ShowView,
    CreateRoutine,
    AlterRoutine,
    Event,
    Trigger,
}

const ALL: [PrivilegeType; 29] = [
    PrivilegeType::Super,
    PrivilegeType::Reload,
    PrivilegeType::Shutdown,
    PrivilegeType::Process,
    PrivilegeType::File,
    PrivilegeType::ShowDatabases,
    PrivilegeType::ReplicationSlave,
    PrivilegeType::ReplicationClient,
    PrivilegeType::CreateUser,
    PrivilegeType::CreateTablespace,
    PrivilegeType::Grant,
    PrivilegeType::Select,
    PrivilegeType::Insert,
    PrivilegeType::Update,
    PrivilegeType::Delete,
    PrivilegeType::Create,
    PrivilegeType::Alter,
    PrivilegeType::Drop,
    PrivilegeType::Index,
    PrivilegeType::References,
    PrivilegeType::CreateTemporaryTables,
    PrivilegeType::LockTables,
    PrivilegeType::Execute,
    PrivilegeType::CreateView,
    PrivilegeType::ShowView,
    PrivilegeType::CreateRoutine,
    PrivilegeType::AlterRoutine,
    PrivilegeType::Event,
    PrivilegeType::Trigger,
];

impl PrivilegeType {
    /// Every privilege type, in declaration order.
    pub fn all() -> &'static [PrivilegeType] {
        &ALL
    }

    /// Whether this privilege only applies instance-wide.
    pub fn is_administrative(&self) -> bool {
        matches!(
            self,
            PrivilegeType::Super
                | PrivilegeType::Reload
                | PrivilegeType::Shutdown
                | PrivilegeType::Process
                | PrivilegeType::File
                | PrivilegeType::ShowDatabases
                | PrivilegeType::ReplicationSlave
                | PrivilegeType::ReplicationClient
                | PrivilegeType::CreateUser
                | PrivilegeType::CreateTablespace
                | PrivilegeType::Grant
        )
    }

    /// Upper-case identifier, e.g. `CREATE_VIEW`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivilegeType::Super => "SUPER",
            PrivilegeType::Reload => "RELOAD",
            PrivilegeType::Shutdown => "SHUTDOWN",
            PrivilegeType::Process => "PROCESS",
            PrivilegeType::File => "FILE",
            PrivilegeType::ShowDatabases => "SHOW_DATABASES",
            PrivilegeType::ReplicationSlave => "REPLICATION_SLAVE",
            PrivilegeType::ReplicationClient => "REPLICATION_CLIENT",
            PrivilegeType::CreateUser => "CREATE_USER",
            PrivilegeType::CreateTablespace => "CREATE_TABLESPACE",
            PrivilegeType::Grant => "GRANT",
            PrivilegeType::Select => "SELECT",
            PrivilegeType::Insert => "INSERT",
            PrivilegeType::Update => "UPDATE",
            PrivilegeType::Delete => "DELETE",
            PrivilegeType::Create => "CREATE",
            PrivilegeType::Alter => "ALTER",
            PrivilegeType::Drop => "DROP",
            PrivilegeType::Index => "INDEX",
            PrivilegeType::References => "REFERENCES",
            PrivilegeType::CreateTemporaryTables => "CREATE_TEMPORARY_TABLES",
            PrivilegeType::LockTables => "LOCK_TABLES",
            PrivilegeType::Execute => "EXECUTE",
            PrivilegeType::CreateView => "CREATE_VIEW",
            PrivilegeType::ShowView => "SHOW_VIEW",
            PrivilegeType::CreateRoutine => "CREATE_ROUTINE",
            PrivilegeType::AlterRoutine => "ALTER_ROUTINE",
            PrivilegeType::Event => "EVENT",
            PrivilegeType::Trigger => "TRIGGER",
        }
    }

    /// Resolve a name as it appears in a table privilege list.
    ///
    /// Catalogs spell these in mixed case with spaces (`Select`,
    /// `Create View`, `Show view`). Matching ignores case and treats spaces
    /// and underscores alike.
    pub fn from_table_privilege_name(name: &str) -> Option<Self> {
        let normalized = name.trim().replace(' ', "_").to_ascii_uppercase();
        ALL.iter().copied().find(|p| p.as_str() == normalized)
    }
}

impl fmt::Display for PrivilegeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivilegeType {
    type Err = AuthorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_table_privilege_name(s)
            .ok_or_else(|| AuthorityError::UnknownPrivilege(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_complete_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for p in PrivilegeType::all() {
            assert!(seen.insert(*p), "duplicate {}", p);
        }
        assert_eq!(seen.len(), 29);
    }

    #[test]
    fn test_administrative_partition() {
        let admin: Vec<_> = PrivilegeType::all()
            .iter()
            .filter(|p| p.is_administrative())
            .collect();
        assert_eq!(admin.len(), 11);
        assert!(PrivilegeType::Super.is_administrative());
        assert!(!PrivilegeType::Select.is_administrative());
        assert!(!PrivilegeType::Trigger.is_administrative());
    }

    #[test]
    fn test_table_privilege_names() {
        assert_eq!(
            PrivilegeType::from_table_privilege_name("Select"),
            Some(PrivilegeType::Select)
        );
        assert_eq!(
            PrivilegeType::from_table_privilege_name("Create View"),
            Some(PrivilegeType::CreateView)
        );
        assert_eq!(
            PrivilegeType::from_table_privilege_name("Show view"),
            Some(PrivilegeType::ShowView)
        );
        assert_eq!(
            PrivilegeType::from_table_privilege_name(" grant "),
            Some(PrivilegeType::Grant)
        );
        assert_eq!(PrivilegeType::from_table_privilege_name("Frobnicate"), None);
    }

    #[test]
    fn test_from_str_and_display() {
        let p: PrivilegeType = "create_temporary_tables".parse().unwrap();
        assert_eq!(p, PrivilegeType::CreateTemporaryTables);
        assert_eq!(p.to_string(), "CREATE_TEMPORARY_TABLES");

        let err = "nope".parse::<PrivilegeType>().unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_serde_uses_identifier() {
        let json = serde_json::to_string(&PrivilegeType::ShowDatabases).unwrap();
        assert_eq!(json, "\"SHOW_DATABASES\"");
    }
}
