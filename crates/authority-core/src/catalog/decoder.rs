//! Decoding of privilege catalog rows.
//!
//! Flag-shaped catalogs are decoded through fixed `(column, privilege)`
//! tables. The table catalog carries a single list column instead.

use super::query::CatalogQuery;
use crate::error::{AuthorityError, AuthorityResult};
use crate::model::{Grantee, PrivilegeType, Privileges};
use crate::source::{ResultSet, Row, Value};

const USER_COLUMN: &str = "user";
const HOST_COLUMN: &str = "host";
const SCHEMA_COLUMN: &str = "Db";
const TABLE_COLUMN: &str = "Table_name";
const TABLE_PRIVILEGE_COLUMN: &str = "Table_priv";

/// Flag columns of the global catalog.
pub const GLOBAL_PRIVILEGE_COLUMNS: &[(&str, PrivilegeType)] = &[
    ("Super_priv", PrivilegeType::Super),
    ("Reload_priv", PrivilegeType::Reload),
    ("Shutdown_priv", PrivilegeType::Shutdown),
    ("Process_priv", PrivilegeType::Process),
    ("File_priv", PrivilegeType::File),
    ("Show_db_priv", PrivilegeType::ShowDatabases),
    ("Repl_slave_priv", PrivilegeType::ReplicationSlave),
    ("Repl_client_priv", PrivilegeType::ReplicationClient),
    ("Create_user_priv", PrivilegeType::CreateUser),
    ("Create_tablespace_priv", PrivilegeType::CreateTablespace),
    ("Select_priv", PrivilegeType::Select),
    ("Insert_priv", PrivilegeType::Insert),
    ("Update_priv", PrivilegeType::Update),
    ("Delete_priv", PrivilegeType::Delete),
    ("Create_priv", PrivilegeType::Create),
    ("Alter_priv", PrivilegeType::Alter),
    ("Drop_priv", PrivilegeType::Drop),
    ("Grant_priv", PrivilegeType::Grant),
    ("Index_priv", PrivilegeType::Index),
    ("References_priv", PrivilegeType::References),
    ("Create_tmp_table_priv", PrivilegeType::CreateTemporaryTables),
    ("Lock_tables_priv", PrivilegeType::LockTables),
    ("Execute_priv", PrivilegeType::Execute),
    ("Create_view_priv", PrivilegeType::CreateView),
    ("Show_view_priv", PrivilegeType::ShowView),
    ("Create_routine_priv", PrivilegeType::CreateRoutine),
    ("Alter_routine_priv", PrivilegeType::AlterRoutine),
    ("Event_priv", PrivilegeType::Event),
    ("Trigger_priv", PrivilegeType::Trigger),
];

/// Flag columns of the schema catalog.
pub const SCHEMA_PRIVILEGE_COLUMNS: &[(&str, PrivilegeType)] = &[
    ("Select_priv", PrivilegeType::Select),
    ("Insert_priv", PrivilegeType::Insert),
    ("Update_priv", PrivilegeType::Update),
    ("Delete_priv", PrivilegeType::Delete),
    ("Create_priv", PrivilegeType::Create),
    ("Alter_priv", PrivilegeType::Alter),
    ("Drop_priv", PrivilegeType::Drop),
    ("Grant_priv", PrivilegeType::Grant),
    ("Index_priv", PrivilegeType::Index),
    ("References_priv", PrivilegeType::References),
    ("Create_tmp_table_priv", PrivilegeType::CreateTemporaryTables),
    ("Lock_tables_priv", PrivilegeType::LockTables),
    ("Execute_priv", PrivilegeType::Execute),
    ("Create_view_priv", PrivilegeType::CreateView),
    ("Show_view_priv", PrivilegeType::ShowView),
    ("Create_routine_priv", PrivilegeType::CreateRoutine),
    ("Alter_routine_priv", PrivilegeType::AlterRoutine),
    ("Event_priv", PrivilegeType::Event),
    ("Trigger_priv", PrivilegeType::Trigger),
];

/// Privileges decoded from one catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRow {
    /// Grantee the row belongs to.
    pub grantee: Grantee,
    /// Privileges granted by this row alone.
    pub privileges: Privileges,
}

/// Decode a result of the given catalog.
pub fn decode(query: CatalogQuery, result: &ResultSet) -> AuthorityResult<Vec<DecodedRow>> {
    match query {
        CatalogQuery::Global => decode_global(result),
        CatalogQuery::Schema => decode_schema(result),
        CatalogQuery::Table => decode_table(result),
    }
}

/// Decode the global catalog: one flag column per privilege.
pub fn decode_global(result: &ResultSet) -> AuthorityResult<Vec<DecodedRow>> {
    let catalog = CatalogQuery::Global.table_name();
    result
        .rows()
        .map(|row| {
            let grantee = read_grantee(catalog, &row)?;
            let mut privileges = Privileges::new();
            for &(column, privilege) in GLOBAL_PRIVILEGE_COLUMNS {
                if read_flag(catalog, &row, column)? {
                    privileges.add_global(privilege);
                }
            }
            Ok(DecodedRow { grantee, privileges })
        })
        .collect()
}

/// Decode the schema catalog: flag columns scoped to the row's `Db`.
pub fn decode_schema(result: &ResultSet) -> AuthorityResult<Vec<DecodedRow>> {
    let catalog = CatalogQuery::Schema.table_name();
    result
        .rows()
        .map(|row| {
            let grantee = read_grantee(catalog, &row)?;
            let schema = read_text(catalog, &row, SCHEMA_COLUMN)?;
            let mut privileges = Privileges::new();
            for &(column, privilege) in SCHEMA_PRIVILEGE_COLUMNS {
                if read_flag(catalog, &row, column)? {
                    privileges.add_schema(schema, privilege);
                }
            }
            Ok(DecodedRow { grantee, privileges })
        })
        .collect()
}

/// Decode the table catalog: a privilege list scoped to `Db`.`Table_name`.
pub fn decode_table(result: &ResultSet) -> AuthorityResult<Vec<DecodedRow>> {
    let catalog = CatalogQuery::Table.table_name();
    result
        .rows()
        .map(|row| {
            let grantee = read_grantee(catalog, &row)?;
            let schema = read_text(catalog, &row, SCHEMA_COLUMN)?;
            let table = read_text(catalog, &row, TABLE_COLUMN)?;
            let mut privileges = Privileges::new();
            for privilege in read_privilege_list(catalog, &row, TABLE_PRIVILEGE_COLUMN)? {
                privileges.add_table(schema, table, privilege);
            }
            Ok(DecodedRow { grantee, privileges })
        })
        .collect()
}

fn column<'a>(catalog: &str, row: &Row<'a>, column: &str) -> AuthorityResult<&'a Value> {
    row.get(column)
        .ok_or_else(|| AuthorityError::decode(catalog, column, "column not found"))
}

fn read_text<'a>(catalog: &str, row: &Row<'a>, name: &str) -> AuthorityResult<&'a str> {
    match column(catalog, row, name)? {
        Value::Text(s) => Ok(s.as_str()),
        other => Err(AuthorityError::decode(
            catalog,
            name,
            format!("expected text, found {}", other),
        )),
    }
}

fn read_grantee(catalog: &str, row: &Row<'_>) -> AuthorityResult<Grantee> {
    let user = read_text(catalog, row, USER_COLUMN)?;
    let host = read_text(catalog, row, HOST_COLUMN)?;
    Grantee::new(user, host).map_err(|e| AuthorityError::decode(catalog, USER_COLUMN, e.to_string()))
}

fn read_flag(catalog: &str, row: &Row<'_>, name: &str) -> AuthorityResult<bool> {
    let value = column(catalog, row, name)?;
    let flag = match value {
        Value::Null => Some(false),
        Value::Bool(b) => Some(*b),
        Value::Int(i) => Some(*i != 0),
        Value::Text(s) => match s.trim().to_ascii_uppercase().as_str() {
            "Y" | "YES" | "TRUE" | "1" => Some(true),
            "N" | "NO" | "FALSE" | "0" | "" => Some(false),
            _ => None,
        },
        Value::List(_) => None,
    };
    flag.ok_or_else(|| {
        AuthorityError::decode(catalog, name, format!("not a privilege flag: {}", value))
    })
}

fn read_privilege_list(
    catalog: &str,
    row: &Row<'_>,
    name: &str,
) -> AuthorityResult<Vec<PrivilegeType>> {
    let items: Vec<&str> = match column(catalog, row, name)? {
        Value::Null => Vec::new(),
        Value::Text(s) => s.split(',').collect(),
        Value::List(items) => items.iter().map(String::as_str).collect(),
        other => {
            return Err(AuthorityError::decode(
                catalog,
                name,
                format!("expected privilege list, found {}", other),
            ))
        }
    };

    items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            PrivilegeType::from_table_privilege_name(item).ok_or_else(|| {
                AuthorityError::decode(catalog, name, format!("unknown privilege '{}'", item))
            })
        })
        .collect()
}
