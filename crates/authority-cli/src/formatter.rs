//! Output formatters for privilege reports.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use serde_json::json;

use authority_core::{Grantee, PrivilegeSet, PrivilegeType, Privileges};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Where a `check` was evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckScope {
    Global,
    Schema(String),
    Table(String, String),
}

impl std::fmt::Display for CheckScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckScope::Global => write!(f, "*.*"),
            CheckScope::Schema(schema) => write!(f, "{}.*", schema),
            CheckScope::Table(schema, table) => write!(f, "{}.{}", schema, table),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format the privileges held by one grantee. `None` means unknown.
    fn format_privileges(&self, grantee: &Grantee, privileges: Option<&Privileges>) -> String;

    /// Format the outcome of a privilege check.
    fn format_check(
        &self,
        grantee: &Grantee,
        scope: &CheckScope,
        required: &[PrivilegeType],
        allowed: bool,
    ) -> String;

    /// Format the grantee listing.
    fn format_grantees(&self, grantees: &[(Grantee, Option<&Privileges>)]) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

fn join(set: &PrivilegeSet) -> String {
    set.iter()
        .map(PrivilegeType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_required(required: &[PrivilegeType]) -> String {
    required
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_privileges(&self, grantee: &Grantee, privileges: Option<&Privileges>) -> String {
        let Some(privileges) = privileges else {
            return format!("No privileges found for {}", grantee);
        };

        let mut table = Table::new();
        table.set_header(vec![Cell::new("Scope"), Cell::new("Privileges")]);
        if !privileges.global().is_empty() {
            table.add_row(vec!["*.*".to_string(), join(privileges.global())]);
        }
        for (schema, set) in privileges.schemas() {
            table.add_row(vec![format!("{}.*", schema), join(set)]);
        }
        for (schema, name, set) in privileges.tables() {
            table.add_row(vec![format!("{}.{}", schema, name), join(set)]);
        }

        if privileges.is_empty() {
            format!("{}: no privileges granted", grantee)
        } else {
            format!("{}\n{}", grantee, table)
        }
    }

    fn format_check(
        &self,
        grantee: &Grantee,
        scope: &CheckScope,
        required: &[PrivilegeType],
        allowed: bool,
    ) -> String {
        let verdict = if allowed { "ALLOWED" } else { "DENIED" };
        format!(
            "{} on {} for {}: {}",
            join_required(required),
            scope,
            grantee,
            verdict
        )
    }

    fn format_grantees(&self, grantees: &[(Grantee, Option<&Privileges>)]) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Grantee", "Global", "Schemas", "Tables"]);
        for (grantee, privileges) in grantees {
            match privileges {
                Some(p) => table.add_row(vec![
                    grantee.to_string(),
                    p.global().len().to_string(),
                    p.schemas().count().to_string(),
                    p.tables().count().to_string(),
                ]),
                None => table.add_row(vec![
                    grantee.to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ]),
            };
        }
        table.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

fn privileges_to_json(privileges: &Privileges) -> serde_json::Value {
    let schemas: serde_json::Map<String, serde_json::Value> = privileges
        .schemas()
        .map(|(schema, set)| (schema.to_string(), json!(set)))
        .collect();
    let tables: Vec<serde_json::Value> = privileges
        .tables()
        .map(|(schema, table, set)| {
            json!({
                "schema": schema,
                "table": table,
                "privileges": set,
            })
        })
        .collect();
    json!({
        "global": privileges.global(),
        "schemas": schemas,
        "tables": tables,
    })
}

impl Formatter for JsonFormatter {
    fn format_privileges(&self, grantee: &Grantee, privileges: Option<&Privileges>) -> String {
        let value = json!({
            "grantee": grantee.to_string(),
            "privileges": privileges.map(privileges_to_json),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_check(
        &self,
        grantee: &Grantee,
        scope: &CheckScope,
        required: &[PrivilegeType],
        allowed: bool,
    ) -> String {
        json!({
            "grantee": grantee.to_string(),
            "scope": scope.to_string(),
            "required": required,
            "allowed": allowed,
        })
        .to_string()
    }

    fn format_grantees(&self, grantees: &[(Grantee, Option<&Privileges>)]) -> String {
        let rows: Vec<serde_json::Value> = grantees
            .iter()
            .map(|(grantee, privileges)| {
                json!({
                    "grantee": grantee.to_string(),
                    "privileges": privileges.map(privileges_to_json),
                })
            })
            .collect();
        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }
}
