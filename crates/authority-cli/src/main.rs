//! Authority Command-Line Tool
//!
//! Loads the privileges of the configured users from every instance behind
//! the configured databases and answers questions about them.

mod config;
mod formatter;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use authority_core::config::DEFAULT_USERS_ENV;
use authority_core::{AuthorityProvider, Grantee, PrivilegeType, ProviderRegistry};

use config::AuthorityConfig;
use formatter::{create_formatter, CheckScope, OutputFormat};

/// Authority Command-Line Tool
#[derive(Parser, Debug)]
#[command(name = "authority")]
#[command(version, about = "Inspect privileges loaded from MySQL grant catalogs")]
pub struct Args {
    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Additional users, `user@host[:password]`, `;`-separated
    #[arg(short, long)]
    pub user: Vec<String>,

    /// Override the provider type from the configuration
    #[arg(long)]
    pub provider: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show every privilege held by a grantee
    Show {
        /// Grantee as `user@host`
        grantee: String,
    },
    /// Check whether a grantee holds all of the given privileges
    Check {
        /// Grantee as `user@host`
        grantee: String,
        /// Privilege names, e.g. SELECT INSERT
        #[arg(required = true)]
        privileges: Vec<String>,
        /// Evaluate on a schema
        #[arg(long)]
        schema: Option<String>,
        /// Evaluate on a table of `--schema`
        #[arg(long, requires = "schema")]
        table: Option<String>,
    },
    /// List configured users and what was loaded for them
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authority=info,authority_core=info".into()),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when a `check` is denied.
fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => AuthorityConfig::load(path)?,
        None => AuthorityConfig::default(),
    }
    .with_extra_users(&args.user)?;
    config.provider = config.provider.with_users_from_env(DEFAULT_USERS_ENV)?;
    if let Some(provider_type) = &args.provider {
        config.provider.provider_type = provider_type.clone();
    }

    let users = config.users()?;
    let provider = ProviderRegistry::with_defaults().create(&config.provider.provider_type)?;
    let databases = config.into_databases()?;

    tracing::info!(
        provider = provider.provider_type(),
        users = users.len(),
        databases = databases.len(),
        "initializing authority provider"
    );
    provider.initialize(&databases, &users)?;

    let formatter = create_formatter(args.format);

    match args.command {
        Command::Show { grantee } => {
            let grantee: Grantee = grantee.parse()?;
            let privileges = provider.find_privileges(&grantee);
            println!("{}", formatter.format_privileges(&grantee, privileges.as_deref()));
            Ok(true)
        }
        Command::Check {
            grantee,
            privileges,
            schema,
            table,
        } => {
            let grantee: Grantee = grantee.parse()?;
            let required = privileges
                .iter()
                .map(|name| name.parse::<PrivilegeType>())
                .collect::<Result<Vec<_>, _>>()?;
            let scope = match (schema, table) {
                (Some(schema), Some(table)) => CheckScope::Table(schema, table),
                (Some(schema), None) => CheckScope::Schema(schema),
                _ => CheckScope::Global,
            };
            let allowed = provider
                .find_privileges(&grantee)
                .is_some_and(|held| match &scope {
                    CheckScope::Global => held.has_privileges(&required),
                    CheckScope::Schema(schema) => held.has_schema_privileges(schema, &required),
                    CheckScope::Table(schema, table) => {
                        held.has_table_privileges(schema, table, &required)
                    }
                });
            println!(
                "{}",
                formatter.format_check(&grantee, &scope, &required, allowed)
            );
            Ok(allowed)
        }
        Command::List => {
            let loaded: Vec<_> = users
                .iter()
                .map(|user| {
                    let grantee = user.grantee().clone();
                    let privileges = provider.find_privileges(&grantee);
                    (grantee, privileges)
                })
                .collect();
            let rows: Vec<_> = loaded
                .iter()
                .map(|(grantee, privileges)| (grantee.clone(), privileges.as_deref()))
                .collect();
            println!("{}", formatter.format_grantees(&rows));
            Ok(true)
        }
    }
}
