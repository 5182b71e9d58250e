//! Configuration file for the authority CLI.
//!
//! ```json
//! {
//!   "provider": {"type": "NATIVE", "users": [{"user": "root@localhost"}]},
//!   "databases": {
//!     "sharding_db": [
//!       {"mysql": "mysql://root:pw@127.0.0.1:3306/mysql"},
//!       {"fixture": {"instance": "replica:3306", "tables": {"mysql.user": []}}}
//!     ]
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use authority_core::config::parse_user_list;
use authority_core::{
    AuthorityError, AuthorityResult, AuthorityUser, DataSource, DatabaseMetaData, ProviderConfig,
    StaticDataSource,
};

/// One physical instance behind a logical database.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceConfig {
    /// A live MySQL instance, by connection URL.
    Mysql(String),
    /// Catalog tables given inline.
    Fixture(StaticDataSource),
}

impl InstanceConfig {
    fn into_data_source(self) -> AuthorityResult<Arc<dyn DataSource>> {
        match self {
            InstanceConfig::Fixture(source) => Ok(Arc::new(source)),
            InstanceConfig::Mysql(url) => connect_mysql(&url),
        }
    }
}

#[cfg(feature = "mysql")]
fn connect_mysql(url: &str) -> AuthorityResult<Arc<dyn DataSource>> {
    let source = authority_core::source::MySqlDataSource::connect(url)?;
    Ok(Arc::new(source))
}

#[cfg(not(feature = "mysql"))]
fn connect_mysql(url: &str) -> AuthorityResult<Arc<dyn DataSource>> {
    Err(AuthorityError::Config(format!(
        "cannot connect to {}: built without the `mysql` feature",
        url
    )))
}

/// Contents of the configuration file.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorityConfig {
    /// Provider selection and users.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Logical database name to its instances.
    #[serde(default)]
    pub databases: BTreeMap<String, Vec<InstanceConfig>>,
}

impl AuthorityConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> AuthorityResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse from JSON text.
    pub fn from_json(content: &str) -> AuthorityResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Append users given on the command line (`user@host[:password]`).
    pub fn with_extra_users(mut self, lists: &[String]) -> AuthorityResult<Self> {
        for list in lists {
            self.provider.users.extend(parse_user_list(list)?);
        }
        Ok(self)
    }

    /// Resolve the configured users.
    pub fn users(&self) -> AuthorityResult<Vec<AuthorityUser>> {
        self.provider.authority_users()
    }

    /// Open every instance and group them by logical database.
    pub fn into_databases(self) -> AuthorityResult<HashMap<String, DatabaseMetaData>> {
        let mut databases = HashMap::new();
        for (name, instances) in self.databases {
            let sources = instances
                .into_iter()
                .map(InstanceConfig::into_data_source)
                .collect::<AuthorityResult<Vec<_>>>()?;
            tracing::debug!(database = %name, instances = sources.len(), "database configured");
            databases.insert(name.clone(), DatabaseMetaData::new(name, sources));
        }
        Ok(databases)
    }
}
