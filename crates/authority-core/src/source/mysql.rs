//! MySQL-backed data source.
//!
//! Enable with `--features mysql`. Each data source owns a small connection
//! pool and a Tokio runtime used to drive it from synchronous callers, so it
//! must not be used from inside another Tokio runtime.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row};
use tokio::runtime::Runtime;

use super::data_source::DataSource;
use super::result_set::{ResultSet, Value};
use crate::error::{AuthorityError, AuthorityResult};

/// Connections kept per instance; catalog loads are sequential.
const MAX_CONNECTIONS: u32 = 2;

/// A physical MySQL instance.
pub struct MySqlDataSource {
    instance: String,
    pool: MySqlPool,
    rt: Runtime,
}

impl MySqlDataSource {
    /// Connect to `url` (e.g. `mysql://root:pw@127.0.0.1:3306/mysql`).
    pub fn connect(url: &str) -> AuthorityResult<Self> {
        let instance = instance_id_from_url(url);
        let rt = Runtime::new()?;

        let pool = rt
            .block_on(
                MySqlPoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .connect(url),
            )
            .map_err(|e| AuthorityError::data_access(&instance, e))?;

        tracing::debug!(instance = %instance, "connected to mysql instance");
        Ok(Self { instance, pool, rt })
    }

    fn convert_row(row: &MySqlRow) -> Vec<Value> {
        // Text protocol: every cell arrives as its textual form.
        (0..row.columns().len())
            .map(|i| match row.try_get_unchecked::<Option<Vec<u8>>, _>(i) {
                Ok(Some(bytes)) => Value::Text(String::from_utf8_lossy(&bytes).into_owned()),
                Ok(None) | Err(_) => Value::Null,
            })
            .collect()
    }
}

impl DataSource for MySqlDataSource {
    fn instance_id(&self) -> &str {
        &self.instance
    }

    fn execute_query(&self, sql: &str) -> AuthorityResult<ResultSet> {
        let rows = self
            .rt
            .block_on(sqlx::raw_sql(sql).fetch_all(&self.pool))
            .map_err(|e| AuthorityError::data_access(&self.instance, e))?;

        let Some(first) = rows.first() else {
            return Ok(ResultSet::default());
        };

        let mut result = ResultSet::new(first.columns().iter().map(|c| c.name().to_string()));
        for row in &rows {
            result.push_row(Self::convert_row(row));
        }
        Ok(result)
    }
}

/// Extract `host:port` from a connection URL.
fn instance_id_from_url(url: &str) -> String {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let rest = rest.rsplit_once('@').map(|(_, r)| r).unwrap_or(rest);
    let authority = rest.split(['/', '?']).next().unwrap_or(rest);
    if authority.contains(':') {
        authority.to_string()
    } else {
        format!("{}:3306", authority)
    }
}
