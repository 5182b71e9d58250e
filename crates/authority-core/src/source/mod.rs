//! Collaborators the authority core consumes: query execution against
//! physical instances and the logical-database metadata that lists them.

pub mod data_source;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod result_set;

pub use data_source::{DataSource, DatabaseMetaData, StaticDataSource};
pub use result_set::{ResultSet, Row, Value};

#[cfg(feature = "mysql")]
pub use mysql::MySqlDataSource;
