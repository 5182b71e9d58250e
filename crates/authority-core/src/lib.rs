//! Authority Core - privilege loading, aggregation and caching.
//!
//! Determines which privileges a grantee (`user@host`) holds by querying
//! the privilege catalogs of the physical instances behind the logical
//! databases, merging the results, and serving them from an atomically
//! replaced snapshot.

pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod planner;
pub mod provider;
pub mod source;

pub use config::{ProviderConfig, UserConfig};
pub use error::{AuthorityError, AuthorityResult};
pub use loader::{PrivilegeLoader, PrivilegeMap};
pub use model::{AuthorityUser, Grantee, PrivilegeSet, PrivilegeType, Privileges};
pub use planner::{InstancePlan, ScopingPredicate};
pub use provider::{
    AllPermittedAuthorityProvider, AuthorityProvider, NativeAuthorityProvider, PrivilegeSnapshot,
    ProviderRegistry,
};
pub use source::{DataSource, DatabaseMetaData, ResultSet, StaticDataSource, Value};
