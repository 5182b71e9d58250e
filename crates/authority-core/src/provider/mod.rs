//! Authority providers.
//!
//! A provider answers "which privileges does this grantee hold" from a
//! cached snapshot, and rebuilds that snapshot on `initialize`/`refresh`.
//!
//! # Example
//!
//! ```ignore
//! use authority_core::provider::{AuthorityProvider, ProviderRegistry};
//!
//! let provider = ProviderRegistry::with_defaults().create("NATIVE")?;
//! provider.initialize(&databases, &users)?;
//!
//! if let Some(privileges) = provider.find_privileges(&grantee) {
//!     if privileges.has_privileges(&[PrivilegeType::Select]) {
//!         // Execute query...
//!     }
//! }
//! ```

pub mod all_permitted;
pub mod native;
pub mod registry;
pub mod snapshot;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AuthorityResult;
use crate::model::{AuthorityUser, Grantee, Privileges};
use crate::source::DatabaseMetaData;

pub use all_permitted::{AllPermittedAuthorityProvider, ALL_PERMITTED_PROVIDER_TYPE};
pub use native::{NativeAuthorityProvider, NATIVE_PROVIDER_TYPE};
pub use registry::{ProviderFactory, ProviderRegistry};
pub use snapshot::{PrivilegeSnapshot, SnapshotSlot};

/// Source of per-grantee privileges.
pub trait AuthorityProvider: Send + Sync {
    /// Type name this provider is registered under.
    fn provider_type(&self) -> &'static str;

    /// Build the cache from scratch. Calling it again behaves like
    /// [`refresh`](Self::refresh).
    fn initialize(
        &self,
        databases: &HashMap<String, DatabaseMetaData>,
        users: &[AuthorityUser],
    ) -> AuthorityResult<()>;

    /// Rebuild the cache and swap it in atomically. On error the previous
    /// cache stays in place.
    fn refresh(
        &self,
        databases: &HashMap<String, DatabaseMetaData>,
        users: &[AuthorityUser],
    ) -> AuthorityResult<()>;

    /// Cached privileges of an exact grantee, or `None` if unknown.
    fn find_privileges(&self, grantee: &Grantee) -> Option<Arc<Privileges>>;
}
