//! Native authority provider: privileges read from the storage catalogs.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use super::snapshot::{PrivilegeSnapshot, SnapshotSlot};
use super::AuthorityProvider;
use crate::error::AuthorityResult;
use crate::loader::PrivilegeLoader;
use crate::model::{AuthorityUser, Grantee, Privileges};
use crate::planner::InstancePlan;
use crate::source::DatabaseMetaData;

/// Provider type identifier.
pub const NATIVE_PROVIDER_TYPE: &str = "NATIVE";

/// Caches the privileges granted by the physical instances' own catalogs.
///
/// Loads are serialized; each successful load replaces the cached snapshot
/// as a whole. Lookups never block on a load in progress and never query.
#[derive(Debug, Default)]
pub struct NativeAuthorityProvider {
    slot: SnapshotSlot,
    load_lock: Mutex<()>,
    loader: PrivilegeLoader,
}

impl NativeAuthorityProvider {
    /// Create a provider with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot currently served.
    pub fn snapshot(&self) -> Arc<PrivilegeSnapshot> {
        self.slot.load()
    }

    /// Number of successful loads so far.
    pub fn generation(&self) -> u64 {
        self.slot.load().generation()
    }

    fn load(
        &self,
        databases: &HashMap<String, DatabaseMetaData>,
        users: &[AuthorityUser],
    ) -> AuthorityResult<()> {
        let _guard = self.load_lock.lock();

        let plan = InstancePlan::build(databases, users);
        let privileges = match self.loader.load(&plan) {
            Ok(privileges) => privileges,
            Err(e) => {
                warn!(
                    error = %e,
                    generation = self.generation(),
                    "privilege load failed, keeping current snapshot"
                );
                return Err(e);
            }
        };

        let grantees = privileges.len();
        let generation = self.slot.install(privileges);
        info!(
            generation,
            grantees,
            instances = plan.data_sources().len(),
            "privilege snapshot installed"
        );
        Ok(())
    }
}

impl AuthorityProvider for NativeAuthorityProvider {
    fn provider_type(&self) -> &'static str {
        NATIVE_PROVIDER_TYPE
    }

    fn initialize(
        &self,
        databases: &HashMap<String, DatabaseMetaData>,
        users: &[AuthorityUser],
    ) -> AuthorityResult<()> {
        self.load(databases, users)
    }

    fn refresh(
        &self,
        databases: &HashMap<String, DatabaseMetaData>,
        users: &[AuthorityUser],
    ) -> AuthorityResult<()> {
        self.load(databases, users)
    }

    fn find_privileges(&self, grantee: &Grantee) -> Option<Arc<Privileges>> {
        self.slot.load().get(grantee)
    }
}
