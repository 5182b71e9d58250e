//! Provider granting every privilege to every configured user.

use std::collections::HashMap;
use std::sync::Arc;

use super::snapshot::SnapshotSlot;
use super::AuthorityProvider;
use crate::error::AuthorityResult;
use crate::loader::PrivilegeMap;
use crate::model::{AuthorityUser, Grantee, Privileges};
use crate::source::DatabaseMetaData;

/// Provider type identifier.
pub const ALL_PERMITTED_PROVIDER_TYPE: &str = "ALL_PERMITTED";

/// Treats every configured user as fully privileged without consulting any
/// catalog. Unconfigured grantees are still unknown.
#[derive(Debug, Default)]
pub struct AllPermittedAuthorityProvider {
    slot: SnapshotSlot,
}

impl AllPermittedAuthorityProvider {
    /// Create a provider with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn install(&self, users: &[AuthorityUser]) {
        let privileges: PrivilegeMap = users
            .iter()
            .map(|u| (u.grantee().clone(), Privileges::all_permitted()))
            .collect();
        self.slot.install(privileges);
    }
}

impl AuthorityProvider for AllPermittedAuthorityProvider {
    fn provider_type(&self) -> &'static str {
        ALL_PERMITTED_PROVIDER_TYPE
    }

    fn initialize(
        &self,
        _databases: &HashMap<String, DatabaseMetaData>,
        users: &[AuthorityUser],
    ) -> AuthorityResult<()> {
        self.install(users);
        Ok(())
    }

    fn refresh(
        &self,
        _databases: &HashMap<String, DatabaseMetaData>,
        users: &[AuthorityUser],
    ) -> AuthorityResult<()> {
        self.install(users);
        Ok(())
    }

    fn find_privileges(&self, grantee: &Grantee) -> Option<Arc<Privileges>> {
        self.slot.load().get(grantee)
    }
}
