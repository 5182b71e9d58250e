//! Immutable privilege snapshots and the slot that publishes them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::loader::PrivilegeMap;
use crate::model::{Grantee, Privileges};

/// One complete, immutable privilege view.
#[derive(Debug, Default)]
pub struct PrivilegeSnapshot {
    generation: u64,
    entries: HashMap<Grantee, Arc<Privileges>>,
}

impl PrivilegeSnapshot {
    fn new(generation: u64, privileges: PrivilegeMap) -> Self {
        Self {
            generation,
            entries: privileges
                .into_iter()
                .map(|(g, p)| (g, Arc::new(p)))
                .collect(),
        }
    }

    /// Number of loads installed before and including this one. Zero means
    /// nothing was ever loaded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Privileges of an exact grantee.
    pub fn get(&self, grantee: &Grantee) -> Option<Arc<Privileges>> {
        self.entries.get(grantee).cloned()
    }

    /// Grantees in this snapshot, sorted.
    pub fn grantees(&self) -> Vec<&Grantee> {
        let mut grantees: Vec<&Grantee> = self.entries.keys().collect();
        grantees.sort();
        grantees
    }

    /// Number of grantees.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no grantee.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Holder of the current snapshot.
///
/// The write lock is only taken to swap the pointer; readers clone the
/// `Arc` and keep a consistent view for as long as they hold it.
#[derive(Debug, Default)]
pub struct SnapshotSlot {
    current: RwLock<Arc<PrivilegeSnapshot>>,
}

impl SnapshotSlot {
    /// Create a slot holding the empty generation-zero snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot.
    pub fn load(&self) -> Arc<PrivilegeSnapshot> {
        Arc::clone(&*self.current.read())
    }

    /// Publish a new snapshot built from `privileges`. Returns its generation.
    pub fn install(&self, privileges: PrivilegeMap) -> u64 {
        let mut snapshot = PrivilegeSnapshot::new(0, privileges);
        let previous = {
            let mut current = self.current.write();
            snapshot.generation = current.generation + 1;
            std::mem::replace(&mut *current, Arc::new(snapshot))
        };
        // The old generation is freed here unless a reader still holds it.
        previous.generation + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrivilegeType;

    fn root() -> Grantee {
        Grantee::new("root", "localhost").unwrap()
    }

    #[test]
    fn test_slot_starts_empty() {
        let slot = SnapshotSlot::new();
        let snapshot = slot.load();
        assert_eq!(snapshot.generation(), 0);
        assert!(snapshot.is_empty());
        assert!(snapshot.get(&root()).is_none());
    }

    #[test]
    fn test_install_replaces_whole_snapshot() {
        let slot = SnapshotSlot::new();

        let mut first = PrivilegeMap::new();
        first.insert(root(), Privileges::new());
        assert_eq!(slot.install(first), 1);
        let old = slot.load();

        let mut granted = Privileges::new();
        granted.add_global(PrivilegeType::Super);
        let mut second = PrivilegeMap::new();
        second.insert(root(), granted);
        assert_eq!(slot.install(second), 2);

        // A reader holding the old snapshot keeps seeing it unchanged.
        assert!(!old.get(&root()).unwrap().has_privileges(&[PrivilegeType::Super]));
        assert!(slot
            .load()
            .get(&root())
            .unwrap()
            .has_privileges(&[PrivilegeType::Super]));
    }

    #[test]
    fn test_grantees_sorted() {
        let slot = SnapshotSlot::new();
        let mut map = PrivilegeMap::new();
        map.insert(Grantee::new("b", "%").unwrap(), Privileges::new());
        map.insert(Grantee::new("a", "%").unwrap(), Privileges::new());
        slot.install(map);

        let snapshot = slot.load();
        let grantees = snapshot.grantees();
        let names: Vec<&str> = grantees.iter().map(|g| g.username()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
