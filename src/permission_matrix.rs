use std::collections::BTreeMap;

use crate::capability::Capability;
use crate::role::Role;

/// Static (role, capability) -> allowed table.
///
/// Entries may be explicitly `false`. Anything missing reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMatrix {
    grants: BTreeMap<Role, BTreeMap<Capability, bool>>,
}

/// Where a lookup landed. Used by the evaluator to explain a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Allowed,
    Denied,
    RoleMissing,
    CapabilityMissing,
}

impl PermissionMatrix {
    pub fn new(grants: BTreeMap<Role, BTreeMap<Capability, bool>>) -> Self {
        Self { grants }
    }

    /// Product defaults. Every listed role carries an explicit entry for
    /// every capability; `admin` has no row at all.
    pub fn product_defaults() -> Self {
        use Capability::*;

        let executive = [
            CreateGoal,
            EditGoal,
            CreateInitiative,
            EditInitiative,
            CreateFeedback,
            ViewRoadmap,
            ViewAnalytics,
            ViewFeedback,
        ];
        let developer = [
            EditFeature,
            EditEpic,
            CreateTask,
            EditTask,
            CreateFeedback,
            ViewRoadmap,
            ViewFeedback,
        ];
        let customer = [ViewRoadmap, CreateFeedback];

        let mut grants = BTreeMap::new();
        grants.insert(Role::ProductManager, full_row(&Capability::ALL));
        grants.insert(Role::Executive, full_row(&executive));
        grants.insert(Role::Developer, full_row(&developer));
        grants.insert(Role::Customer, full_row(&customer));
        Self { grants }
    }

    pub fn lookup(&self, role: Role, capability: Capability) -> Lookup {
        match self.grants.get(&role) {
            None => Lookup::RoleMissing,
            Some(row) => match row.get(&capability) {
                None => Lookup::CapabilityMissing,
                Some(true) => Lookup::Allowed,
                Some(false) => Lookup::Denied,
            },
        }
    }

    pub fn is_allowed(&self, role: Role, capability: Capability) -> bool {
        matches!(self.lookup(role, capability), Lookup::Allowed)
    }

    pub fn row(&self, role: Role) -> Option<&BTreeMap<Capability, bool>> {
        self.grants.get(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.grants.keys().copied()
    }
}

/// One row: `true` for each granted key, explicit `false` for the rest.
fn full_row(granted: &[Capability]) -> BTreeMap<Capability, bool> {
    Capability::ALL
        .iter()
        .map(|cap| (*cap, granted.contains(cap)))
        .collect()
}
