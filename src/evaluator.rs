//! Role access evaluator.
//!
//! Two questions are answered here, both fail-closed:
//!
//! - [`RoleAccessEvaluator::has_permission`]: may this role perform one
//!   specific action? Fine-grained, driven by the [`PermissionMatrix`].
//! - [`RoleAccessEvaluator::has_role`]: is this role at least as senior as
//!   another? Coarse, driven by the [`RoleHierarchy`].
//!
//! The two tables are independent. A junior role may hold a capability a
//! senior one lacks.
//!
//! Neither query errors. No current role, an unknown role, an unknown
//! capability or a missing table entry all answer `false`.

use lazy_static::lazy_static;
use serde::Serialize;
use tracing::{debug, trace};

use crate::capability::Capability;
use crate::permission_matrix::{Lookup, PermissionMatrix};
use crate::role::{Role, RoleHierarchy};

lazy_static! {
    static ref DEFAULT_EVALUATOR: RoleAccessEvaluator = RoleAccessEvaluator::product_defaults();
}

/// Why a permission check came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    NoCurrentRole,
    Granted,
    ExplicitlyDenied,
    RoleNotInMatrix,
    CapabilityNotListed,
    /// Raw identifier did not parse into a known role or capability.
    UnknownIdentifier,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::NoCurrentRole => "no_current_role",
            DecisionReason::Granted => "granted",
            DecisionReason::ExplicitlyDenied => "explicitly_denied",
            DecisionReason::RoleNotInMatrix => "role_not_in_matrix",
            DecisionReason::CapabilityNotListed => "capability_not_listed",
            DecisionReason::UnknownIdentifier => "unknown_identifier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl Decision {
    fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Pure evaluator over immutable tables.
#[derive(Debug, Clone)]
pub struct RoleAccessEvaluator {
    matrix: PermissionMatrix,
    hierarchy: RoleHierarchy,
}

impl RoleAccessEvaluator {
    pub fn new(matrix: PermissionMatrix, hierarchy: RoleHierarchy) -> Self {
        Self { matrix, hierarchy }
    }

    pub fn product_defaults() -> Self {
        Self::new(
            PermissionMatrix::product_defaults(),
            RoleHierarchy::product_defaults(),
        )
    }

    /// Shared evaluator over the product default tables.
    pub fn global() -> &'static RoleAccessEvaluator {
        &DEFAULT_EVALUATOR
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    pub fn has_permission(&self, current_role: Option<Role>, capability: Capability) -> bool {
        self.explain(current_role, capability).allowed
    }

    pub fn explain(&self, current_role: Option<Role>, capability: Capability) -> Decision {
        let Some(role) = current_role else {
            debug!(%capability, "permission denied: no current role");
            return Decision::deny(DecisionReason::NoCurrentRole);
        };

        let decision = match self.matrix.lookup(role, capability) {
            Lookup::Allowed => Decision {
                allowed: true,
                reason: DecisionReason::Granted,
            },
            Lookup::Denied => Decision::deny(DecisionReason::ExplicitlyDenied),
            Lookup::RoleMissing => Decision::deny(DecisionReason::RoleNotInMatrix),
            Lookup::CapabilityMissing => Decision::deny(DecisionReason::CapabilityNotListed),
        };

        if decision.allowed {
            trace!(%role, %capability, "permission granted");
        } else {
            debug!(%role, %capability, reason = ?decision.reason, "permission denied");
        }
        decision
    }

    /// Seniority gate: `level(current) >= level(required)`.
    pub fn has_role(&self, current_role: Option<Role>, required: Role) -> bool {
        let Some(role) = current_role else {
            debug!(%required, "role check failed: no current role");
            return false;
        };
        let ok = self.hierarchy.level(role) >= self.hierarchy.level(required);
        if !ok {
            debug!(
                %role,
                %required,
                level = self.hierarchy.level(role),
                required_level = self.hierarchy.level(required),
                "role check failed"
            );
        }
        ok
    }

    /// String form of [`Self::has_permission`]. Keys must match exactly;
    /// anything else is denied.
    pub fn has_permission_key(&self, current_role: Option<&str>, capability: &str) -> bool {
        self.explain_key(current_role, capability).allowed
    }

    pub fn explain_key(&self, current_role: Option<&str>, capability: &str) -> Decision {
        let Some(raw_role) = current_role else {
            return Decision::deny(DecisionReason::NoCurrentRole);
        };
        match (raw_role.parse::<Role>(), capability.parse::<Capability>()) {
            (Ok(role), Ok(cap)) => self.explain(Some(role), cap),
            _ => {
                debug!(role = raw_role, capability, "permission denied: unknown identifier");
                Decision::deny(DecisionReason::UnknownIdentifier)
            }
        }
    }

    /// String form of [`Self::has_role`]. An unparseable current role
    /// answers `false`. An unparseable *required* role also answers `false`,
    /// overriding the level-0 rule that would otherwise let any known role
    /// pass.
    pub fn has_role_key(&self, current_role: Option<&str>, required: &str) -> bool {
        let Some(raw_role) = current_role else {
            return false;
        };
        match (raw_role.parse::<Role>(), required.parse::<Role>()) {
            (Ok(role), Ok(required)) => self.has_role(Some(role), required),
            _ => {
                debug!(role = raw_role, required, "role check failed: unknown identifier");
                false
            }
        }
    }

    pub fn level(&self, role: Role) -> u32 {
        self.hierarchy.level(role)
    }

    /// Granted capabilities for `role`, in declaration order.
    pub fn capabilities_for(&self, role: Role) -> Vec<Capability> {
        Capability::ALL
            .iter()
            .copied()
            .filter(|cap| self.matrix.is_allowed(role, *cap))
            .collect()
    }

    /// Roles holding `capability`, in declaration order.
    pub fn roles_with(&self, capability: Capability) -> Vec<Role> {
        Role::ALL
            .iter()
            .copied()
            .filter(|role| self.matrix.is_allowed(*role, capability))
            .collect()
    }
}

impl Default for RoleAccessEvaluator {
    fn default() -> Self {
        Self::product_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn eval() -> RoleAccessEvaluator {
        RoleAccessEvaluator::product_defaults()
    }

    #[test]
    fn product_manager_can_delete_feature() {
        assert!(eval().has_permission(Some(Role::ProductManager), Capability::DeleteFeature));
    }

    #[test]
    fn executive_cannot_delete_feature() {
        assert!(!eval().has_permission(Some(Role::Executive), Capability::DeleteFeature));
    }

    #[test]
    fn customer_views_roadmap_but_cannot_create_goal() {
        let e = eval();
        assert!(e.has_permission(Some(Role::Customer), Capability::ViewRoadmap));
        assert!(!e.has_permission(Some(Role::Customer), Capability::CreateGoal));
    }

    #[test]
    fn executive_outranks_developer() {
        let e = eval();
        assert!(e.has_role(Some(Role::Executive), Role::Developer));
        assert!(!e.has_role(Some(Role::Developer), Role::Executive));
    }

    #[test]
    fn unknown_capability_key_is_denied() {
        assert!(!eval().has_permission_key(Some("product_manager"), "nonexistent_capability"));
        assert_eq!(
            eval().explain_key(Some("product_manager"), "nonexistent_capability").reason,
            DecisionReason::UnknownIdentifier
        );
    }

    #[test]
    fn non_canonical_spellings_are_denied() {
        let e = eval();
        assert!(!e.has_permission_key(Some(" PRODUCT-MANAGER "), "DELETE_FEATURE"));
        assert!(!e.has_permission_key(Some("product-manager"), "delete_feature"));
        assert!(!e.has_permission_key(Some("product_manager"), "Delete_Feature"));
        assert!(!e.has_role_key(Some("Executive"), "developer"));
        assert!(!e.has_role_key(Some("executive"), "DEVELOPER"));
        assert_eq!(
            e.explain_key(Some("Customer"), "view_roadmap").reason,
            DecisionReason::UnknownIdentifier
        );
    }

    #[test]
    fn unknown_role_key_is_denied() {
        let e = eval();
        assert!(!e.has_permission_key(Some("superuser"), "view_roadmap"));
        assert!(!e.has_role_key(Some("superuser"), "customer"));
        assert!(!e.has_role_key(Some("product_manager"), "superuser"));
        assert!(e.has_role_key(Some("product_manager"), "customer"));
    }

    #[test]
    fn no_role_denies_everything() {
        let e = eval();
        for cap in Capability::ALL {
            assert!(!e.has_permission(None, cap));
            assert_eq!(e.explain(None, cap).reason, DecisionReason::NoCurrentRole);
        }
        for role in Role::ALL {
            assert!(!e.has_role(None, role));
        }
        assert!(!e.has_permission_key(None, "view_roadmap"));
        assert!(!e.has_role_key(None, "customer"));
    }

    #[test]
    fn tables_may_disagree() {
        let e = eval();
        assert!(e.level(Role::Executive) > e.level(Role::Developer));
        assert!(e.has_permission(Some(Role::Developer), Capability::EditFeature));
        assert!(!e.has_permission(Some(Role::Executive), Capability::EditFeature));
    }

    #[test]
    fn explain_reports_reason() {
        let e = eval();
        assert_eq!(
            e.explain(Some(Role::ProductManager), Capability::AdminAccess).reason,
            DecisionReason::Granted
        );
        assert_eq!(
            e.explain(Some(Role::Developer), Capability::DeleteGoal).reason,
            DecisionReason::ExplicitlyDenied
        );
        assert_eq!(
            e.explain(Some(Role::Admin), Capability::AdminAccess).reason,
            DecisionReason::RoleNotInMatrix
        );
    }

    // Admin is on user records but in neither table. Until that is
    // settled it must stay denied everywhere.
    #[test]
    fn admin_is_denied_all_by_default() {
        let e = eval();
        for cap in Capability::ALL {
            assert!(!e.has_permission(Some(Role::Admin), cap), "{cap}");
        }
        for role in [Role::ProductManager, Role::Executive, Role::Developer, Role::Customer] {
            assert!(!e.has_role(Some(Role::Admin), role), "{role}");
        }
        assert!(e.capabilities_for(Role::Admin).is_empty());
    }

    #[test]
    fn injected_tables_replace_defaults() {
        let matrix = PermissionMatrix::new(BTreeMap::from([(
            Role::Admin,
            BTreeMap::from([(Capability::AdminAccess, true)]),
        )]));
        let hierarchy = RoleHierarchy::new(BTreeMap::from([(Role::Admin, 9)]));
        let e = RoleAccessEvaluator::new(matrix, hierarchy);

        assert!(e.has_permission(Some(Role::Admin), Capability::AdminAccess));
        assert_eq!(
            e.explain(Some(Role::Admin), Capability::ViewRoadmap).reason,
            DecisionReason::CapabilityNotListed
        );
        assert!(!e.has_permission(Some(Role::ProductManager), Capability::AdminAccess));
        assert!(e.has_role(Some(Role::Admin), Role::ProductManager));
    }

    #[test]
    fn introspection() {
        let e = eval();
        assert_eq!(
            e.capabilities_for(Role::Customer),
            vec![Capability::CreateFeedback, Capability::ViewRoadmap]
        );
        assert_eq!(
            e.roles_with(Capability::DeleteFeature),
            vec![Role::ProductManager]
        );
        assert_eq!(e.capabilities_for(Role::ProductManager).len(), Capability::ALL.len());
    }

    #[test]
    fn global_matches_defaults() {
        let g = RoleAccessEvaluator::global();
        assert_eq!(g.matrix(), &PermissionMatrix::product_defaults());
        assert_eq!(g.hierarchy(), &RoleHierarchy::product_defaults());
    }
}
