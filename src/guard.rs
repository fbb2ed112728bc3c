use crate::capability::Capability;
use crate::errors::{PlanPulseError, PlanPulseResult};
use crate::evaluator::RoleAccessEvaluator;
use crate::role::Role;
use crate::session::CurrentUserProvider;

/// Evaluator bound to a current-user provider.
///
/// The role is read from the provider on every check, so a sign-in swap
/// is visible to the very next call.
pub struct AccessGuard<'a, P: CurrentUserProvider + ?Sized> {
    evaluator: &'a RoleAccessEvaluator,
    provider: &'a P,
}

impl<'a, P: CurrentUserProvider + ?Sized> AccessGuard<'a, P> {
    pub fn new(evaluator: &'a RoleAccessEvaluator, provider: &'a P) -> Self {
        Self {
            evaluator,
            provider,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.evaluator
            .has_permission(self.provider.current_role(), capability)
    }

    pub fn at_least(&self, required: Role) -> bool {
        self.evaluator
            .has_role(self.provider.current_role(), required)
    }

    /// Gate for mutations.
    pub fn require(&self, capability: Capability) -> PlanPulseResult<()> {
        let role = self
            .provider
            .current_role()
            .ok_or(PlanPulseError::Unauthenticated)?;
        if self.evaluator.has_permission(Some(role), capability) {
            Ok(())
        } else {
            Err(PlanPulseError::PermissionDenied { role, capability })
        }
    }

    pub fn require_role(&self, required: Role) -> PlanPulseResult<()> {
        let actual = self
            .provider
            .current_role()
            .ok_or(PlanPulseError::Unauthenticated)?;
        if self.evaluator.has_role(Some(actual), required) {
            Ok(())
        } else {
            Err(PlanPulseError::InsufficientRole { required, actual })
        }
    }
}
