//! Library root for the `planpulse_access` crate
//!
//! Role-based access control for PlanPulse: a fail-closed evaluator over a
//! static permission matrix and role hierarchy, the current-user
//! collaborator it reads roles from, and the configuration that builds its
//! tables.

// Core error handling
pub mod errors;

// Identifiers
pub mod capability;
pub mod role;

// Tables & evaluation
pub mod evaluator;
pub mod permission_matrix;

// Session & gating
pub mod guard;
pub mod session;

// Configuration & CLI
pub mod cli;
pub mod config_loader;

pub use capability::Capability;
pub use errors::{PlanPulseError, PlanPulseResult};
pub use evaluator::{Decision, DecisionReason, RoleAccessEvaluator};
pub use guard::AccessGuard;
pub use permission_matrix::PermissionMatrix;
pub use role::{Role, RoleHierarchy};
pub use session::{CurrentUserProvider, MockSession, User};
