//! Current-user collaborator.
//!
//! Sign-in is a local state swap over a fixed user directory; there are no
//! credentials.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{PlanPulseError, PlanPulseResult, SafeReadLock, SafeWriteLock};
use crate::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn new(id: &str, name: &str, email: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        }
    }
}

/// Supplies the active user, if any. Must be resolved and synchronous by
/// the time it is asked.
pub trait CurrentUserProvider {
    fn current_user(&self) -> Option<User>;

    fn current_role(&self) -> Option<Role> {
        self.current_user().map(|u| u.role)
    }
}

impl CurrentUserProvider for User {
    fn current_user(&self) -> Option<User> {
        Some(self.clone())
    }
}

impl CurrentUserProvider for Option<User> {
    fn current_user(&self) -> Option<User> {
        self.clone()
    }
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub session_id: String,
    pub signed_in_at: DateTime<Utc>,
}

/// In-memory session over a fixed user directory.
pub struct MockSession {
    directory: Vec<User>,
    current: RwLock<Option<SignedIn>>,
}

impl MockSession {
    pub fn new(directory: Vec<User>) -> Self {
        Self {
            directory,
            current: RwLock::new(None),
        }
    }

    /// One demo account per role, including an `admin` record.
    pub fn with_demo_users() -> Self {
        Self::new(demo_users())
    }

    pub fn directory(&self) -> &[User] {
        &self.directory
    }

    pub fn login(&self, user_id: &str) -> PlanPulseResult<User> {
        let user = self
            .directory
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| PlanPulseError::unknown_user(user_id))?;
        self.sign_in(user)
    }

    /// Signs in the first directory user holding `role`.
    pub fn login_as(&self, role: Role) -> PlanPulseResult<User> {
        let user = self
            .directory
            .iter()
            .find(|u| u.role == role)
            .cloned()
            .ok_or_else(|| PlanPulseError::unknown_user(format!("<any {role}>")))?;
        self.sign_in(user)
    }

    pub fn logout(&self) -> PlanPulseResult<()> {
        let mut current = self.current.safe_write()?;
        if let Some(prev) = current.take() {
            info!(user_id = %prev.user.id, session_id = %prev.session_id, "signed out");
        }
        Ok(())
    }

    pub fn signed_in(&self) -> PlanPulseResult<Option<SignedIn>> {
        Ok(self.current.safe_read()?.clone())
    }

    fn sign_in(&self, user: User) -> PlanPulseResult<User> {
        let entry = SignedIn {
            user: user.clone(),
            session_id: Uuid::new_v4().to_string(),
            signed_in_at: Utc::now(),
        };
        info!(user_id = %user.id, role = %user.role, session_id = %entry.session_id, "signed in");
        *self.current.safe_write()? = Some(entry);
        Ok(user)
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::with_demo_users()
    }
}

impl CurrentUserProvider for MockSession {
    fn current_user(&self) -> Option<User> {
        match self.current.safe_read() {
            Ok(current) => current.as_ref().map(|s| s.user.clone()),
            Err(e) => {
                // Poisoned session reads as nobody signed in.
                warn!(error = %e, "session unreadable");
                None
            }
        }
    }
}

pub fn demo_users() -> Vec<User> {
    vec![
        User::new("1", "Priya Natarajan", "priya@planpulse.dev", Role::ProductManager),
        User::new("2", "Marcus Hale", "marcus@planpulse.dev", Role::Executive),
        User::new("3", "Dana Okafor", "dana@planpulse.dev", Role::Developer),
        User::new("4", "Lee Customer", "lee@customer.example", Role::Customer),
        User::new("5", "Sam Admin", "admin@planpulse.dev", Role::Admin),
    ]
}
