//! Error handling for the outer layers of the access crate.
//!
//! The evaluator itself never errors. These types are used by identifier
//! parsing, configuration loading, the mock session and the `require_*`
//! helpers on the guard.

use thiserror::Error;

use crate::capability::Capability;
use crate::role::Role;

#[derive(Error, Debug)]
pub enum PlanPulseError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown role: '{value}'")]
    UnknownRole { value: String },

    #[error("Unknown capability: '{value}'")]
    UnknownCapability { value: String },

    #[error("Unknown user: '{id}'")]
    UnknownUser { id: String },

    #[error("No user is signed in")]
    Unauthenticated,

    #[error("Permission denied: {role} may not {capability}")]
    PermissionDenied { role: Role, capability: Capability },

    #[error("Insufficient role: required {required}, got {actual}")]
    InsufficientRole { required: Role, actual: Role },

    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: String },

    #[error("Serialization failed: {context} - {message}")]
    Serialization { context: String, message: String },
}

pub type PlanPulseResult<T> = Result<T, PlanPulseError>;

impl PlanPulseError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn unknown_role(value: impl Into<String>) -> Self {
        Self::UnknownRole {
            value: value.into(),
        }
    }

    pub fn unknown_capability(value: impl Into<String>) -> Self {
        Self::UnknownCapability {
            value: value.into(),
        }
    }

    pub fn unknown_user(id: impl Into<String>) -> Self {
        Self::UnknownUser { id: id.into() }
    }

    pub fn lock_poisoned(resource: impl Into<String>) -> Self {
        Self::LockPoisoned {
            resource: resource.into(),
        }
    }

    pub fn serialization(context: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Serialization {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

/// Read-lock helper returning a [`PlanPulseError`] on poison.
pub trait SafeReadLock<T: ?Sized> {
    fn safe_read(&self) -> PlanPulseResult<std::sync::RwLockReadGuard<'_, T>>;
}

impl<T: ?Sized> SafeReadLock<T> for std::sync::RwLock<T> {
    fn safe_read(&self) -> PlanPulseResult<std::sync::RwLockReadGuard<'_, T>> {
        self.read()
            .map_err(|_| PlanPulseError::lock_poisoned("rwlock_read"))
    }
}

/// Write-lock helper returning a [`PlanPulseError`] on poison.
pub trait SafeWriteLock<T: ?Sized> {
    fn safe_write(&self) -> PlanPulseResult<std::sync::RwLockWriteGuard<'_, T>>;
}

impl<T: ?Sized> SafeWriteLock<T> for std::sync::RwLock<T> {
    fn safe_write(&self) -> PlanPulseResult<std::sync::RwLockWriteGuard<'_, T>> {
        self.write()
            .map_err(|_| PlanPulseError::lock_poisoned("rwlock_write"))
    }
}

impl From<figment::Error> for PlanPulseError {
    fn from(err: figment::Error) -> Self {
        PlanPulseError::config(err.to_string())
    }
}

impl From<serde_json::Error> for PlanPulseError {
    fn from(err: serde_json::Error) -> Self {
        PlanPulseError::serialization("json", err)
    }
}

impl From<toml::ser::Error> for PlanPulseError {
    fn from(err: toml::ser::Error) -> Self {
        PlanPulseError::serialization("toml", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PlanPulseError::config("missing table");
        assert!(err.to_string().contains("Configuration error"));

        let err = PlanPulseError::PermissionDenied {
            role: Role::Executive,
            capability: Capability::DeleteFeature,
        };
        assert_eq!(
            err.to_string(),
            "Permission denied: executive may not delete_feature"
        );
    }

    #[test]
    fn test_insufficient_role_message() {
        let err = PlanPulseError::InsufficientRole {
            required: Role::Executive,
            actual: Role::Developer,
        };
        assert!(err.to_string().contains("required executive, got developer"));
    }
}
