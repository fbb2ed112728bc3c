use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PlanPulseError;

/// Role assigned to a user when the account is created.
///
/// The declaration order carries no meaning; seniority comes from a
/// [`RoleHierarchy`] so that deployments can rank roles differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ProductManager,
    Executive,
    Developer,
    Customer,
    /// Present on user records only. Absent from the default tables.
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::ProductManager,
        Role::Executive,
        Role::Developer,
        Role::Customer,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ProductManager => "product_manager",
            Role::Executive => "executive",
            Role::Developer => "developer",
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = PlanPulseError;

    /// Exact match on the snake_case name. No trimming or case folding.
    fn from_str(input: &str) -> Result<Role, Self::Err> {
        match input {
            "product_manager" => Ok(Role::ProductManager),
            "executive" => Ok(Role::Executive),
            "developer" => Ok(Role::Developer),
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            _ => Err(PlanPulseError::unknown_role(input)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seniority level per role. Higher is more senior; a role without an
/// entry sits at level 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleHierarchy {
    levels: BTreeMap<Role, u32>,
}

impl RoleHierarchy {
    pub fn new(levels: BTreeMap<Role, u32>) -> Self {
        Self { levels }
    }

    /// Product defaults. `admin` is intentionally left out.
    pub fn product_defaults() -> Self {
        let mut levels = BTreeMap::new();
        levels.insert(Role::ProductManager, 4);
        levels.insert(Role::Executive, 3);
        levels.insert(Role::Developer, 2);
        levels.insert(Role::Customer, 1);
        Self { levels }
    }

    pub fn level(&self, role: Role) -> u32 {
        self.levels.get(&role).copied().unwrap_or(0)
    }

    /// Whether `role` has an explicit level.
    pub fn contains(&self, role: Role) -> bool {
        self.levels.contains_key(&role)
    }

    /// Ranked roles, most senior first. Ties keep declaration order.
    pub fn ranked(&self) -> Vec<(Role, u32)> {
        let mut ranked: Vec<(Role, u32)> = self.levels.iter().map(|(r, l)| (*r, *l)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, u32)> + '_ {
        self.levels.iter().map(|(r, l)| (*r, *l))
    }
}
