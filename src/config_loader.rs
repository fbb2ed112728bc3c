use std::collections::BTreeMap;
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::capability::Capability;
use crate::errors::{PlanPulseError, PlanPulseResult};
use crate::evaluator::RoleAccessEvaluator;
use crate::permission_matrix::PermissionMatrix;
use crate::role::{Role, RoleHierarchy};

pub const DEFAULT_CONFIG_FILE: &str = "planpulse.toml";
pub const ENV_PREFIX: &str = "PLANPULSE_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlanPulseConfig {
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Access tables in their configuration form, keyed by identifier
/// strings. [`AccessConfig::build`] turns them into typed tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub permissions: BTreeMap<String, BTreeMap<String, bool>>,
    #[serde(default)]
    pub hierarchy: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig::from_tables(
            &PermissionMatrix::product_defaults(),
            &RoleHierarchy::product_defaults(),
        )
    }
}

impl AccessConfig {
    pub fn from_tables(matrix: &PermissionMatrix, hierarchy: &RoleHierarchy) -> Self {
        let permissions = matrix
            .roles()
            .filter_map(|role| {
                matrix.row(role).map(|row| {
                    let row = row
                        .iter()
                        .map(|(cap, allowed)| (cap.as_str().to_string(), *allowed))
                        .collect();
                    (role.as_str().to_string(), row)
                })
            })
            .collect();
        let hierarchy = hierarchy
            .iter()
            .map(|(role, level)| (role.as_str().to_string(), level))
            .collect();
        Self {
            permissions,
            hierarchy,
        }
    }

    /// Validate identifiers and build the typed tables. Any unknown or
    /// non-canonical role or capability key is rejected here, once, at load
    /// time. Keys must be spelled exactly as the defaults spell them, so two
    /// spellings can never collapse onto one entry.
    pub fn build(&self) -> PlanPulseResult<RoleAccessEvaluator> {
        let mut grants: BTreeMap<Role, BTreeMap<Capability, bool>> = BTreeMap::new();
        for (raw_role, row) in &self.permissions {
            let role = parse_key::<Role>(raw_role, "access.permissions")?;
            let entry = grants.entry(role).or_default();
            for (raw_cap, allowed) in row {
                let cap = parse_key::<Capability>(raw_cap, &format!("access.permissions.{raw_role}"))?;
                entry.insert(cap, *allowed);
            }
        }

        let mut levels = BTreeMap::new();
        for (raw_role, level) in &self.hierarchy {
            levels.insert(parse_key::<Role>(raw_role, "access.hierarchy")?, *level);
        }

        Ok(RoleAccessEvaluator::new(
            PermissionMatrix::new(grants),
            RoleHierarchy::new(levels),
        ))
    }
}

fn parse_key<T>(raw: &str, section: &str) -> PlanPulseResult<T>
where
    T: std::str::FromStr<Err = PlanPulseError>,
{
    raw.parse::<T>()
        .map_err(|e| PlanPulseError::config(format!("{section}: {e}")))
}

impl PlanPulseConfig {
    pub fn evaluator(&self) -> PlanPulseResult<RoleAccessEvaluator> {
        self.access.build()
    }
}

/// Layered load: built-in defaults, then the TOML file, then
/// `PLANPULSE_` environment variables (`__` separates nested keys).
///
/// An explicit `path` must exist. Without one, `planpulse.toml` in the
/// working directory is used if present.
pub fn load_config(path: Option<&Path>) -> PlanPulseResult<PlanPulseConfig> {
    let file = match path {
        Some(p) if !p.exists() => {
            return Err(PlanPulseError::config(format!(
                "config file not found: {}",
                p.display()
            )));
        }
        Some(p) => p.to_path_buf(),
        None => Path::new(DEFAULT_CONFIG_FILE).to_path_buf(),
    };

    let figment = Figment::from(Serialized::defaults(PlanPulseConfig::default()))
        .merge(Toml::file(&file))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: PlanPulseConfig = figment.extract()?;

    // Surface identifier typos now rather than as silent denials later.
    config.access.build()?;

    info!(
        file = %file.display(),
        roles = config.access.permissions.len(),
        "access configuration loaded"
    );
    Ok(config)
}
