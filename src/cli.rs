use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::capability::Capability;
use crate::config_loader::{AccessConfig, PlanPulseConfig};
use crate::errors::PlanPulseResult;
use crate::evaluator::RoleAccessEvaluator;
use crate::guard::AccessGuard;
use crate::role::Role;
use crate::session::MockSession;

/// Top-level CLI interface for PlanPulse access tables
#[derive(Parser, Debug)]
#[command(
    name = "planpulse",
    version,
    about = "Inspect and query PlanPulse role permissions"
)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./planpulse.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask whether a role holds a capability
    Check {
        #[arg(short, long)]
        role: String,
        #[arg(short, long)]
        capability: String,
    },

    /// Ask whether a role is at least as senior as another
    HasRole {
        #[arg(short, long)]
        role: String,
        #[arg(long)]
        required: String,
    },

    /// Print the effective permission matrix
    Matrix {
        #[arg(long, value_enum, default_value_t = MatrixFormat::Table)]
        format: MatrixFormat,
    },

    /// Print the role hierarchy, most senior first
    Roles,

    /// List the demo user directory
    Users,

    /// Sign in a demo user and list what they may do
    Whoami {
        #[arg(short, long)]
        user: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MatrixFormat {
    Table,
    Json,
    Toml,
}

pub fn dispatch(
    cli: &Cli,
    config: &PlanPulseConfig,
    evaluator: &RoleAccessEvaluator,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Check { role, capability } => {
            let decision = evaluator.explain_key(Some(role.as_str()), capability);
            let verdict = if decision.allowed { "allow" } else { "deny" };
            writeln!(out, "{verdict} ({})", decision.reason.as_str())?;
        }
        Commands::HasRole { role, required } => {
            writeln!(out, "{}", evaluator.has_role_key(Some(role.as_str()), required))?;
        }
        Commands::Matrix { format } => {
            write!(out, "{}", render_matrix(&config.access, evaluator, *format)?)?;
        }
        Commands::Roles => {
            for (role, level) in evaluator.hierarchy().ranked() {
                writeln!(out, "{level:>3}  {role}")?;
            }
        }
        Commands::Users => {
            let session = MockSession::with_demo_users();
            for u in session.directory() {
                writeln!(out, "{:>3}  {:<16} {} <{}>", u.id, u.role.as_str(), u.name, u.email)?;
            }
        }
        Commands::Whoami { user } => {
            let session = MockSession::with_demo_users();
            let signed_in = session.login(user)?;
            let guard = AccessGuard::new(evaluator, &session);
            writeln!(
                out,
                "{} <{}> role={} level={}",
                signed_in.name,
                signed_in.email,
                signed_in.role,
                evaluator.level(signed_in.role)
            )?;
            let granted: Vec<&str> = Capability::ALL
                .iter()
                .filter(|cap| guard.can(**cap))
                .map(|cap| cap.as_str())
                .collect();
            if granted.is_empty() {
                writeln!(out, "  (no capabilities)")?;
            }
            for cap in granted {
                writeln!(out, "  {cap}")?;
            }
        }
    }
    Ok(())
}

pub fn render_matrix(
    access: &AccessConfig,
    evaluator: &RoleAccessEvaluator,
    format: MatrixFormat,
) -> PlanPulseResult<String> {
    match format {
        MatrixFormat::Json => Ok(serde_json::to_string_pretty(&access.permissions)? + "\n"),
        MatrixFormat::Toml => Ok(toml::to_string(access)?),
        MatrixFormat::Table => {
            let roles: Vec<Role> = Role::ALL.to_vec();
            let width = Capability::ALL
                .iter()
                .map(|c| c.as_str().len())
                .max()
                .unwrap_or(0);
            let mut s = format!("{:width$}", "");
            for role in &roles {
                s.push_str(&format!("  {role}"));
            }
            s.push('\n');
            for cap in Capability::ALL {
                s.push_str(&format!("{:width$}", cap.as_str()));
                for role in &roles {
                    let mark = if evaluator.has_permission(Some(*role), cap) { "x" } else { "-" };
                    s.push_str(&format!("  {:^w$}", mark, w = role.as_str().len()));
                }
                s.push('\n');
            }
            Ok(s)
        }
    }
}
