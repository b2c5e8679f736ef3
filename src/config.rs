//! Relay configuration, built from the deployment environment.

use crate::error::ConfigError;

/// Default liveness marker path (matches the deployment health check).
const DEFAULT_LIVENESS_FILE: &str = "/tmp/liveness";

/// Distro tag whose package mapping we act on in version-update events.
const DEFAULT_TARGET_DISTRO: &str = "CentOS";

/// When the dist-git push spec-file gate applies.
///
/// Some deployments only want pushes that touch a spec file; others relay
/// every push. `ProjectPrefix` reproduces the historical behavior of gating
/// only when the deployment project name starts with `packit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecfileGate {
    /// Gate every push on a spec-file change.
    Always,
    /// Gate only when `RelayConfig::project` starts with `packit`.
    ProjectPrefix,
    /// Never gate; relay every push.
    Never,
}

impl SpecfileGate {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "always" => Ok(Self::Always),
            "project-prefix" => Ok(Self::ProjectPrefix),
            "never" => Ok(Self::Never),
            other => Err(ConfigError::InvalidValue {
                key: "SPECFILE_GATE".into(),
                message: format!("unknown gate policy '{other}'"),
            }),
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Deployment indicator ("prod", "stg", ...).
    pub deployment: String,
    /// Account whose activity counts as our own automation.
    pub automation_user: String,
    /// Deployment project name (used by the `ProjectPrefix` gate policy).
    pub project: String,
    /// Distro tag to select in dependency-update package mappings.
    pub target_distro: String,
    /// Push spec-file gate policy.
    pub specfile_gate: SpecfileGate,
    /// Liveness marker file touched on every routed message.
    pub liveness_file: String,
    /// Task queue broker endpoint.
    pub broker_url: String,
    /// Message bus bridge endpoint.
    pub bus_url: String,
}

impl RelayConfig {
    /// Build config from environment variables.
    ///
    /// The automation identity is derived from `DEPLOYMENT`: staging runs as
    /// `packit-stg`, everything else as `packit`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let deployment = std::env::var("DEPLOYMENT").unwrap_or_default();
        let automation_user = match deployment.as_str() {
            "stg" => "packit-stg",
            _ => "packit",
        }
        .to_string();

        let project = std::env::var("PROJECT").unwrap_or_default();

        let target_distro =
            std::env::var("TARGET_DISTRO").unwrap_or_else(|_| DEFAULT_TARGET_DISTRO.to_string());

        let specfile_gate = match std::env::var("SPECFILE_GATE") {
            Ok(value) => SpecfileGate::parse(&value)?,
            Err(_) => SpecfileGate::ProjectPrefix,
        };

        let liveness_file =
            std::env::var("LIVENESS_FILE").unwrap_or_else(|_| DEFAULT_LIVENESS_FILE.to_string());

        let broker_url = std::env::var("BROKER_URL")
            .map_err(|_| ConfigError::MissingEnvVar("BROKER_URL".into()))?;

        let bus_url =
            std::env::var("BUS_URL").map_err(|_| ConfigError::MissingEnvVar("BUS_URL".into()))?;

        Ok(Self {
            deployment,
            automation_user,
            project,
            target_distro,
            specfile_gate,
            liveness_file,
            broker_url,
            bus_url,
        })
    }
}
