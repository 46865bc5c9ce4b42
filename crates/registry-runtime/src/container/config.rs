//! # Runtime Configuration
//!
//! Which regions get a partition, which organization speaks for the
//! authority, and where the access policy comes from.
//!
//! ## Environment
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `LR_REGIONS` | Comma-separated region codes or names | `TS,KA` |
//! | `LR_AUTHORITY_ORG` | Authority organization identity | `AuthorityMSP` |
//! | `LR_ACCESS_POLICY` | Path to a JSON access policy | built-in policy |
//! | `LR_ABANDON_AFTER_SECS` | Draft abandonment threshold | 7 days |
//! | `LR_METRICS_PORT` | Prometheus exposition port, `off` to disable | `9100` |

use std::path::PathBuf;

use lr_01_access_control::domain::DEFAULT_AUTHORITY_ORGANIZATION;
use lr_01_access_control::AccessPolicy;
use lr_05_region_ledger::config::DEFAULT_ABANDON_AFTER_SECS;
use lr_05_region_ledger::RegionLedgerConfig;
use serde::{Deserialize, Serialize};
use shared_types::RegionCode;
use thiserror::Error;

/// Regions wired when `LR_REGIONS` is unset.
pub const DEFAULT_REGIONS: [&str; 2] = ["TS", "KA"];

/// Port `/metrics` is served on when `LR_METRICS_PORT` is unset.
pub const DEFAULT_METRICS_PORT: u16 = 9100;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured region did not parse.
    #[error("invalid region '{raw}' in {source_name}: {reason}")]
    InvalidRegion {
        /// Where the value came from
        source_name: String,
        /// Raw value
        raw: String,
        /// Parse failure
        reason: String,
    },

    /// No regions configured.
    #[error("no regions configured; set LR_REGIONS")]
    NoRegions,

    /// The access policy file could not be used.
    #[error("access policy {path}: {reason}")]
    AccessPolicy {
        /// Policy file
        path: String,
        /// Read or parse failure
        reason: String,
    },

    /// A numeric variable did not parse.
    #[error("invalid value '{raw}' for {variable}")]
    InvalidNumber {
        /// Variable name
        variable: String,
        /// Raw value
        raw: String,
    },
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Regions that get their own partition, in configuration order.
    pub regions: Vec<RegionCode>,
    /// Organization identity whose callers may record verdicts on regions.
    pub authority_organization: String,
    /// Optional JSON access policy replacing the built-in one.
    pub access_policy_path: Option<PathBuf>,
    /// Age at which an unbound draft is reported as abandoned.
    pub abandon_after_secs: u64,
    /// Port for the Prometheus exposition; `None` serves nothing.
    pub metrics_port: Option<u16>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            regions: DEFAULT_REGIONS
                .iter()
                .filter_map(|code| RegionCode::parse(code).ok())
                .collect(),
            authority_organization: DEFAULT_AUTHORITY_ORGANIZATION.to_string(),
            access_policy_path: None,
            abandon_after_secs: DEFAULT_ABANDON_AFTER_SECS,
            metrics_port: Some(DEFAULT_METRICS_PORT),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("LR_REGIONS") {
            config.regions = parse_regions(&raw, "LR_REGIONS")?;
        }
        if let Some(org) = lookup("LR_AUTHORITY_ORG").filter(|org| !org.trim().is_empty()) {
            config.authority_organization = org.trim().to_string();
        }
        if let Some(path) = lookup("LR_ACCESS_POLICY").filter(|p| !p.trim().is_empty()) {
            config.access_policy_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(raw) = lookup("LR_ABANDON_AFTER_SECS") {
            config.abandon_after_secs =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber {
                        variable: "LR_ABANDON_AFTER_SECS".into(),
                        raw: raw.clone(),
                    })?;
        }
        if let Some(raw) = lookup("LR_METRICS_PORT") {
            config.metrics_port = parse_port(&raw, "LR_METRICS_PORT")?;
        }

        Ok(config)
    }

    /// Create config for testing: TS and KA, built-in policy, one-hour
    /// abandonment, no metrics listener.
    pub fn for_testing() -> Self {
        Self {
            abandon_after_secs: 60 * 60,
            metrics_port: None,
            ..Self::default()
        }
    }

    /// Access policy in force: the configured file, or the built-in policy
    /// bound to the authority organization.
    pub fn access_policy(&self) -> Result<AccessPolicy, ConfigError> {
        let Some(path) = &self.access_policy_path else {
            return Ok(AccessPolicy::with_authority_organization(
                &self.authority_organization,
            ));
        };

        let policy_error = |reason: String| ConfigError::AccessPolicy {
            path: path.display().to_string(),
            reason,
        };
        let json = std::fs::read_to_string(path).map_err(|e| policy_error(e.to_string()))?;
        AccessPolicy::from_json(&json).map_err(|e| policy_error(e.to_string()))
    }

    /// Ledger configuration for one region partition.
    pub fn region_ledger(&self, region: &RegionCode) -> RegionLedgerConfig {
        RegionLedgerConfig {
            abandon_after_secs: self.abandon_after_secs,
            ..RegionLedgerConfig::for_region(region.clone())
        }
    }
}

/// Organization identity of a region's own callers.
pub fn region_organization(region: &RegionCode) -> String {
    format!("{}OrgMSP", region.as_str())
}

/// `off` or an empty value disables the listener.
fn parse_port(raw: &str, variable: &str) -> Result<Option<u16>, ConfigError> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber {
            variable: variable.to_string(),
            raw: raw.to_string(),
        })
}

/// Parse a comma-separated region list; duplicates collapse to the first.
fn parse_regions(raw: &str, source_name: &str) -> Result<Vec<RegionCode>, ConfigError> {
    let mut regions: Vec<RegionCode> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let region = RegionCode::parse(part).map_err(|e| ConfigError::InvalidRegion {
            source_name: source_name.to_string(),
            raw: part.to_string(),
            reason: e.to_string(),
        })?;
        if !regions.contains(&region) {
            regions.push(region);
        }
    }
    if regions.is_empty() {
        return Err(ConfigError::NoRegions);
    }
    Ok(regions)
}
