//! Scheduler settings exposed to rule expressions.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

/// Scheduler configuration (env-driven).
///
/// The whole struct is placed into the evaluation context under `config`,
/// so rules can branch on region or tier layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Region the scheduler runs in (example: us-east-1).
    pub region: String,

    /// Cell/stack name, for rules that differ between cells.
    pub stack: String,

    /// Tier names from most to least preferred.
    pub tier_order: Vec<String>,

    /// Whether tasks may consume opportunistic CPUs.
    pub opportunistic_cpus_enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            region: "local".to_string(),
            stack: "main".to_string(),
            tier_order: vec!["critical".to_string(), "flex".to_string()],
            opportunistic_cpus_enabled: false,
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let region = lookup("GANTRY_SCHEDULER_REGION").unwrap_or(defaults.region);

        let stack = lookup("GANTRY_SCHEDULER_STACK").unwrap_or(defaults.stack);

        let tier_order = match lookup("GANTRY_SCHEDULER_TIER_ORDER") {
            Some(raw) => {
                let tiers: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect();
                anyhow::ensure!(
                    !tiers.is_empty(),
                    "GANTRY_SCHEDULER_TIER_ORDER must list at least one tier."
                );
                tiers
            }
            None => defaults.tier_order,
        };

        let opportunistic_cpus_enabled = lookup("GANTRY_SCHEDULER_OPPORTUNISTIC_CPUS")
            .map(|v| parse_flag(&v))
            .transpose()
            .context("GANTRY_SCHEDULER_OPPORTUNISTIC_CPUS must be true/false (or 1/0).")?
            .unwrap_or(defaults.opportunistic_cpus_enabled);

        Ok(Self {
            region,
            stack,
            tier_order,
            opportunistic_cpus_enabled,
        })
    }

    /// Position of `tier` in the preference order, if configured.
    pub fn tier_rank(&self, tier: &str) -> Option<usize> {
        self.tier_order.iter().position(|t| t == tier)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => anyhow::bail!("invalid boolean flag: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SchedulerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = SchedulerConfig::from_lookup(lookup_from(&[
            ("GANTRY_SCHEDULER_REGION", "us-west-2"),
            ("GANTRY_SCHEDULER_STACK", "cell-7"),
            ("GANTRY_SCHEDULER_TIER_ORDER", "flex, critical ,"),
            ("GANTRY_SCHEDULER_OPPORTUNISTIC_CPUS", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.stack, "cell-7");
        assert_eq!(config.tier_order, vec!["flex", "critical"]);
        assert!(config.opportunistic_cpus_enabled);
        assert_eq!(config.tier_rank("critical"), Some(1));
        assert_eq!(config.tier_rank("gpu"), None);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_flag = SchedulerConfig::from_lookup(lookup_from(&[(
            "GANTRY_SCHEDULER_OPPORTUNISTIC_CPUS",
            "maybe",
        )]));
        assert!(bad_flag.is_err());

        let empty_tiers =
            SchedulerConfig::from_lookup(lookup_from(&[("GANTRY_SCHEDULER_TIER_ORDER", " , ")]));
        assert!(empty_tiers.is_err());
    }
}
