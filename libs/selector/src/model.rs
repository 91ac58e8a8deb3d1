//! Selector rules and the task/host descriptors they are evaluated for.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gantry_id::{HostId, JobId, SelectorId, TaskId};
use serde::{Deserialize, Serialize};

/// Host fitness reported to the scheduler, in `[0, 1]`.
pub type Score = f64;

// =============================================================================
// Rules
// =============================================================================

/// A placement rule: a `select` predicate and a `match` predicate.
///
/// The rule applies to a (task, host) pair when `select` holds, and counts
/// as a positive match when `match` holds as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "select_expression")]
    pub select: String,

    #[serde(rename = "match_expression")]
    pub match_expr: String,
}

impl Match {
    pub fn new(select: impl Into<String>, match_expr: impl Into<String>) -> Self {
        Self {
            select: select.into(),
            match_expr: match_expr.into(),
        }
    }
}

/// A named group of placement rules managed by operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSelector {
    pub id: SelectorId,

    #[serde(default)]
    pub description: String,

    /// Disabled selectors stay registered but contribute no rules.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Lower values are evaluated first.
    #[serde(default)]
    pub priority: i32,

    /// Why the selector exists (ticket, incident, owner).
    #[serde(default)]
    pub reason: String,

    pub updated_at: DateTime<Utc>,

    /// Soft preferences, folded into the fitness score.
    #[serde(default)]
    pub should: Vec<Match>,

    /// Hard constraints, every selected one must match.
    #[serde(default)]
    pub must: Vec<Match>,
}

fn default_enabled() -> bool {
    true
}

impl SystemSelector {
    /// Create an enabled selector with no rules.
    pub fn new(id: SelectorId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            enabled: true,
            priority: 0,
            reason: String::new(),
            updated_at: Utc::now(),
            should: Vec::new(),
            must: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_should(mut self, rule: Match) -> Self {
        self.should.push(rule);
        self
    }

    #[must_use]
    pub fn with_must(mut self, rule: Match) -> Self {
        self.must.push(rule);
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// First problem that makes the selector unusable, if any.
    pub(crate) fn validation_error(&self) -> Option<String> {
        self.should
            .iter()
            .chain(&self.must)
            .find_map(|rule| {
                if rule.select.trim().is_empty() {
                    Some("select expression cannot be empty".to_string())
                } else if rule.match_expr.trim().is_empty() {
                    Some(format!(
                        "match expression cannot be empty (select: '{}')",
                        rule.select
                    ))
                } else {
                    None
                }
            })
    }
}

// =============================================================================
// Evaluation inputs
// =============================================================================

/// The task being placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub id: TaskId,
    pub job_id: JobId,
    pub application: String,
    pub capacity_group: String,
    pub cpu: f64,
    pub memory_mb: u64,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl TaskRequest {
    pub fn id(&self) -> TaskId {
        self.id
    }
}

/// A candidate host and the capacity it currently offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostState {
    pub id: HostId,
    pub instance_group: String,
    pub available_cpu: f64,
    pub available_memory_mb: u64,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl HostState {
    pub fn id(&self) -> HostId {
        self.id
    }
}

/// Facts about one instance group, as known to the agent manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceGroupFacts {
    pub tier: String,
    pub instance_type: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Cluster-wide facts made available to rule expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterFacts {
    /// Keyed by instance group name.
    #[serde(default)]
    pub instance_groups: BTreeMap<String, InstanceGroupFacts>,
}

impl ClusterFacts {
    pub fn instance_group(&self, name: &str) -> Option<&InstanceGroupFacts> {
        self.instance_groups.get(name)
    }
}
