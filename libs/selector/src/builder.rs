//! Default evaluation context layout.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::{ClusterFacts, Context, ContextBuilder, HostState, SchedulerConfig, TaskRequest};

/// Lays the inputs out as a JSON object:
///
/// ```text
/// {
///   "task": {...}, "host": {...}, "cluster": {...}, "config": {...},
///   "task_id": "task_...", "host_id": "host_...",
///   "instance_group": {...} | null
/// }
/// ```
///
/// `instance_group` holds the cluster facts for the host's own instance
/// group, so rules need not index into `cluster` themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContextBuilder;

impl DefaultContextBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl ContextBuilder for DefaultContextBuilder {
    fn build(
        &self,
        task: &TaskRequest,
        host: &HostState,
        cluster: &ClusterFacts,
        config: &SchedulerConfig,
    ) -> Context {
        let instance_group = cluster
            .instance_group(&host.instance_group)
            .map(to_value)
            .unwrap_or(Value::Null);

        Context::new()
            .with("task", to_value(task))
            .with("host", to_value(host))
            .with("cluster", to_value(cluster))
            .with("config", to_value(config))
            .with("task_id", task.id.to_string())
            .with("host_id", host.id.to_string())
            .with("instance_group", instance_group)
    }
}

/// These inputs only contain maps with string keys and finite numbers in
/// practice; anything unserializable is dropped to `null` with a warning.
fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to serialize evaluation context entry");
        Value::Null
    })
}
